//! News search relay domain.
//!
//! # Data Flow
//! ```text
//! inbound query string
//!     → query.rs (location required, country/lang defaults, locale hint)
//!     → upstream.rs (feed URL, GET with fixed User-Agent)
//!     → raw feed text or RelayError
//!     → http::response (XML passthrough or JSON error)
//! ```
//!
//! # Design Decisions
//! - No retries, no caching, no parsing of the feed body
//! - Upstream origin is configuration, never client input
//! - Every failure is terminal and maps to exactly one status

pub mod error;
pub mod query;
pub mod upstream;

pub use error::RelayError;
pub use query::NewsQuery;
pub use upstream::{build_feed_url, NewsClient};
