//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured key/value fields)
//!     → request spans (tower-http TraceLayer, keyed by request ID)
//!
//! Consumers:
//!     → stdout, pretty for development or JSON for log shippers
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Request ID flows through every span
//! - `RUST_LOG` always wins over the configured level

pub mod logging;

pub use logging::init_logging;
