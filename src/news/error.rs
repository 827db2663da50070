//! Relay error taxonomy.

use axum::http::StatusCode;
use thiserror::Error;

/// Terminal failures of a relay request.
///
/// The `Display` text is the public message returned to the caller.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The caller did not supply `location`.
    #[error("location parameter required")]
    MissingLocation,

    /// Upstream answered with a non-2xx status.
    #[error("Google News returned {0}")]
    UpstreamStatus(u16),

    /// The upstream call did not complete (connect, timeout, body read).
    #[error("Failed to fetch news")]
    Transport(#[from] reqwest::Error),
}

impl RelayError {
    /// HTTP status reported to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingLocation => StatusCode::BAD_REQUEST,
            Self::UpstreamStatus(_) | Self::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
