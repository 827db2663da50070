//! Response construction.
//!
//! # Responsibilities
//! - Relay the upstream feed verbatim as XML with a cache hint
//! - Map relay errors to JSON bodies of the form `{"error": "..."}`
//!
//! CORS headers are added by a layer (see `cors.rs`), not here.

use axum::body::Bytes;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::config::CacheConfig;
use crate::news::RelayError;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Successful relay: upstream body untouched.
pub fn feed_response(xml: Bytes, cache: &CacheConfig) -> Response {
    (
        [
            (CONTENT_TYPE, "application/xml".to_string()),
            (CACHE_CONTROL, cache.header_value()),
        ],
        xml,
    )
        .into_response()
}
