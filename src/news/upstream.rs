//! Upstream feed URL construction and fetching.

use std::time::Duration;

use axum::body::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::UpstreamConfig;
use crate::news::error::RelayError;
use crate::news::query::NewsQuery;

/// Characters left as-is when encoding a query component: ASCII
/// alphanumerics and `- _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Build the upstream search URL for a query.
///
/// `base` is taken from configuration; only the query string depends on
/// client input.
pub fn build_feed_url(base: &str, query: &NewsQuery) -> String {
    let country = encode(&query.country);
    format!(
        "{base}?q={q}&hl={hl}&gl={country}&ceid={country}:{lang}",
        q = encode(&query.location),
        hl = encode(query.locale_hint()),
        lang = encode(&query.lang),
    )
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// HTTP client for the upstream news search endpoint.
#[derive(Debug, Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    base_url: String,
}

impl NewsClient {
    /// Build a client from upstream settings.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// Configured search endpoint.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the raw feed body for a query.
    ///
    /// The body is returned as received; no charset decoding is applied.
    pub async fn fetch(&self, query: &NewsQuery) -> Result<Bytes, RelayError> {
        let url = build_feed_url(&self.base_url, query);
        tracing::debug!(url = %url, "Fetching upstream feed");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::UpstreamStatus(status.as_u16()));
        }

        Ok(response.bytes().await?)
    }
}
