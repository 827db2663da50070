//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay handler on every path
//! - Wire up middleware (request ID, tracing, CORS, timeout)
//! - Bind server to listener
//! - Apply configuration updates without dropping in-flight requests
//! - Graceful shutdown on the lifecycle broadcast

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::cors::apply_cors;
use crate::http::request::{request_id, UuidRequestId, X_REQUEST_ID};
use crate::http::response::feed_response;
use crate::news::{NewsClient, NewsQuery, RelayError};

/// Per-config relay state. Replaced wholesale on reload.
#[derive(Debug)]
pub struct RelayState {
    pub config: RelayConfig,
    pub client: NewsClient,
}

impl RelayState {
    /// Build the state for a validated config.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let client = NewsClient::from_config(&config.upstream)?;
        Ok(Self { config, client })
    }

    /// Parse an inbound query string and fetch the matching feed.
    pub async fn fetch(&self, raw_query: Option<&str>) -> Result<Bytes, RelayError> {
        let query = NewsQuery::from_query_str(raw_query)?;
        self.client.fetch(&query).await
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<RelayState>>,
}

/// HTTP server for the news relay.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let request_timeout = Duration::from_secs(config.timeouts.request_secs);
        let state = AppState {
            inner: Arc::new(ArcSwap::from_pointee(RelayState::new(config)?)),
        };

        let router = Self::build_router(request_timeout, state.clone());
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layer order, outermost first: request ID, trace, request ID echo,
    /// CORS, timeout. CORS sits outside the timeout so 408s carry it too.
    #[allow(deprecated)]
    fn build_router(request_timeout: Duration, state: AppState) -> Router {
        let router = Router::new()
            .route("/", any(relay_handler))
            .route("/{*path}", any(relay_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(request_timeout));

        apply_cors(router)
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "relay",
                    request_id = %request_id(request.headers()),
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configs received on `config_updates` replace the relay state. The
    /// listener address and inbound timeout are fixed for the server's lifetime.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<RelayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let reloader = tokio::spawn(apply_config_updates(self.state.clone(), config_updates));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a snapshot of the active config.
    pub fn config(&self) -> RelayConfig {
        self.state.inner.load().config.clone()
    }
}

async fn apply_config_updates(
    state: AppState,
    mut config_updates: mpsc::UnboundedReceiver<RelayConfig>,
) {
    while let Some(config) = config_updates.recv().await {
        if requires_restart(&state.inner.load().config, &config) {
            tracing::warn!("Listener, timeout and logging changes take effect on restart");
        }

        match RelayState::new(config) {
            Ok(next) => {
                tracing::info!(
                    upstream = %next.client.base_url(),
                    cache_max_age_secs = next.config.cache.max_age_secs,
                    "Configuration reloaded"
                );
                state.inner.store(Arc::new(next));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to build upstream client, keeping current configuration");
            }
        }
    }
}

/// Whether `next` changes settings that are fixed once the server is running.
fn requires_restart(current: &RelayConfig, next: &RelayConfig) -> bool {
    next.listener != current.listener
        || next.timeouts != current.timeouts
        || next.observability != current.observability
}

/// Relay handler.
/// Answers preflight locally; everything else is forwarded as a GET upstream.
async fn relay_handler(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let relay = state.inner.load_full();
    match relay.fetch(uri.query()).await {
        Ok(xml) => {
            tracing::debug!(bytes = xml.len(), "Feed relayed");
            feed_response(xml, &relay.config.cache)
        }
        Err(err) => {
            match &err {
                RelayError::MissingLocation => tracing::debug!("Request without location"),
                RelayError::UpstreamStatus(status) => {
                    tracing::warn!(status = *status, "Upstream returned error status")
                }
                RelayError::Transport(e) => tracing::warn!(error = %e, "Upstream request failed"),
            }
            err.into_response()
        }
    }
}
