//! News Relay
//!
//! A single-endpoint HTTP relay for Google News RSS search, built with Tokio
//! and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                 NEWS RELAY                    │
//!                         │                                               │
//!   GET /?location=...    │  ┌─────────┐    ┌──────────┐    ┌──────────┐  │
//!   ──────────────────────┼─▶│  http   │───▶│   news   │───▶│ upstream │──┼──▶ news.google.com
//!                         │  │ server  │    │  query   │    │  client  │  │     /rss/search
//!                         │  └─────────┘    └──────────┘    └────┬─────┘  │
//!                         │                                      │        │
//!   XML feed / JSON error │  ┌─────────┐    ┌──────────┐         │        │
//!   ◀─────────────────────┼──│  CORS   │◀───│ response │◀────────┘        │
//!                         │  │ headers │    │ mapping  │                  │
//!                         │  └─────────┘    └──────────┘                  │
//!                         │                                               │
//!                         │  config (TOML, hot reload) · observability ·  │
//!                         │  lifecycle (signals, graceful shutdown)       │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use news_relay::config::validation::validate_config;
use news_relay::config::{load_config, ConfigError, ConfigWatcher, RelayConfig};
use news_relay::http::HttpServer;
use news_relay::lifecycle::{wait_for_signal, Shutdown};
use news_relay::observability::init_logging;

#[derive(Parser)]
#[command(name = "news-relay", version)]
#[command(about = "CORS-enabled relay for Google News RSS search", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address (e.g. 127.0.0.1:8080).
    #[arg(long)]
    bind: Option<String>,

    /// Reload the configuration file when it changes.
    #[arg(long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    init_logging(&config.observability);
    tracing::info!("news-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        upstream_timeout_secs = config.upstream.request_timeout_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    // Kept alive until shutdown; dropping it stops the watch.
    let (_watcher, config_updates) = match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let server = HttpServer::new(config.clone())?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
