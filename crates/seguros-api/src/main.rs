//! # seguros-api binary
//!
//! Loads configuration, initialises tracing and the optional Postgres pool,
//! and serves the router until Ctrl-C.

use std::net::SocketAddr;

use anyhow::Context;
use seguros_api::config::{AppConfig, LogFormat};
use seguros_api::state::AppState;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    init_tracing(config.log_format);
    tracing::debug!(?config, "configuration loaded");

    let db_pool = seguros_api::db::init_pool(&config)
        .await
        .context("database initialization failed")?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::with_config(config, db_pool);
    let app = seguros_api::app(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("seguros API listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("seguros API stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
