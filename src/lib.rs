pub mod config;
pub mod db;
pub mod entities;
pub mod services;
pub mod state;
pub mod web;

use std::sync::Arc;

use anyhow::Context;
pub use config::Config;
use state::AppState;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    config.validate()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    info!("Gatehouse v{} starting...", env!("CARGO_PKG_VERSION"));

    let bind_address = config.server.bind_address.clone();
    let port = config.server.port;

    let state = Arc::new(AppState::new(config).await?);

    // Fail fast at boot on a broken database path instead of on the first
    // request.
    state.store().ping().await.context("Database ping failed")?;

    let app = web::router(state).await;

    let addr = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Web server running at http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {e}"),
    }
}
