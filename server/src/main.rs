//! Federated collection discovery HTTP service.

use std::sync::Arc;

use anyhow::Context;
use backend::{
    config::Settings,
    server_extra::{AppState, router},
};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into())))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    info!(
        "{} STAC APIs, {} CMR endpoints, {} workers",
        settings.stac_api_urls.len(),
        settings.cmr_urls.len(),
        settings.worker_pool_size
    );
    let bind_addr = settings.bind_addr;
    let state = Arc::new(AppState::new(settings)?);

    let listener = TcpListener::bind(bind_addr).await.with_context(|| format!("cannot bind {bind_addr}"))?;
    info!("listening on {}", bind_addr);
    axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    state.pool.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl+C received, shutting down"),
        Err(e) => error!("cannot listen for Ctrl+C: {}", e),
    }
}
