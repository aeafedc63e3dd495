//! HTTP handlers mounted by the `server` binary.

use std::sync::Arc;

use axum::{Router, routing::get};

use crate::{api::search::CatalogPool, catalog_utils::http::build_http_client, config::Settings};

pub mod health;
pub mod search;

/// Everything a request handler needs, built once at startup.
pub struct AppState {
    pub settings: Settings,
    pub client: reqwest::Client,
    pub pool: CatalogPool,
}

impl AppState {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let client = build_http_client(settings.request_timeout)?;
        let pool = CatalogPool::new(settings.worker_pool_size);
        Ok(Self { settings, client, pool })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/search", get(search::search))
        .route("/health", get(health::health))
        .with_state(state)
}
