use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    api::{catalogs::build_health_catalogs, search::check_health},
    server_extra::AppState,
};

/// Status of every configured catalog, keyed by base URL.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<BTreeMap<String, String>> {
    let catalogs = build_health_catalogs(&state.settings.stac_api_urls, &state.settings.cmr_urls, &state.client);
    Json(check_health(&state.pool, catalogs).await)
}
