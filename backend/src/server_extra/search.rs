use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{search_query::SearchQuery, search_result::SearchResponse};
use tracing::info;

use crate::{
    api::{
        catalogs::build_catalogs,
        search::{SearchCriteria, search_all},
    },
    error::DiscoveryError,
    server_extra::AppState,
};

async fn _search(state: &AppState, query: SearchQuery) -> Result<SearchResponse, DiscoveryError> {
    let criteria = Arc::new(SearchCriteria::from_query(&query)?);
    info!("search: {:?}", criteria);

    let catalogs = build_catalogs(&state.settings.stac_api_urls, &state.settings.cmr_urls, &state.client, criteria.clone());
    let items = search_all(&state.pool, catalogs).await;
    let response = SearchResponse::from_items(items, criteria.limit);
    info!("search: {} results, {} errors", response.results.len(), response.errors.len());
    Ok(response)
}

pub async fn search(State(state): State<Arc<AppState>>, Query(query): Query<SearchQuery>) -> Response {
    match _search(&state, query).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            tracing::warn!("search: rejected request: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}
