//! Catalog adapters: one per catalog family, behind a common contract.

use std::future::Future;
use std::sync::Arc;

use common::collection_metadata::{CollectionMetadata, FederatedSearchError, SearchItem};

use crate::api::search::SearchCriteria;

pub mod hint;

mod stac_api_collection_search;
pub use stac_api_collection_search::StacApiCollectionSearch;

mod cmr_collection_search;
pub use cmr_collection_search::CmrCollectionSearch;

pub trait CollectionSearch: Send + Sync + 'static {
    fn base_url(&self) -> &str;

    /// Every collection passing all active filters, or exactly one error element when the
    /// catalog operation failed as a whole.
    fn get_collection_metadata(&self) -> impl Future<Output = Vec<SearchItem>> + Send;

    /// `"healthy"` or a description of what is wrong. Never fails.
    fn check_health(&self) -> impl Future<Output = String> + Send;
}

/// Any configured catalog, whatever its family.
#[derive(Debug, Clone)]
pub enum Catalog {
    Stac(StacApiCollectionSearch),
    Cmr(CmrCollectionSearch),
}

impl CollectionSearch for Catalog {
    fn base_url(&self) -> &str {
        match self {
            Catalog::Stac(s) => s.base_url(),
            Catalog::Cmr(c) => c.base_url(),
        }
    }

    async fn get_collection_metadata(&self) -> Vec<SearchItem> {
        match self {
            Catalog::Stac(s) => s.get_collection_metadata().await,
            Catalog::Cmr(c) => c.get_collection_metadata().await,
        }
    }

    async fn check_health(&self) -> String {
        match self {
            Catalog::Stac(s) => s.check_health().await,
            Catalog::Cmr(c) => c.check_health().await,
        }
    }
}

/// One adapter per URL: STAC APIs first, then CMR endpoints, each in configured order.
pub fn build_catalogs(
    stac_api_urls: &[String],
    cmr_urls: &[String],
    client: &reqwest::Client,
    criteria: Arc<SearchCriteria>,
) -> Vec<Catalog> {
    let stac = stac_api_urls
        .iter()
        .map(|url| Catalog::Stac(StacApiCollectionSearch::new(url.clone(), criteria.clone(), client.clone())));
    let cmr = cmr_urls
        .iter()
        .map(|url| Catalog::Cmr(CmrCollectionSearch::new(url.clone(), criteria.clone(), client.clone())));
    stac.chain(cmr).collect()
}

/// Adapters for health probes, which ignore search criteria.
pub fn build_health_catalogs(stac_api_urls: &[String], cmr_urls: &[String], client: &reqwest::Client) -> Vec<Catalog> {
    build_catalogs(stac_api_urls, cmr_urls, client, Arc::new(SearchCriteria::default()))
}

/// Turns an adapter's outcome into stream elements: the collections, or the one failure.
pub(crate) fn into_search_items(base_url: &str, result: anyhow::Result<Vec<CollectionMetadata>>) -> Vec<SearchItem> {
    match result {
        Ok(collections) => {
            tracing::info!("{}: {} matching collections", base_url, collections.len());
            collections.into_iter().map(SearchItem::Collection).collect()
        }
        Err(e) => {
            tracing::error!("{}: collection search failed: {:#}", base_url, e);
            vec![SearchItem::Error(FederatedSearchError::new(base_url, format!("{e:#}")))]
        }
    }
}
