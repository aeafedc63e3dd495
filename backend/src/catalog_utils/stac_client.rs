//! STAC API root documents and collection listings.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog_utils::http::{get_json, resolve_href};

/// Upper bound on `rel="next"` pages followed for one listing.
pub const MAX_COLLECTION_PAGES: usize = 100;
/// Largest `limit` collection search servers have to accept.
pub const MAX_COLLECTION_SEARCH_LIMIT: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConformanceClass {
    Core,
    CollectionSearch,
    CollectionSearchFreeText,
}

impl ConformanceClass {
    fn suffix(&self) -> &'static str {
        match self {
            ConformanceClass::Core => "/core",
            ConformanceClass::CollectionSearch => "/collection-search",
            ConformanceClass::CollectionSearchFreeText => "/collection-search#free-text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StacLink {
    pub rel: String,
    pub href: String,
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StacRoot {
    #[serde(rename = "conformsTo", default)]
    pub conforms_to: Vec<String>,
    #[serde(default)]
    pub links: Vec<StacLink>,
}

impl StacRoot {
    /// Any STAC API v1.x release of the class counts (`v1.0.0`, `v1.0.0-rc.1`, ...).
    pub fn conforms_to(&self, class: ConformanceClass) -> bool {
        self.conforms_to
            .iter()
            .any(|uri| uri.starts_with("https://api.stacspec.org/v1.") && uri.ends_with(class.suffix()))
    }

    pub fn collections_url(&self, base_url: &str) -> anyhow::Result<String> {
        match self.links.iter().find(|link| link.rel == "data") {
            Some(link) => resolve_href(&with_trailing_slash(base_url), &link.href),
            None => Ok(format!("{}/collections", base_url.trim_end_matches('/'))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CollectionsPage {
    #[serde(default)]
    collections: Vec<serde_json::Value>,
    #[serde(default)]
    links: Vec<StacLink>,
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') { url.to_string() } else { format!("{url}/") }
}

pub async fn fetch_root(client: &reqwest::Client, base_url: &str) -> anyhow::Result<StacRoot> {
    let response = get_json::<StacRoot>(client, base_url, &[]).await?;
    Ok(response.body)
}

/// Lists every collection, following `rel="next"` links. `params` go on the first request
/// only; next links carry their own query string.
pub async fn fetch_collections(
    client: &reqwest::Client,
    base_url: &str,
    root: &StacRoot,
    params: &[(&str, String)],
) -> anyhow::Result<Vec<serde_json::Value>> {
    let mut url = root.collections_url(base_url)?;
    let mut params = params.to_vec();
    let mut visited = HashSet::new();
    let mut collections = Vec::new();

    for _ in 0..MAX_COLLECTION_PAGES {
        visited.insert(url.clone());
        let page = get_json::<CollectionsPage>(client, &url, &params).await?.body;
        collections.extend(page.collections);

        let next = page
            .links
            .iter()
            .find(|link| link.rel == "next" && link.method.as_deref().is_none_or(|m| m.eq_ignore_ascii_case("GET")));
        let Some(next) = next else {
            return Ok(collections);
        };
        let next_url = resolve_href(&url, &next.href)?;
        if visited.contains(&next_url) {
            tracing::warn!("{}: collection pagination loops back to {}", base_url, next_url);
            return Ok(collections);
        }
        url = next_url;
        params.clear();
    }
    tracing::warn!("{}: stopped listing collections after {} pages", base_url, MAX_COLLECTION_PAGES);
    Ok(collections)
}
