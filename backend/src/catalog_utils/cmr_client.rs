//! NASA CMR collection search (`collections.json`).

use anyhow::Context;
use chrono::{DateTime, Utc};
use common::{bbox::BBox, datetime_interval::DatetimeInterval};
use serde::Deserialize;

use crate::catalog_utils::http::get_json;

/// Operational CMR search endpoint.
pub const CMR_OPS: &str = "https://cmr.earthdata.nasa.gov/search/";
pub const CMR_UAT: &str = "https://cmr.uat.earthdata.nasa.gov/search/";
pub const MAX_PAGE_SIZE: usize = 2000;
const HITS_HEADER: &str = "CMR-Hits";

#[derive(Debug, Deserialize)]
struct CmrFeedResponse {
    feed: CmrFeed,
}

#[derive(Debug, Deserialize)]
struct CmrFeed {
    #[serde(default)]
    entry: Vec<serde_json::Value>,
}

/// One `collections.json` request. Every field set here is filtered server-side.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CmrCollectionQuery {
    pub bbox: Option<BBox>,
    pub temporal: Option<DatetimeInterval>,
    pub keyword: Option<String>,
    pub page_size: usize,
}

impl CmrCollectionQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page_size", self.page_size.min(MAX_PAGE_SIZE).to_string())];
        if let Some(bbox) = &self.bbox {
            params.push(("bounding_box", bbox.to_string()));
        }
        if let Some(temporal) = &self.temporal {
            params.push(("temporal", format!("{},{}", format_cmr_datetime(temporal.start), format_cmr_datetime(temporal.end))));
        }
        if let Some(keyword) = &self.keyword {
            params.push(("keyword", keyword.clone()));
        }
        params
    }
}

fn format_cmr_datetime(dt: Option<DateTime<Utc>>) -> String {
    dt.map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()).unwrap_or_default()
}

fn collections_url(base_url: &str) -> String {
    format!("{}/collections.json", base_url.trim_end_matches('/'))
}

pub async fn search_collections(
    client: &reqwest::Client,
    base_url: &str,
    query: &CmrCollectionQuery,
) -> anyhow::Result<Vec<serde_json::Value>> {
    let response = get_json::<CmrFeedResponse>(client, &collections_url(base_url), &query.params()).await?;
    Ok(response.body.feed.entry)
}

/// Total number of collections the catalog reports, without fetching any of them.
pub async fn collection_hits(client: &reqwest::Client, base_url: &str) -> anyhow::Result<u64> {
    let response = get_json::<serde_json::Value>(client, &collections_url(base_url), &[("page_size", "0".to_string())]).await?;
    let hits = response
        .headers
        .get(HITS_HEADER)
        .with_context(|| format!("{base_url}: response has no {HITS_HEADER} header"))?
        .to_str()
        .context("CMR-Hits header is not text")?;
    hits.trim().parse::<u64>().with_context(|| format!("CMR-Hits header is not a number: {hits}"))
}
