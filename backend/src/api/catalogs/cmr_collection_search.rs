//! NASA CMR catalogs: bbox and datetime filtered server-side, free text decomposed into
//! keyword searches.

use std::collections::HashSet;
use std::sync::Arc;

use common::{
    bbox::BBox,
    collection_metadata::{CollectionMetadata, SearchItem},
    datetime_interval::DatetimeInterval,
    hint::HintPackage,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    api::{
        catalogs::{CollectionSearch, hint, into_search_items},
        search::SearchCriteria,
    },
    catalog_utils::cmr_client::{self, CMR_OPS, CmrCollectionQuery},
    error::DiscoveryError,
    query_utils::{free_text::decompose_for_cmr, overlap::ensure_utc},
};

#[derive(Debug, Clone)]
pub struct CmrCollectionSearch {
    base_url: String,
    criteria: Arc<SearchCriteria>,
    client: reqwest::Client,
}

#[derive(Debug, Clone, PartialEq)]
struct CmrCollection {
    id: String,
    short_name: String,
    version_id: Option<String>,
    title: String,
    data_center: String,
    summary: Option<String>,
    boxes: Vec<BBox>,
    interval: DatetimeInterval,
}

impl CmrCollection {
    fn from_value(catalog_url: &str, record: &Value) -> Result<Self, DiscoveryError> {
        let malformed = |field| DiscoveryError::malformed_record(catalog_url, field, record);
        let text = |field: &str| record.get(field).and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty());
        let required = |field: &'static str| text(field).map(str::to_string).ok_or_else(|| malformed(field));

        let boxes = match (record.get("boxes"), record.get("polygons")) {
            (Some(boxes), _) => parse_boxes(boxes).ok_or_else(|| malformed("boxes"))?,
            (None, Some(polygons)) => parse_polygons(polygons).ok_or_else(|| malformed("polygons"))?,
            (None, None) => vec![],
        };

        let datetime = |field: &'static str| text(field).map(ensure_utc).transpose().map_err(|_| malformed(field));
        let interval = DatetimeInterval::new(datetime("time_start")?, datetime("time_end")?);

        Ok(Self {
            id: required("id")?,
            short_name: required("short_name")?,
            title: required("title")?,
            data_center: required("data_center")?,
            version_id: text("version_id").map(str::to_string),
            summary: text("summary").map(str::to_string),
            boxes,
            interval,
        })
    }

    /// Collection id under CMR-STAC: `short_name` plus `_version` when the version is known.
    fn cmr_stac_collection_id(&self) -> String {
        match &self.version_id {
            Some(version) if !version.eq_ignore_ascii_case("not provided") => format!("{}_{}", self.short_name, version),
            _ => self.short_name.clone(),
        }
    }
}

/// `"S W N E"` strings.
fn parse_boxes(raw: &Value) -> Option<Vec<BBox>> {
    raw.as_array()?
        .iter()
        .map(|b| {
            let coords = parse_coords(b.as_str()?)?;
            match coords[..] {
                [s, w, n, e] => Some(BBox::new(w, s, e, n)),
                _ => None,
            }
        })
        .collect()
}

/// Rings of `"lat lon lat lon ..."`, each reduced to its bounding box. Only the outer ring
/// of each polygon is read.
fn parse_polygons(raw: &Value) -> Option<Vec<BBox>> {
    raw.as_array()?
        .iter()
        .map(|polygon| {
            let ring = polygon.as_array()?.first()?.as_str()?;
            let coords = parse_coords(ring)?;
            if coords.len() < 2 || coords.len() % 2 != 0 {
                return None;
            }
            let lats = coords.iter().step_by(2);
            let lons = coords.iter().skip(1).step_by(2);
            let (ymin, ymax) = lats.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
            let (xmin, xmax) = lons.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
            Some(BBox::new(xmin, ymin, xmax, ymax))
        })
        .collect()
}

fn parse_coords(text: &str) -> Option<Vec<f64>> {
    text.split_whitespace().map(|c| c.parse::<f64>().ok()).collect()
}

impl CmrCollectionSearch {
    pub fn new(base_url: impl Into<String>, criteria: Arc<SearchCriteria>, client: reqwest::Client) -> Self {
        Self { base_url: base_url.into(), criteria, client }
    }

    /// One query per OR branch of the free text, or a single unfiltered-text query.
    fn collection_queries(&self) -> Result<Vec<CmrCollectionQuery>, DiscoveryError> {
        let base = CmrCollectionQuery {
            bbox: self.criteria.bbox,
            temporal: self.criteria.datetime,
            keyword: None,
            page_size: self.criteria.limit,
        };
        let keywords = match &self.criteria.q {
            Some(q) => decompose_for_cmr(q)?,
            None => vec![],
        };
        if keywords.is_empty() {
            return Ok(vec![base]);
        }
        Ok(keywords
            .into_iter()
            .map(|keyword| CmrCollectionQuery { keyword: Some(keyword), ..base.clone() })
            .collect())
    }

    async fn _get_collection_metadata(&self) -> anyhow::Result<Vec<CollectionMetadata>> {
        let queries = self.collection_queries()?;
        if queries.len() > 1 {
            info!("{}: free text split into {} keyword searches", self.base_url, queries.len());
        }

        let mut seen = HashSet::new();
        let mut results = Vec::new();
        for query in &queries {
            let records = cmr_client::search_collections(&self.client, &self.base_url, query).await?;
            for record in &records {
                let collection = CmrCollection::from_value(&self.base_url, record)?;
                if seen.insert(collection.id.clone()) {
                    results.push(self.collection_metadata(collection));
                }
            }
        }
        Ok(results)
    }

    /// Hints are only attached when the search asked for a hint language, as for STAC.
    fn collection_metadata(&self, collection: CmrCollection) -> CollectionMetadata {
        let bbox = self.criteria.bbox.as_ref();
        let datetime = self.criteria.datetime.as_ref();
        let cmr_stac_url = format!("{}{}", self.base_url.replace("/search/", "/stac/"), collection.data_center);
        let cmr_stac_id = collection.cmr_stac_collection_id();

        let mut candidates = vec![
            (HintPackage::PystacClient, hint::pystac_client_hint(&cmr_stac_url, &cmr_stac_id, bbox, datetime)),
            (HintPackage::PythonCmr, hint::python_cmr_hint(&self.base_url, &collection.short_name, bbox, datetime)),
            (HintPackage::Rstac, hint::rstac_hint(&cmr_stac_url, &cmr_stac_id, bbox, datetime)),
        ];
        if self.base_url == CMR_OPS {
            candidates.push((HintPackage::Earthaccess, hint::earthaccess_hint(&collection.short_name, bbox, datetime)));
        }

        CollectionMetadata {
            catalog_url: self.base_url.clone(),
            id: collection.id,
            title: collection.title,
            spatial_extent: collection.boxes,
            temporal_extent: vec![collection.interval],
            description: collection.summary,
            keywords: vec![],
            hint: hint::select_hints(self.criteria.hint_lang, candidates),
        }
    }
}

impl CollectionSearch for CmrCollectionSearch {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_collection_metadata(&self) -> Vec<SearchItem> {
        into_search_items(&self.base_url, self._get_collection_metadata().await)
    }

    async fn check_health(&self) -> String {
        match cmr_client::collection_hits(&self.client, &self.base_url).await {
            Ok(0) => "no collections".to_string(),
            Ok(_) => "healthy".to_string(),
            Err(e) => {
                warn!("{}: health check failed: {:#}", self.base_url, e);
                "cannot be opened as a CMR search API".to_string()
            }
        }
    }
}
