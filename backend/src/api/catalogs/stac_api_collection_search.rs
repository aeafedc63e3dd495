//! STAC API catalogs: list collections, filter them locally.

use std::collections::BTreeMap;
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
    catalog_utils::stac_client::{self, ConformanceClass, MAX_COLLECTION_SEARCH_LIMIT, StacRoot},
    error::DiscoveryError,
    query_utils::{
        free_text::TextQuery,
        overlap::{bboxes_overlap, datetime_intervals_overlap, ensure_utc, full_bounding_box},
    },
};

#[derive(Debug, Clone)]
pub struct StacApiCollectionSearch {
    base_url: String,
    criteria: Arc<SearchCriteria>,
    client: reqwest::Client,
}

/// The parts of a STAC collection the filters and the result record need.
#[derive(Debug, Clone, PartialEq)]
struct StacCollection {
    id: String,
    title: Option<String>,
    description: Option<String>,
    keywords: Vec<String>,
    bboxes: Vec<BBox>,
    intervals: Vec<DatetimeInterval>,
}

impl StacCollection {
    fn from_value(catalog_url: &str, record: &Value) -> Result<Self, DiscoveryError> {
        let malformed = |field| DiscoveryError::malformed_record(catalog_url, field, record);

        let id = record.get("id").and_then(Value::as_str).filter(|id| !id.is_empty()).ok_or_else(|| malformed("id"))?;
        let extent = record.get("extent").ok_or_else(|| malformed("extent"))?;

        let raw_bboxes = extent.pointer("/spatial/bbox").and_then(Value::as_array).ok_or_else(|| malformed("extent.spatial.bbox"))?;
        let bboxes = parse_bboxes(raw_bboxes).ok_or_else(|| malformed("extent.spatial.bbox"))?;

        let raw_intervals = extent.pointer("/temporal/interval").and_then(Value::as_array).ok_or_else(|| malformed("extent.temporal.interval"))?;
        let intervals = raw_intervals
            .iter()
            .map(parse_interval)
            .collect::<Option<Vec<_>>>()
            .filter(|intervals| !intervals.is_empty())
            .ok_or_else(|| malformed("extent.temporal.interval"))?;

        let text = |field: &str| record.get(field).and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_string);
        let keywords = record
            .get("keywords")
            .and_then(Value::as_array)
            .map(|keywords| keywords.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();

        Ok(Self {
            id: id.to_string(),
            title: text("title"),
            description: text("description"),
            keywords,
            bboxes,
            intervals,
        })
    }

    fn text_fields(&self) -> BTreeMap<&'static str, String> {
        let mut fields = BTreeMap::new();
        if let Some(title) = &self.title {
            fields.insert("title", title.clone());
        }
        if let Some(description) = &self.description {
            fields.insert("description", description.clone());
        }
        if !self.keywords.is_empty() {
            fields.insert("keywords", self.keywords.join(", "));
        }
        fields
    }
}

/// `[[xmin, ymin, xmax, ymax], ...]`, 3D boxes `[xmin, ymin, zmin, xmax, ymax, zmax]` lose
/// their z range. A single flat box is accepted too.
fn parse_bboxes(raw: &[Value]) -> Option<Vec<BBox>> {
    if raw.first().is_some_and(Value::is_number) {
        return parse_bbox(raw).map(|bbox| vec![bbox]);
    }
    let bboxes = raw
        .iter()
        .map(|b| b.as_array().and_then(|coords| parse_bbox(coords)))
        .collect::<Option<Vec<_>>>()?;
    if bboxes.is_empty() { None } else { Some(bboxes) }
}

fn parse_bbox(coords: &[Value]) -> Option<BBox> {
    let coords = coords.iter().map(Value::as_f64).collect::<Option<Vec<_>>>()?;
    match coords[..] {
        [xmin, ymin, xmax, ymax] => Some(BBox::new(xmin, ymin, xmax, ymax)),
        [xmin, ymin, _zmin, xmax, ymax, _zmax] => Some(BBox::new(xmin, ymin, xmax, ymax)),
        _ => None,
    }
}

fn parse_interval(raw: &Value) -> Option<DatetimeInterval> {
    let bound = |v: &Value| match v {
        Value::Null => Some(None),
        Value::String(s) if s.is_empty() || s == ".." => Some(None),
        Value::String(s) => ensure_utc(s).ok().map(Some),
        _ => None,
    };
    match raw.as_array()?.as_slice() {
        [start, end] => Some(DatetimeInterval::new(bound(start)?, bound(end)?)),
        _ => None,
    }
}

impl StacApiCollectionSearch {
    pub fn new(base_url: impl Into<String>, criteria: Arc<SearchCriteria>, client: reqwest::Client) -> Self {
        Self { base_url: base_url.into(), criteria, client }
    }

    /// Filters the catalog can apply itself, when it declares collection search. Local
    /// filtering still runs on whatever comes back.
    fn collection_search_params(&self, root: &StacRoot) -> Vec<(&'static str, String)> {
        let criteria = &self.criteria;
        let has_filters = criteria.bbox.is_some() || criteria.datetime.is_some() || criteria.q.is_some();
        if !root.conforms_to(ConformanceClass::CollectionSearch) {
            if has_filters {
                warn!("{} does not conform to COLLECTION_SEARCH, filtering collections client-side", self.base_url);
            }
            return vec![];
        }

        let mut params = vec![("limit", criteria.limit.min(MAX_COLLECTION_SEARCH_LIMIT).to_string())];
        if let Some(bbox) = &criteria.bbox {
            params.push(("bbox", bbox.to_string()));
        }
        if let Some(datetime) = &criteria.datetime {
            params.push(("datetime", hint::stac_datetime(datetime)));
        }
        if let Some(q) = &criteria.q {
            if root.conforms_to(ConformanceClass::CollectionSearchFreeText) {
                params.push(("q", q.clone()));
            }
        }
        params
    }

    async fn _get_collection_metadata(&self) -> anyhow::Result<Vec<CollectionMetadata>> {
        let root = stac_client::fetch_root(&self.client, &self.base_url).await?;
        let params = self.collection_search_params(&root);
        let records = stac_client::fetch_collections(&self.client, &self.base_url, &root, &params).await?;
        info!("{}: scanning {} collections", self.base_url, records.len());

        let text_query = self.criteria.q.as_deref().map(TextQuery::parse);
        let mut results = Vec::new();
        for record in &records {
            let collection = StacCollection::from_value(&self.base_url, record)?;
            if self.overlaps(&collection, text_query.as_ref())? {
                results.push(self.collection_metadata(collection));
            }
        }
        Ok(results)
    }

    fn overlaps(&self, collection: &StacCollection, text_query: Option<&TextQuery>) -> Result<bool, DiscoveryError> {
        Ok(self.spatially_overlaps(collection)?
            && self.temporally_overlaps(collection)
            && text_query.is_none_or(|q| q.matches(collection.text_fields().values().map(|v| v.as_str()))))
    }

    fn spatially_overlaps(&self, collection: &StacCollection) -> Result<bool, DiscoveryError> {
        let Some(bbox) = &self.criteria.bbox else {
            return Ok(true);
        };
        Ok(bboxes_overlap(bbox, &full_bounding_box(&collection.bboxes)?))
    }

    /// Only the first interval counts: STAC puts the overall extent there.
    fn temporally_overlaps(&self, collection: &StacCollection) -> bool {
        match (&self.criteria.datetime, collection.intervals.first()) {
            (Some(datetime), Some(interval)) => datetime_intervals_overlap(datetime, interval),
            _ => true,
        }
    }

    fn collection_metadata(&self, collection: StacCollection) -> CollectionMetadata {
        let bbox = self.criteria.bbox.as_ref();
        let datetime = self.criteria.datetime.as_ref();
        let hint = hint::select_hints(
            self.criteria.hint_lang,
            [
                (HintPackage::PystacClient, hint::pystac_client_hint(&self.base_url, &collection.id, bbox, datetime)),
                (HintPackage::Rstac, hint::rstac_hint(&self.base_url, &collection.id, bbox, datetime)),
            ],
        );

        CollectionMetadata {
            catalog_url: self.base_url.clone(),
            id: collection.id,
            title: collection.title.unwrap_or("no title".to_string()),
            spatial_extent: collection.bboxes,
            temporal_extent: collection.intervals,
            description: collection.description,
            keywords: collection.keywords,
            hint,
        }
    }
}

impl CollectionSearch for StacApiCollectionSearch {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_collection_metadata(&self) -> Vec<SearchItem> {
        into_search_items(&self.base_url, self._get_collection_metadata().await)
    }

    async fn check_health(&self) -> String {
        match stac_client::fetch_root(&self.client, &self.base_url).await {
            Ok(root) if root.conforms_to(ConformanceClass::Core) => "healthy".to_string(),
            Ok(_) => "does not conform to the 'core' conformance class".to_string(),
            Err(e) => {
                warn!("{}: health check failed: {:#}", self.base_url, e);
                "cannot be opened as a STAC API".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record() -> Value {
        json!({
            "id": "collection-4",
            "type": "Collection",
            "description": "Another appropriate STAC collection for testing",
            "keywords": ["sea ice", "arctic"],
            "extent": {
                "spatial": {"bbox": [[-120, 40, -110, 50]]},
                "temporal": {"interval": [["2024-01-01T00:00:00Z", null]]}
            }
        })
    }

    fn search(criteria: SearchCriteria) -> StacApiCollectionSearch {
        StacApiCollectionSearch::new("https://stac2.net", Arc::new(criteria), reqwest::Client::new())
    }

    #[test]
    fn parses_a_collection() {
        let collection = StacCollection::from_value("https://stac2.net", &record()).unwrap();
        assert_eq!(collection.id, "collection-4");
        assert_eq!(collection.title, None);
        assert_eq!(collection.bboxes, vec![BBox::new(-120.0, 40.0, -110.0, 50.0)]);
        assert_eq!(collection.intervals.len(), 1);
        assert!(collection.intervals[0].end.is_none());
        assert_eq!(collection.text_fields()["keywords"], "sea ice, arctic");
    }

    #[test]
    fn accepts_3d_and_flat_bboxes() {
        let mut r = record();
        r["extent"]["spatial"]["bbox"] = json!([[-120, 40, 0, -110, 50, 100], [0, 0, 1, 1]]);
        let collection = StacCollection::from_value("https://stac2.net", &r).unwrap();
        assert_eq!(collection.bboxes, vec![BBox::new(-120.0, 40.0, -110.0, 50.0), BBox::new(0.0, 0.0, 1.0, 1.0)]);

        r["extent"]["spatial"]["bbox"] = json!([-120, 40, -110, 50]);
        let collection = StacCollection::from_value("https://stac2.net", &r).unwrap();
        assert_eq!(collection.bboxes.len(), 1);
    }

    #[test]
    fn missing_required_fields_are_malformed() {
        let mut r = record();
        r.as_object_mut().unwrap().remove("id");
        assert!(matches!(
            StacCollection::from_value("https://stac2.net", &r),
            Err(DiscoveryError::MalformedRecord { field: "id", .. })
        ));

        let mut r = record();
        r["extent"]["spatial"]["bbox"] = json!([]);
        assert!(matches!(
            StacCollection::from_value("https://stac2.net", &r),
            Err(DiscoveryError::MalformedRecord { field: "extent.spatial.bbox", .. })
        ));

        let mut r = record();
        r["extent"]["temporal"]["interval"] = json!([["not a date", null]]);
        assert!(matches!(
            StacCollection::from_value("https://stac2.net", &r),
            Err(DiscoveryError::MalformedRecord { field: "extent.temporal.interval", .. })
        ));
    }

    #[test]
    fn applies_all_active_filters() {
        let collection = StacCollection::from_value("https://stac2.net", &record()).unwrap();
        let no_filters = search(SearchCriteria::default());
        assert!(no_filters.overlaps(&collection, None).unwrap());

        let elsewhere = search(SearchCriteria::default().with_bbox(BBox::new(-130.0, 45.0, -125.0, 46.0)));
        assert!(!elsewhere.overlaps(&collection, None).unwrap());

        let datetime = crate::api::search::str_to_interval("2020-01-01T00:00:00Z/2020-02-01T00:00:00Z").unwrap().unwrap();
        let too_early = search(SearchCriteria::default().with_datetime(datetime));
        assert!(!too_early.overlaps(&collection, None).unwrap());

        let inside = search(SearchCriteria::default().with_bbox(BBox::new(-115.0, 45.0, -114.0, 46.0)));
        assert!(inside.overlaps(&collection, Some(&TextQuery::parse("\"sea ice\" -glacier"))).unwrap());
        assert!(!inside.overlaps(&collection, Some(&TextQuery::parse("awesome"))).unwrap());
    }

    #[test]
    fn collection_search_params_only_when_declared() {
        let criteria = SearchCriteria::default().with_bbox(BBox::new(-130.0, 45.0, -125.0, 46.0)).with_q("ice");
        let s = search(criteria);
        let plain = StacRoot { conforms_to: vec!["https://api.stacspec.org/v1.0.0/core".to_string()], links: vec![] };
        assert!(s.collection_search_params(&plain).is_empty());

        let collection_search = StacRoot {
            conforms_to: vec![
                "https://api.stacspec.org/v1.0.0/core".to_string(),
                "https://api.stacspec.org/v1.0.0-rc.1/collection-search".to_string(),
            ],
            links: vec![],
        };
        assert_eq!(
            s.collection_search_params(&collection_search),
            vec![("limit", "100".to_string()), ("bbox", "-130,45,-125,46".to_string())]
        );
    }

    #[test]
    fn collection_search_limit_is_capped() {
        let mut criteria = SearchCriteria::default();
        criteria.limit = 1_000_000;
        let root = StacRoot {
            conforms_to: vec!["https://api.stacspec.org/v1.0.0-rc.1/collection-search".to_string()],
            links: vec![],
        };
        assert_eq!(search(criteria).collection_search_params(&root), vec![("limit", "10000".to_string())]);
    }

    #[test]
    fn hints_only_for_requested_language() {
        let collection = StacCollection::from_value("https://stac2.net", &record()).unwrap();
        let metadata = search(SearchCriteria::default()).collection_metadata(collection.clone());
        assert_eq!(metadata.hint, None);
        assert_eq!(metadata.title, "no title");

        let metadata = search(SearchCriteria::default().with_hint_lang(common::hint::HintLanguage::Python)).collection_metadata(collection);
        let hints = metadata.hint.unwrap();
        assert_eq!(hints.len(), 1);
        assert!(hints[&HintPackage::PystacClient].contains("collections=\"collection-4\""));
    }
}
