//! Normalized collection records and per-catalog failure records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{bbox::BBox, datetime_interval::DatetimeInterval, hint::HintPackage};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionMetadata {
    pub id: String,
    pub catalog_url: String,
    pub title: String,
    pub spatial_extent: Vec<BBox>,
    pub temporal_extent: Vec<DatetimeInterval>,
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub hint: Option<BTreeMap<HintPackage, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederatedSearchError {
    pub catalog_url: String,
    pub error_message: String,
}

impl FederatedSearchError {
    pub fn new(catalog_url: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self { catalog_url: catalog_url.into(), error_message: error_message.into() }
    }
}

/// One element of an adapter's output: a matching collection, or the catalog's failure.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchItem {
    Collection(CollectionMetadata),
    Error(FederatedSearchError),
}

impl SearchItem {
    pub fn is_error(&self) -> bool {
        matches!(self, SearchItem::Error(_))
    }
}

