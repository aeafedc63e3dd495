use serde::{Deserialize, Serialize};

use crate::collection_metadata::{CollectionMetadata, FederatedSearchError, SearchItem};


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchResponse {
    pub results: Vec<CollectionMetadata>,
    pub errors: Vec<FederatedSearchError>,
}

impl SearchResponse {
    /// Consumes at most `limit` items from the merged stream. Errors count toward the limit.
    pub fn from_items(items: impl IntoIterator<Item = SearchItem>, limit: usize) -> Self {
        let mut response = SearchResponse::default();
        for item in items.into_iter().take(limit) {
            match item {
                SearchItem::Collection(c) => response.results.push(c),
                SearchItem::Error(e) => response.errors.push(e),
            }
        }
        response
    }
}
