//! Failure taxonomy of the discovery core.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DiscoveryError {
    /// A caller-supplied filter value is malformed. The only kind that escapes to the caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The free-text query uses a construct the target backend cannot express.
    #[error("{backend} free-text search does not handle {construct} like {token}\nfull query: {query}")]
    UnsupportedQuery {
        backend: &'static str,
        construct: &'static str,
        token: String,
        query: String,
    },

    /// A catalog returned a record missing a required field.
    #[error("record from {catalog_url} is missing required field '{field}':\n{record}")]
    MalformedRecord {
        catalog_url: String,
        field: &'static str,
        record: String,
    },

    #[error("catalog {catalog_url} cannot be reached: {reason}")]
    CatalogUnreachable { catalog_url: String, reason: String },
}

impl DiscoveryError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        DiscoveryError::InvalidInput(message.into())
    }

    pub fn malformed_record(catalog_url: &str, field: &'static str, record: &serde_json::Value) -> Self {
        DiscoveryError::MalformedRecord {
            catalog_url: catalog_url.to_string(),
            field,
            record: serde_json::to_string_pretty(record).unwrap_or_else(|_| record.to_string()),
        }
    }
}
