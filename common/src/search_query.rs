//! Raw search request parameters, as they arrive on the query string.

use serde::{Deserialize, Serialize};


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchQuery {
    /// `xmin,ymin,xmax,ymax`
    pub bbox: Option<String>,
    /// `start/end`, `..` for an open end
    pub datetime: Option<String>,
    pub q: Option<String>,
    pub hint_lang: Option<String>,
    pub limit: Option<u64>,
}
