//! Search criteria and the federated fan-out.

mod search_criteria;
pub use search_criteria::{DEFAULT_LIMIT, SearchCriteria, str_to_bbox, str_to_interval};

mod search_all;
pub use search_all::{CatalogPool, SearchItems, check_health, search_all};
