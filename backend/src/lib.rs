//! Federated collection discovery over STAC APIs and NASA CMR.

pub mod api;
pub mod catalog_utils;
pub mod config;
pub mod error;
pub mod query_utils;
pub mod server_extra;
