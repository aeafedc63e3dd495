//! Minimal HTTP clients for the catalog families: STAC API and NASA CMR.

pub mod http;
pub mod stac_client;
pub mod cmr_client;
