//! Common library exports shared between the search backend and the HTTP server.

extern crate serde;


pub mod bbox;
pub mod datetime_interval;
pub mod collection_metadata;
pub mod search_query;
pub mod search_result;
pub mod hint;
