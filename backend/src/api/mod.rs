//! Federated search: catalog adapters and the fan-out over them.

pub mod catalogs;
pub mod search;
