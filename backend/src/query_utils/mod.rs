//! Pure filtering helpers: extent overlap and free-text query compilation.

pub mod overlap;
pub mod free_text;
