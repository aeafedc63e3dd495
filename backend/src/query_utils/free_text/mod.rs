//! Free-text search in the style of OGC API Features Part 9 (`q` parameter).
//!
//! Whitespace between terms means AND, a comma or `OR` means OR, `"..."` is an exact phrase,
//! `+term` / `-term` require / forbid a term, and parentheses group. The same query is
//! compiled two ways: [`TextQuery`] evaluates it locally against a record's text fields,
//! [`decompose_for_cmr`] splits it into the AND-only keyword strings CMR accepts.

mod tokenize;
mod predicate;
mod cmr;

pub use cmr::decompose_for_cmr;
pub use predicate::{Expr, TextQuery, text_search};
pub use tokenize::{Modifier, Token, tokenize, words};
