//! Decomposition of free-text queries into CMR keyword searches.
//!
//! CMR runs one implicit-AND keyword query per request and cannot mix exact phrases with
//! other terms. OR branches therefore become separate requests whose results the caller
//! unions. Grouping and exclusion have no decomposition and are rejected.

use crate::error::DiscoveryError;

use super::tokenize::{Modifier, Token, tokenize};

const BACKEND: &str = "CMR";

/// Splits `q` into AND-only keyword strings, one per CMR request.
///
/// A quoted phrase flushes the terms accumulated so far as their own sub-query and is then
/// emitted alone, quotes kept: `"climate model" temperature` gives `"climate model"` and
/// `temperature`. An empty query gives no sub-queries.
pub fn decompose_for_cmr(q: &str) -> Result<Vec<String>, DiscoveryError> {
    let mut separate_or_queries = Vec::new();
    let mut current_and_terms: Vec<String> = Vec::new();

    let flush = |queries: &mut Vec<String>, terms: &mut Vec<String>| {
        if !terms.is_empty() {
            queries.push(terms.join(" "));
            terms.clear();
        }
    };

    for token in tokenize(q) {
        match token {
            Token::And => continue,
            Token::Or => flush(&mut separate_or_queries, &mut current_and_terms),
            Token::OpenParen(Modifier::None) => return Err(unsupported("parenthetical terms", "(", q)),
            Token::OpenParen(Modifier::Include) => return Err(unsupported("parenthetical terms", "+(", q)),
            Token::OpenParen(Modifier::Exclude) => return Err(unsupported("exclusion terms", "-(", q)),
            Token::CloseParen => return Err(unsupported("parenthetical terms", ")", q)),
            Token::Word { text, modifier: Modifier::Exclude } => {
                return Err(unsupported("exclusion terms", &format!("-{text}"), q));
            }
            Token::Phrase { text, modifier: Modifier::Exclude } => {
                return Err(unsupported("exclusion terms", &format!("-\"{text}\""), q));
            }
            Token::Phrase { text, .. } => {
                flush(&mut separate_or_queries, &mut current_and_terms);
                separate_or_queries.push(format!("\"{text}\""));
            }
            Token::Word { text, .. } => current_and_terms.push(text),
        }
    }
    flush(&mut separate_or_queries, &mut current_and_terms);

    Ok(separate_or_queries)
}

fn unsupported(construct: &'static str, token: &str, q: &str) -> DiscoveryError {
    DiscoveryError::UnsupportedQuery {
        backend: BACKEND,
        construct,
        token: token.to_string(),
        query: q.to_string(),
    }
}
