//! Local evaluation of free-text queries against a record's text fields.

use std::collections::BTreeMap;

use super::tokenize::{Modifier, Token, tokenize, words};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Contiguous word sequence inside one field. A single word is a sequence of one.
    Match(Vec<String>),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Expr {
    fn eval(&self, fields: &[Vec<String>]) -> bool {
        match self {
            Expr::Match(sequence) => fields.iter().any(|field| contains_sequence(field, sequence)),
            Expr::Not(inner) => !inner.eval(fields),
            Expr::And(all) => all.iter().all(|e| e.eval(fields)),
            Expr::Or(any) => any.iter().any(|e| e.eval(fields)),
        }
    }
}

fn contains_sequence(haystack: &[String], needle: &[String]) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery {
    expr: Expr,
}

impl TextQuery {
    pub fn parse(q: &str) -> Self {
        let tokens = tokenize(q);
        let mut pos = 0;
        let expr = parse_or(&tokens, &mut pos, 0);
        Self { expr }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// True for an empty or whitespace-only query.
    pub fn is_match_all(&self) -> bool {
        matches!(&self.expr, Expr::And(terms) if terms.is_empty())
    }

    pub fn matches<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        let fields = fields.into_iter().map(words).collect::<Vec<_>>();
        self.expr.eval(&fields)
    }
}

/// Parses alternatives until the end of input or the `)` closing the current group.
fn parse_or(tokens: &[Token], pos: &mut usize, depth: usize) -> Expr {
    let mut alternatives = Vec::new();
    let mut current_and_terms = Vec::new();

    while let Some(token) = tokens.get(*pos) {
        *pos += 1;
        match token {
            Token::And => continue,
            Token::Or => {
                if !current_and_terms.is_empty() {
                    alternatives.push(Expr::And(std::mem::take(&mut current_and_terms)));
                }
            }
            Token::OpenParen(modifier) => {
                let group = parse_or(tokens, pos, depth + 1);
                current_and_terms.push(match modifier {
                    Modifier::Exclude => Expr::Not(Box::new(group)),
                    Modifier::Include | Modifier::None => group,
                });
            }
            Token::CloseParen => {
                if depth > 0 {
                    break;
                }
                // stray closer at top level
            }
            Token::Word { text, modifier } | Token::Phrase { text, modifier } => {
                let sequence = words(text);
                if sequence.is_empty() {
                    continue;
                }
                let term = Expr::Match(sequence);
                current_and_terms.push(match modifier {
                    Modifier::Exclude => Expr::Not(Box::new(term)),
                    Modifier::Include | Modifier::None => term,
                });
            }
        }
    }
    if !current_and_terms.is_empty() {
        alternatives.push(Expr::And(current_and_terms));
    }

    match alternatives.len() {
        0 => Expr::And(vec![]),
        1 => alternatives.remove(0),
        _ => Expr::Or(alternatives),
    }
}

/// Evaluates `q` against named text fields (`title`, `description`, `keywords`, ...).
pub fn text_search(q: &str, text_fields: &BTreeMap<&str, String>) -> bool {
    TextQuery::parse(q).matches(text_fields.values().map(|v| v.as_str()))
}
