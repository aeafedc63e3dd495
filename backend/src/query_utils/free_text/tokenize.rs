//! Query tokenizer and the word model shared by queries and record text.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    None,
    /// `+term`
    Include,
    /// `-term`
    Exclude,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word { text: String, modifier: Modifier },
    /// Quoted phrase, quotes stripped.
    Phrase { text: String, modifier: Modifier },
    And,
    /// `OR` or an unquoted comma.
    Or,
    /// `(`, `+(` or `-(`.
    OpenParen(Modifier),
    CloseParen,
}

fn is_word_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '(' | ')' | '"')
}

pub fn tokenize(q: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = q.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            ',' => {
                chars.next();
                tokens.push(Token::Or);
            }
            '(' => {
                chars.next();
                tokens.push(Token::OpenParen(Modifier::None));
            }
            ')' => {
                chars.next();
                tokens.push(Token::CloseParen);
            }
            _ => {
                let mut modifier = Modifier::None;
                if c == '+' || c == '-' {
                    chars.next();
                    modifier = if c == '+' { Modifier::Include } else { Modifier::Exclude };
                }
                if modifier != Modifier::None && chars.peek() == Some(&'(') {
                    chars.next();
                    tokens.push(Token::OpenParen(modifier));
                    continue;
                }
                if chars.peek() == Some(&'"') {
                    chars.next();
                    // an unterminated quote runs to the end of the query
                    let text: String = chars.by_ref().take_while(|&c| c != '"').collect();
                    tokens.push(Token::Phrase { text, modifier });
                    continue;
                }
                let mut text = String::new();
                while let Some(&c) = chars.peek() {
                    if is_word_boundary(c) {
                        break;
                    }
                    text.push(c);
                    chars.next();
                }
                if text.is_empty() {
                    // lone sign
                    continue;
                }
                match (text.as_str(), modifier) {
                    ("AND", Modifier::None) => tokens.push(Token::And),
                    ("OR", Modifier::None) => tokens.push(Token::Or),
                    _ => tokens.push(Token::Word { text, modifier }),
                }
            }
        }
    }
    tokens
}

/// Lowercased alphanumeric runs. Both queries and record text go through this, so matching
/// is whole-word and case-insensitive.
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}
