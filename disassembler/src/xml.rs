//! A tiny, hand-rolled reader/writer for the fixed `<separation>`/`<state>`
//! grammar [`crate::separation::Separation`] is serialised as.
//!
//! This is intentionally not a general XML library: the grammar has no
//! attributes beyond `count`/`type`, no namespaces, and no escaping needs
//! (every value is a list of integers), so a generic parser would buy
//! nothing but dependency weight. Grounded on `disassembly.cpp`'s
//! `getNumbers`/`state_c`/`separation_c` constructors, including their
//! strict validation rules.
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LoadError {
    #[error("expected a <{0}> element, found none")]
    MissingElement(&'static str),
    #[error("<{0}> is missing required attribute {1:?}")]
    MissingAttribute(&'static str, &'static str),
    #[error("expected {expected} numbers, found {found}")]
    WrongCount { expected: usize, found: usize },
    #[error("malformed integer list: {0:?}")]
    MalformedNumberList(String),
    #[error("a <separation> must contain at least one <state>")]
    NoStates,
    #[error("duplicate <separation type={0:?}> branch")]
    DuplicateBranch(&'static str),
    #[error("piece count mismatch: expected {expected}, found {found}")]
    PieceCountMismatch { expected: usize, found: usize },
}

/// Parses a whitespace-separated list of signed integers with exactly
/// `expected` entries, rejecting anything the original's hand-rolled
/// scanner would reject: stray characters, more than one `-` per token,
/// or the wrong count. Grounded on `getNumbers`.
pub fn parse_numbers(text: &str, expected: usize) -> Result<Vec<i32>, LoadError> {
    for c in text.chars() {
        if !(c.is_ascii_digit() || c == '-' || c.is_whitespace()) {
            return Err(LoadError::MalformedNumberList(text.to_string()));
        }
    }
    let mut numbers = Vec::new();
    for token in text.split_whitespace() {
        if token.matches('-').count() > 1 || token == "-" {
            return Err(LoadError::MalformedNumberList(text.to_string()));
        }
        let value: i32 = token
            .parse()
            .map_err(|_| LoadError::MalformedNumberList(text.to_string()))?;
        numbers.push(value);
    }
    if numbers.len() != expected {
        return Err(LoadError::WrongCount {
            expected,
            found: numbers.len(),
        });
    }
    Ok(numbers)
}

#[must_use]
pub fn format_numbers(numbers: &[i32]) -> String {
    numbers.iter().map(i32::to_string).collect::<Vec<_>>().join(" ")
}

/// A minimal tag cursor over the fixed grammar: finds the next
/// `<name ...>...</name>` span, returning its attributes and inner text.
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

pub struct Element<'a> {
    pub attrs: Vec<(&'a str, &'a str)>,
    pub inner: &'a str,
}

impl<'a> Cursor<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Finds the next element named `name` starting from the cursor and
    /// advances past its closing tag. Returns `None` if absent.
    pub fn next_element(&mut self, name: &'static str) -> Result<Option<Element<'a>>, LoadError> {
        let remaining = &self.input[self.pos..];
        let open_prefix = format!("<{name}");
        let Some(open_start) = remaining.find(&open_prefix) else {
            return Ok(None);
        };
        let after_prefix = &remaining[open_start + open_prefix.len()..];
        let Some(tag_end_rel) = after_prefix.find('>') else {
            return Err(LoadError::MalformedNumberList(self.input.to_string()));
        };
        let attr_text = &after_prefix[..tag_end_rel];
        let self_closing = attr_text.trim_end().ends_with('/');
        let attrs = parse_attrs(attr_text.trim_end_matches('/'));

        let body_start = open_start + open_prefix.len() + tag_end_rel + 1;
        if self_closing {
            self.pos += body_start;
            return Ok(Some(Element { attrs, inner: "" }));
        }

        let close_tag = format!("</{name}>");
        let body = &remaining[body_start..];
        let Some(close_rel) = body.find(&close_tag) else {
            return Err(LoadError::MalformedNumberList(self.input.to_string()));
        };
        let inner = &body[..close_rel];
        self.pos += body_start + close_rel + close_tag.len();
        Ok(Some(Element { attrs, inner }))
    }
}

fn parse_attrs(text: &str) -> Vec<(&str, &str)> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(eq) = rest.find('=') {
        let name = rest[..eq].trim();
        let after_eq = &rest[eq + 1..];
        let Some(quote) = after_eq.find('"') else { break };
        let after_quote = &after_eq[quote + 1..];
        let Some(close_quote) = after_quote.find('"') else { break };
        let value = &after_quote[..close_quote];
        if !name.is_empty() {
            out.push((name, value));
        }
        rest = &after_quote[close_quote + 1..];
    }
    out
}

impl<'a> Element<'a> {
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.attrs.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_number_list() {
        assert_eq!(parse_numbers("1 -2 3", 3).unwrap(), vec![1, -2, 3]);
    }

    #[test]
    fn rejects_wrong_count() {
        assert_eq!(parse_numbers("1 2", 3), Err(LoadError::WrongCount { expected: 3, found: 2 }));
    }

    #[test]
    fn rejects_double_minus() {
        assert!(parse_numbers("1 --2 3", 3).is_err());
    }

    #[test]
    fn rejects_stray_characters() {
        assert!(parse_numbers("1 2x 3", 3).is_err());
    }

    #[test]
    fn cursor_extracts_attributes_and_inner_text() {
        let mut cursor = Cursor::new(r#"<pieces count="3">1 2 3</pieces>"#);
        let el = cursor.next_element("pieces").unwrap().unwrap();
        assert_eq!(el.attr("count"), Some("3"));
        assert_eq!(el.inner, "1 2 3");
    }
}
