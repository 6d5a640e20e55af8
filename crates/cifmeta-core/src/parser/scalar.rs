//! Scalar tag scanning.
//!
//! Lattice constants and the space-group label are recognized anywhere in a
//! document, in any order, by a forward scan for `tag` + whitespace + `value`.
//! Each tag is looked up independently; one tag's absence or malformed value
//! never influences another.

use crate::domain::{LatticeParameter, LatticeParameters};

pub const SPACE_GROUP_TAG: &str = "_symmetry_space_group_name_H-M";

/// Scans all six lattice tags, keeping the default for every tag that is
/// missing or carries an unparsable value.
pub fn scan_lattice(source: &str) -> LatticeParameters {
    let mut lattice = LatticeParameters::default();
    for parameter in LatticeParameter::ALL {
        if let Some(value) = scan_lattice_parameter(source, parameter) {
            lattice.set(parameter, value);
        }
    }
    lattice
}

/// Value of the first occurrence of `parameter`'s tag that is followed by a
/// numeric literal. A literal that fails to parse yields `None` rather than
/// falling through to a later occurrence.
pub fn scan_lattice_parameter(source: &str, parameter: LatticeParameter) -> Option<f64> {
    let tag = parameter.tag();
    let literal = tag_values(source, tag).find_map(|mut cursor| cursor.numeric_literal())?;

    match literal.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::debug!(tag, literal, "ignoring unparsable lattice value");
            None
        }
    }
}

/// Space-group label with surrounding quotes and whitespace removed. Internal
/// spacing and punctuation are kept verbatim.
pub fn scan_space_group(source: &str) -> Option<String> {
    tag_values(source, SPACE_GROUP_TAG)
        .find_map(|mut cursor| cursor.label_value())
        .map(ToOwned::to_owned)
}

/// Cursors positioned after every whitespace-delimited occurrence of `tag`
/// that is itself followed by at least one whitespace character.
fn tag_values<'a>(source: &'a str, tag: &'a str) -> impl Iterator<Item = ValueCursor<'a>> + 'a {
    source.match_indices(tag).filter_map(move |(start, _)| {
        let preceded_by_boundary = source[..start]
            .chars()
            .next_back()
            .is_none_or(char::is_whitespace);
        if !preceded_by_boundary {
            return None;
        }

        let mut cursor = ValueCursor::new(&source[start + tag.len()..]);
        (cursor.skip_whitespace() > 0).then_some(cursor)
    })
}

struct ValueCursor<'a> {
    rest: &'a str,
}

impl<'a> ValueCursor<'a> {
    fn new(rest: &'a str) -> Self {
        Self { rest }
    }

    fn skip_whitespace(&mut self) -> usize {
        let trimmed = self.rest.trim_start();
        let skipped = self.rest.len() - trimmed.len();
        self.rest = trimmed;
        skipped
    }

    fn take_while(&mut self, predicate: impl Fn(u8) -> bool) -> &'a str {
        let end = self
            .rest
            .bytes()
            .position(|byte| !predicate(byte))
            .unwrap_or(self.rest.len());
        let (taken, rest) = self.rest.split_at(end);
        self.rest = rest;
        taken
    }

    /// Optional sign followed by digits and decimal points. Trailing text
    /// such as an uncertainty suffix `(3)` is left unread.
    fn numeric_literal(&mut self) -> Option<&'a str> {
        let start = self.rest;
        let sign = self.take_while(|byte| byte == b'+' || byte == b'-');
        if sign.len() > 1 {
            return None;
        }
        let body = self.take_while(|byte| byte.is_ascii_digit() || byte == b'.');
        if body.is_empty() {
            return None;
        }
        Some(&start[..sign.len() + body.len()])
    }

    /// Bare or quoted label, ending at a quote character or the end of the
    /// line.
    fn label_value(&mut self) -> Option<&'a str> {
        if self.rest.starts_with(['\'', '"']) {
            self.rest = &self.rest[1..];
        }
        let value = self
            .take_while(|byte| !matches!(byte, b'\'' | b'"' | b'\n' | b'\r'))
            .trim();
        (!value.is_empty()).then_some(value)
    }
}
