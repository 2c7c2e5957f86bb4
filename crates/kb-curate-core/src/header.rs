//! Structured header parsing.
//!
//! A knowledge entry opens with a header block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: "Retry Logic: gRPC Calls"
//! type: pattern            # inline comments are stripped
//! tags: [networking, 'retries', grpc]
//! ---
//! ## Problem
//! ...
//! ```
//!
//! Only a constrained subset is understood: one `key: value` pair per line,
//! where a value is either a bracketed flat list, a fully quoted string, or a
//! bare scalar. Nested mappings, block lists, and multi-line scalars are not
//! supported; lines that do not look like a field are skipped.
//!
//! This module is the single parser used by validation, curation, and index
//! building, so every call site sees identical field values.

use std::collections::BTreeMap;
use std::fmt;

/// The fence line that opens and closes the header block.
pub const DELIMITER: &str = "---";

/// A parsed header value: either a bare/quoted scalar or a flat list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Scalar(String),
    List(Vec<String>),
}

impl HeaderValue {
    /// Returns the string if this is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            HeaderValue::Scalar(s) => Some(s),
            HeaderValue::List(_) => None,
        }
    }

    /// Returns the items if this is a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            HeaderValue::Scalar(_) => None,
            HeaderValue::List(items) => Some(items),
        }
    }

    /// An empty string and an empty list both count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            HeaderValue::Scalar(s) => s.is_empty(),
            HeaderValue::List(items) => items.is_empty(),
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Scalar(s) => f.write_str(s),
            HeaderValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// Field name → value mapping read from a header block.
///
/// Duplicate keys are resolved last-wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    fields: BTreeMap<String, HeaderValue>,
}

impl Header {
    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.fields.get(key)
    }

    /// The value of `key` if it is present and scalar.
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(HeaderValue::as_scalar)
    }

    /// The value of `key` if it is present and list-typed.
    pub fn list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(HeaderValue::as_list)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Structural failure to locate the header block.
///
/// These are not schema errors: when either occurs no field or section
/// checks are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    /// Line 1 is not the delimiter.
    MissingOpening,
    /// No later line closes the block.
    Unclosed,
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderError::MissingOpening => write!(
                f,
                "No header block found (file must start with {})",
                DELIMITER
            ),
            HeaderError::Unclosed => write!(
                f,
                "Header block not closed (missing closing {})",
                DELIMITER
            ),
        }
    }
}

impl std::error::Error for HeaderError {}

/// Returns true if `line` is a delimiter line once surrounding whitespace is ignored.
pub(crate) fn is_delimiter(line: &str) -> bool {
    line.trim() == DELIMITER
}

const BOM: char = '\u{feff}';

/// Lines of `text` with a leading byte-order mark removed. The header
/// parser and the section scanner both split through here.
pub(crate) fn document_lines(text: &str) -> Vec<&str> {
    text.strip_prefix(BOM).unwrap_or(text).split('\n').collect()
}

/// Index of the closing delimiter line within [`document_lines`] output.
pub(crate) fn locate_close(lines: &[&str]) -> Result<usize, HeaderError> {
    let first = lines.first().ok_or(HeaderError::MissingOpening)?;
    if !is_delimiter(first) {
        return Err(HeaderError::MissingOpening);
    }
    lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| is_delimiter(line))
        .map(|(i, _)| i)
        .ok_or(HeaderError::Unclosed)
}

/// Parse the header block at the top of `text`.
pub fn parse_header(text: &str) -> Result<Header, HeaderError> {
    let lines = document_lines(text);
    let close = locate_close(&lines)?;

    let mut header = Header::default();
    for line in &lines[1..close] {
        let stripped = line.trim();
        if stripped.is_empty() || stripped.starts_with('#') {
            continue;
        }
        let Some((key, raw)) = split_field(line) else {
            continue;
        };
        header.fields.insert(key.to_string(), parse_value(raw));
    }
    Ok(header)
}

/// Split `key: value` where the key starts the line and matches `[A-Za-z_]\w*`.
fn split_field(line: &str) -> Option<(&str, &str)> {
    let first = line.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    let key_end = line
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(line.len());
    let (key, rest) = line.split_at(key_end);
    let value = rest.trim_start().strip_prefix(':')?;
    Some((key, value.trim()))
}

fn parse_value(raw: &str) -> HeaderValue {
    if let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        let items = inner
            .split(',')
            .map(|item| item.trim().trim_matches(|c| c == '"' || c == '\''))
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
        return HeaderValue::List(items);
    }
    if let Some(inner) = strip_quotes(raw) {
        return HeaderValue::Scalar(inner.to_string());
    }
    HeaderValue::Scalar(strip_trailing_comment(raw).to_string())
}

fn strip_quotes(raw: &str) -> Option<&str> {
    for quote in ['"', '\''] {
        if raw.starts_with(quote) && raw.ends_with(quote) {
            // a lone quote character opens and closes an empty value
            return Some(raw.get(1..raw.len() - 1).unwrap_or(""));
        }
    }
    None
}

/// Drops a ` # comment` tail. A `#` glued to the preceding text (`C#`)
/// is part of the value and disables stripping for the whole line.
fn strip_trailing_comment(raw: &str) -> &str {
    let Some(pos) = raw.find('#') else {
        return raw;
    };
    match raw[..pos].chars().last() {
        Some(c) if c.is_whitespace() => raw[..pos].trim(),
        _ => raw,
    }
}

/// Set scalar field `key` to `value` inside the header block of `text`.
///
/// Every existing `key:` line is overwritten in place so the parser's
/// last-wins rule reads the new value back. If the key is absent, a new
/// line is inserted immediately before the closing delimiter. Everything
/// outside the touched line is preserved byte-for-byte.
pub fn set_field(text: &str, key: &str, value: &str) -> Result<String, HeaderError> {
    let borrowed = document_lines(text);
    let close = locate_close(&borrowed)?;
    let mut lines: Vec<String> = borrowed.into_iter().map(str::to_string).collect();

    let mut found = false;
    for line in lines.iter_mut().take(close).skip(1) {
        if split_field(line).is_some_and(|(k, _)| k == key) {
            *line = field_line(key, value, line.ends_with('\r'));
            found = true;
        }
    }
    if !found {
        let crlf = lines[close].ends_with('\r');
        lines.insert(close, field_line(key, value, crlf));
    }

    let joined = lines.join("\n");
    if text.starts_with(BOM) {
        Ok(format!("{}{}", BOM, joined))
    } else {
        Ok(joined)
    }
}

fn field_line(key: &str, value: &str, crlf: bool) -> String {
    if crlf {
        format!("{}: {}\r", key, value)
    } else {
        format!("{}: {}", key, value)
    }
}
