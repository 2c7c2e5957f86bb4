//! Second-level heading scanner for entry bodies.
//!
//! The body starts after the second delimiter line. Within the body, a line
//! of the form `## Name` opens a section; deeper headings (`###`) do not.

use std::collections::BTreeSet;

use crate::header::{document_lines, is_delimiter, locate_close};

/// Marker appended to truncated summaries.
pub const ELLIPSIS: &str = "...";

/// Lines of the body, i.e. everything after the header block's closing
/// delimiter. Empty when the header block cannot be located. Delimiter
/// lines inside the body (horizontal rules) are dropped.
fn body_lines(text: &str) -> impl Iterator<Item = &str> {
    let lines = document_lines(text);
    let start = locate_close(&lines).map_or(lines.len(), |close| close + 1);
    lines
        .into_iter()
        .skip(start)
        .filter(|line| !is_delimiter(line))
}

/// Heading name if `line` is a `## Name` heading.
fn heading_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("##")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let name = rest.trim();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// The set of `##` heading names present in the body.
pub fn sections(text: &str) -> BTreeSet<String> {
    body_lines(text)
        .filter_map(heading_name)
        .map(str::to_string)
        .collect()
}

/// True if `name` is `heading` or begins with it at a word boundary
/// (`Problem` matches `Problem Statement` but not `Problems`).
fn heading_matches(name: &str, heading: &str) -> bool {
    match name.strip_prefix(heading) {
        Some("") => true,
        Some(rest) => rest
            .chars()
            .next()
            .is_some_and(|c| !(c.is_alphanumeric() || c == '_')),
        None => false,
    }
}

/// First non-blank line under the `## {heading}` section, truncated to
/// `max_len` characters (ellipsis included). Empty if the heading is absent
/// or has no content before the next heading.
pub fn summary_under(text: &str, heading: &str, max_len: usize) -> String {
    let mut inside = false;
    for line in body_lines(text) {
        if let Some(name) = heading_name(line) {
            if inside {
                break;
            }
            inside = heading_matches(name, heading);
            continue;
        }
        if !inside {
            continue;
        }
        let stripped = line.trim();
        if !stripped.is_empty() {
            return truncate(stripped, max_len);
        }
    }
    String::new()
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let keep = max_len.saturating_sub(ELLIPSIS.len());
    let mut out: String = s.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}
