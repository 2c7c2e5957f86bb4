//! Derived listings over the permanent store.
//!
//! [`IndexEntry::from_document`] re-reads an entry with the same header
//! parser used for validation. Entries whose header cannot be located are
//! skipped silently: the index is a lenient consumer.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::header::parse_header;
use crate::sections::summary_under;

/// Heading the summary column is taken from.
pub const SUMMARY_HEADING: &str = "Problem";
/// Maximum summary length in characters, ellipsis included.
pub const SUMMARY_MAX_LEN: usize = 80;

/// One row of the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Link target, relative to the knowledge-base root, `/`-separated.
    pub path: String,
    pub title: String,
    pub entry_type: String,
    pub tags: Vec<String>,
    pub domain: String,
    pub confidence: String,
    pub summary: String,
}

impl IndexEntry {
    /// Build an entry from a stored document, or `None` if its header does not parse.
    ///
    /// `stem` is the title fallback. Non-list `tags` are treated as no tags.
    pub fn from_document(path: &str, stem: &str, text: &str) -> Option<Self> {
        let header = parse_header(text).ok()?;
        let field = |key: &str| header.get(key).map(|v| v.to_string()).unwrap_or_default();
        Some(Self {
            path: path.to_string(),
            title: header
                .get("title")
                .map(|v| v.to_string())
                .unwrap_or_else(|| stem.to_string()),
            entry_type: field("type"),
            tags: header.list("tags").map(<[String]>::to_vec).unwrap_or_default(),
            domain: field("domain"),
            confidence: field("confidence"),
            summary: summary_under(text, SUMMARY_HEADING, SUMMARY_MAX_LEN),
        })
    }

    fn link(&self) -> String {
        format!("[{}]({})", self.title, self.path)
    }
}

/// Number of distinct tag values across `entries`.
pub fn distinct_tags(entries: &[IndexEntry]) -> usize {
    entries
        .iter()
        .flat_map(|e| e.tags.iter())
        .collect::<BTreeSet<_>>()
        .len()
}

fn generated_line(on: NaiveDate) -> String {
    format!(
        "_Auto-generated on {}. Do not edit manually._",
        on.format("%Y-%m-%d")
    )
}

/// Markdown table of every entry, sorted by domain, type, then title (case-insensitive).
pub fn render_index(entries: &[IndexEntry], on: NaiveDate) -> String {
    let mut sorted: Vec<&IndexEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| {
        (
            e.domain.to_lowercase(),
            e.entry_type.to_lowercase(),
            e.title.to_lowercase(),
        )
    });

    let mut lines = vec![
        "# Knowledge Base Index".to_string(),
        String::new(),
        generated_line(on),
        String::new(),
        format!("**{} entries**", sorted.len()),
        String::new(),
        "| Entry | Type | Tags | Domain | Confidence | Summary |".to_string(),
        "|-------|------|------|--------|------------|---------|".to_string(),
    ];
    for e in sorted {
        lines.push(format!(
            "| {} | {} | {} | {} | {} | {} |",
            e.link(),
            e.entry_type,
            e.tags.join(", "),
            e.domain,
            e.confidence,
            e.summary
        ));
    }
    lines.push(String::new());
    lines.join("\n")
}

/// One `##` heading per tag (case-insensitive order) listing the entries that carry it.
pub fn render_tags(entries: &[IndexEntry], on: NaiveDate) -> String {
    let mut by_tag: BTreeMap<&str, Vec<&IndexEntry>> = BTreeMap::new();
    for e in entries {
        for tag in &e.tags {
            let bucket = by_tag.entry(tag.as_str()).or_default();
            // an entry listing the same tag twice appears once under it
            if !bucket.iter().any(|seen| std::ptr::eq(*seen, e)) {
                bucket.push(e);
            }
        }
    }

    let mut tags: Vec<&str> = by_tag.keys().copied().collect();
    tags.sort_by_key(|t| t.to_lowercase());

    let mut lines = vec![
        "# Knowledge Base Tags".to_string(),
        String::new(),
        generated_line(on),
        String::new(),
        format!("**{} tags across {} entries**", tags.len(), entries.len()),
        String::new(),
    ];
    for tag in tags {
        lines.push(format!("## {}", tag));
        lines.push(String::new());
        let mut listed = by_tag.remove(tag).unwrap_or_default();
        listed.sort_by_key(|e| e.title.to_lowercase());
        for e in listed {
            lines.push(format!("- {} ({}, {})", e.link(), e.entry_type, e.domain));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn doc(title: &str, ty: &str, domain: &str, tags: &str) -> String {
        format!(
            "---\ntitle: {}\ntype: {}\ndomain: {}\ntags: {}\nconfidence: high\n---\n## Problem\nWhy {} matters.\n",
            title, ty, domain, tags, title
        )
    }

    fn entry(path: &str, text: &str) -> IndexEntry {
        IndexEntry::from_document(path, "stem", text).unwrap()
    }

    #[test]
    fn from_document_reads_fields_and_summary() {
        let e = entry("entries/patterns/a.md", &doc("Alpha", "pattern", "devops", "[x, y]"));
        assert_eq!(e.title, "Alpha");
        assert_eq!(e.entry_type, "pattern");
        assert_eq!(e.tags, vec!["x", "y"]);
        assert_eq!(e.summary, "Why Alpha matters.");
    }

    #[test]
    fn from_document_skips_unparsable_header() {
        assert!(IndexEntry::from_document("p", "s", "no header here").is_none());
        assert!(IndexEntry::from_document("p", "s", "---\ntitle: open\n").is_none());
    }

    #[test]
    fn from_document_falls_back_to_stem_and_ignores_scalar_tags() {
        let e = IndexEntry::from_document("p", "my_stem", "---\ntags: solo\n---\n").unwrap();
        assert_eq!(e.title, "my_stem");
        assert!(e.tags.is_empty());
        assert_eq!(e.summary, "");
    }

    #[test]
    fn index_sorted_by_domain_type_title_case_insensitive() {
        let entries = vec![
            entry("c.md", &doc("zeta", "pattern", "devops", "[]")),
            entry("a.md", &doc("Beta", "debugging", "devops", "[]")),
            entry("b.md", &doc("alpha", "pattern", "devops", "[]")),
            entry("d.md", &doc("Omega", "tool", "General", "[]")),
        ];
        let out = render_index(&entries, day());
        let order: Vec<usize> = ["[Beta]", "[alpha]", "[zeta]", "[Omega]"]
            .iter()
            .map(|needle| out.find(needle).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]), "{}", out);
        assert!(out.contains("**4 entries**"));
        assert!(out.contains("_Auto-generated on 2026-10-17."));
    }

    #[test]
    fn index_row_layout() {
        let entries = vec![entry("entries/x.md", &doc("X", "tool", "devops", "[a, b]"))];
        let out = render_index(&entries, day());
        assert!(out.contains("| [X](entries/x.md) | tool | a, b | devops | high | Why X matters. |"));
    }

    #[test]
    fn tags_grouped_and_counted() {
        let entries = vec![
            entry("1.md", &doc("Second", "tool", "devops", "[rust, Async]")),
            entry("2.md", &doc("first", "pattern", "general", "[rust]")),
        ];
        assert_eq!(distinct_tags(&entries), 2);
        let out = render_tags(&entries, day());
        assert!(out.contains("**2 tags across 2 entries**"));
        let async_pos = out.find("## Async").unwrap();
        let rust_pos = out.find("## rust").unwrap();
        assert!(async_pos < rust_pos);
        let first = out.find("- [first](2.md) (pattern, general)").unwrap();
        let second = out.find("- [Second](1.md) (tool, devops)").unwrap();
        assert!(rust_pos < first && first < second);
    }

    #[test]
    fn repeated_tag_lists_entry_once() {
        let entries = vec![entry("1.md", &doc("Only", "tool", "devops", "[a, a]"))];
        let out = render_tags(&entries, day());
        assert_eq!(out.matches("- [Only]").count(), 1);
    }
}
