//! Rebuilds `index.md` and `tags.md` from the permanent store.
//!
//! Every store file is re-read with the shared header parser; files whose
//! header cannot be located are left out of both listings without error.

use anyhow::Result;
use chrono::NaiveDate;
use kb_curate_core::index::{distinct_tags, render_index, render_tags, IndexEntry};
use tracing::debug;

use crate::config::Config;
use crate::store;

/// Counts reported after a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub entries: usize,
    pub tags: usize,
}

/// Parse every entry in the store. Links are relative to the root.
pub fn scan_entries(config: &Config) -> Result<Vec<IndexEntry>> {
    let mut entries = Vec::new();
    for path in store::store_files(&config.paths.store_dir())? {
        let text = store::read_text(&path)?;
        let link = store::relative_link(&path, &config.paths.root);
        match IndexEntry::from_document(&link, &store::stem_of(&path), &text) {
            Some(entry) => entries.push(entry),
            None => debug!("skipping {}: no parsable header", link),
        }
    }
    Ok(entries)
}

/// Regenerate both listings, dated `on`.
pub fn rebuild_index(config: &Config, on: NaiveDate) -> Result<IndexStats> {
    let entries = scan_entries(config)?;

    store::ensure_dir(&config.paths.root)?;
    store::write_atomic(&config.paths.index_path(), &render_index(&entries, on))?;
    store::write_atomic(&config.paths.tags_path(), &render_tags(&entries, on))?;

    Ok(IndexStats {
        entries: entries.len(),
        tags: distinct_tags(&entries),
    })
}
