//! Knowledge-base overview for `kbc status`.

use anyhow::Result;
use std::collections::BTreeMap;

use crate::config::Config;
use crate::store;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Status {
    pub pending: usize,
    pub in_review: usize,
    pub entries: usize,
    /// Entry count per top-level store directory (`.` for files at the store root).
    pub by_category: BTreeMap<String, usize>,
}

pub fn collect_status(config: &Config) -> Result<Status> {
    let store_dir = config.paths.store_dir();
    let files = store::store_files(&store_dir)?;

    let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
    for path in &files {
        let link = store::relative_link(path, &store_dir);
        let category = match link.split_once('/') {
            Some((dir, _)) => dir.to_string(),
            None => ".".to_string(),
        };
        *by_category.entry(category).or_default() += 1;
    }

    Ok(Status {
        pending: store::inbox_snapshot(&config.paths.inbox_dir())?.len(),
        in_review: store::inbox_snapshot(&config.paths.review_dir())?.len(),
        entries: files.len(),
        by_category,
    })
}

pub fn print_status(config: &Config) -> Result<()> {
    let status = collect_status(config)?;

    println!("Knowledge Base Status");
    println!("=====================");
    println!();
    println!("  Root:        {}", config.paths.root.display());
    println!("  Pending:     {}", status.pending);
    println!("  In review:   {}", status.in_review);
    println!("  Entries:     {}", status.entries);

    if !status.by_category.is_empty() {
        println!();
        println!("  {:<24} {:>8}", "CATEGORY", "ENTRIES");
        println!("  {}", "-".repeat(33));
        for (category, count) in &status.by_category {
            println!("  {:<24} {:>8}", category, count);
        }
    }
    println!();
    Ok(())
}
