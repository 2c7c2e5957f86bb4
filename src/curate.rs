//! Inbox curation batch.
//!
//! Snapshots the inbox, seeds the slug registry from the store, and takes
//! each pending document (in file-name order) to exactly one terminal zone:
//!
//! ```text
//!                 ┌─ invalid ────────┐
//! _inbox/x.md ──▶ ├─ uncategorized ──┼──▶ _review/x.md   (review note prepended)
//!                 ├─ duplicate ──────┘
//!                 └─ promoted ───────────▶ entries/{category}/{slug}.md  (`updated` set)
//! ```
//!
//! The source is removed from the inbox after every terminal write.
//! Per-document failures never abort the batch; I/O failures do.
//!
//! Curation assumes a single writer. Two batches running against the same
//! knowledge base at once are not coordinated.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use kb_curate_core::header::set_field;
use kb_curate_core::review::annotate;
use kb_curate_core::{Curator, Outcome};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::Config;
use crate::progress::{CurateProgressEvent, CurateProgressReporter};
use crate::store;

/// Per-outcome counts for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurateSummary {
    pub promoted: usize,
    pub invalid: usize,
    pub uncategorized: usize,
    pub duplicates: usize,
}

impl CurateSummary {
    /// Documents sent to review for a reason other than a duplicate slug.
    pub fn review(&self) -> usize {
        self.invalid + self.uncategorized
    }

    pub fn total(&self) -> usize {
        self.promoted + self.review() + self.duplicates
    }

    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Promoted { .. } => self.promoted += 1,
            Outcome::Invalid { .. } => self.invalid += 1,
            Outcome::Uncategorized { .. } => self.uncategorized += 1,
            Outcome::Duplicate { .. } => self.duplicates += 1,
        }
    }

    /// Commit message body, e.g. `2 promoted, 1 to review`.
    pub fn commit_summary(&self) -> String {
        let mut parts = Vec::new();
        if self.promoted > 0 {
            parts.push(format!("{} promoted", self.promoted));
        }
        if self.review() > 0 {
            parts.push(format!("{} to review", self.review()));
        }
        if self.duplicates > 0 {
            parts.push(format!("{} duplicates", self.duplicates));
        }
        if parts.is_empty() {
            "index rebuild only".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// What happened to one inbox document.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub file_name: String,
    pub outcome: Outcome,
    pub dest: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct CurateReport {
    pub documents: Vec<DocumentReport>,
    pub summary: CurateSummary,
}

#[derive(Debug, Clone, Copy)]
pub struct CurateOptions {
    /// Stamped into `updated` and review notes.
    pub run_date: NaiveDate,
    /// Decide every outcome without touching the filesystem.
    pub dry_run: bool,
}

/// Run one curation batch over the configured inbox.
pub fn run_curate(
    config: &Config,
    options: &CurateOptions,
    progress: &dyn CurateProgressReporter,
) -> Result<CurateReport> {
    let inbox = config.paths.inbox_dir();
    let review = config.paths.review_dir();
    let store_dir = config.paths.store_dir();

    if !options.dry_run {
        store::ensure_dir(&inbox)?;
        store::ensure_dir(&review)?;
    }

    let pending = store::inbox_snapshot(&inbox)?;
    progress.report(CurateProgressEvent::Started {
        pending: pending.len(),
    });

    let mut report = CurateReport::default();
    if pending.is_empty() {
        info!("no files found in {}", inbox.display());
        return Ok(report);
    }

    let registry = store::store_slugs(&store_dir)?;
    debug!("seeded slug registry with {} existing entries", registry.len());
    let mut curator = Curator::new(&config.schema, &config.categories, registry);

    let date = options.run_date.format("%Y-%m-%d").to_string();
    let total = pending.len();

    for (i, source) in pending.iter().enumerate() {
        let file_name = store::name_of(source);
        let text = store::read_text(source)?;
        let outcome = curator.decide(&store::stem_of(source), &text);

        let (dest, content) = match &outcome {
            Outcome::Promoted { category, slug } => {
                let dir = store_dir.join(category);
                let content = set_field(&text, "updated", &date)
                    .with_context(|| format!("Failed to stamp {}", source.display()))?;
                (dir.join(format!("{}.md", slug)), content)
            }
            other => {
                let reasons = other.review_reasons().unwrap_or_default();
                (
                    review.join(&file_name),
                    annotate(&text, options.run_date, &reasons),
                )
            }
        };

        if !options.dry_run {
            if let Some(parent) = dest.parent() {
                store::ensure_dir(parent)?;
            }
            store::place(source, &dest, &content)?;
        }
        debug!("{} -> {} ({})", file_name, dest.display(), outcome.label());

        progress.report(CurateProgressEvent::Decided {
            n: i + 1,
            total,
            file: file_name.clone(),
            outcome: outcome.clone(),
            dest: store::relative_link(&dest, &config.paths.root),
        });

        report.summary.record(&outcome);
        report.documents.push(DocumentReport {
            file_name,
            outcome,
            dest,
        });
    }

    info!(
        "curated {} documents: {}",
        report.summary.total(),
        report.summary.commit_summary()
    );
    Ok(report)
}
