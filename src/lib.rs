//! # kb-curate
//!
//! Curation for a directory-based markdown knowledge base.
//!
//! Untriaged entries land in an inbox. Each one is validated against the
//! entry schema (header fields plus required `##` sections) and either
//! promoted into the categorized permanent store or routed to a review
//! area with the reasons it failed prepended. After every batch the master
//! index and the tag listing are regenerated from the store.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────────────────────┐   ┌──────────────────┐
//! │  _inbox  │──▶│ Curator                │──▶│ entries/{cat}/   │
//! │  *.md    │   │ validate → categorize  │   │ {slug}.md        │
//! └──────────┘   │ → slug → dedupe        │   └────────┬─────────┘
//!                └───────────┬────────────┘            │
//!                            ▼                         ▼
//!                      ┌──────────┐          ┌──────────────────┐
//!                      │ _review  │          │ index.md tags.md │
//!                      └──────────┘          └──────────────────┘
//! ```
//!
//! Parsing, validation, slugs, and rendering live in the I/O-free
//! `kb-curate-core` crate; this crate owns directories, configuration,
//! progress output, and git.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`store`] | Inbox snapshot, store scan, atomic placement |
//! | [`curate`] | Curation batch over the inbox |
//! | [`index`] | `index.md` / `tags.md` regeneration |
//! | [`check`] | Validation-only verdicts |
//! | [`git`] | Commit and push after a batch |
//! | [`progress`] | Per-document progress reporting |
//! | [`status`] | Zone counts overview |

pub mod check;
pub mod config;
pub mod curate;
pub mod git;
pub mod index;
pub mod progress;
pub mod status;
pub mod store;
