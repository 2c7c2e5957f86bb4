//! # kb-curate CLI (`kbc`)
//!
//! Curates a markdown knowledge base: promotes valid inbox entries into the
//! categorized store, routes failing ones to review, and keeps the index
//! and tag listings current.
//!
//! ## Usage
//!
//! ```bash
//! kbc --config ./kb.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `kbc init` | Create the inbox, review, and store directories |
//! | `kbc curate` | Process the inbox, then rebuild the index |
//! | `kbc curate --commit` | Same, then commit and push with git |
//! | `kbc validate <file>` | Validate a single entry |
//! | `kbc validate --all` | Validate every entry in the store |
//! | `kbc index` | Rebuild `index.md` and `tags.md` only |
//! | `kbc status` | Show pending, review, and store counts |
//!
//! Set `RUST_LOG=debug` for diagnostic logging on stderr.

use anyhow::{bail, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::process::ExitCode;

use kb_curate::check;
use kb_curate::config;
use kb_curate::curate::{self, CurateOptions};
use kb_curate::git::{self, CommitOutcome};
use kb_curate::index;
use kb_curate::progress::ProgressMode;
use kb_curate::status;
use kb_curate::store;

/// kb-curate: inbox curation for a markdown knowledge base.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. When the file does not exist, built-in defaults rooted at the
/// current directory are used.
#[derive(Parser)]
#[command(
    name = "kbc",
    about = "kb-curate: inbox curation for a markdown knowledge base",
    version,
    long_about = "Validates inbox entries against the knowledge-base schema, promotes valid \
    ones into the categorized store, routes the rest to review with diagnostics, and \
    regenerates the index and tag listings."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./kb.toml")]
    config: PathBuf,

    /// Progress output on stderr: `human`, `json`, or `off`.
    /// Defaults to `human` when stderr is a terminal, otherwise `off`.
    #[arg(long, global = true, value_parser = parse_progress)]
    progress: Option<ProgressMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the root, inbox, review, and store directories.
    ///
    /// Idempotent: existing directories are left alone.
    Init,

    /// Process every pending inbox entry, then rebuild the index.
    ///
    /// Each entry is promoted to `{store}/{category}/{slug}.md` or moved
    /// to the review directory with a diagnostic note prepended.
    Curate {
        /// Stage, commit, and push all changes afterwards.
        #[arg(long)]
        commit: bool,

        /// Decide every outcome without writing anything.
        #[arg(long, conflicts_with = "commit")]
        dry_run: bool,
    },

    /// Validate entries without moving them.
    ///
    /// Exits with status 1 if any checked entry fails.
    Validate {
        /// Entry file to validate.
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        file: Option<PathBuf>,

        /// Validate every entry in the store.
        #[arg(long)]
        all: bool,
    },

    /// Rebuild `index.md` and `tags.md` from the store.
    Index,

    /// Show pending, in-review, and stored entry counts.
    Status,

    /// Print a shell completion script.
    Completions {
        shell: Shell,
    },
}

fn parse_progress(s: &str) -> Result<ProgressMode, String> {
    ProgressMode::parse(s).ok_or_else(|| format!("invalid progress mode '{}': use human, json, or off", s))
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "kbc", &mut std::io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let cfg = config::load_or_minimal(&cli.config)?;
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Init => {
            store::init_layout(&cfg.paths)?;
            println!(
                "Knowledge base initialized at {}",
                cfg.paths.root.display()
            );
        }
        Commands::Curate { commit, dry_run } => {
            let mode = cli.progress.unwrap_or_else(ProgressMode::default_for_tty);
            let options = CurateOptions {
                run_date: today,
                dry_run,
            };
            let report = curate::run_curate(&cfg, &options, mode.reporter().as_ref())?;
            let summary = report.summary;

            let stats = if dry_run {
                None
            } else {
                Some(index::rebuild_index(&cfg, today)?)
            };

            println!("Summary{}", if dry_run { " (dry run, nothing written)" } else { "" });
            println!("{}", "=".repeat(60));
            println!("  Promoted to entries:  {}", summary.promoted);
            println!(
                "  Sent to review:       {} (invalid: {}, uncategorized: {})",
                summary.review(),
                summary.invalid,
                summary.uncategorized
            );
            println!("  Duplicates:           {}", summary.duplicates);
            if let Some(stats) = stats {
                println!("  Total entries now:    {}", stats.entries);
                println!("  Total unique tags:    {}", stats.tags);
            }

            if commit {
                match git::commit_and_push(&cfg.paths.root, &cfg.git, &summary.commit_summary())? {
                    CommitOutcome::Committed { message, pushed } => {
                        let verb = if pushed { "Committed and pushed" } else { "Committed" };
                        println!();
                        println!("{}: {}", verb, message);
                    }
                    CommitOutcome::NothingToCommit => {
                        println!();
                        println!("Nothing to commit.");
                    }
                }
            }
        }
        Commands::Validate { file, all } => {
            let passed = match (file, all) {
                (_, true) => check::run_check_all(&cfg)?,
                (Some(file), false) => check::run_check_file(&cfg, &file)?,
                (None, false) => bail!("pass a file to validate or --all"),
            };
            if !passed {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Index => {
            let stats = index::rebuild_index(&cfg, today)?;
            println!(
                "Rebuilt {} and {}",
                cfg.paths.index.display(),
                cfg.paths.tags.display()
            );
            println!("  {} entries indexed", stats.entries);
            println!("  {} unique tags", stats.tags);
        }
        Commands::Status => {
            status::print_status(&cfg)?;
        }
        Commands::Completions { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(ExitCode::SUCCESS)
}
