//! Version-control trigger: stage, commit, and push the knowledge base.
//!
//! Runs the `git` executable in the knowledge-base root. A commit with
//! nothing staged counts as success. File moves already made by the batch
//! are never rolled back when git fails.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::{Command, Output};

use crate::config::GitConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed { message: String, pushed: bool },
    NothingToCommit,
}

/// Stage everything under `root`, commit with `{prefix} -- {summary}`, and push.
pub fn commit_and_push(root: &Path, git: &GitConfig, summary: &str) -> Result<CommitOutcome> {
    let message = format!("{} -- {}", git.message_prefix, summary);

    let output = run_git(root, &["add", "-A"])?;
    if !output.status.success() {
        bail!("git add failed: {}", stderr_of(&output));
    }

    let output = run_git(root, &["commit", "-m", &message])?;
    if !output.status.success() {
        if mentions_nothing_to_commit(&output) {
            return Ok(CommitOutcome::NothingToCommit);
        }
        bail!("git commit failed: {}", stderr_of(&output));
    }

    if git.push {
        let output = run_git(root, &["push"])?;
        if !output.status.success() {
            bail!("git push failed: {}", stderr_of(&output));
        }
    }

    Ok(CommitOutcome::Committed {
        message,
        pushed: git.push,
    })
}

fn run_git(root: &Path, args: &[&str]) -> Result<Output> {
    Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .with_context(|| format!("Failed to execute 'git {}'. Is git installed?", args[0]))
}

fn stderr_of(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    } else {
        stderr
    }
}

/// git reports an empty commit on stdout or stderr depending on version.
fn mentions_nothing_to_commit(output: &Output) -> bool {
    [&output.stdout, &output.stderr]
        .iter()
        .any(|stream| String::from_utf8_lossy(stream).contains("nothing to commit"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn git_available() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    fn init_repo(dir: &Path) {
        for args in [
            vec!["init", "-q"],
            vec!["config", "user.email", "kb@example.com"],
            vec!["config", "user.name", "kb"],
        ] {
            let out = run_git(dir, &args).unwrap();
            assert!(out.status.success());
        }
    }

    #[test]
    fn commits_then_reports_nothing_to_commit() {
        if !git_available() {
            return;
        }
        let tmp = TempDir::new().unwrap();
        init_repo(tmp.path());
        fs::write(tmp.path().join("index.md"), "# Index\n").unwrap();

        let git = GitConfig {
            push: false,
            ..GitConfig::default()
        };
        let first = commit_and_push(tmp.path(), &git, "1 promoted").unwrap();
        assert_eq!(
            first,
            CommitOutcome::Committed {
                message: "knowledge: curate -- 1 promoted".to_string(),
                pushed: false
            }
        );

        let second = commit_and_push(tmp.path(), &git, "index rebuild only").unwrap();
        assert_eq!(second, CommitOutcome::NothingToCommit);
    }

    #[test]
    fn outside_a_repository_is_an_error() {
        if !git_available() {
            return;
        }
        let tmp = TempDir::new().unwrap();
        let git = GitConfig {
            push: false,
            ..GitConfig::default()
        };
        assert!(commit_and_push(tmp.path(), &git, "x").is_err());
    }
}
