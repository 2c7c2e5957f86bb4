use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn kbc_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("kbc");
    path
}

const VALID: &str = "---
title: Connection pool sizing
type: pattern
tags: [postgres, pooling]
domain: software-engineering
created: 2026-03-02
confidence: high
---

## Problem

Too many idle connections exhaust the server.

## Approach

Size the pool from measured concurrency.

## Recipe

1. Measure.
2. Cap.
";

fn setup_test_env() -> (TempDir, PathBuf, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("kb.toml");
    fs::write(
        &config_path,
        r#"
[paths]
root = "kb"

[git]
push = false
"#,
    )
    .unwrap();
    let root = tmp.path().join("kb");
    (tmp, config_path, root)
}

fn run_kbc(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = kbc_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("--progress")
        .arg("off")
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run kbc binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_init_creates_layout() {
    let (_tmp, config_path, root) = setup_test_env();

    let (stdout, stderr, success) = run_kbc(&config_path, &["init"]);
    assert!(success, "init failed: {}", stderr);
    assert!(stdout.contains("Knowledge base initialized"));
    assert!(root.join("_inbox").is_dir());
    assert!(root.join("_review").is_dir());
    assert!(root.join("entries").is_dir());

    // idempotent
    let (_, stderr, success) = run_kbc(&config_path, &["init"]);
    assert!(success, "second init failed: {}", stderr);
}

#[test]
fn test_curate_promotes_reviews_and_indexes() {
    let (_tmp, config_path, root) = setup_test_env();
    run_kbc(&config_path, &["init"]);
    fs::write(root.join("_inbox/pool.md"), VALID).unwrap();
    fs::write(root.join("_inbox/stub.md"), "---\ntitle: Stub\n---\n").unwrap();

    let (stdout, stderr, success) = run_kbc(&config_path, &["curate"]);
    assert!(success, "curate failed: {}", stderr);
    assert!(stdout.contains("Promoted to entries:  1"), "{}", stdout);
    assert!(stdout.contains("Sent to review:       1"), "{}", stdout);
    assert!(stdout.contains("Total entries now:    1"), "{}", stdout);

    assert!(root.join("entries/patterns/connection_pool_sizing.md").exists());
    assert!(root.join("_review/stub.md").exists());
    assert!(!root.join("_inbox/pool.md").exists());

    let index = fs::read_to_string(root.join("index.md")).unwrap();
    assert!(index.contains("[Connection pool sizing](entries/patterns/connection_pool_sizing.md)"));
    let tags = fs::read_to_string(root.join("tags.md")).unwrap();
    assert!(tags.contains("## pooling"));
}

#[test]
fn test_curate_dry_run_leaves_inbox() {
    let (_tmp, config_path, root) = setup_test_env();
    run_kbc(&config_path, &["init"]);
    fs::write(root.join("_inbox/pool.md"), VALID).unwrap();

    let (stdout, stderr, success) = run_kbc(&config_path, &["curate", "--dry-run"]);
    assert!(success, "dry run failed: {}", stderr);
    assert!(stdout.contains("dry run"));
    assert!(root.join("_inbox/pool.md").exists());
    assert!(!root.join("index.md").exists());
}

#[test]
fn test_curate_empty_inbox() {
    let (_tmp, config_path, _root) = setup_test_env();

    let (stdout, stderr, success) = run_kbc(&config_path, &["curate"]);
    assert!(success, "curate failed: {}", stderr);
    assert!(stdout.contains("Promoted to entries:  0"));
    assert!(stdout.contains("Total entries now:    0"));
}

#[test]
fn test_validate_single_file_exit_codes() {
    let (tmp, config_path, _root) = setup_test_env();
    let good = tmp.path().join("good.md");
    let bad = tmp.path().join("bad.md");
    fs::write(&good, VALID).unwrap();
    fs::write(&bad, VALID.replace("confidence: high", "confidence: certain")).unwrap();

    let (stdout, _, success) = run_kbc(&config_path, &["validate", good.to_str().unwrap()]);
    assert!(success);
    assert!(stdout.contains("PASS"));

    let (stdout, _, success) = run_kbc(&config_path, &["validate", bad.to_str().unwrap()]);
    assert!(!success);
    assert!(stdout.contains("FAIL"));
    assert!(stdout.contains("Invalid confidence: 'certain'. Must be one of: high, low, medium"));

    let missing = tmp.path().join("missing.md");
    let (stdout, _, success) = run_kbc(&config_path, &["validate", missing.to_str().unwrap()]);
    assert!(!success);
    assert!(stdout.contains("File not found"));
}

#[test]
fn test_validate_all_reports_totals() {
    let (_tmp, config_path, root) = setup_test_env();
    let patterns = root.join("entries/patterns");
    fs::create_dir_all(&patterns).unwrap();
    fs::write(patterns.join("pool.md"), VALID).unwrap();

    let (stdout, _, success) = run_kbc(&config_path, &["validate", "--all"]);
    assert!(success);
    assert!(stdout.contains("Results: 1 passed, 0 failed, 1 total"), "{}", stdout);

    fs::write(patterns.join("broken.md"), "no header").unwrap();
    let (stdout, _, success) = run_kbc(&config_path, &["validate", "--all"]);
    assert!(!success);
    assert!(stdout.contains("Results: 1 passed, 1 failed, 2 total"), "{}", stdout);
}

#[test]
fn test_validate_all_without_store_fails() {
    let (_tmp, config_path, _root) = setup_test_env();
    let (_, stderr, success) = run_kbc(&config_path, &["validate", "--all"]);
    assert!(!success);
    assert!(stderr.contains("store directory not found"));
}

#[test]
fn test_validate_requires_target() {
    let (_tmp, config_path, _root) = setup_test_env();
    let (_, _, success) = run_kbc(&config_path, &["validate"]);
    assert!(!success);
}

#[test]
fn test_index_and_status() {
    let (_tmp, config_path, root) = setup_test_env();
    let patterns = root.join("entries/patterns");
    fs::create_dir_all(&patterns).unwrap();
    fs::create_dir_all(root.join("_inbox")).unwrap();
    fs::write(patterns.join("pool.md"), VALID).unwrap();
    fs::write(root.join("_inbox/later.md"), VALID).unwrap();

    let (stdout, stderr, success) = run_kbc(&config_path, &["index"]);
    assert!(success, "index failed: {}", stderr);
    assert!(stdout.contains("1 entries indexed"));
    assert!(stdout.contains("2 unique tags"));
    assert!(root.join("index.md").exists());

    let (stdout, stderr, success) = run_kbc(&config_path, &["status"]);
    assert!(success, "status failed: {}", stderr);
    assert!(stdout.contains("Pending:     1"));
    assert!(stdout.contains("Entries:     1"));
    assert!(stdout.contains("patterns"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("kb.toml");
    fs::write(&config_path, "[schema]\nquick_sections = []\n").unwrap();

    let (_, stderr, success) = run_kbc(&config_path, &["status"]);
    assert!(!success);
    assert!(stderr.contains("quick_sections"));
}
