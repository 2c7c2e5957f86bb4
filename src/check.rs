//! Validation-only path: check entries without moving anything.

use anyhow::{bail, Result};
use kb_curate_core::{validate, ValidationResult};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::store;

/// Validate one file on disk.
///
/// A missing path or a non-`.md` extension is reported as a failing
/// result rather than an error.
pub fn check_file(config: &Config, path: &Path) -> Result<ValidationResult> {
    if !path.exists() {
        return Ok(ValidationResult::failure(format!(
            "File not found: {}",
            path.display()
        )));
    }
    if path.extension().and_then(|e| e.to_str()) != Some("md") {
        return Ok(ValidationResult::failure(format!(
            "Not a markdown file: {}",
            path.display()
        )));
    }
    let text = store::read_text(path)?;
    Ok(validate(&text, &config.schema))
}

/// Verdicts for every file in the store, in path order.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub results: Vec<(PathBuf, ValidationResult)>,
}

impl CheckReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|(_, r)| r.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}

/// Validate every entry in the store. The store must exist.
pub fn check_store(config: &Config) -> Result<CheckReport> {
    let store_dir = config.paths.store_dir();
    if !store_dir.is_dir() {
        bail!("store directory not found at {}", store_dir.display());
    }
    let mut report = CheckReport::default();
    for path in store::store_files(&store_dir)? {
        let result = check_file(config, &path)?;
        report.results.push((path, result));
    }
    Ok(report)
}

/// Print the verdict for one file. Returns whether it passed.
pub fn run_check_file(config: &Config, path: &Path) -> Result<bool> {
    let result = check_file(config, path)?;
    let shown = path
        .strip_prefix(&config.paths.root)
        .unwrap_or(path)
        .display()
        .to_string();
    if result.passed {
        println!("PASS  {}", shown);
    } else {
        println!("FAIL  {}", shown);
        for err in &result.errors {
            println!("  - {}", err);
        }
    }
    Ok(result.passed)
}

/// Print verdicts for the whole store. Returns whether every file passed.
pub fn run_check_all(config: &Config) -> Result<bool> {
    let report = check_store(config)?;
    if report.results.is_empty() {
        println!(
            "No .md files found in {}",
            config.paths.store_dir().display()
        );
        return Ok(true);
    }

    for (path, result) in &report.results {
        let shown = store::relative_link(path, &config.paths.root);
        if result.passed {
            println!("  PASS  {}", shown);
        } else {
            println!("  FAIL  {}", shown);
            for err in &result.errors {
                println!("        - {}", err);
            }
        }
    }

    println!();
    println!(
        "Results: {} passed, {} failed, {} total",
        report.passed(),
        report.failed(),
        report.results.len()
    );
    Ok(report.all_passed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn file_prechecks() {
        let tmp = TempDir::new().unwrap();
        let config = Config::minimal(tmp.path());

        let missing = check_file(&config, &tmp.path().join("gone.md")).unwrap();
        assert!(!missing.passed);
        assert!(missing.errors[0].starts_with("File not found"));

        let txt = tmp.path().join("notes.txt");
        fs::write(&txt, "---\n---\n").unwrap();
        let wrong = check_file(&config, &txt).unwrap();
        assert!(wrong.errors[0].starts_with("Not a markdown file"));
    }

    #[test]
    fn store_must_exist() {
        let tmp = TempDir::new().unwrap();
        let config = Config::minimal(tmp.path());
        assert!(check_store(&config).is_err());
    }
}
