//! Filesystem layout of the knowledge base.
//!
//! Three zones live under the root: the flat inbox of pending `*.md`
//! files, the flat review area, and the permanent store (one subdirectory
//! per category). Files are placed with a write-temp, fsync, rename
//! sequence and the source is removed only after the rename succeeds, so a
//! crash leaves at worst a copy in both zones, never a partial file.

use anyhow::{anyhow, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use kb_curate_core::SlugRegistry;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;
use walkdir::WalkDir;

use crate::config::PathsConfig;

/// Create `dir` (and parents) if missing.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))
}

/// Create the root, inbox, review, and store directories.
pub fn init_layout(paths: &PathsConfig) -> Result<()> {
    for dir in [
        paths.root.clone(),
        paths.inbox_dir(),
        paths.review_dir(),
        paths.store_dir(),
    ] {
        ensure_dir(&dir)?;
    }
    Ok(())
}

/// Pending inbox files, sorted by file name.
///
/// Non-recursive; hidden files and anything not ending in `.md` are
/// ignored. Symlinks are followed; a dangling one is skipped with a
/// warning. A missing inbox yields an empty list.
pub fn inbox_snapshot(inbox: &Path) -> Result<Vec<PathBuf>> {
    if !inbox.exists() {
        return Ok(Vec::new());
    }
    let pattern = build_globset(&["*.md".to_string()])?;

    let mut files = Vec::new();
    let entries =
        fs::read_dir(inbox).with_context(|| format!("Failed to read inbox: {}", inbox.display()))?;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') || !pattern.is_match(&name) {
            continue;
        }
        let path = entry.path();
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => warn!("skipping {}: {}", path.display(), e),
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Every `*.md` file under the store, recursively, sorted by path.
/// A missing store yields an empty list.
pub fn store_files(store: &Path) -> Result<Vec<PathBuf>> {
    if !store.exists() {
        return Ok(Vec::new());
    }
    let include = build_globset(&["**/*.md".to_string()])?;
    let exclude = build_globset(&["**/.git/**".to_string()])?;

    let mut files = Vec::new();
    for entry in WalkDir::new(store) {
        let entry = entry.with_context(|| format!("Failed to scan store: {}", store.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(store).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();
        if exclude.is_match(&rel_str) || !include.is_match(&rel_str) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Registry seeded with the stem of every file in the store.
pub fn store_slugs(store: &Path) -> Result<SlugRegistry> {
    Ok(store_files(store)?
        .iter()
        .filter_map(|p| p.file_stem())
        .map(|s| s.to_string_lossy().to_string())
        .collect())
}

/// File stem as an owned string (empty if the path has none).
pub fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// File name as an owned string (empty if the path has none).
pub fn name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// `/`-separated path of `path` relative to `base`.
pub fn relative_link(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Read a UTF-8 text file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Replace `dest` with `content` through a temp file in the same directory.
pub fn write_atomic(dest: &Path, content: &str) -> Result<()> {
    let dir = dest
        .parent()
        .ok_or_else(|| anyhow!("No parent directory for {}", dest.display()))?;
    let tmp = dir.join(format!(".{}.{}.tmp", name_of(dest), Uuid::new_v4()));

    let written = File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(content.as_bytes())?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp, dest));

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("Failed to write {}", dest.display()));
    }
    Ok(())
}

/// Write `content` to `dest`, then remove `source`.
pub fn place(source: &Path, dest: &Path, content: &str) -> Result<()> {
    write_atomic(dest, content)?;
    fs::remove_file(source)
        .with_context(|| format!("Failed to remove {} after writing {}", source.display(), dest.display()))
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
