//! TOML configuration.
//!
//! ```toml
//! [paths]
//! root = "."          # relative to this file
//! inbox = "_inbox"    # relative to root
//! review = "_review"
//! store = "entries"
//! index = "index.md"
//! tags = "tags.md"
//!
//! [schema]
//! quick_types = ["debugging", "tool"]
//!
//! [categories]
//! pattern = "patterns"
//! tool = "tools"
//!
//! [git]
//! message_prefix = "knowledge: curate"
//! push = true
//! ```
//!
//! Every table is optional. A `[categories]` table replaces the built-in
//! mapping as a whole; `[schema]` keys override individually.

use anyhow::{bail, Context, Result};
use kb_curate_core::{CategoryMap, Schema};
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub schema: Schema,
    #[serde(default)]
    pub categories: CategoryMap,
    #[serde(default)]
    pub git: GitConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_inbox")]
    pub inbox: PathBuf,
    #[serde(default = "default_review")]
    pub review: PathBuf,
    #[serde(default = "default_store")]
    pub store: PathBuf,
    #[serde(default = "default_index")]
    pub index: PathBuf,
    #[serde(default = "default_tags")]
    pub tags: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            inbox: default_inbox(),
            review: default_review(),
            store: default_store(),
            index: default_index(),
            tags: default_tags(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_inbox() -> PathBuf {
    PathBuf::from("_inbox")
}
fn default_review() -> PathBuf {
    PathBuf::from("_review")
}
fn default_store() -> PathBuf {
    PathBuf::from("entries")
}
fn default_index() -> PathBuf {
    PathBuf::from("index.md")
}
fn default_tags() -> PathBuf {
    PathBuf::from("tags.md")
}

impl PathsConfig {
    pub fn inbox_dir(&self) -> PathBuf {
        self.root.join(&self.inbox)
    }

    pub fn review_dir(&self) -> PathBuf {
        self.root.join(&self.review)
    }

    pub fn store_dir(&self) -> PathBuf {
        self.root.join(&self.store)
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(&self.index)
    }

    pub fn tags_path(&self) -> PathBuf {
        self.root.join(&self.tags)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GitConfig {
    #[serde(default = "default_message_prefix")]
    pub message_prefix: String,
    #[serde(default = "default_push")]
    pub push: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            message_prefix: default_message_prefix(),
            push: default_push(),
        }
    }
}

fn default_message_prefix() -> String {
    "knowledge: curate".to_string()
}
fn default_push() -> bool {
    true
}

impl Config {
    /// Built-in defaults rooted at `root`.
    pub fn minimal(root: impl Into<PathBuf>) -> Self {
        let mut config = Config::default();
        config.paths.root = root.into();
        config
    }
}

/// Load and validate the configuration at `path`.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    parse_config(&content, base)
}

/// Load `path` if it exists, otherwise fall back to defaults rooted at `.`.
pub fn load_or_minimal(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        debug!(
            "config file {} not found, using defaults rooted at .",
            path.display()
        );
        let config = Config::minimal(".");
        check(&config)?;
        Ok(config)
    }
}

/// Parse TOML `content`, resolving a relative `paths.root` against `base`.
pub fn parse_config(content: &str, base: &Path) -> Result<Config> {
    let mut config: Config =
        toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.paths.root.is_relative() {
        config.paths.root = base.join(&config.paths.root);
    }

    check(&config)?;
    Ok(config)
}

fn check(config: &Config) -> Result<()> {
    if config.schema.quick_sections.is_empty() {
        bail!("schema.quick_sections must not be empty");
    }
    if config.schema.standard_sections.is_empty() {
        bail!("schema.standard_sections must not be empty");
    }

    for (entry_type, dir) in config.categories.iter() {
        if !is_plain_dir_name(dir) {
            bail!(
                "categories.{} must be a plain directory name, got '{}'",
                entry_type,
                dir
            );
        }
    }

    let paths = &config.paths;
    let dirs = [
        ("inbox", normalize(&paths.inbox_dir())),
        ("review", normalize(&paths.review_dir())),
        ("store", normalize(&paths.store_dir())),
    ];
    for (i, (a_name, a)) in dirs.iter().enumerate() {
        for (b_name, b) in dirs.iter().skip(i + 1) {
            if a == b {
                bail!("paths.{} and paths.{} resolve to the same directory", a_name, b_name);
            }
            if a.starts_with(b) {
                bail!("paths.{} must not be inside paths.{}", a_name, b_name);
            }
            if b.starts_with(a) {
                bail!("paths.{} must not be inside paths.{}", b_name, a_name);
            }
        }
    }

    let unmapped = config.categories.unmapped(&config.schema);
    if !unmapped.is_empty() {
        warn!(
            "types without a category directory (entries of these types will be sent to review): {}",
            unmapped.join(", ")
        );
    }

    Ok(())
}

fn is_plain_dir_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// Lexical normalization: drops `.` components and resolves `..` where possible.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
