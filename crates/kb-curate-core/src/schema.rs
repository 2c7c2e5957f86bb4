//! Entry schema: controlled vocabularies, required fields, section profiles,
//! and the type → category directory mapping.
//!
//! Both [`Schema`] and [`CategoryMap`] deserialize from TOML tables; any
//! key left out falls back to the built-in knowledge-base vocabulary.

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// Validation vocabulary for knowledge entries.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Schema {
    /// Fields that must be present and non-empty, checked in this order.
    pub required_fields: Vec<String>,
    pub types: BTreeSet<String>,
    pub domains: BTreeSet<String>,
    pub confidence: BTreeSet<String>,
    /// Types that always use the quick section profile.
    pub quick_types: BTreeSet<String>,
    /// `complexity` value that selects the quick section profile.
    pub quick_complexity: String,
    pub standard_sections: Vec<String>,
    pub quick_sections: Vec<String>,
}

fn owned<const N: usize>(items: [&'static str; N]) -> impl Iterator<Item = String> {
    items.into_iter().map(str::to_string)
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            required_fields: owned(["title", "type", "tags", "domain", "created", "confidence"])
                .collect(),
            types: owned([
                "pattern",
                "decision",
                "domain",
                "integration",
                "debugging",
                "tool",
                "research",
            ])
            .collect(),
            domains: owned([
                "optical-networking",
                "software-engineering",
                "ml-ai",
                "devops",
                "research-methods",
                "general",
            ])
            .collect(),
            confidence: owned(["low", "medium", "high"]).collect(),
            quick_types: owned(["debugging", "tool"]).collect(),
            quick_complexity: "low".to_string(),
            standard_sections: owned(["Problem", "Approach", "Recipe"]).collect(),
            quick_sections: owned(["Problem", "Solution"]).collect(),
        }
    }
}

/// Which section profile an entry is held to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Quick,
    Standard,
}

impl Profile {
    pub fn label(self) -> &'static str {
        match self {
            Profile::Quick => "quick",
            Profile::Standard => "standard",
        }
    }
}

impl Schema {
    /// Quick if `complexity` equals the quick value or `type` is a quick type.
    pub fn profile(&self, entry_type: Option<&str>, complexity: Option<&str>) -> Profile {
        let low = complexity == Some(self.quick_complexity.as_str());
        let quick_type = entry_type.is_some_and(|t| self.quick_types.contains(t));
        if low || quick_type {
            Profile::Quick
        } else {
            Profile::Standard
        }
    }

    pub fn required_sections(&self, profile: Profile) -> &[String] {
        match profile {
            Profile::Quick => &self.quick_sections,
            Profile::Standard => &self.standard_sections,
        }
    }
}

/// Maps an entry `type` to its store subdirectory.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CategoryMap(BTreeMap<String, String>);

impl Default for CategoryMap {
    fn default() -> Self {
        Self(
            [
                ("pattern", "patterns"),
                ("decision", "decisions"),
                ("domain", "domain"),
                ("integration", "integrations"),
                ("debugging", "debugging"),
                ("tool", "tools"),
                ("research", "research"),
            ]
            .into_iter()
            .map(|(t, dir)| (t.to_string(), dir.to_string()))
            .collect(),
        )
    }
}

impl CategoryMap {
    pub fn category_for(&self, entry_type: &str) -> Option<&str> {
        self.0.get(entry_type).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(t, d)| (t.as_str(), d.as_str()))
    }

    /// Schema types with no directory.
    pub fn unmapped<'a>(&self, schema: &'a Schema) -> Vec<&'a str> {
        schema
            .types
            .iter()
            .filter(|t| !self.0.contains_key(*t))
            .map(String::as_str)
            .collect()
    }
}

impl FromIterator<(String, String)> for CategoryMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
