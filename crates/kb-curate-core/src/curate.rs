//! Promotion decisions for inbox entries.
//!
//! [`Curator::decide`] takes one pending document through
//! validate → categorize → slugify → deduplicate and returns its terminal
//! [`Outcome`]. It never touches the filesystem; the caller applies the
//! outcome. The curator owns the batch's [`SlugRegistry`], so a slug is
//! claimed the moment a document is decided as promoted and later
//! documents in the same batch see it as taken.

use crate::header::parse_header;
use crate::registry::SlugRegistry;
use crate::schema::{CategoryMap, Schema};
use crate::slug::slug_for;
use crate::validate::validate;

/// Terminal state of one inbox document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Goes to `{store}/{category}/{slug}.md`.
    Promoted { category: String, slug: String },
    /// Failed schema validation (or had no usable slug).
    Invalid { errors: Vec<String> },
    /// Valid, but its type has no category directory.
    Uncategorized { entry_type: String },
    /// Its slug is already taken in the store or earlier in the batch.
    Duplicate { slug: String },
}

impl Outcome {
    /// Reasons to write into the review note; `None` for promotions.
    pub fn review_reasons(&self) -> Option<Vec<String>> {
        match self {
            Outcome::Promoted { .. } => None,
            Outcome::Invalid { errors } => Some(errors.clone()),
            Outcome::Uncategorized { entry_type } => {
                Some(vec![format!("No category mapping for type: {}", entry_type)])
            }
            Outcome::Duplicate { slug } => Some(vec![format!(
                "Duplicate slug: '{}' already exists in the store. Merge manually or rename the title.",
                slug
            )]),
        }
    }

    /// Short label used in progress output.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Promoted { .. } => "promoted",
            Outcome::Invalid { .. } => "invalid",
            Outcome::Uncategorized { .. } => "uncategorized",
            Outcome::Duplicate { .. } => "duplicate",
        }
    }
}

pub struct Curator<'a> {
    schema: &'a Schema,
    categories: &'a CategoryMap,
    registry: SlugRegistry,
}

impl<'a> Curator<'a> {
    pub fn new(schema: &'a Schema, categories: &'a CategoryMap, registry: SlugRegistry) -> Self {
        Self {
            schema,
            categories,
            registry,
        }
    }

    pub fn registry(&self) -> &SlugRegistry {
        &self.registry
    }

    /// Decide the fate of the document `text` whose file stem is `stem`.
    pub fn decide(&mut self, stem: &str, text: &str) -> Outcome {
        let verdict = validate(text, self.schema);
        if !verdict.passed {
            return Outcome::Invalid {
                errors: verdict.errors,
            };
        }

        let header = match parse_header(text) {
            Ok(header) => header,
            Err(e) => {
                return Outcome::Invalid {
                    errors: vec![e.to_string()],
                }
            }
        };

        let entry_type = header.scalar("type").unwrap_or_default();
        let Some(category) = self.categories.category_for(entry_type) else {
            return Outcome::Uncategorized {
                entry_type: entry_type.to_string(),
            };
        };

        let title = header.scalar("title").unwrap_or_default();
        let Some(slug) = slug_for(title, stem) else {
            return Outcome::Invalid {
                errors: vec!["Cannot derive a slug from the title or filename".to_string()],
            };
        };

        if !self.registry.insert(slug.as_str()) {
            return Outcome::Duplicate { slug };
        }

        Outcome::Promoted {
            category: category.to_string(),
            slug,
        }
    }
}
