//! Batch-scoped registry of slugs already present in the permanent store.

use std::collections::BTreeSet;

/// The set of taken slugs for one curation batch.
///
/// Seeded once from a full store scan; the only mutation is [`insert`],
/// called when an entry is promoted. Two inbox documents resolving to the
/// same slug therefore conflict in processing order.
///
/// [`insert`]: SlugRegistry::insert
#[derive(Debug, Clone, Default)]
pub struct SlugRegistry {
    taken: BTreeSet<String>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.taken.contains(slug)
    }

    /// Claim `slug`. Returns `false` if it was already taken.
    pub fn insert(&mut self, slug: impl Into<String>) -> bool {
        self.taken.insert(slug.into())
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SlugRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            taken: iter.into_iter().map(Into::into).collect(),
        }
    }
}
