//! Cached items and their identity.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Stable identity of an item, as assigned by the remote source.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    /// Create an ItemId from its raw value.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A repository-like record cached from the remote source.
///
/// `stars` and `name` are the ranking attributes; every other field is
/// descriptive and carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identity.
    pub id: ItemId,
    /// Short name.
    pub name: String,
    /// Fully qualified name (e.g. `owner/name`).
    #[serde(default)]
    pub full_name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Canonical URL.
    #[serde(default)]
    pub url: String,
    /// Popularity score, the primary sort key.
    #[serde(default)]
    pub stars: i64,
    /// Fork count.
    #[serde(default)]
    pub forks: i64,
    /// Primary language, if known.
    #[serde(default)]
    pub language: Option<String>,
}

impl Item {
    /// Create an item with the given identity, name and score.
    ///
    /// Descriptive fields start empty; use the `with_*` builders to fill them.
    pub fn new(id: impl Into<ItemId>, name: &str, stars: i64) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            full_name: name.to_string(),
            description: None,
            url: String::new(),
            stars,
            forks: 0,
            language: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Set the fully qualified name.
    pub fn with_full_name(mut self, full_name: &str) -> Self {
        self.full_name = full_name.to_string();
        self
    }

    /// Set the primary language.
    pub fn with_language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    /// Compare two items in read order: score descending, then name, then id.
    ///
    /// The id tiebreak makes the order total, so every reader agrees on
    /// which item sits at a given position.
    pub fn read_order(&self, other: &Self) -> Ordering {
        other
            .stars
            .cmp(&self.stars)
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.id.cmp(&other.id))
    }
}
