//! Search-term filtering shared by the store and in-process remotes.
//!
//! A term matches an item when its words appear, in order and
//! case-insensitively, in the item's name or description. Words may be
//! separated by anything, so `"android paging"` behaves like the SQL pattern
//! `%android%paging%`.

use pager_types::Item;

/// Escape character used in generated LIKE patterns.
pub(crate) const LIKE_ESCAPE: char = '\\';

/// Case-fold text for matching.
///
/// SQLite's LIKE only folds ASCII, so the store keeps folded copies of the
/// searchable columns and matches the folded pattern against them.
pub(crate) fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// A search term selecting items by name or description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    words: Vec<String>,
}

impl ItemFilter {
    /// Create a filter from a search term. Blank terms match everything.
    pub fn new(term: &str) -> Self {
        Self {
            words: term.split_whitespace().map(fold).collect(),
        }
    }

    /// A filter that matches every item.
    pub fn all() -> Self {
        Self::default()
    }

    /// Check whether the filter matches everything.
    pub fn is_match_all(&self) -> bool {
        self.words.is_empty()
    }

    /// SQL LIKE pattern for this filter, escaped with [`LIKE_ESCAPE`].
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::from("%");
        for word in &self.words {
            for c in word.chars() {
                if matches!(c, '%' | '_' | LIKE_ESCAPE) {
                    pattern.push(LIKE_ESCAPE);
                }
                pattern.push(c);
            }
            pattern.push('%');
        }
        pattern
    }

    /// Check an item against the filter in memory.
    pub fn matches(&self, item: &Item) -> bool {
        if self.is_match_all() {
            return true;
        }
        self.matches_text(&item.name)
            || item
                .description
                .as_deref()
                .is_some_and(|d| self.matches_text(d))
    }

    fn matches_text(&self, text: &str) -> bool {
        let haystack = fold(text);
        let mut rest = haystack.as_str();
        for word in &self.words {
            match rest.find(word.as_str()) {
                Some(at) => rest = &rest[at + word.len()..],
                None => return false,
            }
        }
        true
    }
}
