//! Snapshot of the data a reader currently has loaded.
//!
//! The read layer builds a fresh [`PagingState`] for every load request. It is
//! never mutated afterwards; the mediator only inspects it to find the item
//! whose continuation key decides which page to fetch next.

use pager_types::Item;

/// Number of items requested per remote page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Paging parameters shared by the read layer and the mediator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    /// Items requested per remote page.
    pub page_size: u32,
    /// How close to the last loaded item an access must land to trigger an append.
    pub prefetch_distance: u32,
    /// Items read back from the store right after a refresh.
    pub initial_load_size: u32,
}

impl PagingConfig {
    /// Create a config with the given page size and derived defaults.
    ///
    /// A zero page size is clamped to 1.
    pub fn new(page_size: u32) -> Self {
        let page_size = page_size.max(1);
        Self {
            page_size,
            prefetch_distance: page_size,
            initial_load_size: page_size.saturating_mul(3),
        }
    }

    /// Set the prefetch distance.
    pub fn with_prefetch_distance(mut self, distance: u32) -> Self {
        self.prefetch_distance = distance;
        self
    }

    /// Set the initial load size.
    pub fn with_initial_load_size(mut self, size: u32) -> Self {
        self.initial_load_size = size;
        self
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// One page of loaded items, in read order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Items in this page.
    pub items: Vec<Item>,
}

impl Page {
    /// Create a page from items.
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Check if the page has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Read-only view of loaded pages supplied to each load call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagingState {
    /// Loaded pages in read order.
    pub pages: Vec<Page>,
    /// Position of the last item the reader interacted with.
    pub anchor_position: Option<usize>,
    /// Paging parameters in effect.
    pub config: PagingConfig,
}

impl PagingState {
    /// Create a snapshot.
    pub fn new(pages: Vec<Page>, anchor_position: Option<usize>, config: PagingConfig) -> Self {
        Self {
            pages,
            anchor_position,
            config,
        }
    }

    /// Create a snapshot with no loaded pages and no anchor.
    pub fn empty(config: PagingConfig) -> Self {
        Self::new(Vec::new(), None, config)
    }

    /// Split items already in read order into pages of `config.page_size`.
    pub fn from_items(items: Vec<Item>, anchor_position: Option<usize>, config: PagingConfig) -> Self {
        let size = config.page_size.max(1) as usize;
        let pages = items
            .chunks(size)
            .map(|chunk| Page::new(chunk.to_vec()))
            .collect();
        Self::new(pages, anchor_position, config)
    }

    /// Check whether no items are loaded.
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(Page::is_empty)
    }

    /// Total number of loaded items across pages.
    pub fn item_count(&self) -> usize {
        self.pages.iter().map(|p| p.items.len()).sum()
    }

    /// First item of the first non-empty page.
    pub fn first_item_or_none(&self) -> Option<&Item> {
        self.pages.iter().find_map(|p| p.items.first())
    }

    /// Last item of the last non-empty page.
    pub fn last_item_or_none(&self) -> Option<&Item> {
        self.pages.iter().rev().find_map(|p| p.items.last())
    }

    /// Item closest to `position` in the concatenation of all pages.
    ///
    /// Positions past the end resolve to the last loaded item.
    pub fn closest_item_to_position(&self, position: usize) -> Option<&Item> {
        self.pages
            .iter()
            .flat_map(|p| p.items.iter())
            .nth(position)
            .or_else(|| self.last_item_or_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64) -> Item {
        Item::new(id, &format!("item-{}", id), 100 - id)
    }

    fn state(pages: Vec<Vec<i64>>) -> PagingState {
        PagingState::new(
            pages
                .into_iter()
                .map(|ids| Page::new(ids.into_iter().map(item).collect()))
                .collect(),
            None,
            PagingConfig::new(2),
        )
    }

    #[test]
    fn config_defaults_derive_from_page_size() {
        let config = PagingConfig::new(10);
        assert_eq!(config.prefetch_distance, 10);
        assert_eq!(config.initial_load_size, 30);
        assert_eq!(PagingConfig::default().page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        assert_eq!(PagingConfig::new(0).page_size, 1);
    }

    #[test]
    fn first_and_last_skip_empty_pages() {
        let s = state(vec![vec![], vec![1, 2], vec![3], vec![]]);

        assert_eq!(s.first_item_or_none().map(|i| i.id.value()), Some(1));
        assert_eq!(s.last_item_or_none().map(|i| i.id.value()), Some(3));
    }

    #[test]
    fn empty_state_has_no_boundary_items() {
        let s = state(vec![vec![], vec![]]);

        assert!(s.is_empty());
        assert!(s.first_item_or_none().is_none());
        assert!(s.last_item_or_none().is_none());
        assert!(s.closest_item_to_position(0).is_none());
    }

    #[test]
    fn closest_item_spans_pages() {
        let s = state(vec![vec![1, 2], vec![3, 4]]);

        assert_eq!(s.closest_item_to_position(0).map(|i| i.id.value()), Some(1));
        assert_eq!(s.closest_item_to_position(2).map(|i| i.id.value()), Some(3));
        assert_eq!(s.item_count(), 4);
    }

    #[test]
    fn closest_item_clamps_past_the_end() {
        let s = state(vec![vec![1, 2], vec![3]]);
        assert_eq!(s.closest_item_to_position(99).map(|i| i.id.value()), Some(3));
    }

    #[test]
    fn from_items_chunks_by_page_size() {
        let items = (1..=5).map(item).collect();
        let s = PagingState::from_items(items, Some(4), PagingConfig::new(2));

        assert_eq!(s.pages.len(), 3);
        assert_eq!(s.pages[2].items.len(), 1);
        assert_eq!(s.anchor_position, Some(4));
    }
}
