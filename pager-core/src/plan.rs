//! Page-key resolution for remote-pager.
//!
//! Deciding what to fetch is split into two pure steps so the mediator only
//! has to perform the key lookup in between:
//!
//! 1. [`boundary_item`] picks the item whose continuation key matters for a
//!    load direction (closest to the anchor, first loaded, or last loaded).
//! 2. [`resolve_target`] turns that item's key into a [`PagePlan`].
//!
//! After the fetch, [`PageMerge::from_response`] computes the continuation
//! keys for the new page and whether existing rows must be cleared.

use pager_types::{ContinuationKey, Item, ItemId, PageToken};
use std::fmt;
use thiserror::Error;

use crate::snapshot::PagingState;

/// Which edge of the loaded data a load extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadDirection {
    /// Replace everything, starting near the anchor.
    Refresh,
    /// Load the page before the first loaded item.
    Prepend,
    /// Load the page after the last loaded item.
    Append,
}

impl fmt::Display for LoadDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Refresh => "refresh",
            Self::Prepend => "prepend",
            Self::Append => "append",
        };
        f.write_str(name)
    }
}

/// Result of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOutcome {
    /// No further pages exist in the loaded direction.
    pub end_of_pagination_reached: bool,
}

impl LoadOutcome {
    /// Outcome for a load that may be followed by more pages.
    pub fn more_available() -> Self {
        Self {
            end_of_pagination_reached: false,
        }
    }

    /// Outcome for a load that exhausted its direction.
    pub fn end_of_pagination() -> Self {
        Self {
            end_of_pagination_reached: true,
        }
    }
}

/// The caller asked for a load its own state does not support.
///
/// These are contract violations by the read layer, not transient failures.
/// Retrying the same request cannot succeed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidState {
    /// Prepend or append was requested with nothing loaded.
    #[error("{direction} requested with no loaded items")]
    NoLoadedItems {
        /// The requested direction.
        direction: LoadDirection,
    },

    /// A loaded item has no continuation key in the store.
    #[error("no continuation key for item {item_id} during {direction}")]
    MissingKey {
        /// The requested direction.
        direction: LoadDirection,
        /// The boundary item lacking a key.
        item_id: ItemId,
    },

    /// Append was requested although the last item's page was the final one.
    #[error("append requested past the final page (item {item_id} has no next page)")]
    NoNextPage {
        /// The last loaded item.
        item_id: ItemId,
    },
}

/// What the mediator must do for a load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePlan {
    /// Fetch the given page.
    Fetch(PageToken),
    /// Nothing exists in this direction; report end of pagination without I/O.
    EndOfPagination,
}

/// The boundary item of a snapshot together with its stored key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    /// The boundary item.
    pub item_id: ItemId,
    /// Its continuation key, if the store has one.
    pub key: Option<ContinuationKey>,
}

impl Boundary {
    /// Create a boundary.
    pub fn new(item_id: ItemId, key: Option<ContinuationKey>) -> Self {
        Self { item_id, key }
    }
}

/// Pick the item whose continuation key decides the next page.
///
/// Refresh uses the item closest to the anchor and returns `None` when there
/// is no anchor yet. Prepend uses the first loaded item, append the last.
pub fn boundary_item(direction: LoadDirection, state: &PagingState) -> Option<&Item> {
    match direction {
        LoadDirection::Refresh => state
            .anchor_position
            .and_then(|position| state.closest_item_to_position(position)),
        LoadDirection::Prepend => state.first_item_or_none(),
        LoadDirection::Append => state.last_item_or_none(),
    }
}

/// Decide which page to fetch.
///
/// `boundary` is `None` when [`boundary_item`] found no item.
pub fn resolve_target(
    direction: LoadDirection,
    boundary: Option<Boundary>,
) -> Result<PagePlan, InvalidState> {
    match direction {
        LoadDirection::Refresh => {
            // A missing key or a final page falls back to the first page.
            let target = boundary
                .and_then(|b| b.key)
                .and_then(|key| key.next_page)
                .and_then(|next| next.previous())
                .unwrap_or(PageToken::STARTING);
            Ok(PagePlan::Fetch(target))
        }
        LoadDirection::Prepend => {
            let boundary = boundary.ok_or(InvalidState::NoLoadedItems { direction })?;
            let key = boundary.key.ok_or(InvalidState::MissingKey {
                direction,
                item_id: boundary.item_id,
            })?;
            Ok(match key.previous_page {
                Some(previous) => PagePlan::Fetch(previous),
                None => PagePlan::EndOfPagination,
            })
        }
        LoadDirection::Append => {
            let boundary = boundary.ok_or(InvalidState::NoLoadedItems { direction })?;
            let key = boundary.key.ok_or(InvalidState::MissingKey {
                direction,
                item_id: boundary.item_id,
            })?;
            key.next_page
                .map(PagePlan::Fetch)
                .ok_or(InvalidState::NoNextPage {
                    item_id: boundary.item_id,
                })
        }
    }
}

/// Rows to commit for one fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMerge {
    /// The page that was fetched.
    pub page: PageToken,
    /// Delete all existing items and keys before writing.
    pub clear_existing: bool,
    /// Fetched items, in remote order.
    pub items: Vec<Item>,
    /// One key per fetched item.
    pub keys: Vec<ContinuationKey>,
}

impl PageMerge {
    /// Build the merge for a fetched page.
    ///
    /// All keys share the same previous/next tokens and `fetched_at`. An empty
    /// response marks the end of pagination (`next_page = None`).
    pub fn from_response(
        direction: LoadDirection,
        page: PageToken,
        items: Vec<Item>,
        fetched_at: i64,
    ) -> Self {
        let end_of_pagination = items.is_empty();
        let previous_page = page.previous();
        // An overflowing token cannot address a later page either.
        let next_page = if end_of_pagination {
            None
        } else {
            page.next().ok()
        };

        let keys = items
            .iter()
            .map(|item| ContinuationKey {
                item_id: item.id,
                previous_page,
                next_page,
                fetched_at,
            })
            .collect();

        Self {
            page,
            clear_existing: direction == LoadDirection::Refresh,
            items,
            keys,
        }
    }

    /// Whether the fetched page was empty.
    pub fn end_of_pagination(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether committing this merge would change nothing.
    pub fn is_noop(&self) -> bool {
        !self.clear_existing && self.items.is_empty()
    }

    /// The outcome reported to the read layer.
    pub fn outcome(&self) -> LoadOutcome {
        LoadOutcome {
            end_of_pagination_reached: self.end_of_pagination(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Page, PagingConfig};

    fn token(value: u32) -> PageToken {
        PageToken::new(value).unwrap()
    }

    fn key(id: i64, previous: Option<u32>, next: Option<u32>) -> ContinuationKey {
        ContinuationKey {
            item_id: ItemId::new(id),
            previous_page: previous.map(token),
            next_page: next.map(token),
            fetched_at: 0,
        }
    }

    fn boundary(id: i64, key: Option<ContinuationKey>) -> Option<Boundary> {
        Some(Boundary::new(ItemId::new(id), key))
    }

    // ===========================================
    // Boundary Selection Tests
    // ===========================================

    #[test]
    fn refresh_without_anchor_has_no_boundary() {
        let state = PagingState::from_items(
            vec![Item::new(1, "a", 5)],
            None,
            PagingConfig::new(2),
        );
        assert!(boundary_item(LoadDirection::Refresh, &state).is_none());
    }

    #[test]
    fn refresh_uses_item_at_anchor() {
        let items = vec![Item::new(1, "a", 9), Item::new(2, "b", 8), Item::new(3, "c", 7)];
        let state = PagingState::from_items(items, Some(2), PagingConfig::new(2));

        let item = boundary_item(LoadDirection::Refresh, &state).unwrap();
        assert_eq!(item.id, ItemId::new(3));
    }

    #[test]
    fn prepend_and_append_use_edges() {
        let state = PagingState::new(
            vec![
                Page::default(),
                Page::new(vec![Item::new(1, "a", 9), Item::new(2, "b", 8)]),
                Page::new(vec![Item::new(3, "c", 7)]),
                Page::default(),
            ],
            None,
            PagingConfig::new(2),
        );

        assert_eq!(
            boundary_item(LoadDirection::Prepend, &state).map(|i| i.id),
            Some(ItemId::new(1))
        );
        assert_eq!(
            boundary_item(LoadDirection::Append, &state).map(|i| i.id),
            Some(ItemId::new(3))
        );
    }

    // ===========================================
    // Refresh Resolution Tests
    // ===========================================

    #[test]
    fn refresh_without_boundary_starts_at_first_page() {
        let plan = resolve_target(LoadDirection::Refresh, None).unwrap();
        assert_eq!(plan, PagePlan::Fetch(PageToken::STARTING));
    }

    #[test]
    fn refresh_reloads_the_anchor_page() {
        // Anchor item came from page 3, so its next key is 4.
        let plan =
            resolve_target(LoadDirection::Refresh, boundary(7, Some(key(7, Some(2), Some(4)))))
                .unwrap();
        assert_eq!(plan, PagePlan::Fetch(token(3)));
    }

    #[test]
    fn refresh_with_final_page_anchor_falls_back_to_start() {
        let plan =
            resolve_target(LoadDirection::Refresh, boundary(7, Some(key(7, Some(4), None))))
                .unwrap();
        assert_eq!(plan, PagePlan::Fetch(PageToken::STARTING));
    }

    #[test]
    fn refresh_with_missing_key_falls_back_to_start() {
        let plan = resolve_target(LoadDirection::Refresh, boundary(7, None)).unwrap();
        assert_eq!(plan, PagePlan::Fetch(PageToken::STARTING));
    }

    // ===========================================
    // Prepend Resolution Tests
    // ===========================================

    #[test]
    fn prepend_fetches_previous_page() {
        let plan =
            resolve_target(LoadDirection::Prepend, boundary(1, Some(key(1, Some(2), Some(4)))))
                .unwrap();
        assert_eq!(plan, PagePlan::Fetch(token(2)));
    }

    #[test]
    fn prepend_at_first_page_is_end_of_pagination() {
        let plan =
            resolve_target(LoadDirection::Prepend, boundary(1, Some(key(1, None, Some(2)))))
                .unwrap();
        assert_eq!(plan, PagePlan::EndOfPagination);
    }

    #[test]
    fn prepend_with_missing_key_is_invalid() {
        let err = resolve_target(LoadDirection::Prepend, boundary(1, None)).unwrap_err();
        assert_eq!(
            err,
            InvalidState::MissingKey {
                direction: LoadDirection::Prepend,
                item_id: ItemId::new(1),
            }
        );
    }

    #[test]
    fn prepend_with_nothing_loaded_is_invalid() {
        let err = resolve_target(LoadDirection::Prepend, None).unwrap_err();
        assert!(matches!(err, InvalidState::NoLoadedItems { .. }));
    }

    // ===========================================
    // Append Resolution Tests
    // ===========================================

    #[test]
    fn append_fetches_next_page() {
        let plan =
            resolve_target(LoadDirection::Append, boundary(9, Some(key(9, None, Some(2)))))
                .unwrap();
        assert_eq!(plan, PagePlan::Fetch(token(2)));
    }

    #[test]
    fn append_with_nothing_loaded_is_invalid() {
        let err = resolve_target(LoadDirection::Append, None).unwrap_err();
        assert_eq!(
            err,
            InvalidState::NoLoadedItems {
                direction: LoadDirection::Append
            }
        );
    }

    #[test]
    fn append_with_missing_key_is_invalid() {
        let err = resolve_target(LoadDirection::Append, boundary(9, None)).unwrap_err();
        assert!(matches!(err, InvalidState::MissingKey { .. }));
    }

    #[test]
    fn append_past_final_page_is_invalid() {
        let err = resolve_target(LoadDirection::Append, boundary(9, Some(key(9, Some(1), None))))
            .unwrap_err();
        assert_eq!(
            err,
            InvalidState::NoNextPage {
                item_id: ItemId::new(9)
            }
        );
    }

    // ===========================================
    // Merge Computation Tests
    // ===========================================

    #[test]
    fn first_page_has_no_previous() {
        let merge = PageMerge::from_response(
            LoadDirection::Refresh,
            PageToken::STARTING,
            vec![Item::new(1, "a", 10), Item::new(2, "b", 5)],
            1_700_000_000,
        );

        assert!(merge.clear_existing);
        assert_eq!(merge.keys.len(), 2);
        for key in &merge.keys {
            assert_eq!(key.previous_page, None);
            assert_eq!(key.next_page, Some(token(2)));
            assert_eq!(key.fetched_at, 1_700_000_000);
        }
        assert!(!merge.outcome().end_of_pagination_reached);
    }

    #[test]
    fn later_page_links_both_neighbours() {
        let merge = PageMerge::from_response(
            LoadDirection::Append,
            token(5),
            vec![Item::new(1, "a", 10)],
            0,
        );

        assert!(!merge.clear_existing);
        assert_eq!(merge.keys[0].previous_page, Some(token(4)));
        assert_eq!(merge.keys[0].next_page, Some(token(6)));
    }

    #[test]
    fn empty_response_ends_pagination() {
        let merge = PageMerge::from_response(LoadDirection::Append, token(2), vec![], 0);

        assert!(merge.end_of_pagination());
        assert!(merge.keys.is_empty());
        assert!(merge.is_noop());
        assert_eq!(merge.outcome(), LoadOutcome::end_of_pagination());
    }

    #[test]
    fn empty_refresh_still_clears() {
        let merge =
            PageMerge::from_response(LoadDirection::Refresh, PageToken::STARTING, vec![], 0);
        assert!(!merge.is_noop());
        assert!(merge.clear_existing);
    }

    #[test]
    fn key_for_each_item_in_order() {
        let merge = PageMerge::from_response(
            LoadDirection::Prepend,
            token(2),
            vec![Item::new(8, "x", 3), Item::new(4, "y", 2)],
            0,
        );
        let ids: Vec<i64> = merge.keys.iter().map(|k| k.item_id.value()).collect();
        assert_eq!(ids, vec![8, 4]);
    }

    #[test]
    fn invalid_state_display() {
        let err = InvalidState::NoLoadedItems {
            direction: LoadDirection::Append,
        };
        assert_eq!(err.to_string(), "append requested with no loaded items");
    }
}
