//! Storage layer for pager-store.
//!
//! Provides the key and item stores and the transactional page merge.

mod sqlite;

pub use sqlite::SqliteStorage;

use crate::error::StorageError;
use crate::filter::ItemFilter;
use async_trait::async_trait;
use pager_core::PageMerge;
use pager_types::{ContinuationKey, Item, ItemId};
use tokio::sync::watch;

/// Persistent mapping from item identity to continuation keys.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Insert or replace keys by item identity.
    async fn upsert_keys(&self, keys: &[ContinuationKey]) -> Result<(), StorageError>;

    /// Look up the key for an item.
    ///
    /// Returns None if the item has no key.
    async fn key_for(&self, item_id: ItemId) -> Result<Option<ContinuationKey>, StorageError>;

    /// Delete all keys.
    async fn clear_keys(&self) -> Result<(), StorageError>;

    /// Number of stored keys.
    async fn key_count(&self) -> Result<u64, StorageError>;

    /// Newest `fetched_at` across all keys.
    ///
    /// Returns None if no keys are stored.
    async fn latest_fetch(&self) -> Result<Option<i64>, StorageError>;
}

/// Persistent collection of cached items.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Insert or replace items by identity.
    async fn insert_items(&self, items: &[Item]) -> Result<(), StorageError>;

    /// Delete all items.
    async fn clear_items(&self) -> Result<(), StorageError>;

    /// Read matching items in read order.
    ///
    /// Read order is score descending, then name ascending, then id. Returns
    /// up to `limit` items starting at `offset`.
    async fn query_paginated(
        &self,
        filter: &ItemFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Item>, StorageError>;

    /// Number of items matching the filter.
    async fn count_matching(&self, filter: &ItemFilter) -> Result<u64, StorageError>;
}

/// A key store and item store that can be written together atomically.
#[async_trait]
pub trait PageStore: KeyStore + ItemStore {
    /// Commit a fetched page in one transaction.
    ///
    /// Clears both stores first when `merge.clear_existing` is set. Either the
    /// whole merge becomes visible or none of it does.
    async fn merge_page(&self, merge: &PageMerge) -> Result<(), StorageError>;

    /// Subscribe to change notifications.
    ///
    /// The value is a generation counter bumped after every committed write.
    fn subscribe(&self) -> watch::Receiver<u64>;
}
