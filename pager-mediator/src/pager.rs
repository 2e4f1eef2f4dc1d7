//! Pager - a minimal read layer over a [`RemoteMediator`].
//!
//! The pager owns the single-flight guarantee the mediator relies on: every
//! load runs under one async lock, and each load receives a snapshot rebuilt
//! from the store at that moment.

use pager_core::{
    LoadDirection, LoadEvent, LoadOutcome, LoadStates, PagingConfig, PagingState,
};
use pager_store::{ItemFilter, ItemStore, PageStore};
use pager_types::Item;
use tokio::sync::Mutex;

use crate::error::LoadError;
use crate::mediator::{InitializeAction, RemoteMediator};
use crate::remote::RemoteSource;

const DIRECTIONS: [LoadDirection; 3] = [
    LoadDirection::Refresh,
    LoadDirection::Prepend,
    LoadDirection::Append,
];

#[derive(Debug, Default)]
struct PagerState {
    states: LoadStates,
    anchor: Option<usize>,
}

impl PagerState {
    fn apply(&mut self, event: LoadEvent) {
        self.states = std::mem::take(&mut self.states).on_event(event);
    }
}

/// Read layer driving a [`RemoteMediator`].
pub struct Pager<R: RemoteSource, S: PageStore> {
    mediator: RemoteMediator<R, S>,
    filter: ItemFilter,
    config: PagingConfig,
    // Held across the snapshot read too, which is linear in the cached rows.
    load_lock: Mutex<()>,
    state: Mutex<PagerState>,
}

impl<R: RemoteSource, S: PageStore> std::fmt::Debug for Pager<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pager")
            .field("mediator", &self.mediator)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<R: RemoteSource, S: PageStore> Pager<R, S> {
    /// Create a pager. Stored items are filtered by the mediator's query.
    pub fn new(mediator: RemoteMediator<R, S>, config: PagingConfig) -> Self {
        let filter = ItemFilter::new(&mediator.config().query);
        Self {
            mediator,
            filter,
            config,
            load_lock: Mutex::new(()),
            state: Mutex::new(PagerState::default()),
        }
    }

    /// Get access to the mediator.
    pub fn mediator(&self) -> &RemoteMediator<R, S> {
        &self.mediator
    }

    /// Get the paging configuration.
    pub fn config(&self) -> &PagingConfig {
        &self.config
    }

    /// Initialize the mediator and refresh if the cache is stale.
    pub async fn start(&self) -> Result<InitializeAction, LoadError> {
        let action = self.mediator.initialize().await?;
        if action == InitializeAction::LaunchInitialRefresh {
            self.refresh().await?;
        }
        Ok(action)
    }

    /// Replace cached data, starting near the anchor.
    pub async fn refresh(&self) -> Result<Option<LoadOutcome>, LoadError> {
        self.run(LoadDirection::Refresh).await
    }

    /// Load the page after the last cached item.
    ///
    /// Returns `Ok(None)` without loading when append is exhausted, already
    /// running, or blocked by a non-retryable error.
    pub async fn append(&self) -> Result<Option<LoadOutcome>, LoadError> {
        self.run(LoadDirection::Append).await
    }

    /// Load the page before the first cached item.
    pub async fn prepend(&self) -> Result<Option<LoadOutcome>, LoadError> {
        self.run(LoadDirection::Prepend).await
    }

    /// Record a read at `position` and append if it is near the end.
    pub async fn access(&self, position: usize) -> Result<Option<LoadOutcome>, LoadError> {
        self.state.lock().await.anchor = Some(position);

        let loaded = self.item_count().await?;
        let remaining = loaded.saturating_sub(position.saturating_add(1));
        if remaining < self.config.prefetch_distance as usize {
            tracing::debug!(
                "Access at {} is {} items from the end, prefetching",
                position,
                remaining
            );
            return self.append().await;
        }
        Ok(None)
    }

    /// Cached items for the query, in read order.
    pub async fn items(&self, offset: u64, limit: u32) -> Result<Vec<Item>, LoadError> {
        Ok(self
            .mediator
            .store()
            .query_paginated(&self.filter, offset, limit)
            .await?)
    }

    /// The first screen of cached items, `initial_load_size` long.
    pub async fn initial_items(&self) -> Result<Vec<Item>, LoadError> {
        self.items(0, self.config.initial_load_size).await
    }

    /// Number of cached items for the query.
    pub async fn item_count(&self) -> Result<usize, LoadError> {
        let count = self.mediator.store().count_matching(&self.filter).await?;
        Ok(usize::try_from(count).unwrap_or(usize::MAX))
    }

    /// Build the snapshot the next load would receive.
    ///
    /// Reads every cached item matching the query, so its cost grows with the
    /// cache. Loads take it under the single-flight lock.
    pub async fn snapshot(&self) -> Result<PagingState, LoadError> {
        let anchor = self.state.lock().await.anchor;
        let count = self.mediator.store().count_matching(&self.filter).await?;
        let limit = u32::try_from(count).unwrap_or(u32::MAX);
        let items = self.items(0, limit).await?;
        Ok(PagingState::from_items(items, anchor, self.config))
    }

    /// Current load states.
    pub async fn load_states(&self) -> LoadStates {
        self.state.lock().await.states.clone()
    }

    async fn run(&self, direction: LoadDirection) -> Result<Option<LoadOutcome>, LoadError> {
        let _flight = self.load_lock.lock().await;

        {
            let mut state = self.state.lock().await;
            // Holding the flight lock, any Loading state belongs to a dropped call.
            for stale in DIRECTIONS {
                if state.states.get(stale).is_loading() {
                    tracing::debug!("{}: previous load was cancelled", stale);
                    state.apply(LoadEvent::Cancelled(stale));
                }
            }
            if !state.states.should_load(direction) {
                tracing::debug!("{}: skipped ({:?})", direction, state.states.get(direction));
                return Ok(None);
            }
            state.apply(LoadEvent::Started(direction));
        }

        let result = match self.snapshot().await {
            Ok(snapshot) => self.mediator.load(direction, &snapshot).await,
            Err(e) => Err(e),
        };

        let mut state = self.state.lock().await;
        match result {
            Ok(outcome) => {
                state.apply(LoadEvent::Succeeded(direction, outcome));
                Ok(Some(outcome))
            }
            Err(e) => {
                state.apply(LoadEvent::Failed {
                    direction,
                    message: e.to_string(),
                    retryable: e.is_retryable(),
                });
                Err(e)
            }
        }
    }
}
