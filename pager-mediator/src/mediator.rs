//! RemoteMediator - fetches remote pages and merges them into the cache.
//!
//! # Architecture
//!
//! The mediator holds no state of its own. Each load reads the boundary
//! item's continuation key, asks pager-core which page that implies, fetches
//! it and commits the result as one transaction.
//!
//! ```text
//! read layer ──load(direction, snapshot)──► RemoteMediator ──► RemoteSource
//!                                               │   ▲
//!                                    merge_page ▼   │ key_for
//!                                            PageStore
//! ```
//!
//! Dropping a `load` future at any point commits nothing: the fetch has no
//! side effects and an unfinished transaction rolls back.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use pager_core::{
    boundary_item, resolve_target, Boundary, LoadDirection, LoadOutcome, PageMerge, PagePlan,
    PagingState,
};
use pager_store::PageStore;

use crate::error::LoadError;
use crate::remote::RemoteSource;

/// Configuration for a RemoteMediator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediatorConfig {
    /// The search term this mediator serves.
    pub query: String,
    /// How long cached pages stay fresh enough to skip the initial refresh.
    ///
    /// `None` refreshes on every start.
    pub cache_timeout: Option<Duration>,
}

impl MediatorConfig {
    /// Create a configuration for a query.
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            cache_timeout: None,
        }
    }

    /// Set the cache timeout.
    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = Some(timeout);
        self
    }
}

/// What the read layer should do before showing cached data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializeAction {
    /// Refresh from the remote source first.
    LaunchInitialRefresh,
    /// Cached data is fresh; show it as is.
    SkipInitialRefresh,
}

/// Keeps a [`PageStore`] consistent with a paginated [`RemoteSource`].
pub struct RemoteMediator<R: RemoteSource, S: PageStore> {
    config: MediatorConfig,
    remote: R,
    store: S,
}

impl<R: RemoteSource, S: PageStore> std::fmt::Debug for RemoteMediator<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteMediator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<R: RemoteSource, S: PageStore> RemoteMediator<R, S> {
    /// Create a new mediator.
    pub fn new(config: MediatorConfig, remote: R, store: S) -> Self {
        Self {
            config,
            remote,
            store,
        }
    }

    /// Get the mediator configuration.
    pub fn config(&self) -> &MediatorConfig {
        &self.config
    }

    /// Get access to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get access to the remote source.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Decide whether a refresh must run before cached data is shown.
    pub async fn initialize(&self) -> Result<InitializeAction, LoadError> {
        let Some(timeout) = self.config.cache_timeout else {
            return Ok(InitializeAction::LaunchInitialRefresh);
        };

        let action = match self.store.latest_fetch().await? {
            Some(fetched_at) => {
                let age = current_timestamp().saturating_sub(fetched_at);
                if age >= 0 && (age as u64) < timeout.as_secs() {
                    InitializeAction::SkipInitialRefresh
                } else {
                    InitializeAction::LaunchInitialRefresh
                }
            }
            None => InitializeAction::LaunchInitialRefresh,
        };

        tracing::info!("Initialize for query {:?}: {:?}", self.config.query, action);
        Ok(action)
    }

    /// Load one page in `direction`.
    ///
    /// Returns the end-of-pagination flag on success. Remote failures are
    /// retryable; [`LoadError::InvalidState`] means the caller asked for a
    /// load its snapshot cannot support.
    pub async fn load(
        &self,
        direction: LoadDirection,
        state: &PagingState,
    ) -> Result<LoadOutcome, LoadError> {
        let boundary = match boundary_item(direction, state) {
            Some(item) => Some(Boundary::new(item.id, self.store.key_for(item.id).await?)),
            None => None,
        };

        if let (LoadDirection::Refresh, Some(b)) = (direction, boundary) {
            if b.key.and_then(|key| key.next_page).is_none() {
                tracing::debug!(
                    "Anchor item {} has no next page, refreshing from the first page",
                    b.item_id
                );
            }
        }

        let page = match resolve_target(direction, boundary) {
            Ok(PagePlan::Fetch(page)) => page,
            Ok(PagePlan::EndOfPagination) => {
                tracing::debug!("{}: no earlier page, nothing to fetch", direction);
                return Ok(LoadOutcome::end_of_pagination());
            }
            Err(e) => {
                tracing::error!("Rejected {} load: {}", direction, e);
                return Err(e.into());
            }
        };

        if direction == LoadDirection::Refresh {
            tracing::info!(
                "Refreshing query {:?} from page {}",
                self.config.query,
                page
            );
        } else {
            tracing::debug!("{}: fetching page {}", direction, page);
        }

        let items = match self
            .remote
            .fetch_page(&self.config.query, page, state.config.page_size)
            .await
        {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("{} fetch of page {} failed: {}", direction, page, e);
                return Err(e.into());
            }
        };

        let merge = PageMerge::from_response(direction, page, items, current_timestamp());
        if !merge.is_noop() {
            self.store.merge_page(&merge).await?;
        }

        let outcome = merge.outcome();
        tracing::debug!(
            "{}: page {} done ({} items, end_of_pagination={})",
            direction,
            page,
            merge.items.len(),
            outcome.end_of_pagination_reached
        );
        Ok(outcome)
    }
}

fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
