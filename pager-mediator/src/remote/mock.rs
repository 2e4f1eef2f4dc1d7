//! Mock remote source for testing.
//!
//! Serves configured pages, records every request, and can be told to fail
//! or stall the next fetch.

use super::{RemoteError, RemoteSource};
use async_trait::async_trait;
use pager_types::{Item, PageToken};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A request received by [`MockRemote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Query string.
    pub query: String,
    /// Requested page.
    pub page: PageToken,
    /// Requested page size.
    pub page_size: u32,
}

/// Mock remote source for testing.
///
/// Pages that were never set come back empty. Clones share state.
#[derive(Debug, Default)]
pub struct MockRemote {
    inner: Arc<Mutex<MockRemoteInner>>,
}

#[derive(Debug, Default)]
struct MockRemoteInner {
    pages: HashMap<PageToken, Vec<Item>>,
    requests: Vec<FetchRequest>,
    fail_next: Option<RemoteError>,
    stall_next: bool,
}

impl MockRemote {
    /// Create a new mock remote with no pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock serving `pages` as pages 1, 2, 3, ...
    pub fn with_pages(pages: Vec<Vec<Item>>) -> Self {
        let remote = Self::new();
        for (index, items) in pages.into_iter().enumerate() {
            remote.set_page(index as u32 + 1, items);
        }
        remote
    }

    /// Set the items returned for a page number.
    ///
    /// Page 0 is ignored.
    pub fn set_page(&self, page: u32, items: Vec<Item>) {
        if let Ok(token) = PageToken::new(page) {
            let mut inner = self.inner.lock().unwrap();
            inner.pages.insert(token, items);
        }
    }

    /// Get all requests received so far.
    pub fn requests(&self) -> Vec<FetchRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.clone()
    }

    /// Get the number of requests received so far.
    pub fn request_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.requests.len()
    }

    /// Cause the next fetch to fail with the given error.
    pub fn fail_next(&self, error: RemoteError) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next = Some(error);
    }

    /// Cause the next fetch to never complete.
    pub fn stall_next(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.stall_next = true;
    }

    /// Clear all state (pages, requests, forced failures).
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockRemoteInner::default();
    }
}

impl Clone for MockRemote {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl RemoteSource for MockRemote {
    async fn fetch_page(
        &self,
        query: &str,
        page: PageToken,
        page_size: u32,
    ) -> Result<Vec<Item>, RemoteError> {
        let stall = {
            let mut inner = self.inner.lock().unwrap();
            inner.requests.push(FetchRequest {
                query: query.to_string(),
                page,
                page_size,
            });

            if let Some(error) = inner.fail_next.take() {
                return Err(error);
            }
            std::mem::take(&mut inner.stall_next)
        };

        if stall {
            std::future::pending::<()>().await;
        }

        let inner = self.inner.lock().unwrap();
        Ok(inner.pages.get(&page).cloned().unwrap_or_default())
    }
}
