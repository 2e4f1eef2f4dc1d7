//! Remote source abstraction for remote-pager.
//!
//! This module provides a pluggable page source that abstracts the
//! underlying network client.
//!
//! # Design
//!
//! The trait has a single async call:
//! - `fetch_page()` returns the items of one page for a query
//!
//! An empty page means there is nothing at or after that page. Timeouts are
//! the implementation's concern; the mediator imposes none.
//!
//! # Example
//!
//! ```ignore
//! let remote = MockRemote::new();
//! remote.set_page(1, vec![Item::new(1, "paging", 10)]);
//! let items = remote.fetch_page("android", PageToken::STARTING, 30).await?;
//! ```

mod fixture;
mod mock;

pub use fixture::FixtureRemote;
pub use mock::{FetchRequest, MockRemote};

use async_trait::async_trait;
use pager_types::{Item, PageToken};
use thiserror::Error;

/// Remote source errors.
///
/// All variants are transient from the mediator's point of view.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The source answered with a non-success status.
    #[error("unexpected status {status}: {message}")]
    Protocol {
        /// Status code.
        status: u16,
        /// Message from the source.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// A paginated remote data source.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch one page of items matching `query`.
    ///
    /// Returns at most `page_size` items, in the source's ranking order.
    async fn fetch_page(
        &self,
        query: &str,
        page: PageToken,
        page_size: u32,
    ) -> Result<Vec<Item>, RemoteError>;
}
