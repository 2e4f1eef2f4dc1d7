//! # pager-mediator
//!
//! Remote mediator for remote-pager.
//!
//! This is the engine that keeps the local cache in step with a paginated
//! remote source. Readers only ever read from the store; when they reach the
//! edge of what is cached, the mediator fetches the adjacent page and merges
//! it in one transaction.
//!
//! ## Features
//!
//! - **Page-key resolution**: continuation keys stored per item decide the
//!   next page in each direction (pure logic from pager-core)
//! - **Atomic merges**: items and keys are committed together, refreshes
//!   clear and refill in the same transaction
//! - **Remote abstraction**: pluggable [`RemoteSource`] (fixture file, mock)
//! - **Read layer**: [`Pager`] serializes loads and tracks load states
//!
//! ## Example
//!
//! ```ignore
//! use pager_mediator::{MediatorConfig, MockRemote, Pager, RemoteMediator};
//! use pager_core::PagingConfig;
//! use pager_store::SqliteStorage;
//!
//! let store = SqliteStorage::in_memory().await?;
//! let mediator = RemoteMediator::new(MediatorConfig::new("android"), MockRemote::new(), store);
//! let pager = Pager::new(mediator, PagingConfig::new(30));
//!
//! pager.start().await?;
//! let first_screen = pager.items(0, 30).await?;
//! pager.access(25).await?; // near the end: fetches the next page
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod mediator;
pub mod pager;
pub mod remote;

pub use error::LoadError;
pub use mediator::{InitializeAction, MediatorConfig, RemoteMediator};
pub use pager::Pager;
pub use remote::{FetchRequest, FixtureRemote, MockRemote, RemoteError, RemoteSource};
