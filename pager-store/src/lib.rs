//! # pager-store
//!
//! Persistent stores for remote-pager.
//!
//! This crate implements the local side of the cache:
//! - [`KeyStore`] - continuation keys per item
//! - [`ItemStore`] - cached items with an ordered, paginated read interface
//! - [`PageStore`] - both of the above plus the atomic page merge and
//!   change notifications
//!
//! ## Architecture
//!
//! ```text
//! pager-mediator ──merge_page──►┌──────────────────────────────┐
//!                               │        SqliteStorage         │
//! read layer ──query_paginated─►│  items │ continuation_keys   │
//!            ◄──subscribe()─────└──────────────────────────────┘
//! ```
//!
//! Every write commits as one SQLite transaction. Readers never see items
//! without their keys or a half-cleared store.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod filter;
pub mod storage;

pub use error::{StorageError, StorageResult};
pub use filter::ItemFilter;
pub use storage::{ItemStore, KeyStore, PageStore, SqliteStorage};
