//! # pager-types
//!
//! Domain types for remote-pager.
//!
//! This crate provides the foundational types used across all remote-pager crates:
//! - [`ItemId`], [`Item`] - Cached domain records and their identity
//! - [`PageToken`] - Ordered page index used to address remote pages
//! - [`ContinuationKey`] - Previous/next page markers stored per item
//! - [`TypesError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod item;
mod keys;

pub use error::TypesError;
pub use item::{Item, ItemId};
pub use keys::{ContinuationKey, PageToken};
