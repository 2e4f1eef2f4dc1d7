//! # pager-core
//!
//! Pure logic for remote-pager (no I/O, instant tests).
//!
//! This crate implements the page-key resolution and load-state machines
//! without any network or disk I/O, enabling fast unit tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects:
//! - [`resolve_target`] turns a load direction plus the boundary item's
//!   continuation key into a [`PagePlan`]
//! - [`PageMerge::from_response`] turns a fetched page into the rows to commit
//! - [`LoadStates::on_event`] tracks per-direction loading status
//!
//! The actual I/O (remote fetches, store transactions) is performed by
//! `pager-mediator`, which interprets the plans produced here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod plan;
pub mod snapshot;
pub mod state;

pub use plan::{
    boundary_item, resolve_target, Boundary, InvalidState, LoadDirection, LoadOutcome, PageMerge,
    PagePlan,
};
pub use snapshot::{Page, PagingConfig, PagingState, DEFAULT_PAGE_SIZE};
pub use state::{LoadEvent, LoadState, LoadStates};
