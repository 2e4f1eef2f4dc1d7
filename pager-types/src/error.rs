//! Error types for remote-pager domain values.

use thiserror::Error;

/// Errors raised when constructing domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    /// Page tokens start at 1.
    #[error("invalid page token: {0} (pages start at 1)")]
    InvalidPageToken(u32),

    /// A page token arithmetic step left the valid range.
    #[error("page token overflow")]
    PageTokenOverflow,
}
