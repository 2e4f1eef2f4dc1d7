//! Error types for pager-mediator.

use pager_core::InvalidState;
use pager_store::StorageError;
use thiserror::Error;

use crate::remote::RemoteError;

/// Errors returned by a load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The remote source failed; the same load may be retried.
    #[error("remote fetch failed: {0}")]
    Remote(#[from] RemoteError),

    /// The local store failed; nothing from this load was committed, so the
    /// same load may be retried.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The caller requested a load its own state cannot support.
    #[error("invalid load state: {0}")]
    InvalidState(#[from] InvalidState),
}

impl LoadError {
    /// Whether retrying the same load may succeed.
    ///
    /// Only a caller contract violation is permanent.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Remote(_) | Self::Storage(_))
    }

    /// Whether this error signals a caller contract violation.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pager_core::LoadDirection;

    #[test]
    fn invalid_state_is_not_retryable() {
        let remote = LoadError::from(RemoteError::Transport("reset".into()));
        let storage = LoadError::from(StorageError::InvalidRow {
            table: "items",
            reason: "truncated".into(),
        });
        let invalid = LoadError::from(InvalidState::NoLoadedItems {
            direction: LoadDirection::Append,
        });

        assert!(remote.is_retryable());
        assert!(storage.is_retryable());
        assert!(!storage.is_invalid_state());
        assert!(!invalid.is_retryable());
        assert!(invalid.is_invalid_state());
        assert!(!remote.is_invalid_state());
    }

    #[test]
    fn error_display() {
        let err = LoadError::from(RemoteError::Protocol {
            status: 503,
            message: "unavailable".into(),
        });
        assert_eq!(
            err.to_string(),
            "remote fetch failed: unexpected status 503: unavailable"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LoadError>();
    }
}
