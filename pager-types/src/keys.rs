//! Page tokens and per-item continuation keys.

use crate::error::TypesError;
use crate::item::ItemId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of one page of remote results.
///
/// Tokens are totally ordered and start at [`PageToken::STARTING`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageToken(u32);

impl PageToken {
    /// The first page.
    pub const STARTING: PageToken = PageToken(1);

    /// Create a token, rejecting 0.
    pub fn new(value: u32) -> Result<Self, TypesError> {
        if value == 0 {
            return Err(TypesError::InvalidPageToken(value));
        }
        Ok(Self(value))
    }

    /// Get the raw value.
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Check whether this is the first page.
    pub fn is_starting(&self) -> bool {
        *self == Self::STARTING
    }

    /// The page before this one, or `None` for the first page.
    pub fn previous(&self) -> Option<Self> {
        if self.is_starting() {
            None
        } else {
            Some(Self(self.0 - 1))
        }
    }

    /// The page after this one.
    pub fn next(&self) -> Result<Self, TypesError> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or(TypesError::PageTokenOverflow)
    }
}

impl Default for PageToken {
    fn default() -> Self {
        Self::STARTING
    }
}

impl TryFrom<u32> for PageToken {
    type Error = TypesError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageToken> for u32 {
    fn from(token: PageToken) -> Self {
        token.0
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageToken({})", self.0)
    }
}

/// Page boundaries recorded for one cached item.
///
/// Every item from the same remote response carries identical
/// `previous_page`, `next_page` and `fetched_at` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuationKey {
    /// The item these boundaries belong to.
    pub item_id: ItemId,
    /// Page before the one this item came from (`None`: no earlier page).
    pub previous_page: Option<PageToken>,
    /// Page after the one this item came from (`None`: end of pagination).
    pub next_page: Option<PageToken>,
    /// Unix timestamp (seconds) when the page was fetched.
    pub fetched_at: i64,
}
