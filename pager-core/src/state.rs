//! Load-state machine for remote-pager.
//!
//! This module provides a pure, side-effect-free state machine tracking the
//! status of each load direction. The read layer feeds it events and consults
//! it before scheduling the next load.

use crate::plan::{LoadDirection, LoadOutcome};

/// Status of one load direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Idle.
    NotLoading {
        /// No further pages exist in this direction.
        end_of_pagination_reached: bool,
    },
    /// A load is in flight.
    Loading,
    /// The last load failed.
    Error {
        /// Error description.
        message: String,
        /// Whether retrying the same load may succeed.
        retryable: bool,
    },
}

impl LoadState {
    /// Idle with more pages possibly available.
    pub fn incomplete() -> Self {
        Self::NotLoading {
            end_of_pagination_reached: false,
        }
    }

    /// Idle with this direction exhausted.
    pub fn complete() -> Self {
        Self::NotLoading {
            end_of_pagination_reached: true,
        }
    }

    /// Check if a load is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

impl Default for LoadState {
    fn default() -> Self {
        Self::incomplete()
    }
}

/// Events reported by the read layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    /// A load was handed to the mediator.
    Started(LoadDirection),
    /// The mediator reported success.
    Succeeded(LoadDirection, LoadOutcome),
    /// The mediator reported an error.
    Failed {
        /// The failed direction.
        direction: LoadDirection,
        /// Error description.
        message: String,
        /// Whether retrying may succeed.
        retryable: bool,
    },
    /// The load was abandoned before the mediator answered.
    Cancelled(LoadDirection),
}

/// Load states for all three directions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStates {
    /// Refresh status.
    pub refresh: LoadState,
    /// Prepend status.
    pub prepend: LoadState,
    /// Append status.
    pub append: LoadState,
}

impl LoadStates {
    /// All directions idle and incomplete.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an event and return the new states.
    ///
    /// A successful refresh replaces all loaded data, so it resets the other
    /// two directions. An empty refresh also exhausts append.
    pub fn on_event(self, event: LoadEvent) -> Self {
        match event {
            LoadEvent::Started(direction) => self.with(direction, LoadState::Loading),
            LoadEvent::Succeeded(LoadDirection::Refresh, outcome) => {
                let end = outcome.end_of_pagination_reached;
                Self {
                    refresh: LoadState::NotLoading {
                        end_of_pagination_reached: end,
                    },
                    prepend: LoadState::incomplete(),
                    append: LoadState::NotLoading {
                        end_of_pagination_reached: end,
                    },
                }
            }
            LoadEvent::Succeeded(direction, outcome) => self.with(
                direction,
                LoadState::NotLoading {
                    end_of_pagination_reached: outcome.end_of_pagination_reached,
                },
            ),
            LoadEvent::Failed {
                direction,
                message,
                retryable,
            } => self.with(direction, LoadState::Error { message, retryable }),
            LoadEvent::Cancelled(direction) => self.with(direction, LoadState::incomplete()),
        }
    }

    /// Get the state of one direction.
    pub fn get(&self, direction: LoadDirection) -> &LoadState {
        match direction {
            LoadDirection::Refresh => &self.refresh,
            LoadDirection::Prepend => &self.prepend,
            LoadDirection::Append => &self.append,
        }
    }

    /// Whether the read layer should request a load in this direction.
    ///
    /// Refresh is always allowed unless one is already running.
    pub fn should_load(&self, direction: LoadDirection) -> bool {
        match (direction, self.get(direction)) {
            (_, LoadState::Loading) => false,
            (LoadDirection::Refresh, _) => true,
            (_, LoadState::NotLoading {
                end_of_pagination_reached,
            }) => !end_of_pagination_reached,
            (_, LoadState::Error { retryable, .. }) => *retryable,
        }
    }

    /// Check if any direction is loading.
    pub fn is_loading(&self) -> bool {
        self.refresh.is_loading() || self.prepend.is_loading() || self.append.is_loading()
    }

    fn with(mut self, direction: LoadDirection, state: LoadState) -> Self {
        match direction {
            LoadDirection::Refresh => self.refresh = state,
            LoadDirection::Prepend => self.prepend = state,
            LoadDirection::Append => self.append = state,
        }
        self
    }
}
