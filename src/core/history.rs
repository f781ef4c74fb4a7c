//! Transition history.
//!
//! Immutable log of executed transitions, intended for diagnostics and for
//! the scripting layer that wants to know how a device got where it is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::state::DeviceState;
use crate::protocol::Address;

/// One executed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Address the triggering event was sent to
    pub address: Address,
    /// Raw command code of the triggering event
    pub command: u8,
    pub from: DeviceState,
    pub to: DeviceState,
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of executed transitions.
///
/// [`record`](Self::record) returns a new history with the entry appended.
/// Owners that keep a long-lived log append in place with
/// [`push`](Self::push) and bound it with [`retain_last`](Self::retain_last).
///
/// # Example
///
/// ```rust
/// use homebus::core::{DeviceState, HistoryEntry, StateHistory};
/// use homebus::protocol::Address;
/// use chrono::Utc;
///
/// let history = StateHistory::new().record(HistoryEntry {
///     address: Address::new(1).unwrap(),
///     command: 3,
///     from: DeviceState::Undefined,
///     to: DeviceState::On,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(), vec![&DeviceState::Undefined, &DeviceState::On]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateHistory {
    entries: Vec<HistoryEntry>,
}

impl StateHistory {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record an entry, returning a new history. `self` is left unchanged.
    pub fn record(&self, entry: HistoryEntry) -> Self {
        let mut entries = self.entries.clone();
        entries.push(entry);
        Self { entries }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Drop the oldest entries so that at most `limit` remain.
    pub fn retain_last(&mut self, limit: usize) {
        let excess = self.entries.len().saturating_sub(limit);
        self.entries.drain(..excess);
    }

    /// States traversed: the first entry's `from`, then every `to`.
    pub fn get_path(&self) -> Vec<&DeviceState> {
        let mut path = Vec::new();
        if let Some(first) = self.entries.first() {
            path.push(&first.from);
        }
        for entry in &self.entries {
            path.push(&entry.to);
        }
        path
    }

    /// Time between the first and the last entry, `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.entries.first(), self.entries.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
