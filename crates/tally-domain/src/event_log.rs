//! Append-only log of occurrence timestamps.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::period::Period;

/// Every recorded occurrence for one counter, in insertion order.
///
/// Appending is the only mutation; queries filter and sort by time value, so
/// insertion order never leaks into results.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventLog {
    #[serde(default)]
    entries: Vec<NaiveDateTime>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one occurrence instant.
    pub fn record(&mut self, instant: NaiveDateTime) {
        self.entries.push(instant);
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn earliest(&self) -> Option<NaiveDateTime> {
        self.entries.iter().copied().min()
    }

    pub fn latest(&self) -> Option<NaiveDateTime> {
        self.entries.iter().copied().max()
    }

    /// Number of occurrences inside `period`, both bounds inclusive.
    pub fn count_in(&self, period: &Period) -> usize {
        self.entries
            .iter()
            .filter(|instant| period.contains(**instant))
            .count()
    }

    /// Occurrences inside `period`, sorted ascending by time.
    pub fn entries_in(&self, period: &Period) -> Vec<NaiveDateTime> {
        let mut matches: Vec<NaiveDateTime> = self
            .entries
            .iter()
            .copied()
            .filter(|instant| period.contains(*instant))
            .collect();
        matches.sort();
        matches
    }

    pub fn iter(&self) -> impl Iterator<Item = &NaiveDateTime> {
        self.entries.iter()
    }
}
