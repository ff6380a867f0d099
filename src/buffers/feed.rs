//! Recent-events feed backing the table view.

use std::collections::VecDeque;

use crate::{DashboardError, EventRecord};

/// Holds the most recent `capacity` event records.
///
/// Internal storage stays chronological; the most-recent-first order the
/// table sink expects is a pure read-time projection in [`snapshot`].
///
/// [`snapshot`]: EventFeed::snapshot
#[derive(Debug, Clone)]
pub struct EventFeed {
    records: VecDeque<EventRecord>,
    capacity: usize,
}

impl EventFeed {
    pub fn new(capacity: usize) -> Result<Self, DashboardError> {
        if capacity == 0 {
            return Err(DashboardError::Config(
                "feed capacity must be positive".to_string(),
            ));
        }
        Ok(Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Appends a record, evicting the single oldest one on overflow.
    pub fn append(&mut self, event: EventRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(event);
    }

    /// Returns the current records ordered most-recent-first. Read-only.
    pub fn snapshot(&self) -> Vec<EventRecord> {
        self.records.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
