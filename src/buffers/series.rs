//! Rolling time-series window backing the chart view.

use std::collections::VecDeque;

use crate::{ChartSnapshot, DashboardError, Sample};

/// Holds the most recent `capacity` samples for charting, oldest first.
///
/// Samples are stored as composite values; the parallel label/value arrays
/// the chart sink consumes exist only in [`ChartSnapshot`], so the two can
/// never desynchronize in length.
#[derive(Debug, Clone)]
pub struct SeriesWindow {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl SeriesWindow {
    pub fn new(capacity: usize) -> Result<Self, DashboardError> {
        if capacity == 0 {
            return Err(DashboardError::Config(
                "series capacity must be positive".to_string(),
            ));
        }
        Ok(Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Appends at the tail, evicting exactly one head sample when the window
    /// is already full. Always succeeds.
    pub fn append(&mut self, sample: Sample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Projects the current contents to the chart's parallel sequences,
    /// oldest-first. Read-only.
    pub fn snapshot(&self) -> ChartSnapshot {
        assert!(
            self.samples.len() <= self.capacity,
            "series window exceeded its capacity"
        );
        ChartSnapshot::project(self.samples.iter())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
