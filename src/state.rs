//! Single owner of the two bounded views.

use std::sync::{Arc, Mutex};

use crate::{
    ChartSnapshot, DashboardError, EventRecord, TickBatch,
    buffers::{feed::EventFeed, series::SeriesWindow},
};

/// The dashboard session's buffers. Mutated only through [`apply`], one
/// batch at a time.
///
/// [`apply`]: DashboardState::apply
#[derive(Debug, Clone)]
pub struct DashboardState {
    series: SeriesWindow,
    feed: EventFeed,
}

impl DashboardState {
    pub fn new(series_capacity: usize, feed_capacity: usize) -> Result<Self, DashboardError> {
        Ok(Self {
            series: SeriesWindow::new(series_capacity)?,
            feed: EventFeed::new(feed_capacity)?,
        })
    }

    /// Applies one tick's batch. The batch is validated up front so a
    /// rejected batch leaves both buffers untouched.
    pub fn apply(&mut self, batch: TickBatch) -> Result<(), DashboardError> {
        batch.validate()?;
        for sample in batch.samples {
            self.series.append(sample);
        }
        for event in batch.events {
            self.feed.append(event);
        }
        Ok(())
    }

    pub fn series(&self) -> &SeriesWindow {
        &self.series
    }

    pub fn feed(&self) -> &EventFeed {
        &self.feed
    }
}

/// Shared handle over the dashboard state.
///
/// Only the tick loop writes; the lock is taken once per tick so producer
/// results are applied and snapshotted as a single step, never interleaved
/// with another mutation.
#[derive(Clone)]
pub struct StateHandle {
    inner: Arc<Mutex<DashboardState>>,
}

impl StateHandle {
    pub fn new(series_capacity: usize, feed_capacity: usize) -> Result<Self, DashboardError> {
        Ok(Self {
            inner: Arc::new(Mutex::new(DashboardState::new(
                series_capacity,
                feed_capacity,
            )?)),
        })
    }

    /// The atomic per-tick step: apply the batch and capture both view
    /// snapshots under one lock.
    pub fn apply_and_snapshot(
        &self,
        batch: TickBatch,
    ) -> Result<(ChartSnapshot, Vec<EventRecord>), DashboardError> {
        let mut state = self.inner.lock().expect("dashboard state mutex poisoned");
        state.apply(batch)?;
        Ok((state.series().snapshot(), state.feed().snapshot()))
    }

    pub fn chart_snapshot(&self) -> ChartSnapshot {
        let state = self.inner.lock().expect("dashboard state mutex poisoned");
        state.series().snapshot()
    }

    pub fn feed_snapshot(&self) -> Vec<EventRecord> {
        let state = self.inner.lock().expect("dashboard state mutex poisoned");
        state.feed().snapshot()
    }
}
