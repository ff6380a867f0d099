//! View sinks consuming the per-tick snapshots.

use std::fmt::Write as _;

use async_trait::async_trait;
use chrono::Local;

use crate::{ChartSnapshot, DashboardError, EventRecord};

/// Trait implemented by renderers receiving one batched refresh per applied
/// tick. Sinks only read snapshots; they never reach back into the buffers.
#[async_trait]
pub trait ViewSink: Send + Sync {
    /// `chart` carries equal-length label/value sequences, oldest-first;
    /// `events` is ordered most-recent-first.
    async fn refresh(
        &self,
        chart: ChartSnapshot,
        events: Vec<EventRecord>,
    ) -> Result<(), DashboardError>;

    /// Called on transitions of the stale indicator, not on every failed
    /// tick.
    async fn staleness_changed(&self, _stale: bool) {}
}

/// No-op sink for headless environments.
pub struct NullSink;

#[async_trait]
impl ViewSink for NullSink {
    async fn refresh(
        &self,
        _chart: ChartSnapshot,
        _events: Vec<EventRecord>,
    ) -> Result<(), DashboardError> {
        Ok(())
    }
}

/// Renders the chart as a label/value line and the recent events as a table
/// on stdout, mapping the anomaly flag to Yes/No and timestamps to local
/// display time.
#[derive(Default)]
pub struct ConsoleSink;

#[async_trait]
impl ViewSink for ConsoleSink {
    async fn refresh(
        &self,
        chart: ChartSnapshot,
        events: Vec<EventRecord>,
    ) -> Result<(), DashboardError> {
        let mut out = String::new();
        let points: Vec<String> = chart
            .labels
            .iter()
            .zip(&chart.values)
            .map(|(label, value)| format!("{label}={value:.0}"))
            .collect();
        let _ = writeln!(out, "events processed: {}", points.join(" "));
        let _ = writeln!(
            out,
            "{:<14} {:<20} {:<12} {}",
            "event", "time", "type", "anomaly"
        );
        for event in &events {
            let _ = writeln!(
                out,
                "{:<14} {:<20} {:<12} {}",
                event.event_id,
                event.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
                event.kind,
                if event.is_anomaly { "Yes" } else { "No" }
            );
        }
        print!("{out}");
        Ok(())
    }

    async fn staleness_changed(&self, stale: bool) {
        if stale {
            println!("[data stale: the producer has stopped delivering]");
        } else {
            println!("[data fresh again]");
        }
    }
}
