//! Core library for the opsboard dashboard.
//!
//! The crate exposes the data model shared between the tick loop and the
//! bounded views, configuration loading utilities, and the orchestration
//! entry point used by the CLI application.

pub mod buffers;
pub mod config;
pub mod producer;
pub mod sink;
pub mod state;
pub mod telemetry;
pub mod ticker;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, instrument};

/// One (timestamp-label, numeric value) point for the time-series chart.
/// Insertion order is chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub label: String,
    pub value: f64,
}

impl Sample {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// One discrete occurrence shown in the recent-events table.
///
/// The `event_id` is opaque; duplicates from an upstream producer pass
/// through unchanged, uniqueness is the producer's responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub kind: String,
    pub is_anomaly: bool,
}

/// Everything a producer yields for one tick. Either list may be empty and
/// neither is assumed to hold exactly one entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickBatch {
    pub samples: Vec<Sample>,
    pub events: Vec<EventRecord>,
}

impl TickBatch {
    /// Rejects the batch as a whole before anything is applied, so a bad
    /// producer payload can never leave the buffers partially mutated.
    pub fn validate(&self) -> Result<(), DashboardError> {
        for event in &self.events {
            if event.event_id.is_empty() {
                return Err(DashboardError::Producer(
                    "event record with empty event_id".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn anomaly_count(&self) -> usize {
        self.events.iter().filter(|event| event.is_anomaly).count()
    }
}

/// Parallel label/value projection handed to the chart sink, oldest-first.
/// Built from composite samples only at this boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSnapshot {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSnapshot {
    pub(crate) fn project<'a>(samples: impl Iterator<Item = &'a Sample>) -> Self {
        let (labels, values) = samples
            .map(|sample| (sample.label.clone(), sample.value))
            .unzip();
        Self { labels, values }
    }

    pub fn len(&self) -> usize {
        // Desynchronized lengths are a logic bug; fail loudly rather than
        // render a skewed chart.
        assert_eq!(
            self.labels.len(),
            self.values.len(),
            "chart projection desynchronized"
        );
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Errors surfaced by the dashboard runtime.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("producer failure: {0}")]
    Producer(String),
    #[error("view sink failure: {0}")]
    Sink(String),
    #[error("task join failure: {0}")]
    Join(String),
}

impl From<tokio::task::JoinError> for DashboardError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Join(err.to_string())
    }
}

/// Runs the dashboard until the tick budget is exhausted or the process is
/// interrupted.
#[instrument(skip_all)]
pub async fn run(config: config::AppConfig) -> Result<(), DashboardError> {
    let state = state::StateHandle::new(
        config.runtime.series_capacity,
        config.runtime.feed_capacity,
    )?;
    let telemetry = telemetry::TickTelemetry::new(config.runtime.stale_after_failures);
    let producer = producer::synthetic::SyntheticProducer::new(config.producer.clone());
    let view: Arc<dyn sink::ViewSink> = if config.runtime.quiet {
        Arc::new(sink::NullSink)
    } else {
        Arc::new(sink::ConsoleSink::default())
    };

    let mut ticker = ticker::Ticker::new(
        config.runtime.clone(),
        Box::new(producer),
        view,
        state,
        telemetry.clone(),
    );
    ticker.start();

    let interrupted = tokio::select! {
        res = ticker.wait() => {
            res?;
            false
        }
        _ = tokio::signal::ctrl_c() => true,
    };
    if interrupted {
        ticker.stop().await?;
    }

    let totals = telemetry.snapshot();
    info!(
        ticks = totals.ticks_applied,
        skipped = totals.ticks_skipped,
        events = totals.events_ingested,
        anomalies = totals.anomalies_seen,
        "dashboard stopped"
    );
    Ok(())
}
