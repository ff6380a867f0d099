//! Tick accounting and staleness tracking.

use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct TelemetryState {
    ticks_applied: u64,
    ticks_skipped: u64,
    samples_ingested: u64,
    events_ingested: u64,
    anomalies_seen: u64,
    consecutive_failures: u32,
    stale: bool,
}

/// Snapshot of tick telemetry suitable for assertions and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    pub ticks_applied: u64,
    pub ticks_skipped: u64,
    pub samples_ingested: u64,
    pub events_ingested: u64,
    pub anomalies_seen: u64,
    pub consecutive_failures: u32,
    pub stale: bool,
}

/// Shared counters updated by the tick loop.
///
/// The views go stale after `stale_after` consecutive producer failures and
/// recover on the first applied tick; the recording methods return `true`
/// exactly on those transitions so the caller can notify the sink once.
#[derive(Clone)]
pub struct TickTelemetry {
    state: Arc<Mutex<TelemetryState>>,
    stale_after: u32,
}

impl TickTelemetry {
    pub fn new(stale_after: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(TelemetryState::default())),
            stale_after,
        }
    }

    /// Records an applied tick. Returns `true` when this tick cleared the
    /// stale indicator.
    pub fn record_applied(&self, samples: usize, events: usize, anomalies: usize) -> bool {
        let mut state = self.state.lock().expect("telemetry mutex poisoned");
        state.ticks_applied += 1;
        state.samples_ingested += samples as u64;
        state.events_ingested += events as u64;
        state.anomalies_seen += anomalies as u64;
        state.consecutive_failures = 0;
        let recovered = state.stale;
        state.stale = false;
        recovered
    }

    /// Records a skipped tick. Returns `true` when this failure crossed the
    /// stale threshold.
    pub fn record_failure(&self) -> bool {
        let mut state = self.state.lock().expect("telemetry mutex poisoned");
        state.ticks_skipped += 1;
        state.consecutive_failures += 1;
        if !state.stale && state.consecutive_failures >= self.stale_after {
            state.stale = true;
            return true;
        }
        false
    }

    pub fn is_stale(&self) -> bool {
        self.state.lock().expect("telemetry mutex poisoned").stale
    }

    /// Exposes a snapshot for diagnostics and testing.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        let state = self.state.lock().expect("telemetry mutex poisoned");
        TelemetrySnapshot {
            ticks_applied: state.ticks_applied,
            ticks_skipped: state.ticks_skipped,
            samples_ingested: state.samples_ingested,
            events_ingested: state.events_ingested,
            anomalies_seen: state.anomalies_seen,
            consecutive_failures: state.consecutive_failures,
            stale: state.stale,
        }
    }
}
