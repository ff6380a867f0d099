//! Tick scheduling driving producer polls into the dashboard state.

use std::sync::Arc;

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{instrument, warn};

use crate::{
    DashboardError,
    config::RuntimeConfig,
    producer::Producer,
    sink::ViewSink,
    state::StateHandle,
    telemetry::TickTelemetry,
};

/// Cadence driver with two states, `Stopped` (initial) and `Running`.
///
/// `start` and `stop` are idempotent; a stopped ticker can be started again
/// and resumes with the same producer. While running, ticks fire on a fixed
/// interval; a scheduled tick is skipped when the previous one has not yet
/// completed, so in-flight ticks never overlap.
pub struct Ticker {
    runtime: RuntimeConfig,
    state: StateHandle,
    telemetry: TickTelemetry,
    sink: Arc<dyn ViewSink>,
    // Exactly one of these is `Some`: the producer is held here while
    // stopped and lives inside the tick task while running.
    producer: Option<Box<dyn Producer>>,
    running: Option<RunningTicker>,
}

struct RunningTicker {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<Box<dyn Producer>>,
}

/// What became of one scheduled tick.
#[derive(Debug, PartialEq, Eq)]
enum TickOutcome {
    /// The batch was applied and the sink refreshed.
    Applied,
    /// The producer failed or the batch was invalid; buffers untouched.
    Skipped,
    /// The producer result landed after `stop()` and was dropped.
    Discarded,
}

impl Ticker {
    pub fn new(
        runtime: RuntimeConfig,
        producer: Box<dyn Producer>,
        sink: Arc<dyn ViewSink>,
        state: StateHandle,
        telemetry: TickTelemetry,
    ) -> Self {
        Self {
            runtime,
            state,
            telemetry,
            sink,
            producer: Some(producer),
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Transitions Stopped -> Running. No-op while already running.
    pub fn start(&mut self) {
        let Some(producer) = self.producer.take() else {
            return;
        };
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run_loop(
            self.runtime.clone(),
            self.state.clone(),
            self.telemetry.clone(),
            self.sink.clone(),
            producer,
            stop_rx,
        ));
        self.running = Some(RunningTicker { stop_tx, handle });
    }

    /// Transitions Running -> Stopped. No-op while already stopped.
    ///
    /// An in-flight producer call is not cancelled; its result, once it
    /// lands, is discarded rather than applied, so the buffers stay at
    /// their pre-tick state.
    pub async fn stop(&mut self) -> Result<(), DashboardError> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };
        let _ = running.stop_tx.send(true);
        let producer = running.handle.await?;
        self.producer = Some(producer);
        Ok(())
    }

    /// Waits for the tick loop to end on its own (tick budget exhausted).
    /// Without a budget this only returns once the ticker is stopped.
    pub async fn wait(&mut self) -> Result<(), DashboardError> {
        if let Some(running) = self.running.as_mut() {
            let producer = (&mut running.handle).await?;
            self.running = None;
            self.producer = Some(producer);
        }
        Ok(())
    }
}

#[instrument(skip_all)]
async fn run_loop(
    runtime: RuntimeConfig,
    state: StateHandle,
    telemetry: TickTelemetry,
    sink: Arc<dyn ViewSink>,
    mut producer: Box<dyn Producer>,
    mut stop_rx: watch::Receiver<bool>,
) -> Box<dyn Producer> {
    let period = runtime.tick_interval();
    // First tick one full period after start, matching a fresh dashboard
    // that fills in as data arrives.
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut applied: u64 = 0;
    loop {
        tokio::select! {
            _ = stop_rx.changed() => break,
            _ = interval.tick() => {
                let outcome =
                    process_tick(&state, &telemetry, &sink, producer.as_mut(), &stop_rx).await;
                match outcome {
                    TickOutcome::Applied => {
                        applied += 1;
                        if runtime.tick_budget.is_some_and(|budget| applied >= budget) {
                            break;
                        }
                    }
                    TickOutcome::Skipped => {}
                    TickOutcome::Discarded => {}
                }
            }
        }
    }
    producer
}

/// One atomic tick step: poll the producer, apply the whole batch, push a
/// single batched refresh. A failed poll or invalid batch skips the update
/// entirely and never stops the schedule.
async fn process_tick(
    state: &StateHandle,
    telemetry: &TickTelemetry,
    sink: &Arc<dyn ViewSink>,
    producer: &mut dyn Producer,
    stop_rx: &watch::Receiver<bool>,
) -> TickOutcome {
    let batch = match producer.poll().await {
        Ok(batch) => batch,
        Err(err) => {
            warn!(target: "ticker", error = %err, "producer failed, tick skipped");
            if telemetry.record_failure() {
                sink.staleness_changed(true).await;
            }
            return TickOutcome::Skipped;
        }
    };

    // Results landing after stop() are discarded, never applied.
    if *stop_rx.borrow() {
        return TickOutcome::Discarded;
    }

    let samples = batch.samples.len();
    let events = batch.events.len();
    let anomalies = batch.anomaly_count();
    let (chart, feed) = match state.apply_and_snapshot(batch) {
        Ok(snapshots) => snapshots,
        Err(err) => {
            warn!(target: "ticker", error = %err, "invalid batch rejected, tick skipped");
            if telemetry.record_failure() {
                sink.staleness_changed(true).await;
            }
            return TickOutcome::Skipped;
        }
    };

    if telemetry.record_applied(samples, events, anomalies) {
        sink.staleness_changed(false).await;
    }
    if let Err(err) = sink.refresh(chart, feed).await {
        warn!(target: "ticker", error = %err, "view sink refresh failed");
    }
    TickOutcome::Applied
}
