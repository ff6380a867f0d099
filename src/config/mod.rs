//! Configuration loading and validation utilities.

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use serde::Deserialize;
use tokio::fs;
use tracing::instrument;

use crate::DashboardError;

/// Command-line arguments used to bootstrap the runtime.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Opsboard live operational dashboard")]
pub struct CliArgs {
    /// Location of the dashboard configuration document.
    #[arg(long, value_name = "PATH", default_value = "dashboard.toml")]
    pub config: PathBuf,
    /// Chart window capacity override.
    #[arg(long, value_name = "SAMPLES", env = "OPSBOARD_SERIES_CAPACITY")]
    pub series_capacity: Option<usize>,
    /// Recent-events feed capacity override.
    #[arg(long, value_name = "EVENTS", env = "OPSBOARD_FEED_CAPACITY")]
    pub feed_capacity: Option<usize>,
    /// Tick interval override in milliseconds.
    #[arg(long, value_name = "MILLIS", env = "OPSBOARD_TICK_INTERVAL_MS")]
    pub tick_interval_ms: Option<u64>,
    /// Consecutive failed ticks before the views are marked stale.
    #[arg(long, value_name = "COUNT", env = "OPSBOARD_STALE_AFTER")]
    pub stale_after_failures: Option<u32>,
    /// Stop on its own after this many applied ticks.
    #[arg(long, value_name = "COUNT", env = "OPSBOARD_TICKS")]
    pub ticks: Option<u64>,
    /// Suppress console rendering.
    #[arg(long)]
    pub quiet: bool,
}

/// Capacities for the two bounded views.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BufferDefaults {
    pub series_capacity: usize,
    pub feed_capacity: usize,
}

/// Cadence defaults provided by the configuration document.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TickerDefaults {
    pub interval_ms: u64,
    pub stale_after_failures: u32,
}

/// Settings consumed by the synthetic producer.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProducerConfig {
    pub event_kind: String,
    pub anomaly_probability: f64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct DashboardDocument {
    pub buffers: BufferDefaults,
    pub ticker: TickerDefaults,
    pub producer: ProducerConfig,
}

/// Derived runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub series_capacity: usize,
    pub feed_capacity: usize,
    pub tick_interval_ms: u64,
    pub stale_after_failures: u32,
    pub tick_budget: Option<u64>,
    pub quiet: bool,
}

impl RuntimeConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Fully merged configuration set.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub cli: CliArgs,
    pub runtime: RuntimeConfig,
    pub producer: ProducerConfig,
}

impl AppConfig {
    #[instrument(skip_all)]
    pub async fn load(cli: CliArgs) -> Result<Self, DashboardError> {
        let raw = fs::read_to_string(&cli.config)
            .await
            .map_err(|err| DashboardError::Config(format!("failed to read config: {err}")))?;
        let document: DashboardDocument = toml::from_str(&raw)
            .map_err(|err| DashboardError::Config(format!("invalid config document: {err}")))?;

        let series_capacity = cli
            .series_capacity
            .unwrap_or(document.buffers.series_capacity);
        if series_capacity == 0 {
            return Err(DashboardError::Config(
                "series capacity must be positive".to_string(),
            ));
        }
        let feed_capacity = cli.feed_capacity.unwrap_or(document.buffers.feed_capacity);
        if feed_capacity == 0 {
            return Err(DashboardError::Config(
                "feed capacity must be positive".to_string(),
            ));
        }
        let tick_interval_ms = cli.tick_interval_ms.unwrap_or(document.ticker.interval_ms);
        if tick_interval_ms == 0 {
            return Err(DashboardError::Config(
                "tick interval must be positive".to_string(),
            ));
        }
        let stale_after_failures = cli
            .stale_after_failures
            .unwrap_or(document.ticker.stale_after_failures);
        if stale_after_failures == 0 {
            return Err(DashboardError::Config(
                "stale threshold must be positive".to_string(),
            ));
        }
        if cli.ticks == Some(0) {
            return Err(DashboardError::Config(
                "tick budget must be positive".to_string(),
            ));
        }

        let producer = document.producer;
        if producer.event_kind.is_empty() {
            return Err(DashboardError::Config(
                "event kind must not be empty".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&producer.anomaly_probability) {
            return Err(DashboardError::Config(format!(
                "anomaly probability {} outside [0, 1]",
                producer.anomaly_probability
            )));
        }

        let runtime = RuntimeConfig {
            series_capacity,
            feed_capacity,
            tick_interval_ms,
            stale_after_failures,
            tick_budget: cli.ticks,
            quiet: cli.quiet,
        };

        Ok(Self {
            runtime,
            producer,
            cli,
        })
    }
}
