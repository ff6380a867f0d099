//! Producer seam feeding the dashboard on each tick.

use async_trait::async_trait;
use thiserror::Error;

use crate::{DashboardError, TickBatch};

pub mod synthetic;

/// Raised when a producer cannot yield data for a tick. The tick is skipped
/// and the schedule continues; this error never stops the dashboard.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ProducerError(pub String);

impl From<ProducerError> for DashboardError {
    fn from(err: ProducerError) -> Self {
        Self::Producer(err.0)
    }
}

/// Trait implemented by telemetry sources polled once per tick.
///
/// Implementations own their latency: the core imposes no timeout, and a
/// poll that outlives the tick interval causes later ticks to be skipped
/// rather than overlapped.
#[async_trait]
pub trait Producer: Send {
    async fn poll(&mut self) -> Result<TickBatch, ProducerError>;
}
