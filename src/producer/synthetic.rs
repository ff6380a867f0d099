//! Synthetic producer standing in for a real telemetry feed.

use async_trait::async_trait;
use chrono::{Local, Utc};
use rand::{Rng, SeedableRng, distr::Alphanumeric, rngs::StdRng};

use crate::{EventRecord, Sample, TickBatch, config::ProducerConfig};

use super::{Producer, ProducerError};

/// Yields one sample and one event record per poll: a processed-events count
/// in `[0, 100)` labelled with the current local time, and an event tagged
/// with the configured kind whose anomaly flag fires with the configured
/// probability.
pub struct SyntheticProducer {
    config: ProducerConfig,
    rng: StdRng,
}

impl SyntheticProducer {
    pub fn new(config: ProducerConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic variant for tests.
    pub fn with_seed(config: ProducerConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn next_event_id(&mut self) -> String {
        let suffix: String = (&mut self.rng)
            .sample_iter(Alphanumeric)
            .take(9)
            .map(char::from)
            .collect();
        format!("EVT-{}", suffix.to_ascii_lowercase())
    }
}

#[async_trait]
impl Producer for SyntheticProducer {
    async fn poll(&mut self) -> Result<TickBatch, ProducerError> {
        let now = Utc::now();
        let label = now.with_timezone(&Local).format("%H:%M:%S").to_string();
        let value = self.rng.random_range(0..100) as f64;

        let event = EventRecord {
            event_id: self.next_event_id(),
            timestamp: now,
            kind: self.config.event_kind.clone(),
            is_anomaly: self.rng.random_bool(self.config.anomaly_probability),
        };

        Ok(TickBatch {
            samples: vec![Sample::new(label, value)],
            events: vec![event],
        })
    }
}
