//! Sink implementations and fan-out
//!
//! Contains LogSink and FileSink, the config-driven `ConfiguredSink`, and
//! `SinkSet`, which hands one banner to every sink.

mod file;
mod log;

pub use self::file::{FileSink, FileSinkConfig};
pub use self::log::LogSink;

use contracts::{BannerSink, ContractError, RenderedBanner, SinkConfig, SinkType};
use futures::future::join_all;
use tracing::{instrument, warn};

use crate::error::{Result, SchedulerError};
use crate::metrics::{MetricsSnapshot, SinkMetrics};

/// Sink selected by configuration
pub enum ConfiguredSink {
    Log(LogSink),
    File(FileSink),
}

impl BannerSink for ConfiguredSink {
    fn name(&self) -> &str {
        match self {
            ConfiguredSink::Log(sink) => sink.name(),
            ConfiguredSink::File(sink) => sink.name(),
        }
    }

    async fn publish(&self, banner: &RenderedBanner) -> std::result::Result<(), ContractError> {
        match self {
            ConfiguredSink::Log(sink) => sink.publish(banner).await,
            ConfiguredSink::File(sink) => sink.publish(banner).await,
        }
    }
}

/// Create a sink from configuration
#[instrument(
    name = "scheduler_create_sink",
    skip(config),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
pub fn create_sink(config: &SinkConfig) -> Result<ConfiguredSink> {
    match config.sink_type {
        SinkType::Log => Ok(ConfiguredSink::Log(LogSink::new(&config.name))),
        SinkType::File => FileSink::from_params(&config.name, &config.params)
            .map(ConfiguredSink::File)
            .map_err(|e| SchedulerError::sink_creation(&config.name, e.to_string())),
    }
}

/// Create every configured sink
pub fn create_sinks(configs: &[SinkConfig]) -> Result<Vec<ConfiguredSink>> {
    configs.iter().map(create_sink).collect()
}

/// Every sink of the service with its counters
pub struct SinkSet<K> {
    sinks: Vec<(K, SinkMetrics)>,
}

impl<K> SinkSet<K>
where
    K: BannerSink + Sync,
{
    pub fn new(sinks: Vec<K>) -> Self {
        Self {
            sinks: sinks.into_iter().map(|s| (s, SinkMetrics::new())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Hand `banner` to every sink concurrently
    ///
    /// Every sink is attempted; the first failure is returned.
    pub async fn publish(&self, banner: &RenderedBanner) -> Result<()> {
        let results = join_all(self.sinks.iter().map(|(sink, metrics)| async move {
            let result = sink.publish(banner).await;
            observability::record_sink_publish(sink.name(), result.is_ok());
            match &result {
                Ok(()) => metrics.inc_write_count(),
                Err(e) => {
                    metrics.inc_failure_count();
                    warn!(sink = sink.name(), tenant = banner.tenant_id, error = %e, "publish failed");
                }
            }
            result
        }))
        .await;

        results
            .into_iter()
            .find_map(|r| r.err())
            .map_or(Ok(()), |e| Err(SchedulerError::from(e)))
    }

    /// Counters of every sink, by name
    pub fn snapshot(&self) -> Vec<(String, MetricsSnapshot)> {
        self.sinks
            .iter()
            .map(|(sink, metrics)| (sink.name().to_string(), metrics.snapshot()))
            .collect()
    }
}
