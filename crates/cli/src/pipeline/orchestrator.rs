//! Pipeline orchestrator - wires the scheduler from the blueprint.
//!
//! Offline wiring: HTTP fetcher, static platform from `[[guilds]]`, in-memory
//! store seeded from `[[subscriptions]]`, sinks from `[[sinks]]`.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use contracts::ServiceBlueprint;
use font_cache::{FontCache, FontCatalog};
use observability::TickMetricsAggregator;
use scheduler::{
    create_sinks, CancellationToken, HttpFetcher, MemoryStore, SchedulerBuilder, StaticPlatform,
};
use tracing::info;

use super::PipelineStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The service blueprint
    pub blueprint: ServiceBlueprint,

    /// Run a single tick instead of the loop
    pub once: bool,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run until `shutdown` (or after one tick with `once`)
    pub async fn run(self, shutdown: CancellationToken) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let catalog = FontCatalog::load(&blueprint.fonts.catalog_path).with_context(|| {
            format!(
                "Failed to load font catalog from {}",
                blueprint.fonts.catalog_path.display()
            )
        })?;
        let fonts = Arc::new(FontCache::new(Arc::new(catalog)));

        let fetcher = Arc::new(HttpFetcher::new(blueprint.scheduler.fetch_timeout())?);
        let platform = Arc::new(StaticPlatform::new(&blueprint.guilds));
        let store = MemoryStore::new(blueprint.subscriptions.clone());
        let sinks = create_sinks(&blueprint.sinks).context("Failed to create sinks")?;

        let scheduler = SchedulerBuilder::new(
            blueprint.scheduler.clone(),
            store,
            fetcher,
            platform,
            fonts,
        )
        .sinks(sinks)
        .build()
        .context("Failed to build scheduler")?;

        info!(
            guilds = blueprint.guilds.len(),
            fonts = scheduler.fonts().catalog().len(),
            "Scheduler ready"
        );

        let summary = if self.config.once {
            let stats = scheduler.run_tick(Utc::now()).await?;
            let mut aggregator = TickMetricsAggregator::new();
            aggregator.update(&stats);
            aggregator.summary()
        } else {
            scheduler.run(shutdown).await
        };

        Ok(PipelineStats {
            duration: start_time.elapsed(),
            summary,
            fonts: scheduler.fonts().stats(),
            sinks: scheduler.sink_metrics(),
        })
    }
}
