//! Refresh pipeline metrics
//!
//! Prometheus series are emitted through the `metrics` facade; the
//! aggregator keeps an in-process summary for `--once` runs and tests.

use std::collections::HashMap;

use contracts::TickStats;
use metrics::{counter, gauge, histogram};

/// Record one finished tick
///
/// # Example
///
/// ```ignore
/// let stats = scheduler.run_tick(Utc::now()).await?;
/// observability::metrics::record_tick(&stats);
/// ```
pub fn record_tick(stats: &TickStats) {
    counter!("banner_refresher_ticks_total").increment(1);
    histogram!("banner_refresher_tick_duration_ms").record(stats.duration_ms);

    gauge!("banner_refresher_due_tenants").set(stats.due as f64);
    gauge!("banner_refresher_source_groups").set(stats.groups as f64);

    counter!("banner_refresher_banners_rendered_total").increment(stats.rendered as u64);
    if stats.failed > 0 {
        counter!("banner_refresher_tenant_failures_total").increment(stats.failed as u64);
    }
    if stats.fetch_failures > 0 {
        counter!("banner_refresher_group_failures_total").increment(stats.fetch_failures as u64);
    }
    if !stats.invalid_tenants.is_empty() {
        counter!("banner_refresher_invalid_tenants_total")
            .increment(stats.invalid_tenants.len() as u64);
    }
}

/// Record one data-source resolution (`kind` is `http` or `route`)
pub fn record_source_fetch(kind: &'static str, success: bool) {
    counter!(
        "banner_refresher_source_fetches_total",
        "kind" => kind,
        "status" => status(success)
    )
    .increment(1);
}

/// Record the outcome of one tenant task
pub fn record_tenant_outcome(outcome: &'static str) {
    counter!("banner_refresher_tenant_outcomes_total", "outcome" => outcome).increment(1);
}

/// Record one banner upload
pub fn record_sink_publish(sink_name: &str, success: bool) {
    counter!(
        "banner_refresher_sink_publish_total",
        "sink" => sink_name.to_string(),
        "status" => status(success)
    )
    .increment(1);
}

/// Record the number of busy slots of a worker pool
pub fn record_pool_in_flight(pool: &'static str, in_flight: usize) {
    gauge!("banner_refresher_pool_in_flight", "pool" => pool).set(in_flight as f64);
}

/// Record the render time of one banner
pub fn record_render_ms(render_ms: f64) {
    histogram!("banner_refresher_render_ms").record(render_ms);
}

fn status(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

/// Tick metrics aggregator
///
/// Aggregates tick reports in memory for a run summary.
#[derive(Debug, Clone, Default)]
pub struct TickMetricsAggregator {
    /// Ticks seen
    pub total_ticks: u64,

    /// Tenants selected across all ticks
    pub total_due: u64,

    /// Banners published
    pub total_rendered: u64,

    /// Tenant failures after a resolved source
    pub total_failed: u64,

    /// Groups skipped on source failure
    pub total_group_failures: u64,

    /// Tick wall time
    pub duration_stats: RunningStats,

    /// Tenants selected per tick
    pub due_stats: RunningStats,

    /// Invalid-target count per tenant
    pub invalid_counts: HashMap<u64, u64>,
}

impl TickMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one tick report into the aggregate
    pub fn update(&mut self, stats: &TickStats) {
        self.total_ticks += 1;
        self.total_due += stats.due as u64;
        self.total_rendered += stats.rendered as u64;
        self.total_failed += stats.failed as u64;
        self.total_group_failures += stats.fetch_failures as u64;

        self.duration_stats.push(stats.duration_ms);
        self.due_stats.push(stats.due as f64);

        for tenant in &stats.invalid_tenants {
            *self.invalid_counts.entry(*tenant).or_insert(0) += 1;
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_ticks: self.total_ticks,
            total_due: self.total_due,
            total_rendered: self.total_rendered,
            total_failed: self.total_failed,
            total_group_failures: self.total_group_failures,
            success_rate: if self.total_due > 0 {
                self.total_rendered as f64 / self.total_due as f64 * 100.0
            } else {
                0.0
            },
            tick_duration_ms: StatsSummary::from(&self.duration_stats),
            due_per_tick: StatsSummary::from(&self.due_stats),
            invalid_counts: self.invalid_counts.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Run summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_ticks: u64,
    pub total_due: u64,
    pub total_rendered: u64,
    pub total_failed: u64,
    pub total_group_failures: u64,
    pub success_rate: f64,
    pub tick_duration_ms: StatsSummary,
    pub due_per_tick: StatsSummary,
    pub invalid_counts: HashMap<u64, u64>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Banner Refresh Summary ===")?;
        writeln!(f, "Ticks: {}", self.total_ticks)?;
        writeln!(
            f,
            "Banners rendered: {}/{} ({:.2}%)",
            self.total_rendered, self.total_due, self.success_rate
        )?;
        writeln!(f, "Tenant failures: {}", self.total_failed)?;
        writeln!(f, "Skipped groups: {}", self.total_group_failures)?;
        writeln!(f, "Tick duration (ms): {}", self.tick_duration_ms)?;
        writeln!(f, "Due per tick: {}", self.due_per_tick)?;

        if !self.invalid_counts.is_empty() {
            writeln!(f, "Invalid tenants:")?;
            let mut tenants: Vec<_> = self.invalid_counts.iter().collect();
            tenants.sort();
            for (tenant, count) in tenants {
                writeln!(f, "  {}: {}", tenant, count)?;
            }
        }

        Ok(())
    }
}

/// Summary of one running statistic
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online mean/variance (Welford)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
