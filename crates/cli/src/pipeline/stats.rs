//! Pipeline statistics.

use std::time::Duration;

use font_cache::CacheStats;
use observability::MetricsSummary;
use scheduler::MetricsSnapshot;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Total duration of the run
    pub duration: Duration,

    /// Aggregated tick metrics
    pub summary: MetricsSummary,

    /// Font cache counters
    pub fonts: CacheStats,

    /// Per-sink counters
    pub sinks: Vec<(String, MetricsSnapshot)>,
}

impl PipelineStats {
    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Refresh Statistics                        ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Ticks: {}", self.summary.total_ticks);
        println!(
            "   ├─ Banners: {}/{} ({:.2}%)",
            self.summary.total_rendered, self.summary.total_due, self.summary.success_rate
        );
        println!("   ├─ Tenant failures: {}", self.summary.total_failed);
        println!("   └─ Skipped groups: {}", self.summary.total_group_failures);

        println!("\n📈 Timing");
        println!("   ├─ Tick duration (ms): {}", self.summary.tick_duration_ms);
        println!("   └─ Due per tick: {}", self.summary.due_per_tick);

        println!("\n🔤 Fonts");
        println!("   ├─ Loaded: {}", self.fonts.loads);
        println!("   └─ Cache hits: {}", self.fonts.hits);

        if !self.sinks.is_empty() {
            println!("\n📤 Sinks");
            for (i, (name, metrics)) in self.sinks.iter().enumerate() {
                let prefix = if i == self.sinks.len() - 1 { "└─" } else { "├─" };
                println!(
                    "   {} {}: {} written, {} failed",
                    prefix, name, metrics.write_count, metrics.failure_count
                );
            }
        }

        if !self.summary.invalid_counts.is_empty() {
            println!("\n⚠️  Invalid Tenants");
            let mut tenants: Vec<_> = self.summary.invalid_counts.iter().collect();
            tenants.sort();
            for (tenant, count) in tenants {
                println!("   ├─ {}: {}", tenant, count);
            }
        }

        println!();
    }
}
