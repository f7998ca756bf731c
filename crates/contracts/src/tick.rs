//! TickStats - summary of one scheduler tick

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TenantId;

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickStats {
    /// Selection time (`now` of the tick)
    pub started_at: DateTime<Utc>,

    /// Subscriptions selected as due
    pub due: usize,

    /// Distinct data sources among them
    pub groups: usize,

    /// Data-source resolutions performed (one per group)
    pub fetches: usize,

    /// Groups skipped because their source could not be resolved
    pub fetch_failures: usize,

    /// Banners rendered and published
    pub rendered: usize,

    /// Tenants that failed after their source resolved
    pub failed: usize,

    /// Tenants whose target lost the banner feature or the permission
    pub invalid_tenants: Vec<TenantId>,

    /// Wall time from selection to barrier
    pub duration_ms: f64,
}

impl TickStats {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            ..Default::default()
        }
    }

    /// Tenants that did not get a new banner this tick
    pub fn skipped(&self) -> usize {
        self.due - self.rendered
    }

    /// Fold another partial report into this one
    pub fn merge(&mut self, other: TickStats) {
        self.due += other.due;
        self.groups += other.groups;
        self.fetches += other.fetches;
        self.fetch_failures += other.fetch_failures;
        self.rendered += other.rendered;
        self.failed += other.failed;
        self.invalid_tenants.extend(other.invalid_tenants);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_and_skipped() {
        let mut total = TickStats::new(Utc::now());
        total.due = 4;
        total.merge(TickStats {
            rendered: 1,
            failed: 1,
            invalid_tenants: vec![9],
            ..Default::default()
        });
        total.merge(TickStats {
            rendered: 1,
            ..Default::default()
        });
        assert_eq!(total.rendered, 2);
        assert_eq!(total.skipped(), 2);
        assert_eq!(total.invalid_tenants, vec![9]);
    }
}
