//! SubscriptionStore trait - persistent tenant configuration
//!
//! Storage is an external collaborator; the scheduler only selects due
//! subscriptions and advances their next-run marker.

use chrono::{DateTime, Utc};

use crate::{ContractError, TenantId, TenantSubscription};

#[trait_variant::make(SubscriptionStore: Send)]
pub trait LocalSubscriptionStore {
    /// All enabled subscriptions whose `next_run <= now`
    async fn select_due(&self, now: DateTime<Utc>)
        -> Result<Vec<TenantSubscription>, ContractError>;

    /// Set `next_run = now + interval` for each listed subscription
    async fn advance(&self, ids: &[TenantId], now: DateTime<Utc>) -> Result<(), ContractError>;
}
