//! In-memory subscription store seeded from configuration

use chrono::{DateTime, Utc};
use contracts::{ContractError, SubscriptionStore, TenantId, TenantSubscription};
use tokio::sync::RwLock;
use tracing::debug;

/// Subscriptions kept in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    subscriptions: RwLock<Vec<TenantSubscription>>,
}

impl MemoryStore {
    pub fn new(subscriptions: Vec<TenantSubscription>) -> Self {
        Self {
            subscriptions: RwLock::new(subscriptions),
        }
    }

    /// Copy of every stored subscription
    pub async fn snapshot(&self) -> Vec<TenantSubscription> {
        self.subscriptions.read().await.clone()
    }

    pub async fn get(&self, id: TenantId) -> Option<TenantSubscription> {
        self.subscriptions
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.subscriptions.read().await.len()
    }
}

impl SubscriptionStore for MemoryStore {
    async fn select_due(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<TenantSubscription>, ContractError> {
        let due: Vec<_> = self
            .subscriptions
            .read()
            .await
            .iter()
            .filter(|s| s.is_due(now))
            .cloned()
            .collect();
        debug!(due = due.len(), "due subscriptions selected");
        Ok(due)
    }

    async fn advance(&self, ids: &[TenantId], now: DateTime<Utc>) -> Result<(), ContractError> {
        let mut subscriptions = self.subscriptions.write().await;
        for subscription in subscriptions.iter_mut().filter(|s| ids.contains(&s.id)) {
            subscription.next_run = subscription.next_run_after(now);
        }
        Ok(())
    }
}
