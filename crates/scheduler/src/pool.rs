//! Worker pool - fixed number of slots backed by a semaphore
//!
//! A task holds one owned permit for its whole lifetime; the permit is
//! released when the task future is dropped, whether it completed,
//! panicked or was aborted. Submission waits while every slot is busy.
//!
//! Nested fan-out uses two independent pools: group tasks hold a slot of the
//! group pool while submitting to the tenant pool, and tenant tasks never
//! submit, so no task waits on its own exhausted pool.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::trace;

use crate::error::{Result, SchedulerError};

/// Bounded task executor
#[derive(Debug, Clone)]
pub struct WorkerPool {
    label: &'static str,
    slots: usize,
    semaphore: Arc<Semaphore>,
    counters: Arc<SlotCounters>,
}

#[derive(Debug, Default)]
struct SlotCounters {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl WorkerPool {
    /// Pool with `slots` concurrent tasks (at least one)
    pub fn new(label: &'static str, slots: usize) -> Self {
        let slots = slots.max(1);
        Self {
            label,
            slots,
            semaphore: Arc::new(Semaphore::new(slots)),
            counters: Arc::new(SlotCounters::default()),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Slots currently free
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Tasks currently holding a slot
    pub fn in_flight(&self) -> usize {
        self.counters.in_flight.load(Ordering::Relaxed)
    }

    /// Highest `in_flight` observed since creation
    pub fn peak_in_flight(&self) -> usize {
        self.counters.peak.load(Ordering::Relaxed)
    }

    /// Wait for a free slot, then spawn `task` into `tasks`
    ///
    /// # Errors
    /// `PoolClosed` if the semaphore was closed
    pub async fn submit<T, F>(&self, tasks: &mut JoinSet<T>, task: F) -> Result<()>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| SchedulerError::PoolClosed(self.label))?;
        let slot = SlotGuard::enter(self.label, Arc::clone(&self.counters));

        tasks.spawn(async move {
            let _slot = slot;
            let _permit = permit;
            task.await
        });
        Ok(())
    }

    /// Refuse every further submission
    pub fn close(&self) {
        self.semaphore.close();
    }
}

/// Accounts one occupied slot until dropped
struct SlotGuard {
    label: &'static str,
    counters: Arc<SlotCounters>,
}

impl SlotGuard {
    fn enter(label: &'static str, counters: Arc<SlotCounters>) -> Self {
        let current = counters.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        counters.peak.fetch_max(current, Ordering::Relaxed);
        observability::record_pool_in_flight(label, current);
        trace!(pool = label, in_flight = current, "slot acquired");
        Self { label, counters }
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        let current = self.counters.in_flight.fetch_sub(1, Ordering::Relaxed) - 1;
        observability::record_pool_in_flight(self.label, current);
    }
}
