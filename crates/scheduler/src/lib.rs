//! # Scheduler
//!
//! Periodic banner refresh: selects due subscriptions, fetches each data
//! source once per tick, renders every tenant's banner and hands it to the
//! sinks.
//!
//! ## Architecture
//!
//! ```text
//! tick ──► SubscriptionStore::select_due / advance
//!            │
//!            ▼ group by source URI
//!       group pool ──► SourceFetcher (HTTP + JSON | ddb route)
//!                        │
//!                        ▼ one task per tenant
//!                   tenant pool ──► selector → template → font → render → SinkSet
//! ```
//!
//! Both pools have `worker_slots` slots; a group task never waits on a slot
//! of its own pool.

mod error;
pub mod http;
mod metrics;
pub mod platform;
mod pool;
mod scheduler;
mod selector;
pub mod sinks;
mod source;
pub mod store;

#[cfg(test)]
mod testing;

pub use error::{Result, SchedulerError};
pub use http::HttpFetcher;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use platform::{StaticGuild, StaticPlatform};
pub use pool::WorkerPool;
pub use scheduler::{group_by_source, Scheduler, SchedulerBuilder, SourceGroup};
pub use selector::extract_value;
pub use sinks::{create_sink, create_sinks, ConfiguredSink, FileSink, LogSink, SinkSet};
pub use source::{SourceFetcher, SourceHandle};
pub use store::MemoryStore;

// Re-export for binaries driving `Scheduler::run`
pub use tokio_util::sync::CancellationToken;
