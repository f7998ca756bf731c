//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the banner refresher.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Time Model
//! - All timestamps are UTC (`chrono::DateTime<Utc>`)
//! - A subscription's `next_run` is the only field the pipeline mutates

mod blueprint;
mod error;
mod fetch;
mod platform;
mod sink;
mod source_uri;
mod store;
mod subscription;
mod tick;

pub use blueprint::*;
pub use error::*;
pub use fetch::{LocalResourceFetcher, ResourceFetcher};
pub use platform::*;
pub use sink::*;
pub use source_uri::{SourceUri, INTERNAL_SCHEME};
pub use store::{LocalSubscriptionStore, SubscriptionStore};
pub use subscription::*;
pub use tick::TickStats;
