//! ServiceBlueprint - Config Loader output
//!
//! Describes the whole service: tick scheduling, font catalog, sinks, the
//! static platform description used offline, and the seed subscriptions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::{TenantId, TenantSubscription};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Tick driver and worker pools
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Font catalog location
    pub fonts: FontsConfig,

    /// Output routing
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,

    /// Guilds known to the offline platform
    #[serde(default)]
    pub guilds: Vec<GuildConfig>,

    /// Seed subscriptions for the in-memory store
    #[serde(default)]
    pub subscriptions: Vec<TenantSubscription>,
}

/// Tick driver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between two ticks
    #[serde(default = "default_tick_period_secs")]
    pub tick_period_secs: u64,

    /// Slots of each worker pool (group pool and tenant pool)
    #[serde(default = "default_worker_slots")]
    pub worker_slots: usize,

    /// Upper bound for resolving one data source (0 = unbounded)
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Upper bound for one tenant task (0 = unbounded)
    #[serde(default = "default_tenant_timeout_secs")]
    pub tenant_timeout_secs: u64,
}

fn default_tick_period_secs() -> u64 {
    60
}

fn default_worker_slots() -> usize {
    5
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_tenant_timeout_secs() -> u64 {
    120
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_period_secs: default_tick_period_secs(),
            worker_slots: default_worker_slots(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            tenant_timeout_secs: default_tenant_timeout_secs(),
        }
    }
}

impl SchedulerConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(self.tick_period_secs)
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.fetch_timeout_secs)
    }

    pub fn tenant_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.tenant_timeout_secs)
    }
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Font catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontsConfig {
    /// Google Fonts webfonts JSON (`items[].family / variants / files`)
    pub catalog_path: PathBuf,
}

/// Sink output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink name
    pub name: String,

    /// Sink type
    pub sink_type: SinkType,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// Log a summary
    Log,
    /// Write `<base_path>/<tenant>.png`
    File,
}

/// Guild as seen by the offline platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildConfig {
    pub id: TenantId,

    #[serde(default)]
    pub name: String,

    /// Advertised features
    #[serde(default = "default_features")]
    pub features: Vec<String>,

    /// Whether the bot holds the manage-guild permission
    #[serde(default = "default_can_manage")]
    pub can_manage: bool,

    #[serde(default)]
    pub humans: PresenceCounts,

    #[serde(default)]
    pub bots: PresenceCounts,
}

fn default_features() -> Vec<String> {
    vec![crate::BANNER_FEATURE.to_string()]
}

fn default_can_manage() -> bool {
    true
}

/// Member counts per presence status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceCounts {
    #[serde(default)]
    pub online: u32,
    #[serde(default)]
    pub idle: u32,
    #[serde(default)]
    pub dnd: u32,
    #[serde(default)]
    pub offline: u32,
}

impl PresenceCounts {
    pub fn total(&self) -> u32 {
        self.online + self.idle + self.dnd + self.offline
    }
}
