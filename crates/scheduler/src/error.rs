//! Scheduler error types
//!
//! Every variant is contained: group-level errors skip the group, tenant-level
//! errors skip the tenant. Only store failures abort a tick.

use std::time::Duration;

use contracts::{ContractError, TenantId};
use font_cache::FontError;
use protocol_router::RouterError;
use renderer::RenderError;
use thiserror::Error;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Symbolic URI did not resolve to a route
    #[error("route resolution failed for '{uri}': {result}")]
    RouteResolution { uri: String, result: &'static str },

    /// Route handler did not produce a payload for a tenant
    #[error("route '{uri}' returned {result}: {message}")]
    RouteInvocation {
        uri: String,
        result: &'static str,
        message: String,
    },

    /// Selector did not yield exactly one integer
    #[error("selector '{selector}': {message}")]
    Extract { selector: String, message: String },

    /// Target no longer carries the banner feature or the permission
    #[error("tenant {tenant_id} lost the banner feature or the manage permission")]
    InvalidTarget { tenant_id: TenantId },

    /// Bounded step exceeded its limit
    #[error("{what} timed out after {after:?}")]
    Timeout { what: &'static str, after: Duration },

    /// Worker pool semaphore closed
    #[error("worker pool '{0}' is closed")]
    PoolClosed(&'static str),

    /// Sink creation error
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },

    /// Scheduler assembled without a usable part
    #[error("invalid scheduler setup: {0}")]
    Setup(String),

    #[error("font error: {0}")]
    Font(#[from] FontError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("router error: {0}")]
    Router(#[from] RouterError),

    /// Fetch, store or sink failure (from contract)
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl SchedulerError {
    pub fn extract(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extract {
            selector: selector.into(),
            message: message.into(),
        }
    }

    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Short label for logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            Self::RouteResolution { .. } => "route_resolution",
            Self::RouteInvocation { .. } => "route_invocation",
            Self::Extract { .. } => "extract",
            Self::InvalidTarget { .. } => "invalid_target",
            Self::Timeout { .. } => "timeout",
            Self::PoolClosed(_) => "pool_closed",
            Self::SinkCreation { .. } | Self::Setup(_) => "setup",
            Self::Font(_) => "font",
            Self::Render(_) => "render",
            Self::Router(_) => "router",
            Self::Contract(ContractError::Fetch { .. }) => "fetch",
            Self::Contract(ContractError::DocumentParse { .. }) => "document_parse",
            Self::Contract(ContractError::SinkWrite { .. }) => "sink",
            Self::Contract(_) => "contract",
        }
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
