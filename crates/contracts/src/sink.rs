//! BannerSink trait - final upload of a rendered banner
//!
//! The real upload target is external; the pipeline observes only success or
//! failure.

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::{ContractError, TenantId};

/// A rendered banner ready for upload
#[derive(Debug, Clone)]
pub struct RenderedBanner {
    /// Tenant the banner belongs to
    pub tenant_id: TenantId,

    /// Value drawn onto the template
    pub value: i64,

    /// PNG-encoded image
    pub png: Bytes,

    pub width: u32,
    pub height: u32,

    /// Tick that produced the banner
    pub rendered_at: DateTime<Utc>,
}

/// Banner output trait
///
/// Shared by all tenant tasks of a tick, so it takes `&self`.
#[trait_variant::make(BannerSink: Send)]
pub trait LocalBannerSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Upload one banner
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn publish(&self, banner: &RenderedBanner) -> Result<(), ContractError>;
}
