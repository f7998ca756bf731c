//! Platform abstraction - the chat platform hosting the tenants
//!
//! The live client is an external collaborator. The pipeline only needs to
//! look up a tenant's guild, check its capabilities, and hand the guild to
//! route handlers as runtime context.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{ContractError, TenantId};

/// Guild feature flag required to carry a banner
pub const BANNER_FEATURE: &str = "BANNER";

/// Presence of a guild member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceStatus {
    Online,
    Idle,
    DoNotDisturb,
    Offline,
}

/// Member summary exposed by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberInfo {
    pub is_bot: bool,
    pub status: PresenceStatus,
}

/// Live handle to one guild
///
/// Object safe: route handlers receive it as `Arc<dyn GuildHandle>`.
#[async_trait]
pub trait GuildHandle: Send + Sync + fmt::Debug {
    /// Guild ID (equals the tenant ID)
    fn id(&self) -> TenantId;

    /// Display name
    fn name(&self) -> &str;

    /// Whether the guild advertises a platform feature (e.g. `BANNER`)
    fn has_feature(&self, feature: &str) -> bool;

    /// Whether the bot still holds the manage-guild permission
    fn can_manage(&self) -> bool;

    /// Fetch the full member list
    async fn members(&self) -> Result<Vec<MemberInfo>, ContractError>;
}

/// Guild lookup
pub trait Platform: Send + Sync {
    /// Live guild for a tenant, `None` if the bot left it
    fn guild(&self, id: TenantId) -> Option<Arc<dyn GuildHandle>>;
}

impl<P: Platform + ?Sized> Platform for Arc<P> {
    fn guild(&self, id: TenantId) -> Option<Arc<dyn GuildHandle>> {
        (**self).guild(id)
    }
}
