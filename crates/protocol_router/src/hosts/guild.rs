//! `guild` host: statistics about the tenant's own guild
//!
//! - `ddb://guild/members/count` → `{all, humans: {..}, bots: {..}}`
//! - `ddb://guild` → `{id, name, all}`

use std::sync::Arc;

use contracts::{GuildHandle, MemberInfo, PresenceStatus};
use serde_json::{json, Value};

use crate::error::Result;
use crate::handler::{HandlerReply, HandlerResult};
use crate::table::RouteTableBuilder;
use crate::{BoundArgs, ContextKind};

pub const HOST: &str = "guild";

pub fn register(builder: &mut RouteTableBuilder) -> Result<()> {
    builder
        .route(HOST, "", &[ContextKind::Guild], summary)?
        .route(HOST, "members/count", &[ContextKind::Guild], member_count)?;
    Ok(())
}

fn summary(args: BoundArgs) -> HandlerReply {
    match args.guild(0) {
        Ok(guild) => HandlerReply::deferred(guild_summary(guild)),
        Err(e) => HandlerReply::failed(e),
    }
}

fn member_count(args: BoundArgs) -> HandlerReply {
    match args.guild(0) {
        Ok(guild) => HandlerReply::deferred(count_members(guild)),
        Err(e) => HandlerReply::failed(e),
    }
}

async fn guild_summary(guild: Arc<dyn GuildHandle>) -> HandlerResult {
    let members = guild.members().await?;
    Ok(json!({
        "id": guild.id(),
        "name": guild.name(),
        "all": members.len(),
    }))
}

async fn count_members(guild: Arc<dyn GuildHandle>) -> HandlerResult {
    let members = guild.members().await?;
    let (bots, humans): (Vec<MemberInfo>, Vec<MemberInfo>) =
        members.iter().partition(|m| m.is_bot);
    Ok(json!({
        "all": members.len(),
        "humans": PresenceStats::count(&humans).to_json(),
        "bots": PresenceStats::count(&bots).to_json(),
    }))
}

/// Member counts by presence
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct PresenceStats {
    all: u32,
    online: u32,
    away: u32,
    dnd: u32,
    offline: u32,
}

impl PresenceStats {
    fn count(members: &[MemberInfo]) -> Self {
        members.iter().fold(Self::default(), |mut stats, member| {
            stats.all += 1;
            match member.status {
                PresenceStatus::Online => stats.online += 1,
                PresenceStatus::Idle => stats.away += 1,
                PresenceStatus::DoNotDisturb => stats.dnd += 1,
                PresenceStatus::Offline => stats.offline += 1,
            }
            stats
        })
    }

    fn to_json(self) -> Value {
        json!({
            "all": self.all,
            "online": self.online,
            "away": self.away,
            "dnd": self.dnd,
            "offline": self.offline,
            "not_offline": self.all - self.offline,
        })
    }
}
