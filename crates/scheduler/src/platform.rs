//! Static platform - guilds described by configuration
//!
//! Stands in for the live chat client when running offline: each guild's
//! member list is synthesized from its presence counts.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use contracts::{
    ContractError, GuildConfig, GuildHandle, MemberInfo, Platform, PresenceCounts, PresenceStatus,
    TenantId,
};

/// Guild with a fixed member list
#[derive(Debug, Clone)]
pub struct StaticGuild {
    id: TenantId,
    name: String,
    features: Vec<String>,
    can_manage: bool,
    members: Vec<MemberInfo>,
}

impl StaticGuild {
    pub fn from_config(config: &GuildConfig) -> Self {
        let mut members =
            Vec::with_capacity((config.humans.total() + config.bots.total()) as usize);
        push_members(&mut members, false, &config.humans);
        push_members(&mut members, true, &config.bots);

        Self {
            id: config.id,
            name: config.name.clone(),
            features: config.features.clone(),
            can_manage: config.can_manage,
            members,
        }
    }
}

fn push_members(members: &mut Vec<MemberInfo>, is_bot: bool, counts: &PresenceCounts) {
    let statuses = [
        (PresenceStatus::Online, counts.online),
        (PresenceStatus::Idle, counts.idle),
        (PresenceStatus::DoNotDisturb, counts.dnd),
        (PresenceStatus::Offline, counts.offline),
    ];
    for (status, count) in statuses {
        members.extend((0..count).map(|_| MemberInfo { is_bot, status }));
    }
}

#[async_trait]
impl GuildHandle for StaticGuild {
    fn id(&self) -> TenantId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f.eq_ignore_ascii_case(feature))
    }

    fn can_manage(&self) -> bool {
        self.can_manage
    }

    async fn members(&self) -> Result<Vec<MemberInfo>, ContractError> {
        Ok(self.members.clone())
    }
}

/// Guild registry built from configuration
#[derive(Debug, Default)]
pub struct StaticPlatform {
    guilds: HashMap<TenantId, Arc<StaticGuild>>,
}

impl StaticPlatform {
    pub fn new(guilds: &[GuildConfig]) -> Self {
        Self {
            guilds: guilds
                .iter()
                .map(|g| (g.id, Arc::new(StaticGuild::from_config(g))))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.guilds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guilds.is_empty()
    }
}

impl Platform for StaticPlatform {
    fn guild(&self, id: TenantId) -> Option<Arc<dyn GuildHandle>> {
        self.guilds
            .get(&id)
            .map(|g| Arc::clone(g) as Arc<dyn GuildHandle>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_members_synthesized_from_counts() {
        let guild = StaticGuild::from_config(&GuildConfig {
            id: 5,
            name: "Five".into(),
            features: vec!["banner".into()],
            can_manage: false,
            humans: PresenceCounts {
                online: 2,
                idle: 1,
                dnd: 1,
                offline: 3,
            },
            bots: PresenceCounts {
                offline: 1,
                ..Default::default()
            },
        });

        let members = guild.members().await.unwrap();
        assert_eq!(members.len(), 8);
        assert_eq!(members.iter().filter(|m| m.is_bot).count(), 1);
        assert_eq!(
            members
                .iter()
                .filter(|m| m.status == PresenceStatus::Idle)
                .count(),
            1
        );
        assert!(guild.has_feature("BANNER"));
        assert!(!guild.can_manage());
    }

    #[test]
    fn test_lookup() {
        let platform = StaticPlatform::new(&[GuildConfig {
            id: 9,
            name: String::new(),
            features: vec![],
            can_manage: true,
            humans: PresenceCounts::default(),
            bots: PresenceCounts::default(),
        }]);
        assert_eq!(platform.guild(9).unwrap().id(), 9);
        assert!(platform.guild(10).is_none());
        assert!(!platform.guild(9).unwrap().has_feature("BANNER"));
    }
}
