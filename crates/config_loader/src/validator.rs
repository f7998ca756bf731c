//! Configuration validation
//!
//! Rules:
//! - subscription id unique
//! - guild id unique
//! - tick period > 0, worker slots >= 1
//! - interval_minutes > 0, 0 < font_size <= RenderStyle::MAX_FONT_SIZE
//! - source URI parses with an http / https / ddb scheme
//! - selector not empty
//! - at least one sink, sink names present and unique

use std::collections::HashSet;

use contracts::{
    ContractError, RenderStyle, ServiceBlueprint, TenantSubscription, INTERNAL_SCHEME,
};
use url::Url;

/// Validate a ServiceBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &ServiceBlueprint) -> Result<(), ContractError> {
    validate_scheduler(blueprint)?;
    validate_subscription_ids(blueprint)?;
    validate_guild_ids(blueprint)?;
    for subscription in &blueprint.subscriptions {
        validate_subscription(subscription)?;
    }
    validate_sinks(blueprint)?;
    Ok(())
}

fn validate_scheduler(blueprint: &ServiceBlueprint) -> Result<(), ContractError> {
    let scheduler = &blueprint.scheduler;
    if scheduler.tick_period_secs == 0 {
        return Err(ContractError::config_validation(
            "scheduler.tick_period_secs",
            "tick_period_secs must be > 0",
        ));
    }
    if scheduler.worker_slots == 0 {
        return Err(ContractError::config_validation(
            "scheduler.worker_slots",
            "worker_slots must be >= 1",
        ));
    }
    Ok(())
}

fn validate_subscription_ids(blueprint: &ServiceBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for subscription in &blueprint.subscriptions {
        if !seen.insert(subscription.id) {
            return Err(ContractError::config_validation(
                format!("subscriptions[id={}]", subscription.id),
                "duplicate subscription id",
            ));
        }
    }
    Ok(())
}

fn validate_guild_ids(blueprint: &ServiceBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for guild in &blueprint.guilds {
        if !seen.insert(guild.id) {
            return Err(ContractError::config_validation(
                format!("guilds[id={}]", guild.id),
                "duplicate guild id",
            ));
        }
    }
    Ok(())
}

/// Validate one subscription in isolation
pub fn validate_subscription(subscription: &TenantSubscription) -> Result<(), ContractError> {
    let field = |name: &str| format!("subscriptions[{}].{}", subscription.id, name);

    if subscription.interval_minutes == 0 {
        return Err(ContractError::config_validation(
            field("interval_minutes"),
            "interval_minutes must be > 0",
        ));
    }

    if !subscription.style.font_size_in_range() {
        return Err(ContractError::config_validation(
            field("style.font_size"),
            format!(
                "font_size must be in (0, {}], got {}",
                RenderStyle::MAX_FONT_SIZE,
                subscription.style.font_size
            ),
        ));
    }

    if subscription.selector.trim().is_empty() {
        return Err(ContractError::config_validation(
            field("selector"),
            "selector cannot be empty",
        ));
    }

    let uri = Url::parse(subscription.source.as_str()).map_err(|e| {
        ContractError::config_validation(field("source"), format!("invalid URI: {e}"))
    })?;
    match uri.scheme() {
        "http" | "https" => {}
        scheme if scheme == INTERNAL_SCHEME => {}
        other => {
            return Err(ContractError::config_validation(
                field("source"),
                format!("unsupported scheme '{other}'"),
            ));
        }
    }

    Ok(())
}

fn validate_sinks(blueprint: &ServiceBlueprint) -> Result<(), ContractError> {
    if blueprint.sinks.is_empty() {
        return Err(ContractError::config_validation(
            "sinks",
            "at least one sink is required",
        ));
    }

    let mut seen = HashSet::new();
    for (idx, sink) in blueprint.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("sinks[{}].name", idx),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(sink.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("sinks[{}].name", idx),
                format!("duplicate sink name '{}'", sink.name),
            ));
        }
    }
    Ok(())
}
