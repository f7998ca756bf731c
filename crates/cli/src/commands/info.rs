//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{ServiceBlueprint, BANNER_FEATURE};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    scheduler: SchedulerInfo,
    font_catalog: String,
    guilds: Vec<GuildInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    subscriptions: Vec<SubscriptionInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sinks: Vec<SinkInfo>,
}

#[derive(Serialize)]
struct SchedulerInfo {
    tick_period_secs: u64,
    worker_slots: usize,
    fetch_timeout_secs: u64,
    tenant_timeout_secs: u64,
}

#[derive(Serialize)]
struct GuildInfo {
    id: u64,
    name: String,
    banner: bool,
    can_manage: bool,
    humans: u32,
    bots: u32,
}

#[derive(Serialize)]
struct SubscriptionInfo {
    id: u64,
    enabled: bool,
    source: String,
    selector: String,
    interval_minutes: u32,
    font: String,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    sink_type: String,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args);
    }

    Ok(())
}

fn build_config_info(blueprint: &ServiceBlueprint, args: &InfoArgs) -> ConfigInfo {
    let guilds = blueprint
        .guilds
        .iter()
        .map(|g| GuildInfo {
            id: g.id,
            name: g.name.clone(),
            banner: g.features.iter().any(|f| f == BANNER_FEATURE),
            can_manage: g.can_manage,
            humans: g.humans.total(),
            bots: g.bots.total(),
        })
        .collect();

    let subscriptions = if args.subscriptions {
        blueprint
            .subscriptions
            .iter()
            .map(|s| SubscriptionInfo {
                id: s.id,
                enabled: s.enabled,
                source: s.source.to_string(),
                selector: s.selector.clone(),
                interval_minutes: s.interval_minutes,
                font: format!("{} {}", s.style.font_family, s.style.font_variant),
            })
            .collect()
    } else {
        Vec::new()
    };

    let sinks = if args.sinks {
        blueprint
            .sinks
            .iter()
            .map(|s| SinkInfo {
                name: s.name.clone(),
                sink_type: format!("{:?}", s.sink_type),
            })
            .collect()
    } else {
        Vec::new()
    };

    let scheduler = &blueprint.scheduler;
    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        scheduler: SchedulerInfo {
            tick_period_secs: scheduler.tick_period_secs,
            worker_slots: scheduler.worker_slots,
            fetch_timeout_secs: scheduler.fetch_timeout_secs,
            tenant_timeout_secs: scheduler.tenant_timeout_secs,
        },
        font_catalog: blueprint.fonts.catalog_path.display().to_string(),
        guilds,
        subscriptions,
        sinks,
    }
}

fn tree_prefix(index: usize, len: usize) -> &'static str {
    if index + 1 == len {
        "└─"
    } else {
        "├─"
    }
}

fn print_config_info(blueprint: &ServiceBlueprint, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Banner Refresher Configuration                 ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let scheduler = &blueprint.scheduler;
    println!("⏱  Scheduler");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!("   ├─ Tick period: {}s", scheduler.tick_period_secs);
    println!("   ├─ Worker slots: {} per pool", scheduler.worker_slots);
    println!("   ├─ Fetch timeout: {}", seconds_or_unbounded(scheduler.fetch_timeout_secs));
    println!("   ├─ Tenant timeout: {}", seconds_or_unbounded(scheduler.tenant_timeout_secs));
    println!("   └─ Font catalog: {}", blueprint.fonts.catalog_path.display());

    println!("\n🏠 Guilds ({})", blueprint.guilds.len());
    for (i, guild) in blueprint.guilds.iter().enumerate() {
        let banner = guild.features.iter().any(|f| f == BANNER_FEATURE);
        println!(
            "   {} {} {} (humans: {}, bots: {}, banner: {}, manage: {})",
            tree_prefix(i, blueprint.guilds.len()),
            guild.id,
            guild.name,
            guild.humans.total(),
            guild.bots.total(),
            if banner { "yes" } else { "no" },
            if guild.can_manage { "yes" } else { "no" },
        );
    }

    let enabled = blueprint.subscriptions.iter().filter(|s| s.enabled).count();
    println!(
        "\n🖼  Subscriptions ({}, {} enabled)",
        blueprint.subscriptions.len(),
        enabled
    );
    if args.subscriptions {
        for (i, sub) in blueprint.subscriptions.iter().enumerate() {
            let is_last = i + 1 == blueprint.subscriptions.len();
            let child_prefix = if is_last { "   " } else { "│  " };
            println!(
                "   {} {}{} every {} min",
                tree_prefix(i, blueprint.subscriptions.len()),
                sub.id,
                if sub.enabled { "" } else { " (disabled)" },
                sub.interval_minutes
            );
            println!("   {}  ├─ Source: {} {}", child_prefix, sub.source, sub.selector);
            println!(
                "   {}  └─ Font: {} {} {}px",
                child_prefix, sub.style.font_family, sub.style.font_variant, sub.style.font_size
            );
        }
    }

    if args.sinks {
        println!("\n📤 Sinks ({})", blueprint.sinks.len());
        for (i, sink) in blueprint.sinks.iter().enumerate() {
            println!(
                "   {} {} ({:?})",
                tree_prefix(i, blueprint.sinks.len()),
                sink.name,
                sink.sink_type
            );
        }
    }
}

fn seconds_or_unbounded(secs: u64) -> String {
    if secs == 0 {
        "unbounded".to_string()
    } else {
        format!("{secs}s")
    }
}
