//! `validate` command implementation.

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use contracts::{ServiceBlueprint, BANNER_FEATURE};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::commands::config_relative;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    tick_period_secs: u64,
    worker_slots: usize,
    subscription_count: usize,
    enabled_count: usize,
    source_count: usize,
    guild_count: usize,
    sink_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let mut warnings = collect_warnings(&blueprint);
            let catalog = config_relative(&args.config, &blueprint.fonts.catalog_path);
            if !catalog.exists() {
                warnings.push(format!("Font catalog not found: {}", catalog.display()));
            }

            let sources: HashSet<&str> = blueprint
                .subscriptions
                .iter()
                .map(|s| s.source.as_str())
                .collect();

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    tick_period_secs: blueprint.scheduler.tick_period_secs,
                    worker_slots: blueprint.scheduler.worker_slots,
                    subscription_count: blueprint.subscriptions.len(),
                    enabled_count: blueprint.subscriptions.iter().filter(|s| s.enabled).count(),
                    source_count: sources.len(),
                    guild_count: blueprint.guilds.len(),
                    sink_count: blueprint.sinks.len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &ServiceBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.subscriptions.is_empty() {
        warnings.push("No subscriptions configured - every tick will be empty".to_string());
    }

    let guilds: HashMap<u64, &contracts::GuildConfig> =
        blueprint.guilds.iter().map(|g| (g.id, g)).collect();

    for sub in &blueprint.subscriptions {
        if !sub.enabled {
            warnings.push(format!("Subscription {} is disabled", sub.id));
            continue;
        }
        match guilds.get(&sub.id) {
            None => warnings.push(format!(
                "Subscription {} has no matching guild - it will be reported invalid",
                sub.id
            )),
            Some(guild) if !guild.features.iter().any(|f| f == BANNER_FEATURE) => {
                warnings.push(format!(
                    "Guild {} lacks the {} feature",
                    guild.id, BANNER_FEATURE
                ))
            }
            Some(guild) if !guild.can_manage => warnings.push(format!(
                "Guild {} does not grant the manage permission",
                guild.id
            )),
            Some(_) => {}
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Tick period: {}s", summary.tick_period_secs);
            println!("  Worker slots: {}", summary.worker_slots);
            println!(
                "  Subscriptions: {} ({} enabled)",
                summary.subscription_count, summary.enabled_count
            );
            println!("  Data sources: {}", summary.source_count);
            println!("  Guilds: {}", summary.guild_count);
            println!("  Sinks: {}", summary.sink_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
