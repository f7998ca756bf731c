//! `run` command implementation.

use anyhow::{Context, Result};
use scheduler::CancellationToken;
use tracing::{error, info, warn};

use crate::cli::RunArgs;
use crate::commands::config_relative;
use crate::error::CliError;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(period) = args.tick_period {
        info!(period, "Overriding tick period from CLI");
        blueprint.scheduler.tick_period_secs = period;
    }
    if let Some(slots) = args.worker_slots {
        info!(slots, "Overriding worker slots from CLI");
        blueprint.scheduler.worker_slots = slots;
    }
    config_loader::validate(&blueprint).context("Invalid CLI override")?;

    blueprint.fonts.catalog_path = config_relative(&args.config, &blueprint.fonts.catalog_path);

    info!(
        subscriptions = blueprint.subscriptions.len(),
        guilds = blueprint.guilds.len(),
        sinks = blueprint.sinks.len(),
        tick_period_secs = blueprint.scheduler.tick_period_secs,
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    let pipeline = Pipeline::new(PipelineConfig {
        blueprint,
        once: args.once,
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    });

    let shutdown = CancellationToken::new();
    spawn_shutdown_listener(shutdown.clone());

    info!("Starting refresh loop...");
    let stats = pipeline
        .run(shutdown)
        .await
        .context("Pipeline execution failed")?;

    info!(
        ticks = stats.summary.total_ticks,
        rendered = stats.summary.total_rendered,
        duration_secs = stats.duration.as_secs_f64(),
        "Pipeline finished"
    );
    stats.print_summary();

    Ok(())
}

/// Cancel `token` on Ctrl+C or SIGTERM
fn spawn_shutdown_listener(token: CancellationToken) {
    tokio::spawn(async move {
        wait_for_signal().await;
        warn!("Received shutdown signal, finishing the current tick...");
        token.cancel();
    });
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &contracts::ServiceBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Scheduler:");
    println!("  Tick period: {}s", blueprint.scheduler.tick_period_secs);
    println!("  Worker slots: {} per pool", blueprint.scheduler.worker_slots);
    println!("  Font catalog: {}", blueprint.fonts.catalog_path.display());

    println!("\nSubscriptions ({}):", blueprint.subscriptions.len());
    for sub in &blueprint.subscriptions {
        let state = if sub.enabled { "" } else { " [disabled]" };
        println!(
            "  - {} {} {} every {} min{}",
            sub.id, sub.source, sub.selector, sub.interval_minutes, state
        );
    }

    println!("\nSinks ({}):", blueprint.sinks.len());
    for sink in &blueprint.sinks {
        println!("  - {} ({:?})", sink.name, sink.sink_type);
    }

    println!();
}
