//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Banner Refresher - scheduled banner rendering for chat servers
#[derive(Parser, Debug)]
#[command(
    name = "banner-refresher",
    author,
    version,
    about = "Scheduled server-banner refresh pipeline",
    long_about = "Periodically fetches each tenant's data source, extracts a number, \n\
                  draws it onto the tenant's banner template and publishes the result \n\
                  to the configured sinks."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "BANNER_REFRESHER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "BANNER_REFRESHER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the refresh loop until Ctrl+C
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),

    /// Render one value onto a template (preview)
    Render(RenderArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "config.toml",
        env = "BANNER_REFRESHER_CONFIG"
    )]
    pub config: PathBuf,

    /// Run a single tick and exit
    #[arg(long)]
    pub once: bool,

    /// Override the tick period from configuration (seconds)
    #[arg(long, env = "BANNER_REFRESHER_TICK_PERIOD")]
    pub tick_period: Option<u64>,

    /// Override the slots of each worker pool
    #[arg(long, env = "BANNER_REFRESHER_WORKER_SLOTS")]
    pub worker_slots: Option<usize>,

    /// Validate configuration and exit without running
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "9000", env = "BANNER_REFRESHER_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml", env = "BANNER_REFRESHER_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", env = "BANNER_REFRESHER_CONFIG")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show every subscription
    #[arg(long)]
    pub subscriptions: bool,

    /// Show sink configuration
    #[arg(long)]
    pub sinks: bool,
}

/// Arguments for the `render` command
#[derive(Parser, Debug, Clone)]
pub struct RenderArgs {
    /// Local TTF/OTF font file
    #[arg(long)]
    pub font: PathBuf,

    /// Template image (PNG/JPEG); a transparent canvas when omitted
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Canvas width when no template is given
    #[arg(long, default_value = "960")]
    pub width: u32,

    /// Canvas height when no template is given
    #[arg(long, default_value = "540")]
    pub height: u32,

    /// Value to draw
    #[arg(long, allow_negative_numbers = true)]
    pub value: i64,

    /// Font size in pixels
    #[arg(long, default_value = "48")]
    pub size: f32,

    /// Text color as RRGGBB hex
    #[arg(long, default_value = "FFFFFF")]
    pub color: String,

    /// Clockwise rotation in degrees about the canvas origin
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub rotation: f32,

    /// Horizontal alignment relative to the anchor
    #[arg(long, value_enum, default_value = "left")]
    pub align: Align,

    /// Anchor x (pixels)
    #[arg(long, default_value = "0")]
    pub x: f32,

    /// Anchor y (pixels)
    #[arg(long, default_value = "0")]
    pub y: f32,

    /// Output PNG path
    #[arg(short, long, default_value = "banner.png")]
    pub output: PathBuf,
}

/// Text alignment
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
