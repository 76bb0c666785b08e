//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Timeline Sync - align subtitles, audio and effects to analysed video content
#[derive(Parser, Debug)]
#[command(
    name = "timeline-sync",
    author,
    version,
    about = "Timeline synchronization for generated video content",
    long_about = "Loads sync jobs (content analysis + candidate events), snaps subtitles to \n\
                  scene, frame and speech boundaries, applies timing rules, resolves \n\
                  same-category conflicts by priority and writes the resolved timelines."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "TIMELINE_SYNC_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "TIMELINE_SYNC_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synchronize one or more jobs
    Run(RunArgs),

    /// Validate a job file without running it
    Validate(ValidateArgs),

    /// Summarise a job file
    Info(InfoArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Job files (TOML or JSON); independent jobs run concurrently
    #[arg(required = true)]
    pub jobs: Vec<PathBuf>,

    /// Engine config applied to jobs without an `[engine]` section
    #[arg(short, long, env = "TIMELINE_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for `<job>.timeline.json` files (stdout when omitted)
    #[arg(short, long, env = "TIMELINE_SYNC_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Override the alignment tolerance for every job
    #[arg(long, env = "TIMELINE_SYNC_TOLERANCE_MS")]
    pub tolerance_ms: Option<f64>,

    /// Maximum number of jobs in flight
    #[arg(long, default_value = "4", env = "TIMELINE_SYNC_PARALLELISM")]
    pub parallelism: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "TIMELINE_SYNC_METRICS_PORT")]
    pub metrics_port: u16,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Job file to validate
    pub job: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Job file
    pub job: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
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
