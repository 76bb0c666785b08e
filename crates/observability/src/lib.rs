//! # Observability
//!
//! Tracing + Prometheus metrics for timeline synchronization.
//!
//! ## Features
//!
//! - Tracing initialisation (JSON / Pretty / Compact)
//! - Optional Prometheus exporter
//! - Per-timeline metrics and batch statistics
//!
//! ## Usage
//!
//! ```ignore
//! use observability::metrics::record_timeline_metrics;
//!
//! observability::init()?;
//!
//! let timeline = engine.synchronize(&job.analysis, &job.candidates)?;
//! record_timeline_metrics(&job.name, &timeline);
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

// Re-exports
pub use crate::metrics::{
    record_job_failed, record_job_latency_ms, record_timeline_metrics, MetricsSummary,
    RunningStats, StatsSummary, TimelineMetricsAggregator,
};

/// Initialise tracing with the defaults (JSON, `RUST_LOG`, no exporter).
pub fn init() -> Result<()> {
    init_with_config(ObservabilityConfig::default())
}

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,
    /// Prometheus port (None = disabled)
    pub metrics_port: Option<u16>,
    /// Used when `RUST_LOG` is unset
    pub default_log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            metrics_port: None,
            default_log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Structured JSON lines
    #[default]
    Json,
    /// Multi-line human readable
    Pretty,
    /// Single-line human readable
    Compact,
}

pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level));

    // stderr keeps stdout free for rendered timelines
    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(false)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("tracing subscriber already installed")?;

    if let Some(port) = config.metrics_port {
        init_metrics_only(port)?;
    }

    tracing::debug!(
        log_format = ?config.log_format,
        metrics_port = ?config.metrics_port,
        "observability ready"
    );
    Ok(())
}

/// Install only the Prometheus recorder, for hosts that own tracing setup.
pub fn init_metrics_only(port: u16) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .with_context(|| format!("cannot serve Prometheus metrics on port {port}"))?;

    tracing::info!(port, "serving Prometheus metrics");
    Ok(())
}
