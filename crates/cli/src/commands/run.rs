//! `run` command implementation.

use anyhow::{Context, Result};
use contracts::PrecisionTime;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::pipeline::{BatchConfig, BatchRunner, JobOutput};

/// Execute the `run` command
pub async fn run_jobs(args: &RunArgs) -> Result<()> {
    let base_engine = match &args.config {
        Some(path) => {
            info!(config = %path.display(), "Loading engine configuration");
            let config = config_loader::ConfigLoader::load_engine_config(path)
                .with_context(|| format!("Failed to load engine config from {}", path.display()))?;
            Some(config)
        }
        None => None,
    };

    let tolerance_override = args
        .tolerance_ms
        .map(PrecisionTime::from_millis_f64)
        .transpose()
        .context("Invalid --tolerance-ms")?;

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let runner = BatchRunner::new(BatchConfig {
        jobs: args.jobs.clone(),
        base_engine,
        tolerance_override,
        output_dir: args.output.clone(),
        parallelism: args.parallelism,
    });

    info!(jobs = args.jobs.len(), parallelism = args.parallelism, "Starting batch");

    let stats = tokio::select! {
        result = runner.run() => result?,
        _ = shutdown_signal() => {
            warn!("Received shutdown signal, abandoning batch");
            anyhow::bail!("interrupted");
        }
    };

    for report in stats.reports() {
        match &report.output {
            JobOutput::Stdout(rendered) => println!("{rendered}"),
            JobOutput::File(path) => info!(job = %report.name, output = %path.display(), "Timeline written"),
        }
    }

    // stdout carries timelines when no output dir is given
    if args.output.is_some() {
        println!("{stats}");
    } else {
        eprintln!("{stats}");
    }

    if stats.failed() > 0 {
        anyhow::bail!("{} of {} jobs failed", stats.failed(), args.jobs.len());
    }
    Ok(())
}

/// Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
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
