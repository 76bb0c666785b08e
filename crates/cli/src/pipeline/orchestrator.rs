//! Batch orchestrator - runs independent sync jobs concurrently.
//!
//! Jobs share no state, so each one runs on its own blocking task with its
//! own `TimelineSynchronizer`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use config_loader::{validate_batch_size, ConfigLoader};
use contracts::{PrecisionTime, SyncEngineConfig, SynchronizedTimeline};
use observability::{record_job_failed, record_job_latency_ms, record_timeline_metrics};
use serde::{Deserialize, Serialize};
use sync_engine::TimelineSynchronizer;
use tokio::task::JoinSet;
use tracing::{info, warn};

use super::BatchStats;
use crate::error::{CliError, Result};

const OUTPUT_SUFFIX: &str = ".timeline.json";

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub jobs: Vec<PathBuf>,

    /// Engine config for jobs without their own `[engine]` section
    pub base_engine: Option<SyncEngineConfig>,

    /// Applied on top of whichever engine config a job ends up with
    pub tolerance_override: Option<PrecisionTime>,

    /// Output directory (None = render to stdout)
    pub output_dir: Option<PathBuf>,

    /// Maximum number of jobs in flight
    pub parallelism: usize,
}

/// File written per job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEnvelope {
    pub job: String,
    pub source: PathBuf,
    pub generated_at: DateTime<Utc>,
    pub engine: SyncEngineConfig,
    pub timeline: SynchronizedTimeline,
}

#[derive(Debug, Clone)]
pub enum JobOutput {
    File(PathBuf),
    /// Rendered envelope, printed by the caller in job order
    Stdout(String),
}

#[derive(Debug, Clone)]
pub struct JobReport {
    pub name: String,
    pub source: PathBuf,
    pub output: JobOutput,
    pub elapsed: Duration,
    pub timeline: SynchronizedTimeline,
}

pub struct BatchRunner {
    config: Arc<BatchConfig>,
}

impl BatchRunner {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Run every job to completion. Individual job failures are collected in
    /// the returned stats, not propagated.
    pub async fn run(self) -> Result<BatchStats> {
        let start = Instant::now();

        if let Some(dir) = &self.config.output_dir {
            std::fs::create_dir_all(dir).map_err(|e| CliError::output(dir, e))?;
        }

        let parallelism = self.config.parallelism.max(1);
        let mut pending = self.config.jobs.iter().cloned().enumerate();
        let mut tasks = JoinSet::new();
        let mut outcomes: Vec<(usize, PathBuf, Result<JobReport>)> =
            Vec::with_capacity(self.config.jobs.len());

        loop {
            while tasks.len() < parallelism {
                let Some((index, path)) = pending.next() else {
                    break;
                };
                let config = Arc::clone(&self.config);
                tasks.spawn_blocking(move || {
                    let result = run_job(&config, &path);
                    (index, path, result)
                });
            }

            match tasks.join_next().await {
                Some(Ok(outcome)) => outcomes.push(outcome),
                Some(Err(e)) => {
                    warn!(error = %e, "job task aborted");
                    outcomes.push((usize::MAX, PathBuf::new(), Err(CliError::from(e))));
                }
                None => break,
            }
        }

        outcomes.sort_by_key(|(index, _, _)| *index);

        let mut stats = BatchStats::default();
        for (_, path, result) in outcomes {
            match result {
                Ok(report) => {
                    info!(
                        job = %report.name,
                        events = report.timeline.meta.total_events,
                        quality = report.timeline.quality,
                        elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
                        "job synchronized"
                    );
                    stats.record_success(report);
                }
                Err(e) => {
                    warn!(job = %path.display(), error = %e, "job failed");
                    record_job_failed(&ConfigLoader::job_stem(&path));
                    stats.record_failure(path, e);
                }
            }
        }
        stats.duration = start.elapsed();

        Ok(stats)
    }
}

fn run_job(config: &BatchConfig, path: &Path) -> Result<JobReport> {
    let start = Instant::now();

    if !path.exists() {
        return Err(CliError::JobNotFound {
            path: path.to_path_buf(),
        });
    }

    let job = ConfigLoader::load_job(path).map_err(|e| CliError::load(path, e))?;
    let engine = effective_engine(
        job.engine.clone(),
        config.base_engine.as_ref(),
        config.tolerance_override,
    );
    ConfigLoader::validate_engine_config(&engine).map_err(|e| CliError::load(path, e))?;
    validate_batch_size(&job.candidates, engine.max_events)
        .map_err(|e| CliError::load(path, e))?;

    let timeline = TimelineSynchronizer::new(engine.clone())
        .synchronize(&job.analysis, &job.candidates)
        .map_err(|e| CliError::sync(&job.name, e))?;
    record_timeline_metrics(&job.name, &timeline);

    let envelope = TimelineEnvelope {
        job: job.name.clone(),
        source: path.to_path_buf(),
        generated_at: Utc::now(),
        engine,
        timeline,
    };
    let rendered = serde_json::to_string_pretty(&envelope)?;

    let output = match &config.output_dir {
        Some(dir) => {
            let target = dir.join(format!("{}{OUTPUT_SUFFIX}", ConfigLoader::job_stem(path)));
            std::fs::write(&target, rendered).map_err(|e| CliError::output(&target, e))?;
            JobOutput::File(target)
        }
        None => JobOutput::Stdout(rendered),
    };

    let elapsed = start.elapsed();
    record_job_latency_ms(elapsed.as_secs_f64() * 1000.0);

    Ok(JobReport {
        name: envelope.job,
        source: envelope.source,
        output,
        elapsed,
        timeline: envelope.timeline,
    })
}

/// Job section wins over `--config`, which wins over defaults; the tolerance
/// override applies last.
fn effective_engine(
    job_engine: Option<SyncEngineConfig>,
    base: Option<&SyncEngineConfig>,
    tolerance_override: Option<PrecisionTime>,
) -> SyncEngineConfig {
    let mut engine = job_engine
        .or_else(|| base.cloned())
        .unwrap_or_default();
    if let Some(tolerance) = tolerance_override {
        engine.tolerance = tolerance;
    }
    engine
}
