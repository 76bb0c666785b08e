//! Batch statistics.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use observability::TimelineMetricsAggregator;

use super::JobReport;
use crate::error::CliError;

#[derive(Debug)]
pub struct JobFailure {
    pub source: PathBuf,
    pub error: CliError,
}

/// Outcome of one `run` invocation
#[derive(Debug, Default)]
pub struct BatchStats {
    reports: Vec<JobReport>,
    failures: Vec<JobFailure>,

    /// Wall time of the whole batch
    pub duration: Duration,

    pub metrics: TimelineMetricsAggregator,
}

impl BatchStats {
    pub fn record_success(&mut self, report: JobReport) {
        self.metrics.update(&report.timeline);
        self.reports.push(report);
    }

    pub fn record_failure(&mut self, source: PathBuf, error: CliError) {
        self.metrics.record_failure();
        self.failures.push(JobFailure { source, error });
    }

    pub fn reports(&self) -> &[JobReport] {
        &self.reports
    }

    pub fn failures(&self) -> &[JobFailure] {
        &self.failures
    }

    pub fn succeeded(&self) -> usize {
        self.reports.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Jobs per second
    pub fn throughput(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            (self.succeeded() + self.failed()) as f64 / secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for BatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Batch")?;
        writeln!(f, "   ├─ Duration: {:.3}s", self.duration.as_secs_f64())?;
        writeln!(f, "   ├─ Jobs/s: {:.2}", self.throughput())?;
        writeln!(f, "   ├─ Succeeded: {}", self.succeeded())?;
        writeln!(f, "   └─ Failed: {}", self.failed())?;

        if !self.reports.is_empty() {
            writeln!(f, "\nJobs")?;
            for report in &self.reports {
                let meta = &report.timeline.meta;
                writeln!(
                    f,
                    "   ├─ {}: {} events, quality {:.3}, {} shifted, {} rejected ({:.1}ms)",
                    report.name,
                    meta.total_events,
                    report.timeline.quality,
                    meta.shifted.len(),
                    meta.rejected.len(),
                    report.elapsed.as_secs_f64() * 1000.0
                )?;
            }
        }

        if !self.failures.is_empty() {
            writeln!(f, "\nFailures")?;
            for failure in &self.failures {
                writeln!(f, "   ├─ {}: {}", failure.source.display(), failure.error)?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.metrics.summary())
    }
}
