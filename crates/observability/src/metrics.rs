//! Timeline metrics
//!
//! The engine is pure, so hosts record its results here after each run.
//! Also provides an in-memory aggregator for batch summaries.

use std::collections::BTreeMap;

use contracts::{Category, SynchronizedTimeline};
use metrics::{counter, gauge, histogram};

/// Record the outcome of one job.
///
/// # Example
///
/// ```ignore
/// let timeline = engine.synchronize(&job.analysis, &job.candidates)?;
/// record_timeline_metrics(&job.name, &timeline);
/// ```
pub fn record_timeline_metrics(job: &str, timeline: &SynchronizedTimeline) {
    let meta = &timeline.meta;

    counter!("timeline_sync_runs_total").increment(1);
    histogram!("timeline_sync_quality").record(timeline.quality);

    for category in Category::ALL {
        counter!("timeline_sync_events_total", "category" => category.as_str())
            .increment(meta.count(category) as u64);
    }
    for rejected in &meta.rejected {
        counter!("timeline_sync_rejected_total", "category" => rejected.category.as_str())
            .increment(1);
    }

    gauge!("timeline_sync_job_quality", "job" => job.to_string()).set(timeline.quality);
    gauge!("timeline_sync_job_events", "job" => job.to_string()).set(meta.total_events as f64);
    gauge!("timeline_sync_job_duration_ms", "job" => job.to_string())
        .set(timeline.total_duration.as_millis_f64());

    counter!("timeline_sync_snapped_subtitles_total").increment(meta.snapped_subtitles as u64);

    if meta.overruns > 0 {
        counter!("timeline_sync_overruns_total").increment(meta.overruns as u64);
    }
    if meta.analysis_empty {
        counter!("timeline_sync_empty_analysis_total").increment(1);
    }

    for shift in &meta.shifted {
        counter!("timeline_sync_shifted_total", "category" => shift.category.as_str())
            .increment(1);
        histogram!(
            "timeline_sync_shift_distance_ms",
            "category" => shift.category.as_str()
        )
        .record((shift.to - shift.from).as_millis_f64());
    }
}

pub fn record_job_failed(job: &str) {
    counter!("timeline_sync_jobs_failed_total", "job" => job.to_string()).increment(1);
}

/// Wall time of one job, load to write.
pub fn record_job_latency_ms(latency_ms: f64) {
    histogram!("timeline_sync_job_latency_ms").record(latency_ms);
}

/// Aggregates a batch of timelines in memory.
#[derive(Debug, Clone, Default)]
pub struct TimelineMetricsAggregator {
    pub total_runs: u64,
    pub failed_runs: u64,
    pub total_events: u64,
    pub total_shifted: u64,
    pub total_rejected: u64,
    pub total_snapped: u64,
    pub runs_with_overruns: u64,

    pub quality_stats: RunningStats,
    /// Shift distances (ms)
    pub shift_stats: RunningStats,

    pub events_by_category: BTreeMap<String, u64>,
}

impl TimelineMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, timeline: &SynchronizedTimeline) {
        let meta = &timeline.meta;

        self.total_runs += 1;
        self.total_events += meta.total_events as u64;
        self.total_shifted += meta.shifted.len() as u64;
        self.total_rejected += meta.rejected.len() as u64;
        self.total_snapped += meta.snapped_subtitles as u64;
        if meta.overruns > 0 {
            self.runs_with_overruns += 1;
        }

        self.quality_stats.push(timeline.quality);
        for shift in &meta.shifted {
            self.shift_stats.push((shift.to - shift.from).as_millis_f64());
        }

        for category in Category::ALL {
            *self
                .events_by_category
                .entry(category.as_str().to_string())
                .or_insert(0) += meta.count(category) as u64;
        }
    }

    pub fn record_failure(&mut self) {
        self.failed_runs += 1;
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_runs: self.total_runs,
            failed_runs: self.failed_runs,
            total_events: self.total_events,
            total_shifted: self.total_shifted,
            total_rejected: self.total_rejected,
            total_snapped: self.total_snapped,
            runs_with_overruns: self.runs_with_overruns,
            shift_rate: if self.total_events > 0 {
                self.total_shifted as f64 / self.total_events as f64 * 100.0
            } else {
                0.0
            },
            quality: StatsSummary::from(&self.quality_stats),
            shift_distance_ms: StatsSummary::from(&self.shift_stats),
            events_by_category: self.events_by_category.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_runs: u64,
    pub failed_runs: u64,
    pub total_events: u64,
    pub total_shifted: u64,
    pub total_rejected: u64,
    pub total_snapped: u64,
    pub runs_with_overruns: u64,
    /// Shifted events as a percentage of all events
    pub shift_rate: f64,
    pub quality: StatsSummary,
    pub shift_distance_ms: StatsSummary,
    pub events_by_category: BTreeMap<String, u64>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Timeline Sync Summary ===")?;
        writeln!(f, "Jobs: {} ok, {} failed", self.total_runs, self.failed_runs)?;
        writeln!(f, "Events: {}", self.total_events)?;
        for (category, count) in &self.events_by_category {
            writeln!(f, "  {category}: {count}")?;
        }
        writeln!(
            f,
            "Shifted events: {} ({:.2}%)",
            self.total_shifted, self.shift_rate
        )?;
        writeln!(f, "Snapped subtitles: {}", self.total_snapped)?;
        writeln!(f, "Rejected candidates: {}", self.total_rejected)?;
        writeln!(f, "Jobs with overruns: {}", self.runs_with_overruns)?;
        writeln!(f, "Quality: {}", self.quality)?;
        writeln!(f, "Shift distance (ms): {}", self.shift_distance_ms)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            return write!(f, "N/A");
        }
        write!(
            f,
            "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
            self.min, self.max, self.mean, self.std_dev, self.count
        )
    }
}

/// Online mean/variance (Welford)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
            return;
        }

        self.min = self.min.min(value);
        self.max = self.max.max(value);
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
