//! Synchronization quality score.

use contracts::{Category, SyncEngineConfig, TimelineEvent};
use tracing::instrument;

use crate::builder::reading_time;

const ALIGNMENT_WEIGHT: f64 = 0.4;
const DURATION_WEIGHT: f64 = 0.3;
const CONFLICT_WEIGHT: f64 = 0.3;

/// Scores a resolved timeline in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct QualityScorer {
    config: SyncEngineConfig,
}

impl QualityScorer {
    pub fn new(config: SyncEngineConfig) -> Self {
        Self { config }
    }

    /// Priority-weighted mean of the per-event scores; `0.0` for no events.
    #[instrument(name = "timeline_sync_score", level = "debug", skip_all, fields(events = events.len()))]
    pub fn score(&self, events: &[TimelineEvent]) -> f64 {
        let mut total_score = 0.0;
        let mut total_weight = 0.0;

        for event in events {
            let weight = f64::from(event.priority.max(0));
            total_score += self.score_event(event, events) * weight;
            total_weight += weight;
        }

        if total_weight > 0.0 {
            (total_score / total_weight).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn score_event(&self, event: &TimelineEvent, all: &[TimelineEvent]) -> f64 {
        let mut score = 0.0;

        if event.starts_on_sync_point(self.config.tolerance) {
            score += ALIGNMENT_WEIGHT;
        }

        match event.category {
            Category::Subtitle => {
                if event.duration() >= reading_time(&event.content, &self.config) {
                    score += DURATION_WEIGHT;
                }
            }
            Category::Audio | Category::Effect => {}
        }

        if !has_priority_conflict(event, all) {
            score += CONFLICT_WEIGHT;
        }

        score
    }
}

/// Overlaps a same-category event of strictly higher priority.
fn has_priority_conflict(event: &TimelineEvent, all: &[TimelineEvent]) -> bool {
    all.iter().any(|other| {
        other.id != event.id && other.priority > event.priority && other.conflicts_with(event)
    })
}
