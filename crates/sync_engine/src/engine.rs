//! Timeline synchronizer: builders -> rules -> resolver -> scorer.

use contracts::{
    Category, ContentAnalysis, ContractError, InvalidWindowPolicy, RejectedCandidate,
    SyncEngineConfig, SyncRequest, SynchronizedTimeline, TimelineEvent, TimelineMeta,
};
use tracing::{instrument, warn};

use crate::builder::{EventBuilder, SubtitlePlacement};
use crate::locator::SyncPointLocator;
use crate::resolver::{ConflictResolver, Resolution};
use crate::rules::RuleEngine;
use crate::scorer::QualityScorer;

const SYNC_PRECISION: &str = "0.001";

#[derive(Default)]
struct BuiltEvents {
    events: Vec<TimelineEvent>,
    rejected: Vec<RejectedCandidate>,
    snapped_subtitles: usize,
    empty_subtitles: usize,
}

/// Pure function from (analysis, candidates) to a resolved timeline.
///
/// Holds no per-run state, so one instance can be shared across threads.
/// Metrics are left to the caller (see `observability::record_timeline_metrics`).
#[derive(Debug, Clone)]
pub struct TimelineSynchronizer {
    config: SyncEngineConfig,
    rules: RuleEngine,
    resolver: ConflictResolver,
    scorer: QualityScorer,
}

impl Default for TimelineSynchronizer {
    fn default() -> Self {
        Self::new(SyncEngineConfig::default())
    }
}

impl TimelineSynchronizer {
    pub fn new(config: SyncEngineConfig) -> Self {
        Self {
            rules: RuleEngine::default(),
            resolver: ConflictResolver::new(config.tolerance),
            scorer: QualityScorer::new(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &SyncEngineConfig {
        &self.config
    }

    /// Run one synchronization.
    ///
    /// Only fails when a candidate has an invalid window and the policy is
    /// [`InvalidWindowPolicy::Fail`]; every other problem degrades the result.
    #[instrument(
        name = "timeline_sync_synchronize",
        skip_all,
        fields(
            subtitles = request.subtitles.len(),
            audio = request.audio.len(),
            effects = request.effects.len()
        )
    )]
    pub fn synchronize(
        &self,
        analysis: &ContentAnalysis,
        request: &SyncRequest,
    ) -> Result<SynchronizedTimeline, ContractError> {
        let analysis_empty = analysis.is_empty();
        if analysis_empty {
            warn!("content analysis has no scenes or frames, keeping requested timing");
        }

        let built = self.build_events(analysis, request)?;
        let adjusted = self.rules.apply(built.events);
        let Resolution { events, shifts } = self.resolver.resolve_with_report(adjusted);
        let quality = self.scorer.score(&events);

        let overruns = events
            .iter()
            .filter(|event| event.end > analysis.total_duration)
            .count();
        if overruns > 0 {
            warn!(
                overruns,
                total_duration = %analysis.total_duration,
                "events extend past the media duration"
            );
        }

        let count = |category: Category| events.iter().filter(|e| e.category == category).count();
        let meta = TimelineMeta {
            total_events: events.len(),
            subtitle_events: count(Category::Subtitle),
            audio_events: count(Category::Audio),
            effect_events: count(Category::Effect),
            sync_precision: SYNC_PRECISION.to_string(),
            snapped_subtitles: built.snapped_subtitles,
            shifted: shifts,
            rejected: built.rejected,
            analysis_empty,
            empty_subtitles: built.empty_subtitles,
            overruns,
        };

        tracing::info!(
            events = meta.total_events,
            shifted = meta.shifted.len(),
            rejected = meta.rejected.len(),
            quality,
            "timeline synchronized"
        );

        Ok(SynchronizedTimeline {
            total_duration: analysis.total_duration,
            frame_rate: analysis.frame_rate,
            events,
            rules: self.rules.rules().to_vec(),
            quality,
            meta,
        })
    }

    #[instrument(name = "timeline_sync_build_events", level = "debug", skip_all)]
    fn build_events(
        &self,
        analysis: &ContentAnalysis,
        request: &SyncRequest,
    ) -> Result<BuiltEvents, ContractError> {
        let builder = EventBuilder::new(&self.config, SyncPointLocator::new(analysis));
        let mut built = BuiltEvents::default();

        for (index, subtitle) in request.subtitles.iter().enumerate() {
            if !subtitle.has_text() {
                built.empty_subtitles += 1;
            }
            match builder.build_subtitle(index, subtitle) {
                Ok((event, placement)) => {
                    if placement == SubtitlePlacement::Snapped {
                        built.snapped_subtitles += 1;
                    }
                    built.events.push(event);
                }
                Err(err) => self.reject(err, &mut built)?,
            }
        }

        for (index, audio) in request.audio.iter().enumerate() {
            match builder.build_audio(index, audio) {
                Ok(event) => built.events.push(event),
                Err(err) => self.reject(err, &mut built)?,
            }
        }

        for (index, effect) in request.effects.iter().enumerate() {
            match builder.build_effect(index, effect) {
                Ok(event) => built.events.push(event),
                Err(err) => self.reject(err, &mut built)?,
            }
        }

        Ok(built)
    }

    /// Apply the invalid-window policy to a builder error.
    fn reject(&self, err: ContractError, built: &mut BuiltEvents) -> Result<(), ContractError> {
        match (self.config.invalid_window_policy, err) {
            (
                InvalidWindowPolicy::Skip,
                ContractError::InvalidEventWindow {
                    category,
                    index,
                    start,
                    end,
                },
            ) => {
                warn!(%category, index, %start, %end, "dropping candidate with invalid window");
                built.rejected.push(RejectedCandidate {
                    category,
                    index,
                    start,
                    end,
                });
                Ok(())
            }
            (_, err) => Err(err),
        }
    }
}
