//! Event builders: candidate requests -> placed `TimelineEvent`s.

use contracts::{
    AudioRequest, Category, ContractError, EffectRequest, EventId, PrecisionTime,
    SubtitleRequest, SyncEngineConfig, TimelineEvent,
};
use tracing::{debug, instrument};

use crate::locator::{SyncPointLocator, SyncTarget, TimeWindow};

/// Minimum display time for `text`: `max(chars / cps, min_display)`.
pub fn reading_time(text: &str, config: &SyncEngineConfig) -> PrecisionTime {
    let chars = text.chars().count() as i64;
    let cps = i64::from(config.reading_chars_per_second.max(1));
    PrecisionTime::from_ratio(chars * 1_000_000, cps).max(config.min_display)
}

/// How a subtitle's start was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitlePlacement {
    /// Start snapped to a sync point
    Snapped,
    /// Requested timing kept
    Requested,
    /// Requested start kept, end extended to the reading time
    Extended,
}

/// Builds placed events for one analysis result.
#[derive(Debug, Clone, Copy)]
pub struct EventBuilder<'a> {
    config: &'a SyncEngineConfig,
    locator: SyncPointLocator<'a>,
}

impl<'a> EventBuilder<'a> {
    pub fn new(config: &'a SyncEngineConfig, locator: SyncPointLocator<'a>) -> Self {
        Self { config, locator }
    }

    #[instrument(
        name = "timeline_sync_build_subtitle",
        level = "trace",
        skip(self, request),
        fields(start = %request.start, end = %request.end)
    )]
    pub fn build_subtitle(
        &self,
        index: usize,
        request: &SubtitleRequest,
    ) -> Result<(TimelineEvent, SubtitlePlacement), ContractError> {
        check_window(Category::Subtitle, index, request.start, request.end)?;

        let tolerance = self.config.tolerance;
        let reading = reading_time(&request.text, self.config);
        let sync_points = self.locator.find_sync_points(
            TimeWindow::new(request.start, request.end),
            SyncTarget::Subtitle,
        );

        // first minimum wins, so equidistant points resolve to the earlier one
        let anchor = sync_points
            .iter()
            .copied()
            .min_by_key(|point| point.abs_diff(request.start))
            .filter(|point| point.is_within(request.start, tolerance));

        let (start, end, placement) = match anchor {
            Some(start) => {
                let natural_end = start + reading;
                // only snap the end later, never below the reading time
                let end = sync_points
                    .iter()
                    .copied()
                    .find(|point| *point >= natural_end && point.is_within(natural_end, tolerance))
                    .unwrap_or(natural_end);
                debug!(
                    index,
                    requested = %request.start,
                    snapped = %start,
                    end = %end,
                    "subtitle start snapped to sync point"
                );
                (start, end, SubtitlePlacement::Snapped)
            }
            None if request.end - request.start < reading => (
                request.start,
                request.start + reading,
                SubtitlePlacement::Extended,
            ),
            None => (request.start, request.end, SubtitlePlacement::Requested),
        };

        let event = TimelineEvent {
            id: EventId::for_candidate(Category::Subtitle, index),
            start,
            end,
            category: Category::Subtitle,
            content: request.text.clone(),
            properties: request.properties(),
            sync_points,
            priority: Category::Subtitle.priority(),
        };
        Ok((event, placement))
    }

    /// Audio keeps its requested timing; sync points are attached only.
    pub fn build_audio(
        &self,
        index: usize,
        request: &AudioRequest,
    ) -> Result<TimelineEvent, ContractError> {
        check_window(Category::Audio, index, request.start, request.end)?;

        let sync_points = self
            .locator
            .find_sync_points(TimeWindow::new(request.start, request.end), SyncTarget::Audio);

        Ok(TimelineEvent {
            id: EventId::for_candidate(Category::Audio, index),
            start: request.start,
            end: request.end,
            category: Category::Audio,
            content: request.reference.clone(),
            properties: request.properties(),
            sync_points,
            priority: Category::Audio.priority(),
        })
    }

    /// Effects keep their requested timing; sync points depend on the effect class.
    pub fn build_effect(
        &self,
        index: usize,
        request: &EffectRequest,
    ) -> Result<TimelineEvent, ContractError> {
        check_window(Category::Effect, index, request.start, request.end)?;

        let sync_points = self.locator.find_sync_points(
            TimeWindow::new(request.start, request.end),
            SyncTarget::Effect(request.class()),
        );

        Ok(TimelineEvent {
            id: EventId::for_candidate(Category::Effect, index),
            start: request.start,
            end: request.end,
            category: Category::Effect,
            content: request.kind.clone(),
            properties: request.properties(),
            sync_points,
            priority: Category::Effect.priority(),
        })
    }
}

/// Windows must be non-empty and inside the supported clock range.
fn check_window(
    category: Category,
    index: usize,
    start: PrecisionTime,
    end: PrecisionTime,
) -> Result<(), ContractError> {
    if end <= start || !start.is_in_range() || !end.is_in_range() {
        return Err(ContractError::invalid_window(category, index, start, end));
    }
    Ok(())
}
