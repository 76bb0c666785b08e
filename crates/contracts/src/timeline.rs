//! SynchronizedTimeline - engine output
//!
//! Handed to the project serializer. Contains the resolved events, the rule
//! table that was applied, the quality score and run diagnostics.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::{Category, EventId, FrameRate, PrecisionTime, TimelineEvent};

/// Declarative timing adjustment, matched purely by category.
///
/// `trigger` and `action` are descriptive metadata; they are never evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRule {
    pub id: Cow<'static, str>,
    pub applies_to: Category,
    pub offset: PrecisionTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_override: Option<PrecisionTime>,
    #[serde(default)]
    pub trigger: Cow<'static, str>,
    #[serde(default)]
    pub action: Cow<'static, str>,
}

/// Resolved timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynchronizedTimeline {
    pub total_duration: PrecisionTime,
    pub frame_rate: FrameRate,
    pub events: Vec<TimelineEvent>,
    pub rules: Vec<SyncRule>,
    /// Priority-weighted sync quality, 0-1
    pub quality: f64,
    pub meta: TimelineMeta,
}

impl SynchronizedTimeline {
    pub fn events_of(&self, category: Category) -> impl Iterator<Item = &TimelineEvent> {
        self.events.iter().filter(move |e| e.category == category)
    }

    pub fn event(&self, id: &str) -> Option<&TimelineEvent> {
        self.events.iter().find(|e| e.id == id)
    }
}

/// Run diagnostics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineMeta {
    pub total_events: usize,
    pub subtitle_events: usize,
    pub audio_events: usize,
    pub effect_events: usize,

    /// Time resolution in milliseconds
    pub sync_precision: String,

    /// Subtitles whose start snapped to a sync point
    pub snapped_subtitles: usize,

    /// Events moved by the conflict resolver
    #[serde(default)]
    pub shifted: Vec<ConflictShift>,

    /// Candidates dropped for an invalid window
    #[serde(default)]
    pub rejected: Vec<RejectedCandidate>,

    /// Analysis had no scenes and no frames
    pub analysis_empty: bool,

    /// Subtitles with empty text (reading time fell back to the floor)
    pub empty_subtitles: usize,

    /// Events ending after `total_duration`
    pub overruns: usize,
}

impl TimelineMeta {
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Subtitle => self.subtitle_events,
            Category::Audio => self.audio_events,
            Category::Effect => self.effect_events,
        }
    }
}

/// One conflict-resolution move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictShift {
    pub event_id: EventId,
    pub category: Category,
    /// Start before resolution
    pub from: PrecisionTime,
    /// Start after resolution
    pub to: PrecisionTime,
    /// Accepted events that forced the move
    pub blocked_by: Vec<EventId>,
}

/// Candidate rejected with `InvalidEventWindow`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedCandidate {
    pub category: Category,
    /// Index in the request list
    pub index: usize,
    pub start: PrecisionTime,
    pub end: PrecisionTime,
}
