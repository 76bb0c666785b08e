//! TimelineEvent - placed timeline items
//!
//! Output of the event builders, input/output of the rule engine and the
//! conflict resolver.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::{EventId, PrecisionTime};

/// Category-specific key/value bag, passed through untouched.
pub type Properties = BTreeMap<String, serde_json::Value>;

/// Render layer of an event.
///
/// Conflicts and priorities only apply within one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Subtitle,
    Audio,
    Effect,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Subtitle, Category::Audio, Category::Effect];

    /// Fixed conflict priority; higher wins.
    pub const fn priority(self) -> i32 {
        match self {
            Category::Subtitle => 8,
            Category::Audio => 5,
            Category::Effect => 3,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Subtitle => "subtitle",
            Category::Audio => "audio",
            Category::Effect => "effect",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One placed item on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Unique within the timeline
    pub id: EventId,

    pub start: PrecisionTime,

    /// Always `> start`
    pub end: PrecisionTime,

    pub category: Category,

    /// Subtitle text, audio reference or effect kind
    pub content: String,

    #[serde(default)]
    pub properties: Properties,

    /// Sorted, deduplicated sync candidates of the original window
    #[serde(default)]
    pub sync_points: Vec<PrecisionTime>,

    pub priority: i32,
}

impl TimelineEvent {
    #[inline]
    pub fn duration(&self) -> PrecisionTime {
        self.end - self.start
    }

    /// Half-open `[start, end)` intersection test.
    #[inline]
    pub fn overlaps(&self, other: &TimelineEvent) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Same category and overlapping windows.
    #[inline]
    pub fn conflicts_with(&self, other: &TimelineEvent) -> bool {
        self.category == other.category && self.overlaps(other)
    }

    /// Copy of this event moved to `start`, keeping its duration.
    pub fn moved_to(&self, start: PrecisionTime) -> TimelineEvent {
        TimelineEvent {
            start,
            end: start + self.duration(),
            ..self.clone()
        }
    }

    /// True when `start` is within `tolerance` of a recorded sync point.
    pub fn starts_on_sync_point(&self, tolerance: PrecisionTime) -> bool {
        self.sync_points
            .iter()
            .any(|point| self.start.is_within(*point, tolerance))
    }
}
