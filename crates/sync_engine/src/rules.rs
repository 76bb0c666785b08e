//! Declarative timing rules.
//!
//! Rules match on category only. `trigger`/`action` document intent and are
//! never evaluated.

use std::borrow::Cow;

use contracts::{Category, PrecisionTime, SyncRule, TimelineEvent};
use tracing::instrument;

/// Rule table applied to every run, in order.
pub const DEFAULT_RULES: [SyncRule; 3] = [
    SyncRule {
        id: Cow::Borrowed("subtitle_align"),
        applies_to: Category::Subtitle,
        offset: PrecisionTime::from_millis(100),
        duration_override: None,
        trigger: Cow::Borrowed("subtitle_overlaps_speech"),
        action: Cow::Borrowed("align_to_speech_boundary"),
    },
    SyncRule {
        id: Cow::Borrowed("audio_fade_align"),
        applies_to: Category::Audio,
        offset: PrecisionTime::from_millis(500),
        duration_override: None,
        trigger: Cow::Borrowed("scene_emotion_change"),
        action: Cow::Borrowed("fade_transition"),
    },
    SyncRule {
        id: Cow::Borrowed("effect_align"),
        applies_to: Category::Effect,
        offset: PrecisionTime::ZERO,
        duration_override: None,
        trigger: Cow::Borrowed("high_motion_detected"),
        action: Cow::Borrowed("align_to_motion_peak"),
    },
];

/// Applies a rule table to placed events.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<SyncRule>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::with_rules(DEFAULT_RULES.to_vec())
    }
}

impl RuleEngine {
    pub fn with_rules(rules: Vec<SyncRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[SyncRule] {
        &self.rules
    }

    /// Matching rules compose in table order.
    #[instrument(name = "timeline_sync_apply_rules", level = "debug", skip_all, fields(events = events.len()))]
    pub fn apply(&self, events: Vec<TimelineEvent>) -> Vec<TimelineEvent> {
        events
            .into_iter()
            .map(|event| {
                let category = event.category;
                self.rules
                    .iter()
                    .filter(|rule| rule.applies_to == category)
                    .fold(event, |adjusted, rule| apply_rule(rule, &adjusted))
            })
            .collect()
    }
}

/// New event shifted by `rule.offset`, with the duration override applied.
pub fn apply_rule(rule: &SyncRule, event: &TimelineEvent) -> TimelineEvent {
    let start = event.start + rule.offset;
    let end = match rule.duration_override {
        Some(duration) if duration > PrecisionTime::ZERO => start + duration,
        _ => event.end + rule.offset,
    };
    TimelineEvent {
        start,
        end,
        ..event.clone()
    }
}
