//! ContentAnalysis - content analyzer output
//!
//! Scene boundaries, sampled frame features and audio segments for one media
//! item. Lists are expected in ascending time order.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{FrameRate, PrecisionTime};

/// Emotional tones that mark a frame as "key".
pub const STRONG_EMOTIONS: [&str; 3] = ["happy", "sad", "tense"];

/// Motion intensity above which a frame is "key".
pub const KEY_MOTION_THRESHOLD: f64 = 0.5;

/// Analysis result for a single media item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ContentAnalysis {
    /// Media duration
    pub total_duration: PrecisionTime,

    #[serde(default)]
    #[validate(custom(function = "validate_frame_rate"))]
    pub frame_rate: FrameRate,

    #[serde(default)]
    #[validate(nested)]
    pub scenes: Vec<SceneSegment>,

    #[serde(default)]
    #[validate(nested)]
    pub frames: Vec<FrameSample>,

    #[serde(default)]
    pub audio: Vec<AudioSegment>,
}

impl ContentAnalysis {
    /// No scene segments and no frame samples: the locator has nothing to offer.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty() && self.frames.is_empty()
    }

    pub fn speech_segments(&self) -> impl Iterator<Item = &AudioSegment> {
        self.audio.iter().filter(|segment| segment.kind == AudioKind::Speech)
    }
}

/// Scene segment `[start, end]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_scene_bounds"))]
pub struct SceneSegment {
    #[validate(length(min = 1))]
    pub id: String,
    pub start: PrecisionTime,
    pub end: PrecisionTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Sampled frame features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FrameSample {
    pub timestamp: PrecisionTime,

    #[serde(default)]
    pub face_count: u32,

    /// 0.0 (static) - 1.0 (high motion)
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0))]
    pub motion_intensity: f64,

    #[serde(default = "default_tone")]
    pub emotional_tone: String,
}

fn default_tone() -> String {
    "neutral".to_string()
}

impl FrameSample {
    /// Faces on screen, strong motion, or a strong emotion.
    pub fn is_key_frame(&self) -> bool {
        self.face_count > 0
            || self.motion_intensity > KEY_MOTION_THRESHOLD
            || STRONG_EMOTIONS.contains(&self.emotional_tone.as_str())
    }
}

/// Classified audio segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSegment {
    pub start: PrecisionTime,
    pub end: PrecisionTime,
    pub kind: AudioKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

/// Audio segment classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioKind {
    Speech,
    Music,
    Ambient,
    Silence,
}

fn validate_frame_rate(rate: &FrameRate) -> Result<(), validator::ValidationError> {
    if rate.num == 0 || rate.den == 0 {
        let mut err = validator::ValidationError::new("frame_rate");
        err.message = Some(format!("frame rate {rate} must have non-zero terms").into());
        return Err(err);
    }
    Ok(())
}

fn validate_scene_bounds(scene: &SceneSegment) -> Result<(), validator::ValidationError> {
    if scene.end < scene.start {
        let mut err = validator::ValidationError::new("scene_bounds");
        err.message = Some(
            format!(
                "scene '{}' ends ({}) before it starts ({})",
                scene.id, scene.end, scene.start
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}
