//! Candidate requests - content generator output
//!
//! Raw subtitle / audio / effect candidates with their requested windows.
//! Styling fields end up verbatim in the placed event's `properties`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{Category, PrecisionTime, Properties};

/// All candidates of one synchronization run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncRequest {
    #[serde(default)]
    pub subtitles: Vec<SubtitleRequest>,

    #[serde(default)]
    pub audio: Vec<AudioRequest>,

    #[serde(default)]
    pub effects: Vec<EffectRequest>,
}

impl SyncRequest {
    pub fn len(&self) -> usize {
        self.subtitles.len() + self.audio.len() + self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Subtitle => self.subtitles.len(),
            Category::Audio => self.audio.len(),
            Category::Effect => self.effects.len(),
        }
    }
}

/// Subtitle / commentary line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleRequest {
    pub start: PrecisionTime,
    pub end: PrecisionTime,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub style: Properties,

    #[serde(default = "default_position")]
    pub position: String,

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_background")]
    pub background: String,

    #[serde(default = "default_animation")]
    pub animation: String,
}

impl SubtitleRequest {
    pub fn new(start: PrecisionTime, end: PrecisionTime, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            style: Properties::new(),
            position: default_position(),
            font_size: default_font_size(),
            color: default_color(),
            background: default_background(),
            animation: default_animation(),
        }
    }

    /// False for empty text; whitespace still counts toward reading time.
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn properties(&self) -> Properties {
        Properties::from([
            ("style".to_string(), Value::Object(self.style.clone().into_iter().collect())),
            ("position".to_string(), json!(self.position)),
            ("font_size".to_string(), json!(self.font_size)),
            ("color".to_string(), json!(self.color)),
            ("background".to_string(), json!(self.background)),
            ("animation".to_string(), json!(self.animation)),
        ])
    }
}

/// Background audio cue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioRequest {
    pub start: PrecisionTime,
    pub end: PrecisionTime,

    /// File path or library reference
    #[serde(default)]
    pub reference: String,

    #[serde(default = "default_volume")]
    pub volume: f64,

    #[serde(default = "default_fade")]
    pub fade_in: PrecisionTime,

    #[serde(default = "default_fade")]
    pub fade_out: PrecisionTime,

    #[serde(default, rename = "loop")]
    pub looped: bool,

    #[serde(default = "default_audio_kind")]
    pub kind: String,
}

impl AudioRequest {
    pub fn new(start: PrecisionTime, end: PrecisionTime, reference: impl Into<String>) -> Self {
        Self {
            start,
            end,
            reference: reference.into(),
            volume: default_volume(),
            fade_in: default_fade(),
            fade_out: default_fade(),
            looped: false,
            kind: default_audio_kind(),
        }
    }

    pub fn properties(&self) -> Properties {
        Properties::from([
            ("volume".to_string(), json!(self.volume)),
            ("fade_in".to_string(), json!(self.fade_in)),
            ("fade_out".to_string(), json!(self.fade_out)),
            ("loop".to_string(), json!(self.looped)),
            ("audio_type".to_string(), json!(self.kind)),
        ])
    }
}

/// Visual effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectRequest {
    pub start: PrecisionTime,
    pub end: PrecisionTime,

    /// Effect sub-kind, e.g. `transition`, `fade`, `highlight`
    pub kind: String,

    #[serde(default)]
    pub name: String,

    #[serde(default = "default_intensity")]
    pub intensity: f64,

    #[serde(default)]
    pub params: Properties,

    #[serde(default = "default_blend_mode")]
    pub blend_mode: String,
}

impl EffectRequest {
    pub fn new(start: PrecisionTime, end: PrecisionTime, kind: impl Into<String>) -> Self {
        Self {
            start,
            end,
            kind: kind.into(),
            name: String::new(),
            intensity: default_intensity(),
            params: Properties::new(),
            blend_mode: default_blend_mode(),
        }
    }

    pub fn class(&self) -> EffectClass {
        EffectClass::classify(&self.kind)
    }

    pub fn properties(&self) -> Properties {
        Properties::from([
            ("effect_name".to_string(), json!(self.name)),
            ("intensity".to_string(), json!(self.intensity)),
            ("parameters".to_string(), Value::Object(self.params.clone().into_iter().collect())),
            ("blend_mode".to_string(), json!(self.blend_mode)),
        ])
    }
}

/// Which analyzer signal an effect aligns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectClass {
    /// Scene boundaries
    Transition,
    /// Key frames
    Emphasis,
    /// No alignment signal
    Other,
}

impl EffectClass {
    pub fn classify(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "transition" | "fade" => Self::Transition,
            "highlight" | "emphasis" => Self::Emphasis,
            _ => Self::Other,
        }
    }
}

fn default_position() -> String {
    "bottom".to_string()
}

fn default_font_size() -> u32 {
    24
}

fn default_color() -> String {
    "#FFFFFF".to_string()
}

fn default_background() -> String {
    "transparent".to_string()
}

fn default_animation() -> String {
    "fade_in".to_string()
}

fn default_volume() -> f64 {
    0.5
}

fn default_fade() -> PrecisionTime {
    PrecisionTime::from_millis(1000)
}

fn default_audio_kind() -> String {
    "background_music".to_string()
}

fn default_intensity() -> f64 {
    0.5
}

fn default_blend_mode() -> String {
    "normal".to_string()
}
