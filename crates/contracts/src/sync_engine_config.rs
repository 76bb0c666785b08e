//! Sync engine configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::PrecisionTime;

const MAX_TOLERANCE: PrecisionTime = PrecisionTime::from_millis(1000);

/// Timeline sync engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SyncEngineConfig {
    /// Alignment tolerance (ms)
    #[validate(custom(function = "validate_tolerance"))]
    pub tolerance: PrecisionTime,

    /// Subtitle reading speed
    #[validate(range(min = 1, max = 100))]
    pub reading_chars_per_second: u32,

    /// Minimum subtitle display time (ms)
    #[validate(custom(function = "validate_min_display"))]
    pub min_display: PrecisionTime,

    /// What to do with a candidate whose end is not after its start
    pub invalid_window_policy: InvalidWindowPolicy,

    /// Largest accepted candidate batch
    #[validate(range(min = 1))]
    pub max_events: usize,
}

impl Default for SyncEngineConfig {
    fn default() -> Self {
        Self {
            tolerance: PrecisionTime::from_millis(50),
            reading_chars_per_second: 5,
            min_display: PrecisionTime::from_millis(1000),
            invalid_window_policy: InvalidWindowPolicy::default(),
            max_events: 10_000,
        }
    }
}

/// Handling of `InvalidEventWindow` candidates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidWindowPolicy {
    /// Drop the candidate and record it in the timeline metadata
    #[default]
    Skip,
    /// Fail the whole run
    Fail,
}

fn validate_tolerance(tolerance: &PrecisionTime) -> Result<(), validator::ValidationError> {
    if *tolerance <= PrecisionTime::ZERO || *tolerance > MAX_TOLERANCE {
        let mut err = validator::ValidationError::new("tolerance");
        err.message = Some(format!("tolerance must be in (0, 1000]ms, got {tolerance}").into());
        return Err(err);
    }
    Ok(())
}

fn validate_min_display(min_display: &PrecisionTime) -> Result<(), validator::ValidationError> {
    if *min_display <= PrecisionTime::ZERO {
        let mut err = validator::ValidationError::new("min_display");
        err.message = Some(format!("min_display must be > 0, got {min_display}").into());
        return Err(err);
    }
    Ok(())
}
