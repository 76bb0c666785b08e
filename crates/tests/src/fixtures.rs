//! Shared builders for the integration tests.

use contracts::{ContentAnalysis, PrecisionTime, SceneSegment};

pub fn ms(v: i64) -> PrecisionTime {
    PrecisionTime::from_millis(v)
}

/// Contiguous scenes between consecutive boundaries.
pub fn scene_analysis(boundaries: &[i64]) -> ContentAnalysis {
    ContentAnalysis {
        total_duration: ms(boundaries.last().copied().unwrap_or(20_000).max(20_000)),
        scenes: boundaries
            .windows(2)
            .enumerate()
            .map(|(i, pair)| SceneSegment {
                id: format!("scene_{i}"),
                start: ms(pair[0]),
                end: ms(pair[1]),
                description: None,
            })
            .collect(),
        ..Default::default()
    }
}
