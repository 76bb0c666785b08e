//! Sync-point discovery over the analyzer output.

use std::collections::BTreeSet;

use contracts::{Category, ContentAnalysis, EffectClass, PrecisionTime};
use tracing::instrument;

/// Half-open time window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: PrecisionTime,
    pub end: PrecisionTime,
}

impl TimeWindow {
    pub fn new(start: PrecisionTime, end: PrecisionTime) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn contains(&self, t: PrecisionTime) -> bool {
        self.start <= t && t < self.end
    }
}

/// What the sync points are being looked up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTarget {
    Subtitle,
    Audio,
    Effect(EffectClass),
}

impl SyncTarget {
    pub fn category(&self) -> Category {
        match self {
            SyncTarget::Subtitle => Category::Subtitle,
            SyncTarget::Audio => Category::Audio,
            SyncTarget::Effect(_) => Category::Effect,
        }
    }
}

/// Read-only projection of a `ContentAnalysis` onto candidate timestamps.
#[derive(Debug, Clone, Copy)]
pub struct SyncPointLocator<'a> {
    analysis: &'a ContentAnalysis,
}

impl<'a> SyncPointLocator<'a> {
    pub fn new(analysis: &'a ContentAnalysis) -> Self {
        Self { analysis }
    }

    /// Sorted, deduplicated sync candidates inside `window`.
    #[instrument(
        name = "timeline_sync_find_sync_points",
        level = "trace",
        skip(self),
        fields(start = %window.start, end = %window.end)
    )]
    pub fn find_sync_points(&self, window: TimeWindow, target: SyncTarget) -> Vec<PrecisionTime> {
        let mut points = BTreeSet::new();

        match target {
            SyncTarget::Subtitle => {
                self.collect_scene_boundaries(window, &mut points);
                self.collect_key_frames(window, &mut points);
                self.collect_speech_boundaries(window, &mut points);
            }
            SyncTarget::Audio => {
                self.collect_scene_boundaries(window, &mut points);
                self.collect_key_frames(window, &mut points);
                self.collect_emotion_changes(window, &mut points);
            }
            SyncTarget::Effect(EffectClass::Transition) => {
                self.collect_scene_boundaries(window, &mut points);
            }
            SyncTarget::Effect(EffectClass::Emphasis) => {
                self.collect_key_frames(window, &mut points);
            }
            SyncTarget::Effect(EffectClass::Other) => {}
        }

        points.into_iter().collect()
    }

    fn collect_scene_boundaries(&self, window: TimeWindow, points: &mut BTreeSet<PrecisionTime>) {
        for scene in &self.analysis.scenes {
            points.extend([scene.start, scene.end].into_iter().filter(|t| window.contains(*t)));
        }
    }

    fn collect_key_frames(&self, window: TimeWindow, points: &mut BTreeSet<PrecisionTime>) {
        points.extend(
            self.analysis
                .frames
                .iter()
                .filter(|frame| window.contains(frame.timestamp) && frame.is_key_frame())
                .map(|frame| frame.timestamp),
        );
    }

    fn collect_speech_boundaries(&self, window: TimeWindow, points: &mut BTreeSet<PrecisionTime>) {
        for speech in self.analysis.speech_segments() {
            points.extend([speech.start, speech.end].into_iter().filter(|t| window.contains(*t)));
        }
    }

    /// Timestamps where the tone differs from the previous in-window sample.
    fn collect_emotion_changes(&self, window: TimeWindow, points: &mut BTreeSet<PrecisionTime>) {
        let mut previous: Option<&str> = None;
        for frame in self
            .analysis
            .frames
            .iter()
            .filter(|frame| window.contains(frame.timestamp))
        {
            let tone = frame.emotional_tone.as_str();
            if previous.is_some_and(|prev| prev != tone) {
                points.insert(frame.timestamp);
            }
            previous = Some(tone);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{AudioKind, AudioSegment, FrameSample, SceneSegment};

    fn ms(v: i64) -> PrecisionTime {
        PrecisionTime::from_millis(v)
    }

    fn scene(id: &str, start: i64, end: i64) -> SceneSegment {
        SceneSegment {
            id: id.to_string(),
            start: ms(start),
            end: ms(end),
            description: None,
        }
    }

    fn frame(t: i64, faces: u32, motion: f64, tone: &str) -> FrameSample {
        FrameSample {
            timestamp: ms(t),
            face_count: faces,
            motion_intensity: motion,
            emotional_tone: tone.to_string(),
        }
    }

    fn analysis() -> ContentAnalysis {
        ContentAnalysis {
            total_duration: ms(20_000),
            scenes: vec![scene("s0", 0, 5000), scene("s1", 5000, 12000), scene("s2", 12000, 20000)],
            frames: vec![
                frame(1000, 0, 0.1, "neutral"),
                frame(2000, 2, 0.1, "neutral"),
                frame(3000, 0, 0.1, "calm"),
                frame(4000, 0, 0.9, "calm"),
                frame(5500, 0, 0.1, "neutral"),
            ],
            audio: vec![
                AudioSegment {
                    start: ms(2500),
                    end: ms(4500),
                    kind: AudioKind::Speech,
                    transcript: Some("line".into()),
                },
                AudioSegment {
                    start: ms(3200),
                    end: ms(3900),
                    kind: AudioKind::Music,
                    transcript: None,
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_window_is_half_open() {
        let window = TimeWindow::new(ms(0), ms(5000));
        assert!(window.contains(ms(0)));
        assert!(!window.contains(ms(5000)));
    }

    #[test]
    fn test_subtitle_points() {
        let analysis = analysis();
        let locator = SyncPointLocator::new(&analysis);
        let points = locator.find_sync_points(TimeWindow::new(ms(0), ms(6000)), SyncTarget::Subtitle);
        // scene 0/5000, key frames 2000/4000, speech 2500/4500; music ignored
        assert_eq!(
            points,
            vec![ms(0), ms(2000), ms(2500), ms(4000), ms(4500), ms(5000)]
        );
    }

    #[test]
    fn test_audio_points_include_emotion_changes() {
        let analysis = analysis();
        let locator = SyncPointLocator::new(&analysis);
        let points = locator.find_sync_points(TimeWindow::new(ms(500), ms(6000)), SyncTarget::Audio);
        // scene 5000, key 2000/4000, tone changes at 3000 and 5500; no speech
        assert_eq!(points, vec![ms(2000), ms(3000), ms(4000), ms(5000), ms(5500)]);
    }

    #[test]
    fn test_effect_transition_uses_scene_boundaries() {
        let mut analysis = analysis();
        analysis.scenes.push(scene("s3", 2550, 2600));
        let locator = SyncPointLocator::new(&analysis);
        let points = locator.find_sync_points(
            TimeWindow::new(ms(2000), ms(2600)),
            SyncTarget::Effect(EffectClass::Transition),
        );
        assert_eq!(points, vec![ms(2550)]);
    }

    #[test]
    fn test_effect_emphasis_uses_key_frames() {
        let analysis = analysis();
        let locator = SyncPointLocator::new(&analysis);
        let window = TimeWindow::new(ms(0), ms(6000));
        let points = locator.find_sync_points(window, SyncTarget::Effect(EffectClass::Emphasis));
        assert_eq!(points, vec![ms(2000), ms(4000)]);

        let none = locator.find_sync_points(window, SyncTarget::Effect(EffectClass::Other));
        assert!(none.is_empty());
    }

    #[test]
    fn test_empty_analysis_yields_nothing() {
        let analysis = ContentAnalysis::default();
        let locator = SyncPointLocator::new(&analysis);
        let points =
            locator.find_sync_points(TimeWindow::new(ms(0), ms(10_000)), SyncTarget::Subtitle);
        assert!(points.is_empty());
    }
}
