//! Seeded randomized property tests.
//!
//! Every case derives from `StdRng::seed_from_u64`, so failures reproduce.

use contracts::{
    AudioKind, AudioRequest, AudioSegment, Category, ContentAnalysis, EffectRequest, EventId, FrameSample,
    PrecisionTime, Properties, SceneSegment, SubtitleRequest, SyncEngineConfig, SyncRequest,
    TimelineEvent,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sync_engine::{reading_time, ConflictResolver, TimelineSynchronizer};

use crate::fixtures::ms;

const CASES: u64 = 200;
const TONES: [&str; 5] = ["neutral", "happy", "sad", "tense", "calm"];
const EFFECT_KINDS: [&str; 5] = ["transition", "fade", "highlight", "emphasis", "zoom"];

fn random_analysis(rng: &mut StdRng) -> ContentAnalysis {
    let total = rng.random_range(5_000..60_000);

    let mut scenes = Vec::new();
    let mut cursor = 0;
    while cursor < total {
        let end = (cursor + rng.random_range(500..8_000)).min(total);
        scenes.push(SceneSegment {
            id: format!("scene_{}", scenes.len()),
            start: ms(cursor),
            end: ms(end),
            description: None,
        });
        cursor = end;
    }

    let frames = (0..rng.random_range(0..40))
        .map(|_| FrameSample {
            timestamp: PrecisionTime::from_micros(rng.random_range(0..total * 1000)),
            face_count: rng.random_range(0..3),
            motion_intensity: rng.random_range(0.0..1.0),
            emotional_tone: TONES[rng.random_range(0..TONES.len())].to_string(),
        })
        .collect();

    let audio = (0..rng.random_range(0..6))
        .map(|_| {
            let start = rng.random_range(0..total);
            AudioSegment {
                start: ms(start),
                end: ms(start + rng.random_range(200..5_000)),
                kind: if rng.random_bool(0.7) {
                    AudioKind::Speech
                } else {
                    AudioKind::Music
                },
                transcript: None,
            }
        })
        .collect();

    ContentAnalysis {
        total_duration: ms(total),
        scenes: if rng.random_bool(0.1) { Vec::new() } else { scenes },
        frames,
        audio,
        ..Default::default()
    }
}

/// Windows are mostly valid; roughly one in twenty is empty or reversed.
fn random_window(rng: &mut StdRng, total: i64) -> (PrecisionTime, PrecisionTime) {
    let start = PrecisionTime::from_micros(rng.random_range(0..total * 1000));
    let length = if rng.random_bool(0.05) {
        -rng.random_range(0..1_000_000)
    } else {
        rng.random_range(1..6_000_000)
    };
    (start, start + PrecisionTime::from_micros(length))
}

fn random_text(rng: &mut StdRng) -> String {
    let len = rng.random_range(0..80);
    (0..len)
        .map(|_| char::from(rng.random_range(b'a'..=b'z')))
        .collect()
}

fn random_request(rng: &mut StdRng, total: i64) -> SyncRequest {
    let subtitles = (0..rng.random_range(0..15))
        .map(|_| {
            let (start, end) = random_window(rng, total);
            SubtitleRequest::new(start, end, random_text(rng))
        })
        .collect();
    let audio = (0..rng.random_range(0..8))
        .map(|i| {
            let (start, end) = random_window(rng, total);
            AudioRequest::new(start, end, format!("track_{i}.mp3"))
        })
        .collect();
    let effects = (0..rng.random_range(0..8))
        .map(|_| {
            let (start, end) = random_window(rng, total);
            EffectRequest::new(start, end, EFFECT_KINDS[rng.random_range(0..EFFECT_KINDS.len())])
        })
        .collect();

    SyncRequest {
        subtitles,
        audio,
        effects,
    }
}

fn random_case(seed: u64) -> (ContentAnalysis, SyncRequest) {
    let mut rng = StdRng::seed_from_u64(seed);
    let analysis = random_analysis(&mut rng);
    let total = (analysis.total_duration.as_micros() / 1000).max(1);
    let request = random_request(&mut rng, total);
    (analysis, request)
}

fn assert_no_same_category_overlap(events: &[TimelineEvent], seed: u64) {
    for (i, a) in events.iter().enumerate() {
        for b in &events[i + 1..] {
            assert!(
                !a.conflicts_with(b),
                "seed {seed}: {} [{}, {}) overlaps {} [{}, {})",
                a.id,
                a.start,
                a.end,
                b.id,
                b.start,
                b.end
            );
        }
    }
}

#[test]
fn test_engine_output_invariants() {
    let engine = TimelineSynchronizer::default();
    let config = SyncEngineConfig::default();

    for seed in 0..CASES {
        let (analysis, request) = random_case(seed);
        let timeline = engine.synchronize(&analysis, &request).unwrap();
        let meta = &timeline.meta;

        // every candidate is either placed or rejected
        assert_eq!(meta.total_events + meta.rejected.len(), request.len(), "seed {seed}");
        assert_eq!(timeline.events.len(), meta.total_events, "seed {seed}");

        assert_no_same_category_overlap(&timeline.events, seed);

        for event in timeline.events_of(Category::Subtitle) {
            assert!(
                event.duration() >= reading_time(&event.content, &config),
                "seed {seed}: {} shorter than its reading time",
                event.id
            );
        }

        for event in &timeline.events {
            assert!(event.end > event.start, "seed {seed}: {} is empty", event.id);
            assert!(
                event.sync_points.windows(2).all(|pair| pair[0] < pair[1]),
                "seed {seed}: sync points of {} not sorted and unique",
                event.id
            );
        }

        assert!(
            (0.0..=1.0).contains(&timeline.quality),
            "seed {seed}: quality {}",
            timeline.quality
        );
        if timeline.events.is_empty() {
            assert_eq!(timeline.quality, 0.0);
        }
    }
}

#[test]
fn test_resolution_is_idempotent() {
    let engine = TimelineSynchronizer::default();
    let resolver = ConflictResolver::new(engine.config().tolerance);

    for seed in 0..CASES {
        let (analysis, request) = random_case(seed);
        let timeline = engine.synchronize(&analysis, &request).unwrap();

        let again = resolver.resolve_with_report(timeline.events.clone());
        assert!(again.shifts.is_empty(), "seed {seed}: second pass moved events");
        assert_eq!(again.events, timeline.events, "seed {seed}");
    }
}

#[test]
fn test_synchronize_is_deterministic() {
    let engine = TimelineSynchronizer::default();

    for seed in 0..CASES / 4 {
        let (analysis, request) = random_case(seed);
        let first = serde_json::to_value(engine.synchronize(&analysis, &request).unwrap()).unwrap();
        let second =
            serde_json::to_value(engine.synchronize(&analysis, &request).unwrap()).unwrap();
        assert_eq!(first, second, "seed {seed}");
    }
}

#[test]
fn test_sync_points_stay_inside_requested_window() {
    let engine = TimelineSynchronizer::default();

    for seed in 0..CASES {
        let (analysis, request) = random_case(seed);
        let timeline = engine.synchronize(&analysis, &request).unwrap();

        for (index, candidate) in request.audio.iter().enumerate() {
            let Some(event) = timeline.event(EventId::for_candidate(Category::Audio, index).as_str())
            else {
                continue;
            };
            assert!(
                event
                    .sync_points
                    .iter()
                    .all(|p| candidate.start <= *p && *p < candidate.end),
                "seed {seed}: audio_{index} has a sync point outside its window"
            );
        }
    }
}

fn resolver_event(id: &str, start: i64, end: i64, priority: i32) -> TimelineEvent {
    TimelineEvent {
        id: EventId::new(id),
        start: ms(start),
        end: ms(end),
        category: Category::Effect,
        content: String::new(),
        properties: Properties::new(),
        sync_points: Vec::new(),
        priority,
    }
}

#[test]
fn test_priority_dominance_for_pairs() {
    let resolver = ConflictResolver::new(ms(50));
    let mut rng = StdRng::seed_from_u64(7);

    for case in 0..CASES {
        let a_start = rng.random_range(0..10_000);
        let b_start = rng.random_range(0..10_000);
        let a = resolver_event("a", a_start, a_start + rng.random_range(1..5_000), rng.random_range(0..10));
        let b = resolver_event("b", b_start, b_start + rng.random_range(1..5_000), rng.random_range(0..10));

        let (high, low) = match a.priority.cmp(&b.priority) {
            std::cmp::Ordering::Greater => (&a, &b),
            std::cmp::Ordering::Less => (&b, &a),
            std::cmp::Ordering::Equal => continue,
        };

        let out = if rng.random_bool(0.5) {
            resolver.resolve(vec![a.clone(), b.clone()])
        } else {
            resolver.resolve(vec![b.clone(), a.clone()])
        };

        let placed_high = out.iter().find(|e| e.id == high.id).unwrap();
        assert_eq!(
            (placed_high.start, placed_high.end),
            (high.start, high.end),
            "case {case}: higher priority event moved"
        );

        let placed_low = out.iter().find(|e| e.id == low.id).unwrap();
        assert_eq!(placed_low.duration(), low.duration(), "case {case}");
    }
}
