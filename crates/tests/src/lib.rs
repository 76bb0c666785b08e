//! # Integration Tests
//!
//! Cross-crate tests.
//!
//! Covers:
//! - Contract snapshots (wire format of the timeline)
//! - End-to-end job -> engine -> metrics scenarios
//! - Seeded property tests over random analyses and candidates

#[cfg(test)]
mod fixtures;

#[cfg(test)]
mod property_tests;

#[cfg(test)]
mod contract_tests {
    use contracts::{Category, PrecisionTime, SyncRequest, SubtitleRequest};
    use sync_engine::TimelineSynchronizer;

    use crate::fixtures::{ms, scene_analysis};

    #[test]
    fn test_timeline_wire_format() {
        let request = SyncRequest {
            subtitles: vec![SubtitleRequest::new(ms(4950), ms(6000), "x".repeat(20))],
            ..Default::default()
        };
        let timeline = TimelineSynchronizer::default()
            .synchronize(&scene_analysis(&[0, 5000, 12000]), &request)
            .unwrap();

        let json = serde_json::to_value(&timeline).unwrap();
        let event = &json["events"][0];
        assert_eq!(event["id"], "subtitle_0");
        assert_eq!(event["category"], "subtitle");
        assert_eq!(event["start"], 5100);
        assert_eq!(event["end"], 9100);
        assert_eq!(event["priority"], 8);
        assert_eq!(event["sync_points"], serde_json::json!([5000]));
        assert_eq!(event["properties"]["position"], "bottom");
        assert_eq!(json["rules"][1]["id"], "audio_fade_align");
        assert_eq!(json["rules"][1]["offset"], 500);
        assert_eq!(json["meta"]["sync_precision"], "0.001");
        assert_eq!(json["frame_rate"]["num"], 30);
    }

    #[test]
    fn test_fractional_times_survive_round_trip() {
        let request: SyncRequest = serde_json::from_str(
            r#"{ "audio": [{ "start": 1000.0005, "end": 2000.25, "reference": "a.wav" }] }"#,
        )
        .unwrap();
        // half-up at the microsecond boundary
        assert_eq!(request.audio[0].start, PrecisionTime::from_micros(1_000_001));

        let timeline = TimelineSynchronizer::default()
            .synchronize(&scene_analysis(&[]), &request)
            .unwrap();
        let json = serde_json::to_string(&timeline).unwrap();
        let back: contracts::SynchronizedTimeline = serde_json::from_str(&json).unwrap();
        assert_eq!(back.events, timeline.events);
        assert_eq!(back.events_of(Category::Audio).count(), 1);
    }
}

#[cfg(test)]
mod e2e_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{Category, SyncRequest, AudioRequest, EffectRequest, SubtitleRequest};
    use observability::TimelineMetricsAggregator;
    use sync_engine::{ConflictResolver, TimelineSynchronizer};

    use crate::fixtures::{ms, scene_analysis};

    const JOB: &str = r#"
name = "trailer"

[engine]
tolerance = 50
invalid_window_policy = "skip"

[analysis]
total_duration = 12000

[[analysis.scenes]]
id = "opening"
start = 0
end = 5000

[[analysis.scenes]]
id = "chase"
start = 5000
end = 12000

[[analysis.frames]]
timestamp = 5200
face_count = 0
motion_intensity = 0.9
emotional_tone = "tense"

[[analysis.audio]]
start = 300
end = 2400
kind = "speech"
transcript = "where are we"

[[candidates.subtitles]]
start = 280
end = 2400
text = "Where are we?"

[[candidates.subtitles]]
start = 4960
end = 7000
text = "Run!"

[[candidates.subtitles]]
start = 9000
end = 9000
text = "broken"

[[candidates.audio]]
start = 0
end = 6000
reference = "theme.mp3"
volume = 0.8

[[candidates.effects]]
start = 5100
end = 5400
kind = "highlight"
"#;

    #[test]
    fn test_job_file_to_timeline() {
        let job = ConfigLoader::load_job_from_str(JOB, ConfigFormat::Toml).unwrap();
        let engine = TimelineSynchronizer::new(job.engine.clone().unwrap());
        let timeline = engine.synchronize(&job.analysis, &job.candidates).unwrap();

        // speech boundary at 300 is 20ms away
        let first = timeline.event("subtitle_0").unwrap();
        assert_eq!(first.start, ms(400));
        assert_eq!(first.duration(), ms(2600));

        let second = timeline.event("subtitle_1").unwrap();
        assert_eq!(second.start, ms(5100));
        assert_eq!(second.duration(), ms(1000));

        let effect = timeline.event("effect_0").unwrap();
        assert_eq!(effect.sync_points, vec![ms(5200)]);

        let audio = timeline.event("audio_0").unwrap();
        assert_eq!(audio.start, ms(500));
        assert_eq!(audio.properties["volume"], 0.8);

        assert_eq!(timeline.meta.snapped_subtitles, 2);
        assert_eq!(timeline.meta.rejected.len(), 1);
        assert_eq!(timeline.meta.rejected[0].category, Category::Subtitle);
        assert_eq!(timeline.meta.total_events, 4);
        assert!(timeline.meta.shifted.is_empty());
        // every start sits 100ms past its sync point after the rule offsets:
        // (0.6 * 8 * 2 + 0.3 * 5 + 0.3 * 3) / 24
        assert!((timeline.quality - 0.5).abs() < 1e-9);

        let mut aggregator = TimelineMetricsAggregator::new();
        observability::record_timeline_metrics(&job.name, &timeline);
        aggregator.update(&timeline);
        let summary = aggregator.summary();
        assert_eq!(summary.total_events, 4);
        assert_eq!(summary.total_rejected, 1);
    }

    #[test]
    fn test_scene_boundary_subtitle() {
        let request = SyncRequest {
            subtitles: vec![SubtitleRequest::new(ms(4950), ms(6000), "x".repeat(20))],
            ..Default::default()
        };
        let timeline = TimelineSynchronizer::default()
            .synchronize(&scene_analysis(&[0, 5000, 12000]), &request)
            .unwrap();

        // 5000..9000 before subtitle_align
        let event = &timeline.events[0];
        assert_eq!(event.start - ms(100), ms(5000));
        assert_eq!(event.end - ms(100), ms(9000));
    }

    #[test]
    fn test_equal_priority_audio_shift() {
        let request = SyncRequest {
            audio: vec![
                AudioRequest::new(ms(1000), ms(4000), "a.mp3"),
                AudioRequest::new(ms(1000), ms(4000), "b.mp3"),
            ],
            ..Default::default()
        };
        let timeline = TimelineSynchronizer::default()
            .synchronize(&scene_analysis(&[]), &request)
            .unwrap();

        let shift = &timeline.meta.shifted[0];
        assert_eq!(shift.event_id, "audio_1");
        assert_eq!(shift.from, ms(1500));
        assert_eq!(shift.to, ms(4550));
        assert_eq!(timeline.event("audio_1").unwrap().duration(), ms(3000));

        // resolving the output again moves nothing
        let again = ConflictResolver::new(ms(50)).resolve_with_report(timeline.events.clone());
        assert!(again.shifts.is_empty());
        assert_eq!(again.events, timeline.events);
    }

    #[test]
    fn test_transition_effect_scenario() {
        let request = SyncRequest {
            effects: vec![EffectRequest::new(ms(2000), ms(2600), "transition")],
            ..Default::default()
        };
        let timeline = TimelineSynchronizer::default()
            .synchronize(&scene_analysis(&[0, 2550, 6000]), &request)
            .unwrap();

        let effect = &timeline.events[0];
        assert_eq!(effect.sync_points, vec![ms(2550)]);
        assert_eq!((effect.start, effect.end), (ms(2000), ms(2600)));
    }

    #[test]
    fn test_runs_share_nothing_across_threads() {
        let engine = TimelineSynchronizer::default();
        let analysis = scene_analysis(&[0, 5000, 12000]);
        let request = SyncRequest {
            subtitles: vec![SubtitleRequest::new(ms(4950), ms(6000), "hello world")],
            audio: vec![AudioRequest::new(ms(0), ms(3000), "a.mp3")],
            ..Default::default()
        };

        let expected = serde_json::to_value(engine.synchronize(&analysis, &request).unwrap()).unwrap();
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| engine.synchronize(&analysis, &request).unwrap()))
                .collect();
            for handle in handles {
                let timeline = handle.join().unwrap();
                assert_eq!(serde_json::to_value(&timeline).unwrap(), expected);
            }
        });
    }
}
