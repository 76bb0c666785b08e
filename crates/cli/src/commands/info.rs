//! `info` command implementation.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use contracts::{AudioKind, Category, SyncJob};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Job info for JSON output
#[derive(Serialize)]
struct JobInfo {
    name: String,
    version: String,
    analysis: AnalysisInfo,
    candidates: BTreeMap<Category, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    engine: Option<contracts::SyncEngineConfig>,
}

#[derive(Serialize)]
struct AnalysisInfo {
    total_duration_ms: f64,
    frame_rate: String,
    scenes: usize,
    frames: usize,
    key_frames: usize,
    speech_segments: usize,
    other_audio_segments: usize,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(job = %args.job.display(), "Loading job info");

    if !args.job.exists() {
        anyhow::bail!("Job file not found: {}", args.job.display());
    }

    let job = config_loader::ConfigLoader::load_job(&args.job)
        .with_context(|| format!("Failed to load job from {}", args.job.display()))?;
    let info = build_job_info(&job);

    if args.json {
        let json = serde_json::to_string_pretty(&info).context("Failed to serialize job info")?;
        println!("{json}");
    } else {
        print_job_info(&info);
    }

    Ok(())
}

fn build_job_info(job: &SyncJob) -> JobInfo {
    let analysis = &job.analysis;
    let speech_segments = analysis.speech_segments().count();

    JobInfo {
        name: job.name.clone(),
        version: format!("{:?}", job.version),
        analysis: AnalysisInfo {
            total_duration_ms: analysis.total_duration.as_millis_f64(),
            frame_rate: analysis.frame_rate.to_string(),
            scenes: analysis.scenes.len(),
            frames: analysis.frames.len(),
            key_frames: analysis.frames.iter().filter(|f| f.is_key_frame()).count(),
            speech_segments,
            other_audio_segments: analysis
                .audio
                .iter()
                .filter(|segment| segment.kind != AudioKind::Speech)
                .count(),
        },
        candidates: Category::ALL
            .into_iter()
            .map(|category| (category, job.candidates.count(category)))
            .collect(),
        engine: job.engine.clone(),
    }
}

fn print_job_info(info: &JobInfo) {
    println!("Job: {} ({})", info.name, info.version);

    let analysis = &info.analysis;
    println!("\nAnalysis");
    println!("   ├─ Duration: {:.3}ms", analysis.total_duration_ms);
    println!("   ├─ Frame rate: {}", analysis.frame_rate);
    println!("   ├─ Scenes: {}", analysis.scenes);
    println!(
        "   ├─ Frames: {} ({} key frames)",
        analysis.frames, analysis.key_frames
    );
    println!(
        "   └─ Audio: {} speech, {} other",
        analysis.speech_segments, analysis.other_audio_segments
    );

    println!("\nCandidates");
    let last = info.candidates.len().saturating_sub(1);
    for (i, (category, count)) in info.candidates.iter().enumerate() {
        let prefix = if i == last { "└─" } else { "├─" };
        println!("   {prefix} {category}: {count}");
    }

    match &info.engine {
        Some(engine) => {
            println!("\nEngine (job override)");
            println!("   ├─ Tolerance: {}", engine.tolerance);
            println!("   ├─ Reading speed: {} chars/s", engine.reading_chars_per_second);
            println!("   ├─ Min display: {}", engine.min_display);
            println!("   └─ Invalid windows: {:?}", engine.invalid_window_policy);
        }
        None => println!("\nEngine: defaults"),
    }

    println!();
}
