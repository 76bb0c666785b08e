//! `validate` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::{Category, SyncJob};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    job_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<JobSummary>,
}

#[derive(Serialize)]
struct JobSummary {
    name: String,
    version: String,
    scenes: usize,
    frames: usize,
    candidates: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(job = %args.job.display(), "Validating job");

    let result = validate_job(&args.job);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{json}");
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Job validation failed")
    }
}

fn validate_job(path: &Path) -> ValidationResult {
    let job_path = path.display().to_string();

    if !path.exists() {
        return ValidationResult {
            valid: false,
            job_path,
            error: Some(format!("File not found: {}", path.display())),
            warnings: Vec::new(),
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_job(path) {
        Ok(job) => ValidationResult {
            valid: true,
            job_path,
            error: None,
            warnings: collect_warnings(&job),
            summary: Some(JobSummary {
                name: job.name.clone(),
                version: format!("{:?}", job.version),
                scenes: job.analysis.scenes.len(),
                frames: job.analysis.frames.len(),
                candidates: job.candidates.len(),
            }),
        },
        Err(e) => ValidationResult {
            valid: false,
            job_path,
            error: Some(e.to_string()),
            warnings: Vec::new(),
            summary: None,
        },
    }
}

/// Non-fatal issues the engine would degrade on
fn collect_warnings(job: &SyncJob) -> Vec<String> {
    let mut warnings = Vec::new();

    if job.analysis.is_empty() {
        warnings.push("analysis has no scenes or frames - requested timing is kept".to_string());
    }
    if job.candidates.is_empty() {
        warnings.push("no candidates - the timeline will be empty".to_string());
    }

    let requests = &job.candidates;
    let windows = requests
        .subtitles
        .iter()
        .map(|r| (Category::Subtitle, r.start, r.end))
        .chain(requests.audio.iter().map(|r| (Category::Audio, r.start, r.end)))
        .chain(requests.effects.iter().map(|r| (Category::Effect, r.start, r.end)));
    for (category, start, end) in windows {
        if end <= start {
            warnings.push(format!("{category} candidate [{start}, {end}) has an empty window"));
        } else if end > job.analysis.total_duration {
            warnings.push(format!(
                "{category} candidate ends at {end}, after the media ({})",
                job.analysis.total_duration
            ));
        }
    }

    let empty_subtitles = requests
        .subtitles
        .iter()
        .filter(|r| !r.has_text())
        .count();
    if empty_subtitles > 0 {
        warnings.push(format!("{empty_subtitles} subtitle(s) have no text"));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Job is valid: {}", result.job_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Name: {}", summary.name);
            println!("  Version: {}", summary.version);
            println!("  Scenes: {}", summary.scenes);
            println!("  Frames: {}", summary.frames);
            println!("  Candidates: {}", summary.candidates);
        }

        if !result.warnings.is_empty() {
            println!("\n⚠ Warnings:");
            for warning in &result.warnings {
                println!("  - {warning}");
            }
        }
    } else {
        println!("✗ Job is invalid: {}", result.job_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {error}");
        }
    }
}
