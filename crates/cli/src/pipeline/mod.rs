//! Batch orchestration module.

mod orchestrator;
mod stats;

pub use orchestrator::{BatchConfig, BatchRunner, JobOutput, JobReport};
pub use stats::BatchStats;
