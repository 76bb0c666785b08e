//! Config validation
//!
//! Rules:
//! - `validator` derive checks on engine config and analysis
//! - candidate batch size <= `max_events`
//! - candidate windows are NOT checked here; the engine applies its policy

use contracts::{ContractError, SyncEngineConfig, SyncJob, SyncRequest};
use ::validator::Validate;

pub fn validate_engine_config(config: &SyncEngineConfig) -> Result<(), ContractError> {
    config.validate()?;
    Ok(())
}

/// Validate a job against its own engine section, or the defaults.
pub fn validate_job(job: &SyncJob) -> Result<(), ContractError> {
    job.validate()?;
    let max_events = job
        .engine
        .as_ref()
        .map_or(SyncEngineConfig::default().max_events, |engine| engine.max_events);
    validate_batch_size(&job.candidates, max_events)
}

pub fn validate_batch_size(request: &SyncRequest, max_events: usize) -> Result<(), ContractError> {
    let count = request.len();
    if count > max_events {
        return Err(ContractError::BatchTooLarge {
            count,
            max: max_events,
        });
    }
    Ok(())
}
