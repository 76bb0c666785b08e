//! Error types for CLI operations.

use std::path::PathBuf;

use contracts::ContractError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Job file not found: {}", path.display())]
    JobNotFound { path: PathBuf },

    #[error("Failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: ContractError,
    },

    #[error("Synchronization of '{job}' failed: {source}")]
    Sync {
        job: String,
        #[source]
        source: ContractError,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Job task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Failed to serialize timeline: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn load(path: impl Into<PathBuf>, source: ContractError) -> Self {
        Self::Load {
            path: path.into(),
            source,
        }
    }

    pub fn sync(job: impl Into<String>, source: ContractError) -> Self {
        Self::Sync {
            job: job.into(),
            source,
        }
    }

    pub fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Output {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
