//! SyncJob - Config Loader output
//!
//! One synchronization run as stored on disk: the analysis result, the
//! candidate events and optional engine overrides.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{ContentAnalysis, SyncEngineConfig, SyncRequest};

/// Job file version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JobVersion {
    #[default]
    V1,
}

/// Complete synchronization job
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SyncJob {
    #[serde(default)]
    pub version: JobVersion,

    /// Media item name (used for output naming)
    #[serde(default)]
    pub name: String,

    /// Engine overrides for this job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub engine: Option<SyncEngineConfig>,

    #[validate(nested)]
    pub analysis: ContentAnalysis,

    #[serde(default)]
    pub candidates: SyncRequest,
}
