//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON engine configs and sync jobs
//! - Validate configuration legality
//! - Enforce the candidate batch ceiling
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let job = ConfigLoader::load_job(Path::new("clip.job.toml")).unwrap();
//! println!("{}: {} candidates", job.name, job.candidates.len());
//! ```

mod parser;
mod validator;

pub use contracts::{SyncEngineConfig, SyncJob};
pub use parser::ConfigFormat;
pub use validator::validate_batch_size;

use contracts::ContractError;
use serde::Serialize;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load an engine config, format detected from the extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_engine_config(path: &Path) -> Result<SyncEngineConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_engine_config_from_str(&content, format)
    }

    pub fn load_engine_config_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<SyncEngineConfig, ContractError> {
        let config = parser::parse(content, format)?;
        validator::validate_engine_config(&config)?;
        Ok(config)
    }

    /// Re-check a config assembled outside the loader (e.g. CLI overrides).
    pub fn validate_engine_config(config: &SyncEngineConfig) -> Result<(), ContractError> {
        validator::validate_engine_config(config)
    }

    /// Load a sync job (analysis + candidates + optional engine section).
    ///
    /// # Errors
    /// Same as [`ConfigLoader::load_engine_config`], plus `BatchTooLarge`.
    pub fn load_job(path: &Path) -> Result<SyncJob, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        let mut job = Self::load_job_from_str(&content, format)?;
        if job.name.is_empty() {
            job.name = Self::job_stem(path);
        }
        Ok(job)
    }

    pub fn load_job_from_str(content: &str, format: ConfigFormat) -> Result<SyncJob, ContractError> {
        let job = parser::parse(content, format)?;
        validator::validate_job(&job)?;
        Ok(job)
    }

    /// Serialize to a TOML string
    pub fn to_toml<T: Serialize>(value: &T) -> Result<String, ContractError> {
        toml::to_string_pretty(value)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize to a JSON string
    pub fn to_json<T: Serialize>(value: &T) -> Result<String, ContractError> {
        serde_json::to_string_pretty(value)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }

    /// File name without extensions: `clip.job.toml` -> `clip`.
    pub fn job_stem(path: &Path) -> String {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.split('.').next())
            .filter(|stem| !stem.is_empty())
            .unwrap_or("job")
            .to_string()
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{InvalidWindowPolicy, PrecisionTime};
    use std::io::Write;

    const JOB_TOML: &str = r#"
version = "V1"
name = "demo"

[engine]
tolerance = 40
max_events = 100

[analysis]
total_duration = 20000
frame_rate = { num = 30000, den = 1001 }

[[analysis.scenes]]
id = "s0"
start = 0
end = 5000

[[analysis.scenes]]
id = "s1"
start = 5000
end = 12000

[[analysis.frames]]
timestamp = 2550
face_count = 2
motion_intensity = 0.2
emotional_tone = "happy"

[[candidates.subtitles]]
start = 4950
end = 6000
text = "twenty characters!!!"

[[candidates.audio]]
start = 1000
end = 4000
reference = "bgm.mp3"

[[candidates.effects]]
start = 2000
end = 2600
kind = "transition"
"#;

    #[test]
    fn test_load_job_from_str_toml() {
        let result = ConfigLoader::load_job_from_str(JOB_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let job = result.unwrap();
        assert_eq!(job.name, "demo");
        assert_eq!(job.analysis.frame_rate.den, 1001);
        assert_eq!(job.candidates.len(), 3);
        assert_eq!(job.engine.unwrap().tolerance, PrecisionTime::from_millis(40));
    }

    #[test]
    fn test_job_round_trip_json() {
        let job = ConfigLoader::load_job_from_str(JOB_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&job).unwrap();
        let job2 = ConfigLoader::load_job_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(job.analysis.scenes, job2.analysis.scenes);
        assert_eq!(job.candidates.len(), job2.candidates.len());
        assert_eq!(job2.candidates.audio[0].reference, "bgm.mp3");
    }

    #[test]
    fn test_engine_config_round_trip_toml() {
        let config = SyncEngineConfig {
            tolerance: PrecisionTime::from_micros(12_500),
            invalid_window_policy: InvalidWindowPolicy::Fail,
            ..Default::default()
        };
        let serialized = ConfigLoader::to_toml(&config).unwrap();
        let loaded = ConfigLoader::load_engine_config_from_str(&serialized, ConfigFormat::Toml)
            .unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let result = ConfigLoader::load_engine_config_from_str(
            "reading_chars_per_second = 0",
            ConfigFormat::Toml,
        );
        let err = result.unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
        assert!(err.to_string().contains("reading_chars_per_second"));
    }

    #[test]
    fn test_load_job_from_path_names_job() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trailer.job.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{ "analysis": {{ "total_duration": 1000 }} }}"#).unwrap();

        let job = ConfigLoader::load_job(&path).unwrap();
        assert_eq!(job.name, "trailer");
        assert!(job.candidates.is_empty());
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.yaml");
        std::fs::write(&path, "name: x").unwrap();
        let err = ConfigLoader::load_job(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn test_job_stem() {
        assert_eq!(ConfigLoader::job_stem(Path::new("/tmp/clip.job.toml")), "clip");
        assert_eq!(ConfigLoader::job_stem(Path::new("movie.json")), "movie");
    }
}
