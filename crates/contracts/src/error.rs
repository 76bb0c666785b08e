//! Layered error definitions
//!
//! Categorized by source: config / time / event / batch

use thiserror::Error;

use crate::{Category, PrecisionTime};

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Time Errors =====
    /// Non-finite or out-of-range time value at the float boundary
    #[error("cannot represent {value}{unit} as a precision time")]
    InvalidTime { value: f64, unit: &'static str },

    // ===== Event Errors =====
    /// Candidate whose end is not after its start
    #[error("invalid {category} window #{index}: end {end} <= start {start}")]
    InvalidEventWindow {
        category: Category,
        index: usize,
        start: PrecisionTime,
        end: PrecisionTime,
    },

    // ===== Batch Errors =====
    /// Candidate batch exceeds the configured ceiling
    #[error("batch of {count} candidates exceeds max_events={max}")]
    BatchTooLarge { count: usize, max: usize },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_time(value: f64, unit: &'static str) -> Self {
        Self::InvalidTime { value, unit }
    }

    pub fn invalid_window(
        category: Category,
        index: usize,
        start: PrecisionTime,
        end: PrecisionTime,
    ) -> Self {
        Self::InvalidEventWindow {
            category,
            index,
            start,
            end,
        }
    }
}

impl From<validator::ValidationErrors> for ContractError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Report the first failing field; the full tree is in the message.
        let field = errors
            .errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "<root>".to_string());
        Self::config_validation(field, errors.to_string())
    }
}
