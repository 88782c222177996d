//! Error types for the sampler.

use thiserror::Error;

/// Everything that can go wrong while configuring or running a sampler.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplingError {
    /// A configuration value is out of range. Construction refuses to proceed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The background grid would need more cells than the configured ceiling.
    #[error("background grid needs {cells} cells, limit is {limit}")]
    ResourceLimitExceeded { cells: f64, limit: usize },

    /// An internal invariant was broken. This is a defect, not a recoverable condition.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A serialized configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SamplingError {
    fn from(e: serde_json::Error) -> Self {
        SamplingError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SamplingError>;
