//! Errors for the fallible configuration paths
//!
//! The simulation itself is total; only loading and validating
//! configuration can fail.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("malformed configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
