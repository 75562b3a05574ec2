//! Error types for the workout_core library.

use crate::schema::ValidationErrors;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for workout_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pasted text could not be parsed as JSON at all
    #[error("{0}")]
    Format(String),

    /// Field-level schema violations, all of them
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Operation is not allowed in the current state
    #[error("{0}")]
    Precondition(String),

    /// Lookup by id resolved to nothing
    #[error("Workout not found: {0}")]
    NotFound(String),

    /// Storage adapter failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}
