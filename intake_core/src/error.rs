//! Error types for the intake_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for intake_core operations
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

    /// Malformed or out-of-range user-supplied value
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Progress or logging requested before profile setup completed
    #[error("profile not found; set up a profile first")]
    ProfileNotFound,

    /// Workout name absent from the catalog
    #[error("unknown workout type: {0}")]
    UnknownWorkout(String),

    /// Temperature/food service unreachable or returned no usable match
    #[error("lookup failed: {0}")]
    Lookup(String),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand for an [`Error::InvalidInput`] with a formatted message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}
