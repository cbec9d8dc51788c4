//! Error types for the Sam.AI engine.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for engine configuration and lookup operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Configuration and lookup errors surfaced synchronously to the caller.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No adapters registered")]
    EmptyRegistry,

    #[error("Adapter registered twice: {0}")]
    DuplicateAdapter(String),

    #[error("Adapter {id} has performance score {score} outside [0, 1]")]
    InvalidPerformanceScore { id: String, score: f32 },

    #[error("No personality configured")]
    PersonalityNotConfigured,

    #[error("Specialty not found: {0}")]
    UnknownSpecialty(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Failures from a generative backend. Always caught at the dispatch boundary.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Adapter unavailable: {0}")]
    Unavailable(String),

    #[error("Adapter call timed out after {0:?}")]
    Timeout(Duration),
}
