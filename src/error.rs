//! Error types.
//!
//! Untrusted learner data never produces an error: malformed command entries are
//! skipped and empty sources are "not satisfied". Only caller contract violations
//! and unreadable payloads/configuration surface here.

use thiserror::Error;

/// Failures of a render pass.
#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("surface dimensions must be finite and non-negative, got {width}x{height}")]
    InvalidSurface { width: f32, height: f32 },
}

/// Failures decoding an interpreter payload as a whole.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("command payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("command payload must be a JSON array, got {0}")]
    NotAnArray(&'static str),
}

/// Failures loading lesson configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("lesson config is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid objective profile: {0}")]
    InvalidProfile(String),
}
