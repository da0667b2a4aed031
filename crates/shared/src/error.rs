//! Error types for Beetle Gate

use thiserror::Error;

/// Error captured when the guarded content fails to render
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Content render failed: {message}")]
pub struct ContentRenderError {
    pub message: String,
}

impl ContentRenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// General gate error type
#[derive(Debug, Error)]
pub enum GateError {
    #[error(transparent)]
    RenderFailed(#[from] ContentRenderError),

    #[error("Invalid route '{path}': {reason}")]
    InvalidRoute { path: String, reason: String },

    #[error("Route '{route}' requires precondition '{name}', which has no registered source")]
    UnknownPrecondition { route: String, name: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, GateError>;
