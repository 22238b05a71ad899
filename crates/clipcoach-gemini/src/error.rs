//! Gemini client error types.

use thiserror::Error;

pub type GeminiResult<T> = Result<T, GeminiError>;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Gemini API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Prompt blocked: {0}")]
    Blocked(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeminiError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Whether the model answered but produced nothing usable.
    pub fn is_empty_answer(&self) -> bool {
        matches!(self, GeminiError::Blocked(_) | GeminiError::InvalidResponse(_))
    }

    /// Whether the remote side reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GeminiError::Api { status: 404, .. })
    }
}
