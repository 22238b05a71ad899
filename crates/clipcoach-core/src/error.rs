//! Coaching pipeline error types.

use std::time::Duration;

use thiserror::Error;

use clipcoach_gemini::GeminiError;
use clipcoach_models::{UnknownGameError, UnsupportedFormatError};

pub type CoachResult<T> = Result<T, CoachError>;

#[derive(Debug, Error)]
pub enum CoachError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to stage clip: {0}")]
    Staging(#[from] std::io::Error),

    #[error("Remote request failed: {0}")]
    Transport(String),

    #[error("Video processing failed for {asset}: {reason}")]
    ProcessingFailed { asset: String, reason: String },

    #[error("Timed out after {attempts} state checks ({waited:?}) waiting for {asset}")]
    Timeout {
        asset: String,
        attempts: u32,
        waited: Duration,
    },

    #[error("No feedback returned: {0}")]
    NoFeedback(String),

    #[error("Feedback task failed: {0}")]
    Internal(String),

    #[error(transparent)]
    UnknownGame(#[from] UnknownGameError),

    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormatError),
}

impl CoachError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn no_feedback(msg: impl Into<String>) -> Self {
        Self::NoFeedback(msg.into())
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CoachError::Config(_) => "config",
            CoachError::Staging(_) => "staging",
            CoachError::Transport(_) => "transport",
            CoachError::ProcessingFailed { .. } => "processing_failed",
            CoachError::Timeout { .. } => "timeout",
            CoachError::NoFeedback(_) => "no_feedback",
            CoachError::Internal(_) => "internal",
            CoachError::UnknownGame(_) => "unknown_game",
            CoachError::UnsupportedFormat(_) => "unsupported_format",
        }
    }

    /// Whether the caller sent something unusable (as opposed to a remote or local failure).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CoachError::UnknownGame(_) | CoachError::UnsupportedFormat(_)
        )
    }
}

impl From<GeminiError> for CoachError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::Config(msg) => CoachError::Config(msg),
            e if e.is_empty_answer() => CoachError::NoFeedback(e.to_string()),
            e => CoachError::Transport(e.to_string()),
        }
    }
}
