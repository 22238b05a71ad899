//! Coaching feedback models.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::game::Game;

/// Identifier for one feedback request, used to correlate logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new random request ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Text returned by the model for one clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResult {
    pub request_id: RequestId,
    pub game: Game,
    /// Model identifier that produced the text
    pub model: String,
    /// Coaching feedback, as returned by the model
    pub text: String,
    /// Remote asset the feedback was generated from
    pub asset_name: String,
    /// Number of state fetches made while waiting for the asset
    pub polls: u32,
    /// Wall-clock time for the whole request
    pub elapsed_ms: u64,
}
