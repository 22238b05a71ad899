//! Structured request logging utilities.
//!
//! Provides consistent, structured logging for feedback requests with
//! tracing spans and contextual information.

use tracing::{error, info, warn, Span};

use clipcoach_models::{Game, RequestId};

/// Logger for one feedback request.
///
/// Every event carries the request ID and the game so a single request can be
/// followed through upload, polling, generation and cleanup.
#[derive(Debug, Clone)]
pub struct RequestLogger {
    request_id: String,
    game: &'static str,
}

impl RequestLogger {
    pub fn new(request_id: &RequestId, game: Game) -> Self {
        Self {
            request_id: request_id.to_string(),
            game: game.slug(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            request_id = %self.request_id,
            game = %self.game,
            "Feedback started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            request_id = %self.request_id,
            game = %self.game,
            "Feedback progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            request_id = %self.request_id,
            game = %self.game,
            "Feedback warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            request_id = %self.request_id,
            game = %self.game,
            "Feedback error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            request_id = %self.request_id,
            game = %self.game,
            "Feedback completed: {}", message
        );
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn game(&self) -> &str {
        self.game
    }

    /// Create a tracing span for this request.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "feedback",
            request_id = %self.request_id,
            game = %self.game,
            asset = tracing::field::Empty
        )
    }
}
