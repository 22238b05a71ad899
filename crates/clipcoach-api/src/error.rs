//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use clipcoach_core::CoachError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Coach(#[from] CoachError),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Coach(e) => match e {
                CoachError::UnknownGame(_) | CoachError::UnsupportedFormat(_) => {
                    StatusCode::BAD_REQUEST
                }
                CoachError::ProcessingFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                CoachError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                CoachError::Transport(_) | CoachError::NoFeedback(_) => StatusCode::BAD_GATEWAY,
                CoachError::Config(_) | CoachError::Staging(_) | CoachError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::Coach(e) => Some(e.kind()),
            ApiError::RateLimited => Some("rate_limited"),
            _ => None,
        }
    }

    fn is_internal(&self) -> bool {
        self.status_code() == StatusCode::INTERNAL_SERVER_ERROR
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

/// Response extension set on server-side failures.
///
/// The handler keeps the full detail; [`crate::middleware::redact_internal_errors`]
/// swaps it for a generic message when the server runs in production.
#[derive(Clone, Copy, Debug)]
pub(crate) struct InternalErrorDetail {
    code: Option<&'static str>,
}

impl InternalErrorDetail {
    pub(crate) fn redacted(self, status: StatusCode) -> Response {
        let body = ErrorResponse {
            detail: "An internal error occurred".to_string(),
            code: self.code.map(str::to_string),
        };
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let body = ErrorResponse {
            detail: self.to_string(),
            code: code.map(str::to_string),
        };

        let mut response = (status, Json(body)).into_response();
        if self.is_internal() {
            response.extensions_mut().insert(InternalErrorDetail { code });
        }
        response
    }
}
