//! Access gate handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct UnlockRequest {
    #[validate(length(min = 1, max = 256))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Exchange the shared password for a session token.
pub async fn unlock(
    State(state): State<AppState>,
    Json(request): Json<UnlockRequest>,
) -> ApiResult<Json<AccessResponse>> {
    if request.validate().is_err() {
        metrics::record_access_attempt("denied");
        return Err(ApiError::unauthorized("Password incorrect"));
    }

    match state.gate.unlock(&request.password).await {
        Some(session) => {
            metrics::record_access_attempt("granted");
            info!(expires_at = %session.expires_at, "Access granted");
            Ok(Json(AccessResponse {
                token: session.token,
                expires_at: session.expires_at,
            }))
        }
        None => {
            metrics::record_access_attempt("denied");
            warn!("Access denied: incorrect password");
            Err(ApiError::unauthorized("Password incorrect"))
        }
    }
}

/// End the caller's session.
pub async fn lock(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
) -> ApiResult<StatusCode> {
    let Some(TypedHeader(auth)) = auth else {
        return Err(ApiError::unauthorized("Missing session token"));
    };
    state.gate.revoke(auth.token()).await;
    Ok(StatusCode::NO_CONTENT)
}
