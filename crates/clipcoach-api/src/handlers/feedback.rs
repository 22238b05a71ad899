//! Clip feedback handler.

use std::time::Instant;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use tracing::info;

use clipcoach_core::CoachError;
use clipcoach_models::{FeedbackResult, Game, RequestId, UploadedClip};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::security::sanitize_file_name;
use crate::state::AppState;

/// Upload a clip and return coaching feedback for it.
///
/// Multipart fields: `game` (label or slug) and `file` (`.mp4` or `.mov`).
/// The request stays open until the remote model answers or the readiness
/// wait runs out.
pub async fn submit_feedback(
    State(state): State<AppState>,
    request_id: Option<Extension<String>>,
    mut multipart: Multipart,
) -> ApiResult<Json<FeedbackResult>> {
    let mut game_field: Option<String> = None;
    let mut file_field: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("game") => {
                game_field = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("file") => {
                let file_name = sanitize_file_name(field.file_name().unwrap_or_default());
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file_field = Some((file_name, Vec::from(bytes)));
            }
            // Unknown fields are drained and ignored
            _ => {}
        }
    }

    let game_field = game_field.ok_or_else(|| ApiError::bad_request("Missing 'game' field"))?;
    let (file_name, bytes) =
        file_field.ok_or_else(|| ApiError::bad_request("Missing 'file' field"))?;

    let game: Game = game_field.parse().map_err(CoachError::from)?;
    if bytes.is_empty() {
        return Err(ApiError::bad_request("Uploaded clip is empty"));
    }
    let clip = UploadedClip::new(file_name, bytes).map_err(CoachError::from)?;

    let request_id = request_id
        .map(|Extension(id)| RequestId::from_string(id))
        .unwrap_or_default();

    info!(
        request_id = %request_id,
        game = %game.slug(),
        file = %clip.file_name,
        bytes = clip.len(),
        "Feedback requested"
    );

    let started = Instant::now();
    let outcome = state.pipeline.run(request_id, clip, game).await;
    let elapsed = started.elapsed().as_secs_f64();

    match outcome {
        Ok(result) => {
            metrics::record_feedback(game.slug(), "ok", elapsed);
            metrics::record_asset_polls(result.polls);
            Ok(Json(result))
        }
        Err(e) => {
            metrics::record_feedback(game.slug(), e.kind(), elapsed);
            Err(e.into())
        }
    }
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::bad_request(err.body_text())
    }
}
