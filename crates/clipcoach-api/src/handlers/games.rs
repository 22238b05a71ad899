//! Game catalog handler.

use axum::Json;
use serde::Serialize;

use clipcoach_models::{Game, GameOption};

#[derive(Serialize)]
pub struct GamesResponse {
    pub games: Vec<GameOption>,
}

/// List the supported titles in display order.
pub async fn list_games() -> Json<GamesResponse> {
    Json(GamesResponse {
        games: Game::ALL.iter().map(|g| GameOption::from(*g)).collect(),
    })
}
