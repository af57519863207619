use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::ApiError;
use crate::{
    extractors::AppJson,
    models::user::CreatePlayerRequest,
    services::{game_service::GameService, AppState},
};

pub async fn create_player(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CreatePlayerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Validate request
    if let Err(e) = req.validate() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("Validation error: {}", e),
        ));
    }

    let service = GameService::new(&state);
    let player = service.create_player(req.name.trim()).await?;

    Ok((StatusCode::CREATED, Json(player)))
}

pub async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let service = GameService::new(&state);
    let profile = service.player_profile(user_id).await?;

    Ok(Json(profile))
}
