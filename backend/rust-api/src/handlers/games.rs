use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use super::ApiError;
use crate::{
    extractors::AppJson,
    models::{
        hint::UseHelpRequest, CreateGameRequest, GameView, SubmitAnswerRequest,
        SubmitAnswerResponse, UseHelpResponse,
    },
    services::{game_service::GameService, AppState},
};

pub async fn create_game(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CreateGameRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Creating game for user_id={}", req.user_id);

    let service = GameService::new(&state);
    let game = service.create_game(req.user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(GameView::new(&game, service.rules(), service.now())),
    ))
}

pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!("Getting game: {}", game_id);

    let service = GameService::new(&state);
    let game = service.get_game(game_id).await?;

    Ok(Json(GameView::new(&game, service.rules(), service.now())))
}

pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
    AppJson(req): AppJson<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Submitting answer '{}' for game: {}", req.letter, game_id);

    let service = GameService::new(&state);
    let (outcome, game) = service
        .answer_current_question(game_id, &req.letter)
        .await?;

    // Once the game is over the question it stopped on can be revealed.
    let correct_answer = if game.finished() {
        game.game_questions()
            .get(game.current_level)
            .map(|gq| gq.correct_answer_key())
    } else {
        None
    };

    Ok(Json(SubmitAnswerResponse {
        outcome,
        correct_answer,
        game: GameView::new(&game, service.rules(), service.now()),
    }))
}

pub async fn take_money(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Taking money for game: {}", game_id);

    let service = GameService::new(&state);
    let game = service.take_money(game_id).await?;

    Ok(Json(GameView::new(&game, service.rules(), service.now())))
}

pub async fn use_help(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
    AppJson(req): AppJson<UseHelpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Using help '{}' for game: {}", req.help_type, game_id);

    let service = GameService::new(&state);
    let (payload, game) = service.use_help(game_id, req.help_type).await?;

    Ok(Json(UseHelpResponse {
        help_type: req.help_type,
        payload,
        game: GameView::new(&game, service.rules(), service.now()),
    }))
}
