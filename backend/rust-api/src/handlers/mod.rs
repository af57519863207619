use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::error::GameError;
use crate::metrics;
use crate::services::AppState;

pub mod games;
pub mod users;

/// Error body returned by every endpoint: `{ "message", "status" }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        let status = match &err {
            GameError::GameNotFound(_) | GameError::PlayerNotFound(_) => StatusCode::NOT_FOUND,
            GameError::FinishedGame
            | GameError::HintAlreadyUsed(_)
            | GameError::Conflict(_)
            | GameError::GameInProgress(_) => StatusCode::CONFLICT,
            GameError::InvalidLetter(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GameError::InsufficientCatalog { .. } => StatusCode::SERVICE_UNAVAILABLE,
            GameError::InvalidQuestion(_)
            | GameError::InvalidPrizeTable(_)
            | GameError::InvalidTimeLimit(_)
            | GameError::InvalidPermutation => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", err);
        } else {
            tracing::warn!("Request rejected: {}", err);
        }

        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "message": self.message,
                "status": self.status.as_u16()
            })),
        )
            .into_response()
    }
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "millionaire-api",
            "version": env!("CARGO_PKG_VERSION"),
            "levels": state.rules.prizes.len(),
            "time_limit_minutes": state.rules.time_limit.num_minutes()
        })),
    )
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}
