use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::GameError;
pub use services::AppState;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .nest("/api/v1/games", games_routes())
        .nest("/api/v1/users", users_routes())
        .with_state(app_state)
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn games_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::games::create_game))
        .route("/{id}", get(handlers::games::get_game))
        .route("/{id}/answers", post(handlers::games::submit_answer))
        .route("/{id}/take-money", post(handlers::games::take_money))
        .route("/{id}/help", post(handlers::games::use_help))
}

fn users_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::users::create_player))
        .route("/{id}", get(handlers::users::get_player))
}
