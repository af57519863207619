mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn health_reports_rules() {
    let app = common::create_test_app();

    let (status, json) = app.request("GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["levels"], 15);
    assert_eq!(json["time_limit_minutes"], 35);
}

#[tokio::test]
async fn metrics_are_exposed_in_prometheus_format() {
    let app = common::create_test_app();
    let user_id = app.create_player("Metrics").await;
    app.start_game(&user_id).await;

    let (status, body) = app.request("GET", "/metrics", None).await;

    assert_eq!(status, StatusCode::OK);
    let text = body.as_str().unwrap();
    assert!(text.contains("games_total"));
    assert!(text.contains("http_requests_total"));
}

#[tokio::test]
async fn trace_id_is_echoed_or_generated() {
    let app = common::create_test_app();
    let response = tower::ServiceExt::oneshot(
        app.router.clone(),
        axum::http::Request::builder()
            .uri("/health")
            .header("x-trace-id", "abc-123")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(response.headers()["x-trace-id"], "abc-123");

    let response = tower::ServiceExt::oneshot(
        app.router.clone(),
        axum::http::Request::builder()
            .uri("/health")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();
    assert!(response.headers().contains_key("x-trace-id"));
}

#[tokio::test]
async fn invalid_letter_is_unprocessable() {
    let app = common::create_test_app();
    let user_id = app.create_player("Typo").await;
    let game = app.start_game(&user_id).await;

    let (status, json) = app.answer(game["id"].as_str().unwrap(), "e").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["status"], 422);

    // The game is untouched.
    let (_, json) = app
        .request("GET", &format!("/api/v1/games/{}", game["id"].as_str().unwrap()), None)
        .await;
    assert_eq!(json["status"], "in_progress");
}

#[tokio::test]
async fn uppercase_letter_is_accepted() {
    let app = common::create_test_app();
    let user_id = app.create_player("Caps").await;
    let game = app.start_game(&user_id).await;
    let letter = common::right_letter(&game).to_uppercase();

    let (status, json) = app.answer(game["id"].as_str().unwrap(), &letter).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "advanced");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = common::create_test_app();
    let missing = Uuid::new_v4();

    let (status, _) = app
        .request("GET", &format!("/api/v1/games/{}", missing), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request("GET", &format!("/api/v1/users/{}", missing), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = app
        .request("POST", "/api/v1/games", Some(json!({ "user_id": missing })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn blank_player_name_is_rejected() {
    let app = common::create_test_app();

    let (status, json) = app
        .request("POST", "/api/v1/users", Some(json!({ "name": "" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("Validation error"));
}

#[tokio::test]
async fn malformed_body_uses_error_shape() {
    let app = common::create_test_app();

    let (status, json) = app
        .request("POST", "/api/v1/games", Some(json!({ "user": "nobody" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert!(json["message"].is_string());
}
