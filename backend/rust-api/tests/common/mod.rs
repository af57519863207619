#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use millionaire_api::{
    config::Config,
    create_router,
    models::question::Question,
    services::{
        game_factory::InMemoryQuestionCatalog,
        store::{InMemoryAccountStore, InMemoryGameStore},
        AppState,
    },
    utils::time::ManualClock,
};
use rand::{rngs::StdRng, SeedableRng};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Text of the correct answer for every seeded question.
pub const RIGHT_ANSWER: &str = "right";

pub struct TestApp {
    pub router: Router,
    pub clock: Arc<ManualClock>,
}

pub fn create_test_app() -> TestApp {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let config = Config::default();
    let rules = config
        .game_rules()
        .expect("default rules should be valid");
    let catalog = InMemoryQuestionCatalog::from_questions(seed_questions(4), rules.prizes.len())
        .expect("seed questions should be valid");
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    ));

    let app_state = Arc::new(AppState::new(
        config,
        rules,
        Arc::new(catalog),
        Arc::new(InMemoryGameStore::new()),
        Arc::new(InMemoryAccountStore::new()),
        clock.clone(),
        StdRng::seed_from_u64(42),
    ));

    TestApp {
        router: create_router(app_state),
        clock,
    }
}

/// `per_level` questions on each of the 15 levels, correct answer in slot 1.
pub fn seed_questions(per_level: usize) -> Vec<Question> {
    (0..15)
        .flat_map(|level| {
            (0..per_level).map(move |n| {
                Question::new(
                    level,
                    format!("Level {} question {}", level, n),
                    [RIGHT_ANSWER, "wrong one", "wrong two", "wrong three"],
                )
            })
        })
        .collect()
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let body = match body {
            Some(json) => Body::from(serde_json::to_vec(&json).unwrap()),
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    pub async fn create_player(&self, name: &str) -> String {
        let (status, json) = self
            .request("POST", "/api/v1/users", Some(serde_json::json!({ "name": name })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create player failed: {}", json);
        json["id"].as_str().unwrap().to_string()
    }

    pub async fn start_game(&self, user_id: &str) -> Value {
        let (status, json) = self
            .request(
                "POST",
                "/api/v1/games",
                Some(serde_json::json!({ "user_id": user_id })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create game failed: {}", json);
        json
    }

    pub async fn answer(&self, game_id: &str, letter: &str) -> (StatusCode, Value) {
        self.request(
            "POST",
            &format!("/api/v1/games/{}/answers", game_id),
            Some(serde_json::json!({ "letter": letter })),
        )
        .await
    }
}

/// Letter under which the current question shows the correct answer.
pub fn right_letter(game: &Value) -> String {
    letter_where(game, |text| text == RIGHT_ANSWER)
}

pub fn wrong_letter(game: &Value) -> String {
    letter_where(game, |text| text != RIGHT_ANSWER)
}

fn letter_where(game: &Value, pred: impl Fn(&str) -> bool) -> String {
    game["question"]["variants"]
        .as_object()
        .expect("game has no current question")
        .iter()
        .find(|(_, text)| pred(text.as_str().unwrap()))
        .map(|(letter, _)| letter.clone())
        .unwrap()
}
