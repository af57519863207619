use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Player account; the game core only ever credits its balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub balance: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlayerRequest {
    #[validate(length(min = 1, max = 64, message = "name must be 1-64 characters"))]
    pub name: String,
}

/// Player profile with the games they have played.
#[derive(Debug, Serialize)]
pub struct PlayerProfile {
    #[serde(flatten)]
    pub player: Player,
    pub games: Vec<GameSummary>,
}

#[derive(Debug, Serialize)]
pub struct GameSummary {
    pub id: Uuid,
    pub status: super::game::GameStatus,
    pub current_level: usize,
    pub prize: u64,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}
