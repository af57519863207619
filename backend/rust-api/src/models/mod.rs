use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub mod game;
pub mod game_question;
pub mod hint;
pub mod letter;
pub mod prize;
pub mod question;
pub mod user;

use game::{AnswerOutcome, Game, GameStatus};
use hint::{HelpHash, HintKind, HintPayload};
use letter::AnswerLetter;
use prize::{GameRules, PrizeStep};

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub letter: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub level: usize,
    pub text: String,
    pub variants: BTreeMap<AnswerLetter, String>,
    pub help_hash: HelpHash,
}

/// Game state as returned to clients.
#[derive(Debug, Serialize)]
pub struct GameView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: GameStatus,
    pub finished: bool,
    pub current_level: usize,
    pub previous_level: i64,
    pub prize: u64,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub seconds_left: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    pub remaining_hints: Vec<HintKind>,
    pub ladder: Vec<PrizeStep>,
}

impl GameView {
    pub fn new(game: &Game, rules: &GameRules, now: DateTime<Utc>) -> Self {
        let deadline = game.created_at + rules.time_limit;
        let seconds_left = if game.finished() {
            0
        } else {
            (deadline - now).num_seconds().max(0)
        };

        let question = game.current_game_question().map(|gq| QuestionView {
            level: gq.level(),
            text: gq.text().to_string(),
            variants: gq
                .variants()
                .into_iter()
                .map(|(letter, text)| (letter, text.to_string()))
                .collect(),
            help_hash: gq.help_hash().clone(),
        });

        Self {
            id: game.id,
            user_id: game.user_id,
            status: game.status(rules),
            finished: game.finished(),
            current_level: game.current_level,
            previous_level: game.previous_level(),
            prize: game.prize,
            created_at: game.created_at,
            finished_at: game.finished_at,
            seconds_left,
            question,
            remaining_hints: game.remaining_hints(),
            ladder: rules.prizes.ladder(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswerResponse {
    pub outcome: AnswerOutcome,
    /// Revealed once the game is over.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<AnswerLetter>,
    pub game: GameView,
}

#[derive(Debug, Serialize)]
pub struct UseHelpResponse {
    pub help_type: HintKind,
    pub payload: HintPayload,
    pub game: GameView,
}
