use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::game_question::GameQuestion;
use super::hint::{HintKind, HintPayload};
use super::letter::AnswerLetter;
use super::prize::GameRules;
use crate::error::GameError;
use crate::services::hint_service;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Won,
    Fail,
    Timeout,
    Money,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::InProgress => "in_progress",
            GameStatus::Won => "won",
            GameStatus::Fail => "fail",
            GameStatus::Timeout => "timeout",
            GameStatus::Money => "money",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// What an answer submission did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    /// Correct answer, the game moved to the next level.
    Advanced,
    /// Correct answer on the last level.
    Won,
    /// Wrong answer.
    Failed,
    /// The time limit had already passed; the answer was not evaluated.
    TimedOut,
}

/// One player's run up the prize ladder.
///
/// Status is never stored: it is derived from `is_failed`, `finished_at`,
/// `created_at` and `current_level` on every read. Setting `finished_at`
/// makes the game terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    pub id: Uuid,
    pub user_id: Uuid,
    pub current_level: usize,
    pub is_failed: bool,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub prize: u64,
    pub used_hints: BTreeSet<HintKind>,
    /// Bumped by the store on every successful write.
    pub version: u64,
    game_questions: Vec<GameQuestion>,
}

impl Game {
    /// Starts a game at level 0. `game_questions` must be ordered by level.
    pub fn new(
        id: Uuid,
        user_id: Uuid,
        game_questions: Vec<GameQuestion>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            current_level: 0,
            is_failed: false,
            created_at,
            finished_at: None,
            prize: 0,
            used_hints: BTreeSet::new(),
            version: 0,
            game_questions,
        }
    }

    pub fn game_questions(&self) -> &[GameQuestion] {
        &self.game_questions
    }

    pub fn status(&self, rules: &GameRules) -> GameStatus {
        let Some(finished_at) = self.finished_at else {
            return GameStatus::InProgress;
        };

        if self.is_failed {
            if finished_at - self.created_at > rules.time_limit {
                GameStatus::Timeout
            } else {
                GameStatus::Fail
            }
        } else if self.current_level > rules.prizes.max_level() {
            GameStatus::Won
        } else {
            GameStatus::Money
        }
    }

    pub fn finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// `-1` until the first question has been answered.
    pub fn previous_level(&self) -> i64 {
        self.current_level as i64 - 1
    }

    /// The question at the current level; `None` once the game is finished.
    pub fn current_game_question(&self) -> Option<&GameQuestion> {
        if self.finished() {
            return None;
        }
        self.game_questions.get(self.current_level)
    }

    pub fn is_past_deadline(&self, rules: &GameRules, now: DateTime<Utc>) -> bool {
        now - self.created_at > rules.time_limit
    }

    pub fn remaining_hints(&self) -> Vec<HintKind> {
        HintKind::ALL
            .into_iter()
            .filter(|kind| !self.used_hints.contains(kind))
            .collect()
    }

    /// Submits `letter` for the current question.
    ///
    /// A submission after the deadline ends the game as failed without looking
    /// at the letter. A wrong letter banks the fireproof prize of the previous
    /// level; a correct letter on the last level banks the top prize.
    pub fn answer_current_question(
        &mut self,
        letter: AnswerLetter,
        rules: &GameRules,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, GameError> {
        if self.finished() {
            return Err(GameError::FinishedGame);
        }

        if self.is_past_deadline(rules, now) {
            let prize = rules.prizes.fireproof_prize(self.previous_level());
            self.finish(prize, true, now);
            tracing::info!(
                game_id = %self.id,
                level = self.current_level,
                prize,
                "Answer arrived after the time limit"
            );
            return Ok(AnswerOutcome::TimedOut);
        }

        let correct = self
            .current_game_question()
            .ok_or(GameError::FinishedGame)?
            .answer_correct(letter);

        if !correct {
            let prize = rules.prizes.fireproof_prize(self.previous_level());
            self.finish(prize, true, now);
            tracing::info!(
                game_id = %self.id,
                level = self.current_level,
                prize,
                "Wrong answer, game over"
            );
            return Ok(AnswerOutcome::Failed);
        }

        self.current_level += 1;

        if self.current_level > rules.prizes.max_level() {
            let prize = rules.prizes.max_prize();
            self.finish(prize, false, now);
            tracing::info!(game_id = %self.id, prize, "Top prize won");
            return Ok(AnswerOutcome::Won);
        }

        tracing::debug!(game_id = %self.id, level = self.current_level, "Advanced to next level");
        Ok(AnswerOutcome::Advanced)
    }

    /// Ends the game and banks the full prize of the last conquered level.
    pub fn take_money(&mut self, rules: &GameRules, now: DateTime<Utc>) -> Result<(), GameError> {
        if self.finished() {
            return Err(GameError::FinishedGame);
        }

        if self.time_out(rules, now) {
            return Ok(());
        }

        let prize = rules.prizes.prize_for(self.previous_level());
        self.finish(prize, false, now);
        tracing::info!(
            game_id = %self.id,
            level = self.current_level,
            prize,
            "Player took the money"
        );
        Ok(())
    }

    /// Finishes an in-progress game whose deadline has passed. Returns whether
    /// the game was timed out by this call.
    pub fn time_out(&mut self, rules: &GameRules, now: DateTime<Utc>) -> bool {
        if self.finished() || !self.is_past_deadline(rules, now) {
            return false;
        }

        let prize = rules.prizes.fireproof_prize(self.previous_level());
        self.finish(prize, true, now);
        tracing::info!(game_id = %self.id, prize, "Game timed out");
        true
    }

    /// Spends one of the game's lifelines on the current question.
    pub fn use_help<R: Rng + ?Sized>(
        &mut self,
        kind: HintKind,
        rng: &mut R,
    ) -> Result<&HintPayload, GameError> {
        if self.finished() {
            return Err(GameError::FinishedGame);
        }
        if self.used_hints.contains(&kind) {
            return Err(GameError::HintAlreadyUsed(kind));
        }

        let game_question = self
            .game_questions
            .get_mut(self.current_level)
            .ok_or(GameError::FinishedGame)?;

        match kind {
            HintKind::AudienceHelp => hint_service::add_audience_help(game_question, rng)?,
            HintKind::FiftyFifty => hint_service::add_fifty_fifty(game_question, rng)?,
            HintKind::FriendCall => hint_service::add_friend_call(game_question, rng)?,
        }
        self.used_hints.insert(kind);

        self.current_game_question()
            .and_then(|gq| gq.help_hash().get(&kind))
            .ok_or(GameError::FinishedGame)
    }

    fn finish(&mut self, prize: u64, failed: bool, now: DateTime<Utc>) {
        self.finished_at = Some(now);
        self.is_failed = failed;
        self.prize = prize;
    }
}
