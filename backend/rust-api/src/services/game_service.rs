use rand::rngs::StdRng;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use super::game_factory::{self, QuestionCatalog};
use super::store::{AccountStore, GameStore};
use super::AppState;
use crate::error::GameError;
use crate::metrics::{self, ANSWERS_SUBMITTED_TOTAL, HINTS_REQUESTED_TOTAL};
use crate::models::game::{AnswerOutcome, Game};
use crate::models::hint::{HintKind, HintPayload};
use crate::models::letter::AnswerLetter;
use crate::models::prize::GameRules;
use crate::models::user::{GameSummary, Player, PlayerProfile};
use crate::utils::time::Clock;

/// Runs game transitions against the stores.
///
/// Every mutating call loads the game, applies one transition and writes it
/// back with a version check, so two racing requests on the same game cannot
/// both succeed.
pub struct GameService {
    games: Arc<dyn GameStore>,
    accounts: Arc<dyn AccountStore>,
    catalog: Arc<dyn QuestionCatalog>,
    rules: Arc<GameRules>,
    clock: Arc<dyn Clock>,
    rng: Arc<Mutex<StdRng>>,
}

impl GameService {
    pub fn new(state: &AppState) -> Self {
        Self {
            games: state.games.clone(),
            accounts: state.accounts.clone(),
            catalog: state.catalog.clone(),
            rules: state.rules.clone(),
            clock: state.clock.clone(),
            rng: state.rng.clone(),
        }
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub async fn create_player(&self, name: &str) -> Result<Player, GameError> {
        let player = self.accounts.create_player(name, self.clock.now()).await?;
        tracing::info!("Player created: {} ({})", player.id, player.name);
        Ok(player)
    }

    pub async fn player_profile(&self, user_id: Uuid) -> Result<PlayerProfile, GameError> {
        let player = self.accounts.get_player(user_id).await?;
        let games = self
            .games
            .games_for_user(user_id)
            .await?
            .into_iter()
            .map(|game| GameSummary {
                id: game.id,
                status: game.status(&self.rules),
                current_level: game.current_level,
                prize: game.prize,
                created_at: game.created_at,
                finished_at: game.finished_at,
            })
            .collect();

        Ok(PlayerProfile { player, games })
    }

    pub async fn create_game(&self, user_id: Uuid) -> Result<Game, GameError> {
        self.accounts.get_player(user_id).await?;

        if let Some(running) = self.games.in_progress_for_user(user_id).await? {
            let running = self.expire_if_late(running).await?;
            if !running.finished() {
                tracing::warn!(
                    "User {} already has game {} in progress",
                    user_id,
                    running.id
                );
                return Err(GameError::GameInProgress(running.id));
            }
        }

        let now = self.clock.now();
        let game = {
            let mut rng = self.rng();
            game_factory::create_game_for_user(
                user_id,
                self.catalog.as_ref(),
                &self.rules,
                &mut *rng,
                now,
            )?
        };

        let game = self.games.insert_game(game).await?;
        metrics::record_game_created();
        tracing::info!("Game created: {} for user: {}", game.id, user_id);

        Ok(game)
    }

    /// Loads a game, closing it first if its deadline has passed.
    pub async fn get_game(&self, game_id: Uuid) -> Result<Game, GameError> {
        let game = self.games.get_game(game_id).await?;
        self.expire_if_late(game).await
    }

    pub async fn answer_current_question(
        &self,
        game_id: Uuid,
        letter: &str,
    ) -> Result<(AnswerOutcome, Game), GameError> {
        let letter: AnswerLetter = letter.parse()?;
        let mut game = self.games.get_game(game_id).await?;

        let outcome = game.answer_current_question(letter, &self.rules, self.clock.now())?;
        let game = self.games.update_game(game).await?;

        ANSWERS_SUBMITTED_TOTAL
            .with_label_values(&[outcome_label(outcome)])
            .inc();
        tracing::info!(
            "Answer processed: game={}, letter={}, outcome={:?}, level={}",
            game_id,
            letter,
            outcome,
            game.current_level
        );

        if game.finished() {
            self.settle(&game).await?;
        }

        Ok((outcome, game))
    }

    pub async fn take_money(&self, game_id: Uuid) -> Result<Game, GameError> {
        let mut game = self.games.get_game(game_id).await?;

        game.take_money(&self.rules, self.clock.now())?;
        let game = self.games.update_game(game).await?;
        self.settle(&game).await?;

        Ok(game)
    }

    pub async fn use_help(
        &self,
        game_id: Uuid,
        kind: HintKind,
    ) -> Result<(HintPayload, Game), GameError> {
        let mut game = self.get_game(game_id).await?;

        let payload = {
            let mut rng = self.rng();
            game.use_help(kind, &mut *rng)?.clone()
        };
        let game = self.games.update_game(game).await?;

        HINTS_REQUESTED_TOTAL
            .with_label_values(&[kind.as_str()])
            .inc();
        tracing::info!("Hint used: game={}, hint={}", game_id, kind);

        Ok((payload, game))
    }

    async fn expire_if_late(&self, mut game: Game) -> Result<Game, GameError> {
        if !game.time_out(&self.rules, self.clock.now()) {
            return Ok(game);
        }

        match self.games.update_game(game).await {
            Ok(saved) => {
                self.settle(&saved).await?;
                Ok(saved)
            }
            // Another request closed the game first; its write wins.
            Err(GameError::Conflict(id)) => self.games.get_game(id).await,
            Err(e) => Err(e),
        }
    }

    /// Credits the prize of a game that has just finished.
    async fn settle(&self, game: &Game) -> Result<(), GameError> {
        let status = game.status(&self.rules);
        metrics::record_game_finished(status, game.prize);

        if game.prize > 0 {
            // The game is already committed as finished; a failed credit has to
            // be reconciled from this log line.
            let balance = match self.accounts.credit(game.user_id, game.prize).await {
                Ok(balance) => balance,
                Err(e) => {
                    tracing::error!(
                        "Failed to credit prize {} of game {} to user {}: {}",
                        game.prize,
                        game.id,
                        game.user_id,
                        e
                    );
                    return Err(e);
                }
            };
            tracing::info!(
                "Game {} finished as {}: credited {} to user {}, balance now {}",
                game.id,
                status.as_str(),
                game.prize,
                game.user_id,
                balance
            );
        } else {
            tracing::info!("Game {} finished as {} with no prize", game.id, status.as_str());
        }

        Ok(())
    }
}

fn outcome_label(outcome: AnswerOutcome) -> &'static str {
    match outcome {
        AnswerOutcome::Advanced => "advanced",
        AnswerOutcome::Won => "won",
        AnswerOutcome::Failed => "failed",
        AnswerOutcome::TimedOut => "timed_out",
    }
}
