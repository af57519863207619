use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::GameError;
use crate::models::game::Game;
use crate::models::user::Player;

/// Persistence boundary for games. A game is always written whole, together
/// with its game questions.
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Stores a new game. Fails with `GameInProgress` if the player already
    /// has an unfinished game; the check and the write are one atomic step.
    async fn insert_game(&self, game: Game) -> Result<Game, GameError>;

    async fn get_game(&self, id: Uuid) -> Result<Game, GameError>;

    /// Replaces the stored game if its version still matches `game.version`,
    /// and returns the stored copy with the bumped version.
    async fn update_game(&self, game: Game) -> Result<Game, GameError>;

    async fn in_progress_for_user(&self, user_id: Uuid) -> Result<Option<Game>, GameError>;

    async fn games_for_user(&self, user_id: Uuid) -> Result<Vec<Game>, GameError>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create_player(&self, name: &str, now: DateTime<Utc>) -> Result<Player, GameError>;

    async fn get_player(&self, id: Uuid) -> Result<Player, GameError>;

    /// Adds `amount` to the balance and returns the new balance.
    async fn credit(&self, id: Uuid, amount: u64) -> Result<u64, GameError>;
}

#[derive(Debug, Default)]
pub struct InMemoryGameStore {
    games: RwLock<HashMap<Uuid, Game>>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameStore for InMemoryGameStore {
    async fn insert_game(&self, mut game: Game) -> Result<Game, GameError> {
        let mut games = self.games.write().await;
        if games.contains_key(&game.id) {
            return Err(GameError::Conflict(game.id));
        }
        if let Some(running) = games
            .values()
            .find(|g| g.user_id == game.user_id && !g.finished())
        {
            return Err(GameError::GameInProgress(running.id));
        }
        game.version = 1;
        games.insert(game.id, game.clone());
        Ok(game)
    }

    async fn get_game(&self, id: Uuid) -> Result<Game, GameError> {
        self.games
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(GameError::GameNotFound(id))
    }

    async fn update_game(&self, mut game: Game) -> Result<Game, GameError> {
        let mut games = self.games.write().await;
        let stored = games
            .get_mut(&game.id)
            .ok_or(GameError::GameNotFound(game.id))?;

        if stored.version != game.version {
            tracing::warn!(
                "Stale write rejected for game {}: stored version {}, got {}",
                game.id,
                stored.version,
                game.version
            );
            return Err(GameError::Conflict(game.id));
        }

        game.version += 1;
        *stored = game.clone();
        Ok(game)
    }

    async fn in_progress_for_user(&self, user_id: Uuid) -> Result<Option<Game>, GameError> {
        Ok(self
            .games
            .read()
            .await
            .values()
            .find(|g| g.user_id == user_id && !g.finished())
            .cloned())
    }

    async fn games_for_user(&self, user_id: Uuid) -> Result<Vec<Game>, GameError> {
        let mut games: Vec<Game> = self
            .games
            .read()
            .await
            .values()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect();
        games.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(games)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    players: RwLock<HashMap<Uuid, Player>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create_player(&self, name: &str, now: DateTime<Utc>) -> Result<Player, GameError> {
        let player = Player {
            id: Uuid::new_v4(),
            name: name.to_string(),
            balance: 0,
            created_at: now,
        };
        self.players.write().await.insert(player.id, player.clone());
        Ok(player)
    }

    async fn get_player(&self, id: Uuid) -> Result<Player, GameError> {
        self.players
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(GameError::PlayerNotFound(id))
    }

    async fn credit(&self, id: Uuid, amount: u64) -> Result<u64, GameError> {
        let mut players = self.players.write().await;
        let player = players.get_mut(&id).ok_or(GameError::PlayerNotFound(id))?;
        player.balance = player.balance.saturating_add(amount);
        Ok(player.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_game(user_id: Uuid) -> Game {
        Game::new(Uuid::new_v4(), user_id, Vec::new(), Utc::now())
    }

    #[tokio::test]
    async fn update_rejects_stale_versions() {
        let store = InMemoryGameStore::new();
        let inserted = store.insert_game(empty_game(Uuid::new_v4())).await.unwrap();
        assert_eq!(inserted.version, 1);

        let mut first = inserted.clone();
        first.current_level = 1;
        let saved = store.update_game(first).await.unwrap();
        assert_eq!(saved.version, 2);

        let mut second = inserted;
        second.current_level = 5;
        assert_eq!(
            store.update_game(second.clone()).await,
            Err(GameError::Conflict(second.id))
        );
        assert_eq!(store.get_game(second.id).await.unwrap().current_level, 1);
    }

    #[tokio::test]
    async fn finds_the_running_game_of_a_user() {
        let store = InMemoryGameStore::new();
        let user_id = Uuid::new_v4();
        assert!(store.in_progress_for_user(user_id).await.unwrap().is_none());

        let game = store.insert_game(empty_game(user_id)).await.unwrap();
        assert_eq!(
            store.in_progress_for_user(user_id).await.unwrap().map(|g| g.id),
            Some(game.id)
        );

        let mut finished = game.clone();
        finished.finished_at = Some(Utc::now());
        store.update_game(finished).await.unwrap();
        assert!(store.in_progress_for_user(user_id).await.unwrap().is_none());
        assert_eq!(store.games_for_user(user_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn insert_refuses_second_running_game_for_a_user() {
        let store = InMemoryGameStore::new();
        let user_id = Uuid::new_v4();
        let first = store.insert_game(empty_game(user_id)).await.unwrap();

        assert_eq!(
            store.insert_game(empty_game(user_id)).await.map(|g| g.id),
            Err(GameError::GameInProgress(first.id))
        );
        assert!(store.insert_game(empty_game(Uuid::new_v4())).await.is_ok());

        let mut finished = first;
        finished.finished_at = Some(Utc::now());
        store.update_game(finished).await.unwrap();
        assert!(store.insert_game(empty_game(user_id)).await.is_ok());
        assert_eq!(store.games_for_user(user_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn credit_accumulates_balance() {
        let store = InMemoryAccountStore::new();
        let player = store.create_player("Ann", Utc::now()).await.unwrap();

        assert_eq!(store.credit(player.id, 1_000).await.unwrap(), 1_000);
        assert_eq!(store.credit(player.id, 200).await.unwrap(), 1_200);
        assert_eq!(store.get_player(player.id).await.unwrap().balance, 1_200);

        let missing = Uuid::new_v4();
        assert_eq!(
            store.credit(missing, 1).await,
            Err(GameError::PlayerNotFound(missing))
        );
    }
}
