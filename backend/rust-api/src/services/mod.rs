use crate::config::Config;
use crate::models::prize::GameRules;
use crate::utils::time::Clock;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};

use game_factory::QuestionCatalog;
use store::{AccountStore, GameStore};

pub struct AppState {
    pub config: Config,
    pub rules: Arc<GameRules>,
    pub catalog: Arc<dyn QuestionCatalog>,
    pub games: Arc<dyn GameStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub clock: Arc<dyn Clock>,
    pub rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    pub fn new(
        config: Config,
        rules: GameRules,
        catalog: Arc<dyn QuestionCatalog>,
        games: Arc<dyn GameStore>,
        accounts: Arc<dyn AccountStore>,
        clock: Arc<dyn Clock>,
        rng: StdRng,
    ) -> Self {
        tracing::info!(
            "Game rules: {} levels, fireproof at {:?}, time limit {} min",
            rules.prizes.len(),
            rules.prizes.fireproof_levels(),
            rules.time_limit.num_minutes()
        );

        Self {
            config,
            rules: Arc::new(rules),
            catalog,
            games,
            accounts,
            clock,
            rng: Arc::new(Mutex::new(rng)),
        }
    }
}

pub mod game_factory;
pub mod game_service;
pub mod hint_service;
pub mod store;
