use chrono::Duration;
use serde::Deserialize;
use std::env;

use crate::error::GameError;
use crate::models::prize::{
    GameRules, PrizeTable, DEFAULT_FIREPROOF_LEVELS, DEFAULT_PRIZES, DEFAULT_TIME_LIMIT_MINUTES,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    pub time_limit_minutes: i64,
    pub prizes: Vec<u64>,
    pub fireproof_levels: Vec<usize>,
    pub question_bank_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8081".to_string(),
            time_limit_minutes: DEFAULT_TIME_LIMIT_MINUTES,
            prizes: DEFAULT_PRIZES.to_vec(),
            fireproof_levels: DEFAULT_FIREPROOF_LEVELS.to_vec(),
            question_bank_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            // Override with environment variables (prefix: APP_)
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("game.prizes")
                    .with_list_parse_key("game.fireproof_levels"),
            )
            .build()?;

        let defaults = Config::default();

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or(defaults.bind_addr);

        let time_limit_minutes = match settings.get_int("game.time_limit_minutes") {
            Ok(minutes) => minutes,
            Err(config::ConfigError::NotFound(_)) => env::var("GAME_TIME_LIMIT_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(defaults.time_limit_minutes),
            Err(e) => return Err(e),
        };

        let prizes = match settings.get::<Vec<u64>>("game.prizes") {
            Ok(prizes) => prizes,
            Err(config::ConfigError::NotFound(_)) => defaults.prizes,
            Err(e) => return Err(e),
        };

        let fireproof_levels = match settings.get::<Vec<usize>>("game.fireproof_levels") {
            Ok(levels) => levels,
            Err(config::ConfigError::NotFound(_)) => defaults.fireproof_levels,
            Err(e) => return Err(e),
        };

        let question_bank_path = settings
            .get_string("catalog.path")
            .or_else(|_| env::var("QUESTION_BANK_PATH"))
            .ok();

        Ok(Config {
            bind_addr,
            time_limit_minutes,
            prizes,
            fireproof_levels,
            question_bank_path,
        })
    }

    /// Validated prize table and time limit.
    pub fn game_rules(&self) -> Result<GameRules, GameError> {
        if self.time_limit_minutes <= 0 {
            return Err(GameError::InvalidTimeLimit(self.time_limit_minutes));
        }

        let prizes = PrizeTable::new(self.prizes.clone(), self.fireproof_levels.clone())?;
        Ok(GameRules::new(
            prizes,
            Duration::minutes(self.time_limit_minutes),
        ))
    }
}
