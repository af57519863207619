use thiserror::Error;
use uuid::Uuid;

use crate::models::hint::HintKind;

/// Failures raised by the game core and the services wrapping it.
///
/// Every variant is scoped to a single game or request; none of them is
/// fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("no questions available for level {level}")]
    InsufficientCatalog { level: usize },

    #[error("game is already finished")]
    FinishedGame,

    #[error("invalid answer letter '{0}', expected one of a, b, c, d")]
    InvalidLetter(String),

    #[error("hint '{0}' has already been used")]
    HintAlreadyUsed(HintKind),

    #[error("invalid question: {0}")]
    InvalidQuestion(String),

    #[error("invalid prize table: {0}")]
    InvalidPrizeTable(String),

    #[error("time limit must be positive, got {0} minutes")]
    InvalidTimeLimit(i64),

    #[error("answer permutation must map a, b, c, d onto slots 1..=4 exactly once")]
    InvalidPermutation,

    #[error("game {0} not found")]
    GameNotFound(Uuid),

    #[error("player {0} not found")]
    PlayerNotFound(Uuid),

    #[error("game {0} was modified concurrently")]
    Conflict(Uuid),

    #[error("player already has game {0} in progress")]
    GameInProgress(Uuid),
}
