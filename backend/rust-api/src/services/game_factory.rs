use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

use crate::error::GameError;
use crate::models::game::Game;
use crate::models::game_question::GameQuestion;
use crate::models::prize::GameRules;
use crate::models::question::Question;

/// Read-only access to the question bank.
pub trait QuestionCatalog: Send + Sync {
    /// Every candidate question authored for `level`.
    fn questions_at_level(&self, level: usize) -> Vec<Question>;
}

/// Question bank held in memory, grouped by level.
#[derive(Debug, Default, Clone)]
pub struct InMemoryQuestionCatalog {
    by_level: BTreeMap<usize, Vec<Question>>,
}

impl InMemoryQuestionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog, rejecting any question that breaks the authoring
    /// contract for a ladder of `ladder_len` levels.
    pub fn from_questions(
        questions: impl IntoIterator<Item = Question>,
        ladder_len: usize,
    ) -> Result<Self, GameError> {
        let mut catalog = Self::new();
        for question in questions {
            question.check(ladder_len)?;
            catalog
                .by_level
                .entry(question.level)
                .or_default()
                .push(question);
        }
        Ok(catalog)
    }

    /// Loads a JSON array of questions.
    pub fn load_json(path: impl AsRef<Path>, ladder_len: usize) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read question bank {}", path.display()))?;
        let questions: Vec<Question> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse question bank {}", path.display()))?;

        let catalog = Self::from_questions(questions, ladder_len)?;
        tracing::info!(
            "Question bank loaded: {} questions across {} levels from {}",
            catalog.len(),
            catalog.by_level.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.by_level.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl QuestionCatalog for InMemoryQuestionCatalog {
    fn questions_at_level(&self, level: usize) -> Vec<Question> {
        self.by_level.get(&level).cloned().unwrap_or_default()
    }
}

/// Draws one question per ladder level and binds them into a new game.
///
/// Fails without building anything if a level has no candidates or a drawn
/// question is malformed. Nothing is written to the catalog.
pub fn create_game_for_user<C, R>(
    user_id: Uuid,
    catalog: &C,
    rules: &GameRules,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<Game, GameError>
where
    C: QuestionCatalog + ?Sized,
    R: Rng + ?Sized,
{
    let game_id = Uuid::new_v4();
    let mut game_questions = Vec::with_capacity(rules.prizes.len());

    for level in 0..rules.prizes.len() {
        let candidates = catalog.questions_at_level(level);
        let question = candidates
            .choose(rng)
            .cloned()
            .ok_or(GameError::InsufficientCatalog { level })?;

        question.check(rules.prizes.len())?;
        if question.level != level {
            return Err(GameError::InvalidQuestion(format!(
                "{}: catalog returned level {} question for level {}",
                question.id, question.level, level
            )));
        }
        game_questions.push(GameQuestion::new(game_id, question, rng)?);
    }

    tracing::info!(
        "Game {} assembled for user {} with {} questions",
        game_id,
        user_id,
        game_questions.len()
    );

    Ok(Game::new(game_id, user_id, game_questions, now))
}
