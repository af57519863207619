use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::GameError;

/// Number of answer slots every question carries.
pub const ANSWER_SLOTS: usize = 4;

fn default_correct_slot() -> u8 {
    1
}

/// Catalog question. Answer slots are keyed 1..=4; `correct_slot` names the
/// one designated correct when the question was authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Question {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub level: usize,
    #[validate(length(min = 1, message = "question text must not be empty"))]
    pub text: String,
    pub answers: [String; ANSWER_SLOTS],
    #[serde(default = "default_correct_slot")]
    #[validate(range(min = 1, max = 4, message = "correct slot must be within 1..=4"))]
    pub correct_slot: u8,
}

impl Question {
    /// Builds a question whose first slot is the correct one.
    pub fn new(level: usize, text: impl Into<String>, answers: [&str; ANSWER_SLOTS]) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            text: text.into(),
            answers: answers.map(str::to_string),
            correct_slot: 1,
        }
    }

    pub fn with_correct_slot(mut self, slot: u8) -> Self {
        self.correct_slot = slot;
        self
    }

    /// Answer text for a 1-based slot.
    pub fn answer(&self, slot: u8) -> Option<&str> {
        let idx = usize::from(slot).checked_sub(1)?;
        self.answers.get(idx).map(String::as_str)
    }

    /// Checks the authoring contract against a ladder of `ladder_len` levels.
    pub fn check(&self, ladder_len: usize) -> Result<(), GameError> {
        self.validate()
            .map_err(|e| GameError::InvalidQuestion(format!("{}: {}", self.id, e)))?;

        if self.level >= ladder_len {
            return Err(GameError::InvalidQuestion(format!(
                "{}: level {} is outside the ladder 0..{}",
                self.id, self.level, ladder_len
            )));
        }

        if self.answers.iter().any(|a| a.trim().is_empty()) {
            return Err(GameError::InvalidQuestion(format!(
                "{}: every answer slot must have text",
                self.id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_is_one_based() {
        let q = Question::new(3, "Capital of France?", ["Paris", "Rome", "Oslo", "Bern"]);
        assert_eq!(q.answer(1), Some("Paris"));
        assert_eq!(q.answer(4), Some("Bern"));
        assert_eq!(q.answer(0), None);
        assert_eq!(q.answer(5), None);
    }

    #[test]
    fn check_rejects_broken_questions() {
        let ok = Question::new(0, "2 + 2?", ["4", "3", "5", "22"]);
        assert!(ok.check(15).is_ok());

        let out_of_ladder = Question::new(15, "2 + 2?", ["4", "3", "5", "22"]);
        assert!(matches!(
            out_of_ladder.check(15),
            Err(GameError::InvalidQuestion(_))
        ));

        let bad_slot = ok.clone().with_correct_slot(5);
        assert!(bad_slot.check(15).is_err());

        let empty_text = Question::new(0, "", ["4", "3", "5", "22"]);
        assert!(empty_text.check(15).is_err());

        let blank_answer = Question::new(0, "2 + 2?", ["4", " ", "5", "22"]);
        assert!(blank_answer.check(15).is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let raw = r#"{"level": 2, "text": "Q", "answers": ["w", "x", "y", "z"]}"#;
        let q: Question = serde_json::from_str(raw).unwrap();
        assert_eq!(q.correct_slot, 1);
        assert_eq!(q.level, 2);
    }
}
