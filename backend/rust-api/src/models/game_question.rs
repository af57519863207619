use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::hint::{HelpHash, HintKind, HintPayload};
use super::letter::AnswerLetter;
use super::question::Question;
use crate::error::GameError;
use crate::services::hint_service;

/// A catalog question bound into one game.
///
/// The letter -> slot permutation is fixed when the binding is created, so the
/// variants a player sees (and the correct letter) never move between reads.
/// The help hash only ever grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameQuestion {
    id: Uuid,
    game_id: Uuid,
    question: Question,
    slots: [u8; 4],
    #[serde(skip)]
    correct_letter: AnswerLetter,
    help_hash: HelpHash,
}

impl GameQuestion {
    /// Binds `question` into `game_id` with a freshly shuffled permutation.
    ///
    /// Fails if the question's correct slot is not one of the four slots.
    pub fn new<R: Rng + ?Sized>(
        game_id: Uuid,
        question: Question,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        let mut slots = [1, 2, 3, 4];
        slots.shuffle(rng);
        Self::bind(game_id, question, slots)
    }

    /// Binds `question` with a known permutation, `slots[i]` being the slot
    /// shown under the i-th letter.
    pub fn with_permutation(
        game_id: Uuid,
        question: Question,
        slots: [u8; 4],
    ) -> Result<Self, GameError> {
        let mut seen = [false; 4];
        for slot in slots {
            let idx = usize::from(slot)
                .checked_sub(1)
                .filter(|i| *i < 4)
                .ok_or(GameError::InvalidPermutation)?;
            if std::mem::replace(&mut seen[idx], true) {
                return Err(GameError::InvalidPermutation);
            }
        }

        Self::bind(game_id, question, slots)
    }

    fn bind(game_id: Uuid, question: Question, slots: [u8; 4]) -> Result<Self, GameError> {
        let correct_letter = AnswerLetter::ALL
            .into_iter()
            .find(|letter| slots[letter.index()] == question.correct_slot)
            .ok_or_else(|| {
                GameError::InvalidQuestion(format!(
                    "{}: correct slot {} is not one of the answer slots",
                    question.id, question.correct_slot
                ))
            })?;

        Ok(Self {
            id: Uuid::new_v4(),
            game_id,
            question,
            slots,
            correct_letter,
            help_hash: HelpHash::new(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn game_id(&self) -> Uuid {
        self.game_id
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn text(&self) -> &str {
        &self.question.text
    }

    pub fn level(&self) -> usize {
        self.question.level
    }

    /// Answer slot (1..=4) displayed under `letter`.
    pub fn slot_for(&self, letter: AnswerLetter) -> u8 {
        self.slots[letter.index()]
    }

    pub fn help_hash(&self) -> &HelpHash {
        &self.help_hash
    }

    pub fn variants(&self) -> BTreeMap<AnswerLetter, &str> {
        hint_service::build_variants(self)
    }

    /// Resolved once at binding time.
    pub fn correct_answer_key(&self) -> AnswerLetter {
        self.correct_letter
    }

    pub fn answer_correct(&self, letter: AnswerLetter) -> bool {
        hint_service::is_answer_correct(self, letter)
    }

    /// Stores a hint payload. A hint name is never overwritten.
    pub(crate) fn insert_hint(
        &mut self,
        kind: HintKind,
        payload: HintPayload,
    ) -> Result<(), GameError> {
        if self.help_hash.contains_key(&kind) {
            return Err(GameError::HintAlreadyUsed(kind));
        }
        self.help_hash.insert(kind, payload);
        Ok(())
    }
}
