use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// Display letter of an answer variant, as shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
}

impl AnswerLetter {
    pub const ALL: [AnswerLetter; 4] = [
        AnswerLetter::A,
        AnswerLetter::B,
        AnswerLetter::C,
        AnswerLetter::D,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerLetter::A => "a",
            AnswerLetter::B => "b",
            AnswerLetter::C => "c",
            AnswerLetter::D => "d",
        }
    }

    /// Position of the letter in `ALL`, used to index the stored permutation.
    pub fn index(&self) -> usize {
        match self {
            AnswerLetter::A => 0,
            AnswerLetter::B => 1,
            AnswerLetter::C => 2,
            AnswerLetter::D => 3,
        }
    }
}

impl fmt::Display for AnswerLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnswerLetter {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "a" | "A" => Ok(AnswerLetter::A),
            "b" | "B" => Ok(AnswerLetter::B),
            "c" | "C" => Ok(AnswerLetter::C),
            "d" | "D" => Ok(AnswerLetter::D),
            other => Err(GameError::InvalidLetter(other.to_string())),
        }
    }
}
