use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::GameError;
use crate::models::game_question::GameQuestion;
use crate::models::hint::{HintKind, HintPayload};
use crate::models::letter::AnswerLetter;

/// Fixed part of the friend's message; the named letter follows it.
pub const FRIEND_CALL_PREFIX: &str = "Your friend believes the answer is ";

// Share of the vote the correct letter draws. The lower bound keeps every
// wrong letter at or below it, since they split at most 100 - 50.
const AUDIENCE_CORRECT_MIN: u8 = 50;
const AUDIENCE_CORRECT_MAX: u8 = 85;

/// Letter -> answer text as shown to the player, read from the stored
/// permutation.
pub fn build_variants(game_question: &GameQuestion) -> BTreeMap<AnswerLetter, &str> {
    let question = game_question.question();
    AnswerLetter::ALL
        .into_iter()
        .filter_map(|letter| {
            question
                .answer(game_question.slot_for(letter))
                .map(|text| (letter, text))
        })
        .collect()
}

pub fn correct_answer_key(game_question: &GameQuestion) -> AnswerLetter {
    game_question.correct_answer_key()
}

pub fn is_answer_correct(game_question: &GameQuestion, letter: AnswerLetter) -> bool {
    letter == correct_answer_key(game_question)
}

/// Vote percentages for the four letters. They sum to 100 and the correct
/// letter always has the largest share (possibly tied).
pub fn audience_distribution<R: Rng + ?Sized>(
    correct: AnswerLetter,
    rng: &mut R,
) -> BTreeMap<AnswerLetter, u8> {
    let correct_share = rng.random_range(AUDIENCE_CORRECT_MIN..=AUDIENCE_CORRECT_MAX);
    let rest = 100 - correct_share;

    let first_cut = rng.random_range(0..=rest);
    let second_cut = rng.random_range(0..=rest);
    let (low, high) = (first_cut.min(second_cut), first_cut.max(second_cut));
    let wrong_shares = [low, high - low, rest - high];

    let mut distribution = BTreeMap::new();
    distribution.insert(correct, correct_share);
    for (letter, share) in AnswerLetter::ALL
        .into_iter()
        .filter(|letter| *letter != correct)
        .zip(wrong_shares)
    {
        distribution.insert(letter, share);
    }
    distribution
}

pub fn friend_call_message(letter: AnswerLetter) -> String {
    format!("{}{}", FRIEND_CALL_PREFIX, letter)
}

pub fn add_audience_help<R: Rng + ?Sized>(
    game_question: &mut GameQuestion,
    rng: &mut R,
) -> Result<(), GameError> {
    ensure_unused(game_question, HintKind::AudienceHelp)?;

    let distribution = audience_distribution(game_question.correct_answer_key(), rng);
    tracing::debug!(
        game_id = %game_question.game_id(),
        ?distribution,
        "Audience help generated"
    );
    game_question.insert_hint(HintKind::AudienceHelp, HintPayload::Audience(distribution))
}

/// Keeps the correct letter and one wrong letter picked uniformly.
pub fn add_fifty_fifty<R: Rng + ?Sized>(
    game_question: &mut GameQuestion,
    rng: &mut R,
) -> Result<(), GameError> {
    ensure_unused(game_question, HintKind::FiftyFifty)?;

    let correct = game_question.correct_answer_key();
    let wrong: Vec<AnswerLetter> = AnswerLetter::ALL
        .into_iter()
        .filter(|letter| *letter != correct)
        .collect();

    let mut survivors = BTreeSet::from([correct]);
    if let Some(other) = wrong.choose(rng) {
        survivors.insert(*other);
    }

    tracing::debug!(
        game_id = %game_question.game_id(),
        ?survivors,
        "Fifty-fifty generated"
    );
    game_question.insert_hint(HintKind::FiftyFifty, HintPayload::FiftyFifty(survivors))
}

/// The friend names any of the four letters with equal odds; the guess may be
/// wrong.
pub fn add_friend_call<R: Rng + ?Sized>(
    game_question: &mut GameQuestion,
    rng: &mut R,
) -> Result<(), GameError> {
    ensure_unused(game_question, HintKind::FriendCall)?;

    let correct = game_question.correct_answer_key();
    let guess = AnswerLetter::ALL.choose(rng).copied().unwrap_or(correct);
    let message = friend_call_message(guess);

    tracing::debug!(game_id = %game_question.game_id(), %guess, "Friend call generated");
    game_question.insert_hint(HintKind::FriendCall, HintPayload::FriendCall(message))
}

fn ensure_unused(game_question: &GameQuestion, kind: HintKind) -> Result<(), GameError> {
    if game_question.help_hash().contains_key(&kind) {
        tracing::warn!(
            game_id = %game_question.game_id(),
            hint = %kind,
            "Hint requested twice for the same question"
        );
        return Err(GameError::HintAlreadyUsed(kind));
    }
    Ok(())
}
