use std::collections::HashSet;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::store::{StoreError, UserRecord, UserStore};
use crate::words::{WordEntry, WordStore};

pub const COIN_REWARD: u64 = 1;
pub const SCORE_REWARD: u64 = 100;
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizItem {
    pub word: String,
    pub meaning: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("unknown word: {0}")]
    UnknownWord(String),
    #[error("no quiz in progress")]
    NotAwaitingAnswer,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Returns a shuffled copy; the source tier is never reordered.
pub fn shuffled_batch<R: Rng + ?Sized>(words: &[WordEntry], rng: &mut R) -> Vec<WordEntry> {
    let mut batch = words.to_vec();
    batch.shuffle(rng);
    batch
}

/// Correct meaning plus up to three distinct distractors taken from the
/// rest of the same batch, in random order.
pub fn build_options<R: Rng + ?Sized>(batch: &[WordEntry], index: usize, rng: &mut R) -> Vec<String> {
    let Some(target) = batch.get(index) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let distractors: Vec<&str> = batch
        .iter()
        .enumerate()
        .filter(|(pos, _)| *pos != index)
        .map(|(_, entry)| entry.meaning.as_str())
        .filter(|meaning| *meaning != target.meaning && seen.insert(*meaning))
        .collect();

    let mut options: Vec<String> = distractors
        .choose_multiple(rng, OPTION_COUNT - 1)
        .map(|meaning| meaning.to_string())
        .collect();
    options.push(target.meaning.clone());
    options.shuffle(rng);
    options
}

pub fn build_quiz<R: Rng + ?Sized>(words: &[WordEntry], rng: &mut R) -> Vec<QuizItem> {
    let batch = shuffled_batch(words, rng);
    (0..batch.len())
        .map(|index| {
            let options = build_options(&batch, index, rng);
            let entry = &batch[index];
            QuizItem {
                word: entry.word.clone(),
                meaning: entry.meaning.clone(),
                options,
            }
        })
        .collect()
}

pub fn grade(entry: &WordEntry, answer: &str) -> AnswerOutcome {
    AnswerOutcome {
        correct: entry.meaning == answer,
        correct_answer: entry.meaning.clone(),
    }
}

pub fn apply_reward(record: &mut UserRecord) {
    record.coins = record.coins.saturating_add(COIN_REWARD);
    record.score = record.score.saturating_add(SCORE_REWARD);
}

pub async fn reward_user(users: &UserStore, user_id: &str) -> Result<(), QuizError> {
    users
        .update::<_, QuizError, _>(user_id, |record| {
            apply_reward(record);
            Ok(())
        })
        .await?;
    tracing::debug!(user_id, "quiz reward applied");
    Ok(())
}

pub async fn check_answer(
    words: &WordStore,
    users: &UserStore,
    user_id: &str,
    word: &str,
    answer: &str,
) -> Result<AnswerOutcome, QuizError> {
    let entry = words
        .find(word)
        .ok_or_else(|| QuizError::UnknownWord(word.to_string()))?;

    let outcome = grade(entry, answer);
    if outcome.correct {
        reward_user(users, user_id).await?;
    }
    Ok(outcome)
}
