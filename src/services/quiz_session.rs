use std::collections::HashMap;

use parking_lot::Mutex;
use serde::Serialize;

use crate::services::quiz::{AnswerOutcome, QuizError, QuizItem, SCORE_REWARD};
use crate::words::{Difficulty, WordEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    AwaitingDifficulty,
    AwaitingAnswer(usize),
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuizView {
    AwaitingDifficulty,
    AwaitingAnswer {
        difficulty: Difficulty,
        index: usize,
        total: usize,
        word: String,
        options: Vec<String>,
        score: u64,
    },
    Completed {
        difficulty: Difficulty,
        total: usize,
        score: u64,
    },
}

/// Progress before an answer was recorded, used to undo it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerCheckpoint {
    round: u64,
    index: usize,
    score: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAnswer {
    pub outcome: AnswerOutcome,
    pub next: QuizView,
    pub checkpoint: AnswerCheckpoint,
}

#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    difficulty: Option<Difficulty>,
    items: Vec<QuizItem>,
    index: usize,
    score: u64,
    round: u64,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting over discards any previous progress.
    pub fn start(&mut self, difficulty: Difficulty, items: Vec<QuizItem>) {
        self.difficulty = Some(difficulty);
        self.items = items;
        self.index = 0;
        self.score = 0;
        self.round = self.round.wrapping_add(1);
    }

    pub fn phase(&self) -> QuizPhase {
        match self.difficulty {
            None => QuizPhase::AwaitingDifficulty,
            Some(_) if self.index < self.items.len() => QuizPhase::AwaitingAnswer(self.index),
            Some(_) => QuizPhase::Completed,
        }
    }

    pub fn current(&self) -> Option<&QuizItem> {
        match self.phase() {
            QuizPhase::AwaitingAnswer(index) => self.items.get(index),
            _ => None,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn checkpoint(&self) -> AnswerCheckpoint {
        AnswerCheckpoint {
            round: self.round,
            index: self.index,
            score: self.score,
        }
    }

    /// Undoes the answer taken at `checkpoint`. Does nothing once the session
    /// was restarted or has moved past the following question.
    pub fn restore(&mut self, checkpoint: AnswerCheckpoint) -> bool {
        if self.round != checkpoint.round || self.index != checkpoint.index + 1 {
            return false;
        }
        self.index = checkpoint.index;
        self.score = checkpoint.score;
        true
    }

    /// Grades the current question and moves to the next one.
    pub fn answer(&mut self, user_answer: &str) -> Result<AnswerOutcome, QuizError> {
        let item = self.current().ok_or(QuizError::NotAwaitingAnswer)?;
        let entry = WordEntry::new(item.word.clone(), item.meaning.clone());
        let outcome = crate::services::quiz::grade(&entry, user_answer);

        if outcome.correct {
            self.score = self.score.saturating_add(SCORE_REWARD);
        }
        self.index += 1;
        Ok(outcome)
    }

    pub fn view(&self) -> QuizView {
        let Some(difficulty) = self.difficulty else {
            return QuizView::AwaitingDifficulty;
        };

        match self.current() {
            Some(item) => QuizView::AwaitingAnswer {
                difficulty,
                index: self.index,
                total: self.items.len(),
                word: item.word.clone(),
                options: item.options.clone(),
                score: self.score,
            },
            None => QuizView::Completed {
                difficulty,
                total: self.items.len(),
                score: self.score,
            },
        }
    }
}

/// Quiz sessions keyed by user id. The lock is never held across an await.
#[derive(Debug, Default)]
pub struct QuizSessions {
    inner: Mutex<HashMap<String, QuizSession>>,
}

impl QuizSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, user_id: &str, difficulty: Difficulty, items: Vec<QuizItem>) -> QuizView {
        let mut sessions = self.inner.lock();
        let session = sessions.entry(user_id.to_string()).or_default();
        session.start(difficulty, items);
        session.view()
    }

    pub fn view(&self, user_id: &str) -> QuizView {
        self.inner
            .lock()
            .get(user_id)
            .map(QuizSession::view)
            .unwrap_or(QuizView::AwaitingDifficulty)
    }

    pub fn answer(&self, user_id: &str, user_answer: &str) -> Result<SessionAnswer, QuizError> {
        let mut sessions = self.inner.lock();
        let session = sessions
            .get_mut(user_id)
            .ok_or(QuizError::NotAwaitingAnswer)?;
        let checkpoint = session.checkpoint();
        let outcome = session.answer(user_answer)?;
        Ok(SessionAnswer {
            outcome,
            next: session.view(),
            checkpoint,
        })
    }

    pub fn rollback(&self, user_id: &str, checkpoint: AnswerCheckpoint) -> bool {
        self.inner
            .lock()
            .get_mut(user_id)
            .is_some_and(|session| session.restore(checkpoint))
    }

    pub fn clear(&self, user_id: &str) {
        self.inner.lock().remove(user_id);
    }
}
