use std::sync::Arc;
use std::time::{Instant, SystemTime};

use crate::config::Config;
use crate::services::quiz_session::QuizSessions;
use crate::store::UserStore;
use crate::words::WordStore;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    config: Arc<Config>,
    words: Arc<WordStore>,
    users: Arc<UserStore>,
    sessions: Arc<QuizSessions>,
}

impl AppState {
    pub fn new(config: Config, words: WordStore, users: UserStore) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            config: Arc::new(config),
            words: Arc::new(words),
            users: Arc::new(users),
            sessions: Arc::new(QuizSessions::new()),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn words(&self) -> Arc<WordStore> {
        Arc::clone(&self.words)
    }

    pub fn users(&self) -> Arc<UserStore> {
        Arc::clone(&self.users)
    }

    pub fn sessions(&self) -> Arc<QuizSessions> {
        Arc::clone(&self.sessions)
    }
}
