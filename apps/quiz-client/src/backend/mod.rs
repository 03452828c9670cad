//! Backend collaborator used by the quiz controller.

mod http;

pub use http::HttpBackend;

use async_trait::async_trait;
use serde::Serialize;
use vocab_core::{FailureReport, LeaderboardEntry, ProgressMap, UserSettings, VocabItem};

/// Backend errors.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),
}

/// A finished session's result, sent to both the score and leaderboard
/// endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub category: String,
    pub score: u32,
    pub time: f64,
}

/// Everything the quiz needs from the outside world.
#[async_trait]
pub trait QuizBackend: Send + Sync {
    async fn get_settings(&self) -> Result<UserSettings, BackendError>;

    async fn get_progress(&self) -> Result<ProgressMap, BackendError>;

    async fn get_failed_words_count(&self) -> Result<usize, BackendError>;

    async fn get_failed_words(&self) -> Result<Vec<VocabItem>, BackendError>;

    /// Static vocabulary lookup for one category of a level.
    async fn get_vocab_category(
        &self,
        level: &str,
        category: &str,
    ) -> Result<Vec<VocabItem>, BackendError>;

    async fn report_failure(&self, failure: &FailureReport) -> Result<(), BackendError>;

    async fn save_score(&self, report: &ScoreReport) -> Result<(), BackendError>;

    async fn save_leaderboard_entry(&self, report: &ScoreReport) -> Result<(), BackendError>;

    async fn get_leaderboard(&self, category: &str) -> Result<Vec<LeaderboardEntry>, BackendError>;
}
