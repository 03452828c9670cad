//! Error types for vocab-core.

use thiserror::Error;

/// Result type alias using ParseError.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while reading a vocabulary file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid vocabulary JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("missing term in entry {index}")]
    MissingTerm { index: usize },

    #[error("missing translation in entry {index}")]
    MissingTranslation { index: usize },
}

/// Errors returned by the quiz session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("answer is empty")]
    EmptyAnswer,

    #[error("answer already submitted for this question")]
    InputLocked,

    #[error("session is not active")]
    NotActive,

    #[error("session has no items")]
    NoItems,
}
