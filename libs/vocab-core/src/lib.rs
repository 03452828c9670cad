//! Core vocabulary quiz library shared by quiz front-ends.
//!
//! Provides:
//! - Text normalization for answer comparison
//! - Answer grading against `/`-separated alternates
//! - The quiz session state machine
//! - Vocabulary file parsing and deck assembly
//! - Category progress aggregation

pub mod deck;
pub mod error;
pub mod grading;
pub mod normalize;
pub mod parser;
pub mod progress;
pub mod session;
pub mod types;

pub use error::{ParseError, Result, SessionError};
pub use grading::{grade, GradeResult};
pub use parser::parse;
pub use progress::{CategoryGroups, MasteryTier, ProgressBar, ProgressMap};
pub use session::{
    Advance, AnswerOutcome, FailureReport, Prompt, QuizSession, SessionPhase, SessionSummary,
};
pub use types::{
    FailedWord, LeaderboardEntry, QuizDirection, SessionTiming, UserSettings, VocabItem,
};
