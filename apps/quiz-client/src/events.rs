//! Events emitted by the quiz controller for a view layer to render.

use serde::Serialize;
use uuid::Uuid;
use vocab_core::{LeaderboardEntry, ProgressBar, Prompt, QuizDirection, SessionSummary};

/// Event emitted to the view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuizEvent {
    /// Home screen data after a (re)load.
    Home {
        bars: Vec<ProgressBar>,
        failed_words_available: bool,
        direction: QuizDirection,
    },
    ProgressUpdated {
        bars: Vec<ProgressBar>,
    },
    /// A session could not be started.
    LoadFailed {
        reason: String,
    },
    SessionStarted {
        session_id: Uuid,
        category: String,
        total: usize,
    },
    Question {
        prompt: Prompt,
    },
    /// The answer was blank; input stays open.
    AnswerRejected {
        reason: String,
    },
    Feedback {
        correct: bool,
        /// Accepted answer to show after a miss.
        displayed_answer: String,
        score: u32,
        answered: usize,
        play_sound: bool,
    },
    /// Live elapsed time, display only.
    TimerTick {
        elapsed_secs: f64,
    },
    DirectionChanged {
        direction: QuizDirection,
    },
    Results {
        summary: SessionSummary,
        shows_leaderboard: bool,
    },
    Leaderboard {
        category: String,
        rows: Vec<LeaderboardEntry>,
    },
    /// Result handling for the session is done.
    SessionClosed {
        session_id: Uuid,
    },
    ReturnedHome {
        bars: Vec<ProgressBar>,
    },
}
