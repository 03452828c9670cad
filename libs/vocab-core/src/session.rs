//! Quiz session state machine.
//!
//! A session walks a fixed, pre-shuffled list of items exactly once:
//!
//! ```text
//! Idle --start--> Active --submit/advance (per item)--> Finished
//! ```
//!
//! The machine is clock-free and does no I/O. After each `submit` input
//! stays locked until the caller invokes `advance`, normally once the
//! feedback delay in [`AnswerOutcome::delay`] has elapsed. The caller
//! measures time and passes the elapsed duration to [`QuizSession::summary`].

use crate::deck::FAILED_WORDS_CATEGORY;
use crate::error::SessionError;
use crate::grading::grade;
use crate::types::{QuizDirection, SessionTiming, UserSettings, VocabItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Active,
    Finished,
}

/// What the view shows for the current question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub direction: QuizDirection,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plural_forms: Vec<String>,
    /// Zero-based position of this question.
    pub index: usize,
    pub total: usize,
    pub progress_percent: f64,
}

impl Prompt {
    /// Build the prompt for `item` shown in `direction`.
    pub fn for_item(
        item: &VocabItem,
        direction: QuizDirection,
        settings: &UserSettings,
        index: usize,
        total: usize,
    ) -> Self {
        let text = match direction {
            QuizDirection::SourceToTarget => item.display_term().to_string(),
            QuizDirection::TargetToSource => match item.gender.as_deref() {
                Some(gender) if !gender.trim().is_empty() => format!(
                    "{} ({})",
                    item.display_translation(),
                    gender.trim().to_lowercase()
                ),
                _ => item.display_translation().to_string(),
            },
        };
        let example = match direction {
            QuizDirection::SourceToTarget if settings.show_examples => item.example.clone(),
            _ => None,
        };
        Self {
            direction,
            text,
            example,
            plural_forms: item.plural_forms(),
            index,
            total,
            progress_percent: progress_percent(index, total),
        }
    }
}

fn progress_percent(index: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        index as f64 / total as f64 * 100.0
    }
}

/// A missed word to be reported to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    pub category: String,
    pub term: String,
    pub translation: String,
    pub gender: Option<String>,
    pub plural: Option<String>,
}

/// Result of a submitted answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub displayed_answer: String,
    /// Score after this answer.
    pub score: u32,
    /// Number of questions answered so far.
    pub answered: usize,
    /// How long feedback stays up before `advance`.
    #[serde(with = "duration_millis")]
    pub delay: Duration,
    /// Set when the answer was wrong.
    pub failure: Option<FailureReport>,
    /// Whether this was the last question.
    pub last: bool,
}

/// What follows an `advance`.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Question(Prompt),
    Finished,
}

/// Final result of a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub category: String,
    pub score: u32,
    pub total: usize,
    /// Elapsed seconds rounded to two decimals.
    pub time_secs: f64,
    pub finished_at: DateTime<Utc>,
}

/// Live state of one quiz run.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    items: Vec<VocabItem>,
    category: String,
    settings: UserSettings,
    timing: SessionTiming,
    direction: QuizDirection,
    phase: SessionPhase,
    index: usize,
    score: u32,
    locked: bool,
}

impl QuizSession {
    /// Create an idle session. The direction starts at the user's default.
    pub fn new(
        items: Vec<VocabItem>,
        category: impl Into<String>,
        settings: UserSettings,
        timing: SessionTiming,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            items,
            category: category.into(),
            settings,
            timing,
            direction: settings.default_mode,
            phase: SessionPhase::Idle,
            index: 0,
            score: 0,
            locked: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn direction(&self) -> QuizDirection {
        self.direction
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    /// Whether an answer may be submitted right now.
    pub fn input_enabled(&self) -> bool {
        self.phase == SessionPhase::Active && !self.locked
    }

    /// Failed-words drills are kept off the leaderboard.
    pub fn shows_leaderboard(&self) -> bool {
        self.category != FAILED_WORDS_CATEGORY
    }

    /// Begin the session and return the first prompt.
    pub fn start(&mut self) -> Result<Prompt, SessionError> {
        if self.phase != SessionPhase::Idle {
            return Err(SessionError::NotActive);
        }
        if self.items.is_empty() {
            return Err(SessionError::NoItems);
        }
        self.phase = SessionPhase::Active;
        self.current_prompt().ok_or(SessionError::NoItems)
    }

    /// Prompt for the question at the current index, if one is open.
    pub fn current_prompt(&self) -> Option<Prompt> {
        if self.phase != SessionPhase::Active {
            return None;
        }
        self.items.get(self.index).map(|item| {
            Prompt::for_item(item, self.direction, &self.settings, self.index, self.items.len())
        })
    }

    /// Grade an answer for the current question.
    ///
    /// Blank input is rejected without touching any state. On success the
    /// index and score move forward and input stays locked until `advance`.
    pub fn submit(&mut self, input: &str) -> Result<AnswerOutcome, SessionError> {
        if self.phase != SessionPhase::Active {
            return Err(SessionError::NotActive);
        }
        if self.locked {
            return Err(SessionError::InputLocked);
        }
        if input.trim().is_empty() {
            return Err(SessionError::EmptyAnswer);
        }
        let item = self.items.get(self.index).ok_or(SessionError::NotActive)?;

        let result = grade(item, self.direction, input, &self.settings);
        let failure = (!result.correct).then(|| FailureReport {
            category: self.category.clone(),
            term: item.term.clone(),
            translation: item.translation.clone(),
            gender: item.gender.clone(),
            plural: item.plural.clone(),
        });

        self.locked = true;
        if result.correct {
            self.score += 1;
        }
        self.index += 1;

        Ok(AnswerOutcome {
            correct: result.correct,
            displayed_answer: result.displayed_answer,
            score: self.score,
            answered: self.index,
            delay: self.timing.delay_after(result.correct, self.settings.speedrun),
            failure,
            last: self.index == self.items.len(),
        })
    }

    /// Move on after feedback: next prompt, or finish when the list is done.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        if self.phase != SessionPhase::Active || !self.locked {
            return Err(SessionError::NotActive);
        }
        self.locked = false;
        if self.index >= self.items.len() {
            self.phase = SessionPhase::Finished;
            return Ok(Advance::Finished);
        }
        self.current_prompt()
            .map(Advance::Question)
            .ok_or(SessionError::NotActive)
    }

    /// Switch direction without touching progress.
    ///
    /// Returns the current question redrawn in the new direction, or `None`
    /// while feedback for the previous answer is showing (the next prompt
    /// will use the new direction).
    pub fn set_direction(&mut self, direction: QuizDirection) -> Option<Prompt> {
        self.direction = direction;
        if self.locked {
            return None;
        }
        self.current_prompt()
    }

    /// Summary of a finished session, given the time since it started.
    pub fn summary(&self, elapsed: Duration) -> Option<SessionSummary> {
        if self.phase != SessionPhase::Finished {
            return None;
        }
        Some(SessionSummary {
            session_id: self.id,
            category: self.category.clone(),
            score: self.score,
            total: self.items.len(),
            time_secs: round_secs(elapsed),
            finished_at: Utc::now(),
        })
    }
}

/// Seconds rounded to two decimal places.
pub fn round_secs(elapsed: Duration) -> f64 {
    (elapsed.as_millis() as f64 / 10.0).round() / 100.0
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
