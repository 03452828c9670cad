//! Core types for the vocabulary quiz.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Term shown for a failed word the backend stored without one.
pub const UNKNOWN_TERM: &str = "(unknown)";

/// Translation shown for a failed word the backend stored without one.
pub const MISSING_TRANSLATION: &str = "(missing)";

/// One drill entry.
///
/// `term` and `translation` may hold several `/`-separated alternates; the
/// first alternate is the one displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabItem {
    #[serde(rename = "german", alias = "term")]
    pub term: String,
    #[serde(rename = "english", alias = "translation")]
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl VocabItem {
    /// Create an item with only the required fields set.
    pub fn new(term: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            translation: translation.into(),
            gender: None,
            plural: None,
            example: None,
        }
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_plural(mut self, plural: impl Into<String>) -> Self {
        self.plural = Some(plural.into());
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// First non-empty alternate of the term, trimmed.
    pub fn display_term(&self) -> &str {
        first_alternate(&self.term)
    }

    /// First non-empty alternate of the translation, trimmed.
    pub fn display_translation(&self) -> &str {
        first_alternate(&self.translation)
    }

    /// Plural alternates, trimmed, empty ones dropped.
    pub fn plural_forms(&self) -> Vec<String> {
        self.plural
            .as_deref()
            .map(split_alternates)
            .unwrap_or_default()
    }
}

/// Split a `/`-separated field into trimmed, non-empty alternates.
pub fn split_alternates(field: &str) -> Vec<String> {
    field
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn first_alternate(field: &str) -> &str {
    field
        .split('/')
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

/// A word the user previously got wrong, as stored by the backend.
///
/// Every field may be missing; [`FailedWord::into_item`] fills in
/// placeholders so the drill can still run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailedWord {
    #[serde(default)]
    pub german: Option<String>,
    #[serde(default)]
    pub english: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub plural: Option<String>,
}

impl FailedWord {
    pub fn into_item(self) -> VocabItem {
        VocabItem {
            term: non_empty(self.german).unwrap_or_else(|| UNKNOWN_TERM.to_string()),
            translation: non_empty(self.english)
                .unwrap_or_else(|| MISSING_TRANSLATION.to_string()),
            gender: non_empty(self.gender),
            plural: non_empty(self.plural),
            example: None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Which language is prompted and which is expected as the answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuizDirection {
    /// Prompt with the term, expect the translation.
    #[default]
    #[serde(rename = "de-to-en", alias = "source_to_target")]
    SourceToTarget,
    /// Prompt with the translation, expect the term.
    #[serde(rename = "en-to-de", alias = "target_to_source")]
    TargetToSource,
}

impl QuizDirection {
    /// The other direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::SourceToTarget => Self::TargetToSource,
            Self::TargetToSource => Self::SourceToTarget,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceToTarget => "de-to-en",
            Self::TargetToSource => "en-to-de",
        }
    }

    /// Parse a stored direction name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "de-to-en" | "source_to_target" => Some(Self::SourceToTarget),
            "en-to-de" | "target_to_source" => Some(Self::TargetToSource),
            _ => None,
        }
    }
}

/// Per-user quiz settings, loaded once per session.
///
/// The backend returns its whole settings row, so any column may be missing
/// or `null`; either way the field takes its default. An empty object (a
/// logged-out user) is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SettingsRow")]
pub struct UserSettings {
    pub sound: bool,
    pub show_examples: bool,
    pub plurals: bool,
    pub strict: bool,
    pub speedrun: bool,
    pub default_mode: QuizDirection,
}

/// Settings as stored by the backend, longer column names included.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsRow {
    #[serde(alias = "sound_enabled")]
    sound: Option<bool>,
    show_examples: Option<bool>,
    plurals: Option<bool>,
    #[serde(alias = "strict_articles")]
    strict: Option<bool>,
    #[serde(alias = "speedrun_enabled")]
    speedrun: Option<bool>,
    default_mode: Option<String>,
}

impl From<SettingsRow> for UserSettings {
    fn from(row: SettingsRow) -> Self {
        let defaults = Self::default();
        Self {
            sound: row.sound.unwrap_or(defaults.sound),
            show_examples: row.show_examples.unwrap_or(defaults.show_examples),
            plurals: row.plurals.unwrap_or(defaults.plurals),
            strict: row.strict.unwrap_or(defaults.strict),
            speedrun: row.speedrun.unwrap_or(defaults.speedrun),
            default_mode: row
                .default_mode
                .as_deref()
                .and_then(QuizDirection::from_name)
                .unwrap_or(defaults.default_mode),
        }
    }
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            sound: true,
            show_examples: false,
            plurals: false,
            strict: false,
            speedrun: false,
            default_mode: QuizDirection::default(),
        }
    }
}

/// Time constants for the question lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    /// Pause after a correct answer before the next question.
    pub correct_delay: Duration,
    /// Pause after an incorrect answer, long enough to read the correction.
    pub incorrect_delay: Duration,
    /// Refresh cadence of the live elapsed-time display.
    pub tick: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            correct_delay: Duration::from_millis(1000),
            incorrect_delay: Duration::from_millis(3000),
            tick: Duration::from_millis(100),
        }
    }
}

impl SessionTiming {
    /// Delay before advancing after an answer. Speedrun mode skips it.
    pub fn delay_after(&self, correct: bool, speedrun: bool) -> Duration {
        if speedrun {
            Duration::ZERO
        } else if correct {
            self.correct_delay
        } else {
            self.incorrect_delay
        }
    }
}

/// One leaderboard row, pre-sorted by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    pub time: f64,
}
