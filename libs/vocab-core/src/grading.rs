//! Answer grading for typed answers.

use crate::normalize::{clean, fold_diacritics, strip_article, strip_infinitive_marker};
use crate::types::{QuizDirection, UserSettings, VocabItem};
use serde::{Deserialize, Serialize};

/// Result of grading a typed answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeResult {
    /// Whether the answer is accepted.
    pub correct: bool,
    /// The first accepted answer, shown to the user after a miss.
    pub displayed_answer: String,
}

/// The raw field an answer is graded against.
///
/// In plural mode the plural replaces the singular entirely when the item
/// has one; it is never accepted in addition to it.
pub fn expected_field<'a>(
    item: &'a VocabItem,
    direction: QuizDirection,
    settings: &UserSettings,
) -> &'a str {
    match direction {
        QuizDirection::SourceToTarget => &item.translation,
        QuizDirection::TargetToSource => match item.plural.as_deref() {
            Some(plural) if settings.plurals && !plural.trim().is_empty() => plural,
            _ => &item.term,
        },
    }
}

/// Cleaned candidate answers, in the order they appear in the item.
pub fn candidates(
    item: &VocabItem,
    direction: QuizDirection,
    settings: &UserSettings,
) -> Vec<String> {
    clean(expected_field(item, direction, settings))
        .split('/')
        .map(|candidate| prepare(candidate, direction))
        .filter(|candidate| !candidate.is_empty())
        .collect()
}

/// Grade `input` against `item` in the given direction.
///
/// Empty input must be rejected by the caller before grading; here it is
/// simply never correct. An item without an expected answer grades as
/// incorrect with an empty displayed answer.
pub fn grade(
    item: &VocabItem,
    direction: QuizDirection,
    input: &str,
    settings: &UserSettings,
) -> GradeResult {
    let candidates = candidates(item, direction, settings);
    let answer = prepare(&clean(input), direction);
    let displayed_answer = candidates.first().cloned().unwrap_or_default();

    if answer.is_empty() {
        return GradeResult {
            correct: false,
            displayed_answer,
        };
    }

    let correct = match direction {
        QuizDirection::SourceToTarget => candidates.contains(&answer),
        QuizDirection::TargetToSource => {
            let canonical = |s: &str| {
                if settings.strict {
                    fold_diacritics(s)
                } else {
                    fold_diacritics(&strip_article(s))
                }
            };
            let answer = canonical(&answer);
            !answer.is_empty() && candidates.iter().any(|c| canonical(c) == answer)
        }
    };

    GradeResult {
        correct,
        displayed_answer,
    }
}

/// Direction-specific cleanup shared by input and candidates.
fn prepare(s: &str, direction: QuizDirection) -> String {
    match direction {
        QuizDirection::SourceToTarget => strip_infinitive_marker(s.trim()),
        QuizDirection::TargetToSource => s.trim().to_string(),
    }
}
