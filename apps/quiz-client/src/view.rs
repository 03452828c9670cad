//! Plain-text rendering of quiz events for the terminal front-end.

use vocab_core::{LeaderboardEntry, ProgressBar, Prompt, QuizDirection, SessionSummary};

use crate::events::QuizEvent;

const BAR_WIDTH: usize = 20;
const EMPTY_LEADERBOARD: &str = "No scores yet. Be the first!";

/// Format seconds as `"{m}m {s:.2}s"`.
pub fn format_elapsed(secs: f64) -> String {
    let secs = secs.max(0.0);
    let minutes = (secs / 60.0).floor();
    let rest = secs - minutes * 60.0;
    format!("{}m {:.2}s", minutes as u64, rest)
}

pub fn prompt_label(direction: QuizDirection) -> &'static str {
    match direction {
        QuizDirection::SourceToTarget => "What is the meaning of:",
        QuizDirection::TargetToSource => "Was bedeutet:",
    }
}

pub fn render_bar(bar: &ProgressBar) -> String {
    let filled = ((bar.percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    let mark = if bar.glows() { "*" } else { " " };
    format!(
        "{:<24} [{}{}] {:>5.1}%{}",
        bar.category,
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        bar.percent,
        mark
    )
}

pub fn render_bars(bars: &[ProgressBar]) -> String {
    bars.iter().map(render_bar).collect::<Vec<_>>().join("\n")
}

pub fn render_prompt(prompt: &Prompt) -> String {
    let mut out = format!(
        "[{}/{}] {}\n  {}",
        prompt.index + 1,
        prompt.total,
        prompt_label(prompt.direction),
        prompt.text
    );
    if let Some(example) = &prompt.example {
        out.push_str(&format!("\n  e.g. {example}"));
    }
    if !prompt.plural_forms.is_empty() {
        out.push_str(&format!("\n  plural: {}", prompt.plural_forms.join(" / ")));
    }
    out
}

/// Leaderboard rows, ranked from 1 in server order.
pub fn render_leaderboard(rows: &[LeaderboardEntry]) -> String {
    if rows.is_empty() {
        return EMPTY_LEADERBOARD.to_string();
    }
    rows.iter()
        .enumerate()
        .map(|(i, row)| format!("{}. {} {:.2}s", i + 1, row.username, row.time))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_summary(summary: &SessionSummary) -> String {
    format!(
        "Finished {}: {}/{} in {}",
        summary.category,
        summary.score,
        summary.total,
        format_elapsed(summary.time_secs)
    )
}

/// Text for an event, or `None` for events the terminal does not show.
pub fn render_event(event: &QuizEvent) -> Option<String> {
    match event {
        QuizEvent::Home {
            bars,
            failed_words_available,
            direction,
        } => {
            let failed = if *failed_words_available {
                "available"
            } else {
                "none"
            };
            Some(format!(
                "{}\nmode: {}  failed words: {}",
                render_bars(bars),
                direction.as_str(),
                failed
            ))
        }
        QuizEvent::ProgressUpdated { .. } | QuizEvent::TimerTick { .. } => None,
        QuizEvent::LoadFailed { reason } => Some(format!("Could not start: {reason}")),
        QuizEvent::SessionStarted {
            category, total, ..
        } => Some(format!("{category}: {total} words")),
        QuizEvent::Question { prompt } => Some(render_prompt(prompt)),
        QuizEvent::AnswerRejected { reason } => Some(format!("({reason})")),
        QuizEvent::Feedback {
            correct,
            displayed_answer,
            score,
            answered,
            ..
        } => Some(if *correct {
            format!("Correct! {score}/{answered}")
        } else {
            format!("Wrong. Answer: {displayed_answer}  {score}/{answered}")
        }),
        QuizEvent::DirectionChanged { direction } => Some(format!("mode: {}", direction.as_str())),
        QuizEvent::Results { summary, .. } => Some(render_summary(summary)),
        QuizEvent::Leaderboard { category, rows } => Some(format!(
            "Leaderboard ({category})\n{}",
            render_leaderboard(rows)
        )),
        QuizEvent::SessionClosed { .. } => None,
        QuizEvent::ReturnedHome { bars } => Some(render_bars(bars)),
    }
}
