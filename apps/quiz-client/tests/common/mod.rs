//! Shared fixtures for controller integration tests.
//!
//! `RecordingBackend` answers from in-memory data and records every call in
//! order, so tests can assert on what the controller asked for.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

use quiz_client::{
    BackendError, Command, ControllerOptions, ProgressCache, QuizBackend, QuizController,
    QuizEvent, ScoreReport,
};
use vocab_core::{FailureReport, LeaderboardEntry, ProgressMap, UserSettings, VocabItem};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetSettings,
    GetProgress,
    GetFailedWordsCount,
    GetFailedWords,
    GetVocab { level: String, category: String },
    ReportFailure(FailureReport),
    SaveScore(ScoreReport),
    SaveLeaderboard(ScoreReport),
    GetLeaderboard(String),
}

#[derive(Default)]
pub struct RecordingBackend {
    settings: UserSettings,
    progress: Option<ProgressMap>,
    vocab: HashMap<(String, String), Vec<VocabItem>>,
    failed_words: Vec<VocabItem>,
    leaderboard: Vec<LeaderboardEntry>,
    fail_writes: bool,
    calls: Mutex<Vec<Call>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            progress: Some(ProgressMap::new()),
            ..Self::default()
        }
    }

    pub fn with_settings(mut self, settings: UserSettings) -> Self {
        self.settings = settings;
        self
    }

    /// `None` makes progress requests fail.
    pub fn with_progress(mut self, progress: Option<ProgressMap>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_category(mut self, level: &str, category: &str, items: Vec<VocabItem>) -> Self {
        self.vocab
            .insert((level.to_string(), category.to_string()), items);
        self
    }

    pub fn with_failed_words(mut self, items: Vec<VocabItem>) -> Self {
        self.failed_words = items;
        self
    }

    pub fn with_leaderboard(mut self, rows: Vec<LeaderboardEntry>) -> Self {
        self.leaderboard = rows;
        self
    }

    /// Make every write endpoint fail.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn write_result(&self) -> Result<(), BackendError> {
        if self.fail_writes {
            Err(BackendError::Network("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl QuizBackend for RecordingBackend {
    async fn get_settings(&self) -> Result<UserSettings, BackendError> {
        self.record(Call::GetSettings);
        Ok(self.settings)
    }

    async fn get_progress(&self) -> Result<ProgressMap, BackendError> {
        self.record(Call::GetProgress);
        self.progress.clone().ok_or_else(|| BackendError::Backend {
            status: 500,
            message: "progress unavailable".into(),
        })
    }

    async fn get_failed_words_count(&self) -> Result<usize, BackendError> {
        self.record(Call::GetFailedWordsCount);
        Ok(self.failed_words.len())
    }

    async fn get_failed_words(&self) -> Result<Vec<VocabItem>, BackendError> {
        self.record(Call::GetFailedWords);
        Ok(self.failed_words.clone())
    }

    async fn get_vocab_category(
        &self,
        level: &str,
        category: &str,
    ) -> Result<Vec<VocabItem>, BackendError> {
        self.record(Call::GetVocab {
            level: level.to_string(),
            category: category.to_string(),
        });
        self.vocab
            .get(&(level.to_string(), category.to_string()))
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("{level}/{category}")))
    }

    async fn report_failure(&self, failure: &FailureReport) -> Result<(), BackendError> {
        self.record(Call::ReportFailure(failure.clone()));
        self.write_result()
    }

    async fn save_score(&self, report: &ScoreReport) -> Result<(), BackendError> {
        self.record(Call::SaveScore(report.clone()));
        self.write_result()
    }

    async fn save_leaderboard_entry(&self, report: &ScoreReport) -> Result<(), BackendError> {
        self.record(Call::SaveLeaderboard(report.clone()));
        self.write_result()
    }

    async fn get_leaderboard(&self, category: &str) -> Result<Vec<LeaderboardEntry>, BackendError> {
        self.record(Call::GetLeaderboard(category.to_string()));
        Ok(self.leaderboard.clone())
    }
}

/// A controller wired to a recording backend, driven by hand.
pub struct TestContext {
    pub controller: QuizController<RecordingBackend>,
    pub backend: Arc<RecordingBackend>,
    commands: UnboundedReceiver<Command>,
    events: UnboundedReceiver<QuizEvent>,
}

impl TestContext {
    pub fn new(backend: RecordingBackend) -> Self {
        let cache = ProgressCache::open_in_memory().expect("Failed to open cache");
        Self::with_cache(backend, cache, ControllerOptions::default())
    }

    pub fn with_cache(
        backend: RecordingBackend,
        cache: ProgressCache,
        options: ControllerOptions,
    ) -> Self {
        let backend = Arc::new(backend);
        let (controller, commands, events) =
            QuizController::new(Arc::clone(&backend), cache, options);
        Self {
            controller,
            backend,
            commands,
            events,
        }
    }

    pub async fn send(&mut self, command: Command) {
        self.controller.handle(command).await;
    }

    /// Let spawned tasks run, then feed back any commands they produced.
    pub async fn settle(&mut self) {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
        while let Ok(command) = self.commands.try_recv() {
            self.controller.handle(command).await;
            for _ in 0..16 {
                tokio::task::yield_now().await;
            }
        }
    }

    /// Let paused time run forward, then process what it triggered.
    pub async fn wait(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
        self.settle().await;
    }

    /// Every event emitted so far, without timer ticks.
    pub fn events(&mut self) -> Vec<QuizEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            if !matches!(event, QuizEvent::TimerTick { .. }) {
                out.push(event);
            }
        }
        out
    }

    /// Every event emitted so far, ticks included.
    pub fn raw_events(&mut self) -> Vec<QuizEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            out.push(event);
        }
        out
    }
}

pub fn animals() -> Vec<VocabItem> {
    vec![
        VocabItem::new("der Hund", "dog").with_gender("m"),
        VocabItem::new("die Katze", "cat").with_gender("f"),
        VocabItem::new("das Pferd", "horse").with_gender("n"),
    ]
}

pub fn settings() -> UserSettings {
    UserSettings::default()
}

/// Correct source-to-target answer for the prompt text.
pub fn answer_for(prompt_text: &str) -> &'static str {
    match prompt_text {
        "der Hund" => "dog",
        "die Katze" => "cat",
        "das Pferd" => "horse",
        other => panic!("unexpected prompt {other}"),
    }
}
