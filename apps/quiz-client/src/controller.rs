//! Quiz controller.
//!
//! The controller owns the single live session and everything attached to
//! it. It handles one [`Command`] at a time; timers and background calls
//! feed their results back in as commands, so all state changes happen on
//! the controller's own task.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;
use vocab_core::deck::{self, FAILED_WORDS_CATEGORY};
use vocab_core::{
    Advance, AnswerOutcome, CategoryGroups, FailureReport, ProgressMap, QuizDirection,
    QuizSession, SessionError, SessionTiming, UserSettings, VocabItem,
};

use crate::backend::{QuizBackend, ScoreReport};
use crate::db::ProgressCache;
use crate::events::QuizEvent;
use crate::timer::{spawn_delayed, spawn_ticker, TimerRegistry};

/// Input to the controller.
#[derive(Debug, Clone)]
pub enum Command {
    LoadHome,
    StartCategory { level: String, category: String },
    StartFailedWords,
    StartMarathon { level: String },
    /// Start with a list that is already shuffled.
    StartWith { items: Vec<VocabItem>, category: String },
    Submit(String),
    ToggleDirection,
    SetDirection(QuizDirection),
    ReturnHome,
    /// Feedback delay for `session` has elapsed.
    Advance { session: Uuid },
    ProgressFetched(ProgressMap),
    Shutdown,
}

/// Tunables that do not come from the user's settings.
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub timing: SessionTiming,
    pub groups: CategoryGroups,
    pub marathon_limit: usize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            timing: SessionTiming::default(),
            groups: CategoryGroups::default(),
            marathon_limit: deck::DEFAULT_MARATHON_LIMIT,
        }
    }
}

/// State of the one running session.
struct SessionContext {
    session: QuizSession,
    started_at: Instant,
}

/// Drives quiz sessions against a backend and reports to a view.
pub struct QuizController<B: QuizBackend + 'static> {
    backend: Arc<B>,
    cache: ProgressCache,
    options: ControllerOptions,
    settings: UserSettings,
    direction: QuizDirection,
    progress: ProgressMap,
    failed_words_available: bool,
    context: Option<SessionContext>,
    timers: TimerRegistry,
    commands: UnboundedSender<Command>,
    events: UnboundedSender<QuizEvent>,
}

impl<B: QuizBackend + 'static> QuizController<B> {
    /// Create a controller along with its command and event receivers.
    pub fn new(
        backend: Arc<B>,
        cache: ProgressCache,
        options: ControllerOptions,
    ) -> (Self, UnboundedReceiver<Command>, UnboundedReceiver<QuizEvent>) {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (events, event_rx) = mpsc::unbounded_channel();
        let settings = UserSettings::default();
        let controller = Self {
            backend,
            cache,
            options,
            settings,
            direction: settings.default_mode,
            progress: ProgressMap::new(),
            failed_words_available: false,
            context: None,
            timers: TimerRegistry::new(),
            commands,
            events,
        };
        (controller, command_rx, event_rx)
    }

    /// Sender for feeding commands to this controller.
    pub fn commands(&self) -> UnboundedSender<Command> {
        self.commands.clone()
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.context.as_ref().map(|ctx| &ctx.session)
    }

    pub fn direction(&self) -> QuizDirection {
        self.direction
    }

    pub fn progress(&self) -> &ProgressMap {
        &self.progress
    }

    /// Number of session timers still running.
    pub fn live_timers(&self) -> usize {
        self.timers.live_count()
    }

    /// Process commands until `Shutdown` or the channel closes.
    pub async fn run(mut self, mut command_rx: UnboundedReceiver<Command>) {
        while let Some(command) = command_rx.recv().await {
            if matches!(command, Command::Shutdown) {
                break;
            }
            self.handle(command).await;
        }
        self.timers.cancel_all();
    }

    pub async fn handle(&mut self, command: Command) {
        match command {
            Command::LoadHome => self.load_home().await,
            Command::StartCategory { level, category } => {
                self.start_category(&level, &category).await
            }
            Command::StartFailedWords => self.start_failed_words().await,
            Command::StartMarathon { level } => self.start_marathon(&level).await,
            Command::StartWith { items, category } => self.start_session(items, category),
            Command::Submit(answer) => self.submit(&answer).await,
            Command::ToggleDirection => self.set_direction(self.direction.toggled()),
            Command::SetDirection(direction) => self.set_direction(direction),
            Command::ReturnHome => self.return_home(),
            Command::Advance { session } => self.advance(session).await,
            Command::ProgressFetched(progress) => self.apply_progress(progress),
            Command::Shutdown => self.timers.cancel_all(),
        }
    }

    fn emit(&self, event: QuizEvent) {
        if self.events.send(event).is_err() {
            debug!("view dropped, event discarded");
        }
    }

    async fn load_home(&mut self) {
        self.settings = match self.backend.get_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "failed to load settings, using defaults");
                UserSettings::default()
            }
        };
        self.direction = self.settings.default_mode;

        match self.cache.load() {
            Ok(cached) if !cached.is_empty() => {
                self.progress = cached;
                self.emit(QuizEvent::ProgressUpdated {
                    bars: self.progress.bars(&self.options.groups),
                });
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "failed to read progress cache"),
        }

        match self.backend.get_progress().await {
            Ok(progress) => self.apply_progress(progress),
            Err(e) => warn!(error = %e, "failed to load progress"),
        }

        self.failed_words_available = match self.backend.get_failed_words_count().await {
            Ok(count) => count > 0,
            Err(e) => {
                warn!(error = %e, "failed to load failed word count");
                false
            }
        };

        self.emit(QuizEvent::Home {
            bars: self.progress.bars(&self.options.groups),
            failed_words_available: self.failed_words_available,
            direction: self.direction,
        });
    }

    /// Mirror a fresh progress map locally and redraw the bars.
    fn apply_progress(&mut self, progress: ProgressMap) {
        let stored = if progress.is_empty() {
            self.cache.clear()
        } else {
            self.cache.replace(&progress)
        };
        if let Err(e) = stored {
            warn!(error = %e, "failed to update progress cache");
        }
        self.progress = progress;
        self.emit(QuizEvent::ProgressUpdated {
            bars: self.progress.bars(&self.options.groups),
        });
    }

    fn load_failed(&self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(%reason, "session not started");
        self.emit(QuizEvent::LoadFailed { reason });
    }

    async fn start_category(&mut self, level: &str, category: &str) {
        match self.backend.get_vocab_category(level, category).await {
            Ok(mut items) => {
                deck::shuffle(&mut items, &mut rand::rng());
                self.start_session(items, category.to_string());
            }
            Err(e) => self.load_failed(format!("could not load {level}/{category}: {e}")),
        }
    }

    async fn start_failed_words(&mut self) {
        match self.backend.get_failed_words_count().await {
            Ok(count) if count > 0 => {}
            Ok(_) => return self.load_failed("no failed words to practice"),
            Err(e) => return self.load_failed(format!("could not count failed words: {e}")),
        }
        match self.backend.get_failed_words().await {
            Ok(mut items) => {
                deck::shuffle(&mut items, &mut rand::rng());
                self.start_session(items, FAILED_WORDS_CATEGORY.to_string());
            }
            Err(e) => self.load_failed(format!("could not load failed words: {e}")),
        }
    }

    async fn start_marathon(&mut self, level: &str) {
        let mut pool = Vec::new();
        for category in deck::marathon_categories(level) {
            match self.backend.get_vocab_category(level, category).await {
                Ok(items) => pool.extend(items),
                Err(e) => warn!(%level, %category, error = %e, "skipping marathon category"),
            }
        }
        if pool.is_empty() {
            return self.load_failed(format!("could not load any {level} words"));
        }
        info!(%level, words = pool.len(), "marathon pool loaded");
        let items = deck::marathon_deck(pool, self.options.marathon_limit, &mut rand::rng());
        self.start_session(items, deck::marathon_category_id(level));
    }

    /// Replace any running session with a new one over `items`.
    fn start_session(&mut self, items: Vec<VocabItem>, category: String) {
        if items.is_empty() {
            return self.load_failed(format!("no words in {category}"));
        }

        self.timers.cancel_all();
        self.context = None;

        let settings = UserSettings {
            default_mode: self.direction,
            ..self.settings
        };
        let mut session = QuizSession::new(items, category, settings, self.options.timing);
        let prompt = match session.start() {
            Ok(prompt) => prompt,
            Err(e) => return self.load_failed(e.to_string()),
        };

        let started_at = Instant::now();
        self.timers.register(spawn_ticker(
            self.events.clone(),
            started_at,
            self.options.timing.tick,
        ));

        info!(
            session = %session.id(),
            category = session.category(),
            total = session.total(),
            "session started"
        );
        self.emit(QuizEvent::SessionStarted {
            session_id: session.id(),
            category: session.category().to_string(),
            total: session.total(),
        });
        self.emit(QuizEvent::Question { prompt });
        self.context = Some(SessionContext {
            session,
            started_at,
        });
    }

    async fn submit(&mut self, answer: &str) {
        let Some(ctx) = self.context.as_mut() else {
            debug!("answer submitted with no session");
            return;
        };
        let session_id = ctx.session.id();
        let play_sound = ctx.session.settings().sound;

        let outcome = match ctx.session.submit(answer) {
            Ok(outcome) => outcome,
            Err(SessionError::EmptyAnswer) => {
                self.emit(QuizEvent::AnswerRejected {
                    reason: SessionError::EmptyAnswer.to_string(),
                });
                return;
            }
            Err(e) => {
                debug!(session = %session_id, error = %e, "answer ignored");
                return;
            }
        };

        debug!(
            session = %session_id,
            correct = outcome.correct,
            answered = outcome.answered,
            "answer graded"
        );
        self.emit(QuizEvent::Feedback {
            correct: outcome.correct,
            displayed_answer: outcome.displayed_answer.clone(),
            score: outcome.score,
            answered: outcome.answered,
            play_sound,
        });

        if let Some(failure) = outcome.failure.clone() {
            self.report_failure(failure);
        }

        self.schedule_advance(session_id, &outcome).await;
    }

    async fn schedule_advance(&mut self, session_id: Uuid, outcome: &AnswerOutcome) {
        if outcome.last {
            // Live time stops with the last answer.
            self.timers.cancel_all();
        }
        if outcome.delay.is_zero() {
            self.advance(session_id).await;
        } else {
            self.timers.register(spawn_delayed(
                self.commands.clone(),
                outcome.delay,
                Command::Advance {
                    session: session_id,
                },
            ));
        }
    }

    /// Fire-and-forget report of a missed word.
    fn report_failure(&self, failure: FailureReport) {
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            if let Err(e) = backend.report_failure(&failure).await {
                warn!(error = %e, term = %failure.term, "failed to report missed word");
            }
        });
    }

    async fn advance(&mut self, session_id: Uuid) {
        let Some(ctx) = self.context.as_mut() else {
            return;
        };
        if ctx.session.id() != session_id {
            debug!(session = %session_id, "stale advance ignored");
            return;
        }
        match ctx.session.advance() {
            Ok(Advance::Question(prompt)) => self.emit(QuizEvent::Question { prompt }),
            Ok(Advance::Finished) => self.finish().await,
            Err(e) => debug!(session = %session_id, error = %e, "advance ignored"),
        }
    }

    /// Report a finished session and show its results.
    async fn finish(&mut self) {
        self.timers.cancel_all();
        let Some(ctx) = self.context.take() else {
            return;
        };
        let Some(summary) = ctx.session.summary(ctx.started_at.elapsed()) else {
            return;
        };
        info!(
            session = %summary.session_id,
            score = summary.score,
            total = summary.total,
            time = summary.time_secs,
            "session finished"
        );

        let report = ScoreReport {
            category: summary.category.clone(),
            score: summary.score,
            time: summary.time_secs,
        };

        if let Err(e) = self.backend.save_score(&report).await {
            warn!(error = %e, "failed to save score");
        }

        self.refresh_progress();

        if let Err(e) = self.backend.save_leaderboard_entry(&report).await {
            warn!(error = %e, "failed to save leaderboard entry");
        }

        let shows_leaderboard = ctx.session.shows_leaderboard();
        let session_id = summary.session_id;
        let category = summary.category.clone();
        self.emit(QuizEvent::Results {
            summary,
            shows_leaderboard,
        });

        if shows_leaderboard {
            match self.backend.get_leaderboard(&category).await {
                Ok(rows) => self.emit(QuizEvent::Leaderboard { category, rows }),
                Err(e) => warn!(error = %e, "failed to load leaderboard"),
            }
        }

        self.emit(QuizEvent::SessionClosed { session_id });
    }

    /// Refetch progress in the background; the result comes back as a command.
    fn refresh_progress(&self) {
        let backend = Arc::clone(&self.backend);
        let commands = self.commands.clone();
        tokio::spawn(async move {
            match backend.get_progress().await {
                Ok(progress) => {
                    let _ = commands.send(Command::ProgressFetched(progress));
                }
                Err(e) => warn!(error = %e, "failed to refresh progress"),
            }
        });
    }

    fn set_direction(&mut self, direction: QuizDirection) {
        self.direction = direction;
        self.emit(QuizEvent::DirectionChanged { direction });
        let redraw = self
            .context
            .as_mut()
            .and_then(|ctx| ctx.session.set_direction(direction));
        if let Some(prompt) = redraw {
            self.emit(QuizEvent::Question { prompt });
        }
    }

    /// Abandon the running session without saving anything.
    fn return_home(&mut self) {
        self.timers.cancel_all();
        if let Some(ctx) = self.context.take() {
            info!(session = %ctx.session.id(), "session abandoned");
        }
        self.emit(QuizEvent::ReturnedHome {
            bars: self.progress.bars(&self.options.groups),
        });
    }
}
