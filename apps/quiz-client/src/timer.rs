//! Per-session timers.
//!
//! Every timer a session starts is registered here so that a new session,
//! or leaving the quiz, can stop all of them at once.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::controller::Command;
use crate::events::QuizEvent;
use vocab_core::session::round_secs;

/// Registry of the live session's timer tasks.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    handles: Vec<JoinHandle<()>>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handle: JoinHandle<()>) {
        self.handles.retain(|h| !h.is_finished());
        self.handles.push(handle);
    }

    /// Abort every registered timer.
    pub fn cancel_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }

    /// Number of timers still running.
    pub fn live_count(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }
}

impl Drop for TimerRegistry {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// Emit the elapsed time every `cadence` until aborted or the view is gone.
pub fn spawn_ticker(
    events: UnboundedSender<QuizEvent>,
    started_at: Instant,
    cadence: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cadence);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let tick = QuizEvent::TimerTick {
                elapsed_secs: round_secs(started_at.elapsed()),
            };
            if events.send(tick).is_err() {
                break;
            }
        }
    })
}

/// Send `command` back to the controller after `delay`.
pub fn spawn_delayed(
    commands: UnboundedSender<Command>,
    delay: Duration,
    command: Command,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = commands.send(command);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn cancel_all_stops_ticking() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = TimerRegistry::new();
        timers.register(spawn_ticker(tx, Instant::now(), Duration::from_millis(100)));
        assert_eq!(timers.live_count(), 1);

        assert!(matches!(rx.recv().await, Some(QuizEvent::TimerTick { .. })));
        timers.cancel_all();
        assert_eq!(timers.live_count(), 0);

        // The aborted task drops its sender, closing the channel.
        while let Some(event) = rx.recv().await {
            assert!(matches!(event, QuizEvent::TimerTick { .. }));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_command_fires_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let started = Instant::now();
        let mut timers = TimerRegistry::new();
        timers.register(spawn_delayed(tx, Duration::from_millis(1000), Command::ReturnHome));

        assert!(matches!(rx.recv().await, Some(Command::ReturnHome)));
        assert!(started.elapsed() >= Duration::from_millis(1000));
        assert!(rx.recv().await.is_none());
    }
}
