pub mod backend;
pub mod config;
pub mod controller;
pub mod db;
pub mod events;
pub mod timer;
pub mod view;

pub use backend::{BackendError, HttpBackend, QuizBackend, ScoreReport};
pub use config::Config;
pub use controller::{Command, ControllerOptions, QuizController};
pub use db::{DbError, ProgressCache};
pub use events::QuizEvent;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. Logs go to stderr so they do not mix with
/// quiz output.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
