//! vocab-quiz: terminal vocabulary drills.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use quiz_client::{
    view, Command, Config, ControllerOptions, HttpBackend, ProgressCache, QuizController,
    QuizEvent,
};

#[derive(Parser)]
#[command(name = "vocab-quiz", version, about = "Vocabulary drills against a quiz backend")]
struct Cli {
    /// Print events as JSON lines instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drill one category
    Category {
        /// CEFR level, e.g. A1
        level: String,
        /// Category name, e.g. colors
        category: String,
    },

    /// Drill previously missed words
    Failed,

    /// Drill every category of a level at once
    Marathon {
        #[arg(long, default_value = "A1")]
        level: String,
    },

    /// Show category progress
    Progress,
}

/// When the renderer stops.
#[derive(Clone, Copy, PartialEq)]
enum Until {
    Home,
    SessionEnd,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    quiz_client::init_tracing();

    let Cli { json, command } = Cli::parse();
    let config = Config::from_env();
    tracing::debug!(?config, "configuration loaded");

    let backend = Arc::new(HttpBackend::with_vocab_dir(
        &config.backend_url,
        config.vocab_dir.clone(),
    ));
    let cache = ProgressCache::open(&config.cache_path).with_context(|| {
        format!("failed to open progress cache at {}", config.cache_path.display())
    })?;
    let options = ControllerOptions {
        marathon_limit: config.marathon_limit,
        ..ControllerOptions::default()
    };

    let (controller, command_rx, event_rx) = QuizController::new(backend, cache, options);
    let commands = controller.commands();

    commands.send(Command::LoadHome)?;
    let until = match command {
        Commands::Progress => Until::Home,
        Commands::Category { level, category } => {
            commands.send(Command::StartCategory { level, category })?;
            Until::SessionEnd
        }
        Commands::Failed => {
            commands.send(Command::StartFailedWords)?;
            Until::SessionEnd
        }
        Commands::Marathon { level } => {
            commands.send(Command::StartMarathon { level })?;
            Until::SessionEnd
        }
    };

    if until == Until::SessionEnd {
        tokio::spawn(read_answers(commands));
    }

    tokio::select! {
        _ = controller.run(command_rx) => {}
        _ = render(event_rx, until, json) => {}
    }
    Ok(())
}

/// Forward stdin lines to the controller.
async fn read_answers(commands: UnboundedSender<Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let command = match lines.next_line().await {
            Ok(Some(line)) => match line.trim() {
                ":mode" => Command::ToggleDirection,
                ":home" => Command::ReturnHome,
                _ => Command::Submit(line),
            },
            Ok(None) => Command::ReturnHome,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read input");
                Command::ReturnHome
            }
        };
        let done = matches!(command, Command::ReturnHome);
        if commands.send(command).is_err() || done {
            break;
        }
    }
}

async fn render(mut events: UnboundedReceiver<QuizEvent>, until: Until, json: bool) {
    while let Some(event) = events.recv().await {
        if json {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "failed to encode event"),
            }
        } else if let Some(text) = view::render_event(&event) {
            println!("{text}");
        }
        let finished = match (&event, until) {
            (QuizEvent::Home { .. }, Until::Home) => true,
            (
                QuizEvent::SessionClosed { .. }
                | QuizEvent::ReturnedHome { .. }
                | QuizEvent::LoadFailed { .. },
                Until::SessionEnd,
            ) => true,
            _ => false,
        };
        if finished {
            break;
        }
    }
}
