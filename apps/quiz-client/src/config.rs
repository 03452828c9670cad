//! Runtime configuration from the environment.

use std::path::PathBuf;

use vocab_core::deck::DEFAULT_MARATHON_LIMIT;

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend_url: String,
    /// Read vocabulary files from here instead of the backend.
    pub vocab_dir: Option<PathBuf>,
    pub cache_path: PathBuf,
    pub marathon_limit: usize,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = lookup("VOCAB_BACKEND_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let vocab_dir = lookup("VOCAB_DATA_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let cache_path = lookup("VOCAB_CACHE_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_cache_path);

        let marathon_limit = match lookup("VOCAB_MARATHON_LIMIT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid VOCAB_MARATHON_LIMIT, using default");
                DEFAULT_MARATHON_LIMIT
            }),
            None => DEFAULT_MARATHON_LIMIT,
        };

        Self {
            backend_url,
            vocab_dir,
            cache_path,
            marathon_limit,
        }
    }
}

fn default_cache_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocab-quiz")
        .join("progress.db")
}
