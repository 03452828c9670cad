//! Local SQLite mirror of category progress.
//!
//! The backend is the source of truth. The mirror only lets the home view
//! render last-known progress before the backend answers.

pub mod error;
pub mod schema;

pub use error::DbError;

use rusqlite::{params, Connection};
use std::path::Path;
use vocab_core::ProgressMap;

type Result<T> = std::result::Result<T, DbError>;

/// SQLite-backed progress cache.
pub struct ProgressCache {
    conn: Connection,
}

impl ProgressCache {
    /// Open the cache at path, creating the file and its directory if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let cache = Self { conn };
        cache.initialize()?;
        Ok(cache)
    }

    /// Open in-memory cache (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn };
        cache.initialize()?;
        Ok(cache)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(schema::SCHEMA)?;
        Ok(())
    }

    /// Load the cached map.
    pub fn load(&self) -> Result<ProgressMap> {
        let mut stmt = self
            .conn
            .prepare("SELECT category, percent FROM progress_cache ORDER BY category")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows.into_iter().collect())
    }

    /// Overwrite the cache with `progress`. An empty map clears it.
    pub fn replace(&mut self, progress: &ProgressMap) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM progress_cache", [])?;
        for (category, percent) in progress.iter() {
            tx.execute(
                "INSERT INTO progress_cache (category, percent) VALUES (?1, ?2)",
                params![category, percent],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM progress_cache", [])?;
        Ok(())
    }
}
