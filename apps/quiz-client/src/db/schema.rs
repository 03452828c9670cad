//! SQLite schema definitions.

/// Local mirror of the backend's progress map.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS progress_cache (
    category TEXT PRIMARY KEY,
    percent REAL NOT NULL
);
"#;
