//! SQLite schema definition.

/// Storage key for the recent-search list (JSON array of names).
pub const HISTORY_KEY: &str = "searchHistory";

/// Storage key for the favorites list (JSON array of medicine records).
pub const FAVORITES_KEY: &str = "favorites";

/// Complete database schema for medlookup.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Local Key/Value Store
-- ============================================================================

CREATE TABLE IF NOT EXISTS local_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,                          -- JSON document
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
