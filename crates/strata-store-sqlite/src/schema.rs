//! SQL schema for the Strata SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id    TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    email      TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

-- Raw observations. Strictly append-only: an analysis run always re-reads
-- rows and re-derives everything from them.
CREATE TABLE IF NOT EXISTS log_points (
    point_id TEXT PRIMARY KEY,
    user_id  TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    date     TEXT NOT NULL,   -- ISO 8601 calendar date
    domain   TEXT NOT NULL,   -- 'sleep' | 'fitness' | 'climbing' | 'learning' | 'reflection' | 'other'
    metric   TEXT NOT NULL,
    value    REAL,            -- NULL for note-only points
    note     TEXT
);

-- Derived insights. Rewritten wholesale per analysis run inside one
-- transaction; the batch is authoritative, nothing is merged.
CREATE TABLE IF NOT EXISTS insights (
    insight_id        TEXT PRIMARY KEY,
    user_id           TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    description       TEXT NOT NULL,
    correlation_score REAL NOT NULL,
    created_at        TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS log_points_user_date_idx ON log_points(user_id, date);
CREATE INDEX IF NOT EXISTS insights_user_idx        ON insights(user_id);

PRAGMA user_version = 1;
";
