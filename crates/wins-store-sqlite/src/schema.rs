//! SQL schema for the Daily Wins SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,  -- trimmed, lowercased
    full_name     TEXT,
    password_hash TEXT NOT NULL,         -- argon2 PHC string
    created_at    TEXT NOT NULL
);

-- Only the SHA-256 hex digest of a bearer token is ever stored.
CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(user_id),
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL
);

-- One row per (user, calendar day). Rows are upserted, never deleted.
CREATE TABLE IF NOT EXISTS daily_wins (
    id           TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL REFERENCES users(user_id),
    date         TEXT NOT NULL,   -- YYYY-MM-DD
    work_win     TEXT,
    personal_win TEXT,
    growth_win   TEXT,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,
    UNIQUE (user_id, date)
);

CREATE TABLE IF NOT EXISTS streaks (
    user_id         TEXT PRIMARY KEY REFERENCES users(user_id),
    current_streak  INTEGER NOT NULL DEFAULT 0 CHECK (current_streak >= 0),
    longest_streak  INTEGER NOT NULL DEFAULT 0 CHECK (longest_streak >= 0),
    last_entry_date TEXT
);

CREATE INDEX IF NOT EXISTS daily_wins_user_date_idx ON daily_wins(user_id, date DESC);
CREATE INDEX IF NOT EXISTS sessions_user_idx        ON sessions(user_id);

PRAGMA user_version = 1;
";
