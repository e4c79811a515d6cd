//! SQL schema for the BioAttend SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- The template store. Rows are never updated.
CREATE TABLE IF NOT EXISTS identities (
    identity_id     TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    identifier_code TEXT NOT NULL UNIQUE,
    template        TEXT NOT NULL UNIQUE,   -- SHA-256 hex of the enrolled image
    enrolled_at     TEXT NOT NULL           -- ISO 8601 UTC; server-assigned
);

-- The attendance ledger: one row per identity per day.
CREATE TABLE IF NOT EXISTS attendance_events (
    event_id    TEXT PRIMARY KEY,
    identity_id TEXT NOT NULL REFERENCES identities(identity_id) ON DELETE CASCADE,
    date        INTEGER NOT NULL,           -- days from 0001-01-01 (day 1)
    recorded_at TEXT NOT NULL,              -- ISO 8601 UTC; server-assigned
    UNIQUE (identity_id, date)
);

CREATE INDEX IF NOT EXISTS attendance_date_idx ON attendance_events(date);

PRAGMA user_version = 1;
";
