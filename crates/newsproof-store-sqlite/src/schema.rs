//! SQL schema for the newsproof SQLite store.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS history (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id       TEXT    NOT NULL,
    url           TEXT    NOT NULL,   -- normalised article URL
    history_index INTEGER NOT NULL,   -- per-user sequence, starts at 1
    created_at    TEXT    NOT NULL,   -- RFC 3339 UTC; server-assigned
    article_json  TEXT    NOT NULL,
    verdict_json  TEXT    NOT NULL,
    UNIQUE (user_id, url),
    UNIQUE (user_id, history_index)
);

PRAGMA user_version = 1;
";
