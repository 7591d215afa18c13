// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed entry storage for the remote store.
//!
//! Entries are append-only. Each device submission is keyed by
//! `(installation_id, local_id)`, so a resubmission after a lost reply
//! returns the row that was stored the first time.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

use crate::entry::{Mood, PublishedEntry};
use crate::error::{Error, Result};
use crate::id::LocalId;
use crate::sentiment::Emotion;

/// SQL schema for the entry database.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS entries (
    server_id INTEGER PRIMARY KEY AUTOINCREMENT,
    installation_id TEXT NOT NULL,
    local_id TEXT NOT NULL,
    content TEXT NOT NULL,
    mood TEXT NOT NULL,
    score INTEGER NOT NULL,
    created_at_local TEXT NOT NULL,
    server_timestamp TEXT NOT NULL,
    UNIQUE (installation_id, local_id)
);

CREATE INDEX IF NOT EXISTS idx_entries_server_timestamp ON entries(server_timestamp DESC);
"#;

const ENTRY_COLUMNS: &str =
    "server_id, local_id, content, mood, score, created_at_local, server_timestamp";

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

fn entry_from_row(row: &Row<'_>) -> std::result::Result<PublishedEntry, rusqlite::Error> {
    let local_id: String = row.get(1)?;
    let mood: String = row.get(3)?;
    let created: String = row.get(5)?;
    let stored: String = row.get(6)?;

    Ok(PublishedEntry {
        server_id: row.get(0)?,
        local_id: parse_db::<LocalId>(&local_id, "local_id")?,
        content: row.get(2)?,
        mood: parse_db::<Mood>(&mood, "mood")?,
        score: row.get(4)?,
        created_at_local: parse_timestamp(&created, "created_at_local")?,
        server_timestamp: parse_timestamp(&stored, "server_timestamp")?,
    })
}

/// Run schema creation on a database connection.
///
/// Idempotent; safe to call on every open.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// A new entry to be stored.
#[derive(Debug, Clone, Copy)]
pub struct NewEntry<'a> {
    pub installation_id: &'a str,
    pub local_id: LocalId,
    pub content: &'a str,
    pub emotion: Emotion,
    pub created_at_local: DateTime<Utc>,
}

/// SQLite database connection with entry store operations.
pub struct Database {
    /// The underlying SQLite connection.
    pub conn: Connection,
}

impl Database {
    /// Open a database connection at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Store an entry unless this device already submitted it.
    ///
    /// Returns the stored entry and whether this call inserted it. A repeat
    /// submission returns the original row untouched.
    pub fn insert_entry(
        &self,
        entry: &NewEntry<'_>,
        now: DateTime<Utc>,
    ) -> Result<(PublishedEntry, bool)> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO entries
             (installation_id, local_id, content, mood, score, created_at_local, server_timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.installation_id,
                entry.local_id.to_string(),
                entry.content,
                entry.emotion.mood.as_str(),
                entry.emotion.score,
                entry.created_at_local.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )? > 0;

        let stored = self
            .find_entry(entry.installation_id, entry.local_id)?
            .ok_or_else(|| {
                Error::CorruptedData(format!(
                    "entry {} vanished after insert",
                    entry.local_id
                ))
            })?;
        Ok((stored, inserted))
    }

    /// Look up an entry by its device key.
    pub fn find_entry(
        &self,
        installation_id: &str,
        local_id: LocalId,
    ) -> Result<Option<PublishedEntry>> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM entries WHERE installation_id = ?1 AND local_id = ?2"
        );
        let entry = self
            .conn
            .query_row(
                &sql,
                params![installation_id, local_id.to_string()],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// Most recent entries first.
    pub fn recent_entries(&self, limit: usize) -> Result<Vec<PublishedEntry>> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM entries
             ORDER BY server_timestamp DESC, server_id DESC
             LIMIT ?1"
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![limit], entry_from_row)?;
        let entries = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Number of stored entries.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
