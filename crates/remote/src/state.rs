// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server state management.
//!
//! Wraps the entry database and the accepted bearer tokens for shared access.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use ml_core::{Database, NewEntry, PublishedEntry, Result};

/// Database file name inside the data directory.
pub const DB_FILE_NAME: &str = "entries.db";

/// Shared server state containing the entry database.
#[derive(Clone)]
pub struct ServerState {
    inner: Arc<ServerStateInner>,
}

struct ServerStateInner {
    /// The entry database (protected by mutex for writes).
    db: Mutex<Database>,
    /// Accepted bearer tokens. Empty means any non-empty token is accepted.
    tokens: HashSet<String>,
}

impl ServerState {
    /// Creates a new server state with its database in the given directory.
    pub fn new(data_dir: &Path, tokens: impl IntoIterator<Item = String>) -> Result<Self> {
        let db = Database::open(&data_dir.join(DB_FILE_NAME))?;
        Ok(Self::with_database(db, tokens))
    }

    pub fn with_database(db: Database, tokens: impl IntoIterator<Item = String>) -> Self {
        ServerState {
            inner: Arc::new(ServerStateInner {
                db: Mutex::new(db),
                tokens: tokens.into_iter().collect(),
            }),
        }
    }

    /// Whether `token` may read and write entries.
    pub fn authorize(&self, token: Option<&str>) -> bool {
        match token.map(str::trim) {
            None | Some("") => false,
            Some(token) => self.inner.tokens.is_empty() || self.inner.tokens.contains(token),
        }
    }

    /// Stores an entry, or returns the copy stored by an earlier submission.
    ///
    /// Returns the stored entry and whether this call inserted it.
    pub async fn store_entry(&self, entry: &NewEntry<'_>) -> Result<(PublishedEntry, bool)> {
        let db = self.inner.db.lock().await;
        db.insert_entry(entry, Utc::now())
    }

    /// Most recent entries first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<PublishedEntry>> {
        let db = self.inner.db.lock().await;
        db.recent_entries(limit)
    }

    /// Number of stored entries.
    pub async fn count(&self) -> Result<usize> {
        let db = self.inner.db.lock().await;
        db.count()
    }
}
