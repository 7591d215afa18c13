// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for ml-core operations.

use thiserror::Error;

/// All possible errors that can occur in ml-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid entry id: {0}")]
    InvalidId(String),

    #[error("invalid entry status: '{0}'\n  hint: valid statuses are: pending, in_flight, failed_permanent")]
    InvalidStatus(String),

    #[error("invalid mood: '{0}'\n  hint: valid moods are: happy, good, neutral, bad, sad")]
    InvalidMood(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for ml-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
