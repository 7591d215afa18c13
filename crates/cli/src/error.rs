// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::{GatewayError, StoreError, SyncError};

/// All possible errors that can occur in the mlrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'mood init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("no remote configured\n  hint: run 'mood init --remote ws://host:port' or add a [remote] section to .moodlog/config.toml")]
    NoRemote,

    #[error("entry cannot be empty")]
    EmptyEntry,

    #[error("invalid entry id: {0}")]
    InvalidId(String),

    #[error("invalid remote URL '{0}': must start with ws:// or wss://")]
    InvalidRemoteUrl(String),

    #[error("not logged in\n  hint: run 'mood login --token <TOKEN>'")]
    NotLoggedIn,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("remote error: {0}")]
    Remote(#[from] GatewayError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(ml_core::Error),
}

/// A specialized Result type for mlrs operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<ml_core::Error> for Error {
    fn from(e: ml_core::Error) -> Self {
        match e {
            ml_core::Error::InvalidId(s) => Error::InvalidId(s),
            ml_core::Error::Io(e) => Error::Io(e),
            ml_core::Error::Json(e) => Error::Json(e),
            other => Error::Core(other),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
