// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup for the `mood` binary.
//!
//! `RUST_LOG` overrides the default level. Short-lived commands log to
//! stderr; `mood watch` appends to `.moodlog/moodlog.log`.

use std::fs;
use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Default level for one-shot commands.
pub const DEFAULT_LEVEL: &str = "warn";

/// Default level when logging to a file.
pub const FILE_LEVEL: &str = "info";

/// Install the global subscriber.
///
/// Writes to `log_path` when given and openable, otherwise to stderr. Does
/// nothing if a subscriber is already installed.
pub fn setup(log_path: Option<&Path>, default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file = log_path.and_then(|path| {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    // A subscriber installed earlier wins.
    let _ = match file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .try_init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };
}
