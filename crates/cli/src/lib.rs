// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! mlrs - An offline-first mood diary library.
//!
//! This crate provides the core functionality for the `mood` CLI tool: a
//! local queue of diary entries that are delivered to a remote entry store
//! whenever it can be reached.
//!
//! # Main Components
//!
//! - [`sync`] - Pending store, sync executor/controller and the remote gateway
//! - [`Config`] - Diary configuration (installation id, remote settings)
//! - [`CredentialStore`] - Bearer token kept next to the queue
//! - [`Error`] - Error types for all operations
//!
//! # Initialization
//!
//! Use [`init_work_dir`] to create a new `.moodlog/` directory, then open the queue:
//!
//! ```rust,ignore
//! use mlrs::{find_work_dir, get_queue_dir, init_work_dir, Config};
//! use mlrs::sync::{FileStorage, PendingStore};
//!
//! let work_dir = init_work_dir(Path::new("."), Some("ws://localhost:7890"))?;
//! let config = Config::load(&work_dir)?;
//! let storage = FileStorage::open(&get_queue_dir(&work_dir))?;
//! ```

mod cli;
mod commands;
mod display;

pub mod config;
pub mod credentials;
pub mod error;
pub mod id;
pub mod logging;
pub mod sync;

pub use cli::{Cli, Command, OutputFormat};
pub use config::{find_work_dir, get_log_path, get_queue_dir, init_work_dir, Config, RemoteConfig};
pub use credentials::CredentialStore;
pub use error::{Error, Result};

use clap::CommandFactory;
use clap_complete::generate;

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Init { remote, path } => commands::init::run(remote, path),
        Command::Add { text, no_push } => commands::add::run(text, no_push),
        Command::Pending { all, output } => commands::pending::run(all, output),
        Command::Sync => commands::sync::run(),
        Command::Discard { id } => commands::discard::run(&id),
        Command::Watch => commands::watch::run(),
        Command::Feed { limit, output } => commands::feed::run(limit, output),
        Command::Login { token } => commands::login::login(&token),
        Command::Logout => commands::login::logout(),
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "mood", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Where `command` should send its logs: the diary's log file for
/// long-running commands, stderr otherwise.
pub fn log_target(command: &Command) -> (Option<std::path::PathBuf>, &'static str) {
    match command {
        Command::Watch => match find_work_dir() {
            Ok(work_dir) => (Some(get_log_path(&work_dir)), logging::FILE_LEVEL),
            Err(_) => (None, logging::DEFAULT_LEVEL),
        },
        _ => (None, logging::DEFAULT_LEVEL),
    }
}
