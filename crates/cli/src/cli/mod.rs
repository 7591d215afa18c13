// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "mood")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "An offline-first mood diary")]
#[command(
    long_about = "An offline-first mood diary.\n\n\
    Entries are saved locally first and delivered to the remote entry store \
    whenever it can be reached."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a diary in the current directory
    #[command(after_help = "\
Examples:
  mood init                              Local-only diary
  mood init --remote ws://host:7890      Diary that syncs to a remote store")]
    Init {
        /// WebSocket URL of the remote entry store
        #[arg(long, value_name = "URL")]
        remote: Option<String>,

        /// Directory to initialize (default: current directory)
        #[arg(long)]
        path: Option<String>,
    },

    /// Write a diary entry
    #[command(after_help = "\
Examples:
  mood add \"a wonderful walk in the park\"
  mood add slept badly, feeling tired
  mood add --no-push \"queue it, send later\"")]
    Add {
        /// Entry text (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1.., value_parser = non_empty_string)]
        text: Vec<String>,

        /// Only queue the entry; do not try to deliver it now
        #[arg(long)]
        no_push: bool,
    },

    /// Show entries waiting to be delivered
    Pending {
        /// Include entries the remote store rejected permanently
        #[arg(long, short)]
        all: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Deliver queued entries now
    Sync,

    /// Drop an entry the remote store rejected permanently
    Discard {
        /// Entry id as printed by 'mood pending'
        id: String,
    },

    /// Stay running and deliver entries whenever the remote store is reachable
    Watch,

    /// Show recent entries from the remote store, newest first
    Feed {
        /// Maximum number of entries
        #[arg(long, short = 'n', default_value_t = 20)]
        limit: u32,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Store the bearer token used with the remote store
    Login {
        /// Bearer token
        #[arg(long, value_parser = non_empty_string)]
        token: String,
    },

    /// Forget the stored bearer token
    Logout,

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
