// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ml-remote: WebSocket entry store for the moodlog diary.
//!
//! This server authenticates submissions, scores them for sentiment and
//! stores them durably, idempotent per device-assigned local id.

mod server;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// ml-remote: moodlog entry store
#[derive(Parser, Debug)]
#[command(name = "ml-remote")]
#[command(about = "WebSocket entry store for the moodlog diary")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:7890")]
    bind: SocketAddr,

    /// Directory for the entry database
    #[arg(short, long, default_value = ".")]
    data: PathBuf,

    /// Accepted bearer token (repeatable; without any, every non-empty token is accepted)
    #[arg(long = "token", value_name = "TOKEN")]
    tokens: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting ml-remote server");
    info!("  Bind address: {}", args.bind);
    info!("  Data directory: {}", args.data.display());
    if args.tokens.is_empty() {
        info!("  Tokens: any non-empty token accepted");
    } else {
        info!("  Tokens: {} configured", args.tokens.len());
    }

    let state = state::ServerState::new(&args.data, args.tokens)?;
    info!("  Stored entries: {}", state.count().await?);
    server::run(args.bind, state).await?;

    Ok(())
}
