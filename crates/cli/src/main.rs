// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::Parser;
use mlrs::Cli;

fn main() {
    let cli = Cli::parse();
    let (log_path, level) = mlrs::log_target(&cli.command);
    mlrs::logging::setup(log_path.as_deref(), level);

    if let Err(e) = mlrs::run(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
