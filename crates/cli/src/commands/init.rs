// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use crate::config::{get_queue_dir, init_work_dir, Config};
use crate::error::Result;

pub fn run(remote: Option<String>, path: Option<String>) -> Result<()> {
    let target_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };
    let (work_dir, config) = run_impl(&target_path, remote.as_deref())?;

    println!("Initialized diary at {}", work_dir.display());
    println!("Installation: {}", config.installation_id);
    match config.remote_url() {
        Some(url) => {
            println!("Remote: {}", url);
            println!("Run 'mood login --token <TOKEN>' to authenticate.");
        }
        None => println!("Remote: none (entries stay local)"),
    }
    Ok(())
}

/// Internal implementation that returns the created directory and config.
pub(crate) fn run_impl(target_path: &Path, remote: Option<&str>) -> Result<(PathBuf, Config)> {
    let work_dir = init_work_dir(target_path, remote)?;
    std::fs::create_dir_all(get_queue_dir(&work_dir))?;
    let config = Config::load(&work_dir)?;
    Ok((work_dir, config))
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
