// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use super::{open_controller, open_diary, open_store, runtime};
use crate::config::Config;
use crate::error::Result;
use crate::sync::TriggerResult;

pub fn run() -> Result<()> {
    let (config, work_dir) = open_diary()?;
    match run_impl(&work_dir, &config)? {
        TriggerResult::Ran(summary) => {
            for entry in &summary.published {
                println!("Delivered {} ({})", entry.local_id, entry.mood);
            }
            println!("Sync complete: {}", summary);
        }
        TriggerResult::Coalesced => println!("Sync already in progress"),
    }
    Ok(())
}

/// Recover interrupted attempts, then run one pass.
pub(crate) fn run_impl(work_dir: &Path, config: &Config) -> Result<TriggerResult> {
    let store = open_store(work_dir, config)?;
    let controller = open_controller(work_dir, config, store)?;
    let result = runtime()?.block_on(controller.start())?;
    Ok(result)
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
