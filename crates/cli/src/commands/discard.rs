// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use ml_core::PendingEntry;

use super::{open_diary, open_store};
use crate::config::Config;
use crate::display::preview;
use crate::error::Result;
use crate::id::parse_local_id;

pub fn run(id: &str) -> Result<()> {
    let (config, work_dir) = open_diary()?;
    let entry = run_impl(&work_dir, &config, id)?;
    println!("Discarded {}: {}", entry.local_id, preview(&entry.content, 48));
    Ok(())
}

/// Remove a permanently rejected entry from the store.
pub(crate) fn run_impl(work_dir: &Path, config: &Config, id: &str) -> Result<PendingEntry> {
    let local_id = parse_local_id(id)?;
    let store = open_store(work_dir, config)?;
    Ok(store.discard(local_id)?)
}

#[cfg(test)]
#[path = "discard_tests.rs"]
mod tests;
