// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use serde::Serialize;

use ml_core::PendingEntry;

use super::{open_diary, open_store};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::display::{failed_hint, format_counts, format_pending_line};
use crate::error::Result;
use crate::sync::Counts;

/// JSON shape of `mood pending -o json`.
#[derive(Serialize)]
struct PendingReport<'a> {
    counts: Counts,
    entries: &'a [PendingEntry],
}

pub fn run(all: bool, output: OutputFormat) -> Result<()> {
    let (config, work_dir) = open_diary()?;
    print!("{}", run_impl(&work_dir, &config, all, output)?);
    Ok(())
}

/// Internal implementation that returns the rendered listing.
pub(crate) fn run_impl(
    work_dir: &Path,
    config: &Config,
    all: bool,
    output: OutputFormat,
) -> Result<String> {
    let store = open_store(work_dir, config)?;
    let entries = if all {
        store.all()
    } else {
        store.list_pending()
    };
    render(&entries, &store.counts(), all, output)
}

pub(crate) fn render(
    entries: &[PendingEntry],
    counts: &Counts,
    all: bool,
    output: OutputFormat,
) -> Result<String> {
    match output {
        OutputFormat::Json => {
            let report = PendingReport {
                counts: *counts,
                entries,
            };
            Ok(format!("{}\n", serde_json::to_string_pretty(&report)?))
        }
        OutputFormat::Text => {
            let mut out = String::new();
            if entries.is_empty() {
                out.push_str("Nothing waiting to be delivered.\n");
            }
            for entry in entries {
                out.push_str(&format_pending_line(entry));
                out.push('\n');
            }
            if counts.total() + counts.volatile > 0 {
                out.push_str(&format!("\n{}\n", format_counts(counts)));
            }
            if let Some(hint) = failed_hint(counts, all) {
                out.push_str(&format!("{}\n", hint));
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
