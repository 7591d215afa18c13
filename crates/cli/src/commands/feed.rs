// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use ml_core::PublishedEntry;

use super::{open_diary, open_gateway, runtime};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::display::format_published;
use crate::error::{Error, Result};
use crate::sync::GatewayError;

pub fn run(limit: u32, output: OutputFormat) -> Result<()> {
    let (config, work_dir) = open_diary()?;
    let entries = run_impl(&work_dir, &config, limit)?;
    print!("{}", render(&entries, output)?);
    Ok(())
}

/// Fetch the most recent entries from the remote store.
pub(crate) fn run_impl(work_dir: &Path, config: &Config, limit: u32) -> Result<Vec<PublishedEntry>> {
    let remote = config.require_remote()?;
    let gateway = open_gateway(work_dir, config, remote);

    runtime()?.block_on(async {
        let result = gateway.fetch_recent(limit).await;
        gateway.disconnect().await;
        result.map_err(|e| match e {
            GatewayError::NoCredential => Error::NotLoggedIn,
            other => Error::Remote(other),
        })
    })
}

pub(crate) fn render(entries: &[PublishedEntry], output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(entries)?)),
        OutputFormat::Text => {
            if entries.is_empty() {
                return Ok("No entries yet.\n".to_string());
            }
            let mut out = String::new();
            for entry in entries {
                for line in format_published(entry) {
                    out.push_str(&line);
                    out.push('\n');
                }
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
