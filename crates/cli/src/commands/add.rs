// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use ml_core::LocalId;

use super::{open_controller, open_diary, open_store, runtime};
use crate::config::Config;
use crate::error::Result;
use crate::sync::{Composed, Composer, PendingStore, SyncController, TriggerResult};

/// What happened to the opportunistic push after an add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PushOutcome {
    /// No push was attempted (local-only diary or `--no-push`).
    Skipped,
    /// The entry reached the remote store.
    Delivered,
    /// The entry stays queued for a later sync.
    Queued(String),
}

#[derive(Debug)]
pub(crate) struct Added {
    pub local_id: LocalId,
    pub durable: bool,
    pub push: PushOutcome,
}

pub fn run(text: Vec<String>, no_push: bool) -> Result<()> {
    let (config, work_dir) = open_diary()?;
    let added = run_impl(&work_dir, &config, &text.join(" "), no_push)?;

    println!("Added {}", added.local_id);
    if !added.durable {
        eprintln!("warning: the queue could not be written; the entry is held in memory only");
    }
    match added.push {
        PushOutcome::Skipped if !config.is_remote_mode() => println!("Queued (no remote configured)"),
        PushOutcome::Skipped => println!("Queued"),
        PushOutcome::Delivered => println!("Delivered"),
        PushOutcome::Queued(reason) => println!("Queued for later: {}", reason),
    }
    Ok(())
}

/// Internal implementation that accepts the diary location for testing.
pub(crate) fn run_impl(
    work_dir: &Path,
    config: &Config,
    content: &str,
    no_push: bool,
) -> Result<Added> {
    let store = open_store(work_dir, config)?;

    let remote = match &config.remote {
        Some(remote) if !no_push => remote,
        _ => {
            let composed = Composer::new(store).submit(content)?;
            return Ok(Added {
                local_id: composed.local_id,
                durable: composed.durable,
                push: PushOutcome::Skipped,
            });
        }
    };

    let controller = open_controller(work_dir, config, Arc::clone(&store))?;
    let wait = remote.connect_timeout() + remote.response_timeout();

    runtime()?.block_on(add_and_push(store, controller, content, wait))
}

async fn add_and_push(
    store: Arc<PendingStore>,
    controller: Arc<SyncController>,
    content: &str,
    wait: Duration,
) -> Result<Added> {
    let Composed {
        local_id,
        durable,
        push,
    } = Composer::new(Arc::clone(&store))
        .with_controller(controller)
        .submit(content)?;

    let push = match push {
        Some(handle) => await_push(&store, local_id, handle, wait).await,
        None => PushOutcome::Skipped,
    };
    Ok(Added {
        local_id,
        durable,
        push,
    })
}

/// Wait up to `wait` for the push, then report where the entry ended up.
///
/// A push still running at the deadline is cancelled and awaited, so its
/// interrupted submission is back in `pending` before this returns.
async fn await_push(
    store: &PendingStore,
    local_id: LocalId,
    mut handle: JoinHandle<Option<TriggerResult>>,
    wait: Duration,
) -> PushOutcome {
    match tokio::time::timeout(wait, &mut handle).await {
        Err(_) => {
            handle.abort();
            if let Err(e) = handle.await {
                debug!(error = %e, "push cancelled");
            }
            PushOutcome::Queued("the remote store did not answer in time".to_string())
        }
        Ok(Ok(Some(TriggerResult::Coalesced))) => {
            PushOutcome::Queued("another sync is in progress".to_string())
        }
        Ok(_) => match store.get(local_id) {
            None => PushOutcome::Delivered,
            Some(entry) => PushOutcome::Queued(
                entry
                    .last_error
                    .unwrap_or_else(|| "not attempted".to_string()),
            ),
        },
    }
}

#[cfg(test)]
#[path = "add_tests.rs"]
mod tests;
