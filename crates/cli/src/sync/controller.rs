// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync trigger controller: decides when a pass runs and keeps it single-flight.
//!
//! The controller is a two-state machine, `idle → running → idle`. A trigger
//! that arrives while a pass is running is coalesced into a no-op. The
//! running state is only entered through [`PassGuard`], whose `Drop` returns
//! the controller to idle on every exit path.
//!
//! With a lock path configured, the guard also holds an exclusive file lock
//! so that passes stay single-flight across processes sharing one queue.
//! Holding the guard means no pass owns an `in_flight` entry, so every pass
//! first returns such orphans to `pending`.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use ml_core::PublishedEntry;

use super::backoff::BackoffPolicy;
use super::executor::{PassSummary, SyncExecutor};
use super::store::{PendingStore, StoreError};

const STATE_IDLE: u8 = 0;
const STATE_RUNNING: u8 = 1;

const LINK_UNKNOWN: u8 = 0;
const LINK_DOWN: u8 = 1;
const LINK_UP: u8 = 2;

/// Error type for controller operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The single-flight guard could not be acquired.
    #[error("sync guard fault: {0}")]
    Guard(#[source] io::Error),

    /// The pending store failed outside a pass.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Why a pass was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    Startup,
    ConnectivityRestored,
    AfterEnqueue,
    /// Periodic sweep for entries whose backoff has elapsed.
    Retry,
    Manual,
}

impl TriggerReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerReason::Startup => "startup",
            TriggerReason::ConnectivityRestored => "connectivity_restored",
            TriggerReason::AfterEnqueue => "after_enqueue",
            TriggerReason::Retry => "retry",
            TriggerReason::Manual => "manual",
        }
    }
}

impl fmt::Display for TriggerReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerResult {
    /// This trigger ran a pass.
    Ran(PassSummary),
    /// A pass was already running; nothing was done.
    Coalesced,
}

/// Scoped hold on the running state.
struct PassGuard<'a> {
    state: &'a AtomicU8,
    _file: Option<File>,
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.state.store(STATE_IDLE, Ordering::Release);
    }
}

/// Owns the single-flight state and starts passes.
pub struct SyncController {
    executor: SyncExecutor,
    state: AtomicU8,
    link: AtomicU8,
    lock_path: Option<PathBuf>,
    published_tx: broadcast::Sender<PublishedEntry>,
}

impl SyncController {
    pub fn new(executor: SyncExecutor) -> Self {
        let (published_tx, _) = broadcast::channel(256);
        SyncController {
            executor,
            state: AtomicU8::new(STATE_IDLE),
            link: AtomicU8::new(LINK_UNKNOWN),
            lock_path: None,
            published_tx,
        }
    }

    /// Also hold an exclusive lock on `path` for the duration of each pass.
    pub fn with_process_lock(mut self, path: impl Into<PathBuf>) -> Self {
        self.lock_path = Some(path.into());
        self
    }

    pub fn store(&self) -> &Arc<PendingStore> {
        self.executor.store()
    }

    pub fn backoff(&self) -> BackoffPolicy {
        self.executor.backoff()
    }

    pub fn is_running(&self) -> bool {
        self.state.load(Ordering::Acquire) == STATE_RUNNING
    }

    /// Receive every entry accepted by later passes.
    pub fn subscribe_published(&self) -> broadcast::Receiver<PublishedEntry> {
        self.published_tx.subscribe()
    }

    /// Application start: revert interrupted attempts, then flush the queue.
    ///
    /// Recovery runs under the guard, so a pass running in another process
    /// never has its in-flight entries reverted underneath it.
    pub async fn start(&self) -> Result<TriggerResult, SyncError> {
        self.run_guarded(TriggerReason::Startup, true).await
    }

    /// Start a pass unless one is already running.
    pub async fn trigger(&self, reason: TriggerReason) -> Result<TriggerResult, SyncError> {
        self.run_guarded(reason, false).await
    }

    /// Feed one connectivity observation.
    ///
    /// Fires a pass only on a transition to connected; the first observation
    /// counts as a transition when it reports connected.
    pub async fn on_connectivity(
        &self,
        connected: bool,
    ) -> Option<Result<TriggerResult, SyncError>> {
        let next = if connected { LINK_UP } else { LINK_DOWN };
        let previous = self.link.swap(next, Ordering::AcqRel);
        if previous != next {
            debug!(connected, "connectivity changed");
        }
        if connected && previous != LINK_UP {
            Some(self.trigger(TriggerReason::ConnectivityRestored).await)
        } else {
            None
        }
    }

    /// Opportunistic push after an enqueue, off the caller's path.
    ///
    /// Returns `None` when no tokio runtime is available. Failures are
    /// logged and otherwise ignored; the connectivity trigger retries later.
    pub fn request_push(self: Arc<Self>) -> Option<JoinHandle<Option<TriggerResult>>> {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                debug!("no runtime for opportunistic push");
                return None;
            }
        };
        Some(handle.spawn(async move {
            match self.trigger(TriggerReason::AfterEnqueue).await {
                Ok(result) => Some(result),
                Err(e) => {
                    debug!(error = %e, "opportunistic push failed");
                    None
                }
            }
        }))
    }

    async fn run_guarded(
        &self,
        reason: TriggerReason,
        recover: bool,
    ) -> Result<TriggerResult, SyncError> {
        let guard = match self.try_acquire() {
            Ok(Some(guard)) => guard,
            Ok(None) => {
                debug!(%reason, "pass already running, trigger coalesced");
                return Ok(TriggerResult::Coalesced);
            }
            Err(e) => {
                warn!(%reason, error = %e, "could not acquire sync guard");
                return Err(e);
            }
        };

        if recover {
            match self.store().recover_after_restart() {
                Ok(0) => {}
                Ok(reverted) => info!(reverted, "interrupted submissions returned to pending"),
                Err(e) => {
                    warn!(error = %e, "restart recovery failed");
                    return Err(e.into());
                }
            }
        } else if self.store().counts().in_flight > 0 {
            // With the guard held no pass owns them.
            match self.store().recover_after_restart() {
                Ok(reverted) => info!(reverted, "orphaned submissions returned to pending"),
                Err(e) => warn!(error = %e, "could not recover orphaned submissions"),
            }
        }

        debug!(%reason, "sync pass starting");
        let summary = self.executor.run_pass().await;
        drop(guard);

        for entry in &summary.published {
            // No receivers is fine.
            let _ = self.published_tx.send(entry.clone());
        }
        Ok(TriggerResult::Ran(summary))
    }

    fn try_acquire(&self) -> Result<Option<PassGuard<'_>>, SyncError> {
        if self
            .state
            .compare_exchange(STATE_IDLE, STATE_RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(None);
        }
        let mut guard = PassGuard {
            state: &self.state,
            _file: None,
        };

        if let Some(path) = &self.lock_path {
            match try_lock_file(path) {
                Ok(Some(file)) => guard._file = Some(file),
                Ok(None) => return Ok(None),
                Err(e) => return Err(SyncError::Guard(e)),
            }
        }
        Ok(Some(guard))
    }
}

/// Try to take an exclusive lock without blocking.
///
/// Returns `None` when another process holds it.
fn try_lock_file(path: &Path) -> io::Result<Option<File>> {
    use fs2::FileExt;

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;

    match file.try_lock_exclusive() {
        Ok(()) => Ok(Some(file)),
        Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => Ok(None),
        Err(e) => Err(e),
    }
}
