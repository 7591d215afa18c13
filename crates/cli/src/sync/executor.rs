// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync executor: drains the pending store against the gateway, one pass at a time.
//!
//! A pass works on a snapshot of the actionable entries taken at pass start,
//! in FIFO order. Entries enqueued mid-pass wait for the next pass. Each
//! entry is attempted at most once per pass and its outcome becomes a status
//! transition; nothing that happens to one entry aborts the pass.
//!
//! A pass dropped mid-submission (its task cancelled or its runtime shut
//! down) returns the interrupted entry to `pending` on the way out.
//! A gateway panic is caught and treated as a transient failure. Release
//! builds abort on panic instead, and the next start's recovery reverts
//! whatever was left `in_flight`.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tracing::{debug, info, warn};

use ml_core::{LocalId, Outcome, PendingEntry, PublishedEntry};

use super::backoff::BackoffPolicy;
use super::gateway::Gateway;
use super::store::{PendingStore, StoreError};

/// What one pass did. For observability only.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PassSummary {
    pub accepted: usize,
    pub transient_failed: usize,
    pub permanent_failed: usize,
    /// Entries skipped because their backoff had not elapsed.
    pub deferred: usize,
    /// Identities assigned by the remote store to the accepted entries.
    pub published: Vec<PublishedEntry>,
}

impl PassSummary {
    /// Number of submissions made.
    pub fn attempted(&self) -> usize {
        self.accepted + self.transient_failed + self.permanent_failed
    }
}

impl fmt::Display for PassSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} accepted, {} will retry, {} failed, {} waiting for backoff",
            self.accepted, self.transient_failed, self.permanent_failed, self.deferred
        )
    }
}

/// Holds one entry `in_flight` for the length of a submission.
///
/// Dropped while still armed, it returns the entry to `pending`.
struct InFlight<'a> {
    store: &'a PendingStore,
    local_id: LocalId,
    armed: bool,
}

impl InFlight<'_> {
    fn settle(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match self.store.release_in_flight(self.local_id) {
            Ok(()) => debug!(local_id = %self.local_id, "interrupted submission returned to pending"),
            Err(e) => warn!(local_id = %self.local_id, error = %e, "could not release interrupted submission"),
        }
    }
}

/// Runs single drain passes.
pub struct SyncExecutor {
    store: Arc<PendingStore>,
    gateway: Arc<dyn Gateway>,
    backoff: BackoffPolicy,
}

impl SyncExecutor {
    pub fn new(store: Arc<PendingStore>, gateway: Arc<dyn Gateway>, backoff: BackoffPolicy) -> Self {
        SyncExecutor {
            store,
            gateway,
            backoff,
        }
    }

    pub fn store(&self) -> &Arc<PendingStore> {
        &self.store
    }

    pub fn backoff(&self) -> BackoffPolicy {
        self.backoff
    }

    /// Run one pass. Callers must hold the single-flight guard.
    pub async fn run_pass(&self) -> PassSummary {
        let snapshot: Vec<PendingEntry> = self
            .store
            .list_pending()
            .into_iter()
            .filter(PendingEntry::is_actionable)
            .collect();
        let now = self.store.now_ms();
        let mut summary = PassSummary::default();

        debug!(entries = snapshot.len(), "pass snapshot taken");

        for entry in &snapshot {
            if !self.backoff.is_eligible(entry, now) {
                debug!(
                    local_id = %entry.local_id,
                    wait_ms = self.backoff.remaining_ms(entry, now),
                    "entry still in backoff"
                );
                summary.deferred += 1;
                continue;
            }
            self.attempt(entry, &mut summary).await;
        }

        if summary.attempted() > 0 {
            self.gateway.end_pass().await;
        }

        info!(
            accepted = summary.accepted,
            transient_failed = summary.transient_failed,
            permanent_failed = summary.permanent_failed,
            deferred = summary.deferred,
            "sync pass complete"
        );
        summary
    }

    async fn attempt(&self, entry: &PendingEntry, summary: &mut PassSummary) {
        let local_id = entry.local_id;

        match self.store.mark_in_flight(local_id) {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => {
                debug!(%local_id, "entry left the store before its attempt");
                return;
            }
            Err(e) => warn!(%local_id, error = %e, "could not mark entry in flight"),
        }
        let in_flight = InFlight {
            store: &self.store,
            local_id,
            armed: true,
        };

        // Only reached with unwinding panics; release builds abort.
        let outcome = AssertUnwindSafe(self.gateway.submit(entry))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Outcome::transient("gateway panicked during submit"));
        in_flight.settle();

        let transition = match outcome {
            Outcome::Accepted(published) => {
                debug!(%local_id, server_id = published.server_id, mood = %published.mood, "entry accepted");
                summary.accepted += 1;
                summary.published.push(published);
                self.store.mark_succeeded(local_id)
            }
            Outcome::RejectedPermanent(reason) => {
                warn!(%local_id, %reason, "entry rejected permanently");
                summary.permanent_failed += 1;
                self.store.mark_permanent_failure(local_id, &reason)
            }
            Outcome::RejectedTransient(reason) => {
                debug!(%local_id, %reason, attempts = entry.attempt_count.saturating_add(1), "entry will be retried");
                summary.transient_failed += 1;
                self.store.mark_retryable(local_id, &reason)
            }
        };

        if let Err(e) = transition {
            warn!(%local_id, error = %e, "could not record submission outcome");
        }
    }
}
