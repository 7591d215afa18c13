// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pending store: the durable, ordered queue of entries awaiting acceptance.
//!
//! The queue is one JSONL document (one [`PendingEntry`] per line, insertion
//! order). Every mutation reloads the document, applies the change and
//! saves it back while holding the storage lock, so a CLI process appending
//! and a watcher draining never lose each other's writes.
//!
//! When the medium cannot be written, entries are kept in a process-local
//! volatile list. They are listed after the durable entries and folded into
//! the document by the next successful mutation. Volatile entries are lost
//! if the process exits first.
//!
//! Lines that do not decode are never listed, but every rewrite carries them
//! forward verbatim so a bad line cannot cost the user an entry.

use std::io;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use ml_core::{ClockSource, EntryStatus, IdGenerator, LocalId, PendingEntry, SystemClock};

use super::storage::Storage;

/// Storage key of the queue document.
pub const PENDING_KEY: &str = "pending.jsonl";

/// Error type for pending store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The durable medium could not be read or written.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] io::Error),

    /// An entry could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("entry not found: {0}")]
    NotFound(LocalId),

    /// Only permanently failed entries may be discarded.
    #[error("entry {id} is {status}; only failed_permanent entries can be discarded")]
    NotDiscardable { id: LocalId, status: EntryStatus },
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::StorageUnavailable(_))
    }
}

/// Result type for pending store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Number of entries per status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub pending: usize,
    pub in_flight: usize,
    pub failed_permanent: usize,
    /// Entries held only in memory.
    pub volatile: usize,
}

impl Counts {
    pub fn total(&self) -> usize {
        self.pending + self.in_flight + self.failed_permanent
    }
}

/// The queue document as loaded.
#[derive(Default)]
struct Document {
    entries: Vec<PendingEntry>,
    /// Raw lines that failed to decode.
    undecodable: Vec<String>,
}

/// Durable queue of entries awaiting remote acknowledgment.
pub struct PendingStore {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn ClockSource>,
    ids: IdGenerator<Arc<dyn ClockSource>>,
    /// Serializes mutations within this process.
    write: Mutex<()>,
    volatile: Mutex<Vec<PendingEntry>>,
    revision: watch::Sender<u64>,
}

impl PendingStore {
    /// Create a store over `storage`, minting ids with the given node tag.
    pub fn new(storage: Arc<dyn Storage>, node: u32) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock), node)
    }

    /// Create a store with a custom clock (for testing).
    pub fn with_clock(storage: Arc<dyn Storage>, clock: Arc<dyn ClockSource>, node: u32) -> Self {
        let (revision, _) = watch::channel(0);
        PendingStore {
            storage,
            ids: IdGenerator::with_clock(Arc::clone(&clock), node),
            clock,
            write: Mutex::new(()),
            volatile: Mutex::new(Vec::new()),
            revision,
        }
    }

    /// Current wall clock in milliseconds, from the store's clock.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Append a new pending entry.
    ///
    /// Fails with [`StoreError::StorageUnavailable`] if the medium cannot be
    /// read or written; nothing is kept in that case.
    pub fn enqueue(&self, content: &str, created_at_local: DateTime<Utc>) -> StoreResult<LocalId> {
        let local_id = self.mutate(|entries| {
            // Another writer may have minted ids this generator has not seen.
            if let Some(newest) = entries.iter().map(|e| e.local_id).max() {
                self.ids.observe(newest);
            }
            let local_id = self.ids.next_id();
            entries.push(PendingEntry::new(
                local_id,
                content.to_string(),
                created_at_local,
            ));
            Ok(local_id)
        })?;
        debug!(%local_id, "enqueued entry");
        Ok(local_id)
    }

    /// Keep an entry in memory only, for use after `enqueue` failed.
    pub fn enqueue_volatile(&self, content: &str, created_at_local: DateTime<Utc>) -> LocalId {
        let local_id = self.ids.next_id();
        let entry = PendingEntry::new(local_id, content.to_string(), created_at_local);
        self.lock_volatile().push(entry);
        warn!(%local_id, "entry held in memory only until storage recovers");
        self.bump();
        local_id
    }

    /// Entries that are not permanently failed, in insertion order.
    ///
    /// A read failure is treated as an empty store.
    pub fn list_pending(&self) -> Vec<PendingEntry> {
        self.all()
            .into_iter()
            .filter(|e| e.status != EntryStatus::FailedPermanent)
            .collect()
    }

    /// Every entry including permanently failed ones, in insertion order.
    pub fn all(&self) -> Vec<PendingEntry> {
        let mut entries = match self.read_document() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "pending store unreadable, treating as empty");
                Vec::new()
            }
        };
        entries.extend(self.lock_volatile().iter().cloned());
        entries
    }

    pub fn get(&self, local_id: LocalId) -> Option<PendingEntry> {
        self.all().into_iter().find(|e| e.local_id == local_id)
    }

    pub fn counts(&self) -> Counts {
        let mut counts = Counts {
            volatile: self.lock_volatile().len(),
            ..Counts::default()
        };
        for entry in self.all() {
            match entry.status {
                EntryStatus::Pending => counts.pending += 1,
                EntryStatus::InFlight => counts.in_flight += 1,
                EntryStatus::FailedPermanent => counts.failed_permanent += 1,
            }
        }
        counts
    }

    /// Watch the store's revision; it changes after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn mark_in_flight(&self, local_id: LocalId) -> StoreResult<()> {
        self.update(local_id, |entry, _| {
            entry.status = EntryStatus::InFlight;
        })
    }

    /// Remove an entry the remote store has accepted.
    pub fn mark_succeeded(&self, local_id: LocalId) -> StoreResult<()> {
        self.mutate(|entries| {
            let before = entries.len();
            entries.retain(|e| e.local_id != local_id);
            if entries.len() == before {
                return Err(StoreError::NotFound(local_id));
            }
            Ok(())
        })
    }

    /// Return an entry to `pending` after a retryable failure.
    pub fn mark_retryable(&self, local_id: LocalId, error: &str) -> StoreResult<()> {
        self.update(local_id, |entry, now| {
            entry.status = EntryStatus::Pending;
            entry.attempt_count = entry.attempt_count.saturating_add(1);
            entry.last_error = Some(error.to_string());
            entry.last_attempt_ms = Some(now);
        })
    }

    /// Park an entry as `failed_permanent`; it is never submitted again.
    pub fn mark_permanent_failure(&self, local_id: LocalId, error: &str) -> StoreResult<()> {
        self.update(local_id, |entry, now| {
            entry.status = EntryStatus::FailedPermanent;
            entry.attempt_count = entry.attempt_count.saturating_add(1);
            entry.last_error = Some(error.to_string());
            entry.last_attempt_ms = Some(now);
        })
    }

    /// Remove a permanently failed entry at the user's request.
    pub fn discard(&self, local_id: LocalId) -> StoreResult<PendingEntry> {
        self.mutate(|entries| {
            let pos = entries
                .iter()
                .position(|e| e.local_id == local_id)
                .ok_or(StoreError::NotFound(local_id))?;
            let status = entries[pos].status;
            if status != EntryStatus::FailedPermanent {
                return Err(StoreError::NotDiscardable {
                    id: local_id,
                    status,
                });
            }
            Ok(entries.remove(pos))
        })
    }

    /// Return one `in_flight` entry to `pending` after its attempt was
    /// abandoned without an outcome.
    ///
    /// No attempt is counted. An entry in any other status is left alone.
    pub fn release_in_flight(&self, local_id: LocalId) -> StoreResult<()> {
        self.update(local_id, |entry, _| {
            if entry.status == EntryStatus::InFlight {
                entry.status = EntryStatus::Pending;
            }
        })
    }

    /// Revert every `in_flight` entry to `pending`.
    ///
    /// Run once at process start; an attempt interrupted by process death has
    /// an unknown outcome and must be retried. Returns the number reverted.
    pub fn recover_after_restart(&self) -> StoreResult<usize> {
        self.mutate(|entries| {
            let mut reverted = 0;
            for entry in entries
                .iter_mut()
                .filter(|e| e.status == EntryStatus::InFlight)
            {
                entry.status = EntryStatus::Pending;
                reverted += 1;
            }
            Ok(reverted)
        })
    }

    fn update(
        &self,
        local_id: LocalId,
        f: impl FnOnce(&mut PendingEntry, u64),
    ) -> StoreResult<()> {
        let now = self.now_ms();
        self.mutate(|entries| {
            let entry = entries
                .iter_mut()
                .find(|e| e.local_id == local_id)
                .ok_or(StoreError::NotFound(local_id))?;
            f(entry, now);
            Ok(())
        })
    }

    /// Load, fold in volatile entries, apply `f`, save.
    ///
    /// Nothing is saved when `f` fails. Volatile entries are cleared only
    /// once the save succeeds.
    fn mutate<T>(&self, f: impl FnOnce(&mut Vec<PendingEntry>) -> StoreResult<T>) -> StoreResult<T> {
        let _write = self.write.lock().unwrap_or_else(|e| e.into_inner());
        let _lock = self
            .storage
            .lock(PENDING_KEY)
            .map_err(StoreError::StorageUnavailable)?;

        let Document {
            mut entries,
            undecodable,
        } = self.load_document().map_err(StoreError::StorageUnavailable)?;

        let mut volatile = self.lock_volatile();
        let folded = volatile.len();
        entries.extend(volatile.iter().cloned());

        let value = f(&mut entries)?;
        self.write_document(&undecodable, &entries)?;

        volatile.clear();
        drop(volatile);
        if folded > 0 {
            debug!(folded, "volatile entries persisted");
        }
        self.bump();
        Ok(value)
    }

    fn read_document(&self) -> io::Result<Vec<PendingEntry>> {
        Ok(self.load_document()?.entries)
    }

    fn load_document(&self) -> io::Result<Document> {
        let mut doc = Document::default();
        let Some(text) = self.storage.load(PENDING_KEY)? else {
            return Ok(doc);
        };

        for (n, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<PendingEntry>(line) {
                Ok(entry) => doc.entries.push(entry),
                Err(e) => {
                    warn!(line = n + 1, error = %e, "undecodable pending entry kept as is");
                    doc.undecodable.push(line.to_string());
                }
            }
        }
        Ok(doc)
    }

    /// Undecodable lines go first, in their original order.
    fn write_document(&self, undecodable: &[String], entries: &[PendingEntry]) -> StoreResult<()> {
        let mut doc = String::new();
        for line in undecodable {
            doc.push_str(line);
            doc.push('\n');
        }
        for entry in entries {
            doc.push_str(&serde_json::to_string(entry)?);
            doc.push('\n');
        }
        self.storage
            .save(PENDING_KEY, &doc)
            .map_err(StoreError::StorageUnavailable)
    }

    fn lock_volatile(&self) -> std::sync::MutexGuard<'_, Vec<PendingEntry>> {
        self.volatile.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }
}
