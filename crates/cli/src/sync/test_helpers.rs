// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Notify;

use ml_core::{analyze, ClockSource, Outcome, PendingEntry, PublishedEntry};

use super::backoff::BackoffPolicy;
use super::controller::SyncController;
use super::executor::SyncExecutor;
use super::gateway::Gateway;
use super::storage::{MemoryStorage, Storage};
use super::store::PendingStore;

/// Start of the mock timeline, in wall-clock milliseconds.
pub const T0: u64 = 1_700_000_000_000;

/// Backoff used by tests: 1s base, 60s cap.
pub fn test_backoff() -> BackoffPolicy {
    BackoffPolicy::new(Duration::from_secs(1), Duration::from_secs(60))
}

/// Manually advanced clock.
pub struct MockClock {
    now_ms: AtomicU64,
}

impl MockClock {
    pub fn new(now_ms: u64) -> Self {
        MockClock {
            now_ms: AtomicU64::new(now_ms),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now_ms
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl ClockSource for MockClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// What the mock gateway does with one submission.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Accept,
    Permanent(&'static str),
    Transient(&'static str),
    Panic,
}

/// Gateway scripted per entry content; unscripted entries are accepted.
#[derive(Default)]
pub struct MockGateway {
    script: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<String>>,
    next_server_id: AtomicI64,
    gate: Mutex<Option<Arc<Notify>>>,
    entered: Arc<Notify>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue replies for submissions of `content`, used in order.
    pub fn script(&self, content: &str, replies: &[Reply]) {
        self.script
            .lock()
            .unwrap()
            .entry(content.to_string())
            .or_default()
            .extend(replies.iter().cloned());
    }

    /// Contents submitted so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Make every submission wait until `gate` is notified.
    pub fn hold_with(&self, gate: Arc<Notify>) {
        *self.gate.lock().unwrap() = Some(gate);
    }

    /// Notified each time a submission starts.
    pub fn entered(&self) -> Arc<Notify> {
        Arc::clone(&self.entered)
    }

    fn next_reply(&self, content: &str) -> Reply {
        self.script
            .lock()
            .unwrap()
            .get_mut(content)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Reply::Accept)
    }

    fn publish(&self, entry: &PendingEntry) -> PublishedEntry {
        let emotion = analyze(&entry.content);
        PublishedEntry {
            server_id: self.next_server_id.fetch_add(1, Ordering::SeqCst) + 1,
            local_id: entry.local_id,
            content: entry.content.clone(),
            mood: emotion.mood,
            score: emotion.score,
            created_at_local: entry.created_at_local,
            server_timestamp: Utc::now(),
        }
    }
}

impl Gateway for MockGateway {
    fn submit<'a>(
        &'a self,
        entry: &'a PendingEntry,
    ) -> Pin<Box<dyn Future<Output = Outcome> + Send + 'a>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(entry.content.clone());
            self.entered.notify_one();

            let gate = self.gate.lock().unwrap().clone();
            if let Some(gate) = gate {
                gate.notified().await;
            }

            match self.next_reply(&entry.content) {
                Reply::Accept => Outcome::Accepted(self.publish(entry)),
                Reply::Permanent(reason) => Outcome::permanent(reason),
                Reply::Transient(reason) => Outcome::transient(reason),
                Reply::Panic => panic!("mock gateway panic for {}", entry.content),
            }
        })
    }
}

/// Everything a sync test needs, wired together over in-memory storage.
pub struct Harness {
    pub storage: Arc<MemoryStorage>,
    pub clock: Arc<MockClock>,
    pub store: Arc<PendingStore>,
    pub gateway: Arc<MockGateway>,
    pub controller: Arc<SyncController>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStorage::new()))
    }

    /// Build over existing storage, as a restarted process would.
    pub fn with_storage(storage: Arc<MemoryStorage>) -> Self {
        let clock = Arc::new(MockClock::new(T0));
        let store = Arc::new(PendingStore::with_clock(
            Arc::clone(&storage) as Arc<dyn Storage>,
            Arc::clone(&clock) as Arc<dyn ClockSource>,
            7,
        ));
        let gateway = Arc::new(MockGateway::new());
        let executor = SyncExecutor::new(
            Arc::clone(&store),
            Arc::clone(&gateway) as Arc<dyn Gateway>,
            test_backoff(),
        );
        let controller = Arc::new(SyncController::new(executor));
        Harness {
            storage,
            clock,
            store,
            gateway,
            controller,
        }
    }

    /// Enqueue entries durably, returning their ids in order.
    pub fn enqueue_all(&self, contents: &[&str]) -> Vec<ml_core::LocalId> {
        contents
            .iter()
            .map(|c| self.store.enqueue(c, Utc::now()).unwrap())
            .collect()
    }
}
