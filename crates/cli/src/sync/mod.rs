// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-first sync engine for diary entries.
//!
//! Entries are written to a durable local queue first and delivered to the
//! remote entry store later, exactly once per accepted entry.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Composer   │────►│PendingStore │◄────│  Executor   │
//! │ (enqueue)   │     │  (JSONL)    │     │  (drain)    │
//! └──────┬──────┘     └─────────────┘     └──────┬──────┘
//!        │ request_push                          │ submit
//!        ▼                                       ▼
//! ┌─────────────┐                         ┌─────────────┐
//! │ Controller  │◄── connectivity probe   │   Gateway   │
//! │(single pass)│                         │   (trait)   │
//! └─────────────┘                         └─────────────┘
//! ```
//!
//! # Features
//!
//! - Restart-surviving queue with FIFO order and in-flight recovery
//! - Per-entry exponential backoff; one stuck entry never blocks the rest
//! - Single-flight passes, also across processes sharing one queue
//! - Injectable storage, clock and gateway for testing

mod backoff;
mod compose;
mod connectivity;
mod controller;
mod executor;
mod gateway;
mod storage;
mod store;

pub use backoff::BackoffPolicy;
pub use compose::{Composed, Composer};
pub use connectivity::{probe_addr, probe_once, ConnectivityProbe};
pub use controller::{SyncController, SyncError, TriggerReason, TriggerResult};
pub use executor::{PassSummary, SyncExecutor};
pub use gateway::{
    CredentialSource, Gateway, GatewayConfig, GatewayError, GatewayResult, WebSocketGateway,
};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageLock};
pub use store::{Counts, PendingStore, StoreError, StoreResult, PENDING_KEY};

#[cfg(test)]
pub(crate) mod test_helpers;
