// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Entry creation path: optimistic local write, then an asynchronous push.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::warn;

use ml_core::LocalId;

use super::controller::{SyncController, TriggerResult};
use super::store::PendingStore;
use crate::error::{Error, Result};

/// A submitted entry.
#[derive(Debug)]
pub struct Composed {
    pub local_id: LocalId,
    /// False when the entry is held in memory only.
    pub durable: bool,
    /// The opportunistic push, when one was started.
    pub push: Option<JoinHandle<Option<TriggerResult>>>,
}

/// Turns user submissions into pending entries.
pub struct Composer {
    store: Arc<PendingStore>,
    controller: Option<Arc<SyncController>>,
}

impl Composer {
    pub fn new(store: Arc<PendingStore>) -> Self {
        Composer {
            store,
            controller: None,
        }
    }

    /// Request a push through `controller` after every submission.
    pub fn with_controller(mut self, controller: Arc<SyncController>) -> Self {
        self.controller = Some(controller);
        self
    }

    /// Queue `content` as a new entry. Never waits on the network.
    pub fn submit(&self, content: &str) -> Result<Composed> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::EmptyEntry);
        }
        let created_at_local = Utc::now();

        let (local_id, durable) = match self.store.enqueue(content, created_at_local) {
            Ok(local_id) => (local_id, true),
            Err(e) if e.is_unavailable() => {
                warn!(error = %e, "pending store unavailable, keeping entry in memory");
                (self.store.enqueue_volatile(content, created_at_local), false)
            }
            Err(e) => return Err(e.into()),
        };

        let push = self
            .controller
            .as_ref()
            .and_then(|controller| Arc::clone(controller).request_push());

        Ok(Composed {
            local_id,
            durable,
            push,
        })
    }
}
