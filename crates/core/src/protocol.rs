// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages between the diary client and the entry store.
//!
//! The protocol is request/response:
//! - Client submits one entry at a time and waits for `accepted` or `rejected`
//!   carrying the same `local_id`
//! - Client may list the most recent entries, newest first

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::{PendingEntry, PublishedEntry};
use crate::id::LocalId;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Store an entry.
    ///
    /// Idempotent per `(installation_id, local_id)`.
    Submit {
        local_id: LocalId,
        installation_id: String,
        content: String,
        created_at_local: DateTime<Utc>,
        /// Bearer credential.
        #[serde(default)]
        token: Option<String>,
    },

    /// Request the most recent entries, newest first.
    List {
        #[serde(default)]
        token: Option<String>,
        limit: u32,
    },

    /// Ping message for keepalive.
    Ping {
        /// Client-chosen ID echoed in Pong.
        id: u64,
    },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The entry is durably stored.
    Accepted { entry: PublishedEntry },

    /// The entry was not stored.
    Rejected {
        local_id: LocalId,
        reason: String,
        /// False when resubmitting the same content can never succeed.
        retryable: bool,
    },

    /// Response to a List request.
    Entries { entries: Vec<PublishedEntry> },

    /// Pong response to client Ping.
    Pong {
        /// Echoed from the Ping message.
        id: u64,
    },

    /// Error message.
    Error {
        /// Human-readable error description.
        message: String,
    },
}

impl ClientMessage {
    /// Creates a Submit message for a pending entry.
    pub fn submit(entry: &PendingEntry, installation_id: &str, token: Option<String>) -> Self {
        ClientMessage::Submit {
            local_id: entry.local_id,
            installation_id: installation_id.to_string(),
            content: entry.content.clone(),
            created_at_local: entry.created_at_local,
            token,
        }
    }

    /// Creates a List message.
    pub fn list(token: Option<String>, limit: u32) -> Self {
        ClientMessage::List { token, limit }
    }

    /// Creates a Ping message.
    pub fn ping(id: u64) -> Self {
        ClientMessage::Ping { id }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Creates an Accepted message.
    pub fn accepted(entry: PublishedEntry) -> Self {
        ServerMessage::Accepted { entry }
    }

    /// Creates a Rejected message.
    pub fn rejected(local_id: LocalId, reason: impl Into<String>, retryable: bool) -> Self {
        ServerMessage::Rejected {
            local_id,
            reason: reason.into(),
            retryable,
        }
    }

    /// Creates an Entries message.
    pub fn entries(entries: Vec<PublishedEntry>) -> Self {
        ServerMessage::Entries { entries }
    }

    /// Creates a Pong message.
    pub fn pong(id: u64) -> Self {
        ServerMessage::Pong { id }
    }

    /// Creates an Error message.
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    /// Returns the local id this message answers, if it answers a submission.
    pub fn answers(&self) -> Option<LocalId> {
        match self {
            ServerMessage::Accepted { entry } => Some(entry.local_id),
            ServerMessage::Rejected { local_id, .. } => Some(*local_id),
            _ => None,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
