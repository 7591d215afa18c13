// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Diary entry types.
//!
//! A [`PendingEntry`] lives on the device until the remote store accepts it;
//! from then on it is known by its [`PublishedEntry`] identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::id::LocalId;

/// Delivery status of an entry in the pending store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Waiting for a sync pass.
    Pending,
    /// A submission attempt is in progress. Never valid across a restart.
    InFlight,
    /// The remote store refused the entry for good. Kept for diagnostics.
    FailedPermanent,
}

impl EntryStatus {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "pending",
            EntryStatus::InFlight => "in_flight",
            EntryStatus::FailedPermanent => "failed_permanent",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(EntryStatus::Pending),
            "in_flight" | "in-flight" => Ok(EntryStatus::InFlight),
            "failed_permanent" | "failed-permanent" => Ok(EntryStatus::FailedPermanent),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// An entry created on the device and not yet confirmed by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEntry {
    pub local_id: LocalId,
    pub content: String,
    pub created_at_local: DateTime<Utc>,
    #[serde(default)]
    pub attempt_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// Wall clock (ms) of the last submission attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_attempt_ms: Option<u64>,
    pub status: EntryStatus,
}

impl PendingEntry {
    /// Creates a fresh entry that has never been attempted.
    pub fn new(local_id: LocalId, content: String, created_at_local: DateTime<Utc>) -> Self {
        PendingEntry {
            local_id,
            content,
            created_at_local,
            attempt_count: 0,
            last_error: None,
            last_attempt_ms: None,
            status: EntryStatus::Pending,
        }
    }

    /// True when a sync pass may pick this entry up (backoff aside).
    pub fn is_actionable(&self) -> bool {
        self.status == EntryStatus::Pending
    }
}

/// Mood bucket derived from a sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Good,
    Neutral,
    Bad,
    Sad,
}

impl Mood {
    /// Buckets a sentiment score.
    pub fn from_score(score: i32) -> Self {
        if score > 2 {
            Mood::Happy
        } else if score > 0 {
            Mood::Good
        } else if score < -2 {
            Mood::Sad
        } else if score < 0 {
            Mood::Bad
        } else {
            Mood::Neutral
        }
    }

    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Good => "good",
            Mood::Neutral => "neutral",
            Mood::Bad => "bad",
            Mood::Sad => "sad",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Mood {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "happy" => Ok(Mood::Happy),
            "good" => Ok(Mood::Good),
            "neutral" => Ok(Mood::Neutral),
            "bad" => Ok(Mood::Bad),
            "sad" => Ok(Mood::Sad),
            _ => Err(Error::InvalidMood(s.to_string())),
        }
    }
}

/// An entry as stored by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedEntry {
    pub server_id: i64,
    pub local_id: LocalId,
    pub content: String,
    pub mood: Mood,
    pub score: i32,
    pub created_at_local: DateTime<Utc>,
    pub server_timestamp: DateTime<Utc>,
}

/// Result of one submission to the remote store.
///
/// There are exactly three outcomes; callers must handle each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Durably stored remotely.
    Accepted(PublishedEntry),
    /// Can never succeed as submitted. Must not be retried.
    RejectedPermanent(String),
    /// Network, timeout, auth, or server-side trouble. Retry later.
    RejectedTransient(String),
}

impl Outcome {
    /// True for outcomes that warrant another attempt on a later pass.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Outcome::RejectedTransient(_))
    }

    /// Shorthand for a transient rejection.
    pub fn transient(reason: impl Into<String>) -> Self {
        Outcome::RejectedTransient(reason.into())
    }

    /// Shorthand for a permanent rejection.
    pub fn permanent(reason: impl Into<String>) -> Self {
        Outcome::RejectedPermanent(reason.into())
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
