// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Locally generated entry identifiers.
//!
//! A [`LocalId`] is minted on the device at the moment an entry is written,
//! long before the remote store has seen it. It needs no persisted counter:
//! uniqueness comes from the wall clock, a logical counter that absorbs clock
//! stalls, and a per-process node tag.
//!
//! Format: `{wall_ms}-{counter}-{node}`
//!
//! Ordering rules:
//! 1. Higher wall_ms wins
//! 2. If wall_ms equal, higher counter wins
//! 3. If both equal, higher node wins

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// Identifier assigned to an entry when it is created on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalId {
    /// Wall clock time in milliseconds since Unix epoch.
    pub wall_ms: u64,
    /// Logical counter for ids minted in the same millisecond.
    pub counter: u32,
    /// Process tag that separates concurrent writers of one installation.
    pub node: u32,
}

impl LocalId {
    /// Creates an id from its components.
    pub fn new(wall_ms: u64, counter: u32, node: u32) -> Self {
        LocalId { wall_ms, counter, node }
    }

    /// Parses an id from its string representation.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl Ord for LocalId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.wall_ms
            .cmp(&other.wall_ms)
            .then_with(|| self.counter.cmp(&other.counter))
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for LocalId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.wall_ms, self.counter, self.node)
    }
}

impl FromStr for LocalId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split('-').collect();
        if parts.len() != 3 {
            return Err(Error::InvalidId(format!(
                "expected format 'wall_ms-counter-node', got '{s}'"
            )));
        }

        let wall_ms = parts[0]
            .parse::<u64>()
            .map_err(|_| Error::InvalidId(format!("invalid wall_ms '{}' in '{s}'", parts[0])))?;
        let counter = parts[1]
            .parse::<u32>()
            .map_err(|_| Error::InvalidId(format!("invalid counter '{}' in '{s}'", parts[1])))?;
        let node = parts[2]
            .parse::<u32>()
            .map_err(|_| Error::InvalidId(format!("invalid node '{}' in '{s}'", parts[2])))?;

        Ok(LocalId::new(wall_ms, counter, node))
    }
}

impl Serialize for LocalId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LocalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Trait for getting the current wall clock time.
///
/// This allows injecting a mock clock for testing.
pub trait ClockSource: Send + Sync {
    /// Returns the current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System clock implementation using `std::time::SystemTime`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
    }
}

impl<C: ClockSource + ?Sized> ClockSource for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

impl<C: ClockSource + ?Sized> ClockSource for std::sync::Arc<C> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Mints strictly increasing [`LocalId`]s for one process.
///
/// If the wall clock stalls or steps backwards the previous wall time is kept
/// and the counter advances instead.
pub struct IdGenerator<C: ClockSource = SystemClock> {
    clock: C,
    node: u32,
    last: Mutex<(u64, u32)>,
}

impl IdGenerator<SystemClock> {
    /// Creates a generator on the system clock.
    pub fn new(node: u32) -> Self {
        Self::with_clock(SystemClock, node)
    }
}

impl<C: ClockSource> IdGenerator<C> {
    /// Creates a generator with a custom clock source.
    pub fn with_clock(clock: C, node: u32) -> Self {
        IdGenerator { clock, node, last: Mutex::new((0, 0)) }
    }

    /// Returns the node tag stamped on every id.
    pub fn node(&self) -> u32 {
        self.node
    }

    /// Generates the next id.
    pub fn next_id(&self) -> LocalId {
        let physical = self.clock.now_ms();
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());

        let (wall_ms, counter) = if physical > last.0 {
            (physical, 0)
        } else {
            (last.0, last.1.saturating_add(1))
        };
        *last = (wall_ms, counter);

        LocalId::new(wall_ms, counter, self.node)
    }

    /// Advances past an id minted elsewhere, so the next id sorts after it.
    pub fn observe(&self, seen: LocalId) {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if (seen.wall_ms, seen.counter) > *last {
            *last = (seen.wall_ms, seen.counter);
        }
    }
}

/// Derives a node tag from an installation id and a process id.
///
/// FNV-1a over both inputs, so it is stable across Rust versions.
pub fn node_tag(installation_id: &str, pid: u32) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in installation_id.bytes().chain(pid.to_le_bytes()) {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
