// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ml-core: Shared library for the moodlog diary
//!
//! This crate provides the entry model, local id minting, sentiment scoring,
//! the client/server wire protocol, and the remote entry database used by
//! both the `mood` CLI and the `ml-remote` server.

pub mod db;
pub mod entry;
pub mod error;
pub mod id;
pub mod protocol;
pub mod sentiment;

pub use db::{Database, NewEntry};
pub use entry::{EntryStatus, Mood, Outcome, PendingEntry, PublishedEntry};
pub use error::{Error, Result};
pub use id::{node_tag, ClockSource, IdGenerator, LocalId, SystemClock};
pub use protocol::{ClientMessage, ServerMessage};
pub use sentiment::{analyze, Emotion};
