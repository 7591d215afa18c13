// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Test infrastructure for command testing.
//!
//! `TestDiary` initializes a real `.moodlog/` directory in a temp dir so
//! commands can run their `run_impl` functions without touching the
//! process working directory.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tempfile::TempDir;

use crate::config::{init_work_dir, Config};
use crate::sync::PendingStore;

/// An initialized diary in a temporary directory.
pub struct TestDiary {
    pub config: Config,
    pub work_dir: PathBuf,
    _temp_dir: TempDir, // Keep alive for duration of test
}

impl TestDiary {
    /// A local-only diary.
    pub fn new() -> Self {
        Self::init(None)
    }

    /// A diary configured to sync with `url`.
    pub fn with_remote(url: &str) -> Self {
        Self::init(Some(url))
    }

    fn init(remote: Option<&str>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let work_dir = init_work_dir(temp_dir.path(), remote).expect("Failed to init diary");
        let config = Config::load(&work_dir).unwrap();
        TestDiary {
            config,
            work_dir,
            _temp_dir: temp_dir,
        }
    }

    /// A fresh handle on the diary's pending store.
    pub fn store(&self) -> Arc<PendingStore> {
        super::open_store(&self.work_dir, &self.config).unwrap()
    }

    /// Queue entries directly, bypassing the composer.
    pub fn enqueue(&self, contents: &[&str]) -> Vec<ml_core::LocalId> {
        let store = self.store();
        contents
            .iter()
            .map(|c| store.enqueue(c, Utc::now()).unwrap())
            .collect()
    }
}
