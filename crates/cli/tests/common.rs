// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// A port nothing listens on.
pub const CLOSED_REMOTE: &str = "ws://127.0.0.1:1";

pub fn mood() -> Command {
    cargo_bin_cmd!("mood")
}

/// Helper to create an initialized temp directory without a remote
pub fn init_temp_local() -> TempDir {
    let temp = TempDir::new().unwrap();
    mood()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Helper to create an initialized temp directory syncing with `url`
pub fn init_temp_remote(url: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    mood()
        .arg("init")
        .arg("--remote")
        .arg(url)
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Helper to add an entry without pushing and return its id
pub fn add_entry(temp: &TempDir, text: &str) -> String {
    let output = mood()
        .arg("add")
        .arg("--no-push")
        .arg(text)
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .find_map(|l| l.strip_prefix("Added "))
        .unwrap()
        .trim()
        .to_string()
}
