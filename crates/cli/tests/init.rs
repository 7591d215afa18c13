// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
use common::*;
use yare::parameterized;

#[test]
fn creates_work_dir() {
    let temp = TempDir::new().unwrap();

    mood()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized diary"))
        .stdout(predicate::str::contains("entries stay local"));

    assert!(temp.path().join(".moodlog").exists());
    assert!(temp.path().join(".moodlog/config.toml").exists());
    assert!(temp.path().join(".moodlog/queue").is_dir());
    assert!(temp.path().join(".moodlog/.gitignore").exists());
}

#[test]
fn with_remote_prints_login_hint() {
    let temp = TempDir::new().unwrap();

    mood()
        .args(["init", "--remote", "ws://diary.example:7890"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Remote: ws://diary.example:7890"))
        .stdout(predicate::str::contains("mood login"));

    let config = std::fs::read_to_string(temp.path().join(".moodlog/config.toml")).unwrap();
    assert!(config.contains("ws://diary.example:7890"));
}

#[test]
fn fails_if_already_initialized() {
    let temp = init_temp_local();

    mood()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn path_option_initializes_elsewhere() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("journal");
    std::fs::create_dir(&target).unwrap();

    mood()
        .arg("init")
        .arg("--path")
        .arg(&target)
        .current_dir(temp.path())
        .assert()
        .success();

    assert!(target.join(".moodlog/config.toml").exists());
    assert!(!temp.path().join(".moodlog").exists());
}

#[parameterized(
    http = { "http://host:7890" },
    bare = { "host:7890" },
    empty_host = { "ws://" },
)]
fn rejects_invalid_remote(url: &str) {
    let temp = TempDir::new().unwrap();

    mood()
        .args(["init", "--remote", url])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid remote URL"));

    assert!(!temp.path().join(".moodlog").exists());
}

#[test]
fn commands_require_init() {
    let temp = TempDir::new().unwrap();

    mood()
        .arg("pending")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("mood init"));
}
