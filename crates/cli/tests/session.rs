// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
use common::*;
use yare::parameterized;

#[test]
fn login_then_logout() {
    let temp = init_temp_remote(CLOSED_REMOTE);

    mood()
        .args(["login", "--token", "s3cret"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Logged in to {}", CLOSED_REMOTE)));

    let stored = std::fs::read_to_string(temp.path().join(".moodlog/credentials")).unwrap();
    assert_eq!(stored, "s3cret");

    mood()
        .arg("logout")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout("Logged out\n");

    mood()
        .arg("logout")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout("Not logged in\n");
}

#[test]
fn login_rejects_blank_token() {
    let temp = init_temp_local();

    mood()
        .args(["login", "--token", " "])
        .current_dir(temp.path())
        .assert()
        .failure();

    assert!(!temp.path().join(".moodlog/credentials").exists());
}

#[parameterized(
    sync = { &["sync"] },
    watch = { &["watch"] },
    feed = { &["feed"] },
)]
fn network_commands_require_remote(args: &[&str]) {
    let temp = init_temp_local();

    mood()
        .args(args)
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no remote configured"));
}

#[test]
fn sync_without_credential_keeps_entries() {
    let temp = init_temp_remote(CLOSED_REMOTE);
    add_entry(&temp, "first");
    add_entry(&temp, "second");

    mood()
        .arg("sync")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Sync complete"));

    mood()
        .arg("pending")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 pending"))
        .stdout(predicate::str::contains("[no credential]"));
}

#[test]
fn feed_requires_login() {
    let temp = init_temp_remote(CLOSED_REMOTE);

    mood()
        .arg("feed")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn feed_reports_unreachable_remote() {
    let temp = init_temp_remote(CLOSED_REMOTE);
    mood()
        .args(["login", "--token", "t"])
        .current_dir(temp.path())
        .assert()
        .success();

    mood()
        .arg("feed")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("remote error"));
}

#[parameterized(
    bash = { "bash" },
    zsh = { "zsh" },
    fish = { "fish" },
)]
fn completion_generates_script(shell: &str) {
    mood()
        .args(["completion", shell])
        .assert()
        .success()
        .stdout(predicate::str::contains("mood"));
}
