// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use tempfile::TempDir;

fn store() -> (TempDir, CredentialStore) {
    let dir = TempDir::new().unwrap();
    let store = CredentialStore::for_work_dir(dir.path());
    (dir, store)
}

#[test]
fn test_load_missing_is_none() {
    let (_dir, store) = store();
    assert_eq!(store.load(), None);
    assert_eq!(store.bearer_token(), None);
}

#[test]
fn test_save_then_load() {
    let (_dir, store) = store();
    store.save("  s3cret\n").unwrap();

    assert_eq!(store.load().as_deref(), Some("s3cret"));
    assert_eq!(store.bearer_token().as_deref(), Some("s3cret"));
}

#[test]
fn test_save_replaces_previous_token() {
    let (_dir, store) = store();
    store.save("first-token").unwrap();
    store.save("second").unwrap();

    assert_eq!(store.load().as_deref(), Some("second"));
}

#[test]
fn test_blank_file_is_none() {
    let (_dir, store) = store();
    std::fs::write(store.path(), "\n  \n").unwrap();
    assert_eq!(store.load(), None);
}

#[test]
fn test_clear() {
    let (_dir, store) = store();
    store.save("t").unwrap();

    assert!(store.clear().unwrap());
    assert_eq!(store.load(), None);
    assert!(!store.clear().unwrap());
}

#[test]
fn test_unreadable_path_is_none() {
    let dir = TempDir::new().unwrap();
    // A directory where the file should be.
    let store = CredentialStore::new(dir.path());
    assert_eq!(store.load(), None);
}

#[cfg(unix)]
#[test]
fn test_saved_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, store) = store();
    std::fs::write(store.path(), "old").unwrap();
    store.save("t").unwrap();

    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
