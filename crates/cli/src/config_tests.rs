// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use tempfile::TempDir;
use yare::parameterized;

#[test]
fn test_init_and_load_config() {
    let temp = TempDir::new().unwrap();
    let work_dir = init_work_dir(temp.path(), None).unwrap();

    let config = Config::load(&work_dir).unwrap();
    assert_eq!(config.installation_id.len(), 16);
    assert!(!config.is_remote_mode());
    assert!(matches!(config.require_remote(), Err(Error::NoRemote)));
}

#[test]
fn test_init_with_remote() {
    let temp = TempDir::new().unwrap();
    let work_dir = init_work_dir(temp.path(), Some("ws://127.0.0.1:7890")).unwrap();

    let config = Config::load(&work_dir).unwrap();
    assert_eq!(config.remote_url(), Some("ws://127.0.0.1:7890"));
    let remote = config.require_remote().unwrap();
    assert_eq!(remote.connect_timeout_ms, 3_000);
    assert_eq!(remote.response_timeout_ms, 5_000);
}

#[test]
fn test_init_rejects_bad_remote() {
    let temp = TempDir::new().unwrap();
    let result = init_work_dir(temp.path(), Some("http://example.com"));
    assert!(matches!(result, Err(Error::InvalidRemoteUrl(_))));
    assert!(!temp.path().join(".moodlog").exists());
}

#[test]
fn test_already_initialized() {
    let temp = TempDir::new().unwrap();
    init_work_dir(temp.path(), None).unwrap();

    let result = init_work_dir(temp.path(), None);
    assert!(result.is_err());

    if let Err(e) = result {
        assert!(e.to_string().contains("already initialized"));
    }
}

#[test]
fn test_gitignore_hides_credentials() {
    let temp = TempDir::new().unwrap();
    let work_dir = init_work_dir(temp.path(), None).unwrap();

    let content = fs::read_to_string(work_dir.join(".gitignore")).unwrap();
    assert!(content.contains("credentials"));
    assert!(content.contains("queue/"));
}

#[test]
fn test_find_work_dir_walks_up() {
    let temp = TempDir::new().unwrap();
    let work_dir = init_work_dir(temp.path(), None).unwrap();
    let nested = temp.path().join("a").join("b");
    fs::create_dir_all(&nested).unwrap();

    assert_eq!(find_work_dir_from(&nested).unwrap(), work_dir);
}

#[test]
fn test_find_work_dir_not_initialized() {
    let temp = TempDir::new().unwrap();
    assert!(matches!(
        find_work_dir_from(temp.path()),
        Err(Error::NotInitialized)
    ));
}

#[test]
fn test_remote_defaults_fill_missing_fields() {
    let temp = TempDir::new().unwrap();
    let work_dir = temp.path().join(".moodlog");
    fs::create_dir_all(&work_dir).unwrap();
    fs::write(
        work_dir.join("config.toml"),
        "installation_id = \"abc\"\n\n[remote]\nurl = \"ws://host:1\"\nbackoff_base_ms = 500\n",
    )
    .unwrap();

    let config = Config::load(&work_dir).unwrap();
    let remote = config.remote.unwrap();
    assert_eq!(remote.backoff_base_ms, 500);
    assert_eq!(remote.backoff_max_secs, 300);
    assert_eq!(remote.probe_interval_ms, 5_000);
    assert_eq!(remote.backoff().base_delay, Duration::from_millis(500));
}

#[test]
fn test_load_rejects_non_websocket_remote() {
    let temp = TempDir::new().unwrap();
    let work_dir = temp.path().join(".moodlog");
    fs::create_dir_all(&work_dir).unwrap();
    fs::write(
        work_dir.join("config.toml"),
        "installation_id = \"abc\"\n\n[remote]\nurl = \"git:.\"\n",
    )
    .unwrap();

    assert!(matches!(Config::load(&work_dir), Err(Error::Config(_))));
}

#[parameterized(
    ws = { "ws://localhost:7890", true },
    wss = { "wss://diary.example.com/ws", true },
    no_host = { "ws://", false },
    path_only = { "ws:///x", false },
    http = { "http://localhost", false },
    bare = { "localhost:7890", false },
)]
fn test_validate_url(url: &str, valid: bool) {
    assert_eq!(RemoteConfig::new(url).validate_url().is_none(), valid);
}

#[test]
fn test_path_helpers() {
    let work_dir = PathBuf::from("/project/.moodlog");
    assert_eq!(get_queue_dir(&work_dir), PathBuf::from("/project/.moodlog/queue"));
    assert_eq!(
        get_sync_lock_path(&work_dir),
        PathBuf::from("/project/.moodlog/sync.lock")
    );
    assert_eq!(
        get_credentials_path(&work_dir),
        PathBuf::from("/project/.moodlog/credentials")
    );
    assert_eq!(get_log_path(&work_dir), PathBuf::from("/project/.moodlog/moodlog.log"));
}
