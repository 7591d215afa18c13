// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.moodlog/config.toml` and includes:
//! - `installation_id`: Identifies this installation to the remote store
//! - `remote`: Optional remote entry store settings (absent = local-only)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::id::generate_installation_id;
use crate::sync::BackoffPolicy;

const WORK_DIR_NAME: &str = ".moodlog";
const CONFIG_FILE_NAME: &str = "config.toml";
const QUEUE_DIR_NAME: &str = "queue";
const SYNC_LOCK_FILE_NAME: &str = "sync.lock";
const CREDENTIALS_FILE_NAME: &str = "credentials";
const LOG_FILE_NAME: &str = "moodlog.log";
const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Project configuration stored in `.moodlog/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Stable identifier for this installation; part of every entry's remote key.
    pub installation_id: String,
    /// Remote store configuration (optional - if absent, entries only queue locally).
    pub remote: Option<RemoteConfig>,
}

/// Remote entry store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// WebSocket URL: `ws://...` or `wss://...`.
    pub url: String,
    /// Max time to establish a connection in milliseconds (default: 3000).
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Max time to wait for a reply in milliseconds (default: 5000).
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,
    /// Retry delay after the first failed attempt in milliseconds (default: 2000).
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    /// Upper bound on the retry delay in seconds (default: 300).
    #[serde(default = "default_backoff_max_secs")]
    pub backoff_max_secs: u64,
    /// Connectivity probe interval for `mood watch` in milliseconds (default: 5000).
    #[serde(default = "default_probe_interval_ms")]
    pub probe_interval_ms: u64,
}

fn default_connect_timeout_ms() -> u64 {
    3_000
}

fn default_response_timeout_ms() -> u64 {
    5_000
}

fn default_backoff_base_ms() -> u64 {
    2_000
}

fn default_backoff_max_secs() -> u64 {
    300
}

fn default_probe_interval_ms() -> u64 {
    5_000
}

impl RemoteConfig {
    /// Creates a remote config with default timings.
    pub fn new(url: impl Into<String>) -> Self {
        RemoteConfig {
            url: url.into(),
            connect_timeout_ms: default_connect_timeout_ms(),
            response_timeout_ms: default_response_timeout_ms(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_secs: default_backoff_max_secs(),
            probe_interval_ms: default_probe_interval_ms(),
        }
    }

    /// Validates that the URL is a WebSocket URL.
    ///
    /// Returns an error message if the URL is invalid.
    pub fn validate_url(&self) -> Option<String> {
        let rest = self
            .url
            .strip_prefix("ws://")
            .or_else(|| self.url.strip_prefix("wss://"));
        match rest {
            Some(host) if !host.is_empty() && !host.starts_with('/') => None,
            Some(_) => Some(format!("remote URL '{}' has no host", self.url)),
            None => Some(format!(
                "invalid remote URL '{}': must start with ws:// or wss://",
                self.url
            )),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms.max(1))
    }

    pub fn backoff(&self) -> BackoffPolicy {
        BackoffPolicy::new(
            Duration::from_millis(self.backoff_base_ms),
            Duration::from_secs(self.backoff_max_secs),
        )
    }
}

impl Config {
    /// Creates a local-only config with the given installation id.
    pub fn new(installation_id: String) -> Self {
        Config {
            installation_id,
            remote: None,
        }
    }

    /// Loads configuration from the given `.moodlog/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        if let Some(msg) = config.remote.as_ref().and_then(RemoteConfig::validate_url) {
            return Err(Error::Config(msg));
        }
        Ok(config)
    }

    /// Returns true if a remote store is configured.
    pub fn is_remote_mode(&self) -> bool {
        self.remote.is_some()
    }

    /// Returns the remote URL if configured.
    pub fn remote_url(&self) -> Option<&str> {
        self.remote.as_ref().map(|r| r.url.as_str())
    }

    /// Returns the remote config, or [`Error::NoRemote`] in local-only mode.
    pub fn require_remote(&self) -> Result<&RemoteConfig> {
        self.remote.as_ref().ok_or(Error::NoRemote)
    }

    /// Saves configuration to the given `.moodlog/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }
}

/// Find the .moodlog directory by walking up from the current directory
pub fn find_work_dir() -> Result<PathBuf> {
    find_work_dir_from(&std::env::current_dir()?)
}

/// Find the .moodlog directory by walking up from `start`
pub fn find_work_dir_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Directory holding the pending store documents.
pub fn get_queue_dir(work_dir: &Path) -> PathBuf {
    work_dir.join(QUEUE_DIR_NAME)
}

/// Lock file that keeps sync passes single-flight across processes.
pub fn get_sync_lock_path(work_dir: &Path) -> PathBuf {
    work_dir.join(SYNC_LOCK_FILE_NAME)
}

pub fn get_credentials_path(work_dir: &Path) -> PathBuf {
    work_dir.join(CREDENTIALS_FILE_NAME)
}

pub fn get_log_path(work_dir: &Path) -> PathBuf {
    work_dir.join(LOG_FILE_NAME)
}

/// Initialize a new .moodlog directory at the given path
pub fn init_work_dir(path: &Path, remote: Option<&str>) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    let remote = remote.map(RemoteConfig::new);
    if let Some(r) = &remote {
        if r.validate_url().is_some() {
            return Err(Error::InvalidRemoteUrl(r.url.clone()));
        }
    }

    fs::create_dir_all(&work_dir)?;

    let config = Config {
        installation_id: generate_installation_id(path, std::process::id()),
        remote,
    };
    config.save(&work_dir)?;
    write_gitignore(&work_dir)?;

    Ok(work_dir)
}

/// Write a .gitignore file to the work directory.
///
/// Keeps credentials, logs and queue state out of version control.
pub fn write_gitignore(work_dir: &Path) -> Result<()> {
    let gitignore_path = work_dir.join(GITIGNORE_FILE_NAME);
    let content = "# Secrets\ncredentials\n\n# Runtime state\nqueue/\nsync.lock\nmoodlog.log\n";
    fs::write(&gitignore_path, content)?;
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
