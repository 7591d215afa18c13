// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod add;
pub mod discard;
pub mod feed;
pub mod init;
pub mod login;
pub mod pending;
pub mod sync;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{find_work_dir, get_queue_dir, get_sync_lock_path, Config, RemoteConfig};
use crate::credentials::CredentialStore;
use crate::error::{Error, Result};
use crate::id::process_node;
use crate::sync::{
    FileStorage, GatewayConfig, PendingStore, SyncController, SyncExecutor, WebSocketGateway,
};

/// Helper to locate the diary from the current directory.
pub fn open_diary() -> Result<(Config, PathBuf)> {
    let work_dir = find_work_dir()?;
    let config = Config::load(&work_dir)?;
    Ok((config, work_dir))
}

/// Open the pending store under `work_dir`.
pub fn open_store(work_dir: &Path, config: &Config) -> Result<Arc<PendingStore>> {
    let storage = FileStorage::open(&get_queue_dir(work_dir))?;
    Ok(Arc::new(PendingStore::new(
        Arc::new(storage),
        process_node(&config.installation_id),
    )))
}

/// Gateway to the configured remote store, authenticated from the credential file.
pub fn open_gateway(work_dir: &Path, config: &Config, remote: &RemoteConfig) -> WebSocketGateway {
    let mut gateway_config = GatewayConfig::new(&remote.url, &config.installation_id);
    gateway_config.connect_timeout = remote.connect_timeout();
    gateway_config.response_timeout = remote.response_timeout();
    WebSocketGateway::new(
        gateway_config,
        Arc::new(CredentialStore::for_work_dir(work_dir)),
    )
}

/// Sync controller for `store`, single-flight across processes of this diary.
pub fn open_controller(
    work_dir: &Path,
    config: &Config,
    store: Arc<PendingStore>,
) -> Result<Arc<SyncController>> {
    let remote = config.require_remote()?;
    let gateway = Arc::new(open_gateway(work_dir, config, remote));
    let executor = SyncExecutor::new(store, gateway, remote.backoff());
    Ok(Arc::new(
        SyncController::new(executor).with_process_lock(get_sync_lock_path(work_dir)),
    ))
}

/// Create the tokio runtime used by network commands.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Error::Io(std::io::Error::other(format!("tokio: {}", e))))
}
