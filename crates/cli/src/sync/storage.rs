// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable key/value medium behind the pending store.
//!
//! Values are whole documents. A save replaces the document atomically, so a
//! crash mid-write leaves either the old or the new version on disk.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Held while a read-modify-write of one key is in progress.
///
/// Dropping the value releases the lock.
pub struct StorageLock {
    _file: Option<File>,
}

impl StorageLock {
    /// A lock that guards nothing beyond the caller's own mutex.
    pub fn in_process() -> Self {
        StorageLock { _file: None }
    }
}

/// Key/value persistence used by the pending store.
pub trait Storage: Send + Sync {
    /// Read the document stored under `key`, or `None` if there is none yet.
    fn load(&self, key: &str) -> io::Result<Option<String>>;

    /// Replace the document stored under `key`.
    fn save(&self, key: &str, value: &str) -> io::Result<()>;

    /// Take the exclusive lock for `key`, blocking until it is free.
    fn lock(&self, key: &str) -> io::Result<StorageLock>;
}

/// One file per key inside a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open storage rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(FileStorage {
            dir: dir.to_path_buf(),
        })
    }

    /// Path of the document for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, key: &str, value: &str) -> io::Result<()> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.tmp"));

        let mut file = File::create(&tmp)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, &path)
    }

    fn lock(&self, key: &str) -> io::Result<StorageLock> {
        use fs2::FileExt;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.dir.join(format!("{key}.lock")))?;
        file.lock_exclusive()?;

        Ok(StorageLock { _file: Some(file) })
    }
}

/// In-process storage for tests.
///
/// Loads and saves can be switched to fail to simulate an unavailable medium.
#[derive(Default)]
pub struct MemoryStorage {
    docs: Mutex<HashMap<String, String>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent load fail (or succeed again).
    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent save fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Replace a document directly, bypassing the failure switches.
    pub fn put(&self, key: &str, value: &str) {
        self.docs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    /// Read a document directly, bypassing the failure switches.
    pub fn get(&self, key: &str) -> Option<String> {
        self.docs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(io::Error::other("storage unavailable"));
        }
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &str) -> io::Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(io::Error::other("storage unavailable"));
        }
        self.put(key, value);
        Ok(())
    }

    fn lock(&self, _key: &str) -> io::Result<StorageLock> {
        Ok(StorageLock::in_process())
    }
}
