// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bearer token storage in `.moodlog/credentials`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::get_credentials_path;
use crate::sync::CredentialSource;

/// File-backed credential store.
///
/// The token is re-read on every request so `mood login` takes effect in a
/// running `mood watch` without a restart.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CredentialStore { path: path.into() }
    }

    /// Store for the given work directory.
    pub fn for_work_dir(work_dir: &Path) -> Self {
        Self::new(get_credentials_path(work_dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `token`, readable by the owner only.
    pub fn save(&self, token: &str) -> io::Result<()> {
        write_private(&self.path, token.trim())
    }

    /// The stored token. Missing, unreadable and blank files all yield `None`.
    pub fn load(&self) -> Option<String> {
        let token = fs::read_to_string(&self.path).ok()?;
        let token = token.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    /// Remove the stored token. Returns whether one was present.
    pub fn clear(&self) -> io::Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl CredentialSource for CredentialStore {
    fn bearer_token(&self) -> Option<String> {
        self.load()
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    fs::write(path, contents)
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
