// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::path::Path;

use ml_core::{node_tag, LocalId};

use crate::error::{Error, Result};

/// Generate an installation id from the project path, process id and time.
/// Format: first 16 hex chars of SHA256(path + pid + timestamp)
pub fn generate_installation_id(path: &Path, pid: u32) -> String {
    let input = format!(
        "{}{}{}",
        path.display(),
        pid,
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    );
    let hash = Sha256::digest(input.as_bytes());
    hex::encode(&hash[..8])
}

/// Node tag for ids minted by this process.
pub fn process_node(installation_id: &str) -> u32 {
    node_tag(installation_id, std::process::id())
}

/// Parse a local id typed by the user.
pub fn parse_local_id(s: &str) -> Result<LocalId> {
    s.parse()
        .map_err(|_| Error::InvalidId(format!("'{s}' (expected wall_ms-counter-node)")))
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
