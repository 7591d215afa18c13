// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use super::open_diary;
use crate::credentials::CredentialStore;
use crate::error::Result;

pub fn login(token: &str) -> Result<()> {
    let (config, work_dir) = open_diary()?;
    login_impl(&work_dir, token)?;
    match config.remote_url() {
        Some(url) => println!("Logged in to {}", url),
        None => println!("Token saved (no remote configured yet)"),
    }
    Ok(())
}

pub fn logout() -> Result<()> {
    let (_, work_dir) = open_diary()?;
    if logout_impl(&work_dir)? {
        println!("Logged out");
    } else {
        println!("Not logged in");
    }
    Ok(())
}

pub(crate) fn login_impl(work_dir: &Path, token: &str) -> Result<()> {
    CredentialStore::for_work_dir(work_dir).save(token)?;
    Ok(())
}

pub(crate) fn logout_impl(work_dir: &Path) -> Result<bool> {
    Ok(CredentialStore::for_work_dir(work_dir).clear()?)
}

#[cfg(test)]
#[path = "login_tests.rs"]
mod tests;
