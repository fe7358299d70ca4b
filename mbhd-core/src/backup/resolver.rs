// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backup directory resolution and discovery.
//!
//! Maps a wallet id to its on-disk locations:
//!
//! ```text
//! <application>/mbhd-<id>/rolling-backup/
//! <application>/mbhd-<id>/zip-backup/
//! <cloud>/                       (flat, shared by all wallets)
//! ```

use std::io;
use std::path::{Path, PathBuf};

use crate::wallet::{WalletId, WalletLayout};

use super::naming::{parse_archive_name, parse_rolling_name, wallet_root_name};
use super::BackupRecord;

/// Rolling backup subdirectory of a wallet root.
pub const ROLLING_BACKUP_DIR: &str = "rolling-backup";
/// Local archive subdirectory of a wallet root.
pub const ZIP_BACKUP_DIR: &str = "zip-backup";

/// Resolves wallet and backup directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupDirectories {
    application_dir: PathBuf,
    cloud_backup_dir: Option<PathBuf>,
}

impl BackupDirectories {
    pub fn new(application_dir: impl Into<PathBuf>, cloud_backup_dir: Option<PathBuf>) -> Self {
        Self {
            application_dir: application_dir.into(),
            cloud_backup_dir,
        }
    }

    pub fn application_dir(&self) -> &Path {
        &self.application_dir
    }

    /// `<application>/mbhd-<id>`
    pub fn wallet_root(&self, wallet_id: &WalletId) -> PathBuf {
        self.application_dir.join(wallet_root_name(wallet_id))
    }

    pub fn wallet_layout(&self, wallet_id: &WalletId) -> WalletLayout {
        WalletLayout::new(self.wallet_root(wallet_id))
    }

    pub fn rolling_backup_dir(&self, wallet_id: &WalletId) -> PathBuf {
        self.wallet_root(wallet_id).join(ROLLING_BACKUP_DIR)
    }

    pub fn local_zip_backup_dir(&self, wallet_id: &WalletId) -> PathBuf {
        self.wallet_root(wallet_id).join(ZIP_BACKUP_DIR)
    }

    /// The configured cloud folder, whether or not it exists.
    pub fn cloud_zip_backup_dir(&self) -> Option<&Path> {
        self.cloud_backup_dir.as_deref()
    }
}

/// Lists files in `dir` whose names parse with `parse`, skipping empty files.
///
/// A missing directory yields an empty list.
fn discover<F>(dir: &Path, mut parse: F) -> io::Result<Vec<BackupRecord>>
where
    F: FnMut(&str) -> Option<BackupRecord>,
{
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut records = Vec::new();
    for entry in entries {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        let Some(mut record) = parse(&name) else {
            continue;
        };

        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }
        // Zero-length files are incomplete writes; ignore them but leave them in place
        if metadata.len() == 0 {
            tracing::debug!("Ignoring empty backup {}", entry.path().display());
            continue;
        }

        record.path = entry.path();
        records.push(record);
    }
    Ok(records)
}

/// Rolling backups in `dir`, oldest first.
pub fn discover_rolling_backups(dir: &Path) -> io::Result<Vec<BackupRecord>> {
    let mut records = discover(dir, |name| {
        parse_rolling_name(name).map(|timestamp| BackupRecord {
            timestamp,
            path: PathBuf::new(),
        })
    })?;
    records.sort();
    Ok(records)
}

/// Archive backups of `wallet_id` in `dir`, in directory order.
pub fn discover_zip_backups(dir: &Path, wallet_id: &WalletId) -> io::Result<Vec<BackupRecord>> {
    discover(dir, |name| {
        parse_archive_name(name)
            .filter(|(id, _)| id == wallet_id)
            .map(|(_, timestamp)| BackupRecord {
                timestamp,
                path: PathBuf::new(),
            })
    })
}
