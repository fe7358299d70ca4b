// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backup Module
//!
//! Rolling wallet backups, zip archives of the wallet root (local and
//! cloud), restore, and retention. [`BackupManager`] is constructed once
//! from a [`BackupConfig`] and shared; it holds no cached state, so every
//! listing goes back to disk.

pub mod archive;
pub mod naming;
pub mod resolver;
pub mod retention;
pub mod scheduler;

pub use archive::{extract_archive, write_archive};
pub use naming::{archive_backup_name, parse_wallet_id, rolling_backup_name};
pub use resolver::{
    discover_rolling_backups, discover_zip_backups, BackupDirectories, ROLLING_BACKUP_DIR,
    ZIP_BACKUP_DIR,
};
pub use retention::{
    archives_to_thin, rolling_backups_to_purge, KEEP_FIRST_ARCHIVES, KEEP_LAST_ARCHIVES,
    MAX_ARCHIVE_BACKUPS, MAX_ROLLING_BACKUPS,
};
pub use scheduler::{BackupScheduler, BackupTier, SchedulerHandle};

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::config::BackupConfig;
use crate::storage::secure_delete_quietly;
use crate::wallet::{Ledger, LedgerError, WalletId};

/// Suffix of a rolling backup while the ledger is writing it.
const PARTIAL_SUFFIX: &str = ".partial";

/// Backup errors.
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Wallet directory does not exist: {0}")]
    DirectoryMissing(PathBuf),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Not a wallet archive: {0}")]
    InvalidArchiveName(PathBuf),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl BackupError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BackupError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A backup file and the timestamp embedded in its name.
///
/// Ordering is chronological.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BackupRecord {
    pub timestamp: NaiveDateTime,
    pub path: PathBuf,
}

/// First free path for a timestamped name, bumping by a second on collision.
fn unique_backup_path<F>(
    dir: &Path,
    mut timestamp: NaiveDateTime,
    name: F,
) -> (NaiveDateTime, PathBuf)
where
    F: Fn(&NaiveDateTime) -> String,
{
    loop {
        let path = dir.join(name(&timestamp));
        if !path.exists() {
            return (timestamp, path);
        }
        timestamp += chrono::Duration::seconds(1);
    }
}

fn ensure_dir(dir: &Path) -> Result<(), BackupError> {
    std::fs::create_dir_all(dir).map_err(|e| BackupError::io(dir, e))
}

/// Result of [`BackupManager::restore_from_archive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredWallet {
    pub wallet_id: WalletId,
    /// Local archive of the state the restore replaced; `None` when the
    /// wallet root did not exist.
    pub pre_restore_backup: Option<BackupRecord>,
}

/// Creates, lists, thins and restores wallet backups.
#[derive(Debug, Clone)]
pub struct BackupManager {
    config: BackupConfig,
    directories: BackupDirectories,
}

impl BackupManager {
    pub fn new(config: BackupConfig) -> Self {
        let directories =
            BackupDirectories::new(&config.application_dir, config.cloud_backup_dir.clone());
        Self {
            config,
            directories,
        }
    }

    pub fn config(&self) -> &BackupConfig {
        &self.config
    }

    pub fn directories(&self) -> &BackupDirectories {
        &self.directories
    }

    fn existing_wallet_root(&self, wallet_id: &WalletId) -> Result<PathBuf, BackupError> {
        let root = self.directories.wallet_root(wallet_id);
        if !root.is_dir() {
            return Err(BackupError::DirectoryMissing(root));
        }
        Ok(root)
    }

    // === Rolling backups ===

    /// Saves the wallet into a new rolling backup, then thins old ones.
    pub fn create_rolling_backup<L: Ledger>(
        &self,
        wallet_id: &WalletId,
        ledger: &L,
    ) -> Result<BackupRecord, BackupError> {
        self.create_rolling_backup_at(wallet_id, ledger, naming::now())
    }

    /// As [`create_rolling_backup`](Self::create_rolling_backup), with an explicit timestamp.
    pub fn create_rolling_backup_at<L: Ledger>(
        &self,
        wallet_id: &WalletId,
        ledger: &L,
        timestamp: NaiveDateTime,
    ) -> Result<BackupRecord, BackupError> {
        self.existing_wallet_root(wallet_id)?;
        let dir = self.directories.rolling_backup_dir(wallet_id);
        ensure_dir(&dir)?;

        let (timestamp, path) = unique_backup_path(&dir, timestamp, rolling_backup_name);
        let mut partial = path.as_os_str().to_owned();
        partial.push(PARTIAL_SUFFIX);
        let partial = PathBuf::from(partial);

        if let Err(e) = ledger.save_to_file(&partial) {
            let _ = std::fs::remove_file(&partial);
            return Err(e.into());
        }
        std::fs::rename(&partial, &path).map_err(|e| BackupError::io(&path, e))?;
        tracing::info!("Created rolling backup {}", path.display());

        self.thin_rolling_backups(wallet_id);

        Ok(BackupRecord { timestamp, path })
    }

    /// Rolling backups of a wallet, oldest first, skipping empty files.
    pub fn get_rolling_backups(
        &self,
        wallet_id: &WalletId,
    ) -> Result<Vec<BackupRecord>, BackupError> {
        let dir = self.directories.rolling_backup_dir(wallet_id);
        discover_rolling_backups(&dir).map_err(|e| BackupError::io(dir, e))
    }

    /// Secure-deletes the oldest rolling backups beyond the cap.
    ///
    /// Failures are logged and swallowed; returns how many were removed.
    pub fn thin_rolling_backups(&self, wallet_id: &WalletId) -> usize {
        let backups = match self.get_rolling_backups(wallet_id) {
            Ok(backups) => backups,
            Err(e) => {
                tracing::warn!("Could not list rolling backups for thinning: {}", e);
                return 0;
            }
        };

        let mut removed = 0;
        for record in backups.iter().take(rolling_backups_to_purge(backups.len())) {
            tracing::debug!("Thinning rolling backup {}", record.path.display());
            if secure_delete_quietly(&record.path) {
                removed += 1;
            }
        }
        removed
    }

    // === Archive backups ===

    /// Zips the wallet root into its local `zip-backup` directory.
    pub fn create_archive_backup(
        &self,
        wallet_id: &WalletId,
        include_blockchain_cache: bool,
    ) -> Result<BackupRecord, BackupError> {
        self.create_archive_backup_at(wallet_id, include_blockchain_cache, naming::now())
    }

    pub fn create_archive_backup_at(
        &self,
        wallet_id: &WalletId,
        include_blockchain_cache: bool,
        timestamp: NaiveDateTime,
    ) -> Result<BackupRecord, BackupError> {
        let root = self.existing_wallet_root(wallet_id)?;
        let dir = self.directories.local_zip_backup_dir(wallet_id);
        self.archive_into(wallet_id, &root, &dir, include_blockchain_cache, timestamp)
    }

    /// Zips the wallet root into the cloud folder, never including the
    /// blockchain cache.
    ///
    /// Returns `None` when no cloud folder is configured or it does not exist.
    pub fn create_cloud_backup(
        &self,
        wallet_id: &WalletId,
    ) -> Result<Option<BackupRecord>, BackupError> {
        self.create_cloud_backup_at(wallet_id, naming::now())
    }

    pub fn create_cloud_backup_at(
        &self,
        wallet_id: &WalletId,
        timestamp: NaiveDateTime,
    ) -> Result<Option<BackupRecord>, BackupError> {
        let Some(dir) = self.directories.cloud_zip_backup_dir() else {
            tracing::debug!("No cloud backup directory configured");
            return Ok(None);
        };
        if !dir.is_dir() {
            tracing::warn!("Cloud backup directory {} does not exist", dir.display());
            return Ok(None);
        }

        let root = self.existing_wallet_root(wallet_id)?;
        self.archive_into(wallet_id, &root, dir, false, timestamp)
            .map(Some)
    }

    /// Local archive plus a cloud copy when one is configured.
    ///
    /// A cloud failure is logged and reported as `None`; the local archive
    /// decides the result.
    pub fn create_local_and_cloud_backup(
        &self,
        wallet_id: &WalletId,
    ) -> Result<(BackupRecord, Option<BackupRecord>), BackupError> {
        let local =
            self.create_archive_backup(wallet_id, self.config.include_blockchain_cache_locally)?;
        let cloud = self.create_cloud_backup(wallet_id).unwrap_or_else(|e| {
            tracing::warn!("Cloud backup failed: {}", e);
            None
        });
        Ok((local, cloud))
    }

    fn archive_into(
        &self,
        wallet_id: &WalletId,
        root: &Path,
        dir: &Path,
        include_blockchain_cache: bool,
        timestamp: NaiveDateTime,
    ) -> Result<BackupRecord, BackupError> {
        ensure_dir(dir)?;
        let (timestamp, path) =
            unique_backup_path(dir, timestamp, |ts| archive_backup_name(wallet_id, ts));

        write_archive(root, &path, include_blockchain_cache)?;
        tracing::info!("Created archive backup {}", path.display());

        Ok(BackupRecord { timestamp, path })
    }

    /// Local archives of a wallet, in directory order.
    pub fn get_local_zip_backups(
        &self,
        wallet_id: &WalletId,
    ) -> Result<Vec<BackupRecord>, BackupError> {
        let dir = self.directories.local_zip_backup_dir(wallet_id);
        discover_zip_backups(&dir, wallet_id).map_err(|e| BackupError::io(dir, e))
    }

    /// Cloud archives of a wallet, in directory order; empty without a cloud folder.
    pub fn get_cloud_zip_backups(
        &self,
        wallet_id: &WalletId,
    ) -> Result<Vec<BackupRecord>, BackupError> {
        match self.directories.cloud_zip_backup_dir() {
            Some(dir) => discover_zip_backups(dir, wallet_id).map_err(|e| BackupError::io(dir, e)),
            None => Ok(Vec::new()),
        }
    }

    /// Secure-deletes archives of `wallet_id` in `dir` beyond the soft cap.
    ///
    /// Failures are logged and swallowed; returns how many were removed.
    // TODO: invoke from create_archive_backup once archive thinning is enabled for users
    pub fn thin_archive_backups(&self, dir: &Path, wallet_id: &WalletId) -> usize {
        let mut archives = match discover_zip_backups(dir, wallet_id) {
            Ok(archives) => archives,
            Err(e) => {
                tracing::warn!("Could not list archives in {} for thinning: {}", dir.display(), e);
                return 0;
            }
        };
        archives.sort();

        let mut removed = 0;
        for i in archives_to_thin(archives.len()) {
            tracing::debug!("Thinning archive {}", archives[i].path.display());
            if secure_delete_quietly(&archives[i].path) {
                removed += 1;
            }
        }
        removed
    }

    // === Restore ===

    /// Restores a wallet root from an archive.
    ///
    /// Whatever currently occupies the wallet root is archived locally
    /// first, then the archive is extracted over it.
    pub fn restore_from_archive(
        &self,
        archive_path: &Path,
    ) -> Result<RestoredWallet, BackupError> {
        let wallet_id = archive_path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(naming::wallet_id_from_archive_name)
            .ok_or_else(|| BackupError::InvalidArchiveName(archive_path.to_path_buf()))?;

        let root = self.directories.wallet_root(&wallet_id);
        let pre_restore_backup = if root.is_dir() {
            let record = self
                .create_archive_backup(&wallet_id, self.config.include_blockchain_cache_locally)?;
            tracing::info!("Archived current wallet before restore: {}", record.path.display());
            Some(record)
        } else {
            None
        };

        let extracted = extract_archive(archive_path, &root)?;
        tracing::info!(
            "Restored {} files for wallet {} from {}",
            extracted,
            wallet_id,
            archive_path.display()
        );

        Ok(RestoredWallet {
            wallet_id,
            pre_restore_backup,
        })
    }
}
