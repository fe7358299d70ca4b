// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backup configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::crypto::KdfParams;

/// Environment variable overriding the application directory.
pub const APPLICATION_DIR_ENV: &str = "MBHD_APPLICATION_DIR";
/// Environment variable naming the cloud backup directory.
pub const CLOUD_BACKUP_DIR_ENV: &str = "MBHD_CLOUD_BACKUP_DIR";

/// Configuration for backups and credential rotation.
#[derive(Debug, Clone)]
pub struct BackupConfig {
    /// Directory holding the `mbhd-<id>` wallet roots
    pub application_dir: PathBuf,

    /// Cloud-synced folder for archive copies, shared by all wallets
    pub cloud_backup_dir: Option<PathBuf>,

    /// Include the blockchain cache in local archives
    pub include_blockchain_cache_locally: bool,

    /// Scheduler poll interval
    pub tick_interval: Duration,

    /// Password KDF cost
    pub kdf: KdfParams,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            application_dir: PathBuf::from("."),
            cloud_backup_dir: None,
            include_blockchain_cache_locally: true,
            tick_interval: Duration::from_secs(2),
            kdf: KdfParams::default(),
        }
    }
}

impl BackupConfig {
    pub fn new(application_dir: impl Into<PathBuf>) -> Self {
        Self {
            application_dir: application_dir.into(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `MBHD_APPLICATION_DIR` and `MBHD_CLOUD_BACKUP_DIR`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = std::env::var_os(APPLICATION_DIR_ENV) {
            config.application_dir = PathBuf::from(dir);
        }
        config.cloud_backup_dir = std::env::var_os(CLOUD_BACKUP_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);
        config
    }

    /// Mirror archives into a cloud folder
    pub fn with_cloud_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cloud_backup_dir = Some(dir.into());
        self
    }

    /// Leave the blockchain cache out of local archives
    pub fn without_blockchain_cache(mut self) -> Self {
        self.include_blockchain_cache_locally = false;
        self
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }
}
