// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI Configuration

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use mbhd_core::{
    BackupConfig, BackupManager, PasswordRotation, SealedWallet, WalletId, WalletLayout,
};

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub backup: BackupConfig,
}

impl CliConfig {
    /// Builds the configuration from flags, falling back to the platform
    /// data directory.
    pub fn resolve(
        app_dir: Option<PathBuf>,
        cloud_dir: Option<PathBuf>,
        no_blockchain_cache: bool,
    ) -> Self {
        let app_dir = app_dir.unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("mbhd")
        });

        let mut backup = BackupConfig::new(app_dir);
        if let Some(dir) = cloud_dir.filter(|dir| !dir.as_os_str().is_empty()) {
            backup = backup.with_cloud_backup_dir(dir);
        }
        if no_blockchain_cache {
            backup = backup.without_blockchain_cache();
        }

        Self { backup }
    }

    pub fn manager(&self) -> BackupManager {
        BackupManager::new(self.backup.clone())
    }

    /// Parses a wallet identifier and checks that its directory exists.
    pub fn wallet(&self, wallet: &str) -> Result<(WalletId, WalletLayout)> {
        let wallet_id: WalletId = wallet
            .parse()
            .with_context(|| format!("Invalid wallet id '{}'", wallet))?;
        let layout = self.manager().directories().wallet_layout(&wallet_id);
        if !layout.root().is_dir() {
            bail!(
                "No wallet {} in {:?}. Use --app-dir to specify a different location.",
                wallet_id,
                self.backup.application_dir
            );
        }
        Ok((wallet_id, layout))
    }

    /// Opens the wallet file under `password`.
    pub fn open_wallet(&self, layout: &WalletLayout, password: &str) -> Result<SealedWallet> {
        SealedWallet::load_with_params(&layout.wallet_file(), password, self.backup.kdf)
            .context("Could not open wallet")
    }

    pub fn rotation(&self, layout: WalletLayout) -> PasswordRotation {
        PasswordRotation::new(layout, self.backup.kdf)
    }
}
