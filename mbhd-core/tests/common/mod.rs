// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Common Test Utilities
//!
//! Wallet fixtures shared by the integration tests. Every fixture uses the
//! cheap KDF profile so scrypt does not dominate test time.

#![allow(dead_code)]

pub mod strategies;

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use mbhd_core::crypto::{derive_password_key, KdfParams, SecretEscrow};
use mbhd_core::storage::{read_encrypted, write_encrypted};
use mbhd_core::{
    BackupConfig, BackupManager, Ledger, SealedWallet, WalletId, WalletLayout, WalletSummary,
    WalletType,
};

pub const SEED: &[u8] = b"letter advice cage absurd amount doctor acoustic avoid letter advice cage above";
pub const OLD_PASSWORD: &str = "correct horse";
pub const NEW_PASSWORD: &str = "battery staple";

pub fn kdf() -> KdfParams {
    KdfParams::insecure_fast()
}

/// Fixed timestamp plus `secs` seconds.
pub fn ts(secs: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 15)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
        + chrono::Duration::seconds(secs)
}

/// An application directory holding one fully populated wallet.
pub struct TestWallet {
    pub temp_dir: TempDir,
    pub manager: BackupManager,
    pub wallet_id: WalletId,
    pub layout: WalletLayout,
    pub ledger: SealedWallet,
}

impl TestWallet {
    pub fn new() -> Self {
        Self::with_config(|config| config)
    }

    pub fn with_config(configure: impl FnOnce(BackupConfig) -> BackupConfig) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = configure(BackupConfig::new(temp_dir.path().join("app")).with_kdf(kdf()));
        let manager = BackupManager::new(config);

        let wallet_id = WalletId::from_seed(SEED);
        let layout = manager.directories().wallet_layout(&wallet_id);
        std::fs::create_dir_all(layout.payment_requests_dir()).unwrap();

        let key = derive_password_key(OLD_PASSWORD, &kdf()).unwrap();
        write_encrypted(&layout.payments_db(), &key, b"payments").unwrap();
        write_encrypted(&layout.contacts_db(), &key, b"contacts").unwrap();
        write_encrypted(&layout.history_db(), &key, b"history").unwrap();
        for name in ["req-1.aes", "req-2.aes"] {
            let path = layout.payment_requests_dir().join(name);
            write_encrypted(&path, &key, name.as_bytes()).unwrap();
        }
        std::fs::write(layout.blockchain_cache(), vec![0xab; 4096]).unwrap();

        let mut summary = WalletSummary::new(wallet_id, "Test wallet", WalletType::Soft);
        summary.set_escrow(&SecretEscrow::create(SEED, OLD_PASSWORD, &kdf()).unwrap());
        summary.save(&layout.summary_file()).unwrap();

        let mut ledger = SealedWallet::new(b"private keys".to_vec(), kdf());
        ledger.encrypt(OLD_PASSWORD).unwrap();
        ledger.save_to_file(&layout.wallet_file()).unwrap();

        Self {
            temp_dir,
            manager,
            wallet_id,
            layout,
            ledger,
        }
    }

    /// The wallet file plus every encrypted store, in a stable order.
    pub fn password_protected_files(&self) -> Vec<PathBuf> {
        let mut files = self.layout.encrypted_stores().unwrap();
        files.push(self.layout.wallet_file());
        files
    }

    pub fn cloud_dir(&self) -> PathBuf {
        self.temp_dir.path().join("cloud")
    }
}

/// Which password, if any, opens an encrypted file.
pub fn opens_under(path: &Path) -> Option<&'static str> {
    for password in [OLD_PASSWORD, NEW_PASSWORD] {
        let key = derive_password_key(password, &kdf()).unwrap();
        if read_encrypted(path, &key).is_ok() {
            return Some(password);
        }
    }
    None
}

/// Loads the wallet file under whichever password opens it.
pub fn load_ledger(layout: &WalletLayout) -> (SealedWallet, &'static str) {
    for password in [OLD_PASSWORD, NEW_PASSWORD] {
        if let Ok(wallet) = SealedWallet::load_with_params(&layout.wallet_file(), password, kdf()) {
            return (wallet, password);
        }
    }
    panic!("wallet file opens under neither password");
}
