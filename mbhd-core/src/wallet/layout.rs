// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! File layout inside a wallet root directory.

use std::io;
use std::path::{Path, PathBuf};

/// Wallet file written by the ledger.
pub const WALLET_FILE: &str = "mbhd.wallet.aes";
/// Summary metadata including the escrow blobs.
pub const SUMMARY_FILE: &str = "mbhd.summary.json";
/// Blockchain cache extension; these files are large and rebuildable.
pub const BLOCKCHAIN_CACHE_EXTENSION: &str = "spvchain";
/// Blockchain cache file name.
pub const BLOCKCHAIN_CACHE_FILE: &str = "mbhd.spvchain";

pub const PAYMENTS_FILE: &str = "payments.aes";
pub const CONTACTS_FILE: &str = "contacts.aes";
pub const HISTORY_FILE: &str = "history.aes";

/// Directory holding one encrypted file per BIP70 payment request.
pub const PAYMENT_REQUESTS_DIR: &str = "payment-requests";
/// Extension of encrypted payment request files.
pub const PAYMENT_REQUEST_EXTENSION: &str = "aes";

/// Paths of the files that make up one wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletLayout {
    root: PathBuf,
}

impl WalletLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn wallet_file(&self) -> PathBuf {
        self.root.join(WALLET_FILE)
    }

    pub fn summary_file(&self) -> PathBuf {
        self.root.join(SUMMARY_FILE)
    }

    pub fn blockchain_cache(&self) -> PathBuf {
        self.root.join(BLOCKCHAIN_CACHE_FILE)
    }

    pub fn payments_db(&self) -> PathBuf {
        self.root.join(PAYMENTS_FILE)
    }

    pub fn contacts_db(&self) -> PathBuf {
        self.root.join(CONTACTS_FILE)
    }

    pub fn history_db(&self) -> PathBuf {
        self.root.join(HISTORY_FILE)
    }

    pub fn payment_requests_dir(&self) -> PathBuf {
        self.root.join(PAYMENT_REQUESTS_DIR)
    }

    /// Lists the serialized payment request files, sorted by path.
    pub fn payment_request_files(&self) -> io::Result<Vec<PathBuf>> {
        let dir = self.payment_requests_dir();
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            let is_request = path
                .extension()
                .is_some_and(|ext| ext == PAYMENT_REQUEST_EXTENSION);
            if is_request && entry.file_type()?.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Every existing store encrypted under the spending password, except the
    /// wallet file and summary which the ledger handles separately.
    pub fn encrypted_stores(&self) -> io::Result<Vec<PathBuf>> {
        let mut stores: Vec<PathBuf> = [self.payments_db(), self.contacts_db(), self.history_db()]
            .into_iter()
            .filter(|p| p.is_file())
            .collect();
        stores.extend(self.payment_request_files()?);
        Ok(stores)
    }
}
