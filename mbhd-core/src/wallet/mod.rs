// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Wallet Module
//!
//! Wallet identity, on-disk layout, summary metadata and the ledger seam.

pub mod id;
pub mod layout;
pub mod ledger;
pub mod summary;

pub use id::{WalletId, WalletIdError, FORMATTED_WALLET_ID_LENGTH, WALLET_ID_LENGTH};
pub use layout::WalletLayout;
pub use ledger::{Ledger, LedgerError, SealedWallet};
pub use summary::{WalletSummary, WalletType};

use std::path::PathBuf;

use thiserror::Error;

use crate::storage::StorageError;

/// Wallet metadata errors.
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Summary is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl WalletError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WalletError::Io {
            path: path.into(),
            source,
        }
    }
}
