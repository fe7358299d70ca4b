// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Wallet summary metadata.
//!
//! The summary is the only place the escrow blobs are persisted. It is never
//! cached: callers load it from disk each time, since cloud sync or another
//! process may have replaced it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;

use crate::crypto::SecretEscrow;
use crate::storage::write_durably;

use super::{WalletError, WalletId};

/// Kind of wallet the summary describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletType {
    /// Keys derived from a seed phrase held by this application.
    Soft,
    /// Keys held on a hardware device.
    Hardware,
    /// Public root key only.
    WatchOnly,
}

/// Non-secret wallet metadata plus the wrapped secrets.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSummary {
    pub wallet_id: WalletId,
    pub name: String,
    pub notes: String,
    pub wallet_type: WalletType,
    #[serde_as(as = "Option<Base64>")]
    pub encrypted_password: Option<Vec<u8>>,
    #[serde_as(as = "Option<Base64>")]
    pub encrypted_backup_key: Option<Vec<u8>>,
}

impl WalletSummary {
    pub fn new(wallet_id: WalletId, name: impl Into<String>, wallet_type: WalletType) -> Self {
        Self {
            wallet_id,
            name: name.into(),
            notes: String::new(),
            wallet_type,
            encrypted_password: None,
            encrypted_backup_key: None,
        }
    }

    /// Returns the escrow blobs when both are present.
    pub fn escrow(&self) -> Option<SecretEscrow> {
        match (&self.encrypted_password, &self.encrypted_backup_key) {
            (Some(password), Some(backup_key)) => Some(SecretEscrow::from_parts(
                password.clone(),
                backup_key.clone(),
            )),
            _ => None,
        }
    }

    pub fn set_escrow(&mut self, escrow: &SecretEscrow) {
        self.encrypted_password = Some(escrow.encrypted_password().to_vec());
        self.encrypted_backup_key = Some(escrow.encrypted_backup_key().to_vec());
    }

    pub fn load(path: &Path) -> Result<Self, WalletError> {
        let bytes = std::fs::read(path).map_err(|e| WalletError::io(path, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), WalletError> {
        let json = serde_json::to_vec_pretty(self)?;
        write_durably(path, &json)?;
        Ok(())
    }
}
