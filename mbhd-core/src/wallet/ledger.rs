// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Ledger collaborator interface.
//!
//! The wallet file itself belongs to the external ledger library (sync,
//! validation, signing). This crate only needs it to save, load, and
//! re-encrypt; [`Ledger`] is that seam. [`SealedWallet`] is a minimal
//! implementation that treats the wallet as an opaque payload in the store
//! file format, used by the CLI and the tests.

use std::path::Path;

use thiserror::Error;
use zeroize::Zeroizing;

use crate::crypto::{derive_password_key, KdfParams, PasswordKdfError, SymmetricKey};
use crate::storage::{read_encrypted, write_durably, write_encrypted, StorageError};

/// Errors reported by a ledger implementation.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Wrong password")]
    WrongPassword,
    #[error("Wallet is not encrypted")]
    NotEncrypted,
    #[error("Wallet is already encrypted")]
    AlreadyEncrypted,
    #[error("Key derivation failed: {0}")]
    Kdf(#[from] PasswordKdfError),
    #[error("Wallet storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Operations this crate consumes from the ledger wallet object.
pub trait Ledger {
    /// Writes the wallet in its current encryption state.
    fn save_to_file(&self, path: &Path) -> Result<(), LedgerError>;

    /// Loads and unlocks a wallet file.
    fn load_from_file(path: &Path, password: &str) -> Result<Self, LedgerError>
    where
        Self: Sized;

    /// Encrypts the private keys under `password`.
    fn encrypt(&mut self, password: &str) -> Result<(), LedgerError>;

    /// Removes encryption, given the current password.
    fn decrypt(&mut self, password: &str) -> Result<(), LedgerError>;

    /// Returns true if `password` unlocks the wallet.
    fn check_password(&self, password: &str) -> bool;
}

/// Opaque wallet payload sealed under the spending password.
pub struct SealedWallet {
    payload: Zeroizing<Vec<u8>>,
    key: Option<SymmetricKey>,
    kdf: KdfParams,
}

impl std::fmt::Debug for SealedWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealedWallet")
            .field("payload_len", &self.payload.len())
            .field("encrypted", &self.key.is_some())
            .finish()
    }
}

impl SealedWallet {
    /// Creates an unencrypted wallet around `payload`.
    pub fn new(payload: Vec<u8>, kdf: KdfParams) -> Self {
        Self {
            payload: Zeroizing::new(payload),
            key: None,
            kdf,
        }
    }

    /// Loads a wallet file with explicit KDF parameters.
    ///
    /// Use this instead of [`Ledger::load_from_file`] whenever the wallet
    /// was sealed with anything but [`KdfParams::default`].
    pub fn load_with_params(
        path: &Path,
        password: &str,
        kdf: KdfParams,
    ) -> Result<Self, LedgerError> {
        let key = derive_password_key(password, &kdf)?;
        let payload = match read_encrypted(path, &key) {
            Ok(payload) => payload,
            Err(StorageError::Encryption(_)) => return Err(LedgerError::WrongPassword),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            payload: Zeroizing::new(payload),
            key: Some(key),
            kdf,
        })
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn is_encrypted(&self) -> bool {
        self.key.is_some()
    }
}

impl Ledger for SealedWallet {
    fn save_to_file(&self, path: &Path) -> Result<(), LedgerError> {
        match &self.key {
            Some(key) => write_encrypted(path, key, &self.payload)?,
            None => write_durably(path, &self.payload)?,
        }
        Ok(())
    }

    /// Always derives with [`KdfParams::default`]; a wallet sealed with other
    /// parameters reports [`LedgerError::WrongPassword`] here and must be
    /// opened with [`SealedWallet::load_with_params`].
    fn load_from_file(path: &Path, password: &str) -> Result<Self, LedgerError> {
        Self::load_with_params(path, password, KdfParams::default())
    }

    fn encrypt(&mut self, password: &str) -> Result<(), LedgerError> {
        if self.key.is_some() {
            return Err(LedgerError::AlreadyEncrypted);
        }
        self.key = Some(derive_password_key(password, &self.kdf)?);
        Ok(())
    }

    fn decrypt(&mut self, password: &str) -> Result<(), LedgerError> {
        match &self.key {
            None => Err(LedgerError::NotEncrypted),
            Some(_) if !self.check_password(password) => Err(LedgerError::WrongPassword),
            Some(_) => {
                self.key = None;
                Ok(())
            }
        }
    }

    fn check_password(&self, password: &str) -> bool {
        match (&self.key, derive_password_key(password, &self.kdf)) {
            (Some(key), Ok(candidate)) => *key == candidate,
            _ => false,
        }
    }
}
