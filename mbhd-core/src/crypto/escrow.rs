// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Two-Key Escrow
//!
//! Each wallet keeps two wrapped secrets in its summary:
//!
//! - `encrypted_password` = `wrap(pad(password), key = derive(seed))`
//! - `encrypted_backup_key` = `wrap(derive(seed), key = derive(password))`
//!
//! Either source secret therefore unlocks the other: the seed phrase
//! recovers a forgotten password, and the password yields the seed-derived
//! backup key without the seed being present. Every wrap is checked by an
//! in-memory round trip before it is handed back.

use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

use super::encryption::{unwrap, wrap, EncryptionError, SymmetricKey, WRAP_IV};
use super::padding::{pad_secret, unpad_secret, PaddingError};
use super::password_kdf::{
    derive_aes_key, derive_password_key, KdfParams, PasswordKdfError, SCRYPT_SALT,
};

/// Escrow errors.
#[derive(Error, Debug)]
pub enum EscrowError {
    #[error("Encryption is not reversible: wrapped value did not round-trip")]
    EncryptionNotReversible,
    #[error(transparent)]
    Padding(#[from] PaddingError),
    #[error("Key wrapping failed: {0}")]
    Encryption(#[from] EncryptionError),
    #[error(transparent)]
    Kdf(#[from] PasswordKdfError),
    #[error("Unwrapped secret is not valid key material")]
    InvalidKeyMaterial,
}

/// Wraps `secret` under `key` and proves the result unwraps to the same bytes.
pub fn wrap_verified(secret: &[u8], key: &SymmetricKey) -> Result<Vec<u8>, EscrowError> {
    let wrapped = wrap(secret, key, &WRAP_IV)?;
    let mut check =
        unwrap(&wrapped, key, &WRAP_IV).map_err(|_| EscrowError::EncryptionNotReversible)?;
    let matches = check.as_slice() == secret;
    check.zeroize();

    if !matches {
        return Err(EscrowError::EncryptionNotReversible);
    }
    Ok(wrapped)
}

/// Derives the backup key from the wallet seed.
pub fn derive_backup_key(seed: &[u8], params: &KdfParams) -> Result<SymmetricKey, EscrowError> {
    Ok(derive_aes_key(seed, &SCRYPT_SALT, params)?)
}

/// The pair of wrapped secrets persisted per wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretEscrow {
    encrypted_password: Vec<u8>,
    encrypted_backup_key: Vec<u8>,
}

impl SecretEscrow {
    /// Builds both escrow blobs from the wallet seed and spending password.
    pub fn create(seed: &[u8], password: &str, params: &KdfParams) -> Result<Self, EscrowError> {
        let backup_key = derive_backup_key(seed, params)?;
        let password_key = derive_password_key(password, params)?;
        Self::seal(&backup_key, password, &password_key)
    }

    /// Builds both escrow blobs from an already derived backup key.
    ///
    /// Used by password rotation, which never has the seed in hand.
    pub fn seal(
        backup_key: &SymmetricKey,
        password: &str,
        password_key: &SymmetricKey,
    ) -> Result<Self, EscrowError> {
        let padded = Zeroizing::new(pad_secret(password.as_bytes())?);
        let encrypted_password = wrap_verified(&padded, backup_key)?;
        let encrypted_backup_key = wrap_verified(backup_key.as_bytes(), password_key)?;

        Ok(Self {
            encrypted_password,
            encrypted_backup_key,
        })
    }

    /// Restores an escrow from persisted blobs.
    pub fn from_parts(encrypted_password: Vec<u8>, encrypted_backup_key: Vec<u8>) -> Self {
        Self {
            encrypted_password,
            encrypted_backup_key,
        }
    }

    pub fn encrypted_password(&self) -> &[u8] {
        &self.encrypted_password
    }

    pub fn encrypted_backup_key(&self) -> &[u8] {
        &self.encrypted_backup_key
    }

    /// Unwraps the backup key with an already derived password key.
    pub fn unlock_backup_key(
        &self,
        password_key: &SymmetricKey,
    ) -> Result<SymmetricKey, EscrowError> {
        let mut raw = unwrap(&self.encrypted_backup_key, password_key, &WRAP_IV)?;
        let key = SymmetricKey::from_slice(&raw);
        raw.zeroize();
        key.ok_or(EscrowError::InvalidKeyMaterial)
    }

    /// Returns the seed-derived backup key using the spending password.
    pub fn backup_key_from_password(
        &self,
        password: &str,
        params: &KdfParams,
    ) -> Result<SymmetricKey, EscrowError> {
        let password_key = derive_password_key(password, params)?;
        self.unlock_backup_key(&password_key)
    }

    /// Unwraps the spending password with the seed-derived backup key.
    pub fn unlock_password(
        &self,
        backup_key: &SymmetricKey,
    ) -> Result<Zeroizing<String>, EscrowError> {
        let padded = Zeroizing::new(unwrap(&self.encrypted_password, backup_key, &WRAP_IV)?);
        let secret = unpad_secret(&padded)?;
        String::from_utf8(secret).map(Zeroizing::new).map_err(|e| {
            e.into_bytes().zeroize();
            EscrowError::InvalidKeyMaterial
        })
    }

    /// Recovers the spending password from the wallet seed.
    pub fn recover_password(
        &self,
        seed: &[u8],
        params: &KdfParams,
    ) -> Result<Zeroizing<String>, EscrowError> {
        let backup_key = derive_backup_key(seed, params)?;
        self.unlock_password(&backup_key)
    }

    /// Re-checks that both blobs unwrap under the given keys and that the
    /// password blob holds `expected_password`.
    pub fn verify(
        &self,
        backup_key: &SymmetricKey,
        password_key: &SymmetricKey,
        expected_password: &str,
    ) -> Result<(), EscrowError> {
        let unwrapped_key = self
            .unlock_backup_key(password_key)
            .map_err(|_| EscrowError::EncryptionNotReversible)?;
        if unwrapped_key != *backup_key {
            return Err(EscrowError::EncryptionNotReversible);
        }

        let password = self
            .unlock_password(backup_key)
            .map_err(|_| EscrowError::EncryptionNotReversible)?;
        if password.as_str() != expected_password {
            return Err(EscrowError::EncryptionNotReversible);
        }
        Ok(())
    }
}
