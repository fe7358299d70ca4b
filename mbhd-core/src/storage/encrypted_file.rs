// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Encrypted store files.
//!
//! Payments, contacts, history and payment-request files are each a single
//! blob in the store file format (see [`crate::crypto::encrypt`]) under a key
//! derived from the spending password.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::crypto::{decrypt, encrypt, SymmetricKey};

use super::StorageError;

/// Writes `bytes` to `path` and flushes them to disk before returning.
///
/// Overwrites any existing file.
pub fn write_durably(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| StorageError::io(path, e))?;
    file.write_all(bytes).map_err(|e| StorageError::io(path, e))?;
    file.sync_all().map_err(|e| StorageError::io(path, e))
}

/// Reads and decrypts a store file.
pub fn read_encrypted(path: &Path, key: &SymmetricKey) -> Result<Vec<u8>, StorageError> {
    let encrypted = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StorageError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(StorageError::io(path, e)),
    };
    Ok(decrypt(key, &encrypted)?)
}

/// Encrypts `plaintext` and writes it durably to `path`.
pub fn write_encrypted(
    path: &Path,
    key: &SymmetricKey,
    plaintext: &[u8],
) -> Result<(), StorageError> {
    let encrypted = encrypt(key, plaintext)?;
    write_durably(path, &encrypted)
}
