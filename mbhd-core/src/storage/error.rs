// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Storage error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::crypto::{EncryptionError, PasswordKdfError};

/// Storage error types.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Encryption error: {0}")]
    Encryption(#[from] EncryptionError),

    #[error("Key derivation error: {0}")]
    Kdf(#[from] PasswordKdfError),

    #[error("Not found: {0}")]
    NotFound(PathBuf),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Secure delete failure.
///
/// Callers treat this as non-fatal: the original file may remain on disk.
#[derive(Error, Debug)]
pub enum EraseError {
    #[error("Secure delete failed for {path}: {source}")]
    SecureDeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Refusing to secure delete a directory: {0}")]
    NotAFile(PathBuf),
}
