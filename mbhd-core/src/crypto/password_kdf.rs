// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Password-Based Key Derivation
//!
//! Derives AES keys from passwords and wallet seeds using scrypt with a
//! compiled-in salt. The same derivation serves both sides of the escrow
//! scheme and the encrypted store files, so every existing wallet depends on
//! these constants staying fixed.
//!
//! Default scrypt parameters: N=2^14, r=8, p=1.

use zeroize::Zeroize;

use super::SymmetricKey;

/// Salt shared by every key derivation in the application.
pub const SCRYPT_SALT: [u8; 8] = [0x35, 0x51, 0x03, 0x80, 0x75, 0xa3, 0xb0, 0xc5];

/// Derived key length in bytes (AES-256).
const KEY_LEN: usize = 32;

/// scrypt cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// log2 of the CPU/memory cost N.
    pub log_n: u8,
    /// Block size.
    pub r: u32,
    /// Parallelism.
    pub p: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            log_n: 14,
            r: 8,
            p: 1,
        }
    }
}

impl KdfParams {
    /// Cheap parameters for tests and benchmarks. Never use for real wallets.
    pub fn insecure_fast() -> Self {
        Self {
            log_n: 4,
            r: 8,
            p: 1,
        }
    }
}

/// Derives a 32-byte AES key from arbitrary secret bytes (password or seed).
pub fn derive_aes_key(
    secret: &[u8],
    salt: &[u8],
    params: &KdfParams,
) -> Result<SymmetricKey, PasswordKdfError> {
    let scrypt_params = scrypt::Params::new(params.log_n, params.r, params.p, KEY_LEN)
        .map_err(|e| PasswordKdfError::DerivationFailed(e.to_string()))?;

    let mut key_bytes = [0u8; KEY_LEN];
    scrypt::scrypt(secret, salt, &scrypt_params, &mut key_bytes)
        .map_err(|e| PasswordKdfError::DerivationFailed(e.to_string()))?;

    let key = SymmetricKey::from_bytes(key_bytes);
    key_bytes.zeroize();
    Ok(key)
}

/// Derives the key for a spending password with the application salt.
pub fn derive_password_key(
    password: &str,
    params: &KdfParams,
) -> Result<SymmetricKey, PasswordKdfError> {
    derive_aes_key(password.as_bytes(), &SCRYPT_SALT, params)
}

/// Password KDF error types.
#[derive(Debug, thiserror::Error)]
pub enum PasswordKdfError {
    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),
}
