// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Symmetric Encryption (AES-256-CBC)
//!
//! Two formats share the same cipher:
//!
//! - **Key wrapping** (`wrap` / `unwrap`): `AES-256-CBC-PKCS7(secret)` under the
//!   compiled-in [`WRAP_IV`]. Used for the escrow blobs kept in the wallet
//!   summary. Reusing the IV is only acceptable because every wrap target is
//!   encrypted under its own freshly derived key; never wrap two different
//!   plaintexts under the same key.
//! - **Store files** (`encrypt` / `decrypt`): `iv (16 bytes) || AES-256-CBC-PKCS7(MAGIC || payload)`
//!   with a random IV per write. The magic prefix tells a wrong key apart from
//!   a right one.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;
use zeroize::Zeroize;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Encryption error types.
#[derive(Error, Debug)]
pub enum EncryptionError {
    #[error("Encryption failed")]
    EncryptionFailed,
    #[error("Decryption failed: data may be corrupted or wrong key")]
    DecryptionFailed,
    #[error("Ciphertext too short")]
    CiphertextTooShort,
}

/// AES block size in bytes.
pub const AES_BLOCK_SIZE: usize = 16;

/// Initialisation vector shared by every key-wrap operation.
pub const WRAP_IV: [u8; AES_BLOCK_SIZE] = [
    0xa3, 0x44, 0x39, 0x1f, 0x53, 0x83, 0x11, 0xb3, 0x29, 0x54, 0x86, 0x16, 0xc4, 0x89, 0x72, 0x3e,
];

/// Plaintext prefix of every store file.
const STORE_MAGIC: &[u8; 8] = b"MBHDSTOR";

/// 256-bit symmetric encryption key.
#[derive(Clone, PartialEq, Eq)]
pub struct SymmetricKey {
    bytes: [u8; 32],
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Don't expose key bytes in debug output
        f.debug_struct("SymmetricKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

impl Drop for SymmetricKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl SymmetricKey {
    /// Generates a new random symmetric key.
    pub fn generate() -> Self {
        let rng = SystemRandom::new();
        let key = ring::rand::generate::<[u8; 32]>(&rng)
            .expect("System RNG should not fail")
            .expose();
        SymmetricKey { bytes: key }
    }

    /// Creates a key from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        SymmetricKey { bytes }
    }

    /// Creates a key from a slice, which must be exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; 32] = bytes.try_into().ok()?;
        Some(SymmetricKey { bytes })
    }

    /// Returns a reference to the key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

/// Encrypts `secret` under `key` and `iv` (AES-256-CBC, PKCS#7).
pub fn wrap(
    secret: &[u8],
    key: &SymmetricKey,
    iv: &[u8; AES_BLOCK_SIZE],
) -> Result<Vec<u8>, EncryptionError> {
    let cipher = Aes256CbcEnc::new_from_slices(key.as_bytes(), iv)
        .map_err(|_| EncryptionError::EncryptionFailed)?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(secret))
}

/// Decrypts a value produced by [`wrap`] with the same key and IV.
pub fn unwrap(
    ciphertext: &[u8],
    key: &SymmetricKey,
    iv: &[u8; AES_BLOCK_SIZE],
) -> Result<Vec<u8>, EncryptionError> {
    if ciphertext.is_empty() || ciphertext.len() % AES_BLOCK_SIZE != 0 {
        return Err(EncryptionError::CiphertextTooShort);
    }

    let cipher = Aes256CbcDec::new_from_slices(key.as_bytes(), iv)
        .map_err(|_| EncryptionError::DecryptionFailed)?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| EncryptionError::DecryptionFailed)
}

/// Encrypts a store payload with a random IV.
///
/// Output format: `iv (16 bytes) || AES-256-CBC(MAGIC || plaintext)`
pub fn encrypt(key: &SymmetricKey, plaintext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
    let rng = SystemRandom::new();

    let mut iv = [0u8; AES_BLOCK_SIZE];
    rng.fill(&mut iv)
        .map_err(|_| EncryptionError::EncryptionFailed)?;

    let mut framed = Vec::with_capacity(STORE_MAGIC.len() + plaintext.len());
    framed.extend_from_slice(STORE_MAGIC);
    framed.extend_from_slice(plaintext);

    let ciphertext = wrap(&framed, key, &iv);
    framed.zeroize();
    let ciphertext = ciphertext?;

    let mut output = Vec::with_capacity(AES_BLOCK_SIZE + ciphertext.len());
    output.extend_from_slice(&iv);
    output.extend_from_slice(&ciphertext);

    Ok(output)
}

/// Decrypts a store payload produced by [`encrypt`].
///
/// Fails with `DecryptionFailed` when the key is wrong, including the rare
/// case where CBC padding happens to validate under a wrong key.
pub fn decrypt(key: &SymmetricKey, ciphertext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
    if ciphertext.len() < 2 * AES_BLOCK_SIZE {
        return Err(EncryptionError::CiphertextTooShort);
    }

    let (iv, body) = ciphertext.split_at(AES_BLOCK_SIZE);
    let iv: [u8; AES_BLOCK_SIZE] = iv
        .try_into()
        .map_err(|_| EncryptionError::DecryptionFailed)?;

    let mut framed = unwrap(body, key, &iv)?;
    if !framed.starts_with(STORE_MAGIC) {
        framed.zeroize();
        return Err(EncryptionError::DecryptionFailed);
    }

    Ok(framed.split_off(STORE_MAGIC.len()))
}
