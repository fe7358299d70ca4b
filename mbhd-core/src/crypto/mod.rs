// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod encryption;
pub mod escrow;
pub mod padding;
pub mod password_kdf;

pub use encryption::{decrypt, encrypt, unwrap, wrap, EncryptionError, SymmetricKey, WRAP_IV};
pub use escrow::{derive_backup_key, wrap_verified, EscrowError, SecretEscrow};
pub use padding::{pad_secret, unpad_secret, PaddingError, MIN_PADDED_LEN};
pub use password_kdf::{
    derive_aes_key, derive_password_key, KdfParams, PasswordKdfError, SCRYPT_SALT,
};
