// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for key wrapping, padding and the escrow scheme

mod common;

use proptest::prelude::*;
use quickcheck_macros::quickcheck;

use common::strategies::{key_strategy, payload_strategy, secret_strategy};
use common::{kdf, SEED};
use mbhd_core::crypto::{
    derive_aes_key, derive_backup_key, derive_password_key, pad_secret, unpad_secret, unwrap,
    wrap, EncryptionError, EscrowError, PaddingError, SecretEscrow, SymmetricKey, MIN_PADDED_LEN,
    SCRYPT_SALT, WRAP_IV,
};

// ============================================================
// Padding
// ============================================================

proptest! {
    /// Property: unpad(pad(s)) == s and the padded form is never short
    #[test]
    fn prop_padding_roundtrip(secret in secret_strategy()) {
        let padded = pad_secret(&secret).unwrap();
        prop_assert!(padded.len() >= MIN_PADDED_LEN);
        prop_assert_eq!(unpad_secret(&padded).unwrap(), secret);
    }

    /// Property: the marker byte follows the fixed length buckets
    #[test]
    fn prop_padding_marker_buckets(secret in secret_strategy()) {
        let padded = pad_secret(&secret).unwrap();
        let expected = match secret.len() {
            l if l > 48 => 0x00,
            l if l > 32 => 0x10,
            l if l > 16 => 0x20,
            _ => 0x30,
        };
        prop_assert_eq!(padded[0], expected);
    }
}

#[test]
fn test_marker_beyond_buffer_is_malformed() {
    let result = unpad_secret(&[0x30, 1, 2, 3]);
    assert_eq!(
        result,
        Err(PaddingError::MalformedPadding {
            marker: 0x30,
            available: 3,
        })
    );
}

#[test]
fn test_padding_hides_short_lengths() {
    let one = pad_secret(b"a").unwrap();
    let sixteen = pad_secret(&[b'a'; 16]).unwrap();
    assert_eq!(one.len(), 1 + 48 + 1);
    assert_eq!(sixteen.len(), 1 + 48 + 16);
}

// ============================================================
// Wrap
// ============================================================

proptest! {
    /// Property: unwrap(wrap(p, k, iv), k, iv) == p
    #[test]
    fn prop_wrap_roundtrip(key in key_strategy(), payload in payload_strategy()) {
        let wrapped = wrap(&payload, &key, &WRAP_IV).unwrap();
        prop_assert_eq!(unwrap(&wrapped, &key, &WRAP_IV).unwrap(), payload);
    }
}

#[quickcheck]
fn qc_wrap_output_is_block_aligned(payload: Vec<u8>) -> bool {
    let key = SymmetricKey::from_bytes([9u8; 32]);
    let wrapped = wrap(&payload, &key, &WRAP_IV).unwrap();
    wrapped.len() % 16 == 0 && wrapped.len() > payload.len()
}

#[test]
fn test_wrap_is_deterministic_with_fixed_iv() {
    let key = SymmetricKey::from_bytes([1u8; 32]);
    assert_eq!(
        wrap(b"secret", &key, &WRAP_IV).unwrap(),
        wrap(b"secret", &key, &WRAP_IV).unwrap()
    );
}

#[test]
fn test_unwrap_rejects_unaligned_input() {
    let key = SymmetricKey::from_bytes([1u8; 32]);
    assert!(matches!(
        unwrap(&[0u8; 15], &key, &WRAP_IV),
        Err(EncryptionError::CiphertextTooShort)
    ));
    assert!(matches!(
        unwrap(&[], &key, &WRAP_IV),
        Err(EncryptionError::CiphertextTooShort)
    ));
}

#[test]
fn test_compiled_in_constants() {
    assert_eq!(SCRYPT_SALT, [0x35, 0x51, 0x03, 0x80, 0x75, 0xa3, 0xb0, 0xc5]);
    assert_eq!(
        WRAP_IV,
        [
            0xa3, 0x44, 0x39, 0x1f, 0x53, 0x83, 0x11, 0xb3, 0x29, 0x54, 0x86, 0x16, 0xc4, 0x89,
            0x72, 0x3e
        ]
    );
}

// ============================================================
// KDF
// ============================================================

#[test]
fn test_kdf_is_deterministic_and_salted() {
    let a = derive_aes_key(b"password", &SCRYPT_SALT, &kdf()).unwrap();
    let b = derive_aes_key(b"password", &SCRYPT_SALT, &kdf()).unwrap();
    let other_salt = derive_aes_key(b"password", b"saltsalt", &kdf()).unwrap();
    let other_secret = derive_aes_key(b"passwore", &SCRYPT_SALT, &kdf()).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, other_salt);
    assert_ne!(a, other_secret);
}

#[test]
fn test_password_key_uses_shared_salt() {
    let via_password = derive_password_key("hunter2", &kdf()).unwrap();
    let via_bytes = derive_aes_key(b"hunter2", &SCRYPT_SALT, &kdf()).unwrap();
    assert_eq!(via_password, via_bytes);
}

// ============================================================
// Escrow
// ============================================================

#[test]
fn test_escrow_equivalence() {
    let password = "tr0ub4dor&3";
    let escrow = SecretEscrow::create(SEED, password, &kdf()).unwrap();

    let password_key = derive_aes_key(password.as_bytes(), &SCRYPT_SALT, &kdf()).unwrap();
    let seed_key = derive_aes_key(SEED, &SCRYPT_SALT, &kdf()).unwrap();

    // Password side recovers the seed-derived key
    let backup_key = unwrap(escrow.encrypted_backup_key(), &password_key, &WRAP_IV).unwrap();
    assert_eq!(backup_key, seed_key.as_bytes());

    // Seed side recovers the padded password
    let padded = unwrap(escrow.encrypted_password(), &seed_key, &WRAP_IV).unwrap();
    assert!(padded.len() >= MIN_PADDED_LEN);
    assert_eq!(unpad_secret(&padded).unwrap(), password.as_bytes());
}

#[test]
fn test_escrow_recovery_paths() {
    let escrow = SecretEscrow::create(SEED, "hunter2", &kdf()).unwrap();

    assert_eq!(
        escrow.recover_password(SEED, &kdf()).unwrap().as_str(),
        "hunter2"
    );
    assert_eq!(
        escrow.backup_key_from_password("hunter2", &kdf()).unwrap(),
        derive_backup_key(SEED, &kdf()).unwrap()
    );
}

#[test]
fn test_escrow_wrong_seed_fails() {
    let escrow = SecretEscrow::create(SEED, "hunter2", &kdf()).unwrap();
    assert!(escrow.recover_password(b"some other seed", &kdf()).is_err());
}

#[test]
fn test_escrow_verify_detects_tampering() {
    let escrow = SecretEscrow::create(SEED, "hunter2", &kdf()).unwrap();
    let backup_key = derive_backup_key(SEED, &kdf()).unwrap();
    let password_key = derive_password_key("hunter2", &kdf()).unwrap();
    escrow.verify(&backup_key, &password_key, "hunter2").unwrap();

    let mut tampered = escrow.encrypted_password().to_vec();
    let last = tampered.len() - 1;
    tampered[last] ^= 0x01;
    let tampered = SecretEscrow::from_parts(tampered, escrow.encrypted_backup_key().to_vec());

    assert!(matches!(
        tampered.verify(&backup_key, &password_key, "hunter2"),
        Err(EscrowError::EncryptionNotReversible)
    ));
}
