// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Secret Padding
//!
//! Pads short secrets with random bytes so that a wrapped password never
//! reveals its length. Layout: `marker (1 byte) || marker random bytes || secret`.
//! The padded form is always at least three AES blocks long.

use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;

use super::encryption::AES_BLOCK_SIZE;

/// Minimum padded length (three AES blocks).
pub const MIN_PADDED_LEN: usize = 3 * AES_BLOCK_SIZE;

/// Padding errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PaddingError {
    #[error("Malformed padding: marker {marker} exceeds {available} available bytes")]
    MalformedPadding { marker: usize, available: usize },
    #[error("Random padding generation failed")]
    RandomFailed,
}

/// Number of random bytes prepended to a secret of `len` bytes.
fn pad_len(len: usize) -> usize {
    match len {
        l if l > 3 * AES_BLOCK_SIZE => 0,
        l if l > 2 * AES_BLOCK_SIZE => AES_BLOCK_SIZE,
        l if l > AES_BLOCK_SIZE => 2 * AES_BLOCK_SIZE,
        _ => 3 * AES_BLOCK_SIZE,
    }
}

/// Prepends the length marker and random bytes to `secret`.
pub fn pad_secret(secret: &[u8]) -> Result<Vec<u8>, PaddingError> {
    let padding = pad_len(secret.len());

    let mut random = vec![0u8; padding];
    SystemRandom::new()
        .fill(&mut random)
        .map_err(|_| PaddingError::RandomFailed)?;

    let mut padded = Vec::with_capacity(1 + padding + secret.len());
    padded.push(padding as u8);
    padded.extend_from_slice(&random);
    padded.extend_from_slice(secret);
    Ok(padded)
}

/// Strips the marker and random prefix written by [`pad_secret`].
pub fn unpad_secret(padded: &[u8]) -> Result<Vec<u8>, PaddingError> {
    let (&marker, rest) = padded.split_first().ok_or(PaddingError::MalformedPadding {
        marker: 0,
        available: 0,
    })?;

    let marker = marker as usize;
    if marker > rest.len() {
        return Err(PaddingError::MalformedPadding {
            marker,
            available: rest.len(),
        });
    }

    Ok(rest[marker..].to_vec())
}
