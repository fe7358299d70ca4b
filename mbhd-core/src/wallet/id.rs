// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Wallet identifiers.
//!
//! A wallet id is 20 bytes rendered as five dash-separated groups of eight
//! lowercase hex digits, e.g. `66fa1e6b-8c4d7a1d-35e2b8f0-0f2a9c11-d4a3e9b7`.
//! It names the wallet's root directory and its archive backups, so the
//! textual form is load-bearing.

use std::fmt;
use std::str::FromStr;

use ring::digest;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Raw identifier length in bytes.
pub const WALLET_ID_LENGTH: usize = 20;

/// Length of the formatted identifier (40 hex digits + 4 separators).
pub const FORMATTED_WALLET_ID_LENGTH: usize = 2 * WALLET_ID_LENGTH + GROUP_COUNT - 1;

const GROUP_COUNT: usize = 5;
const GROUP_HEX_LEN: usize = 8;

const SEED_DOMAIN: &[u8] = b"MBHD_WalletId_Seed";
const ROOT_KEY_DOMAIN: &[u8] = b"MBHD_WalletId_RootKey";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletIdError {
    #[error("Invalid wallet id: {0:?}")]
    Invalid(String),
}

/// Identifier of one wallet.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WalletId([u8; WALLET_ID_LENGTH]);

impl WalletId {
    pub fn from_bytes(bytes: [u8; WALLET_ID_LENGTH]) -> Self {
        WalletId(bytes)
    }

    /// Derives the id from the wallet's master seed.
    pub fn from_seed(seed: &[u8]) -> Self {
        Self::hashed(SEED_DOMAIN, seed)
    }

    /// Derives the id from the serialized public root key (watch-only wallets).
    pub fn from_root_public_key(public_key: &[u8]) -> Self {
        Self::hashed(ROOT_KEY_DOMAIN, public_key)
    }

    fn hashed(domain: &[u8], input: &[u8]) -> Self {
        let mut ctx = digest::Context::new(&digest::SHA256);
        ctx.update(domain);
        ctx.update(input);
        let hash = ctx.finish();

        let mut bytes = [0u8; WALLET_ID_LENGTH];
        bytes.copy_from_slice(&hash.as_ref()[..WALLET_ID_LENGTH]);
        WalletId(bytes)
    }

    /// Parses the formatted form. Only lowercase hex is accepted.
    pub fn parse(s: &str) -> Result<Self, WalletIdError> {
        let invalid = || WalletIdError::Invalid(s.to_string());

        if s.len() != FORMATTED_WALLET_ID_LENGTH {
            return Err(invalid());
        }

        let groups: Vec<&str> = s.split('-').collect();
        if groups.len() != GROUP_COUNT
            || groups.iter().any(|g| {
                g.len() != GROUP_HEX_LEN
                    || !g.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
            })
        {
            return Err(invalid());
        }

        let mut bytes = [0u8; WALLET_ID_LENGTH];
        hex::decode_to_slice(groups.concat(), &mut bytes).map_err(|_| invalid())?;
        Ok(WalletId(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; WALLET_ID_LENGTH] {
        &self.0
    }

    /// Returns the dash-separated form.
    pub fn formatted(&self) -> String {
        let hex = hex::encode(self.0);
        hex.as_bytes()
            .chunks(GROUP_HEX_LEN)
            .map(|c| std::str::from_utf8(c).unwrap_or_default())
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl fmt::Debug for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletId({})", self.formatted())
    }
}

impl FromStr for WalletId {
    type Err = WalletIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WalletId::parse(s)
    }
}

impl Serialize for WalletId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.formatted())
    }
}

impl<'de> Deserialize<'de> for WalletId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        WalletId::parse(&s).map_err(serde::de::Error::custom)
    }
}
