// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Proptest Strategies
//!
//! Reusable proptest strategies for property-based testing.

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use mbhd_core::crypto::SymmetricKey;
use mbhd_core::WalletId;

/// Secrets the escrow pads: 1 to 200 bytes.
pub fn secret_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=200)
}

/// Arbitrary wrap payloads, including empty.
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..512)
}

pub fn key_strategy() -> impl Strategy<Value = SymmetricKey> {
    prop::array::uniform32(any::<u8>()).prop_map(SymmetricKey::from_bytes)
}

pub fn wallet_id_strategy() -> impl Strategy<Value = WalletId> {
    prop::array::uniform20(any::<u8>()).prop_map(WalletId::from_bytes)
}

/// Whole-second timestamps between 1970 and 9999.
pub fn timestamp_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (1970i32..=9999, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60).prop_map(
        |(year, month, day, hour, minute, second)| {
            NaiveDate::from_ymd_opt(year, month, day)
                .unwrap()
                .and_hms_opt(hour, minute, second)
                .unwrap()
        },
    )
}
