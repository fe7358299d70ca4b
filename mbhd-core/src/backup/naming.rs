// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backup file naming.
//!
//! Names are bit-exact with existing installations:
//!
//! - rolling: `mbhd-<yyyyMMddHHmmss>.wallet`
//! - archive: `mbhd-<wallet id>-<yyyyMMddHHmmss>.zip`
//! - wallet root directory: `mbhd-<wallet id>`
//!
//! Timestamps are local wall-clock time; the same format writes and parses
//! them, so lexicographic order equals chronological order.

use std::path::Path;
use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::wallet::{WalletId, FORMATTED_WALLET_ID_LENGTH};

/// Prefix shared by wallet directories and backup files.
pub const MBHD_PREFIX: &str = "mbhd";
/// Rolling backup extension.
pub const ROLLING_BACKUP_SUFFIX: &str = ".wallet";
/// Archive backup extension.
pub const ARCHIVE_BACKUP_SUFFIX: &str = ".zip";
/// `chrono` format of the embedded timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
/// Width of the embedded timestamp.
pub const TIMESTAMP_LEN: usize = 14;

fn rolling_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^mbhd-(\d{14})\.wallet$").expect("valid regex"))
}

fn archive_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^mbhd-([0-9a-f]{8}(?:-[0-9a-f]{8}){4})-(\d{14})\.zip$").expect("valid regex")
    })
}

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a 14-digit timestamp; anything else (including impossible dates) is `None`.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if s.len() != TIMESTAMP_LEN || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok()
}

/// Current local time truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    let now = chrono::Local::now().naive_local();
    parse_timestamp(&format_timestamp(&now)).unwrap_or(now)
}

/// Name of a wallet's root directory.
pub fn wallet_root_name(wallet_id: &WalletId) -> String {
    format!("{}-{}", MBHD_PREFIX, wallet_id)
}

pub fn rolling_backup_name(timestamp: &NaiveDateTime) -> String {
    format!(
        "{}-{}{}",
        MBHD_PREFIX,
        format_timestamp(timestamp),
        ROLLING_BACKUP_SUFFIX
    )
}

pub fn archive_backup_name(wallet_id: &WalletId, timestamp: &NaiveDateTime) -> String {
    format!(
        "{}-{}-{}{}",
        MBHD_PREFIX,
        wallet_id,
        format_timestamp(timestamp),
        ARCHIVE_BACKUP_SUFFIX
    )
}

/// Timestamp of a rolling backup file name, if it follows the convention.
pub fn parse_rolling_name(file_name: &str) -> Option<NaiveDateTime> {
    let captures = rolling_regex().captures(file_name)?;
    parse_timestamp(&captures[1])
}

/// Wallet id and timestamp of an archive file name, if it follows the convention.
pub fn parse_archive_name(file_name: &str) -> Option<(WalletId, NaiveDateTime)> {
    let captures = archive_regex().captures(file_name)?;
    let wallet_id = WalletId::parse(&captures[1]).ok()?;
    let timestamp = parse_timestamp(&captures[2])?;
    Some((wallet_id, timestamp))
}

/// Extracts the wallet id from an archive file name.
///
/// Strips the prefix and `.zip` suffix, then keeps the first
/// [`FORMATTED_WALLET_ID_LENGTH`] characters, discarding the timestamp.
pub fn wallet_id_from_archive_name(file_name: &str) -> Option<WalletId> {
    let rest = file_name
        .strip_prefix(MBHD_PREFIX)?
        .strip_prefix('-')?
        .strip_suffix(ARCHIVE_BACKUP_SUFFIX)?;
    let id = rest.get(..FORMATTED_WALLET_ID_LENGTH)?;
    WalletId::parse(id).ok()
}

/// Extracts the wallet id from a wallet root directory name.
pub fn wallet_id_from_root_name(dir_name: &str) -> Option<WalletId> {
    let id = dir_name.strip_prefix(MBHD_PREFIX)?.strip_prefix('-')?;
    WalletId::parse(id).ok()
}

/// Recovers the wallet id a backup belongs to from its path.
///
/// Archives carry the id in their file name. Rolling backups don't, so the
/// id comes from the wallet root two levels up
/// (`mbhd-<id>/rolling-backup/mbhd-<ts>.wallet`).
pub fn parse_wallet_id(path: &Path) -> Option<WalletId> {
    let file_name = path.file_name()?.to_str()?;

    if let Some(wallet_id) = wallet_id_from_archive_name(file_name) {
        return Some(wallet_id);
    }

    parse_rolling_name(file_name)?;
    let root = path.parent()?.parent()?;
    wallet_id_from_root_name(root.file_name()?.to_str()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[test]
    fn test_rolling_name_format() {
        assert_eq!(rolling_backup_name(&ts()), "mbhd-20240102030405.wallet");
        assert_eq!(parse_rolling_name("mbhd-20240102030405.wallet"), Some(ts()));
    }

    #[test]
    fn test_archive_name_format() {
        let id = WalletId::parse("66fa1e6b-8c4d7a1d-35e2b8f0-0f2a9c11-d4a3e9b7").unwrap();
        let name = archive_backup_name(&id, &ts());
        assert_eq!(
            name,
            "mbhd-66fa1e6b-8c4d7a1d-35e2b8f0-0f2a9c11-d4a3e9b7-20240102030405.zip"
        );
        assert_eq!(parse_archive_name(&name), Some((id, ts())));
        assert_eq!(wallet_id_from_archive_name(&name), Some(id));
    }

    #[test]
    fn test_non_matching_names_ignored() {
        assert_eq!(parse_rolling_name("mbhd-2024010203040.wallet"), None);
        assert_eq!(parse_rolling_name("mbhd-20240102030405.wallet.partial"), None);
        assert_eq!(parse_rolling_name("other-20240102030405.wallet"), None);
        // month 13
        assert_eq!(parse_rolling_name("mbhd-20241302030405.wallet"), None);
        assert_eq!(parse_archive_name("mbhd-20240102030405.zip"), None);
    }

    #[test]
    fn test_timestamp_order_is_lexicographic() {
        let earlier = format_timestamp(&ts());
        let later = format_timestamp(&(ts() + chrono::Duration::seconds(1)));
        assert!(earlier < later);
    }
}
