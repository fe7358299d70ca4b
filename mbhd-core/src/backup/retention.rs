// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Retention policy for rolling and archive backups.
//!
//! Both functions are pure: they decide which entries of an oldest-first
//! listing to remove, and the caller does the deleting.

/// Rolling backups kept after thinning.
pub const MAX_ROLLING_BACKUPS: usize = 4;
/// Soft cap on archive backups per directory.
pub const MAX_ARCHIVE_BACKUPS: usize = 60;
/// Oldest archives that are never thinned.
pub const KEEP_FIRST_ARCHIVES: usize = 2;
/// Newest archives that are never thinned.
pub const KEEP_LAST_ARCHIVES: usize = 8;

/// Number of oldest rolling backups to purge from a listing of `count`.
///
/// Removes at most two per call: one once the cap is exceeded, a second
/// when two backups arrived before the previous thin caught up.
pub fn rolling_backups_to_purge(count: usize) -> usize {
    if count > MAX_ROLLING_BACKUPS + 1 {
        2
    } else if count > MAX_ROLLING_BACKUPS {
        1
    } else {
        0
    }
}

/// Indices of an oldest-first archive listing of length `count` to remove.
///
/// Candidates come from the middle, oldest first; the first
/// [`KEEP_FIRST_ARCHIVES`] and last [`KEEP_LAST_ARCHIVES`] are never returned.
pub fn archives_to_thin(count: usize) -> Vec<usize> {
    if count <= MAX_ARCHIVE_BACKUPS {
        return Vec::new();
    }
    let excess = count - MAX_ARCHIVE_BACKUPS;
    let middle_end = count.saturating_sub(KEEP_LAST_ARCHIVES);

    (KEEP_FIRST_ARCHIVES..middle_end).take(excess).collect()
}
