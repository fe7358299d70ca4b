// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Secure Delete
//!
//! Overwrites a file's full length with a fixed pseudo-random pattern before
//! unlinking it, so casual undelete tools recover noise instead of wallet
//! data. This is not forensic-grade erasure (journaling filesystems and SSD
//! wear levelling may keep older copies).
//!
//! Some platforms keep a file locked for a short while after the last handle
//! closes, so the overwrite-and-unlink step is retried with backoff.

use std::fs::OpenOptions;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;

use super::EraseError;

/// Size of each overwrite write.
const OVERWRITE_CHUNK: usize = 64 * 1024;

/// Retry strategy for locked files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Delay before the second attempt; doubles on every further attempt.
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_delay: Duration::from_millis(50),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self {
            attempts: 1,
            initial_delay: Duration::ZERO,
        }
    }
}

/// Static overwrite pattern (xorshift output, generated once).
fn overwrite_pattern() -> &'static [u8] {
    static PATTERN: OnceLock<Vec<u8>> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let mut state: u32 = 0x9e37_79b9;
        (0..OVERWRITE_CHUNK)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state >> 24) as u8
            })
            .collect()
    })
}

fn overwrite_and_remove(path: &Path) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).open(path)?;
    let len = file.metadata()?.len();

    file.seek(SeekFrom::Start(0))?;
    let pattern = overwrite_pattern();
    let mut remaining = len;
    while remaining > 0 {
        let n = remaining.min(pattern.len() as u64) as usize;
        file.write_all(&pattern[..n])?;
        remaining -= n as u64;
    }
    file.sync_all()?;
    drop(file);

    std::fs::remove_file(path)
}

/// Securely deletes `path` with the default [`RetryPolicy`].
///
/// A path that does not exist is a no-op.
pub fn secure_delete(path: &Path) -> Result<(), EraseError> {
    secure_delete_with(path, &RetryPolicy::default())
}

/// Securely deletes `path`, retrying according to `policy`.
pub fn secure_delete_with(path: &Path, policy: &RetryPolicy) -> Result<(), EraseError> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => return Err(EraseError::NotAFile(path.to_path_buf())),
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(EraseError::SecureDeleteFailed {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    with_retries(path, policy, || overwrite_and_remove(path))
}

fn with_retries<F>(path: &Path, policy: &RetryPolicy, mut op: F) -> Result<(), EraseError>
where
    F: FnMut() -> io::Result<()>,
{
    let mut delay = policy.initial_delay;
    let mut attempt = 1;
    loop {
        match op() {
            Ok(()) => {
                tracing::debug!("Securely deleted {}", path.display());
                return Ok(());
            }
            // Removed by someone else between attempts
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(source) if attempt >= policy.attempts.max(1) => {
                return Err(EraseError::SecureDeleteFailed {
                    path: path.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                tracing::debug!(
                    "Secure delete attempt {} for {} failed: {}",
                    attempt,
                    path.display(),
                    e
                );
                thread::sleep(delay);
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
        }
    }
}

/// Securely deletes `path`, logging instead of returning a failure.
///
/// Returns `true` when the file is gone.
pub fn secure_delete_quietly(path: &Path) -> bool {
    match secure_delete(path) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("{}", e);
            false
        }
    }
}
