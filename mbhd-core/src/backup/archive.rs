// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Zip snapshots of a wallet root directory.
//!
//! Entry names are relative to the wallet root; the root folder itself is
//! not stored because the archive file name already carries the wallet id.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::wallet::layout::BLOCKCHAIN_CACHE_EXTENSION;

use super::resolver::ZIP_BACKUP_DIR;
use super::BackupError;

/// Suffix of an archive while it is being written.
const PARTIAL_SUFFIX: &str = ".partial";

/// Collects files and directories under `root`, depth first, sorted by name.
fn collect_entries(
    root: &Path,
    dir: &Path,
    include_blockchain_cache: bool,
    out: &mut Vec<(PathBuf, bool)>,
) -> Result<(), BackupError> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| BackupError::io(dir, e))?
        .collect::<Result<_, _>>()
        .map_err(|e| BackupError::io(dir, e))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| BackupError::io(&path, e))?;

        if file_type.is_dir() {
            // Never archive the archives
            if dir == root && entry.file_name() == ZIP_BACKUP_DIR {
                continue;
            }
            out.push((path.clone(), true));
            collect_entries(root, &path, include_blockchain_cache, out)?;
        } else if file_type.is_file() {
            let is_cache = path
                .extension()
                .is_some_and(|ext| ext == BLOCKCHAIN_CACHE_EXTENSION);
            if is_cache && !include_blockchain_cache {
                continue;
            }
            out.push((path, false));
        }
    }
    Ok(())
}

/// Zip entry name for `path` relative to `root`, always `/`-separated.
fn entry_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative.iter().map(|c| c.to_str()).collect();
    Some(parts?.join("/"))
}

/// Writes a zip of `root` to `zip_path`.
///
/// The archive is written under a temporary name and renamed into place, so
/// discovery never sees a half-written zip.
pub fn write_archive(
    root: &Path,
    zip_path: &Path,
    include_blockchain_cache: bool,
) -> Result<(), BackupError> {
    let mut entries = Vec::new();
    collect_entries(root, root, include_blockchain_cache, &mut entries)?;

    let mut partial = zip_path.as_os_str().to_owned();
    partial.push(PARTIAL_SUFFIX);
    let partial = PathBuf::from(partial);

    let file = File::create(&partial).map_err(|e| BackupError::io(&partial, e))?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let result = (|| -> Result<(), BackupError> {
        for (path, is_dir) in &entries {
            let Some(name) = entry_name(root, path) else {
                tracing::warn!("Skipping non UTF-8 path {}", path.display());
                continue;
            };

            if *is_dir {
                writer.add_directory(name, options)?;
                continue;
            }

            let mut source = File::open(path).map_err(|e| BackupError::io(path, e))?;
            let len = source
                .metadata()
                .map_err(|e| BackupError::io(path, e))?
                .len();
            writer.start_file(name, options.large_file(len >= u32::MAX as u64))?;
            io::copy(&mut source, &mut writer).map_err(|e| BackupError::io(path, e))?;
        }

        let mut inner = writer.finish()?;
        io::Write::flush(&mut inner).map_err(|e| BackupError::io(&partial, e))?;
        inner
            .get_ref()
            .sync_all()
            .map_err(|e| BackupError::io(&partial, e))
    })();

    if let Err(e) = result {
        let _ = std::fs::remove_file(&partial);
        return Err(e);
    }

    std::fs::rename(&partial, zip_path).map_err(|e| BackupError::io(zip_path, e))
}

/// Extracts `zip_path` into `dest`, overwriting existing files.
///
/// Parent directories are created on demand, so a file entry may precede
/// its directory entry. Entries that would escape `dest` are skipped.
pub fn extract_archive(zip_path: &Path, dest: &Path) -> Result<usize, BackupError> {
    let file = File::open(zip_path).map_err(|e| BackupError::io(zip_path, e))?;
    let mut archive = ZipArchive::new(file)?;

    std::fs::create_dir_all(dest).map_err(|e| BackupError::io(dest, e))?;

    let mut extracted = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!("Skipping unsafe archive entry {:?}", entry.name());
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path).map_err(|e| BackupError::io(&out_path, e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| BackupError::io(parent, e))?;
        }
        let mut out = File::create(&out_path).map_err(|e| BackupError::io(&out_path, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| BackupError::io(&out_path, e))?;
        extracted += 1;
    }

    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn zip_names(zip_path: &Path) -> Vec<String> {
        let mut archive = ZipArchive::new(File::open(zip_path).unwrap()).unwrap();
        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_entry_names_are_relative() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("wallet");
        std::fs::create_dir_all(root.join("payment-requests")).unwrap();
        std::fs::write(root.join("mbhd.wallet.aes"), b"w").unwrap();
        std::fs::write(root.join("payment-requests/r1.aes"), b"r").unwrap();

        let zip_path = temp_dir.path().join("out.zip");
        write_archive(&root, &zip_path, true).unwrap();

        assert_eq!(
            zip_names(&zip_path),
            vec!["mbhd.wallet.aes", "payment-requests/", "payment-requests/r1.aes"]
        );
        assert!(!temp_dir.path().join("out.zip.partial").exists());
    }

    #[test]
    fn test_blockchain_cache_exclusion() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("wallet");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("mbhd.spvchain"), b"chain").unwrap();
        std::fs::write(root.join("mbhd.wallet.aes"), b"w").unwrap();

        let without = temp_dir.path().join("without.zip");
        write_archive(&root, &without, false).unwrap();
        assert_eq!(zip_names(&without), vec!["mbhd.wallet.aes"]);

        let with = temp_dir.path().join("with.zip");
        write_archive(&root, &with, true).unwrap();
        assert_eq!(zip_names(&with), vec!["mbhd.spvchain", "mbhd.wallet.aes"]);
    }

    #[test]
    fn test_nested_zip_backup_dir_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("wallet");
        std::fs::create_dir_all(root.join("zip-backup")).unwrap();
        std::fs::create_dir_all(root.join("other/zip-backup")).unwrap();
        std::fs::write(root.join("zip-backup/old.zip"), b"z").unwrap();
        std::fs::write(root.join("other/zip-backup/keep.txt"), b"k").unwrap();

        let zip_path = temp_dir.path().join("out.zip");
        write_archive(&root, &zip_path, true).unwrap();

        let names = zip_names(&zip_path);
        assert!(names.contains(&"other/zip-backup/keep.txt".to_string()));
        assert!(!names.iter().any(|n| n.starts_with("zip-backup")));
    }
}
