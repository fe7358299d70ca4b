// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backup Commands
//!
//! Create rolling, local and cloud backups, and list them.

use anyhow::Result;

use crate::commands::secret;
use crate::config::CliConfig;
use crate::display;

/// Writes a rolling backup of the wallet file.
pub fn rolling(config: &CliConfig, wallet: &str, password: Option<String>) -> Result<()> {
    let (wallet_id, layout) = config.wallet(wallet)?;
    let password = secret(password, "Wallet password")?;
    let ledger = config.open_wallet(&layout, &password)?;

    let record = config
        .manager()
        .create_rolling_backup(&wallet_id, &ledger)?;

    display::success(&format!("Rolling backup written: {}", record.path.display()));
    Ok(())
}

/// Writes a local zip archive.
pub fn archive(config: &CliConfig, wallet: &str) -> Result<()> {
    let (wallet_id, _) = config.wallet(wallet)?;

    let record = config.manager().create_archive_backup(
        &wallet_id,
        config.backup.include_blockchain_cache_locally,
    )?;

    display::success(&format!("Archive written: {}", record.path.display()));
    Ok(())
}

/// Writes a zip archive into the cloud folder.
pub fn cloud(config: &CliConfig, wallet: &str) -> Result<()> {
    let (wallet_id, _) = config.wallet(wallet)?;

    match config.manager().create_cloud_backup(&wallet_id)? {
        Some(record) => {
            display::success(&format!("Cloud archive written: {}", record.path.display()));
        }
        None => {
            display::warning("No cloud backup folder available.");
            println!("  Set it with: mbhd --cloud-dir <DIR> backup cloud <WALLET>");
        }
    }
    Ok(())
}

/// Lists rolling, local and cloud backups.
pub fn list(config: &CliConfig, wallet: &str) -> Result<()> {
    let (wallet_id, _) = config.wallet(wallet)?;
    let manager = config.manager();

    let groups = [
        ("rolling", manager.get_rolling_backups(&wallet_id)?),
        ("local zip", manager.get_local_zip_backups(&wallet_id)?),
        ("cloud zip", manager.get_cloud_zip_backups(&wallet_id)?),
    ];
    let total: usize = groups.iter().map(|(_, records)| records.len()).sum();

    if total == 0 {
        display::info(&format!("No backups yet for wallet {}.", wallet_id));
        return Ok(());
    }

    println!();
    println!("Backups of {} ({}):", wallet_id, total);
    println!();
    display::display_backups_table(&groups);
    println!();

    Ok(())
}
