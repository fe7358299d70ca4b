// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Restore Command
//!
//! Restores a wallet directory from a zip archive.

use std::path::Path;

use anyhow::{bail, Result};

use crate::config::CliConfig;
use crate::display;

pub fn run(config: &CliConfig, archive: &Path) -> Result<()> {
    if !archive.is_file() {
        bail!("Archive {:?} not found", archive);
    }

    let restored = config.manager().restore_from_archive(archive)?;

    display::success(&format!("Wallet {} restored", restored.wallet_id));
    if let Some(record) = restored.pre_restore_backup {
        display::info(&format!(
            "Previous state archived to {}",
            record.path.display()
        ));
    }
    Ok(())
}
