// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Password Commands
//!
//! Change a wallet's spending password, or recover it from the seed.

use anyhow::{bail, Context, Result};
use mbhd_core::{LedgerError, SealedWallet, WalletLayout, WalletSummary};
use zeroize::Zeroizing;

use crate::commands::secret;
use crate::config::CliConfig;
use crate::display;

/// Opens the wallet under the old password, or under the new one when an
/// earlier change was interrupted after the wallet file was committed.
fn open_for_change(
    config: &CliConfig,
    layout: &WalletLayout,
    old_password: &str,
    new_password: &str,
) -> Result<SealedWallet> {
    let path = layout.wallet_file();
    match SealedWallet::load_with_params(&path, old_password, config.backup.kdf) {
        Err(LedgerError::WrongPassword) => {
            SealedWallet::load_with_params(&path, new_password, config.backup.kdf)
                .map_err(|_| anyhow::anyhow!("Current password is incorrect"))
        }
        other => other.context("Could not open wallet"),
    }
}

/// Re-encrypts every wallet file under a new password.
pub fn change(
    config: &CliConfig,
    wallet: &str,
    old_password: Option<String>,
    new_password: Option<String>,
) -> Result<()> {
    let (wallet_id, layout) = config.wallet(wallet)?;
    let old_password = secret(old_password, "Current password")?;
    let new_password = secret(new_password, "New password")?;
    if new_password.is_empty() {
        bail!("New password must not be empty");
    }

    let mut ledger = open_for_change(config, &layout, &old_password, &new_password)?;
    let report = config
        .rotation(layout)
        .run(&mut ledger, &old_password, &new_password);

    if report.is_success() {
        display::success(&format!(
            "Password changed for wallet {} ({} files re-encrypted)",
            wallet_id,
            report.committed.len()
        ));
        return Ok(());
    }

    if report.is_partial() {
        display::warning(&format!(
            "{} files re-encrypted before the change was interrupted.",
            report.committed.len()
        ));
        println!("  Run the same command again to finish it.");
    }

    match report.error {
        Some(error) => Err(error).context("Password change failed"),
        None => bail!("Password change stopped in state {}", report.state),
    }
}

/// Recovers the spending password from the wallet seed and the escrow.
pub fn recover(config: &CliConfig, wallet: &str, seed: Option<String>) -> Result<()> {
    let (wallet_id, layout) = config.wallet(wallet)?;

    let summary = WalletSummary::load(&layout.summary_file())
        .context("Could not read wallet summary")?;
    let Some(escrow) = summary.escrow() else {
        bail!("Wallet {} has no password escrow", wallet_id);
    };

    let seed_hex = secret(seed, "Wallet seed (hex)")?;
    let seed = Zeroizing::new(hex::decode(seed_hex.trim()).context("Seed is not valid hex")?);

    let password = escrow
        .recover_password(&seed, &config.backup.kdf)
        .context("Seed does not unlock this wallet's password")?;

    display::success(&format!("Password for wallet {} recovered:", wallet_id));
    println!("  {}", password.as_str());
    Ok(())
}
