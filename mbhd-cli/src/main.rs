// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! MBHD CLI
//!
//! Command-line interface for MBHD wallet backups and password changes.

mod commands;
mod config;
mod display;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mbhd_core::config::{APPLICATION_DIR_ENV, CLOUD_BACKUP_DIR_ENV};

use config::CliConfig;

#[derive(Parser)]
#[command(name = "mbhd")]
#[command(version, about = "Encrypted wallet backups and password rotation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Application directory holding the wallets (default: ~/.local/share/mbhd)
    #[arg(long, global = true, env = APPLICATION_DIR_ENV)]
    app_dir: Option<PathBuf>,

    /// Cloud folder that archive backups are mirrored into
    #[arg(long, global = true, env = CLOUD_BACKUP_DIR_ENV)]
    cloud_dir: Option<PathBuf>,

    /// Leave the blockchain cache out of local archives
    #[arg(long, global = true)]
    no_blockchain_cache: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create and list backups
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Restore a wallet from a zip archive
    Restore {
        /// Archive to restore (mbhd-<wallet-id>-<timestamp>.zip)
        archive: PathBuf,
    },

    /// Change a wallet's spending password
    ChangePassword {
        /// Wallet identifier
        wallet: String,

        /// Current password (prompted if absent)
        #[arg(long, env = "MBHD_OLD_PASSWORD", hide_env_values = true)]
        old_password: Option<String>,

        /// New password (prompted if absent)
        #[arg(long, env = "MBHD_NEW_PASSWORD", hide_env_values = true)]
        new_password: Option<String>,
    },

    /// Recover a wallet's spending password from its seed
    RecoverPassword {
        /// Wallet identifier
        wallet: String,

        /// Wallet seed as hex (prompted if absent)
        #[arg(long, env = "MBHD_SEED", hide_env_values = true)]
        seed: Option<String>,
    },
}

#[derive(Subcommand)]
enum BackupCommands {
    /// Write a rolling backup of the wallet file
    Rolling {
        /// Wallet identifier
        wallet: String,

        /// Spending password (prompted if absent)
        #[arg(long, env = "MBHD_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Write a local zip archive of the wallet directory
    Archive {
        /// Wallet identifier
        wallet: String,
    },

    /// Write a zip archive into the cloud folder
    Cloud {
        /// Wallet identifier
        wallet: String,
    },

    /// List every backup of a wallet
    List {
        /// Wallet identifier
        wallet: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("mbhd=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = CliConfig::resolve(cli.app_dir, cli.cloud_dir, cli.no_blockchain_cache);
    tracing::debug!("Application directory {:?}", config.backup.application_dir);

    match cli.command {
        Commands::Backup(cmd) => match cmd {
            BackupCommands::Rolling { wallet, password } => {
                commands::backup::rolling(&config, &wallet, password)?;
            }
            BackupCommands::Archive { wallet } => commands::backup::archive(&config, &wallet)?,
            BackupCommands::Cloud { wallet } => commands::backup::cloud(&config, &wallet)?,
            BackupCommands::List { wallet } => commands::backup::list(&config, &wallet)?,
        },
        Commands::Restore { archive } => commands::restore::run(&config, &archive)?,
        Commands::ChangePassword {
            wallet,
            old_password,
            new_password,
        } => {
            commands::password::change(&config, &wallet, old_password, new_password)?;
        }
        Commands::RecoverPassword { wallet, seed } => {
            commands::password::recover(&config, &wallet, seed)?;
        }
    }

    Ok(())
}
