// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Credential Rotation
//!
//! Changes the spending password of a wallet: every encrypted store, the
//! wallet file and the escrow blobs in the summary are re-encrypted under
//! the new password.
//!
//! Nothing is overwritten until every replacement has been written next to
//! its original and the new escrow has been round-tripped. Commit is a
//! sequence of renames, so an interruption leaves each file readable under
//! exactly one of the two passwords. Running the rotation again with the
//! same passwords finishes the job: files already under the new password
//! are skipped.
//!
//! The caller must stop every other wallet mutator (sync, sends, auto-save,
//! the backup scheduler) for the duration of [`PasswordRotation::run`].

mod pending;
mod state;

pub use pending::{staged_path, PendingRotation, StagedFile, StagedKind, STAGED_SUFFIX};
pub use state::RotationState;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::crypto::{
    derive_password_key, wrap_verified, EscrowError, KdfParams, PasswordKdfError, SecretEscrow,
    SymmetricKey,
};
use crate::storage::{read_encrypted, write_encrypted, StorageError};
use crate::wallet::{Ledger, WalletError, WalletLayout, WalletSummary};

/// Password rotation errors.
#[derive(Error, Debug)]
pub enum RotationError {
    #[error("Old password does not unlock the wallet")]
    WrongOldPassword,
    #[error("Re-encrypted key material failed its round-trip check")]
    EncryptionNotReversible,
    #[error("Staging {path} failed: {source}")]
    StagingFailed {
        path: PathBuf,
        #[source]
        source: StorageError,
    },
    #[error("Commit interrupted: {committed} files committed, {pending} pending: {source}")]
    PartialCommit {
        committed: usize,
        pending: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid rotation transition {from} -> {to}")]
    InvalidTransition {
        from: RotationState,
        to: RotationState,
    },
    #[error("Escrow error: {0}")]
    Escrow(#[from] EscrowError),
    #[error("Key derivation failed: {0}")]
    Kdf(#[from] PasswordKdfError),
    #[error(transparent)]
    Wallet(#[from] WalletError),
}

impl From<crate::wallet::LedgerError> for RotationError {
    fn from(e: crate::wallet::LedgerError) -> Self {
        RotationError::Wallet(WalletError::Ledger(e))
    }
}

/// Outcome of [`PasswordRotation::run`].
#[derive(Debug)]
pub struct RotationReport {
    /// `Done` on success, `Failed` when aborted before commit, `Committing`
    /// when a commit was interrupted.
    pub state: RotationState,
    pub error: Option<RotationError>,
    /// Originals replaced by their re-encrypted copies.
    pub committed: Vec<PathBuf>,
    /// Staged copies that were deleted instead of committed.
    pub discarded: Vec<PathBuf>,
}

impl RotationReport {
    pub fn is_success(&self) -> bool {
        self.state == RotationState::Done
    }

    /// Some files are under the new password and some under the old one.
    pub fn is_partial(&self) -> bool {
        self.state == RotationState::Committing
    }
}

/// Escrow material carried from verification to staging.
struct EscrowPlan {
    summary: WalletSummary,
    backup_key: SymmetricKey,
}

/// Password rotation for one wallet root.
#[derive(Debug, Clone)]
pub struct PasswordRotation {
    layout: WalletLayout,
    kdf: KdfParams,
}

impl PasswordRotation {
    pub fn new(layout: WalletLayout, kdf: KdfParams) -> Self {
        Self { layout, kdf }
    }

    pub fn layout(&self) -> &WalletLayout {
        &self.layout
    }

    /// Runs the whole rotation and reports the outcome.
    ///
    /// On failure before commit the ledger is left under the old password
    /// and no original is touched.
    pub fn run<L: Ledger>(
        &self,
        ledger: &mut L,
        old_password: &str,
        new_password: &str,
    ) -> RotationReport {
        let mut pending = PendingRotation::new();

        if let Err(error) = self.prepare_into(ledger, old_password, new_password, &mut pending) {
            tracing::warn!("Password change aborted while {}: {}", pending.state(), error);
            pending.fail();
            return RotationReport {
                state: pending.state(),
                error: Some(error),
                committed: Vec::new(),
                discarded: pending.discard(),
            };
        }

        match pending.commit() {
            Ok(()) => {
                tracing::info!(
                    "Password changed for {} ({} files)",
                    self.layout.root().display(),
                    pending.committed().len()
                );
                RotationReport {
                    state: pending.state(),
                    error: None,
                    committed: pending.committed().to_vec(),
                    discarded: Vec::new(),
                }
            }
            Err(error) => {
                if pending.ledger_rotated() && !pending.wallet_committed() {
                    revert_ledger(ledger, old_password, new_password);
                }
                tracing::warn!("Password change partially committed, retry it: {}", error);
                RotationReport {
                    state: pending.state(),
                    error: Some(error),
                    committed: pending.committed().to_vec(),
                    discarded: pending.discard(),
                }
            }
        }
    }

    /// Verifies and stages the rotation without committing it.
    ///
    /// The returned [`PendingRotation`] is in `Verified` state and the ledger
    /// is already under the new password; reload the wallet from disk if the
    /// pending rotation is dropped. On error the ledger is restored to the
    /// old password and staged files are removed.
    pub fn prepare<L: Ledger>(
        &self,
        ledger: &mut L,
        old_password: &str,
        new_password: &str,
    ) -> Result<PendingRotation, RotationError> {
        let mut pending = PendingRotation::new();
        self.prepare_into(ledger, old_password, new_password, &mut pending)?;
        Ok(pending)
    }

    fn prepare_into<L: Ledger>(
        &self,
        ledger: &mut L,
        old_password: &str,
        new_password: &str,
        pending: &mut PendingRotation,
    ) -> Result<(), RotationError> {
        let result = self.stage(ledger, old_password, new_password, pending);
        if result.is_err() && pending.ledger_rotated() {
            revert_ledger(ledger, old_password, new_password);
        }
        result
    }

    fn stage<L: Ledger>(
        &self,
        ledger: &mut L,
        old_password: &str,
        new_password: &str,
        pending: &mut PendingRotation,
    ) -> Result<(), RotationError> {
        // === Verifying ===
        pending.advance(RotationState::Verifying)?;
        let old_key = derive_password_key(old_password, &self.kdf)?;
        let new_key = derive_password_key(new_password, &self.kdf)?;

        let rotate_wallet = if ledger.check_password(old_password) {
            true
        } else if ledger.check_password(new_password) {
            tracing::info!("Wallet file already under the new password");
            false
        } else {
            return Err(RotationError::WrongOldPassword);
        };

        let escrow_plan = self.verify_escrow(old_password, &old_key, &new_key)?;
        let mut old_password_used = rotate_wallet || escrow_plan.is_some();

        // === Staging ===
        pending.advance(RotationState::Staging)?;
        let root = self.layout.root().to_path_buf();
        let stores = self
            .layout
            .encrypted_stores()
            .map_err(|e| RotationError::StagingFailed {
                path: root.clone(),
                source: StorageError::io(root, e),
            })?;
        for store in stores {
            old_password_used |= stage_store(&store, &old_key, &new_key, pending)?;
        }
        // Everything already under the new password still needs proof of the old one
        if !old_password_used {
            return Err(RotationError::WrongOldPassword);
        }

        if rotate_wallet {
            ledger.decrypt(old_password)?;
            pending.set_ledger_rotated();
            ledger.encrypt(new_password)?;

            let wallet_file = self.layout.wallet_file();
            let staged = staged_path(&wallet_file);
            pending.push(StagedKind::Wallet, wallet_file, staged.clone());
            ledger.save_to_file(&staged)?;
        }

        let new_escrow = match escrow_plan {
            Some(EscrowPlan {
                mut summary,
                backup_key,
            }) => {
                let escrow = SecretEscrow::seal(&backup_key, new_password, &new_key)
                    .map_err(not_reversible)?;
                summary.set_escrow(&escrow);

                let summary_file = self.layout.summary_file();
                let staged = staged_path(&summary_file);
                pending.push(StagedKind::Summary, summary_file, staged.clone());
                summary.save(&staged)?;
                Some((escrow, backup_key, staged))
            }
            None => None,
        };

        // === Verified ===
        if let Some((escrow, backup_key, staged)) = new_escrow {
            escrow
                .verify(&backup_key, &new_key, new_password)
                .map_err(not_reversible)?;
            let persisted = WalletSummary::load(&staged)?.escrow();
            if persisted.as_ref() != Some(&escrow) {
                return Err(RotationError::EncryptionNotReversible);
            }
        }
        if rotate_wallet && !ledger.check_password(new_password) {
            return Err(RotationError::EncryptionNotReversible);
        }
        pending.advance(RotationState::Verified)
    }

    /// Unlocks and round-trips the existing escrow with the old password.
    ///
    /// `None` when the wallet has no summary, no escrow, or the escrow is
    /// already sealed under the new password.
    fn verify_escrow(
        &self,
        old_password: &str,
        old_key: &SymmetricKey,
        new_key: &SymmetricKey,
    ) -> Result<Option<EscrowPlan>, RotationError> {
        let summary_file = self.layout.summary_file();
        if !summary_file.is_file() {
            return Ok(None);
        }
        let summary = WalletSummary::load(&summary_file)?;
        let Some(escrow) = summary.escrow() else {
            return Ok(None);
        };

        let backup_key = match escrow.unlock_backup_key(old_key) {
            Ok(backup_key) => backup_key,
            Err(_) if escrow.unlock_backup_key(new_key).is_ok() => {
                tracing::info!("Escrow already under the new password");
                return Ok(None);
            }
            Err(_) => return Err(RotationError::WrongOldPassword),
        };

        wrap_verified(backup_key.as_bytes(), old_key).map_err(not_reversible)?;
        escrow
            .verify(&backup_key, old_key, old_password)
            .map_err(not_reversible)?;

        Ok(Some(EscrowPlan {
            summary,
            backup_key,
        }))
    }
}

fn not_reversible(e: EscrowError) -> RotationError {
    tracing::error!("Escrow round trip failed: {}", e);
    RotationError::EncryptionNotReversible
}

/// Re-encrypts one store into its staged path and returns true if it did.
///
/// A store that only opens under the new key was committed by an earlier,
/// interrupted rotation and is left alone.
fn stage_store(
    store: &Path,
    old_key: &SymmetricKey,
    new_key: &SymmetricKey,
    pending: &mut PendingRotation,
) -> Result<bool, RotationError> {
    let staging_failed = |source| RotationError::StagingFailed {
        path: store.to_path_buf(),
        source,
    };

    let plaintext = match read_encrypted(store, old_key) {
        Ok(plaintext) => zeroize::Zeroizing::new(plaintext),
        Err(StorageError::Encryption(e)) => {
            if read_encrypted(store, new_key).is_ok() {
                tracing::debug!("{} already under the new password", store.display());
                return Ok(false);
            }
            return Err(staging_failed(StorageError::Encryption(e)));
        }
        Err(e) => return Err(staging_failed(e)),
    };

    // Registered before writing so a partial write is discarded with the rest
    let staged = staged_path(store);
    pending.push(StagedKind::Store, store.to_path_buf(), staged.clone());
    write_encrypted(&staged, new_key, &plaintext).map_err(staging_failed)?;
    Ok(true)
}

/// Puts the in-memory ledger back under the old password.
fn revert_ledger<L: Ledger>(ledger: &mut L, old_password: &str, new_password: &str) {
    let result = if ledger.check_password(new_password) {
        ledger
            .decrypt(new_password)
            .and_then(|()| ledger.encrypt(old_password))
    } else {
        ledger.encrypt(old_password)
    };
    if let Err(e) = result {
        tracing::error!("Could not restore the wallet to its old password: {}", e);
    }
}
