// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! MBHD Core Library
//!
//! Encrypted wallet backups and spending-password rotation.
//! Random numbers and hashing use the audited `ring` crate; the key wrapping
//! format (scrypt + AES-256-CBC with a fixed IV) is shared with existing
//! wallets and must not change.

pub mod backup;
pub mod config;
pub mod crypto;
pub mod rotation;
pub mod storage;
pub mod wallet;

pub use backup::{
    BackupDirectories, BackupError, BackupManager, BackupRecord, BackupScheduler, BackupTier,
    RestoredWallet, SchedulerHandle,
};
pub use config::BackupConfig;
pub use crypto::{
    derive_aes_key, pad_secret, unpad_secret, unwrap, wrap, EncryptionError, EscrowError,
    KdfParams, PaddingError, SecretEscrow, SymmetricKey,
};
pub use rotation::{PasswordRotation, PendingRotation, RotationError, RotationReport, RotationState};
pub use storage::{secure_delete, EraseError, RetryPolicy, StorageError};
pub use wallet::{
    Ledger, LedgerError, SealedWallet, WalletError, WalletId, WalletLayout, WalletSummary,
    WalletType,
};
