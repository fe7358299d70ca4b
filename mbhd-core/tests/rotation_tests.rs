// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for spending password rotation

mod common;

use common::{kdf, load_ledger, opens_under, TestWallet, NEW_PASSWORD, OLD_PASSWORD, SEED};
use mbhd_core::rotation::{staged_path, PasswordRotation, RotationError, RotationState};
use mbhd_core::{Ledger, WalletSummary};

fn rotation_for(wallet: &TestWallet) -> PasswordRotation {
    PasswordRotation::new(wallet.layout.clone(), kdf())
}

fn recovered_password(wallet: &TestWallet) -> String {
    let escrow = WalletSummary::load(&wallet.layout.summary_file())
        .unwrap()
        .escrow()
        .unwrap();
    escrow.recover_password(SEED, &kdf()).unwrap().to_string()
}

#[test]
fn test_full_rotation() {
    let mut wallet = TestWallet::new();
    let rotation = rotation_for(&wallet);

    let report = rotation.run(&mut wallet.ledger, OLD_PASSWORD, NEW_PASSWORD);

    assert_eq!(report.state, RotationState::Done);
    assert!(report.error.is_none());
    assert!(report.discarded.is_empty());
    // 3 stores + 2 payment requests + wallet + summary
    assert_eq!(report.committed.len(), 7);

    for file in wallet.layout.encrypted_stores().unwrap() {
        assert_eq!(opens_under(&file), Some(NEW_PASSWORD), "{}", file.display());
        assert!(!staged_path(&file).exists());
    }
    let (_, password) = load_ledger(&wallet.layout);
    assert_eq!(password, NEW_PASSWORD);
    assert!(wallet.ledger.check_password(NEW_PASSWORD));
    assert_eq!(recovered_password(&wallet), NEW_PASSWORD);
}

#[test]
fn test_escrow_keeps_seed_key_across_rotation() {
    let mut wallet = TestWallet::new();
    let before = WalletSummary::load(&wallet.layout.summary_file())
        .unwrap()
        .escrow()
        .unwrap()
        .backup_key_from_password(OLD_PASSWORD, &kdf())
        .unwrap();

    assert!(rotation_for(&wallet)
        .run(&mut wallet.ledger, OLD_PASSWORD, NEW_PASSWORD)
        .is_success());

    let after = WalletSummary::load(&wallet.layout.summary_file())
        .unwrap()
        .escrow()
        .unwrap()
        .backup_key_from_password(NEW_PASSWORD, &kdf())
        .unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_wrong_old_password_fails_cleanly() {
    let mut wallet = TestWallet::new();
    let files = wallet.password_protected_files();
    let before: Vec<Vec<u8>> = files.iter().map(|f| std::fs::read(f).unwrap()).collect();

    let report = rotation_for(&wallet).run(&mut wallet.ledger, "not it", NEW_PASSWORD);

    assert_eq!(report.state, RotationState::Failed);
    assert!(matches!(report.error, Some(RotationError::WrongOldPassword)));
    let after: Vec<Vec<u8>> = files.iter().map(|f| std::fs::read(f).unwrap()).collect();
    assert_eq!(before, after);
    assert!(wallet.ledger.check_password(OLD_PASSWORD));
}

#[test]
fn test_rerun_after_rotation_still_checks_old_password() {
    let mut wallet = TestWallet::new();
    let rotation = rotation_for(&wallet);
    assert!(rotation
        .run(&mut wallet.ledger, OLD_PASSWORD, NEW_PASSWORD)
        .is_success());
    let files = wallet.password_protected_files();
    let before: Vec<Vec<u8>> = files.iter().map(|f| std::fs::read(f).unwrap()).collect();

    // Every file already opens under the new password
    let (mut ledger, _) = load_ledger(&wallet.layout);
    let report = rotation.run(&mut ledger, "totally wrong", NEW_PASSWORD);

    assert_eq!(report.state, RotationState::Failed);
    assert!(matches!(report.error, Some(RotationError::WrongOldPassword)));
    assert!(report.committed.is_empty());
    let after: Vec<Vec<u8>> = files.iter().map(|f| std::fs::read(f).unwrap()).collect();
    assert_eq!(before, after);
    assert!(ledger.check_password(NEW_PASSWORD));
}

#[test]
fn test_corrupt_escrow_is_not_reversible() {
    let mut wallet = TestWallet::new();
    let mut summary = WalletSummary::load(&wallet.layout.summary_file()).unwrap();
    // Backup key still unwraps, but the password blob no longer matches
    let other = mbhd_core::SecretEscrow::create(SEED, "someone else", &kdf()).unwrap();
    summary.encrypted_password = Some(other.encrypted_password().to_vec());
    summary.save(&wallet.layout.summary_file()).unwrap();

    let report = rotation_for(&wallet).run(&mut wallet.ledger, OLD_PASSWORD, NEW_PASSWORD);

    assert_eq!(report.state, RotationState::Failed);
    assert!(matches!(
        report.error,
        Some(RotationError::EncryptionNotReversible)
    ));
    assert_eq!(opens_under(&wallet.layout.payments_db()), Some(OLD_PASSWORD));
}

#[test]
fn test_staging_failure_discards_and_restores_ledger() {
    let mut wallet = TestWallet::new();
    // Unreadable under either password
    std::fs::write(wallet.layout.history_db(), vec![0x5a; 96]).unwrap();

    let report = rotation_for(&wallet).run(&mut wallet.ledger, OLD_PASSWORD, NEW_PASSWORD);

    assert_eq!(report.state, RotationState::Failed);
    assert!(matches!(
        report.error,
        Some(RotationError::StagingFailed { .. })
    ));
    assert!(!report.discarded.is_empty());
    for staged in &report.discarded {
        assert!(!staged.exists());
    }
    assert_eq!(opens_under(&wallet.layout.payments_db()), Some(OLD_PASSWORD));
    assert!(wallet.ledger.check_password(OLD_PASSWORD));
}

#[test]
fn test_prepared_rotation_dropped_leaves_originals() {
    let mut wallet = TestWallet::new();
    let rotation = rotation_for(&wallet);

    let pending = rotation
        .prepare(&mut wallet.ledger, OLD_PASSWORD, NEW_PASSWORD)
        .unwrap();
    assert_eq!(pending.state(), RotationState::Verified);
    let staged: Vec<_> = pending.staged().map(|f| f.staged.clone()).collect();
    assert_eq!(staged.len(), 7);
    for path in &staged {
        assert!(path.exists());
    }
    drop(pending);

    for path in &staged {
        assert!(!path.exists());
    }
    for file in wallet.layout.encrypted_stores().unwrap() {
        assert_eq!(opens_under(&file), Some(OLD_PASSWORD));
    }
}

/// Commits all but `uncommitted` staged files, then "crashes" without cleanup.
fn crash_mid_commit(wallet: &TestWallet, uncommitted: usize) {
    let (mut ledger, _) = load_ledger(&wallet.layout);
    let mut pending = rotation_for(wallet)
        .prepare(&mut ledger, OLD_PASSWORD, NEW_PASSWORD)
        .unwrap();
    let total = pending.staged().count();
    for _ in 0..total - uncommitted {
        assert!(pending.commit_next().unwrap().is_some());
    }
    assert_eq!(pending.state(), RotationState::Committing);
    std::mem::forget(pending);
}

#[test]
fn test_crash_mid_commit_then_rerun() {
    // 1: only the summary is left; 2: wallet and summary; 6: one store onwards
    for uncommitted in [1, 2, 6] {
        let wallet = TestWallet::new();
        let files = wallet.password_protected_files();
        crash_mid_commit(&wallet, uncommitted);

        // Every file is whole and readable under exactly one password
        let mut new = 0;
        for file in &files {
            match opens_under(file) {
                Some(OLD_PASSWORD) => {}
                Some(NEW_PASSWORD) => new += 1,
                _ => panic!("{} opens under neither password", file.display()),
            }
        }
        assert_eq!(new, (7 - uncommitted).min(files.len()));

        // Restart: load the wallet as found on disk and run the same change again
        let (mut ledger, _) = load_ledger(&wallet.layout);
        let report = rotation_for(&wallet).run(&mut ledger, OLD_PASSWORD, NEW_PASSWORD);
        assert!(report.is_success(), "{:?}", report.error);
        assert_eq!(report.committed.len(), uncommitted);

        for file in &files {
            assert_eq!(opens_under(file), Some(NEW_PASSWORD), "{}", file.display());
        }
        assert!(ledger.check_password(NEW_PASSWORD));
        assert_eq!(recovered_password(&wallet), NEW_PASSWORD);
    }
}
