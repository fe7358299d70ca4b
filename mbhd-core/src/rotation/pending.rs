// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Staged files of a password rotation and their commit.
//!
//! A staged file is a complete re-encrypted copy written next to its
//! original. Commit renames staged files over originals one at a time, so
//! an interruption leaves every file either fully old or fully new.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::storage::secure_delete_quietly;

use super::{RotationError, RotationState};

/// Suffix appended to an original's path for its staged copy.
pub const STAGED_SUFFIX: &str = ".rotate";

/// Path of the staged copy of `original`.
pub fn staged_path(original: &Path) -> PathBuf {
    let mut path = original.as_os_str().to_owned();
    path.push(STAGED_SUFFIX);
    PathBuf::from(path)
}

/// What a staged file replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagedKind {
    /// Payments, contacts, history or a payment request.
    Store,
    /// The ledger-owned wallet file.
    Wallet,
    /// Summary metadata holding the escrow.
    Summary,
}

/// An (original, staged) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub kind: StagedKind,
    pub original: PathBuf,
    pub staged: PathBuf,
}

/// A rotation that has staged files but not yet committed all of them.
///
/// Dropping it discards whatever is still staged; committed files stay.
#[derive(Debug)]
pub struct PendingRotation {
    state: RotationState,
    staged: VecDeque<StagedFile>,
    committed: Vec<PathBuf>,
    ledger_rotated: bool,
    wallet_committed: bool,
}

impl PendingRotation {
    pub(crate) fn new() -> Self {
        Self {
            state: RotationState::Idle,
            staged: VecDeque::new(),
            committed: Vec::new(),
            ledger_rotated: false,
            wallet_committed: false,
        }
    }

    pub fn state(&self) -> RotationState {
        self.state
    }

    /// Files still waiting to be committed, in commit order.
    pub fn staged(&self) -> impl Iterator<Item = &StagedFile> {
        self.staged.iter()
    }

    /// Originals already replaced, in commit order.
    pub fn committed(&self) -> &[PathBuf] {
        &self.committed
    }

    /// Returns true if the wallet file itself has been replaced.
    pub fn wallet_committed(&self) -> bool {
        self.wallet_committed
    }

    pub(crate) fn ledger_rotated(&self) -> bool {
        self.ledger_rotated
    }

    pub(crate) fn set_ledger_rotated(&mut self) {
        self.ledger_rotated = true;
    }

    pub(crate) fn advance(&mut self, next: RotationState) -> Result<(), RotationError> {
        if !self.state.can_transition_to(next) {
            return Err(RotationError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!("Password rotation {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Moves to `Failed` if the current state allows it.
    pub(crate) fn fail(&mut self) {
        if self.state.can_transition_to(RotationState::Failed) {
            self.state = RotationState::Failed;
        }
    }

    pub(crate) fn push(&mut self, kind: StagedKind, original: PathBuf, staged: PathBuf) {
        self.staged.push_back(StagedFile {
            kind,
            original,
            staged,
        });
    }

    /// Commits the next staged file and returns its original path.
    ///
    /// Returns `None` once everything is committed; the state is then `Done`.
    pub fn commit_next(&mut self) -> Result<Option<PathBuf>, RotationError> {
        match self.state {
            RotationState::Done => return Ok(None),
            RotationState::Verified => self.advance(RotationState::Committing)?,
            RotationState::Committing => {}
            from => {
                return Err(RotationError::InvalidTransition {
                    from,
                    to: RotationState::Committing,
                })
            }
        }

        let Some(next) = self.staged.front() else {
            self.advance(RotationState::Done)?;
            return Ok(None);
        };

        if let Err(source) = std::fs::rename(&next.staged, &next.original) {
            tracing::error!(
                "Commit of {} failed after {} of {} files: {}",
                next.original.display(),
                self.committed.len(),
                self.committed.len() + self.staged.len(),
                source
            );
            return Err(RotationError::PartialCommit {
                committed: self.committed.len(),
                pending: self.staged.len(),
                source,
            });
        }

        let Some(file) = self.staged.pop_front() else {
            return Ok(None);
        };
        tracing::debug!("Committed {}", file.original.display());
        if file.kind == StagedKind::Wallet {
            self.wallet_committed = true;
        }
        let original = file.original;
        self.committed.push(original.clone());

        if self.staged.is_empty() {
            self.advance(RotationState::Done)?;
        }
        Ok(Some(original))
    }

    /// Commits every staged file in order, stopping at the first failure.
    pub fn commit(&mut self) -> Result<(), RotationError> {
        while self.state != RotationState::Done {
            self.commit_next()?;
        }
        Ok(())
    }

    /// Secure-deletes every file still staged and returns their paths.
    pub fn discard(&mut self) -> Vec<PathBuf> {
        self.staged
            .drain(..)
            .map(|file| {
                secure_delete_quietly(&file.staged);
                file.staged
            })
            .collect()
    }
}

impl Drop for PendingRotation {
    fn drop(&mut self) {
        if !self.staged.is_empty() {
            tracing::debug!("Discarding {} staged files", self.staged.len());
            self.discard();
        }
    }
}
