// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Rotation state machine.
//!
//! ```text
//! Idle -> Verifying -> Staging -> Verified -> Committing -> Done
//!             \            \          \
//!              +------------+----------+--> Failed
//! ```

use std::fmt;

/// States of a password rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationState {
    /// Nothing done yet.
    Idle,
    /// Checking the old password against the wallet and the escrow.
    Verifying,
    /// Writing re-encrypted copies next to the originals.
    Staging,
    /// Every staged file written and the new escrow round-tripped.
    Verified,
    /// Renaming staged files over the originals, one by one.
    Committing,
    /// All files committed.
    Done,
    /// Aborted before any commit; originals untouched.
    Failed,
}

impl RotationState {
    /// Returns true if `next` is a legal successor of `self`.
    pub fn can_transition_to(self, next: RotationState) -> bool {
        use RotationState::*;
        matches!(
            (self, next),
            (Idle, Verifying)
                | (Verifying, Staging)
                | (Staging, Verified)
                | (Verified, Committing)
                | (Committing, Done)
                | (Verifying, Failed)
                | (Staging, Failed)
                | (Verified, Failed)
        )
    }

    /// No further transitions are possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, RotationState::Done | RotationState::Failed)
    }
}

impl fmt::Display for RotationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RotationState::Idle => "idle",
            RotationState::Verifying => "verifying",
            RotationState::Staging => "staging",
            RotationState::Verified => "verified",
            RotationState::Committing => "committing",
            RotationState::Done => "done",
            RotationState::Failed => "failed",
        };
        f.write_str(name)
    }
}
