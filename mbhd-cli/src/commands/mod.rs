// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI Commands

pub mod backup;
pub mod password;
pub mod restore;

use anyhow::Result;
use dialoguer::Password;
use zeroize::Zeroizing;

/// Uses `given` or prompts for a secret without echo.
pub(crate) fn secret(given: Option<String>, prompt: &str) -> Result<Zeroizing<String>> {
    match given {
        Some(value) => Ok(Zeroizing::new(value)),
        None => Ok(Zeroizing::new(
            Password::new().with_prompt(prompt).interact()?,
        )),
    }
}
