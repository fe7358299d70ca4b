// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Persistent Storage Module
//!
//! File-level primitives shared by backups and password rotation: durable
//! writes, encrypted store files and secure deletion.

pub mod encrypted_file;
pub mod erase;
mod error;

pub use encrypted_file::{read_encrypted, write_durably, write_encrypted};
pub use erase::{secure_delete, secure_delete_quietly, secure_delete_with, RetryPolicy};
pub use error::{EraseError, StorageError};
