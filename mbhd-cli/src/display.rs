// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Terminal output helpers.

use console::style;
use mbhd_core::BackupRecord;
use tabled::settings::Style;
use tabled::{Table, Tabled};

pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

pub fn info(msg: &str) {
    println!("{} {}", style("•").cyan(), msg);
}

pub fn warning(msg: &str) {
    eprintln!("{} {}", style("!").yellow().bold(), msg);
}

#[derive(Tabled)]
struct BackupRow {
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "File")]
    file: String,
}

/// Prints backups of several kinds as one table, newest first per kind.
pub fn display_backups_table(groups: &[(&'static str, Vec<BackupRecord>)]) {
    let rows: Vec<BackupRow> = groups
        .iter()
        .flat_map(|(kind, records)| {
            let kind = *kind;
            records.iter().rev().map(move |record| BackupRow {
                kind,
                created: record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                file: record
                    .path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            })
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}
