// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Background backup scheduling.
//!
//! Each tier has one pending slot guarded by its own lock. Requests set the
//! slot, so repeated requests coalesce into a single backup. A single worker
//! takes the slot under the lock and does the I/O after releasing it, so at
//! most one backup per tier is ever in flight.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::wallet::{Ledger, WalletId};

use super::BackupManager;

/// Backup tiers, in the order a tick serves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackupTier {
    Rolling,
    LocalZip,
    CloudZip,
}

impl BackupTier {
    pub const ALL: [BackupTier; 3] = [
        BackupTier::Rolling,
        BackupTier::LocalZip,
        BackupTier::CloudZip,
    ];
}

impl fmt::Display for BackupTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupTier::Rolling => write!(f, "rolling"),
            BackupTier::LocalZip => write!(f, "local zip"),
            BackupTier::CloudZip => write!(f, "cloud zip"),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Coalescing backup scheduler for one wallet ledger.
pub struct BackupScheduler<L> {
    manager: Arc<BackupManager>,
    ledger: Arc<Mutex<L>>,
    rolling: Mutex<Option<WalletId>>,
    local_zip: Mutex<Option<WalletId>>,
    cloud_zip: Mutex<Option<WalletId>>,
}

impl<L: Ledger> BackupScheduler<L> {
    pub fn new(manager: Arc<BackupManager>, ledger: Arc<Mutex<L>>) -> Self {
        Self {
            manager,
            ledger,
            rolling: Mutex::new(None),
            local_zip: Mutex::new(None),
            cloud_zip: Mutex::new(None),
        }
    }

    fn slot(&self, tier: BackupTier) -> &Mutex<Option<WalletId>> {
        match tier {
            BackupTier::Rolling => &self.rolling,
            BackupTier::LocalZip => &self.local_zip,
            BackupTier::CloudZip => &self.cloud_zip,
        }
    }

    /// Marks a tier as due for `wallet_id`. Repeated requests coalesce.
    pub fn request(&self, tier: BackupTier, wallet_id: WalletId) {
        let mut slot = lock(self.slot(tier));
        if slot.replace(wallet_id).is_some() {
            tracing::debug!("Coalesced {} backup request", tier);
        }
    }

    pub fn request_rolling_backup(&self, wallet_id: WalletId) {
        self.request(BackupTier::Rolling, wallet_id);
    }

    pub fn request_local_zip_backup(&self, wallet_id: WalletId) {
        self.request(BackupTier::LocalZip, wallet_id);
    }

    pub fn request_cloud_zip_backup(&self, wallet_id: WalletId) {
        self.request(BackupTier::CloudZip, wallet_id);
    }

    pub fn is_pending(&self, tier: BackupTier) -> bool {
        lock(self.slot(tier)).is_some()
    }

    /// Runs every pending tier once and returns the tiers that succeeded.
    ///
    /// Failures are logged; the request is not re-queued.
    pub fn tick(&self) -> Vec<BackupTier> {
        let mut done = Vec::new();

        for tier in BackupTier::ALL {
            // Guard is dropped at the end of this statement, before any I/O
            let Some(wallet_id) = lock(self.slot(tier)).take() else {
                continue;
            };

            let result = match tier {
                BackupTier::Rolling => {
                    let ledger = lock(&self.ledger);
                    self.manager
                        .create_rolling_backup(&wallet_id, &*ledger)
                        .map(|_| ())
                }
                BackupTier::LocalZip => self
                    .manager
                    .create_archive_backup(
                        &wallet_id,
                        self.manager.config().include_blockchain_cache_locally,
                    )
                    .map(|_| ()),
                BackupTier::CloudZip => self.manager.create_cloud_backup(&wallet_id).map(|_| ()),
            };

            match result {
                Ok(()) => done.push(tier),
                Err(e) => tracing::error!("{} backup for wallet {} failed: {}", tier, wallet_id, e),
            }
        }

        done
    }
}

impl<L: Ledger + Send + 'static> BackupScheduler<L> {
    /// Starts a worker thread that ticks every `tick_interval` until shut down.
    pub fn spawn(self: Arc<Self>) -> SchedulerHandle {
        let stop_signal = Arc::new(AtomicBool::new(false));
        let interval = self.manager.config().tick_interval;
        let stop = Arc::clone(&stop_signal);

        let join = thread::spawn(move || {
            tracing::info!("Backup scheduler started");
            while !stop.load(Ordering::SeqCst) {
                self.tick();
                thread::park_timeout(interval);
            }
            tracing::info!("Backup scheduler stopped");
        });

        SchedulerHandle {
            stop_signal,
            join: Some(join),
        }
    }
}

/// Handle to a running scheduler thread. Dropping it stops the thread.
pub struct SchedulerHandle {
    stop_signal: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Signals the worker and waits for the current tick to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.stop_signal.store(true, Ordering::SeqCst);
        if let Some(join) = self.join.take() {
            join.thread().unpark();
            if join.join().is_err() {
                tracing::error!("Backup scheduler thread panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.join.as_ref().is_some_and(|join| !join.is_finished())
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
