use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::coordinator::MountingCoordinator;
use crate::transaction::MountingTransaction;

/// Lifecycle timestamps of one transaction. Each point is recorded by the
/// component that owns it: commit by the shadow tree, diff by the
/// coordinator, mount by the telemetry controller.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransactionTelemetry {
    commit_start: Option<Instant>,
    commit_end: Option<Instant>,
    diff_start: Option<Instant>,
    diff_end: Option<Instant>,
    mount_start: Option<Instant>,
    mount_end: Option<Instant>,
}

impl TransactionTelemetry {
    pub fn will_commit(&mut self) {
        debug_assert!(self.commit_start.is_none(), "commit start recorded twice");
        self.commit_start = Some(Instant::now());
    }

    pub fn did_commit(&mut self) {
        debug_assert!(self.commit_end.is_none(), "commit end recorded twice");
        self.commit_end = Some(Instant::now());
    }

    pub fn will_diff(&mut self) {
        debug_assert!(self.diff_start.is_none(), "diff start recorded twice");
        self.diff_start = Some(Instant::now());
    }

    pub fn did_diff(&mut self) {
        debug_assert!(self.diff_end.is_none(), "diff end recorded twice");
        self.diff_end = Some(Instant::now());
    }

    pub fn will_mount(&mut self) {
        debug_assert!(self.mount_start.is_none(), "mount start recorded twice");
        self.mount_start = Some(Instant::now());
    }

    pub fn did_mount(&mut self) {
        debug_assert!(self.mount_end.is_none(), "mount end recorded twice");
        self.mount_end = Some(Instant::now());
    }

    pub fn commit_duration(&self) -> Option<Duration> {
        Some(self.commit_end?.duration_since(self.commit_start?))
    }

    pub fn diff_duration(&self) -> Option<Duration> {
        Some(self.diff_end?.duration_since(self.diff_start?))
    }

    pub fn mount_duration(&self) -> Option<Duration> {
        Some(self.mount_end?.duration_since(self.mount_start?))
    }
}

/// Running totals across every mounted transaction of a surface.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompoundTelemetry {
    pub transactions: u64,
    pub mutations: u64,
    pub commit_time: Duration,
    pub mount_time: Duration,
}

impl CompoundTelemetry {
    pub fn incorporate(&mut self, telemetry: &TransactionTelemetry, mutation_count: usize) {
        self.transactions += 1;
        self.mutations += mutation_count as u64;
        if let Some(duration) = telemetry.commit_duration() {
            self.commit_time += duration;
        }
        if let Some(duration) = telemetry.mount_duration() {
            self.mount_time += duration;
        }
    }
}

/// Pulls committed transactions and reports their timing.
///
/// One transaction's `will_mount → do_mount → did_mount` sequence never
/// interleaves with another's: the whole pull is serialized here, not by the
/// caller. The compound counter has its own lock, held only for the final
/// read-modify-write and never across the mount hooks, so a slow platform
/// mutation cannot block concurrent commits.
pub struct TelemetryController {
    coordinator: Arc<MountingCoordinator>,
    mount_serial: Mutex<()>,
    compound: Mutex<CompoundTelemetry>,
}

impl TelemetryController {
    pub fn new(coordinator: Arc<MountingCoordinator>) -> Self {
        Self {
            coordinator,
            mount_serial: Mutex::new(()),
            compound: Mutex::new(CompoundTelemetry::default()),
        }
    }

    /// Takes the next pending transaction, if any, and mounts it through the
    /// three hooks. Returns `false` with no side effects when nothing is
    /// pending. Non-blocking with respect to commits; polled by the host.
    pub fn pull_transaction(
        &self,
        will_mount: impl FnOnce(&MountingTransaction),
        do_mount: impl FnOnce(&MountingTransaction),
        did_mount: impl FnOnce(&MountingTransaction),
    ) -> bool {
        let _serial = self.mount_serial.lock().unwrap();
        let Some(mut transaction) = self.coordinator.pull_transaction() else {
            return false;
        };

        will_mount(&transaction);
        transaction.telemetry_mut().will_mount();
        do_mount(&transaction);
        transaction.telemetry_mut().did_mount();
        did_mount(&transaction);

        let mutation_count = transaction.mutations().len();
        {
            let mut compound = self.compound.lock().unwrap();
            compound.incorporate(transaction.telemetry(), mutation_count);
        }
        true
    }

    pub fn compound_telemetry(&self) -> CompoundTelemetry {
        *self.compound.lock().unwrap()
    }
}
