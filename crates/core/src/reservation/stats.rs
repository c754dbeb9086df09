//! Counters for reservation traffic
//!
//! Plain atomics; reads are relaxed snapshots meant for logs and tests.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct ReservationStats {
    issued: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    stale: AtomicU64,
    released: AtomicU64,
}

/// Point-in-time copy of [`ReservationStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReservationStatsSnapshot {
    pub issued: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub stale: u64,
    pub released: u64,
}

impl ReservationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_issued(&self) {
        self.issued.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_succeeded(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_stale(&self) {
        self.stale.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_released(&self) {
        self.released.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ReservationStatsSnapshot {
        ReservationStatsSnapshot {
            issued: self.issued.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
            released: self.released.load(Ordering::Relaxed),
        }
    }
}
