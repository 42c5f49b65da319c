//! Operation counters for the router and the daily job.
//!
//! Thread-safe atomics; the host process exports snapshots however it
//! likes. Counting never fails and never blocks.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Inbound events handed to the router.
    pub events_received: AtomicU64,
    /// Events dropped without a state change (unknown type, invalid
    /// command, self-event, malformed payload).
    pub events_ignored: AtomicU64,
    /// Successful versioned writes (either table).
    pub store_writes: AtomicU64,
    /// Failed store operations.
    pub store_failures: AtomicU64,
    /// Notifications delivered.
    pub notifications_sent: AtomicU64,
    /// Notifications that failed delivery (logged, not propagated).
    pub notification_failures: AtomicU64,
    /// Daily passes that actually ran (not skipped by cadence gates).
    pub rotation_passes: AtomicU64,
    /// Channels whose duty holder advanced across all passes.
    pub channels_advanced: AtomicU64,
}

/// Point-in-time copy of all counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub events_received: u64,
    pub events_ignored: u64,
    pub store_writes: u64,
    pub store_failures: u64,
    pub notifications_sent: u64,
    pub notification_failures: u64,
    pub rotation_passes: u64,
    pub channels_advanced: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ignored(&self) {
        self.events_ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_store_write(&self) {
        self.store_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_store_failure(&self) {
        self.store_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_notification(&self) {
        self.notifications_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_notification_failure(&self) {
        self.notification_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rotation_pass(&self, channels: usize) {
        self.rotation_passes.fetch_add(1, Ordering::Relaxed);
        self.channels_advanced
            .fetch_add(channels as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events_received: self.events_received.load(Ordering::Relaxed),
            events_ignored: self.events_ignored.load(Ordering::Relaxed),
            store_writes: self.store_writes.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
            notifications_sent: self.notifications_sent.load(Ordering::Relaxed),
            notification_failures: self.notification_failures.load(Ordering::Relaxed),
            rotation_passes: self.rotation_passes.load(Ordering::Relaxed),
            channels_advanced: self.channels_advanced.load(Ordering::Relaxed),
        }
    }
}
