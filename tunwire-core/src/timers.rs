//! Atomic liveness timestamps shared between tasks (spec.md §5): `lastSent`
//! written by Sender and Hello, read by Hello; `lastRecv` written by
//! Receiver, read by the liveness monitor. Single 64-bit atomics, no lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct Timers {
    inner: Arc<Inner>,
}

struct Inner {
    epoch: Instant,
    last_sent_ns: AtomicU64,
    last_recv_ns: AtomicU64,
}

impl Timers {
    pub fn new() -> Self {
        let epoch = Instant::now();
        Timers {
            inner: Arc::new(Inner {
                epoch,
                last_sent_ns: AtomicU64::new(0),
                last_recv_ns: AtomicU64::new(0),
            }),
        }
    }

    fn now_ns(&self) -> u64 {
        self.inner.epoch.elapsed().as_nanos() as u64
    }

    pub fn mark_sent(&self) {
        self.inner.last_sent_ns.store(self.now_ns(), Ordering::Relaxed);
    }

    pub fn mark_recv(&self) {
        self.inner.last_recv_ns.store(self.now_ns(), Ordering::Relaxed);
    }

    /// Nanoseconds since the last successful send.
    pub fn since_sent(&self) -> std::time::Duration {
        let now = self.now_ns();
        let last = self.inner.last_sent_ns.load(Ordering::Relaxed);
        std::time::Duration::from_nanos(now.saturating_sub(last))
    }

    /// Nanoseconds since the last accepted inbound frame.
    pub fn since_recv(&self) -> std::time::Duration {
        let now = self.now_ns();
        let last = self.inner.last_recv_ns.load(Ordering::Relaxed);
        std::time::Duration::from_nanos(now.saturating_sub(last))
    }

    /// Seeds `lastRecv` so a fresh liveness monitor doesn't immediately
    /// report "down" before it has observed any traffic (spec.md §4.7).
    pub fn seed_recv_as_down_for(&self, log_down: std::time::Duration) {
        let backdated = self.now_ns().saturating_sub(log_down.as_nanos() as u64);
        self.inner.last_recv_ns.store(backdated, Ordering::Relaxed);
    }
}

impl Default for Timers {
    fn default() -> Self {
        Self::new()
    }
}
