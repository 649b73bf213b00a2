//! Activity counters for recycling pools.

use std::sync::atomic::{AtomicU64, Ordering};

/// Internal counter block. Updated with relaxed atomics; the numbers are
/// diagnostics, not synchronization.
#[derive(Debug, Default)]
pub(crate) struct PoolStats {
    takes: AtomicU64,
    misses: AtomicU64,
    puts: AtomicU64,
    dropped: AtomicU64,
}

impl PoolStats {
    pub(crate) fn record_take(&self, miss: bool) {
        self.takes.fetch_add(1, Ordering::Relaxed);
        if miss {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_put(&self, dropped: bool) {
        self.puts.fetch_add(1, Ordering::Relaxed);
        if dropped {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self) -> PoolCounters {
        PoolCounters {
            takes: self.takes.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            puts: self.puts.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of pool activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolCounters {
    /// Buffers handed out.
    pub takes: u64,
    /// Takes that had to allocate a fresh buffer.
    pub misses: u64,
    /// Buffers returned to the pool.
    pub puts: u64,
    /// Returned buffers the pool declined to retain.
    pub dropped: u64,
}

impl PoolCounters {
    /// Takes satisfied from retained buffers.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.takes - self.misses
    }

    /// Fraction of takes satisfied from retained buffers, 0.0 when idle.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        if self.takes == 0 {
            0.0
        } else {
            self.hits() as f64 / self.takes as f64
        }
    }

    /// Format the counters as a human-readable summary.
    #[must_use]
    pub fn format_summary(&self) -> String {
        format!(
            "Pool activity:\n\
             - Takes: {} ({} reused, {} fresh)\n\
             - Puts: {} ({} dropped)\n\
             - Hit rate: {:.1}%",
            self.takes,
            self.hits(),
            self.misses,
            self.puts,
            self.dropped,
            self.hit_rate() * 100.0
        )
    }
}
