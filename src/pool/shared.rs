//! Bucketed recycling pool and the process-wide per-type instances.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use tracing::trace;

use crate::layout::{prev_power_of_two, MAX_POOLED_ARRAY_LEN};
use crate::pool::stats::PoolStats;
use crate::pool::{ArrayPool, PoolCounters};

/// Construction options for [`SharedArrayPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    /// Smallest buffer length the pool will hand out or retain. Rounded up
    /// to a power of two, minimum 1.
    pub min_bucket_len: usize,
    /// Maximum number of buffers retained per length bucket; returns beyond
    /// the cap are dropped.
    pub bucket_retention: usize,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            min_bucket_len: 16,
            bucket_retention: 32,
        }
    }
}

impl PoolOptions {
    /// Options tuned for small, frequently churned arrays.
    #[must_use]
    pub fn for_small_arrays() -> Self {
        Self {
            min_bucket_len: 16,
            bucket_retention: 128,
        }
    }

    /// Options tuned for large, long-lived chunk storage.
    #[must_use]
    pub fn for_large_chunks() -> Self {
        Self {
            min_bucket_len: 1024,
            bucket_retention: 8,
        }
    }

    fn normalized(mut self) -> Self {
        self.min_bucket_len = self
            .min_bucket_len
            .clamp(1, MAX_POOLED_ARRAY_LEN)
            .next_power_of_two();
        self
    }
}

/// Default recycling pool: power-of-two length buckets behind per-bucket
/// locks.
///
/// Buffers are filed by the floor of their length's log2 and handed out from
/// the ceiling bucket of the requested minimum, so every take satisfies
/// `len() >= min_len`. Requests beyond [`MAX_POOLED_ARRAY_LEN`] bypass the
/// buckets entirely and allocate fresh storage.
pub struct SharedArrayPool<T> {
    buckets: Vec<Mutex<Vec<Vec<T>>>>,
    options: PoolOptions,
    stats: PoolStats,
}

impl<T> SharedArrayPool<T> {
    /// Creates a pool with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(PoolOptions::default())
    }

    /// Creates a pool with the given options.
    #[must_use]
    pub fn with_options(options: PoolOptions) -> Self {
        let options = options.normalized();
        let bucket_count = MAX_POOLED_ARRAY_LEN.trailing_zeros() as usize + 1;
        let buckets = (0..bucket_count).map(|_| Mutex::new(Vec::new())).collect();
        Self {
            buckets,
            options,
            stats: PoolStats::default(),
        }
    }

    /// Snapshot of the pool's activity counters.
    #[must_use]
    pub fn counters(&self) -> PoolCounters {
        self.stats.snapshot()
    }

    /// Options the pool was built with, after normalization.
    #[must_use]
    pub fn options(&self) -> PoolOptions {
        self.options
    }
}

impl<T> Default for SharedArrayPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default + Send + Sync> ArrayPool<T> for SharedArrayPool<T> {
    fn take(&self, min_len: usize) -> Vec<T> {
        if min_len == 0 {
            return Vec::new();
        }
        if min_len > MAX_POOLED_ARRAY_LEN {
            // Too big to ever come back; allocate exactly what was asked.
            self.stats.record_take(true);
            trace!(min_len, "oversized take, allocating fresh");
            return fresh(min_len);
        }

        let want = min_len.max(self.options.min_bucket_len).next_power_of_two();
        let idx = want.trailing_zeros() as usize;
        if let Some(buf) = self.buckets[idx].lock().pop() {
            self.stats.record_take(false);
            trace!(min_len, len = buf.len(), bucket = idx, "reused buffer");
            return buf;
        }

        self.stats.record_take(true);
        trace!(min_len, len = want, bucket = idx, "allocating fresh buffer");
        fresh(want)
    }

    fn put(&self, buf: Vec<T>) {
        let len = buf.len();
        if len < self.options.min_bucket_len || len > MAX_POOLED_ARRAY_LEN {
            self.stats.record_put(true);
            return;
        }

        let idx = prev_power_of_two(len).trailing_zeros() as usize;
        let mut bucket = self.buckets[idx].lock();
        if bucket.len() >= self.options.bucket_retention {
            drop(bucket);
            self.stats.record_put(true);
            trace!(len, bucket = idx, "retention cap reached, dropping buffer");
            return;
        }
        bucket.push(buf);
        drop(bucket);
        self.stats.record_put(false);
    }
}

fn fresh<T: Default>(len: usize) -> Vec<T> {
    let mut buf = Vec::with_capacity(len);
    buf.resize_with(len, T::default);
    buf
}

static SHARED_POOLS: Lazy<RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Returns the process-wide shared pool for `T`, creating it on first use.
///
/// Concurrent first use is idempotent: losers of the publication race adopt
/// the winner's instance, so every caller observes the same pool.
pub fn shared<T: Send + Sync + 'static>() -> Arc<SharedArrayPool<T>> {
    let key = TypeId::of::<T>();
    if let Some(existing) = SHARED_POOLS.read().get(&key) {
        return downcast_pool(existing.clone());
    }

    let mut pools = SHARED_POOLS.write();
    let entry = pools
        .entry(key)
        .or_insert_with(|| Arc::new(SharedArrayPool::<T>::new()) as Arc<dyn Any + Send + Sync>);
    downcast_pool(entry.clone())
}

fn downcast_pool<T: Send + Sync + 'static>(
    erased: Arc<dyn Any + Send + Sync>,
) -> Arc<SharedArrayPool<T>> {
    // The registry is keyed by TypeId, so the stored type is fixed per key.
    match erased.downcast::<SharedArrayPool<T>>() {
        Ok(pool) => pool,
        Err(_) => unreachable!("shared pool registry entry has a foreign type"),
    }
}
