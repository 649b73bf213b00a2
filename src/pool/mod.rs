//! Recycling-pool capability and the default shared implementation.

pub mod shared;
pub mod stats;

pub use shared::{shared, PoolOptions, SharedArrayPool};
pub use stats::PoolCounters;

/// A concurrency-safe recycling pool keyed by minimum length.
///
/// `take(min_len)` hands out a buffer with `len() >= min_len`. The buffer
/// may be longer than requested and may carry residue from a prior tenant;
/// callers that need clean storage clear it themselves (see the pooled
/// allocator's clear-on-rent flag). `put` hands a buffer back for reuse.
///
/// Returning a buffer that was never taken from the same pool, or returning
/// the same buffer twice, is a caller contract violation the pool does not
/// detect.
pub trait ArrayPool<T>: Send + Sync {
    /// Obtains a buffer with `len() >= min_len`.
    fn take(&self, min_len: usize) -> Vec<T>;

    /// Releases a buffer back to the pool.
    fn put(&self, buf: Vec<T>);
}
