//! Pooled allocation over an externally supplied recycling pool.

use std::sync::Arc;

use crate::alloc::ArrayAllocator;
use crate::pool::{shared, ArrayPool};

/// Allocator backed by a shared recycling pool.
///
/// Rented buffers may be longer than requested and, unless clear-on-rent is
/// enabled, may carry residue from a prior tenant. Recycling with `clear`
/// resets the whole buffer to defaults before it re-enters the pool, which
/// is required to avoid retaining stale references when `T` is a handle
/// type. No locking is added beyond what the pool itself provides.
pub struct PooledAllocator<T> {
    pool: Arc<dyn ArrayPool<T>>,
    clear_on_rent: bool,
}

impl<T: Default + Send + Sync + 'static> PooledAllocator<T> {
    /// Creates an allocator over an explicit pool handle.
    #[must_use]
    pub fn new(pool: Arc<dyn ArrayPool<T>>, clear_on_rent: bool) -> Self {
        Self {
            pool,
            clear_on_rent,
        }
    }

    /// Creates an allocator over the process-wide shared pool for `T`.
    #[must_use]
    pub fn over_shared(clear_on_rent: bool) -> Self {
        Self::new(shared::<T>(), clear_on_rent)
    }
}

impl<T: Default + Send + Sync> ArrayAllocator<T> for PooledAllocator<T> {
    fn rent(&self, count: usize) -> Vec<T> {
        let mut buf = self.pool.take(count);
        if self.clear_on_rent {
            buf[..count].fill_with(T::default);
        }
        buf
    }

    fn recycle(&self, mut buf: Vec<T>, clear: bool) {
        if clear {
            buf.fill_with(T::default);
        }
        self.pool.put(buf);
    }

    fn rents_clean(&self) -> bool {
        self.clear_on_rent
    }
}
