//! Hybrid allocation: direct below a length threshold, pooled above it.

use std::sync::Arc;

use crate::alloc::{fresh, ArrayAllocator};
use crate::pool::{shared, ArrayPool};

/// Default element-count threshold below which the pool is bypassed.
pub const DEFAULT_DIRECT_MAX: usize = 64;

/// Allocator that switches strategy by requested length.
///
/// Small, frequently churned arrays are cheap for the runtime allocator, so
/// rents up to `direct_max` elements build fresh exact-length buffers and
/// skip the pool's bookkeeping. Larger rents go through the recycling pool.
/// Recycling mirrors the split: buffers no longer than `direct_max` were
/// never pooled and are dropped, longer ones go back to the pool.
pub struct HybridAllocator<T> {
    pool: Arc<dyn ArrayPool<T>>,
    direct_max: usize,
    clear_on_rent: bool,
}

impl<T: Default + Send + Sync + 'static> HybridAllocator<T> {
    /// Creates an allocator over an explicit pool handle.
    #[must_use]
    pub fn new(pool: Arc<dyn ArrayPool<T>>, direct_max: usize, clear_on_rent: bool) -> Self {
        Self {
            pool,
            direct_max,
            clear_on_rent,
        }
    }

    /// Creates an allocator over the process-wide shared pool for `T`.
    #[must_use]
    pub fn over_shared(direct_max: usize, clear_on_rent: bool) -> Self {
        Self::new(shared::<T>(), direct_max, clear_on_rent)
    }

    /// The length threshold separating the direct and pooled paths.
    #[must_use]
    pub fn direct_max(&self) -> usize {
        self.direct_max
    }
}

impl<T: Default + Send + Sync> ArrayAllocator<T> for HybridAllocator<T> {
    fn rent(&self, count: usize) -> Vec<T> {
        if count <= self.direct_max {
            return fresh(count);
        }
        let mut buf = self.pool.take(count);
        if self.clear_on_rent {
            buf[..count].fill_with(T::default);
        }
        buf
    }

    fn recycle(&self, mut buf: Vec<T>, clear: bool) {
        if buf.len() <= self.direct_max {
            return;
        }
        if clear {
            buf.fill_with(T::default);
        }
        self.pool.put(buf);
    }

    fn rents_clean(&self) -> bool {
        self.clear_on_rent
    }
}
