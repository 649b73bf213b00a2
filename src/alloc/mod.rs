//! The rent/recycle allocator contract and its three strategies.

pub mod direct;
pub mod hybrid;
pub mod pooled;

pub use direct::DirectAllocator;
pub use hybrid::{HybridAllocator, DEFAULT_DIRECT_MAX};
pub use pooled::PooledAllocator;

/// Uniform array-allocation capability consumed by containers.
///
/// Implementations hand out buffers with `len() >= count`; callers must
/// never assume `rent(count).len() == count`. Recycling a buffer that was
/// not rented from the same handle, or recycling the same buffer twice, is
/// an undetected caller contract violation.
pub trait ArrayAllocator<T>: Send + Sync {
    /// Obtains a buffer with `len() >= count`.
    fn rent(&self, count: usize) -> Vec<T>;

    /// Releases a rented buffer. When `clear` is set, every slot is reset
    /// to its default before the storage is made available for reuse, which
    /// drops any handles the tenant left behind.
    fn recycle(&self, buf: Vec<T>, clear: bool);

    /// Whether rented buffers are guaranteed pre-cleared, so callers can
    /// skip their own clearing pass.
    fn rents_clean(&self) -> bool;
}

/// Builds a default-filled buffer of exactly `count` elements.
pub(crate) fn fresh<T: Default>(count: usize) -> Vec<T> {
    let mut buf = Vec::with_capacity(count);
    buf.resize_with(count, T::default);
    buf
}
