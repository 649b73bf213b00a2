//! Direct allocation: every rent is a fresh buffer, recycling is a no-op.

use std::marker::PhantomData;

use crate::alloc::{fresh, ArrayAllocator};

/// Allocator that leaves memory management to the runtime allocator.
///
/// Each rent builds a new default-initialized buffer of exactly the
/// requested length, so rented buffers are always clean. Stateless; each
/// call is independent, so the allocator is safe under unrestricted
/// concurrency.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectAllocator<T> {
    _marker: PhantomData<T>,
}

impl<T> DirectAllocator<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: Default + Send + Sync> ArrayAllocator<T> for DirectAllocator<T> {
    fn rent(&self, count: usize) -> Vec<T> {
        fresh(count)
    }

    fn recycle(&self, _buf: Vec<T>, _clear: bool) {}

    fn rents_clean(&self) -> bool {
        true
    }
}
