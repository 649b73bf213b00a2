//! Immutable allocator bundles handed to containers at construction time.

use std::sync::Arc;

use crate::alloc::ArrayAllocator;
use crate::slots::{KeyEntry, MapEntry, NodeSlot};

/// Allocators plus a length bound for one sequence storage role.
///
/// A bundle is built once, at container construction, and held for the
/// container's lifetime. `None` for an allocator tells the container to
/// fall back to unmanaged allocation for that role; `None` for the bound
/// means unbounded.
pub struct SequenceBundle<T> {
    data: Option<Arc<dyn ArrayAllocator<T>>>,
    nodes: Option<Arc<dyn ArrayAllocator<NodeSlot<T>>>>,
    max_array_len: Option<usize>,
}

impl<T> SequenceBundle<T> {
    /// Assembles a bundle. Policies validate explicit bounds before calling
    /// this; a zero bound is a construction bug upstream.
    #[must_use]
    pub fn new(
        data: Option<Arc<dyn ArrayAllocator<T>>>,
        nodes: Option<Arc<dyn ArrayAllocator<NodeSlot<T>>>>,
        max_array_len: Option<usize>,
    ) -> Self {
        debug_assert!(max_array_len != Some(0), "array length bound of 0");
        Self {
            data,
            nodes,
            max_array_len,
        }
    }

    /// A bundle that manages nothing: the container allocates on its own.
    #[must_use]
    pub fn unmanaged() -> Self {
        Self {
            data: None,
            nodes: None,
            max_array_len: None,
        }
    }

    /// Allocator for the element arrays, if managed.
    #[must_use]
    pub fn data_allocator(&self) -> Option<&Arc<dyn ArrayAllocator<T>>> {
        self.data.as_ref()
    }

    /// Allocator for the node-chain arrays, if managed.
    #[must_use]
    pub fn node_allocator(&self) -> Option<&Arc<dyn ArrayAllocator<NodeSlot<T>>>> {
        self.nodes.as_ref()
    }

    /// Upper bound on a single backing array's length, `None` if unbounded.
    #[must_use]
    pub fn max_array_len(&self) -> Option<usize> {
        self.max_array_len
    }
}

// Manual impl: cloning shares the allocator handles, `T: Clone` is not
// required.
impl<T> Clone for SequenceBundle<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            nodes: self.nodes.clone(),
            max_array_len: self.max_array_len,
        }
    }
}

/// The two storage roles of a hash-map: bucket chain heads and entry slots.
pub struct MapBundle<K, V> {
    buckets: SequenceBundle<usize>,
    entries: SequenceBundle<MapEntry<K, V>>,
}

impl<K, V> MapBundle<K, V> {
    #[must_use]
    pub fn new(buckets: SequenceBundle<usize>, entries: SequenceBundle<MapEntry<K, V>>) -> Self {
        Self { buckets, entries }
    }

    /// Bundle for the bucket (chain-head) arrays.
    #[must_use]
    pub fn bucket_bundle(&self) -> &SequenceBundle<usize> {
        &self.buckets
    }

    /// Bundle for the entry-slot arrays.
    #[must_use]
    pub fn entry_bundle(&self) -> &SequenceBundle<MapEntry<K, V>> {
        &self.entries
    }
}

impl<K, V> Clone for MapBundle<K, V> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            entries: self.entries.clone(),
        }
    }
}

/// The two storage roles of a hash-set: bucket chain heads and key slots.
pub struct SetBundle<T> {
    buckets: SequenceBundle<usize>,
    entries: SequenceBundle<KeyEntry<T>>,
}

impl<T> SetBundle<T> {
    #[must_use]
    pub fn new(buckets: SequenceBundle<usize>, entries: SequenceBundle<KeyEntry<T>>) -> Self {
        Self { buckets, entries }
    }

    /// Bundle for the bucket (chain-head) arrays.
    #[must_use]
    pub fn bucket_bundle(&self) -> &SequenceBundle<usize> {
        &self.buckets
    }

    /// Bundle for the key-slot arrays.
    #[must_use]
    pub fn entry_bundle(&self) -> &SequenceBundle<KeyEntry<T>> {
        &self.entries
    }
}

impl<T> Clone for SetBundle<T> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            entries: self.entries.clone(),
        }
    }
}
