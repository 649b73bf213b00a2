//! Slot records stored by the consuming containers.
//!
//! These are plain data carriers: the sequence container keeps one
//! [`NodeSlot`] per chunk in its node chain, and the hash-table containers
//! keep [`MapEntry`] / [`KeyEntry`] records in their entry arrays. All of
//! them default to a vacant state without requiring the payload types to
//! implement `Default`, so pooled storage can be cleared by re-defaulting.

/// Per-chunk record in a sequence container's node chain.
///
/// Sized like a handle: it holds (at most) one boxed chunk of elements.
#[derive(Debug)]
pub struct NodeSlot<T> {
    chunk: Option<Box<[T]>>,
}

// Manual impl: a vacant slot must not demand `T: Default`.
impl<T> Default for NodeSlot<T> {
    fn default() -> Self {
        Self { chunk: None }
    }
}

impl<T> NodeSlot<T> {
    /// Creates a slot holding the given chunk.
    #[must_use]
    pub fn with_chunk(chunk: Box<[T]>) -> Self {
        Self { chunk: Some(chunk) }
    }

    /// Whether the slot currently holds no chunk.
    #[must_use]
    pub fn is_vacant(&self) -> bool {
        self.chunk.is_none()
    }

    /// Borrows the chunk, if any.
    #[must_use]
    pub fn chunk(&self) -> Option<&[T]> {
        self.chunk.as_deref()
    }

    /// Mutably borrows the chunk, if any.
    pub fn chunk_mut(&mut self) -> Option<&mut [T]> {
        self.chunk.as_deref_mut()
    }

    /// Takes the chunk out, leaving the slot vacant.
    pub fn take_chunk(&mut self) -> Option<Box<[T]>> {
        self.chunk.take()
    }
}

/// Index used to terminate an entry chain.
pub const CHAIN_END: i32 = -1;

/// Hash-table slot record carrying a key/value pair plus chain metadata.
#[derive(Debug, Clone)]
pub struct MapEntry<K, V> {
    /// Cached hash of the key.
    pub hash: u64,
    /// Index of the next entry in the bucket chain, [`CHAIN_END`] to stop.
    pub next: i32,
    /// The stored pair; `None` marks a vacant slot.
    pub pair: Option<(K, V)>,
}

impl<K, V> MapEntry<K, V> {
    /// Creates an occupied entry.
    #[must_use]
    pub fn occupied(hash: u64, next: i32, key: K, value: V) -> Self {
        Self {
            hash,
            next,
            pair: Some((key, value)),
        }
    }

    /// Whether the slot holds no pair.
    #[must_use]
    pub fn is_vacant(&self) -> bool {
        self.pair.is_none()
    }
}

impl<K, V> Default for MapEntry<K, V> {
    fn default() -> Self {
        Self {
            hash: 0,
            next: CHAIN_END,
            pair: None,
        }
    }
}

/// Hash-table slot record carrying a key plus chain metadata.
#[derive(Debug, Clone)]
pub struct KeyEntry<T> {
    /// Cached hash of the key.
    pub hash: u64,
    /// Index of the next entry in the bucket chain, [`CHAIN_END`] to stop.
    pub next: i32,
    /// The stored key; `None` marks a vacant slot.
    pub key: Option<T>,
}

impl<T> KeyEntry<T> {
    /// Creates an occupied entry.
    #[must_use]
    pub fn occupied(hash: u64, next: i32, key: T) -> Self {
        Self {
            hash,
            next,
            key: Some(key),
        }
    }

    /// Whether the slot holds no key.
    #[must_use]
    pub fn is_vacant(&self) -> bool {
        self.key.is_none()
    }
}

impl<T> Default for KeyEntry<T> {
    fn default() -> Self {
        Self {
            hash: 0,
            next: CHAIN_END,
            key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // No Default, no Clone: slot defaults must not depend on the payload.
    struct Opaque;

    #[test]
    fn slot_arrays_allocate_without_payload_default() {
        use crate::alloc::{ArrayAllocator, DirectAllocator};

        // Allocators fill with defaults; that must work even when the
        // payload type itself has no Default.
        let nodes = DirectAllocator::<NodeSlot<Opaque>>::new().rent(8);
        assert!(nodes.iter().all(NodeSlot::is_vacant));

        let entries = DirectAllocator::<MapEntry<Opaque, Opaque>>::new().rent(8);
        assert!(entries.iter().all(MapEntry::is_vacant));

        let keys = DirectAllocator::<KeyEntry<Opaque>>::new().rent(8);
        assert!(keys.iter().all(KeyEntry::is_vacant));
    }

    #[test]
    fn node_slot_defaults_vacant() {
        let mut slot = NodeSlot::<Opaque>::default();
        assert!(slot.is_vacant());
        assert!(slot.chunk().is_none());
        assert!(slot.take_chunk().is_none());
    }

    #[test]
    fn node_slot_round_trips_a_chunk() {
        let mut slot = NodeSlot::with_chunk(vec![1u8, 2, 3].into_boxed_slice());
        assert!(!slot.is_vacant());
        assert_eq!(slot.chunk(), Some(&[1u8, 2, 3][..]));

        slot.chunk_mut().unwrap()[0] = 9;
        let chunk = slot.take_chunk().unwrap();
        assert_eq!(&chunk[..], &[9, 2, 3]);
        assert!(slot.is_vacant());
    }

    #[test]
    fn entries_default_vacant_without_payload_bounds() {
        let entry = MapEntry::<Opaque, Opaque>::default();
        assert!(entry.is_vacant());
        assert_eq!(entry.next, CHAIN_END);

        let key_entry = KeyEntry::<Opaque>::default();
        assert!(key_entry.is_vacant());
        assert_eq!(key_entry.next, CHAIN_END);
    }

    #[test]
    fn occupied_entries_expose_their_payload() {
        let entry = MapEntry::occupied(0xfeed, 3, "k", 42);
        assert!(!entry.is_vacant());
        assert_eq!(entry.pair, Some(("k", 42)));
        assert_eq!(entry.next, 3);

        let key_entry = KeyEntry::occupied(0xbeef, CHAIN_END, 7u8);
        assert_eq!(key_entry.key, Some(7));
    }
}
