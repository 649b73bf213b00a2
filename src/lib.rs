//! # rentpool - Interchangeable Array-Allocation Strategies
//!
//! rentpool supplies array-backed containers (sequence, hash-map, hash-set
//! storage) with interchangeable allocation strategies behind one
//! rent/recycle contract. Containers obtain and release backing arrays
//! without committing to a memory-management policy, which cuts allocator
//! churn and keeps single arrays out of large-allocation territory for
//! workloads that repeatedly grow and shrink.
//!
//! ## Core Features
//!
//! - **Three strategies**: direct allocation, pooled/recycled allocation,
//!   and a hybrid that switches by requested length
//! - **Policies**: per-type (and per-type-pair) allocator bundles under a
//!   direct, pooled, or hybrid policy, with per-type pool overrides
//! - **Footprint arithmetic**: safe maximum array lengths derived from an
//!   element type's in-memory size and the 80000-byte small-object boundary
//!
//! ## Quick Start
//!
//! ```rust
//! use rentpool::{ArrayAllocator, HybridPolicy};
//!
//! let policy = HybridPolicy::new().clear_on_rent(true);
//! let bundle = policy.sequence_bundle::<u64>();
//! let alloc = bundle.data_allocator().expect("hybrid bundles manage storage");
//!
//! // Rented arrays may be longer than requested, never shorter.
//! let mut buf = alloc.rent(100);
//! assert!(buf.len() >= 100);
//! assert!(alloc.rents_clean());
//!
//! buf[..100].fill(7);
//! alloc.recycle(buf, true); // clear drops the tenant's values
//! ```

pub mod alloc;
pub mod layout;
pub mod pool;
pub mod setup;
pub mod slots;

// Re-export the surface containers touch day to day.
pub use crate::alloc::{
    ArrayAllocator, DirectAllocator, HybridAllocator, PooledAllocator, DEFAULT_DIRECT_MAX,
};
pub use layout::{
    clamp_array_len, element_size, small_heap_len, small_heap_len_pow2, MAX_POOLED_ARRAY_LEN,
    SMALL_OBJECT_BOUNDARY,
};
pub use pool::{shared, ArrayPool, PoolCounters, PoolOptions, SharedArrayPool};
pub use setup::{
    DirectPolicy, HybridPolicy, MapBundle, MapPools, PooledPolicy, SequenceBundle, SetBundle,
    SetPools, SetupError,
};
pub use slots::{KeyEntry, MapEntry, NodeSlot, CHAIN_END};

/// Version information for the rentpool crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
