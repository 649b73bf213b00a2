//! The three global allocation policies.
//!
//! A container asks a policy for the bundle matching its kind and element
//! type(s); the policy decides which strategy backs every allocator in the
//! bundle. Policies are plain values configured at construction time and
//! can be shared across any number of containers.

use std::sync::Arc;

use tracing::debug;

use crate::alloc::{
    ArrayAllocator, DirectAllocator, HybridAllocator, PooledAllocator, DEFAULT_DIRECT_MAX,
};
use crate::layout::small_heap_len;
use crate::pool::{shared, ArrayPool};
use crate::setup::bundle::{MapBundle, SequenceBundle, SetBundle};
use crate::setup::registry::{
    MapOverrides, MapPools, ResolvedTablePools, SequenceOverrides, SetOverrides, SetPools,
};
use crate::setup::SetupError;
use crate::slots::{KeyEntry, MapEntry, NodeSlot};

/// Policy whose bundles allocate directly, leaving reclamation to the
/// runtime allocator.
///
/// Unless raised explicitly, the length bound of every bundle defaults to
/// the small-heap threshold of its element type, keeping single arrays out
/// of large-allocation territory.
#[derive(Debug, Clone, Default)]
pub struct DirectPolicy {
    max_array_len: Option<usize>,
}

impl DirectPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the per-type default bound with an explicit one.
    pub fn max_array_len(mut self, len: usize) -> Result<Self, SetupError> {
        if len == 0 {
            return Err(SetupError::ZeroMaxArrayLength);
        }
        self.max_array_len = Some(len);
        Ok(self)
    }

    fn bound_for<T>(&self) -> usize {
        self.max_array_len.unwrap_or_else(small_heap_len::<T>)
    }

    /// Bundle for sequence storage of `T`.
    #[must_use]
    pub fn sequence_bundle<T: Default + Send + Sync + 'static>(&self) -> SequenceBundle<T> {
        SequenceBundle::new(
            Some(Arc::new(DirectAllocator::new())),
            Some(Arc::new(DirectAllocator::new())),
            Some(self.bound_for::<T>()),
        )
    }

    /// Bundle pair for hash-map storage keyed by `K` with values `V`.
    #[must_use]
    pub fn map_bundle<K, V>(&self) -> MapBundle<K, V>
    where
        K: Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        MapBundle::new(
            self.sequence_bundle::<usize>(),
            self.sequence_bundle::<MapEntry<K, V>>(),
        )
    }

    /// Bundle pair for hash-set storage of `T`.
    #[must_use]
    pub fn set_bundle<T: Send + Sync + 'static>(&self) -> SetBundle<T> {
        SetBundle::new(
            self.sequence_bundle::<usize>(),
            self.sequence_bundle::<KeyEntry<T>>(),
        )
    }
}

/// Policy whose bundles rent every array from the per-type shared pools.
#[derive(Debug, Clone, Default)]
pub struct PooledPolicy {
    max_array_len: Option<usize>,
    clear_on_rent: bool,
}

impl PooledPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds every bundle's array length; the default is unbounded.
    pub fn max_array_len(mut self, len: usize) -> Result<Self, SetupError> {
        if len == 0 {
            return Err(SetupError::ZeroMaxArrayLength);
        }
        self.max_array_len = Some(len);
        Ok(self)
    }

    /// Whether rented arrays are cleared before being handed out.
    #[must_use]
    pub fn clear_on_rent(mut self, clear: bool) -> Self {
        self.clear_on_rent = clear;
        self
    }

    /// Bundle for sequence storage of `T`.
    #[must_use]
    pub fn sequence_bundle<T: Default + Send + Sync + 'static>(&self) -> SequenceBundle<T> {
        SequenceBundle::new(
            Some(Arc::new(PooledAllocator::<T>::over_shared(
                self.clear_on_rent,
            ))),
            Some(Arc::new(PooledAllocator::<NodeSlot<T>>::over_shared(
                self.clear_on_rent,
            ))),
            self.max_array_len,
        )
    }

    /// Bundle pair for hash-map storage keyed by `K` with values `V`.
    #[must_use]
    pub fn map_bundle<K, V>(&self) -> MapBundle<K, V>
    where
        K: Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        MapBundle::new(
            self.sequence_bundle::<usize>(),
            self.sequence_bundle::<MapEntry<K, V>>(),
        )
    }

    /// Bundle pair for hash-set storage of `T`.
    #[must_use]
    pub fn set_bundle<T: Send + Sync + 'static>(&self) -> SetBundle<T> {
        SetBundle::new(
            self.sequence_bundle::<usize>(),
            self.sequence_bundle::<KeyEntry<T>>(),
        )
    }
}

/// Policy whose bundles switch strategy by requested length: direct below
/// the shared threshold, pooled above it.
///
/// Each policy instance carries its own override tables. A pool registered
/// for a type (or key/value pair) takes precedence over the shared default
/// pool for that element type; unregistered types use the shared default.
/// Registering after a bundle has been produced never rewires that bundle;
/// only bundles requested afterwards observe the override.
#[derive(Default)]
pub struct HybridPolicy {
    direct_max: Option<usize>,
    max_array_len: Option<usize>,
    clear_on_rent: bool,
    sequence_overrides: SequenceOverrides,
    map_overrides: MapOverrides,
    set_overrides: SetOverrides,
}

impl HybridPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the default direct/pooled threshold of
    /// [`DEFAULT_DIRECT_MAX`] elements.
    #[must_use]
    pub fn direct_max(mut self, direct_max: usize) -> Self {
        self.direct_max = Some(direct_max);
        self
    }

    /// Bounds every bundle's array length; the default is unbounded.
    pub fn max_array_len(mut self, len: usize) -> Result<Self, SetupError> {
        if len == 0 {
            return Err(SetupError::ZeroMaxArrayLength);
        }
        self.max_array_len = Some(len);
        Ok(self)
    }

    /// Whether rented arrays are cleared before being handed out.
    #[must_use]
    pub fn clear_on_rent(mut self, clear: bool) -> Self {
        self.clear_on_rent = clear;
        self
    }

    fn threshold(&self) -> usize {
        self.direct_max.unwrap_or(DEFAULT_DIRECT_MAX)
    }

    /// Routes sequence storage of `T` to the given pools.
    pub fn register_sequence_pools<T: Send + Sync + 'static>(
        &self,
        data: Arc<dyn ArrayPool<T>>,
        nodes: Arc<dyn ArrayPool<NodeSlot<T>>>,
    ) {
        self.sequence_overrides.register::<T>(data, nodes);
    }

    /// Routes map storage keyed by `K`/`V` to the given pools.
    pub fn register_map_pools<K, V>(&self, pools: MapPools<K, V>)
    where
        K: Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        self.map_overrides.register(pools);
    }

    /// Routes set storage of `T` to the given pools.
    pub fn register_set_pools<T: Send + Sync + 'static>(&self, pools: SetPools<T>) {
        self.set_overrides.register(pools);
    }

    fn hybrid_over<E: Default + Send + Sync + 'static>(
        &self,
        pool: Arc<dyn ArrayPool<E>>,
    ) -> Arc<dyn ArrayAllocator<E>> {
        Arc::new(HybridAllocator::new(
            pool,
            self.threshold(),
            self.clear_on_rent,
        ))
    }

    /// Bundle for sequence storage of `T`.
    #[must_use]
    pub fn sequence_bundle<T: Default + Send + Sync + 'static>(&self) -> SequenceBundle<T> {
        let (data_pool, node_pool) = match self.sequence_overrides.lookup::<T>() {
            Some(pools) => pools,
            None => (
                shared::<T>() as Arc<dyn ArrayPool<T>>,
                shared::<NodeSlot<T>>() as Arc<dyn ArrayPool<NodeSlot<T>>>,
            ),
        };
        debug!(
            ty = std::any::type_name::<T>(),
            direct_max = self.threshold(),
            "building hybrid sequence bundle"
        );
        SequenceBundle::new(
            Some(self.hybrid_over(data_pool)),
            Some(self.hybrid_over(node_pool)),
            self.max_array_len,
        )
    }

    /// Bundle pair for hash-map storage keyed by `K` with values `V`.
    #[must_use]
    pub fn map_bundle<K, V>(&self) -> MapBundle<K, V>
    where
        K: Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        let pools = self.map_overrides.lookup::<K, V>().unwrap_or_default();
        MapBundle::new(
            self.bucket_bundle(&pools),
            self.entry_bundle::<MapEntry<K, V>>(pools.entries, pools.entry_nodes),
        )
    }

    /// Bundle pair for hash-set storage of `T`.
    #[must_use]
    pub fn set_bundle<T: Send + Sync + 'static>(&self) -> SetBundle<T> {
        let pools = self.set_overrides.lookup::<T>().unwrap_or_default();
        SetBundle::new(
            self.bucket_bundle(&pools),
            self.entry_bundle::<KeyEntry<T>>(pools.entries, pools.entry_nodes),
        )
    }

    fn bucket_bundle<E>(&self, pools: &ResolvedTablePools<E>) -> SequenceBundle<usize> {
        let buckets = pools
            .buckets
            .clone()
            .unwrap_or_else(|| shared::<usize>() as Arc<dyn ArrayPool<usize>>);
        let bucket_nodes = pools.bucket_nodes.clone().unwrap_or_else(|| {
            shared::<NodeSlot<usize>>() as Arc<dyn ArrayPool<NodeSlot<usize>>>
        });
        SequenceBundle::new(
            Some(self.hybrid_over(buckets)),
            Some(self.hybrid_over(bucket_nodes)),
            self.max_array_len,
        )
    }

    fn entry_bundle<E: Default + Send + Sync + 'static>(
        &self,
        entries: Option<Arc<dyn ArrayPool<E>>>,
        entry_nodes: Option<Arc<dyn ArrayPool<NodeSlot<E>>>>,
    ) -> SequenceBundle<E> {
        let entries =
            entries.unwrap_or_else(|| shared::<E>() as Arc<dyn ArrayPool<E>>);
        let entry_nodes = entry_nodes
            .unwrap_or_else(|| shared::<NodeSlot<E>>() as Arc<dyn ArrayPool<NodeSlot<E>>>);
        SequenceBundle::new(
            Some(self.hybrid_over(entries)),
            Some(self.hybrid_over(entry_nodes)),
            self.max_array_len,
        )
    }
}
