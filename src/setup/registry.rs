//! Type-keyed pool override tables.
//!
//! A hybrid policy can route specific element types (or key/value pairs)
//! to caller-supplied pools while every other type uses the shared default.
//! Handles are stored type-erased and keyed by `TypeId`; registration is
//! expected before the first bundle request for a key, and late
//! registrations only affect bundles produced afterwards.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::pool::ArrayPool;
use crate::slots::{KeyEntry, MapEntry, NodeSlot};

type ErasedPool = Arc<dyn Any + Send + Sync>;

fn erase<T: 'static>(pool: Arc<dyn ArrayPool<T>>) -> ErasedPool {
    Arc::new(pool)
}

fn unerase<T: 'static>(erased: &ErasedPool) -> Option<Arc<dyn ArrayPool<T>>> {
    erased.downcast_ref::<Arc<dyn ArrayPool<T>>>().cloned()
}

/// Pool overrides for one map key/value pair. Unset slots fall back to the
/// shared default pool for that element type.
pub struct MapPools<K, V> {
    pub buckets: Option<Arc<dyn ArrayPool<usize>>>,
    pub bucket_nodes: Option<Arc<dyn ArrayPool<NodeSlot<usize>>>>,
    pub entries: Option<Arc<dyn ArrayPool<MapEntry<K, V>>>>,
    pub entry_nodes: Option<Arc<dyn ArrayPool<NodeSlot<MapEntry<K, V>>>>>,
}

impl<K, V> Default for MapPools<K, V> {
    fn default() -> Self {
        Self {
            buckets: None,
            bucket_nodes: None,
            entries: None,
            entry_nodes: None,
        }
    }
}

/// Pool overrides for one set element type. Unset slots fall back to the
/// shared default pool for that element type.
pub struct SetPools<T> {
    pub buckets: Option<Arc<dyn ArrayPool<usize>>>,
    pub bucket_nodes: Option<Arc<dyn ArrayPool<NodeSlot<usize>>>>,
    pub entries: Option<Arc<dyn ArrayPool<KeyEntry<T>>>>,
    pub entry_nodes: Option<Arc<dyn ArrayPool<NodeSlot<KeyEntry<T>>>>>,
}

impl<T> Default for SetPools<T> {
    fn default() -> Self {
        Self {
            buckets: None,
            bucket_nodes: None,
            entries: None,
            entry_nodes: None,
        }
    }
}

/// Typed view of a stored table override, resolved back from erasure.
pub(crate) struct ResolvedTablePools<E> {
    pub buckets: Option<Arc<dyn ArrayPool<usize>>>,
    pub bucket_nodes: Option<Arc<dyn ArrayPool<NodeSlot<usize>>>>,
    pub entries: Option<Arc<dyn ArrayPool<E>>>,
    pub entry_nodes: Option<Arc<dyn ArrayPool<NodeSlot<E>>>>,
}

impl<E> Default for ResolvedTablePools<E> {
    fn default() -> Self {
        Self {
            buckets: None,
            bucket_nodes: None,
            entries: None,
            entry_nodes: None,
        }
    }
}

#[derive(Default)]
struct ErasedTablePools {
    buckets: Option<ErasedPool>,
    bucket_nodes: Option<ErasedPool>,
    entries: Option<ErasedPool>,
    entry_nodes: Option<ErasedPool>,
}

/// Per-element-type overrides for sequence bundles.
#[derive(Default)]
pub(crate) struct SequenceOverrides {
    table: RwLock<HashMap<TypeId, (ErasedPool, ErasedPool)>>,
}

impl SequenceOverrides {
    pub(crate) fn register<T: Send + Sync + 'static>(
        &self,
        data: Arc<dyn ArrayPool<T>>,
        nodes: Arc<dyn ArrayPool<NodeSlot<T>>>,
    ) {
        debug!(ty = std::any::type_name::<T>(), "sequence pool override registered");
        self.table
            .write()
            .insert(TypeId::of::<T>(), (erase(data), erase(nodes)));
    }

    pub(crate) fn lookup<T: Send + Sync + 'static>(
        &self,
    ) -> Option<(Arc<dyn ArrayPool<T>>, Arc<dyn ArrayPool<NodeSlot<T>>>)> {
        let table = self.table.read();
        let (data, nodes) = table.get(&TypeId::of::<T>())?;
        Some((unerase(data)?, unerase(nodes)?))
    }
}

/// Per-type-pair overrides for map bundles.
#[derive(Default)]
pub(crate) struct MapOverrides {
    table: RwLock<HashMap<(TypeId, TypeId), ErasedTablePools>>,
}

impl MapOverrides {
    pub(crate) fn register<K, V>(&self, pools: MapPools<K, V>)
    where
        K: Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        debug!(
            key = std::any::type_name::<K>(),
            value = std::any::type_name::<V>(),
            "map pool override registered"
        );
        let erased = ErasedTablePools {
            buckets: pools.buckets.map(erase),
            bucket_nodes: pools.bucket_nodes.map(erase),
            entries: pools.entries.map(erase),
            entry_nodes: pools.entry_nodes.map(erase),
        };
        self.table
            .write()
            .insert((TypeId::of::<K>(), TypeId::of::<V>()), erased);
    }

    pub(crate) fn lookup<K, V>(&self) -> Option<ResolvedTablePools<MapEntry<K, V>>>
    where
        K: Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        let table = self.table.read();
        let raw = table.get(&(TypeId::of::<K>(), TypeId::of::<V>()))?;
        Some(ResolvedTablePools {
            buckets: raw.buckets.as_ref().and_then(unerase),
            bucket_nodes: raw.bucket_nodes.as_ref().and_then(unerase),
            entries: raw.entries.as_ref().and_then(unerase),
            entry_nodes: raw.entry_nodes.as_ref().and_then(unerase),
        })
    }
}

/// Per-element-type overrides for set bundles.
#[derive(Default)]
pub(crate) struct SetOverrides {
    table: RwLock<HashMap<TypeId, ErasedTablePools>>,
}

impl SetOverrides {
    pub(crate) fn register<T: Send + Sync + 'static>(&self, pools: SetPools<T>) {
        debug!(ty = std::any::type_name::<T>(), "set pool override registered");
        let erased = ErasedTablePools {
            buckets: pools.buckets.map(erase),
            bucket_nodes: pools.bucket_nodes.map(erase),
            entries: pools.entries.map(erase),
            entry_nodes: pools.entry_nodes.map(erase),
        };
        self.table.write().insert(TypeId::of::<T>(), erased);
    }

    pub(crate) fn lookup<T: Send + Sync + 'static>(
        &self,
    ) -> Option<ResolvedTablePools<KeyEntry<T>>> {
        let table = self.table.read();
        let raw = table.get(&TypeId::of::<T>())?;
        Some(ResolvedTablePools {
            buckets: raw.buckets.as_ref().and_then(unerase),
            bucket_nodes: raw.bucket_nodes.as_ref().and_then(unerase),
            entries: raw.entries.as_ref().and_then(unerase),
            entry_nodes: raw.entry_nodes.as_ref().and_then(unerase),
        })
    }
}
