//! Integration tests for the allocator strategies and the setup layer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rentpool::{
    element_size, small_heap_len, ArrayAllocator, ArrayPool, DirectPolicy, HybridAllocator,
    HybridPolicy, MapPools, NodeSlot, PooledAllocator, PooledPolicy, SetPools, SharedArrayPool,
    DEFAULT_DIRECT_MAX,
};

/// Pool wrapper that counts every call, so tests can prove whether a code
/// path touched the pool at all.
struct CountingPool<T> {
    inner: SharedArrayPool<T>,
    takes: AtomicUsize,
    puts: AtomicUsize,
}

impl<T> CountingPool<T> {
    fn new() -> Self {
        Self {
            inner: SharedArrayPool::new(),
            takes: AtomicUsize::new(0),
            puts: AtomicUsize::new(0),
        }
    }

    fn takes(&self) -> usize {
        self.takes.load(Ordering::SeqCst)
    }

    fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

impl<T: Default + Send + Sync> ArrayPool<T> for CountingPool<T> {
    fn take(&self, min_len: usize) -> Vec<T> {
        self.takes.fetch_add(1, Ordering::SeqCst);
        self.inner.take(min_len)
    }

    fn put(&self, buf: Vec<T>) {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(buf);
    }
}

#[test]
fn threshold_arithmetic_matches_the_boundary() {
    assert_eq!(element_size::<u32>(), 4);
    assert_eq!(small_heap_len::<u32>(), 20_000);
    assert_eq!(small_heap_len::<[u8; 100_000]>(), 1);
}

#[test]
fn hybrid_rent_at_threshold_never_reaches_the_pool() {
    let pool = Arc::new(CountingPool::<u32>::new());
    let alloc = HybridAllocator::new(
        Arc::clone(&pool) as Arc<dyn ArrayPool<u32>>,
        DEFAULT_DIRECT_MAX,
        false,
    );

    let buf = alloc.rent(64);
    assert_eq!(buf.len(), 64);
    assert_eq!(pool.takes(), 0);

    alloc.recycle(buf, true);
    assert_eq!(pool.puts(), 0);
}

#[test]
fn hybrid_rent_above_threshold_goes_through_the_pool() {
    let pool = Arc::new(CountingPool::<u32>::new());
    let alloc = HybridAllocator::new(
        Arc::clone(&pool) as Arc<dyn ArrayPool<u32>>,
        DEFAULT_DIRECT_MAX,
        false,
    );

    let buf = alloc.rent(65);
    assert!(buf.len() >= 65);
    assert_eq!(pool.takes(), 1);

    alloc.recycle(buf, false);
    assert_eq!(pool.puts(), 1);
}

#[test]
fn pooled_allocator_clears_a_dirty_prior_tenant() {
    let pool = Arc::new(CountingPool::<u64>::new());
    let alloc = PooledAllocator::new(Arc::clone(&pool) as Arc<dyn ArrayPool<u64>>, true);

    let mut buf = alloc.rent(100);
    let rented_len = buf.len();
    buf.fill(u64::MAX);
    alloc.recycle(buf, false); // hand it back dirty

    let reused = alloc.rent(rented_len);
    assert!(reused[..rented_len].iter().all(|&v| v == 0));
    assert_eq!(pool.takes(), 2);
}

#[test]
fn registered_pool_backs_every_subsequent_bundle() {
    #[derive(Default)]
    struct Elem([u64; 2]);

    let policy = HybridPolicy::new();
    let data = Arc::new(CountingPool::<Elem>::new());
    let nodes = Arc::new(CountingPool::<NodeSlot<Elem>>::new());
    policy.register_sequence_pools::<Elem>(
        Arc::clone(&data) as Arc<dyn ArrayPool<Elem>>,
        Arc::clone(&nodes) as Arc<dyn ArrayPool<NodeSlot<Elem>>>,
    );

    for expected in 1..=3 {
        let bundle = policy.sequence_bundle::<Elem>();
        let buf = bundle.data_allocator().unwrap().rent(1000);
        assert!(buf.len() >= 1000);
        assert_eq!(data.takes(), expected);
    }
    assert_eq!(nodes.takes(), 0);
}

#[test]
fn map_bundle_bucket_and_entry_storage_use_independent_pools() {
    struct Key;

    let policy = HybridPolicy::new();
    let buckets = Arc::new(CountingPool::<usize>::new());
    let entries = Arc::new(CountingPool::<rentpool::MapEntry<Key, u32>>::new());
    policy.register_map_pools(MapPools::<Key, u32> {
        buckets: Some(Arc::clone(&buckets) as Arc<dyn ArrayPool<usize>>),
        entries: Some(Arc::clone(&entries) as Arc<dyn ArrayPool<rentpool::MapEntry<Key, u32>>>),
        ..MapPools::default()
    });

    let bundle = policy.map_bundle::<Key, u32>();

    let _ = bundle.bucket_bundle().data_allocator().unwrap().rent(512);
    assert_eq!(buckets.takes(), 1);
    assert_eq!(entries.takes(), 0);

    let _ = bundle.entry_bundle().data_allocator().unwrap().rent(512);
    assert_eq!(buckets.takes(), 1);
    assert_eq!(entries.takes(), 1);
}

#[test]
fn set_bundle_honors_partial_overrides() {
    struct Elem;

    let policy = HybridPolicy::new();
    let entries = Arc::new(CountingPool::<rentpool::KeyEntry<Elem>>::new());
    policy.register_set_pools(SetPools::<Elem> {
        entries: Some(Arc::clone(&entries) as Arc<dyn ArrayPool<rentpool::KeyEntry<Elem>>>),
        ..SetPools::default()
    });

    let bundle = policy.set_bundle::<Elem>();

    // Entry storage hits the override; bucket storage silently uses the
    // shared default.
    let _ = bundle.entry_bundle().data_allocator().unwrap().rent(200);
    assert_eq!(entries.takes(), 1);
    let buf = bundle.bucket_bundle().data_allocator().unwrap().rent(200);
    assert!(buf.len() >= 200);
    assert_eq!(entries.takes(), 1);
}

#[test]
fn direct_policy_produces_exact_clean_arrays() {
    #[derive(Default, PartialEq, Debug)]
    struct Elem(u32);

    let bundle = DirectPolicy::new().sequence_bundle::<Elem>();
    let alloc = bundle.data_allocator().unwrap();

    assert_eq!(bundle.max_array_len(), Some(small_heap_len::<Elem>()));
    for n in [0usize, 1, 64, 65, 10_000] {
        let buf = alloc.rent(n);
        assert_eq!(buf.len(), n);
        assert!(buf.iter().all(|v| *v == Elem(0)));
        alloc.recycle(buf, false);
    }
}

#[test]
fn bundles_are_shareable_across_threads() {
    #[derive(Default)]
    struct Elem(u64);

    let bundle = Arc::new(PooledPolicy::new().clear_on_rent(true).sequence_bundle::<Elem>());

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let bundle = Arc::clone(&bundle);
            std::thread::spawn(move || {
                let alloc = bundle.data_allocator().unwrap();
                for _ in 0..50 {
                    let buf = alloc.rent(256);
                    assert!(buf.len() >= 256);
                    alloc.recycle(buf, true);
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }
}

#[test]
fn node_slot_arrays_release_chunks_when_cleared() {
    let pool = Arc::new(CountingPool::<NodeSlot<Arc<u8>>>::new());
    let alloc = PooledAllocator::new(Arc::clone(&pool) as Arc<dyn ArrayPool<NodeSlot<Arc<u8>>>>, false);

    let tracked = Arc::new(9u8);
    let mut nodes = alloc.rent(32);
    nodes[0] = NodeSlot::with_chunk(vec![Arc::clone(&tracked)].into_boxed_slice());
    assert_eq!(Arc::strong_count(&tracked), 2);

    alloc.recycle(nodes, true);
    assert_eq!(Arc::strong_count(&tracked), 1);
}
