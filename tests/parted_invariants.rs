// ==============================================
// PARTITION INVARIANT TESTS (integration)
// ==============================================
//
// Randomized operation sequences against the partitioned cache, asserting
// after every step:
//
//   - len(active) + len(lazy) <= total capacity
//   - no key appears in both segments
//   - segment capacities always sum to the total capacity
//   - an inserted key is present immediately afterwards
//   - a removed key is absent immediately afterwards

use proptest::prelude::*;
use tiercache::policy::hybrid::HybridCache;
use tiercache::policy::parted::PartedCache;

#[derive(Debug, Clone)]
enum Op {
    Insert(u32, u32),
    Get(u32),
    Remove(u32),
    AdjustRate(f64),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u32..24, any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        3 => (0u32..24).prop_map(Op::Get),
        2 => (0u32..24).prop_map(Op::Remove),
        1 => (0.05f64..0.95).prop_map(Op::AdjustRate),
        1 => Just(Op::Clear),
    ]
}

fn assert_partition_invariants(cache: &PartedCache<u32, u32>) {
    let (active_cap, lazy_cap) = cache.segment_capacities();
    assert_eq!(active_cap + lazy_cap, cache.capacity());
    assert!(active_cap >= 1 && lazy_cap >= 1);

    let view = cache.parted_keys();
    assert!(view.active.len() <= active_cap, "active over capacity");
    assert!(view.lazy.len() <= lazy_cap, "lazy over capacity");
    assert!(cache.len() <= cache.capacity());

    for key in &view.active {
        assert!(
            !view.lazy.contains(key),
            "key {} present in both segments",
            key
        );
    }
}

proptest! {
    #[test]
    fn random_op_sequences_preserve_invariants(
        capacity in 2usize..16,
        rate in 0.1f64..0.9,
        ops in proptest::collection::vec(op_strategy(), 1..80),
    ) {
        let cache: PartedCache<u32, u32> = PartedCache::new(capacity, rate);

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    cache.insert(k, v);
                    prop_assert!(cache.contains(&k), "insert must win");
                }
                Op::Get(k) => {
                    let before = cache.contains(&k);
                    let hit = cache.get(&k).is_some();
                    prop_assert_eq!(before, hit);
                }
                Op::Remove(k) => {
                    cache.remove(&k);
                    prop_assert!(!cache.contains(&k), "remove must win");
                }
                Op::AdjustRate(r) => {
                    cache.adjust_rate(r);
                }
                Op::Clear => {
                    cache.clear();
                    prop_assert!(cache.is_empty());
                }
            }
            assert_partition_invariants(&cache);
        }
    }

    #[test]
    fn hybrid_capacity_bound_holds_for_any_sequence(
        capacity in 1usize..16,
        ops in proptest::collection::vec((0u32..32, any::<u32>()), 1..120),
    ) {
        let cache: HybridCache<u32, u32> = HybridCache::new(capacity);

        for (k, v) in ops {
            cache.insert(k, v);
            prop_assert!(cache.len() <= capacity);
            prop_assert!(cache.contains(&k));
            prop_assert_eq!(*cache.get(&k).unwrap(), v);
        }
    }

    #[test]
    fn hybrid_round_trip_restores_contents(
        capacity in 1usize..16,
        ops in proptest::collection::vec((0u32..32, any::<u32>()), 1..60),
    ) {
        let cache: HybridCache<u32, u32> = HybridCache::new(capacity);
        for (k, v) in ops {
            cache.insert(k, v);
        }

        let before = cache.to_map();
        let snapshot = cache.snapshot();
        cache.clear();
        cache.bulk_insert(snapshot);
        let after = cache.to_map();

        prop_assert_eq!(before.len(), after.len());
        for (k, v) in &before {
            prop_assert_eq!(&after[k], v);
        }
    }
}
