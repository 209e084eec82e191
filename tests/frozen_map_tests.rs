//! Unit tests for FrozenMap, including its layered patch form.

use permafrost::{FrozenMap, FrozenSet};
use rstest::rstest;
use std::hash::{BuildHasher, Hasher};

// =============================================================================
// A hasher that sends every key to the same slot
// =============================================================================

#[derive(Clone, Default)]
struct CollidingBuilder;

struct CollidingHasher;

impl Hasher for CollidingHasher {
    fn finish(&self) -> u64 {
        42
    }

    fn write(&mut self, _bytes: &[u8]) {}
}

impl BuildHasher for CollidingBuilder {
    type Hasher = CollidingHasher;

    fn build_hasher(&self) -> CollidingHasher {
        CollidingHasher
    }
}

// =============================================================================
// Construction and Duplicate Policy
// =============================================================================

#[rstest]
fn test_new_creates_empty_map() {
    let map: FrozenMap<String, i32> = FrozenMap::new();
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    assert_eq!(map.get("key"), None);
}

#[rstest]
fn test_lenient_construction_keeps_first_pair() {
    let map: FrozenMap<u32, &str> = [(10, "a"), (20, "b"), (10, "c")].into();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&10), Some(&"a"));
    assert_eq!(map.get(&20), Some(&"b"));
}

#[rstest]
fn test_strict_construction_reports_both_positions() {
    let error = FrozenMap::<u32, &str>::try_from_pairs([(10, "a"), (10, "b")]).unwrap_err();
    assert_eq!(error.key, 10);
    assert_eq!(error.first_position, 0);
    assert_eq!(error.second_position, 1);
    assert_eq!(
        error.to_string(),
        "duplicate key 10 at source positions 0 and 1"
    );
}

#[rstest]
fn test_strict_construction_in_hashed_representation() {
    let pairs = [(1u32, ()), (2, ()), (3, ()), (4, ()), (2, ()), (5, ())];
    let error = FrozenMap::<u32, ()>::try_from_pairs(pairs).unwrap_err();
    assert_eq!(error.key, 2);
    assert_eq!(error.first_position, 1);
    assert_eq!(error.second_position, 4);
}

#[rstest]
fn test_iteration_preserves_first_seen_key_order() {
    let pairs: Vec<(u32, u32)> = vec![(9, 0), (4, 1), (9, 2), (6, 3), (5, 4), (1, 5)];
    let map: FrozenMap<u32, u32> = pairs.into();
    let keys: Vec<u32> = map.keys().copied().collect();
    assert_eq!(keys, vec![9, 4, 6, 5, 1]);
    assert_eq!(map.get(&9), Some(&0));
}

#[rstest]
fn test_index_by_keys_items_by_projection() {
    let map: FrozenMap<usize, &str> = FrozenMap::index_by(["a", "bb", "ccc"], |item| item.len());
    assert_eq!(map.get(&2), Some(&"bb"));
    assert_eq!(map.get(&4), None);

    let error = FrozenMap::<usize, &str>::try_index_by(["a", "b"], |item| item.len()).unwrap_err();
    assert_eq!(error.key, 1);
}

// =============================================================================
// Lookup
// =============================================================================

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(4)]
#[case(200)]
fn test_get_across_representations(#[case] count: u32) {
    let map: FrozenMap<u32, u32> = (0..count).map(|key| (key, key * 2)).collect();
    for key in 0..count {
        assert_eq!(map.get(&key), Some(&(key * 2)));
    }
    assert_eq!(map.get(&count), None);
}

#[rstest]
fn test_full_collision_chains_still_resolve() {
    let map: FrozenMap<u32, u32, CollidingBuilder> =
        FrozenMap::from_pairs_with_hasher((0..64).map(|key| (key, key + 100)), CollidingBuilder);
    assert_eq!(map.len(), 64);
    for key in 0..64 {
        assert_eq!(map.get(&key), Some(&(key + 100)));
    }
    assert_eq!(map.get(&64), None);
}

#[rstest]
fn test_full_collision_duplicate_detection() {
    let pairs = [(7u32, 'a'), (8, 'b'), (9, 'c'), (10, 'd'), (8, 'e')];
    let error =
        FrozenMap::<u32, char, CollidingBuilder>::try_from_pairs_with_hasher(pairs, CollidingBuilder)
            .unwrap_err();
    assert_eq!(error.key, 8);
    assert_eq!(error.first_position, 1);
    assert_eq!(error.second_position, 4);
}

#[rstest]
fn test_borrowed_key_lookup_and_index() {
    let map: FrozenMap<String, i32> = [("one".to_string(), 1), ("two".to_string(), 2)].into();
    assert_eq!(map.get("two"), Some(&2));
    assert_eq!(map["one"], 1);
    assert_eq!(
        map.get_key_value("one"),
        Some((&"one".to_string(), &1))
    );
    assert!(map.contains_key("two"));
    assert!(!map.contains_key("three"));
}

#[rstest]
#[should_panic(expected = "no entry found for key")]
fn test_index_panics_on_absent_key() {
    let map: FrozenMap<u32, u32> = [(1, 1)].into();
    let _ = map[&2];
}

// =============================================================================
// Patched Layers
// =============================================================================

#[rstest]
fn test_patched_layer_scenario() {
    let origin: FrozenMap<u32, &str> = [(1, "One"), (2, "Two")].into();
    let patched = origin.patched([(2, "Dos")].into(), [1].into());

    assert_eq!(patched.len(), 1);
    assert_eq!(patched.get(&1), None);
    assert_eq!(patched.get(&2), Some(&"Dos"));

    // The base snapshot is untouched.
    assert_eq!(origin.get(&1), Some(&"One"));
    assert_eq!(origin.get(&2), Some(&"Two"));
}

#[rstest]
fn test_patched_adds_new_keys() {
    let origin: FrozenMap<u32, &str> = [(1, "One")].into();
    let patched = origin.patched([(2, "Two"), (3, "Three")].into(), FrozenSet::new());
    assert_eq!(patched.len(), 3);
    assert_eq!(patched.get(&3), Some(&"Three"));
    assert_eq!(patched.iter().count(), 3);
}

#[rstest]
fn test_repack_flattens_a_deep_stack() {
    let mut map: FrozenMap<u32, u32> = (0..10).map(|key| (key, key)).collect();
    for round in 0..5 {
        map = map.patched([(round, round + 100)].into(), FrozenSet::new());
    }
    assert_eq!(map.cascading_level(), 5);

    let repacked = map.repack();
    assert_eq!(repacked.cascading_level(), 0);
    assert_eq!(repacked, map);
    assert_eq!(repacked.get(&4), Some(&104));
    assert_eq!(repacked.get(&7), Some(&7));
}

#[rstest]
fn test_equality_spans_layered_and_flat_forms() {
    let layered = FrozenMap::<u32, &str>::from([(1, "One"), (2, "Two")])
        .patched([(2, "Dos")].into(), FrozenSet::new());
    let flat: FrozenMap<u32, &str> = [(1, "One"), (2, "Dos")].into();
    assert_eq!(layered, flat);
    assert_eq!(flat, layered);
}

// =============================================================================
// Cloning
// =============================================================================

#[rstest]
fn test_clone_shares_backing_storage() {
    let map: FrozenMap<u32, String> = (0..50).map(|key| (key, key.to_string())).collect();
    let clone = map.clone();
    assert_eq!(map, clone);
    assert!(std::ptr::eq(
        map.get(&7).unwrap(),
        clone.get(&7).unwrap()
    ));
}
