//! Property-based tests for the layered patch form of FrozenMap.
//!
//! The composition law: for every key, a patched map answers exactly as
//! `origin ∖ removed ∪ patch` with the patch winning ties. Repacking must
//! not change any observable answer, only the cascading level.

use permafrost::{FrozenMap, FrozenSet};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arbitrary_pairs() -> impl Strategy<Value = Vec<(u8, i32)>> {
    prop::collection::vec((0u8..40, any::<i32>()), 0..30)
}

fn arbitrary_keys() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..40, 0..15)
}

fn composed_answer<'a>(
    origin: &'a FrozenMap<u8, i32>,
    patch: &'a FrozenMap<u8, i32>,
    removed: &FrozenSet<u8>,
    key: u8,
) -> Option<&'a i32> {
    if let Some(value) = patch.get(&key) {
        Some(value)
    } else if removed.contains(&key) {
        None
    } else {
        origin.get(&key)
    }
}

// =============================================================================
// Composition law
// =============================================================================

proptest! {
    #[test]
    fn prop_patched_lookup_follows_the_composition(
        origin_pairs in arbitrary_pairs(),
        patch_pairs in arbitrary_pairs(),
        removed_keys in arbitrary_keys()
    ) {
        let origin: FrozenMap<u8, i32> = FrozenMap::from_pairs(origin_pairs);
        let patch: FrozenMap<u8, i32> = FrozenMap::from_pairs(patch_pairs);
        let removed: FrozenSet<u8> = FrozenSet::from_elements(removed_keys);
        let patched = origin.patched(patch.clone(), removed.clone());

        let mut expected_len = 0;
        for key in 0..=40u8 {
            let expected = composed_answer(&origin, &patch, &removed, key);
            prop_assert_eq!(patched.get(&key), expected);
            if expected.is_some() {
                expected_len += 1;
            }
        }
        prop_assert_eq!(patched.len(), expected_len);
        prop_assert_eq!(patched.iter().count(), expected_len);
    }

    #[test]
    fn prop_repack_preserves_every_answer(
        origin_pairs in arbitrary_pairs(),
        patch_pairs in arbitrary_pairs(),
        removed_keys in arbitrary_keys()
    ) {
        let origin: FrozenMap<u8, i32> = FrozenMap::from_pairs(origin_pairs);
        let patched = origin.patched(
            FrozenMap::from_pairs(patch_pairs),
            FrozenSet::from_elements(removed_keys),
        );
        let repacked = patched.repack();

        prop_assert_eq!(repacked.cascading_level(), 0);
        prop_assert_eq!(repacked.len(), patched.len());
        for key in 0..=40u8 {
            prop_assert_eq!(repacked.get(&key), patched.get(&key));
        }
    }

    #[test]
    fn prop_stacking_layers_equals_sequential_composition(
        origin_pairs in arbitrary_pairs(),
        first_patch in arbitrary_pairs(),
        second_patch in arbitrary_pairs(),
        removed_keys in arbitrary_keys()
    ) {
        let origin: FrozenMap<u8, i32> = FrozenMap::from_pairs(origin_pairs);
        let first_map: FrozenMap<u8, i32> = FrozenMap::from_pairs(first_patch);
        let second_map: FrozenMap<u8, i32> = FrozenMap::from_pairs(second_patch);
        let removed: FrozenSet<u8> = FrozenSet::from_elements(removed_keys);

        let once = origin.patched(first_map.clone(), removed.clone());
        let twice = once.patched(second_map.clone(), FrozenSet::new());

        for key in 0..=40u8 {
            let expected = second_map
                .get(&key)
                .or_else(|| composed_answer(&origin, &first_map, &removed, key));
            prop_assert_eq!(twice.get(&key), expected);
        }
    }
}
