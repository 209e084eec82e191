//! Property-based tests for the sorted façades.
//!
//! The reference model is a std BTree collection; the frozen containers
//! must agree on membership, order, and range queries.

use permafrost::{FrozenSortedMap, FrozenSortedSet};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn arbitrary_elements() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-50i32..50, 0..80)
}

proptest! {
    #[test]
    fn prop_sorted_set_matches_btree_model(elements in arbitrary_elements()) {
        let model: BTreeSet<i32> = elements.iter().copied().collect();
        let set = FrozenSortedSet::from_elements(elements);

        prop_assert_eq!(set.len(), model.len());
        let ascending: Vec<i32> = set.iter().copied().collect();
        let expected: Vec<i32> = model.iter().copied().collect();
        prop_assert_eq!(ascending, expected);
        for element in -51..51 {
            prop_assert_eq!(set.contains(&element), model.contains(&element));
        }
    }

    #[test]
    fn prop_sorted_set_range_matches_btree_range(
        elements in arbitrary_elements(),
        low in -60i32..60,
        span in 0i32..40
    ) {
        let model: BTreeSet<i32> = elements.iter().copied().collect();
        let set = FrozenSortedSet::from_elements(elements);
        let high = low + span;

        let got: Vec<i32> = set.range(low..high).copied().collect();
        let expected: Vec<i32> = model.range(low..high).copied().collect();
        prop_assert_eq!(got, expected);

        let got: Vec<i32> = set.range(low..=high).copied().collect();
        let expected: Vec<i32> = model.range(low..=high).copied().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_sorted_set_algebra_matches_btree(
        left in arbitrary_elements(),
        right in arbitrary_elements()
    ) {
        let left_model: BTreeSet<i32> = left.iter().copied().collect();
        let right_model: BTreeSet<i32> = right.iter().copied().collect();
        let left_set = FrozenSortedSet::from_elements(left);
        let right_set = FrozenSortedSet::from_elements(right);

        let union: Vec<i32> = left_set.union(&right_set).iter().copied().collect();
        let expected: Vec<i32> = left_model.union(&right_model).copied().collect();
        prop_assert_eq!(union, expected);

        let intersection: Vec<i32> = left_set.intersection(&right_set).iter().copied().collect();
        let expected: Vec<i32> = left_model.intersection(&right_model).copied().collect();
        prop_assert_eq!(intersection, expected);

        let difference: Vec<i32> = left_set.difference(&right_set).iter().copied().collect();
        let expected: Vec<i32> = left_model.difference(&right_model).copied().collect();
        prop_assert_eq!(difference, expected);
    }

    #[test]
    fn prop_sorted_map_matches_btree_model(
        pairs in prop::collection::vec((-50i32..50, any::<i32>()), 0..80)
    ) {
        // First-wins insertion into the model.
        let mut model: BTreeMap<i32, i32> = BTreeMap::new();
        for (key, value) in &pairs {
            model.entry(*key).or_insert(*value);
        }
        let map = FrozenSortedMap::from_pairs(pairs);

        prop_assert_eq!(map.len(), model.len());
        let ascending: Vec<(i32, i32)> = map.iter().map(|(key, value)| (*key, *value)).collect();
        let expected: Vec<(i32, i32)> = model.iter().map(|(key, value)| (*key, *value)).collect();
        prop_assert_eq!(ascending, expected);
        for key in -51..51 {
            prop_assert_eq!(map.get(&key), model.get(&key));
        }
    }
}
