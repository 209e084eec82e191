//! Unit tests for FrozenSortedSet.

use permafrost::FrozenSortedSet;
use rstest::rstest;

// =============================================================================
// Construction and Ordering
// =============================================================================

#[rstest]
fn test_construction_sorts_and_deduplicates() {
    let set = FrozenSortedSet::from_elements([5, 3, 5, 1, 3, 3]);
    assert_eq!(set.len(), 3);
    let ascending: Vec<i32> = set.iter().copied().collect();
    assert_eq!(ascending, vec![1, 3, 5]);
}

#[rstest]
fn test_strict_construction_rejects_duplicates() {
    let error = FrozenSortedSet::try_from_elements([5, 3, 5, 1]).unwrap_err();
    assert_eq!(error.key, 5);
    assert_eq!(error.first_position, 0);
    assert_eq!(error.second_position, 2);
}

#[rstest]
fn test_strict_construction_accepts_unique_elements() {
    let set = FrozenSortedSet::try_from_elements([5, 3, 1]).unwrap();
    let ascending: Vec<i32> = set.iter().copied().collect();
    assert_eq!(ascending, vec![1, 3, 5]);
}

#[rstest]
fn test_first_source_instance_survives_dedup() {
    // Same ordering key, distinguishable payloads.
    let set = FrozenSortedSet::from_elements([(2, "first"), (1, "one"), (2, "second")]);
    assert_eq!(set.len(), 3);

    let set = FrozenSortedSet::from_elements(["b".to_string(), "a".to_string(), "b".to_string()]);
    assert_eq!(set.len(), 2);
}

// =============================================================================
// Lookup and Positional Access
// =============================================================================

#[rstest]
fn test_lookup_across_sizes() {
    for count in [0usize, 1, 2, 3, 4, 100] {
        let set: FrozenSortedSet<usize> = (0..count).rev().collect();
        for element in 0..count {
            assert!(set.contains(&element));
            assert_eq!(set.position_of(&element), Some(element));
        }
        assert!(!set.contains(&count));
    }
}

#[rstest]
fn test_first_last_and_indexing() {
    let set = FrozenSortedSet::from_elements([30, 10, 20]);
    assert_eq!(set.first(), Some(&10));
    assert_eq!(set.last(), Some(&30));
    assert_eq!(set.get_index(1), Some(&20));
    assert_eq!(set.at(2), &30);
    assert_eq!(set[0], 10);
    assert_eq!(set.get_index(3), None);
}

#[rstest]
#[should_panic(expected = "index out of bounds: the len is 3 but the index is 3")]
fn test_at_panics_out_of_range() {
    let set = FrozenSortedSet::from_elements([30, 10, 20]);
    let _ = set.at(3);
}

#[rstest]
fn test_borrowed_lookup() {
    let set: FrozenSortedSet<String> = ["pear".to_string(), "apple".to_string()].into();
    assert!(set.contains("apple"));
    assert_eq!(set.get("pear"), Some(&"pear".to_string()));
    assert_eq!(set.get("plum"), None);
}

// =============================================================================
// Range Queries
// =============================================================================

#[rstest]
fn test_range_inclusive_and_exclusive_bounds() {
    let set: FrozenSortedSet<i32> = [1, 3, 5, 7, 9].into();
    let middle: Vec<i32> = set.range(3..8).copied().collect();
    assert_eq!(middle, vec![3, 5, 7]);
    let inclusive: Vec<i32> = set.range(3..=7).copied().collect();
    assert_eq!(inclusive, vec![3, 5, 7]);
    let tail: Vec<i32> = set.range(6..).copied().collect();
    assert_eq!(tail, vec![7, 9]);
    let head: Vec<i32> = set.range(..5).copied().collect();
    assert_eq!(head, vec![1, 3]);
    let all: Vec<i32> = set.range(..).copied().collect();
    assert_eq!(all, vec![1, 3, 5, 7, 9]);
}

#[rstest]
fn test_range_can_be_empty() {
    let set: FrozenSortedSet<i32> = [1, 3, 5].into();
    assert_eq!(set.range(6..).count(), 0);
    assert_eq!(set.range(2..3).count(), 0);
}

// =============================================================================
// Set Algebra
// =============================================================================

#[rstest]
fn test_union_intersection_difference_stay_sorted() {
    let left: FrozenSortedSet<i32> = [1, 3, 5].into();
    let right: FrozenSortedSet<i32> = [2, 3, 4].into();

    let union: Vec<i32> = left.union(&right).iter().copied().collect();
    assert_eq!(union, vec![1, 2, 3, 4, 5]);

    let intersection: Vec<i32> = left.intersection(&right).iter().copied().collect();
    assert_eq!(intersection, vec![3]);

    let difference: Vec<i32> = left.difference(&right).iter().copied().collect();
    assert_eq!(difference, vec![1, 5]);
}

#[rstest]
fn test_algebra_with_empty_sets() {
    let set: FrozenSortedSet<i32> = [1, 2].into();
    let empty = FrozenSortedSet::new();
    assert_eq!(set.union(&empty), set);
    assert_eq!(set.intersection(&empty), empty);
    assert_eq!(set.difference(&empty), set);
    assert_eq!(empty.difference(&set), empty);
}

// =============================================================================
// Equality and Cloning
// =============================================================================

#[rstest]
fn test_equality_is_order_free_by_construction() {
    let forward: FrozenSortedSet<i32> = [1, 2, 3].into();
    let shuffled: FrozenSortedSet<i32> = [3, 1, 2, 2].into();
    assert_eq!(forward, shuffled);
}

#[rstest]
fn test_clone_shares_backing_storage() {
    let set: FrozenSortedSet<String> = (0..50).map(|index| format!("{index:03}")).collect();
    let clone = set.clone();
    assert_eq!(set, clone);
    assert!(std::ptr::eq(set.at(0), clone.at(0)));
}
