//! Unit tests for FrozenList.

use permafrost::FrozenList;
use rstest::rstest;

// =============================================================================
// Construction and Representation
// =============================================================================

#[rstest]
fn test_new_creates_empty_list() {
    let list: FrozenList<i32> = FrozenList::new();
    assert!(list.is_empty());
    assert_eq!(list.len(), 0);
    assert_eq!(list.get(0), None);
    assert_eq!(list.first(), None);
    assert_eq!(list.last(), None);
}

#[rstest]
fn test_single_element_list() {
    let list: FrozenList<&str> = ["only"].into();
    assert_eq!(list.len(), 1);
    assert_eq!(list.get(0), Some(&"only"));
    assert_eq!(list.first(), Some(&"only"));
    assert_eq!(list.last(), Some(&"only"));
    assert_eq!(list.get(1), None);
}

#[rstest]
fn test_list_preserves_source_order_and_duplicates() {
    let list: FrozenList<i32> = [5, 3, 5, 1, 3, 3].into();
    assert_eq!(list.len(), 6);
    let collected: Vec<i32> = list.iter().copied().collect();
    assert_eq!(collected, vec![5, 3, 5, 1, 3, 3]);
}

#[rstest]
fn test_from_iterator() {
    let list: FrozenList<u32> = (0..10).collect();
    assert_eq!(list.len(), 10);
    assert_eq!(list.get(9), Some(&9));
}

// =============================================================================
// Indexed Access
// =============================================================================

#[rstest]
fn test_at_and_index_agree_with_get() {
    let list: FrozenList<char> = ['a', 'b', 'c'].into();
    assert_eq!(list.at(1), &'b');
    assert_eq!(list[2], 'c');
    assert_eq!(list.get(1), Some(&'b'));
}

#[rstest]
#[should_panic(expected = "index out of bounds: the len is 3 but the index is 3")]
fn test_at_panics_past_the_end() {
    let list: FrozenList<char> = ['a', 'b', 'c'].into();
    let _ = list.at(3);
}

#[rstest]
#[should_panic(expected = "index out of bounds: the len is 0 but the index is 0")]
fn test_at_panics_on_empty() {
    let list: FrozenList<i32> = FrozenList::new();
    let _ = list.at(0);
}

#[rstest]
fn test_position_of_finds_first_occurrence() {
    let list: FrozenList<i32> = [5, 3, 5, 1].into();
    assert_eq!(list.position_of(&5), Some(0));
    assert_eq!(list.position_of(&1), Some(3));
    assert_eq!(list.position_of(&9), None);
    assert!(list.contains(&3));
    assert!(!list.contains(&9));
}

// =============================================================================
// Iteration, Equality, Cloning
// =============================================================================

#[rstest]
fn test_iteration_is_replayable() {
    let list: FrozenList<i32> = [1, 2, 3].into();
    let first_pass: Vec<i32> = list.iter().copied().collect();
    let second_pass: Vec<i32> = list.iter().copied().collect();
    assert_eq!(first_pass, second_pass);
}

#[rstest]
fn test_clone_shares_backing_storage() {
    let list: FrozenList<String> = vec!["a".to_string(), "b".to_string()].into();
    let clone = list.clone();
    assert_eq!(list, clone);
    // The elements are the very same allocations, not copies.
    assert!(std::ptr::eq(list.at(0), clone.at(0)));
}

#[rstest]
fn test_equality_is_elementwise() {
    let left: FrozenList<i32> = [1, 2, 3].into();
    let right: FrozenList<i32> = vec![1, 2, 3].into();
    let shorter: FrozenList<i32> = [1, 2].into();
    assert_eq!(left, right);
    assert_ne!(left, shorter);
}

#[rstest]
fn test_into_iterator_yields_owned_elements() {
    let list: FrozenList<String> = vec!["x".to_string(), "y".to_string()].into();
    let owned: Vec<String> = list.clone().into_iter().collect();
    assert_eq!(owned, vec!["x".to_string(), "y".to_string()]);
    // The original is untouched.
    assert_eq!(list.len(), 2);
}

#[rstest]
fn test_debug_formats_like_a_vec() {
    let list: FrozenList<i32> = [1, 2].into();
    assert_eq!(format!("{list:?}"), "[1, 2]");
}
