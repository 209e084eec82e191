//! Capability traits shared by the frozen containers.
//!
//! Instead of a deep container hierarchy there are four small traits, each
//! naming one capability:
//!
//! - [`Collection`]: anything with a length
//! - [`Lookup`]: find a stored value by key or element
//! - [`Indexed`]: positional access in the container's canonical order
//! - [`Ordered`]: marker for containers that iterate in ascending order
//!
//! Generic code takes the weakest bound that covers what it touches.
//!
//! # Examples
//!
//! ```rust
//! use permafrost::traits::Lookup;
//! use permafrost::{FrozenMap, FrozenSortedMap};
//!
//! fn describe<M: Lookup<str, Value = u32>>(map: &M, name: &str) -> u32 {
//!     map.find(name).copied().unwrap_or(0)
//! }
//!
//! let hashed: FrozenMap<String, u32> = [("one".to_string(), 1)].into();
//! let sorted: FrozenSortedMap<String, u32> = [("one".to_string(), 1)].into();
//! assert_eq!(describe(&hashed, "one"), 1);
//! assert_eq!(describe(&sorted, "two"), 0);
//! ```

use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};

use crate::{
    FlatKey, FrozenIntMap, FrozenList, FrozenMap, FrozenSet, FrozenSortedMap, FrozenSortedSet,
};

/// A finite container with a known length.
pub trait Collection {
    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keyed lookup into a container.
///
/// `Q` is the query type, borrowed from the stored key the same way the
/// inherent `get` methods allow. Sets implement this with the element as
/// its own value.
pub trait Lookup<Q: ?Sized>: Collection {
    /// What a successful lookup yields a reference to.
    type Value;

    /// Stored value for `query`, or `None`.
    fn find(&self, query: &Q) -> Option<&Self::Value>;

    /// Returns `true` if `query` is present.
    fn holds(&self, query: &Q) -> bool {
        self.find(query).is_some()
    }
}

/// Positional access in the container's canonical order.
///
/// The entry is a generic-associated type so maps can hand out key-value
/// pairs while sequences hand out plain references.
pub trait Indexed: Collection {
    /// What position `index` yields.
    type Entry<'a>
    where
        Self: 'a;

    /// Entry at `index`, or `None` when out of range.
    fn entry_at(&self, index: usize) -> Option<Self::Entry<'_>>;

    /// First entry in canonical order.
    fn head(&self) -> Option<Self::Entry<'_>> {
        self.entry_at(0)
    }

    /// Last entry in canonical order.
    fn tail(&self) -> Option<Self::Entry<'_>> {
        self.len().checked_sub(1).and_then(|index| self.entry_at(index))
    }
}

/// Marker for containers whose canonical iteration order is ascending.
pub trait Ordered: Collection {}

// =============================================================================
// Implementations
// =============================================================================

impl<T> Collection for FrozenList<T> {
    fn len(&self) -> usize {
        self.len()
    }
}

impl<T, S> Collection for FrozenSet<T, S> {
    fn len(&self) -> usize {
        self.len()
    }
}

impl<T> Collection for FrozenSortedSet<T> {
    fn len(&self) -> usize {
        self.len()
    }
}

impl<K, V, S> Collection for FrozenMap<K, V, S> {
    fn len(&self) -> usize {
        self.len()
    }
}

impl<K, V> Collection for FrozenSortedMap<K, V> {
    fn len(&self) -> usize {
        self.len()
    }
}

impl<K, V> Collection for FrozenIntMap<K, V> {
    fn len(&self) -> usize {
        self.len()
    }
}

impl<T, S, Q> Lookup<Q> for FrozenSet<T, S>
where
    T: Eq + Hash + Borrow<Q>,
    S: BuildHasher,
    Q: Hash + Eq + ?Sized,
{
    type Value = T;

    fn find(&self, query: &Q) -> Option<&T> {
        self.get(query)
    }
}

impl<T, Q> Lookup<Q> for FrozenSortedSet<T>
where
    T: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Value = T;

    fn find(&self, query: &Q) -> Option<&T> {
        self.get(query)
    }
}

impl<K, V, S, Q> Lookup<Q> for FrozenMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    S: BuildHasher,
    Q: Hash + Eq + ?Sized,
{
    type Value = V;

    fn find(&self, query: &Q) -> Option<&V> {
        self.get(query)
    }
}

impl<K, V, Q> Lookup<Q> for FrozenSortedMap<K, V>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Value = V;

    fn find(&self, query: &Q) -> Option<&V> {
        self.get(query)
    }
}

impl<K: FlatKey, V> Lookup<K> for FrozenIntMap<K, V> {
    type Value = V;

    fn find(&self, query: &K) -> Option<&V> {
        self.get(*query)
    }
}

impl<T> Indexed for FrozenList<T> {
    type Entry<'a>
        = &'a T
    where
        Self: 'a;

    fn entry_at(&self, index: usize) -> Option<&T> {
        self.get(index)
    }
}

impl<T> Indexed for FrozenSortedSet<T> {
    type Entry<'a>
        = &'a T
    where
        Self: 'a;

    fn entry_at(&self, index: usize) -> Option<&T> {
        self.get_index(index)
    }
}

impl<K, V> Indexed for FrozenSortedMap<K, V> {
    type Entry<'a>
        = (&'a K, &'a V)
    where
        Self: 'a;

    fn entry_at(&self, index: usize) -> Option<(&K, &V)> {
        self.get_index(index)
    }
}

impl<T> Ordered for FrozenSortedSet<T> {}

impl<K, V> Ordered for FrozenSortedMap<K, V> {}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn total_len(collections: &[&dyn Collection]) -> usize {
        collections.iter().map(|collection| collection.len()).sum()
    }

    #[rstest]
    fn test_collection_is_object_safe() {
        let list: FrozenList<i32> = [1, 2, 3].into();
        let set: FrozenSortedSet<i32> = [4, 5].into();
        assert_eq!(total_len(&[&list, &set]), 5);
    }

    #[rstest]
    fn test_lookup_generalizes_over_map_kinds() {
        fn find_copied<M: Lookup<u32, Value = u32>>(map: &M, key: u32) -> Option<u32> {
            map.find(&key).copied()
        }

        let hashed: FrozenMap<u32, u32> = [(1, 10), (2, 20)].into();
        let sorted: FrozenSortedMap<u32, u32> = [(1, 10), (2, 20)].into();
        let flat: FrozenIntMap<u32, u32> = [(1, 10), (2, 20)].into();
        assert_eq!(find_copied(&hashed, 2), Some(20));
        assert_eq!(find_copied(&sorted, 2), Some(20));
        assert_eq!(find_copied(&flat, 2), Some(20));
        assert_eq!(find_copied(&hashed, 3), None);
        assert!(hashed.holds(&1));
    }

    #[rstest]
    fn test_indexed_head_and_tail() {
        let set: FrozenSortedSet<i32> = [30, 10, 20].into();
        assert_eq!(set.head(), Some(&10));
        assert_eq!(set.tail(), Some(&30));
        assert_eq!(set.entry_at(3), None);

        let empty: FrozenList<i32> = FrozenList::new();
        assert_eq!(empty.head(), None);
        assert_eq!(empty.tail(), None);
    }
}
