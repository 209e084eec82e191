//! # permafrost
//!
//! Immutable, snapshot-style containers that choose their internal
//! representation once, at construction time, and never change it.
//!
//! ## Overview
//!
//! Every container in this crate is built from a finite source of elements
//! and is read-only afterwards. The constructor inspects the element count
//! (and, for integer-keyed maps, the key distribution) and picks the cheapest
//! representation that still gives fast lookups:
//!
//! - **Empty**: a shared empty instance, no allocation
//! - **Single**: a one-entry wrapper, no arrays
//! - **Scan**: two or three entries probed linearly — at this size a hash
//!   table costs more to build than a scan costs to run
//! - **Hashed**: a compact hash table with bit-packed chain links
//! - **Sorted**: a sorted array probed by binary search
//! - **Flat**: a direct-addressed interval table for dense integer keys
//!
//! The containers:
//!
//! - [`FrozenList`]: an immutable sequence with indexed access
//! - [`FrozenSet`]: an immutable hash set preserving first-seen order
//! - [`FrozenSortedSet`]: an immutable set iterated in ascending order
//! - [`FrozenMap`]: an immutable hash map, with a layered "patch" form for
//!   cheap derived snapshots
//! - [`FrozenSortedMap`]: an immutable map iterated in ascending key order
//! - [`FrozenIntMap`]: an immutable map over unsigned-integer keys that uses
//!   direct addressing when the key interval is dense
//!
//! ## Sharing
//!
//! Containers clone in O(1): the backing storage is behind a reference count
//! and is never written after construction, so clones and concurrent readers
//! share it freely. No lock, atomic, or mutable cell exists in a built
//! container (with the `arc` feature the reference count itself is atomic).
//!
//! ## Duplicate policy
//!
//! Lenient constructors (`from_pairs`, `from_elements`, `FromIterator`)
//! keep the **first** occurrence of a duplicated key in every
//! representation. Strict constructors (`try_from_pairs`,
//! `try_from_elements`) reject duplicates with a [`DuplicateKeyError`]
//! naming both conflicting source positions.
//!
//! ## Feature Flags
//!
//! - `arc`: share backing storage through `Arc` instead of `Rc`, making
//!   containers `Send + Sync` when their contents are
//! - `serde`: `Serialize`/`Deserialize` for every container
//!
//! ## Example
//!
//! ```rust
//! use permafrost::{FrozenMap, FrozenSet};
//!
//! let map: FrozenMap<&str, i32> = [("one", 1), ("two", 2)].into();
//! assert_eq!(map.get("one"), Some(&1));
//! assert_eq!(map.get("three"), None);
//!
//! // A derived snapshot with one key changed, built without copying the base.
//! let patched = map.patched([("two", 22)].into(), FrozenSet::new());
//! assert_eq!(patched.get("two"), Some(&22));
//! assert_eq!(map.get("two"), Some(&2)); // the base is untouched
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

// =============================================================================
// Shared Pointer Type Alias
// =============================================================================

/// Reference-counted pointer used for all backing storage.
///
/// With the `arc` feature enabled this is `std::sync::Arc`, which is
/// thread-safe at the cost of atomic count updates.
///
/// Without it (the default) this is `std::rc::Rc`, which is faster but not
/// thread-safe.
#[cfg(feature = "arc")]
pub(crate) type Shared<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type Shared<T> = std::rc::Rc<T>;

/// Largest entry count stored as a linear-scan "mini" representation.
///
/// Below this, building a hash table or sorting costs more than the scans
/// it would ever save.
pub(crate) const MINI_LIMIT: usize = 3;

mod error;
mod flat;
mod int_map;
mod list;
mod map;
mod patched;
mod set;
mod sort;
mod sorted_map;
mod sorted_set;
mod table;
pub mod traits;

#[cfg(feature = "serde")]
mod serde_support;

pub use error::DuplicateKeyError;
pub use flat::FlatKey;
pub use int_map::FrozenIntMap;
pub use int_map::FrozenIntMapIntoIterator;
pub use int_map::FrozenIntMapIterator;
pub use list::FrozenList;
pub use list::FrozenListIntoIterator;
pub use list::FrozenListIterator;
pub use map::FrozenMap;
pub use map::FrozenMapIntoIterator;
pub use map::FrozenMapIterator;
pub use map::FrozenMapKeys;
pub use map::FrozenMapValues;
pub use set::FrozenSet;
pub use set::FrozenSetIntoIterator;
pub use set::FrozenSetIterator;
pub use sorted_map::FrozenSortedMap;
pub use sorted_map::FrozenSortedMapIntoIterator;
pub use sorted_map::FrozenSortedMapIterator;
pub use sorted_map::FrozenSortedMapRangeIterator;
pub use sorted_set::FrozenSortedSet;
pub use sorted_set::FrozenSortedSetIntoIterator;
pub use sorted_set::FrozenSortedSetIterator;
pub use sorted_set::FrozenSortedSetRangeIterator;

/// Default hasher provider, shared by every hash-based container.
pub type DefaultHashBuilder = rustc_hash::FxBuildHasher;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod shared_tests {
    use super::Shared;
    use rstest::rstest;

    #[rstest]
    fn test_shared_clone_points_at_same_value() {
        let shared: Shared<i32> = Shared::new(42);
        let clone = shared.clone();
        assert_eq!(*shared, *clone);
        assert_eq!(Shared::strong_count(&shared), 2);
    }

    #[rstest]
    fn test_shared_slice_from_vec() {
        let shared: Shared<[i32]> = Shared::from(vec![1, 2, 3]);
        assert_eq!(&*shared, &[1, 2, 3]);
    }
}
