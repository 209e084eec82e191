//! Immutable map over unsigned-integer keys with direct addressing.

use std::fmt;

use crate::error::DuplicatePositions;
use crate::flat::{FlatKey, FlatMap};
use crate::set::{retain_positions, take_duplicate};
use crate::{DuplicateKeyError, Shared, MINI_LIMIT};

/// Widest key interval, per entry, that still earns the flat
/// representation. At `span ≤ 5 × count` the bitmap and slot table stay
/// within a few words per entry; anything sparser falls back to a sorted
/// index.
const FLAT_SPAN_FACTOR: u64 = 5;

/// Internal representation, chosen once at construction.
enum IntMapRepr<K, V> {
    Empty,
    Single(Shared<(K, V)>),
    /// Two or three entries probed linearly, in first-seen order.
    Scan(Shared<[(K, V)]>),
    /// Dense key interval: direct-addressed, O(1) lookups.
    Flat(Shared<FlatMap<K, V>>),
    /// Sparse key interval: binary search through a sorted position index.
    Sparse(Shared<SparseMap<K, V>>),
}

impl<K, V> Clone for IntMapRepr<K, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Single(entry) => Self::Single(entry.clone()),
            Self::Scan(entries) => Self::Scan(entries.clone()),
            Self::Flat(flat) => Self::Flat(flat.clone()),
            Self::Sparse(sparse) => Self::Sparse(sparse.clone()),
        }
    }
}

/// Fallback for key intervals too wide for direct addressing: the entries
/// stay in first-seen order, a side index sorts their positions by key.
struct SparseMap<K, V> {
    entries: Box<[(K, V)]>,
    order: Box<[u32]>,
}

impl<K: FlatKey, V> SparseMap<K, V> {
    fn build(entries: Vec<(K, V)>) -> Self {
        let mut order: Vec<u32> = (0..entries.len() as u32).collect();
        order.sort_by_key(|&position| entries[position as usize].0.flat_index());
        Self {
            entries: entries.into_boxed_slice(),
            order: order.into_boxed_slice(),
        }
    }

    fn get_entry(&self, key: K) -> Option<&(K, V)> {
        let index = key.flat_index();
        let position = self
            .order
            .binary_search_by_key(&index, |&position| {
                self.entries[position as usize].0.flat_index()
            })
            .ok()?;
        Some(&self.entries[self.order[position] as usize])
    }
}

/// An immutable map over unsigned-integer keys.
///
/// When the keys are dense — the interval `[min, max]` is at most five
/// times the entry count — lookups are direct-addressed: a subtraction, a
/// bit test and one array read, no hashing. Sparser key sets fall back to
/// a binary search. Either way iteration preserves first-seen order and
/// cloning is O(1).
///
/// Keys are `Copy` integers and are taken by value throughout.
///
/// # Examples
///
/// ```rust
/// use permafrost::FrozenIntMap;
///
/// let map: FrozenIntMap<u32, &str> = [(26, "a"), (42, "b"), (74, "c"), (30, "d")].into();
/// assert_eq!(map.get(42), Some(&"b"));
/// assert_eq!(map.get(50), None);
/// ```
pub struct FrozenIntMap<K, V> {
    repr: IntMapRepr<K, V>,
}

impl<K, V> FrozenIntMap<K, V> {
    /// Creates an empty map without allocating.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            repr: IntMapRepr::Empty,
        }
    }

    /// Number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.repr, IntMapRepr::Empty)
    }

    /// The entries as a slice in first-seen order.
    fn entries(&self) -> &[(K, V)] {
        match &self.repr {
            IntMapRepr::Empty => &[],
            IntMapRepr::Single(entry) => std::slice::from_ref(entry),
            IntMapRepr::Scan(entries) => entries,
            IntMapRepr::Flat(flat) => flat.entries(),
            IntMapRepr::Sparse(sparse) => &sparse.entries,
        }
    }

    /// Iterates `(key, value)` pairs in first-seen order. Each call starts
    /// a fresh pass.
    #[inline]
    pub fn iter(&self) -> FrozenIntMapIterator<'_, K, V> {
        FrozenIntMapIterator {
            entries: self.entries().iter(),
        }
    }

    /// Iterates the keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries().iter().map(|(key, _)| key)
    }

    /// Iterates the values in first-seen order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries().iter().map(|(_, value)| value)
    }
}

impl<K: FlatKey, V> FrozenIntMap<K, V> {
    /// Builds a map from key-value pairs, keeping the first pair for a
    /// duplicated key and preserving first-seen order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::FrozenIntMap;
    ///
    /// let map = FrozenIntMap::from_pairs([(7u32, "x"), (3, "y"), (7, "z")]);
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.get(7), Some(&"x"));
    /// ```
    pub fn from_pairs<I>(source: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries: Vec<(K, V)> = source.into_iter().collect();
        let dropped = later_duplicate_positions(&entries);
        let entries = if dropped.is_empty() {
            entries
        } else {
            retain_positions(entries, &dropped)
        };
        Self::select(entries)
    }

    /// Builds a map from key-value pairs, rejecting duplicated keys.
    ///
    /// # Errors
    ///
    /// [`DuplicateKeyError`] carrying the duplicated key and both source
    /// positions.
    pub fn try_from_pairs<I>(source: I) -> Result<Self, DuplicateKeyError<K>>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries: Vec<(K, V)> = source.into_iter().collect();
        match first_duplicate_positions(&entries) {
            None => Ok(Self::select(entries)),
            Some(positions) => {
                let error = take_duplicate(entries, positions);
                Err(DuplicateKeyError {
                    key: error.key.0,
                    first_position: error.first_position,
                    second_position: error.second_position,
                })
            }
        }
    }

    /// Picks the representation for duplicate-free `entries`.
    fn select(entries: Vec<(K, V)>) -> Self {
        let repr = match entries.len() {
            0 => IntMapRepr::Empty,
            1 => {
                let mut entries = entries;
                match entries.pop() {
                    Some(entry) => IntMapRepr::Single(Shared::new(entry)),
                    None => IntMapRepr::Empty,
                }
            }
            2..=MINI_LIMIT => IntMapRepr::Scan(Shared::from(entries)),
            count => {
                let mut min_index = u64::MAX;
                let mut max_index = 0u64;
                for (key, _) in &entries {
                    let index = key.flat_index();
                    min_index = min_index.min(index);
                    max_index = max_index.max(index);
                }
                // span ≤ FLAT_SPAN_FACTOR × count, phrased to dodge the
                // `max − min + 1` overflow at the top of the key range
                if max_index - min_index < count as u64 * FLAT_SPAN_FACTOR {
                    IntMapRepr::Flat(Shared::new(FlatMap::build(entries)))
                } else {
                    IntMapRepr::Sparse(Shared::new(SparseMap::build(entries)))
                }
            }
        };
        Self { repr }
    }

    /// Stored key and value for `key`, or `None`.
    #[must_use]
    pub fn get_key_value(&self, key: K) -> Option<(&K, &V)> {
        let entry = match &self.repr {
            IntMapRepr::Empty => None,
            IntMapRepr::Single(entry) => (entry.0 == key).then_some(&**entry),
            IntMapRepr::Scan(entries) => entries.iter().find(|(candidate, _)| *candidate == key),
            IntMapRepr::Flat(flat) => flat.get_entry(key),
            IntMapRepr::Sparse(sparse) => sparse.get_entry(key),
        };
        entry.map(|(stored, value)| (stored, value))
    }

    /// Value stored for `key`, or `None`.
    ///
    /// A miss is the normal outcome, not an error: it returns `None`
    /// without allocating.
    #[inline]
    #[must_use]
    pub fn get(&self, key: K) -> Option<&V> {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns `true` if the map has an entry for `key`.
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: K) -> bool {
        self.get_key_value(key).is_some()
    }
}

/// Positions of every pair whose key already appeared earlier, ascending.
fn later_duplicate_positions<K: FlatKey, V>(entries: &[(K, V)]) -> Vec<usize> {
    let mut tagged: Vec<(u64, usize)> = entries
        .iter()
        .enumerate()
        .map(|(position, (key, _))| (key.flat_index(), position))
        .collect();
    tagged.sort_by_key(|&(index, _)| index);
    let mut dropped = Vec::new();
    for window in tagged.windows(2) {
        if window[0].0 == window[1].0 {
            dropped.push(window[1].1);
        }
    }
    dropped.sort_unstable();
    dropped
}

/// Source positions of the first duplicated key in key order, or `None`.
fn first_duplicate_positions<K: FlatKey, V>(entries: &[(K, V)]) -> Option<DuplicatePositions> {
    let mut tagged: Vec<(u64, usize)> = entries
        .iter()
        .enumerate()
        .map(|(position, (key, _))| (key.flat_index(), position))
        .collect();
    tagged.sort_by_key(|&(index, _)| index);
    tagged.windows(2).find_map(|window| {
        // The sort is stable, so equal keys keep ascending source positions.
        (window[0].0 == window[1].0).then(|| DuplicatePositions {
            first: window[0].1,
            second: window[1].1,
        })
    })
}

impl<K, V> Clone for FrozenIntMap<K, V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            repr: self.repr.clone(),
        }
    }
}

impl<K, V> Default for FrozenIntMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for FrozenIntMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: FlatKey, V: PartialEq> PartialEq for FrozenIntMap<K, V> {
    /// Key-set equality: the same keys mapped to equal values, regardless
    /// of source order or representation.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(*key) == Some(value))
    }
}

impl<K: FlatKey, V: Eq> Eq for FrozenIntMap<K, V> {}

impl<K: FlatKey, V> FromIterator<(K, V)> for FrozenIntMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(source: I) -> Self {
        Self::from_pairs(source)
    }
}

impl<K: FlatKey, V> From<Vec<(K, V)>> for FrozenIntMap<K, V> {
    fn from(entries: Vec<(K, V)>) -> Self {
        Self::from_pairs(entries)
    }
}

impl<K: FlatKey, V, const N: usize> From<[(K, V); N]> for FrozenIntMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        Self::from_pairs(entries)
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Borrowing iterator over a [`FrozenIntMap`], in first-seen order.
pub struct FrozenIntMapIterator<'a, K, V> {
    entries: std::slice::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for FrozenIntMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for FrozenIntMapIterator<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a FrozenIntMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = FrozenIntMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator over a [`FrozenIntMap`], in first-seen order.
///
/// The backing storage may be shared, so entries are cloned out.
pub struct FrozenIntMapIntoIterator<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for FrozenIntMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for FrozenIntMapIntoIterator<K, V> {}

impl<K: Clone, V: Clone> IntoIterator for FrozenIntMap<K, V> {
    type Item = (K, V);
    type IntoIter = FrozenIntMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        FrozenIntMapIntoIterator {
            entries: self.entries().to_vec().into_iter(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
