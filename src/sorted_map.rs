//! Immutable map iterated in ascending key order.

use std::borrow::Borrow;
use std::fmt;
use std::ops::{Bound, RangeBounds};

use crate::sort::{sort_dedup_by, sort_strict_by};
use crate::{DuplicateKeyError, Shared};

/// Internal representation, chosen once from the deduplicated count.
enum SortedMapRepr<K, V> {
    Empty,
    Single(Shared<(K, V)>),
    /// Two or more entries, sorted ascending by key.
    Sorted(Shared<[(K, V)]>),
}

impl<K, V> Clone for SortedMapRepr<K, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Single(entry) => Self::Single(entry.clone()),
            Self::Sorted(entries) => Self::Sorted(entries.clone()),
        }
    }
}

/// An immutable key-value mapping kept in ascending key order.
///
/// Construction sorts by key and deduplicates (the first source pair per
/// key survives); lookups afterwards are binary searches. Cloning is O(1).
///
/// # Examples
///
/// ```rust
/// use permafrost::FrozenSortedMap;
///
/// let map: FrozenSortedMap<u32, &str> = [(3, "c"), (1, "a"), (2, "b")].into();
/// assert_eq!(map.get(&2), Some(&"b"));
/// let keys: Vec<u32> = map.keys().copied().collect();
/// assert_eq!(keys, vec![1, 2, 3]);
/// ```
pub struct FrozenSortedMap<K, V> {
    repr: SortedMapRepr<K, V>,
}

impl<K, V> FrozenSortedMap<K, V> {
    /// Creates an empty map without allocating.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            repr: SortedMapRepr::Empty,
        }
    }

    /// Number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.repr, SortedMapRepr::Empty)
    }

    /// The entries as a slice ascending by key.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[(K, V)] {
        match &self.repr {
            SortedMapRepr::Empty => &[],
            SortedMapRepr::Single(entry) => std::slice::from_ref(entry),
            SortedMapRepr::Sorted(entries) => entries,
        }
    }

    /// Entry with the smallest key, or `None` when empty.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<(&K, &V)> {
        self.as_slice().first().map(|(key, value)| (key, value))
    }

    /// Entry with the largest key, or `None` when empty.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<(&K, &V)> {
        self.as_slice().last().map(|(key, value)| (key, value))
    }

    /// Entry at `index` in ascending key order, or `None` when out of
    /// range.
    #[inline]
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.as_slice().get(index).map(|(key, value)| (key, value))
    }

    /// Entry at `index` in ascending key order.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of range; an invalid index is a caller
    /// bug, not a lookup miss, and must not read like one.
    #[inline]
    #[must_use]
    pub fn at(&self, index: usize) -> (&K, &V) {
        self.get_index(index).unwrap_or_else(|| {
            panic!(
                "index out of bounds: the len is {} but the index is {}",
                self.len(),
                index
            )
        })
    }

    /// Iterates `(key, value)` pairs ascending by key. Each call starts a
    /// fresh pass.
    #[inline]
    pub fn iter(&self) -> FrozenSortedMapIterator<'_, K, V> {
        FrozenSortedMapIterator {
            entries: self.as_slice().iter(),
        }
    }

    /// Iterates the keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.as_slice().iter().map(|(key, _)| key)
    }

    /// Iterates the values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.as_slice().iter().map(|(_, value)| value)
    }
}

impl<K: Ord, V> FrozenSortedMap<K, V> {
    /// Builds a map from key-value pairs, sorting by key and keeping the
    /// first pair for a duplicated key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::FrozenSortedMap;
    ///
    /// let map = FrozenSortedMap::from_pairs([(2, "two"), (1, "one"), (2, "dos")]);
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.get(&2), Some(&"two"));
    /// ```
    pub fn from_pairs<I>(source: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut entries: Vec<(K, V)> = source.into_iter().collect();
        sort_dedup_by(&mut entries, |left, right| left.0.cmp(&right.0));
        Self::from_sorted_unique(entries)
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
        let tagged: Vec<(usize, (K, V))> = source.into_iter().enumerate().collect();
        match sort_strict_by(tagged, |left, right| left.0.cmp(&right.0)) {
            Ok(entries) => Ok(Self::from_sorted_unique(entries)),
            Err((positions, (key, _))) => Err(DuplicateKeyError {
                key,
                first_position: positions.first,
                second_position: positions.second,
            }),
        }
    }

    /// Wraps entries already ascending by key with no duplicates.
    fn from_sorted_unique(mut entries: Vec<(K, V)>) -> Self {
        debug_assert!(entries.windows(2).all(|window| window[0].0 < window[1].0));
        let repr = match entries.len() {
            0 => SortedMapRepr::Empty,
            1 => match entries.pop() {
                Some(entry) => SortedMapRepr::Single(Shared::new(entry)),
                None => SortedMapRepr::Empty,
            },
            _ => SortedMapRepr::Sorted(Shared::from(entries)),
        };
        Self { repr }
    }

    /// Value stored for `key`, or `None`. O(log n).
    ///
    /// A miss is the normal outcome, not an error: it returns `None`
    /// without allocating.
    #[inline]
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Stored key and value for `key`, or `None`. O(log n).
    #[must_use]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.position_of_key(key).map(|position| {
            let (stored, value) = &self.as_slice()[position];
            (stored, value)
        })
    }

    /// Returns `true` if the map has an entry for `key`. O(log n).
    #[inline]
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.position_of_key(key).is_some()
    }

    /// Ascending position of `key`, or `None` when absent. O(log n).
    #[must_use]
    pub fn position_of_key<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.as_slice()
            .binary_search_by(|(candidate, _)| candidate.borrow().cmp(key))
            .ok()
    }

    /// Iterates the entries whose keys fall inside `range`, ascending.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::FrozenSortedMap;
    ///
    /// let map = FrozenSortedMap::from_pairs([(1, 'a'), (5, 'b'), (9, 'c')]);
    /// let middle: Vec<char> = map.range(2..=5).map(|(_, value)| *value).collect();
    /// assert_eq!(middle, vec!['b']);
    /// ```
    pub fn range<R>(&self, range: R) -> FrozenSortedMapRangeIterator<'_, K, V>
    where
        R: RangeBounds<K>,
    {
        let entries = self.as_slice();
        let start = match range.start_bound() {
            Bound::Included(bound) => entries.partition_point(|(key, _)| key < bound),
            Bound::Excluded(bound) => entries.partition_point(|(key, _)| key <= bound),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(bound) => entries.partition_point(|(key, _)| key <= bound),
            Bound::Excluded(bound) => entries.partition_point(|(key, _)| key < bound),
            Bound::Unbounded => entries.len(),
        };
        FrozenSortedMapRangeIterator {
            entries: entries[start..end.max(start)].iter(),
        }
    }
}

impl<K, V> Clone for FrozenSortedMap<K, V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            repr: self.repr.clone(),
        }
    }
}

impl<K, V> Default for FrozenSortedMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for FrozenSortedMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for FrozenSortedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<K: Eq, V: Eq> Eq for FrozenSortedMap<K, V> {}

impl<K: Ord, V> FromIterator<(K, V)> for FrozenSortedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(source: I) -> Self {
        Self::from_pairs(source)
    }
}

impl<K: Ord, V> From<Vec<(K, V)>> for FrozenSortedMap<K, V> {
    fn from(entries: Vec<(K, V)>) -> Self {
        Self::from_pairs(entries)
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for FrozenSortedMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        Self::from_pairs(entries)
    }
}

impl<K, V, Q> std::ops::Index<&Q> for FrozenSortedMap<K, V>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics when `key` is absent.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Borrowing iterator over a [`FrozenSortedMap`], ascending by key.
pub struct FrozenSortedMapIterator<'a, K, V> {
    entries: std::slice::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for FrozenSortedMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for FrozenSortedMapIterator<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a FrozenSortedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = FrozenSortedMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`FrozenSortedMap`] range query, ascending by key.
pub struct FrozenSortedMapRangeIterator<'a, K, V> {
    entries: std::slice::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for FrozenSortedMapRangeIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for FrozenSortedMapRangeIterator<'_, K, V> {}

/// Owning iterator over a [`FrozenSortedMap`], ascending by key.
///
/// The backing storage may be shared, so entries are cloned out.
pub struct FrozenSortedMapIntoIterator<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for FrozenSortedMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for FrozenSortedMapIntoIterator<K, V> {}

impl<K: Clone, V: Clone> IntoIterator for FrozenSortedMap<K, V> {
    type Item = (K, V);
    type IntoIter = FrozenSortedMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        FrozenSortedMapIntoIterator {
            entries: self.as_slice().to_vec().into_iter(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_sorted_by_key_with_first_wins_dedup() {
        let map = FrozenSortedMap::from_pairs([(5, "five"), (1, "one"), (5, "cinq"), (3, "three")]);
        assert_eq!(map.len(), 3);
        let keys: Vec<i32> = map.keys().copied().collect();
        assert_eq!(keys, vec![1, 3, 5]);
        assert_eq!(map.get(&5), Some(&"five"));
    }

    #[rstest]
    fn test_strict_rejects_with_source_positions() {
        let error =
            FrozenSortedMap::try_from_pairs([(1, 'a'), (7, 'b'), (3, 'c'), (7, 'd')]).unwrap_err();
        assert_eq!(error.key, 7);
        assert_eq!(error.first_position, 1);
        assert_eq!(error.second_position, 3);
    }

    #[rstest]
    fn test_indexed_access_follows_key_order() {
        let map = FrozenSortedMap::from_pairs([(30, "c"), (10, "a"), (20, "b")]);
        assert_eq!(map.at(0), (&10, &"a"));
        assert_eq!(map.at(2), (&30, &"c"));
        assert_eq!(map.first(), Some((&10, &"a")));
        assert_eq!(map.last(), Some((&30, &"c")));
        assert_eq!(map.position_of_key(&20), Some(1));
        assert_eq!(map.position_of_key(&25), None);
    }

    #[rstest]
    #[should_panic(expected = "index out of bounds: the len is 1 but the index is 1")]
    fn test_at_panics_out_of_range() {
        let map = FrozenSortedMap::from_pairs([(1, "one")]);
        let _ = map.at(1);
    }
}
