//! Immutable hash map with a layered "patch" form for derived snapshots.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use crate::error::DuplicatePositions;
use crate::patched::{PatchedIter, PatchedMap};
use crate::set::{retain_positions, take_duplicate, FrozenSet};
use crate::table::LinkTable;
use crate::{DefaultHashBuilder, DuplicateKeyError, Shared, MINI_LIMIT};

/// Hash representation: entries in first-seen order plus the link index.
pub(crate) struct HashedMap<K, V, S> {
    pub(crate) entries: Box<[(K, V)]>,
    pub(crate) links: LinkTable,
    pub(crate) hasher: S,
}

/// Internal representation, chosen once from the deduplicated count.
pub(crate) enum MapRepr<K, V, S> {
    Empty,
    Single(Shared<(K, V)>),
    /// Two or three entries, probed linearly.
    Scan(Shared<[(K, V)]>),
    Hashed(Shared<HashedMap<K, V, S>>),
    /// Origin ∖ removed ∪ patch, composed without copying the origin.
    Patched(Shared<PatchedMap<K, V, S>>),
}

impl<K, V, S> Clone for MapRepr<K, V, S> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Single(entry) => Self::Single(entry.clone()),
            Self::Scan(entries) => Self::Scan(entries.clone()),
            Self::Hashed(hashed) => Self::Hashed(hashed.clone()),
            Self::Patched(patched) => Self::Patched(patched.clone()),
        }
    }
}

/// An immutable key-value mapping, built once and read many times.
///
/// Enumeration follows the order keys first appeared in the source.
/// Lenient constructors keep the first value for a duplicated key; strict
/// constructors reject with a [`DuplicateKeyError`] naming both source
/// positions. Cloning is O(1).
///
/// A map can also be *patched*: [`FrozenMap::patched`] layers additions,
/// replacements, and removals over an existing map in time proportional to
/// the edit, not the base. Lookups then walk the layers until
/// [`FrozenMap::repack`] materializes the composition.
///
/// # Time Complexity
///
/// | Operation      | Plain           | Patched, `L` layers |
/// |----------------|-----------------|---------------------|
/// | `get`          | O(1) expected   | O(L) expected       |
/// | `contains_key` | O(1) expected   | O(L) expected       |
/// | `len`          | O(1)            | O(1)                |
/// | `patched`      | O(patch + removed) |                  |
/// | `repack`       | O(n)            | O(n·L)              |
///
/// # Examples
///
/// ```rust
/// use permafrost::FrozenMap;
///
/// let map: FrozenMap<&str, i32> = [("one", 1), ("two", 2), ("three", 3)].into();
/// assert_eq!(map.len(), 3);
/// assert_eq!(map.get("two"), Some(&2));
/// assert_eq!(map.get("four"), None);
/// ```
pub struct FrozenMap<K, V, S = DefaultHashBuilder> {
    pub(crate) repr: MapRepr<K, V, S>,
}

impl<K, V, S> FrozenMap<K, V, S> {
    /// Creates an empty map without allocating.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::FrozenMap;
    ///
    /// let map: FrozenMap<String, i32> = FrozenMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            repr: MapRepr::Empty,
        }
    }

    /// Number of entries. O(1) even for patched maps: the composed length
    /// is computed when the layer is built, not per call.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.repr {
            MapRepr::Empty => 0,
            MapRepr::Single(_) => 1,
            MapRepr::Scan(entries) => entries.len(),
            MapRepr::Hashed(hashed) => hashed.entries.len(),
            MapRepr::Patched(patched) => patched.length,
        }
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many patch layers are stacked on this map; `0` for a plain map.
    ///
    /// Lookup cost grows with the level, so callers that patch repeatedly
    /// typically [`repack`](FrozenMap::repack) once this grows past their
    /// tolerance.
    #[inline]
    #[must_use]
    pub fn cascading_level(&self) -> u32 {
        match &self.repr {
            MapRepr::Patched(patched) => patched.level,
            _ => 0,
        }
    }
}

impl<K: Eq + Hash, V, S: BuildHasher> FrozenMap<K, V, S> {
    /// Builds a map from key-value pairs using `hasher`, keeping the first
    /// pair for each key.
    pub fn from_pairs_with_hasher<I>(source: I, hasher: S) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries: Vec<(K, V)> = source.into_iter().collect();
        Self::select(entries, hasher)
    }

    /// Builds a map from key-value pairs using `hasher`, rejecting
    /// duplicated keys.
    ///
    /// # Errors
    ///
    /// [`DuplicateKeyError`] with both source positions of the first
    /// duplicated key.
    pub fn try_from_pairs_with_hasher<I>(
        source: I,
        hasher: S,
    ) -> Result<Self, DuplicateKeyError<K>>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries: Vec<(K, V)> = source.into_iter().collect();
        match Self::first_duplicate(&entries, &hasher) {
            None => Ok(Self::select(entries, hasher)),
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

    /// Value stored for `key`, or `None`.
    ///
    /// A miss is the normal outcome, not an error: it returns `None`
    /// without allocating.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::FrozenMap;
    ///
    /// let map: FrozenMap<String, i32> = [("a".to_string(), 1)].into();
    /// assert_eq!(map.get("a"), Some(&1));
    /// assert_eq!(map.get("b"), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Stored key and value for `key`, or `None`.
    #[must_use]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match &self.repr {
            MapRepr::Empty => None,
            MapRepr::Single(entry) => {
                (entry.0.borrow() == key).then(|| (&entry.0, &entry.1))
            }
            MapRepr::Scan(entries) => entries
                .iter()
                .find(|(candidate, _)| candidate.borrow() == key)
                .map(|(stored, value)| (stored, value)),
            MapRepr::Hashed(hashed) => {
                let hash = hashed.hasher.hash_one(key);
                hashed
                    .links
                    .find(&hashed.entries, hash, |(candidate, _)| {
                        candidate.borrow() == key
                    })
                    .map(|position| {
                        let (stored, value) = &hashed.entries[position];
                        (stored, value)
                    })
            }
            MapRepr::Patched(patched) => patched.get_key_value(key),
        }
    }

    /// Returns `true` if the map has an entry for `key`.
    #[inline]
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).is_some()
    }

    /// Iterates `(key, value)` pairs. Each call starts a fresh pass.
    ///
    /// Plain maps enumerate in first-seen key order. Patched maps
    /// enumerate the adjusted origin entries first (patched values
    /// substituted, removed keys skipped) in origin order, then the
    /// patch-only entries in patch order.
    pub fn iter(&self) -> FrozenMapIterator<'_, K, V, S> {
        FrozenMapIterator {
            state: match &self.repr {
                MapRepr::Empty => MapIterState::Single(None),
                MapRepr::Single(entry) => MapIterState::Single(Some(entry)),
                MapRepr::Scan(entries) => MapIterState::Entries(entries.iter()),
                MapRepr::Hashed(hashed) => MapIterState::Entries(hashed.entries.iter()),
                MapRepr::Patched(patched) => {
                    MapIterState::Patched(Box::new(PatchedIter::over(patched)))
                }
            },
        }
    }

    /// Iterates the keys, in the same order as [`iter`](FrozenMap::iter).
    pub fn keys(&self) -> FrozenMapKeys<'_, K, V, S> {
        FrozenMapKeys { inner: self.iter() }
    }

    /// Iterates the values, in the same order as [`iter`](FrozenMap::iter).
    pub fn values(&self) -> FrozenMapValues<'_, K, V, S> {
        FrozenMapValues { inner: self.iter() }
    }

    /// Layers `patch` and `removed` over this map without copying it.
    ///
    /// The result represents `(self ∖ removed) ∪ patch`: a patch entry
    /// always wins over an origin entry with the same key, and `removed`
    /// suppresses origin keys the patch does not override. Built in
    /// O(|patch| + |removed|); lookups afterwards cost one extra layer
    /// until [`repack`](FrozenMap::repack).
    ///
    /// An empty patch and removal set short-circuit to a plain clone.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::{FrozenMap, FrozenSet};
    ///
    /// let origin: FrozenMap<u32, &str> = [(1, "One"), (2, "Two")].into();
    /// let patched = origin.patched([(2, "Dos")].into(), [1].into());
    ///
    /// assert_eq!(patched.len(), 1);
    /// assert_eq!(patched.get(&1), None);
    /// assert_eq!(patched.get(&2), Some(&"Dos"));
    /// assert_eq!(patched.cascading_level(), 1);
    /// ```
    #[must_use]
    pub fn patched(&self, patch: Self, removed: FrozenSet<K, S>) -> Self {
        if patch.is_empty() && removed.is_empty() {
            return self.clone();
        }
        Self {
            repr: MapRepr::Patched(Shared::new(PatchedMap::compose(
                self.clone(),
                patch,
                removed,
            ))),
        }
    }

    /// Position pair of the first duplicated key, if any.
    fn first_duplicate(entries: &[(K, V)], hasher: &S) -> Option<DuplicatePositions> {
        if entries.len() <= MINI_LIMIT {
            for (second, (key, _)) in entries.iter().enumerate() {
                for (first, (earlier, _)) in entries[..second].iter().enumerate() {
                    if earlier == key {
                        return Some(DuplicatePositions { first, second });
                    }
                }
            }
            None
        } else {
            LinkTable::build_strict(
                entries,
                |(key, _)| hasher.hash_one(key),
                |(left, _), (right, _)| left == right,
            )
            .err()
        }
    }

    /// Chooses the representation for `entries`, deduplicating by key.
    fn select(entries: Vec<(K, V)>, hasher: S) -> Self {
        let repr = match entries.len() {
            0 => MapRepr::Empty,
            1..=MINI_LIMIT => Self::select_mini(dedup_scan_by_key(entries)),
            _ => {
                let (links, dropped) = LinkTable::build_keep_first(
                    &entries,
                    |(key, _)| hasher.hash_one(key),
                    |(left, _), (right, _)| left == right,
                );
                if dropped.is_empty() {
                    MapRepr::Hashed(Shared::new(HashedMap {
                        entries: entries.into_boxed_slice(),
                        links,
                        hasher,
                    }))
                } else {
                    let survivors = retain_positions(entries, &dropped);
                    if survivors.len() <= MINI_LIMIT {
                        Self::select_mini(survivors)
                    } else {
                        // Survivors are unique; the rebuild cannot drop.
                        let (links, _) = LinkTable::build_keep_first(
                            &survivors,
                            |(key, _)| hasher.hash_one(key),
                            |(left, _), (right, _)| left == right,
                        );
                        MapRepr::Hashed(Shared::new(HashedMap {
                            entries: survivors.into_boxed_slice(),
                            links,
                            hasher,
                        }))
                    }
                }
            }
        };
        Self { repr }
    }

    /// Mini representations for at most [`MINI_LIMIT`] unique entries.
    fn select_mini(mut unique: Vec<(K, V)>) -> MapRepr<K, V, S> {
        match unique.len() {
            0 => MapRepr::Empty,
            1 => match unique.pop() {
                Some(entry) => MapRepr::Single(Shared::new(entry)),
                None => MapRepr::Empty,
            },
            _ => MapRepr::Scan(Shared::from(unique)),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone, S: BuildHasher + Default> FrozenMap<K, V, S> {
    /// Materializes a patched map into a plain one, discarding the layers.
    ///
    /// Observationally equal to `self` (same lookups, length, and
    /// enumeration order) but every later lookup pays for one
    /// representation instead of one per layer. On a plain map this is
    /// just a cheap clone.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::FrozenMap;
    ///
    /// let origin: FrozenMap<u32, &str> = [(1, "One"), (2, "Two")].into();
    /// let patched = origin.patched([(2, "Dos")].into(), [1].into());
    /// let repacked = patched.repack();
    ///
    /// assert_eq!(repacked.cascading_level(), 0);
    /// assert_eq!(repacked.get(&2), Some(&"Dos"));
    /// assert_eq!(repacked.len(), patched.len());
    /// ```
    #[must_use]
    pub fn repack(&self) -> Self {
        match &self.repr {
            MapRepr::Patched(_) => {
                let pairs: Vec<(K, V)> = self
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();
                Self::from_pairs_with_hasher(pairs, S::default())
            }
            _ => self.clone(),
        }
    }
}

impl<K: Eq + Hash, V, S: BuildHasher + Default> FrozenMap<K, V, S> {
    /// Builds a map from key-value pairs, keeping the first pair for each
    /// key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::FrozenMap;
    ///
    /// let map = FrozenMap::<_, _>::from_pairs([(1u8, "first"), (1, "second")]);
    /// assert_eq!(map.get(&1), Some(&"first"));
    /// ```
    pub fn from_pairs<I>(source: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_pairs_with_hasher(source, S::default())
    }

    /// Builds a map from key-value pairs, rejecting duplicated keys.
    ///
    /// # Errors
    ///
    /// [`DuplicateKeyError`] carrying the duplicated key and both source
    /// positions.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::FrozenMap;
    ///
    /// let error = FrozenMap::<u32, &str>::try_from_pairs([(10, "a"), (10, "b")])
    ///     .unwrap_err();
    /// assert_eq!(error.first_position, 0);
    /// assert_eq!(error.second_position, 1);
    /// ```
    pub fn try_from_pairs<I>(source: I) -> Result<Self, DuplicateKeyError<K>>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::try_from_pairs_with_hasher(source, S::default())
    }

    /// Builds a map over `items`, keying each by `key_of`. The first item
    /// per key wins.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::FrozenMap;
    ///
    /// let by_length: FrozenMap<usize, &str> =
    ///     FrozenMap::index_by(["a", "bb", "cc"], |item| item.len());
    /// assert_eq!(by_length.get(&2), Some(&"bb"));
    /// ```
    pub fn index_by<I, F>(items: I, mut key_of: F) -> Self
    where
        I: IntoIterator<Item = V>,
        F: FnMut(&V) -> K,
    {
        Self::from_pairs(items.into_iter().map(|item| (key_of(&item), item)))
    }

    /// Builds a map over `items`, keying each by `key_of` and rejecting
    /// duplicated keys.
    ///
    /// # Errors
    ///
    /// [`DuplicateKeyError`] carrying the duplicated key and both source
    /// positions.
    pub fn try_index_by<I, F>(items: I, mut key_of: F) -> Result<Self, DuplicateKeyError<K>>
    where
        I: IntoIterator<Item = V>,
        F: FnMut(&V) -> K,
    {
        Self::try_from_pairs(items.into_iter().map(|item| (key_of(&item), item)))
    }
}

/// Linear keep-first deduplication by key for mini-sized sources.
fn dedup_scan_by_key<K: Eq, V>(entries: Vec<(K, V)>) -> Vec<(K, V)> {
    let mut unique: Vec<(K, V)> = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        if !unique.iter().any(|(seen, _)| *seen == key) {
            unique.push((key, value));
        }
    }
    unique
}

impl<K, V, S> Clone for FrozenMap<K, V, S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            repr: self.repr.clone(),
        }
    }
}

impl<K, V, S> Default for FrozenMap<K, V, S> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug + Eq + Hash, V: fmt::Debug, S: BuildHasher> fmt::Debug
    for FrozenMap<K, V, S>
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Eq + Hash, V: PartialEq, S: BuildHasher> PartialEq for FrozenMap<K, V, S> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: Eq + Hash, V: Eq, S: BuildHasher> Eq for FrozenMap<K, V, S> {}

impl<K: Eq + Hash, V, S: BuildHasher + Default> FromIterator<(K, V)> for FrozenMap<K, V, S> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(source: I) -> Self {
        Self::from_pairs(source)
    }
}

impl<K: Eq + Hash, V, S: BuildHasher + Default> From<Vec<(K, V)>> for FrozenMap<K, V, S> {
    fn from(entries: Vec<(K, V)>) -> Self {
        Self::from_pairs(entries)
    }
}

impl<K: Eq + Hash, V, S: BuildHasher + Default, const N: usize> From<[(K, V); N]>
    for FrozenMap<K, V, S>
{
    fn from(entries: [(K, V); N]) -> Self {
        Self::from_pairs(entries)
    }
}

impl<K, V, S, Q> std::ops::Index<&Q> for FrozenMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    S: BuildHasher,
    Q: Hash + Eq + ?Sized,
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

enum MapIterState<'a, K, V, S> {
    Single(Option<&'a (K, V)>),
    Entries(std::slice::Iter<'a, (K, V)>),
    Patched(Box<PatchedIter<'a, K, V, S>>),
}

/// Borrowing iterator over a [`FrozenMap`].
pub struct FrozenMapIterator<'a, K, V, S> {
    state: MapIterState<'a, K, V, S>,
}

impl<'a, K: Eq + Hash, V, S: BuildHasher> Iterator for FrozenMapIterator<'a, K, V, S> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.state {
            MapIterState::Single(entry) => entry.take().map(|(key, value)| (key, value)),
            MapIterState::Entries(entries) => entries.next().map(|(key, value)| (key, value)),
            MapIterState::Patched(patched) => patched.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.state {
            MapIterState::Single(entry) => {
                let remaining = usize::from(entry.is_some());
                (remaining, Some(remaining))
            }
            MapIterState::Entries(entries) => (entries.len(), Some(entries.len())),
            // Layer composition decides lazily; only finiteness is known.
            MapIterState::Patched(_) => (0, None),
        }
    }
}

impl<'a, K: Eq + Hash, V, S: BuildHasher> IntoIterator for &'a FrozenMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = FrozenMapIterator<'a, K, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator over a [`FrozenMap`].
///
/// The backing storage may be shared, so entries are cloned out.
pub struct FrozenMapIntoIterator<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for FrozenMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for FrozenMapIntoIterator<K, V> {}

impl<K: Eq + Hash + Clone, V: Clone, S: BuildHasher> IntoIterator for FrozenMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = FrozenMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        FrozenMapIntoIterator {
            entries: self
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect::<Vec<(K, V)>>()
                .into_iter(),
        }
    }
}

/// Iterator over the keys of a [`FrozenMap`].
pub struct FrozenMapKeys<'a, K, V, S> {
    inner: FrozenMapIterator<'a, K, V, S>,
}

impl<'a, K: Eq + Hash, V, S: BuildHasher> Iterator for FrozenMapKeys<'a, K, V, S> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Iterator over the values of a [`FrozenMap`].
pub struct FrozenMapValues<'a, K, V, S> {
    inner: FrozenMapIterator<'a, K, V, S>,
}

impl<'a, K: Eq + Hash, V, S: BuildHasher> Iterator for FrozenMapValues<'a, K, V, S> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

// =============================================================================
// Tests
// =============================================================================
