//! Immutable hash set preserving first-seen order.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use crate::error::DuplicatePositions;
use crate::table::LinkTable;
use crate::{DefaultHashBuilder, DuplicateKeyError, Shared, MINI_LIMIT};

/// Hash representation: elements in first-seen order plus the link index.
struct HashedSet<T, S> {
    elements: Box<[T]>,
    links: LinkTable,
    hasher: S,
}

/// Internal representation, chosen once from the deduplicated count.
enum SetRepr<T, S> {
    Empty,
    Single(Shared<T>),
    /// Two or three elements, probed linearly.
    Scan(Shared<[T]>),
    Hashed(Shared<HashedSet<T, S>>),
}

impl<T, S> Clone for SetRepr<T, S> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Single(element) => Self::Single(element.clone()),
            Self::Scan(elements) => Self::Scan(elements.clone()),
            Self::Hashed(hashed) => Self::Hashed(hashed.clone()),
        }
    }
}

/// An immutable set that remembers the order elements first appeared in.
///
/// Built once from a finite source; duplicated elements are dropped (the
/// first occurrence survives) by the lenient constructors and rejected by
/// [`FrozenSet::try_from_elements`]. Lookups are O(1) expected through a
/// compact hash table for four or more elements, and a plain scan below
/// that. Cloning is O(1).
///
/// # Examples
///
/// ```rust
/// use permafrost::FrozenSet;
///
/// let set: FrozenSet<i32> = [5, 3, 5, 1, 3, 3].into();
/// assert_eq!(set.len(), 3);
/// assert!(set.contains(&3));
/// let in_first_seen_order: Vec<i32> = set.iter().copied().collect();
/// assert_eq!(in_first_seen_order, vec![5, 3, 1]);
/// ```
pub struct FrozenSet<T, S = DefaultHashBuilder> {
    repr: SetRepr<T, S>,
}

impl<T, S> FrozenSet<T, S> {
    /// Creates an empty set without allocating.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::FrozenSet;
    ///
    /// let set: FrozenSet<i32> = FrozenSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            repr: SetRepr::Empty,
        }
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.repr {
            SetRepr::Empty => 0,
            SetRepr::Single(_) => 1,
            SetRepr::Scan(elements) => elements.len(),
            SetRepr::Hashed(hashed) => hashed.elements.len(),
        }
    }

    /// Returns `true` if the set holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.repr, SetRepr::Empty)
    }

    /// Iterates the elements in first-seen order. Each call starts a fresh
    /// pass.
    #[inline]
    pub fn iter(&self) -> FrozenSetIterator<'_, T> {
        FrozenSetIterator {
            state: match &self.repr {
                SetRepr::Empty => SetIterState::Single(None),
                SetRepr::Single(element) => SetIterState::Single(Some(element)),
                SetRepr::Scan(elements) => SetIterState::Many(elements.iter()),
                SetRepr::Hashed(hashed) => SetIterState::Many(hashed.elements.iter()),
            },
        }
    }
}

impl<T: Eq + Hash, S: BuildHasher> FrozenSet<T, S> {
    /// Builds a set from `source` using `hasher`, keeping the first
    /// occurrence of each element.
    pub fn from_elements_with_hasher<I>(source: I, hasher: S) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let elements: Vec<T> = source.into_iter().collect();
        Self::select(elements, hasher)
    }

    /// Builds a set from `source` using `hasher`, rejecting duplicates.
    ///
    /// # Errors
    ///
    /// [`DuplicateKeyError`] with the positions of the first duplicated
    /// pair in the source.
    pub fn try_from_elements_with_hasher<I>(
        source: I,
        hasher: S,
    ) -> Result<Self, DuplicateKeyError<T>>
    where
        I: IntoIterator<Item = T>,
    {
        let elements: Vec<T> = source.into_iter().collect();
        match Self::first_duplicate(&elements, &hasher) {
            None => Ok(Self::select(elements, hasher)),
            Some(positions) => Err(take_duplicate(elements, positions)),
        }
    }

    /// Returns `true` if the set contains `element`.
    #[inline]
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(element).is_some()
    }

    /// Returns the stored element equal to `element`.
    ///
    /// A miss is the normal outcome, not an error: it returns `None`
    /// without allocating.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::FrozenSet;
    ///
    /// let set: FrozenSet<String> = ["hot".to_string(), "cold".to_string()].into();
    /// assert_eq!(set.get("cold"), Some(&"cold".to_string()));
    /// assert_eq!(set.get("warm"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, element: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match &self.repr {
            SetRepr::Empty => None,
            SetRepr::Single(candidate) => {
                ((**candidate).borrow() == element).then_some(&**candidate)
            }
            SetRepr::Scan(elements) => elements
                .iter()
                .find(|candidate| (*candidate).borrow() == element),
            SetRepr::Hashed(hashed) => {
                let hash = hashed.hasher.hash_one(element);
                hashed
                    .links
                    .find(&hashed.elements, hash, |candidate| {
                        candidate.borrow() == element
                    })
                    .map(|position| &hashed.elements[position])
            }
        }
    }

    /// Returns `true` if every element of `self` is in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|element| other.contains(element))
    }

    /// Returns `true` if `self` and `other` share no element.
    #[must_use]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        !small.iter().any(|element| large.contains(element))
    }

    /// Chooses the representation for deduplicated-or-not `elements`.
    fn select(elements: Vec<T>, hasher: S) -> Self {
        let repr = match elements.len() {
            0 => SetRepr::Empty,
            1..=MINI_LIMIT => Self::select_mini(dedup_scan(elements)),
            _ => {
                let (links, dropped) = LinkTable::build_keep_first(
                    &elements,
                    |element| hasher.hash_one(element),
                    |left, right| left == right,
                );
                if dropped.is_empty() {
                    SetRepr::Hashed(Shared::new(HashedSet {
                        elements: elements.into_boxed_slice(),
                        links,
                        hasher,
                    }))
                } else {
                    let survivors = retain_positions(elements, &dropped);
                    if survivors.len() <= MINI_LIMIT {
                        Self::select_mini(survivors)
                    } else {
                        // Survivors are unique; the rebuild cannot drop.
                        let (links, _) = LinkTable::build_keep_first(
                            &survivors,
                            |element| hasher.hash_one(element),
                            |left, right| left == right,
                        );
                        SetRepr::Hashed(Shared::new(HashedSet {
                            elements: survivors.into_boxed_slice(),
                            links,
                            hasher,
                        }))
                    }
                }
            }
        };
        Self { repr }
    }

    /// Mini representations for at most [`MINI_LIMIT`] unique elements.
    fn select_mini(mut unique: Vec<T>) -> SetRepr<T, S> {
        match unique.len() {
            0 => SetRepr::Empty,
            1 => match unique.pop() {
                Some(element) => SetRepr::Single(Shared::new(element)),
                None => SetRepr::Empty,
            },
            _ => SetRepr::Scan(Shared::from(unique)),
        }
    }

    /// Position pair of the first duplicate in `elements`, if any.
    fn first_duplicate(elements: &[T], hasher: &S) -> Option<DuplicatePositions> {
        if elements.len() <= MINI_LIMIT {
            for (second, element) in elements.iter().enumerate() {
                for (first, earlier) in elements[..second].iter().enumerate() {
                    if earlier == element {
                        return Some(DuplicatePositions { first, second });
                    }
                }
            }
            None
        } else {
            LinkTable::build_strict(
                elements,
                |element| hasher.hash_one(element),
                |left, right| left == right,
            )
            .err()
        }
    }
}

impl<T: Eq + Hash + Clone, S: BuildHasher + Default> FrozenSet<T, S> {
    /// Elements of `self` and `other`; `self`'s instances win ties.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.iter().chain(other.iter()).cloned().collect()
    }

    /// Elements present in both sets, in `self`'s order.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.iter()
            .filter(|element| other.contains(*element))
            .cloned()
            .collect()
    }

    /// Elements of `self` absent from `other`, in `self`'s order.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.iter()
            .filter(|element| !other.contains(*element))
            .cloned()
            .collect()
    }
}

impl<T: Eq + Hash, S: BuildHasher + Default> FrozenSet<T, S> {
    /// Builds a set keeping the first occurrence of each element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::FrozenSet;
    ///
    /// let set = FrozenSet::<_>::from_elements(["a", "b", "a"]);
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn from_elements<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_elements_with_hasher(source, S::default())
    }

    /// Builds a set, rejecting duplicated elements.
    ///
    /// # Errors
    ///
    /// [`DuplicateKeyError`] carrying the duplicated element and both
    /// source positions.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::FrozenSet;
    ///
    /// let error = FrozenSet::<i32>::try_from_elements([1, 2, 1]).unwrap_err();
    /// assert_eq!((error.first_position, error.second_position), (0, 2));
    /// ```
    pub fn try_from_elements<I>(source: I) -> Result<Self, DuplicateKeyError<T>>
    where
        I: IntoIterator<Item = T>,
    {
        Self::try_from_elements_with_hasher(source, S::default())
    }
}

/// Linear keep-first deduplication for mini-sized sources.
fn dedup_scan<T: Eq>(elements: Vec<T>) -> Vec<T> {
    let mut unique: Vec<T> = Vec::with_capacity(elements.len());
    for element in elements {
        if !unique.contains(&element) {
            unique.push(element);
        }
    }
    unique
}

/// Drops the (ascending) `dropped` positions from `elements`.
pub(crate) fn retain_positions<T>(elements: Vec<T>, dropped: &[usize]) -> Vec<T> {
    let mut next_dropped = dropped.iter().copied().peekable();
    elements
        .into_iter()
        .enumerate()
        .filter_map(|(position, element)| {
            if next_dropped.peek() == Some(&position) {
                next_dropped.next();
                None
            } else {
                Some(element)
            }
        })
        .collect()
}

/// Moves the duplicated element out of `elements` to enrich the error.
pub(crate) fn take_duplicate<T>(
    mut elements: Vec<T>,
    positions: DuplicatePositions,
) -> DuplicateKeyError<T> {
    DuplicateKeyError {
        key: elements.swap_remove(positions.second),
        first_position: positions.first,
        second_position: positions.second,
    }
}

impl<T, S> Clone for FrozenSet<T, S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            repr: self.repr.clone(),
        }
    }
}

impl<T, S> Default for FrozenSet<T, S> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, S> fmt::Debug for FrozenSet<T, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Eq + Hash, S: BuildHasher> PartialEq for FrozenSet<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|element| other.contains(element))
    }
}

impl<T: Eq + Hash, S: BuildHasher> Eq for FrozenSet<T, S> {}

impl<T: Eq + Hash, S: BuildHasher + Default> FromIterator<T> for FrozenSet<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(source: I) -> Self {
        Self::from_elements(source)
    }
}

impl<T: Eq + Hash, S: BuildHasher + Default> From<Vec<T>> for FrozenSet<T, S> {
    fn from(elements: Vec<T>) -> Self {
        Self::from_elements(elements)
    }
}

impl<T: Eq + Hash, S: BuildHasher + Default, const N: usize> From<[T; N]> for FrozenSet<T, S> {
    fn from(elements: [T; N]) -> Self {
        Self::from_elements(elements)
    }
}

// =============================================================================
// Iterators
// =============================================================================

enum SetIterState<'a, T> {
    Single(Option<&'a T>),
    Many(std::slice::Iter<'a, T>),
}

/// Borrowing iterator over a [`FrozenSet`], in first-seen order.
pub struct FrozenSetIterator<'a, T> {
    state: SetIterState<'a, T>,
}

impl<'a, T> Iterator for FrozenSetIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.state {
            SetIterState::Single(element) => element.take(),
            SetIterState::Many(elements) => elements.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.state {
            SetIterState::Single(element) => usize::from(element.is_some()),
            SetIterState::Many(elements) => elements.len(),
        };
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for FrozenSetIterator<'_, T> {}

impl<'a, T, S> IntoIterator for &'a FrozenSet<T, S> {
    type Item = &'a T;
    type IntoIter = FrozenSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator over a [`FrozenSet`].
///
/// The backing storage may be shared, so elements are cloned out.
pub struct FrozenSetIntoIterator<T> {
    elements: std::vec::IntoIter<T>,
}

impl<T> Iterator for FrozenSetIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.elements.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.elements.size_hint()
    }
}

impl<T> ExactSizeIterator for FrozenSetIntoIterator<T> {}

impl<T: Clone, S> IntoIterator for FrozenSet<T, S> {
    type Item = T;
    type IntoIter = FrozenSetIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        FrozenSetIntoIterator {
            elements: self.iter().cloned().collect::<Vec<T>>().into_iter(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
