//! Immutable set iterated in ascending order.

use std::borrow::Borrow;
use std::fmt;
use std::ops::{Bound, RangeBounds};

use crate::sort::{sort_dedup_by, sort_strict_by};
use crate::{DuplicateKeyError, Shared};

/// Internal representation, chosen once from the deduplicated count.
enum SortedSetRepr<T> {
    Empty,
    Single(Shared<T>),
    /// Two or more elements, sorted ascending, probed by binary search.
    Sorted(Shared<[T]>),
}

impl<T> Clone for SortedSetRepr<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Single(element) => Self::Single(element.clone()),
            Self::Sorted(elements) => Self::Sorted(elements.clone()),
        }
    }
}

/// An immutable set whose elements are kept in ascending order.
///
/// Construction sorts and deduplicates the source; lookups afterwards are
/// binary searches. Cloning is O(1).
///
/// # Examples
///
/// ```rust
/// use permafrost::FrozenSortedSet;
///
/// let set: FrozenSortedSet<i32> = [5, 3, 5, 1, 3, 3].into();
/// assert_eq!(set.len(), 3);
/// let ascending: Vec<i32> = set.iter().copied().collect();
/// assert_eq!(ascending, vec![1, 3, 5]);
/// assert_eq!(set.position_of(&3), Some(1));
/// ```
pub struct FrozenSortedSet<T> {
    repr: SortedSetRepr<T>,
}

impl<T> FrozenSortedSet<T> {
    /// Creates an empty set without allocating.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            repr: SortedSetRepr::Empty,
        }
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns `true` if the set holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.repr, SortedSetRepr::Empty)
    }

    /// The elements as an ascending slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        match &self.repr {
            SortedSetRepr::Empty => &[],
            SortedSetRepr::Single(element) => std::slice::from_ref(element),
            SortedSetRepr::Sorted(elements) => elements,
        }
    }

    /// Smallest element, or `None` when empty.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Largest element, or `None` when empty.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Element at `index` in ascending order, or `None` when out of range.
    #[inline]
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Element at `index` in ascending order.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of range; an invalid index is a caller
    /// bug, not a lookup miss, and must not read like one.
    #[inline]
    #[must_use]
    pub fn at(&self, index: usize) -> &T {
        self.get_index(index).unwrap_or_else(|| {
            panic!(
                "index out of bounds: the len is {} but the index is {}",
                self.len(),
                index
            )
        })
    }

    /// Iterates the elements in ascending order. Each call starts a fresh
    /// pass.
    #[inline]
    pub fn iter(&self) -> FrozenSortedSetIterator<'_, T> {
        FrozenSortedSetIterator {
            elements: self.as_slice().iter(),
        }
    }
}

impl<T: Ord> FrozenSortedSet<T> {
    /// Builds a set from `source`, sorting and deduplicating it. Of equal
    /// elements the first source occurrence survives.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::FrozenSortedSet;
    ///
    /// let set = FrozenSortedSet::from_elements([3, 1, 2, 3]);
    /// assert_eq!(set.as_slice(), &[1, 2, 3]);
    /// ```
    pub fn from_elements<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut elements: Vec<T> = source.into_iter().collect();
        sort_dedup_by(&mut elements, T::cmp);
        Self::from_sorted_unique(elements)
    }

    /// Builds a set from `source`, rejecting duplicated elements.
    ///
    /// # Errors
    ///
    /// [`DuplicateKeyError`] carrying the duplicated element and both
    /// source positions.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::FrozenSortedSet;
    ///
    /// let error = FrozenSortedSet::try_from_elements([4, 7, 4]).unwrap_err();
    /// assert_eq!((error.first_position, error.second_position), (0, 2));
    /// ```
    pub fn try_from_elements<I>(source: I) -> Result<Self, DuplicateKeyError<T>>
    where
        I: IntoIterator<Item = T>,
    {
        let tagged: Vec<(usize, T)> = source.into_iter().enumerate().collect();
        match sort_strict_by(tagged, T::cmp) {
            Ok(elements) => Ok(Self::from_sorted_unique(elements)),
            Err((positions, element)) => Err(DuplicateKeyError {
                key: element,
                first_position: positions.first,
                second_position: positions.second,
            }),
        }
    }

    /// Wraps an already ascending, duplicate-free vector.
    fn from_sorted_unique(mut elements: Vec<T>) -> Self {
        debug_assert!(elements.windows(2).all(|window| window[0] < window[1]));
        let repr = match elements.len() {
            0 => SortedSetRepr::Empty,
            1 => match elements.pop() {
                Some(element) => SortedSetRepr::Single(Shared::new(element)),
                None => SortedSetRepr::Empty,
            },
            _ => SortedSetRepr::Sorted(Shared::from(elements)),
        };
        Self { repr }
    }

    /// Returns `true` if the set contains `element`. O(log n).
    #[inline]
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.position_of(element).is_some()
    }

    /// The stored element equal to `element`, or `None`. O(log n).
    #[must_use]
    pub fn get<Q>(&self, element: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.position_of(element)
            .map(|position| &self.as_slice()[position])
    }

    /// Ascending position of `element`, or `None` when absent. O(log n).
    #[must_use]
    pub fn position_of<Q>(&self, element: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.as_slice()
            .binary_search_by(|candidate| candidate.borrow().cmp(element))
            .ok()
    }

    /// Iterates the elements falling inside `range`, ascending.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::FrozenSortedSet;
    ///
    /// let set = FrozenSortedSet::from_elements([1, 3, 5, 7, 9]);
    /// let middle: Vec<i32> = set.range(3..8).copied().collect();
    /// assert_eq!(middle, vec![3, 5, 7]);
    /// ```
    pub fn range<R>(&self, range: R) -> FrozenSortedSetRangeIterator<'_, T>
    where
        R: RangeBounds<T>,
    {
        FrozenSortedSetRangeIterator {
            elements: bounded_slice(self.as_slice(), &range).iter(),
        }
    }
}

impl<T: Ord + Clone> FrozenSortedSet<T> {
    /// Elements of `self` or `other`, merged in one ascending pass.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let (left, right) = (self.as_slice(), other.as_slice());
        let mut merged = Vec::with_capacity(left.len() + right.len());
        let (mut i, mut j) = (0, 0);
        while i < left.len() && j < right.len() {
            match left[i].cmp(&right[j]) {
                std::cmp::Ordering::Less => {
                    merged.push(left[i].clone());
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    merged.push(right[j].clone());
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    merged.push(left[i].clone());
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&left[i..]);
        merged.extend_from_slice(&right[j..]);
        Self::from_sorted_unique(merged)
    }

    /// Elements present in both sets, in one ascending pass.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let (left, right) = (self.as_slice(), other.as_slice());
        let mut common = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < left.len() && j < right.len() {
            match left[i].cmp(&right[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    common.push(left[i].clone());
                    i += 1;
                    j += 1;
                }
            }
        }
        Self::from_sorted_unique(common)
    }

    /// Elements of `self` absent from `other`, in one ascending pass.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        let (left, right) = (self.as_slice(), other.as_slice());
        let mut rest = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < left.len() {
            if j == right.len() || left[i] < right[j] {
                rest.push(left[i].clone());
                i += 1;
            } else if left[i] == right[j] {
                i += 1;
                j += 1;
            } else {
                j += 1;
            }
        }
        Self::from_sorted_unique(rest)
    }
}

/// Narrows an ascending slice to the sub-slice covered by `range`.
fn bounded_slice<'a, T: Ord, R: RangeBounds<T>>(sorted: &'a [T], range: &R) -> &'a [T] {
    let start = match range.start_bound() {
        Bound::Included(bound) => sorted.partition_point(|element| element < bound),
        Bound::Excluded(bound) => sorted.partition_point(|element| element <= bound),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(bound) => sorted.partition_point(|element| element <= bound),
        Bound::Excluded(bound) => sorted.partition_point(|element| element < bound),
        Bound::Unbounded => sorted.len(),
    };
    &sorted[start..end.max(start)]
}

impl<T> Clone for FrozenSortedSet<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            repr: self.repr.clone(),
        }
    }
}

impl<T> Default for FrozenSortedSet<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for FrozenSortedSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for FrozenSortedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for FrozenSortedSet<T> {}

impl<T: Ord> FromIterator<T> for FrozenSortedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(source: I) -> Self {
        Self::from_elements(source)
    }
}

impl<T: Ord> From<Vec<T>> for FrozenSortedSet<T> {
    fn from(elements: Vec<T>) -> Self {
        Self::from_elements(elements)
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for FrozenSortedSet<T> {
    fn from(elements: [T; N]) -> Self {
        Self::from_elements(elements)
    }
}

impl<T> std::ops::Index<usize> for FrozenSortedSet<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.at(index)
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Borrowing iterator over a [`FrozenSortedSet`], ascending.
pub struct FrozenSortedSetIterator<'a, T> {
    elements: std::slice::Iter<'a, T>,
}

impl<'a, T> Iterator for FrozenSortedSetIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.elements.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.elements.size_hint()
    }
}

impl<T> ExactSizeIterator for FrozenSortedSetIterator<'_, T> {}

impl<'a, T> IntoIterator for &'a FrozenSortedSet<T> {
    type Item = &'a T;
    type IntoIter = FrozenSortedSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`FrozenSortedSet`] range query, ascending.
pub struct FrozenSortedSetRangeIterator<'a, T> {
    elements: std::slice::Iter<'a, T>,
}

impl<'a, T> Iterator for FrozenSortedSetRangeIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.elements.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.elements.size_hint()
    }
}

impl<T> ExactSizeIterator for FrozenSortedSetRangeIterator<'_, T> {}

/// Owning iterator over a [`FrozenSortedSet`], ascending.
///
/// The backing storage may be shared, so elements are cloned out.
pub struct FrozenSortedSetIntoIterator<T> {
    elements: std::vec::IntoIter<T>,
}

impl<T> Iterator for FrozenSortedSetIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.elements.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.elements.size_hint()
    }
}

impl<T> ExactSizeIterator for FrozenSortedSetIntoIterator<T> {}

impl<T: Clone> IntoIterator for FrozenSortedSet<T> {
    type Item = T;
    type IntoIter = FrozenSortedSetIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        FrozenSortedSetIntoIterator {
            elements: self.as_slice().to_vec().into_iter(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
