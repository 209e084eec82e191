//! Immutable sequence with indexed access.

use std::fmt;

use crate::Shared;

/// Internal representation, chosen once from the element count.
enum ListRepr<T> {
    /// No elements, no allocation.
    Empty,
    /// Exactly one element, no array.
    Single(Shared<T>),
    /// Two or more elements in a shared slice.
    Many(Shared<[T]>),
}

impl<T> Clone for ListRepr<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Single(element) => Self::Single(element.clone()),
            Self::Many(elements) => Self::Many(elements.clone()),
        }
    }
}

/// An immutable sequence, built once and read many times.
///
/// The element order is the source order and never changes. Cloning is
/// O(1): clones share the backing storage.
///
/// # Time Complexity
///
/// | Operation     | Complexity |
/// |---------------|------------|
/// | `get` / `at`  | O(1)       |
/// | `first`/`last`| O(1)       |
/// | `position_of` | O(n)       |
/// | `len`         | O(1)       |
///
/// # Examples
///
/// ```rust
/// use permafrost::FrozenList;
///
/// let list: FrozenList<i32> = vec![10, 20, 30].into();
/// assert_eq!(list.len(), 3);
/// assert_eq!(list.first(), Some(&10));
/// assert_eq!(list[2], 30);
/// assert_eq!(list.position_of(&20), Some(1));
/// ```
pub struct FrozenList<T> {
    repr: ListRepr<T>,
}

impl<T> FrozenList<T> {
    /// Creates an empty sequence without allocating.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::FrozenList;
    ///
    /// let list: FrozenList<i32> = FrozenList::new();
    /// assert!(list.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            repr: ListRepr::Empty,
        }
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.repr {
            ListRepr::Empty => 0,
            ListRepr::Single(_) => 1,
            ListRepr::Many(elements) => elements.len(),
        }
    }

    /// Returns `true` if the sequence holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.repr, ListRepr::Empty)
    }

    /// Element at `index`, or `None` when out of range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::FrozenList;
    ///
    /// let list: FrozenList<char> = vec!['a', 'b'].into();
    /// assert_eq!(list.get(1), Some(&'b'));
    /// assert_eq!(list.get(2), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        match &self.repr {
            ListRepr::Empty => None,
            ListRepr::Single(element) => (index == 0).then_some(&**element),
            ListRepr::Many(elements) => elements.get(index),
        }
    }

    /// Element at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of range; an invalid index is a caller
    /// bug, not a lookup miss, and must not read like one.
    #[inline]
    #[must_use]
    pub fn at(&self, index: usize) -> &T {
        self.get(index).unwrap_or_else(|| {
            panic!(
                "index out of bounds: the len is {} but the index is {}",
                self.len(),
                index
            )
        })
    }

    /// First element, or `None` when empty.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Last element, or `None` when empty.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        match &self.repr {
            ListRepr::Empty => None,
            ListRepr::Single(element) => Some(element),
            ListRepr::Many(elements) => elements.last(),
        }
    }

    /// Iterates the elements in source order. Each call starts a fresh
    /// pass.
    #[inline]
    pub fn iter(&self) -> FrozenListIterator<'_, T> {
        FrozenListIterator {
            state: match &self.repr {
                ListRepr::Empty => IterState::Single(None),
                ListRepr::Single(element) => IterState::Single(Some(element)),
                ListRepr::Many(elements) => IterState::Many(elements.iter()),
            },
        }
    }
}

impl<T: PartialEq> FrozenList<T> {
    /// Position of the first element equal to `element`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permafrost::FrozenList;
    ///
    /// let list: FrozenList<i32> = vec![5, 3, 5].into();
    /// assert_eq!(list.position_of(&5), Some(0));
    /// assert_eq!(list.position_of(&9), None);
    /// ```
    #[must_use]
    pub fn position_of(&self, element: &T) -> Option<usize> {
        self.iter().position(|candidate| candidate == element)
    }

    /// Returns `true` if some element equals `element`.
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.position_of(element).is_some()
    }
}

impl<T> Clone for FrozenList<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            repr: self.repr.clone(),
        }
    }
}

impl<T> Default for FrozenList<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for FrozenList<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for FrozenList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for FrozenList<T> {}

impl<T> From<Vec<T>> for FrozenList<T> {
    fn from(mut elements: Vec<T>) -> Self {
        let repr = match elements.len() {
            0 => ListRepr::Empty,
            1 => match elements.pop() {
                Some(element) => ListRepr::Single(Shared::new(element)),
                None => ListRepr::Empty,
            },
            _ => ListRepr::Many(Shared::from(elements)),
        };
        Self { repr }
    }
}

impl<T, const N: usize> From<[T; N]> for FrozenList<T> {
    fn from(elements: [T; N]) -> Self {
        Vec::from(elements).into()
    }
}

impl<T> FromIterator<T> for FrozenList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(source: I) -> Self {
        source.into_iter().collect::<Vec<T>>().into()
    }
}

// =============================================================================
// Iterators
// =============================================================================

enum IterState<'a, T> {
    Single(Option<&'a T>),
    Many(std::slice::Iter<'a, T>),
}

/// Borrowing iterator over a [`FrozenList`], in source order.
pub struct FrozenListIterator<'a, T> {
    state: IterState<'a, T>,
}

impl<'a, T> Iterator for FrozenListIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.state {
            IterState::Single(element) => element.take(),
            IterState::Many(elements) => elements.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.state {
            IterState::Single(element) => usize::from(element.is_some()),
            IterState::Many(elements) => elements.len(),
        };
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for FrozenListIterator<'_, T> {}

impl<'a, T> IntoIterator for &'a FrozenList<T> {
    type Item = &'a T;
    type IntoIter = FrozenListIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator over a [`FrozenList`].
///
/// The backing storage may be shared, so elements are cloned out.
pub struct FrozenListIntoIterator<T> {
    elements: std::vec::IntoIter<T>,
}

impl<T> Iterator for FrozenListIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.elements.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.elements.size_hint()
    }
}

impl<T> ExactSizeIterator for FrozenListIntoIterator<T> {}

impl<T: Clone> IntoIterator for FrozenList<T> {
    type Item = T;
    type IntoIter = FrozenListIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        FrozenListIntoIterator {
            elements: self.iter().cloned().collect::<Vec<T>>().into_iter(),
        }
    }
}

impl<T> std::ops::Index<usize> for FrozenList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.at(index)
    }
}

// =============================================================================
// Tests
// =============================================================================
