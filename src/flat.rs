//! Direct-addressed interval storage for dense unsigned-integer keys.
//!
//! [`FlatMap`] spans the closed key interval `[min, max]` with a presence
//! bitmap and a slot table mapping each in-interval offset to a position in
//! the insertion-ordered backing array. Lookup is a subtraction, a bit test
//! and one array read: no hashing, no chains, O(1) always. Keys outside the
//! interval miss before touching any array.
//!
//! The representation only pays off when the interval is not much wider
//! than the entry count; the selector in [`crate::FrozenIntMap`] enforces
//! that and falls back to a sorted array otherwise.

/// An unsigned-integer key addressable by its position on the number line.
///
/// Implemented for the unsigned primitive integers. The index a key maps to
/// must be unique per key value; all implementations here are the identity
/// widened to `u64`.
///
/// # Examples
///
/// ```rust
/// use permafrost::FlatKey;
///
/// assert_eq!(42u8.flat_index(), 42u64);
/// assert_eq!(42usize.flat_index(), 42u64);
/// ```
pub trait FlatKey: Copy + Eq {
    /// Position of this key on the unsigned number line.
    fn flat_index(self) -> u64;
}

macro_rules! impl_flat_key {
    ($($unsigned:ty),*) => {
        $(
            impl FlatKey for $unsigned {
                #[inline]
                fn flat_index(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

impl_flat_key!(u8, u16, u32, u64, usize);

const WORD_BITS: usize = u64::BITS as usize;

/// Dense interval mapping: bitmap + slot table over `[min, max]`, entries
/// kept in insertion order.
#[derive(Debug, Clone)]
pub(crate) struct FlatMap<K, V> {
    min_index: u64,
    bitmap: Box<[u64]>,
    slots: Box<[u32]>,
    entries: Box<[(K, V)]>,
}

impl<K: FlatKey, V> FlatMap<K, V> {
    /// Builds the interval table over `entries`.
    ///
    /// The entries must be non-empty and duplicate-free: the façade
    /// constructors deduplicate (or reject) before choosing this
    /// representation.
    pub(crate) fn build(entries: Vec<(K, V)>) -> Self {
        debug_assert!(!entries.is_empty());
        let mut min_index = u64::MAX;
        let mut max_index = 0u64;
        for (key, _) in &entries {
            let index = key.flat_index();
            min_index = min_index.min(index);
            max_index = max_index.max(index);
        }
        let span = usize::try_from(max_index - min_index + 1)
            .expect("key interval exceeds the address space");

        let mut bitmap = vec![0u64; span.div_ceil(WORD_BITS)].into_boxed_slice();
        let mut slots = vec![0u32; span].into_boxed_slice();
        for (position, (key, _)) in entries.iter().enumerate() {
            let offset = (key.flat_index() - min_index) as usize;
            debug_assert!(
                bitmap[offset / WORD_BITS] & (1 << (offset % WORD_BITS)) == 0,
                "duplicate key reached the flat builder"
            );
            bitmap[offset / WORD_BITS] |= 1 << (offset % WORD_BITS);
            slots[offset] = position as u32;
        }

        Self {
            min_index,
            bitmap,
            slots,
            entries: entries.into_boxed_slice(),
        }
    }

    /// Looks up the entry for `key`, in O(1).
    #[inline]
    pub(crate) fn get_entry(&self, key: K) -> Option<&(K, V)> {
        let offset = key.flat_index().checked_sub(self.min_index)?;
        if offset >= self.slots.len() as u64 {
            return None;
        }
        let offset = offset as usize;
        if self.bitmap[offset / WORD_BITS] & (1 << (offset % WORD_BITS)) == 0 {
            return None;
        }
        Some(&self.entries[self.slots[offset] as usize])
    }

    /// Smallest key index in the interval.
    pub(crate) const fn min_index(&self) -> u64 {
        self.min_index
    }

    /// Largest key index in the interval.
    pub(crate) fn max_index(&self) -> u64 {
        self.min_index + self.slots.len() as u64 - 1
    }

}

impl<K, V> FlatMap<K, V> {
    /// Backing entries in insertion order.
    pub(crate) fn entries(&self) -> &[(K, V)] {
        &self.entries
    }
}

// =============================================================================
// Tests
// =============================================================================
