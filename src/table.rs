//! Compact hash-table index with bit-packed chain links.
//!
//! [`LinkTable`] is an index over a backing array of entries that it does
//! not own: the backing array stays in insertion order and the table maps a
//! key hash to an entry position. One `u64` word per slot packs everything
//! the lookup needs:
//!
//! ```text
//! bit 63      BUSY          slot holds an entry
//! bit 62      CONTINUATION  the entry is an overflow, not a home placement
//! bit 61      HAS_NEXT      another slot continues this chain
//! bits 30..60 next slot     position of the continuation slot
//! bits  0..30 entry index   position of the entry in the backing array
//! ```
//!
//! The slot count is `2N + 7`, always strictly greater than the entry
//! count, so overflow placement always finds a free slot.
//!
//! # Build
//!
//! Two passes. The first walks the entries in order and claims each entry's
//! home slot (`hash % slots`) if it is still free, queueing the rest. The
//! second places each queued entry in the first free slot and links it onto
//! its home chain. Because every home placement happens before any overflow
//! placement, a `CONTINUATION` word at a key's home slot proves no entry
//! hashes there, which lets lookups miss in O(1).
//!
//! Duplicate keys are detected while chains are walked during both passes;
//! the outcome (hard error or keep-first) is the caller's choice.

use smallvec::SmallVec;
use static_assertions::const_assert;

use crate::error::DuplicatePositions;

// =============================================================================
// Link word layout
// =============================================================================

const BUSY: u64 = 1 << 63;
const CONTINUATION: u64 = 1 << 62;
const HAS_NEXT: u64 = 1 << 61;

/// Width of the two index fields (entry index and next slot).
const FIELD_BITS: u32 = 30;
const FIELD_MASK: u64 = (1 << FIELD_BITS) - 1;
const NEXT_SHIFT: u32 = FIELD_BITS;

/// Largest backing array a `LinkTable` can index: both the entry index and
/// the slot index of a `2N + 7` table must fit their 30-bit fields.
pub(crate) const MAX_ENTRIES: usize = (1 << (FIELD_BITS - 1)) - 4;

const_assert!(BUSY & (FIELD_MASK | (FIELD_MASK << NEXT_SHIFT)) == 0);
const_assert!(CONTINUATION & (FIELD_MASK | (FIELD_MASK << NEXT_SHIFT)) == 0);
const_assert!(HAS_NEXT & (FIELD_MASK | (FIELD_MASK << NEXT_SHIFT)) == 0);
const_assert!(FIELD_MASK & (FIELD_MASK << NEXT_SHIFT) == 0);
const_assert!(2 * MAX_ENTRIES + 7 <= FIELD_MASK as usize + 1);

#[inline]
const fn is_busy(word: u64) -> bool {
    word & BUSY != 0
}

#[inline]
const fn is_continuation(word: u64) -> bool {
    word & CONTINUATION != 0
}

#[inline]
const fn has_next(word: u64) -> bool {
    word & HAS_NEXT != 0
}

#[inline]
const fn next_slot(word: u64) -> usize {
    ((word >> NEXT_SHIFT) & FIELD_MASK) as usize
}

#[inline]
const fn entry_index(word: u64) -> usize {
    (word & FIELD_MASK) as usize
}

// =============================================================================
// LinkTable
// =============================================================================

/// Bit-packed hash index over an external backing array.
///
/// Scratch state during `build` (the overflow queue and the free-slot
/// cursor) never escapes the constructing call; the finished table is
/// immutable.
#[derive(Debug, Clone)]
pub(crate) struct LinkTable {
    words: Box<[u64]>,
}

impl LinkTable {
    /// Builds an index over `entries`, failing on the first duplicated key
    /// with both source positions (earlier position first).
    pub(crate) fn build_strict<E, H, S>(
        entries: &[E],
        hash_of: H,
        same_key: S,
    ) -> Result<Self, DuplicatePositions>
    where
        H: FnMut(&E) -> u64,
        S: FnMut(&E, &E) -> bool,
    {
        Self::build(entries, hash_of, same_key, true).map(|(table, _)| table)
    }

    /// Builds an index over `entries`, skipping every entry whose key was
    /// already seen. Returns the table together with the positions of the
    /// skipped entries, in ascending order.
    ///
    /// When entries were skipped the table references only the survivors;
    /// callers compact the backing array and rebuild so that positions stay
    /// dense.
    pub(crate) fn build_keep_first<E, H, S>(
        entries: &[E],
        hash_of: H,
        same_key: S,
    ) -> (Self, Vec<usize>)
    where
        H: FnMut(&E) -> u64,
        S: FnMut(&E, &E) -> bool,
    {
        match Self::build(entries, hash_of, same_key, false) {
            Ok(outcome) => outcome,
            // Unreachable: duplicates are dropped, not rejected.
            Err(positions) => unreachable!("keep-first build rejected {positions:?}"),
        }
    }

    fn build<E, H, S>(
        entries: &[E],
        mut hash_of: H,
        mut same_key: S,
        reject_duplicates: bool,
    ) -> Result<(Self, Vec<usize>), DuplicatePositions>
    where
        H: FnMut(&E) -> u64,
        S: FnMut(&E, &E) -> bool,
    {
        assert!(
            entries.len() <= MAX_ENTRIES,
            "hashed representation supports at most {MAX_ENTRIES} entries, got {}",
            entries.len()
        );
        let slot_count = 2 * entries.len() + 7;
        let mut words = vec![0u64; slot_count].into_boxed_slice();
        let mut overflow: SmallVec<[(u32, u32); 8]> = SmallVec::new();
        let mut dropped: Vec<usize> = Vec::new();

        // Pass 1: claim home slots in source order. Collisions wait in the
        // overflow queue so that every home placement wins over every
        // overflow placement.
        for (position, entry) in entries.iter().enumerate() {
            let home = (hash_of(entry) % slot_count as u64) as usize;
            let word = words[home];
            if is_busy(word) {
                if same_key(&entries[entry_index(word)], entry) {
                    if reject_duplicates {
                        return Err(DuplicatePositions {
                            first: entry_index(word),
                            second: position,
                        });
                    }
                    dropped.push(position);
                } else {
                    overflow.push((position as u32, home as u32));
                }
            } else {
                words[home] = BUSY | position as u64;
            }
        }

        // Pass 2: chain each queued entry onto its home chain, taking the
        // first free slot. The cursor only moves forward; slots never free.
        let mut free_cursor = 0usize;
        'queued: for &(position, home) in &overflow {
            let position = position as usize;
            let mut tail = home as usize;
            loop {
                let word = words[tail];
                if same_key(&entries[entry_index(word)], &entries[position]) {
                    if reject_duplicates {
                        return Err(DuplicatePositions {
                            first: entry_index(word),
                            second: position,
                        });
                    }
                    dropped.push(position);
                    continue 'queued;
                }
                if !has_next(word) {
                    break;
                }
                tail = next_slot(word);
            }
            while is_busy(words[free_cursor]) {
                free_cursor += 1;
            }
            words[free_cursor] = BUSY | CONTINUATION | position as u64;
            words[tail] |= HAS_NEXT | ((free_cursor as u64) << NEXT_SHIFT);
        }

        dropped.sort_unstable();
        Ok((Self { words }, dropped))
    }

    /// Finds the backing-array position of the entry matching `hash`.
    ///
    /// `matches` is only called for entries on the hash's home chain. A
    /// continuation word at the home slot proves the key absent without a
    /// single comparison.
    pub(crate) fn find<E, M>(&self, entries: &[E], hash: u64, mut matches: M) -> Option<usize>
    where
        M: FnMut(&E) -> bool,
    {
        let mut slot = (hash % self.words.len() as u64) as usize;
        let mut word = self.words[slot];
        if !is_busy(word) || is_continuation(word) {
            return None;
        }
        loop {
            let index = entry_index(word);
            if matches(&entries[index]) {
                return Some(index);
            }
            if !has_next(word) {
                return None;
            }
            slot = next_slot(word);
            word = self.words[slot];
        }
    }

    /// Number of slots in the table.
    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.words.len()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn identity_hash(key: &u64) -> u64 {
        *key
    }

    fn build_over(keys: &[u64]) -> LinkTable {
        LinkTable::build_strict(keys, identity_hash, |left, right| left == right).unwrap()
    }

    fn find_key(table: &LinkTable, keys: &[u64], key: u64) -> Option<usize> {
        table.find(keys, key, |candidate| *candidate == key)
    }

    #[rstest]
    fn test_word_layout_accessors() {
        let word = BUSY | CONTINUATION | HAS_NEXT | (5 << NEXT_SHIFT) | 9;
        assert!(is_busy(word));
        assert!(is_continuation(word));
        assert!(has_next(word));
        assert_eq!(next_slot(word), 5);
        assert_eq!(entry_index(word), 9);
        assert!(!is_busy(0));
    }

    #[rstest]
    fn test_slot_count_exceeds_entry_count() {
        let keys: Vec<u64> = (0..13).collect();
        let table = build_over(&keys);
        assert_eq!(table.slot_count(), 2 * 13 + 7);
    }

    #[rstest]
    fn test_every_key_found_and_absent_keys_missed() {
        let keys: Vec<u64> = (0..100).map(|index| index * 37 + 5).collect();
        let table = build_over(&keys);
        for (position, &key) in keys.iter().enumerate() {
            assert_eq!(find_key(&table, &keys, key), Some(position));
        }
        for absent in [0, 1, 4, 6, 10_000] {
            assert_eq!(find_key(&table, &keys, absent), None);
        }
    }

    #[rstest]
    fn test_all_keys_colliding_at_one_home_slot() {
        // Hashes are all zero, so every key chains from slot 0.
        let keys: Vec<u64> = (100..140).collect();
        let table =
            LinkTable::build_strict(&keys, |_| 0, |left, right| left == right).unwrap();
        for (position, &key) in keys.iter().enumerate() {
            let found = table.find(&keys, 0, |candidate| *candidate == key);
            assert_eq!(found, Some(position));
        }
        assert_eq!(table.find(&keys, 0, |candidate| *candidate == 999), None);
    }

    #[rstest]
    fn test_strict_duplicate_reports_both_positions() {
        let keys = [7u64, 8, 9, 7, 10];
        let error = LinkTable::build_strict(&keys, identity_hash, |left, right| left == right)
            .unwrap_err();
        assert_eq!(error.first, 0);
        assert_eq!(error.second, 3);
    }

    #[rstest]
    fn test_strict_duplicate_detected_among_overflow_entries() {
        // Both duplicates collide away from a free home: force one shared
        // chain with a constant hash so the pair only meets in pass 2.
        let keys = [1u64, 2, 3, 2, 4];
        let error =
            LinkTable::build_strict(&keys, |_| 0, |left, right| left == right).unwrap_err();
        assert_eq!(error.first, 1);
        assert_eq!(error.second, 3);
    }

    #[rstest]
    fn test_keep_first_drops_later_occurrences() {
        let keys = [5u64, 3, 5, 1, 3, 3];
        let (table, dropped) =
            LinkTable::build_keep_first(&keys, identity_hash, |left, right| left == right);
        assert_eq!(dropped, vec![2, 4, 5]);
        assert_eq!(find_key(&table, &keys, 5), Some(0));
        assert_eq!(find_key(&table, &keys, 3), Some(1));
        assert_eq!(find_key(&table, &keys, 1), Some(3));
    }

    proptest! {
        #[test]
        fn prop_inserted_found_absent_missed(
            keys in prop::collection::hash_set(any::<u64>(), 0..300),
            probes in prop::collection::vec(any::<u64>(), 0..50),
            collide in any::<bool>()
        ) {
            let keys: Vec<u64> = keys.into_iter().collect();
            // Optionally degrade every hash to a handful of buckets to
            // exercise long chains.
            let hash = move |key: &u64| if collide { *key % 3 } else { *key };
            let table =
                LinkTable::build_strict(&keys, hash, |left, right| left == right).unwrap();
            for (position, &key) in keys.iter().enumerate() {
                let found = table.find(&keys, hash(&key), |candidate| *candidate == key);
                prop_assert_eq!(found, Some(position));
            }
            for probe in probes {
                if !keys.contains(&probe) {
                    let found = table.find(&keys, hash(&probe), |candidate| *candidate == probe);
                    prop_assert_eq!(found, None);
                }
            }
        }
    }
}
