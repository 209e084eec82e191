//! Layered map composition: origin ∖ removed ∪ patch.
//!
//! A [`PatchedMap`] is how a caller says "this map with a few keys
//! changed" without paying for a copy of the base: construction touches
//! only the patch and the removal set. The price is paid on reads — each
//! stacked layer adds one lookup — which is why the composition tracks a
//! cascading level and offers `repack` to flatten once the caller decides
//! the stack is deep enough.

use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};

use crate::map::{FrozenMap, FrozenMapIterator};
use crate::set::FrozenSet;

/// One composition layer over an origin map.
///
/// A patch entry always wins over an origin entry with the same key;
/// `removed` suppresses origin keys the patch does not override. The
/// composed length and level are fixed at construction.
pub(crate) struct PatchedMap<K, V, S> {
    pub(crate) origin: FrozenMap<K, V, S>,
    pub(crate) patch: FrozenMap<K, V, S>,
    pub(crate) removed: FrozenSet<K, S>,
    pub(crate) length: usize,
    pub(crate) level: u32,
}

impl<K: Eq + Hash, V, S: BuildHasher> PatchedMap<K, V, S> {
    /// Composes the layer, computing the length and cascading level once.
    ///
    /// Runs in O(|patch| + |removed|) origin lookups; the origin itself is
    /// never enumerated.
    pub(crate) fn compose(
        origin: FrozenMap<K, V, S>,
        patch: FrozenMap<K, V, S>,
        removed: FrozenSet<K, S>,
    ) -> Self {
        let mut length = origin.len();
        for (key, _) in patch.iter() {
            if !origin.contains_key(key) {
                length += 1;
            }
        }
        for key in removed.iter() {
            if origin.contains_key(key) && !patch.contains_key(key) {
                length -= 1;
            }
        }
        let level = 1 + origin.cascading_level().max(patch.cascading_level());
        Self {
            origin,
            patch,
            removed,
            length,
            level,
        }
    }

    /// Layered lookup: patch first, then the removal veto, then origin.
    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(found) = self.patch.get_key_value(key) {
            return Some(found);
        }
        if self.removed.contains(key) {
            return None;
        }
        self.origin.get_key_value(key)
    }
}

/// Enumeration of a composed layer: adjusted origin entries first, in
/// origin order, then patch-only entries, in patch order.
pub(crate) struct PatchedIter<'a, K, V, S> {
    map: &'a PatchedMap<K, V, S>,
    origin: FrozenMapIterator<'a, K, V, S>,
    patch: FrozenMapIterator<'a, K, V, S>,
}

impl<'a, K: Eq + Hash, V, S: BuildHasher> PatchedIter<'a, K, V, S> {
    pub(crate) fn over(map: &'a PatchedMap<K, V, S>) -> Self {
        Self {
            map,
            origin: map.origin.iter(),
            patch: map.patch.iter(),
        }
    }
}

impl<'a, K: Eq + Hash, V, S: BuildHasher> Iterator for PatchedIter<'a, K, V, S> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        // Phase 1: origin entries, patched or passed through, removed
        // keys skipped (unless the patch overrides the removal).
        while let Some((key, value)) = self.origin.next() {
            if let Some(patched) = self.map.patch.get_key_value(key) {
                return Some(patched);
            }
            if self.map.removed.contains(key) {
                continue;
            }
            return Some((key, value));
        }
        // Phase 2: entries the patch adds on top of the origin's key set.
        loop {
            let (key, value) = self.patch.next()?;
            if !self.map.origin.contains_key(key) {
                return Some((key, value));
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
