//! Sort-and-compact used by every sorted representation.
//!
//! A stable sort followed by one forward compaction pass that squeezes out
//! adjacent duplicates. Stability makes the survivor deterministic: among
//! equal elements, the earliest occurrence in sorted order (which is the
//! earliest source occurrence) is kept. Running the pass twice on its own
//! output is a no-op.

use std::cmp::Ordering;

use crate::error::DuplicatePositions;

/// Sorts `items` by `compare` and drops adjacent duplicates, keeping the
/// earliest occurrence. The vector is truncated to the deduplicated length.
pub(crate) fn sort_dedup_by<T, F>(items: &mut Vec<T>, mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    items.sort_by(&mut compare);
    compact_adjacent(items, |left, right| compare(left, right) == Ordering::Equal);
}

/// Sorts position-tagged items by `compare` on the item and fails on the
/// first duplicate, reporting both source positions (earlier first) and
/// surrendering one of the equal items for diagnostics.
///
/// On success the tags are stripped and the sorted, duplicate-free items
/// are returned.
pub(crate) fn sort_strict_by<T, F>(
    mut tagged: Vec<(usize, T)>,
    mut compare: F,
) -> Result<Vec<T>, (DuplicatePositions, T)>
where
    F: FnMut(&T, &T) -> Ordering,
{
    tagged.sort_by(|left, right| compare(&left.1, &right.1));
    for index in 1..tagged.len() {
        if compare(&tagged[index - 1].1, &tagged[index].1) == Ordering::Equal {
            // The sort is stable, so the smaller source position comes first.
            let positions = DuplicatePositions {
                first: tagged[index - 1].0,
                second: tagged[index].0,
            };
            return Err((positions, tagged.swap_remove(index).1));
        }
    }
    Ok(tagged.into_iter().map(|(_, item)| item).collect())
}

/// Single forward pass removing every element equal to its predecessor.
///
/// Kept elements are swapped down into place; the tail is truncated away.
fn compact_adjacent<T, F>(items: &mut Vec<T>, mut same: F)
where
    F: FnMut(&T, &T) -> bool,
{
    if items.len() < 2 {
        return;
    }
    let mut write = 1;
    for read in 1..items.len() {
        if !same(&items[write - 1], &items[read]) {
            items.swap(write, read);
            write += 1;
        }
    }
    items.truncate(write);
}
