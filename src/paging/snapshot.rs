use std::iter::FusedIterator;
use std::sync::Arc;

use super::types::LoadStates;

/// Read-only view of a feed at one point in time.
///
/// Published by the pager after every mutation. Items are shared with the
/// pager through an `Arc`, so publishing is cheap and the pager only copies
/// the item list when it mutates while an older snapshot is still held.
#[derive(Debug, Clone)]
pub struct FeedSnapshot<T> {
    items: Arc<Vec<T>>,
    placeholders_before: usize,
    placeholders_after: usize,
    load_states: LoadStates,
}

impl<T> FeedSnapshot<T> {
    pub fn empty() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            placeholders_before: 0,
            placeholders_after: 0,
            load_states: LoadStates::default(),
        }
    }

    pub(crate) fn new(
        items: Arc<Vec<T>>,
        placeholders_before: usize,
        placeholders_after: usize,
        load_states: LoadStates,
    ) -> Self {
        Self {
            items,
            placeholders_before,
            placeholders_after,
            load_states,
        }
    }

    /// Loaded items only, in feed order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn load_states(&self) -> &LoadStates {
        &self.load_states
    }

    pub fn placeholders_before(&self) -> usize {
        self.placeholders_before
    }

    pub fn placeholders_after(&self) -> usize {
        self.placeholders_after
    }

    /// Number of slots, placeholders included.
    pub fn len(&self) -> usize {
        self.placeholders_before + self.items.len() + self.placeholders_after
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot at `index`: `Some(None)` is a placeholder, `None` is out of range.
    pub fn get(&self, index: usize) -> Option<Option<&T>> {
        if index < self.placeholders_before {
            return Some(None);
        }
        let index = index - self.placeholders_before;
        if index < self.items.len() {
            return Some(Some(&self.items[index]));
        }
        if index - self.items.len() < self.placeholders_after {
            return Some(None);
        }
        None
    }

    /// Iterate over every slot; `None` marks a placeholder.
    pub fn iter(&self) -> SnapshotIter<'_, T> {
        SnapshotIter {
            snapshot: self,
            front: 0,
            back: self.len(),
        }
    }
}

impl<T> Default for FeedSnapshot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, T> IntoIterator for &'a FeedSnapshot<T> {
    type Item = Option<&'a T>;
    type IntoIter = SnapshotIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the slots of a [`FeedSnapshot`].
pub struct SnapshotIter<'a, T> {
    snapshot: &'a FeedSnapshot<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for SnapshotIter<'a, T> {
    type Item = Option<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let slot = self.snapshot.get(self.front);
        self.front += 1;
        slot
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for SnapshotIter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.snapshot.get(self.back)
    }
}

impl<T> ExactSizeIterator for SnapshotIter<'_, T> {}

impl<T> FusedIterator for SnapshotIter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(items: Vec<u32>, before: usize, after: usize) -> FeedSnapshot<u32> {
        FeedSnapshot::new(Arc::new(items), before, after, LoadStates::default())
    }

    #[test]
    fn empty_snapshot_has_no_slots() {
        let s: FeedSnapshot<u32> = FeedSnapshot::empty();
        assert!(s.is_empty());
        assert_eq!(s.iter().count(), 0);
        assert_eq!(s.get(0), None);
    }

    #[test]
    fn iter_yields_placeholders_around_items() {
        let s = snapshot(vec![1, 2], 1, 2);
        let slots: Vec<Option<u32>> = s.iter().map(|slot| slot.copied()).collect();
        assert_eq!(slots, vec![None, Some(1), Some(2), None, None]);
        assert_eq!(s.len(), 5);
    }

    #[test]
    fn iter_is_restartable() {
        let s = snapshot(vec![1, 2, 3], 0, 0);
        let first: Vec<_> = s.iter().flatten().copied().collect();
        let second: Vec<_> = s.iter().flatten().copied().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn iter_reverses() {
        let s = snapshot(vec![1, 2, 3], 0, 1);
        let slots: Vec<Option<u32>> = s.iter().rev().map(|slot| slot.copied()).collect();
        assert_eq!(slots, vec![None, Some(3), Some(2), Some(1)]);
    }

    #[test]
    fn get_out_of_range_is_none() {
        let s = snapshot(vec![1], 0, 1);
        assert_eq!(s.get(0), Some(Some(&1)));
        assert_eq!(s.get(1), Some(None));
        assert_eq!(s.get(2), None);
    }
}
