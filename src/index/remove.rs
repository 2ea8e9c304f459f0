//! Removal of entries and merging of emptied buckets.

use arrayvec::ArrayVec;

use crate::aabb::Aabb;
use crate::bounding_hierarchy::BHValue;
use crate::error::IndexError;
use crate::index::bucket::{BucketContent, ROOT};
use crate::index::{BoundedVolumeIndex, Handle, TRAVERSAL_STACK_SIZE};

impl<T: BHValue, const D: usize> BoundedVolumeIndex<T, D> {
    /// Removes the entry behind `handle`. Removing an entry twice is a no-op.
    ///
    /// # Panics
    /// Panics if `handle` was never issued by this index. See
    /// [`BoundedVolumeIndex::try_remove`] for the checked version.
    pub fn remove(&mut self, handle: Handle) {
        if let Err(error) = self.try_remove(handle) {
            panic!("{}", error);
        }
    }

    /// Removes the entry behind `handle`. Returns `Ok(false)` if the entry was already removed
    /// and [`IndexError::HandleOutOfRange`] if `handle` was never issued by this index.
    ///
    /// The leaf is found by routing the center of the entry's bounds, as during insertion.
    /// If the leaf and its sibling both end up empty they are merged back into their parent.
    /// Merging stops there and does not continue with the grandparent; use
    /// [`BoundedVolumeIndex::merge_empty_buckets`] to collapse the whole tree.
    pub fn try_remove(&mut self, handle: Handle) -> Result<bool, IndexError> {
        self.check_handle(handle)?;
        if self.is_free_entry(handle.0) {
            return Ok(false);
        }

        let center = self.entries[handle.0].center();
        let mut path = ArrayVec::<usize, TRAVERSAL_STACK_SIZE>::new();
        let mut index = ROOT;
        path.push(ROOT);
        while let Some((left, right)) = self.buckets[index].children() {
            index = self.route(left, right, &center);
            path.push(index);
        }

        let removed = match self.buckets[index].content {
            BucketContent::Leaf { ref mut entries } => entries
                .iter()
                .position(|&stored| stored == handle)
                .map(|position| entries.remove(position)),
            BucketContent::Internal { .. } => None,
        };
        assert!(
            removed.is_some(),
            "Entry {} is missing from bucket {} it routes to.",
            handle,
            index
        );

        if path.len() > 1 {
            let parent = path[path.len() - 2];
            if self.merge_empty_children(parent) {
                path.pop();
            }
        }
        for &bucket in path.iter().rev() {
            self.refit(bucket);
        }

        self.entries[handle.0] = Aabb::empty();
        self.free_entries.insert(handle.0);
        Ok(true)
    }

    /// Collapses every internal bucket whose children are both empty leaves, bottom-up, until
    /// no such bucket is left. Returns the number of bucket pairs released.
    ///
    /// After every entry has been removed this brings the tree back to a single root leaf.
    pub fn merge_empty_buckets(&mut self) -> usize {
        let mut internal = Vec::new();
        let mut stack = ArrayVec::<usize, TRAVERSAL_STACK_SIZE>::new();
        stack.push(ROOT);
        while let Some(index) = stack.pop() {
            if let Some((left, right)) = self.buckets[index].children() {
                internal.push(index);
                stack.push(left);
                stack.push(right);
            }
        }

        // Parents precede their children in `internal`.
        let mut merged = 0;
        for &index in internal.iter().rev() {
            if self.merge_empty_children(index) {
                merged += 1;
            }
        }
        log::debug!("merged {} empty bucket pairs", merged);
        merged
    }

    /// Turns `parent` back into an empty leaf if both of its children are empty leaves.
    pub(crate) fn merge_empty_children(&mut self, parent: usize) -> bool {
        let (left, right) = match self.buckets[parent].children() {
            Some(children) => children,
            None => return false,
        };
        if !self.buckets[left].is_empty_leaf() || !self.buckets[right].is_empty_leaf() {
            return false;
        }

        self.release_bucket_pair(left);
        self.buckets[parent].content = BucketContent::empty_leaf();
        self.buckets[parent].bounds = Aabb::empty();
        log::trace!("merged buckets {} and {} into {}", left, right, parent);
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::error::IndexError;
    use crate::index::{Handle, MAX_ENTRIES, ROOT};
    use crate::testbase::{random_boxes, unit_box, TIndex3, TPoint3};

    fn filled_index(count: usize, seed: u64) -> (TIndex3, Vec<Handle>) {
        let mut index = TIndex3::new();
        let handles = random_boxes(count, seed)
            .into_iter()
            .map(|bounds| index.add(bounds))
            .collect();
        (index, handles)
    }

    #[test]
    fn test_remove_all_then_merge_leaves_root() {
        let (mut index, handles) = filled_index(500, 7);
        assert!(index.bucket_count() > 1);

        for handle in handles {
            index.remove(handle);
            index.assert_consistent();
        }
        assert_eq!(index.entry_count(), 0);
        assert!(index.bounds().is_empty());

        index.merge_empty_buckets();
        assert_eq!(index.bucket_count(), 1);
        assert!(index.bucket(ROOT).unwrap().is_leaf());
        index.assert_consistent();
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (mut index, handles) = filled_index(50, 3);
        assert_eq!(index.try_remove(handles[10]), Ok(true));
        let buckets = index.bucket_count();
        assert_eq!(index.try_remove(handles[10]), Ok(false));
        index.remove(handles[10]);
        assert_eq!(index.entry_count(), 49);
        assert_eq!(index.bucket_count(), buckets);
        index.assert_consistent();
    }

    #[test]
    fn test_try_remove_out_of_range() {
        let (mut index, _) = filled_index(4, 1);
        assert_eq!(
            index.try_remove(Handle(4)),
            Err(IndexError::HandleOutOfRange { handle: 4, len: 4 })
        );
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_remove_out_of_range_panics() {
        let (mut index, _) = filled_index(4, 1);
        index.remove(Handle(100));
    }

    #[test]
    fn test_remove_refits_bounds() {
        let mut index = TIndex3::new();
        let near = index.add(unit_box(TPoint3::new(0.0, 0.0, 0.0)));
        let far = index.add(unit_box(TPoint3::new(10.0, 0.0, 0.0)));
        index.remove(far);
        assert_eq!(index.bounds(), index.get(near).unwrap());
        // The region keeps its extent until the next rebuild.
        assert_eq!(index.region().max.x, 10.5);
    }

    #[test]
    fn test_merge_is_single_level() {
        let mut index = TIndex3::new();
        // Eight boxes on the far left and nine on the far right, spread along x.
        let left = (0..MAX_ENTRIES)
            .map(|i| index.add(unit_box(TPoint3::new(i as f32, 0.0, 0.0))))
            .collect::<Vec<_>>();
        let right = (0..=MAX_ENTRIES)
            .map(|i| index.add(unit_box(TPoint3::new(100.0 + i as f32, 0.0, 0.0))))
            .collect::<Vec<_>>();
        let (_, right_child) = index.bucket(ROOT).unwrap().children().unwrap();
        // The nine boxes on the right did not fit into one leaf.
        assert!(!index.bucket(right_child).unwrap().is_leaf());

        for handle in right {
            index.remove(handle);
        }
        index.assert_consistent();
        let after_remove = index.bucket_count();
        // Only the deepest emptied pair was merged on removal.
        assert!(!index.bucket(right_child).unwrap().is_leaf());

        let merged = index.merge_empty_buckets();
        assert!(merged >= 1);
        assert!(index.bucket_count() < after_remove);
        assert!(index.bucket(right_child).unwrap().is_leaf());

        for handle in left {
            index.remove(handle);
        }
        index.merge_empty_buckets();
        assert_eq!(index.bucket_count(), 1);
    }

    #[test]
    fn test_emptied_pair_merges_into_parent() {
        let mut index = TIndex3::new();
        let handles = (0..=MAX_ENTRIES)
            .map(|i| index.add(unit_box(TPoint3::new(i as f32 * 2.0, 0.0, 0.0))))
            .collect::<Vec<_>>();
        assert_eq!(index.bucket_count(), 3);
        for handle in handles {
            index.remove(handle);
        }
        // Both children of the root emptied, so the root became a leaf again.
        assert_eq!(index.bucket_count(), 1);
        assert_eq!(index.merge_empty_buckets(), 0);

        // The released pair is reused by the next split.
        for i in 0..=MAX_ENTRIES {
            index.add(unit_box(TPoint3::new(i as f32 * 2.0, 0.0, 0.0)));
        }
        assert_eq!(index.bucket(ROOT).unwrap().children(), Some((1, 2)));
        index.assert_consistent();
    }
}
