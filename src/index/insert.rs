//! Routed insertion and bucket splitting.

use crate::aabb::Aabb;
use crate::bounding_hierarchy::BHValue;
use crate::index::bucket::{Bucket, BucketContent, ROOT};
use crate::index::{BoundedVolumeIndex, Handle, MAX_INSERT_ITERATIONS};
use crate::utils::midpoint;

impl<T: BHValue, const D: usize> BoundedVolumeIndex<T, D> {
    /// Routes the entry behind `handle` from the root down to a leaf with room, splitting full
    /// leaves on the way. Every bucket passed is grown to include the entry.
    ///
    /// The root region must contain the entry.
    pub(crate) fn insert_entry(&mut self, handle: Handle) {
        let bounds = self.entries[handle.0];
        let center = bounds.center();
        let mut index = ROOT;

        for _ in 0..MAX_INSERT_ITERATIONS {
            self.buckets[index].bounds.join_mut(&bounds);
            match self.buckets[index].content {
                BucketContent::Internal { left, right } => {
                    index = self.route(left, right, &center);
                }
                BucketContent::Leaf { ref mut entries } => {
                    if entries.try_push(handle).is_ok() {
                        return;
                    }
                    // Revisit the same bucket, now internal.
                    self.split_bucket(index);
                }
            }
        }

        panic!(
            "Could not place entry {} ({}) after {} iterations.",
            handle, bounds, MAX_INSERT_ITERATIONS
        );
    }

    /// Turns the leaf at `index` into an internal bucket with two fresh leaf children, halving
    /// its region along the longest axis and moving its entries down by their centers.
    pub(crate) fn split_bucket(&mut self, index: usize) {
        let entries = match self.buckets[index].content {
            BucketContent::Leaf { ref entries } => entries.clone(),
            BucketContent::Internal { .. } => {
                panic!("Tried to split bucket {} which is not a leaf.", index)
            }
        };

        let region = self.buckets[index].region;
        let axis = region.largest_axis();
        let plane = midpoint(region.min[axis], region.max[axis]);

        let mut left_region = region;
        left_region.max[axis] = plane;
        let mut right_region = region;
        right_region.min[axis] = plane;
        assert!(
            left_region.is_valid() && right_region.is_valid(),
            "Splitting bucket {} along axis {} produced a region without volume: {}",
            index,
            axis,
            region
        );
        assert!(
            left_region.max[axis] <= right_region.min[axis],
            "Splitting bucket {} produced overlapping regions.",
            index
        );

        let mut left_bucket = Bucket::leaf(left_region);
        let mut right_bucket = Bucket::leaf(right_region);
        for handle in entries {
            let bounds = &self.entries[handle.0];
            let child = if left_region.contains(&bounds.center()) {
                &mut left_bucket
            } else {
                &mut right_bucket
            };
            child.bounds.join_mut(bounds);
            if let BucketContent::Leaf { ref mut entries } = child.content {
                entries.push(handle);
            }
        }

        let left = self.acquire_bucket_pair();
        let right = left + 1;
        self.buckets[left] = left_bucket;
        self.buckets[right] = right_bucket;
        self.buckets[index].content = BucketContent::Internal { left, right };
        self.split_counts[axis] += 1;

        log::trace!(
            "split bucket {} along axis {} into {} and {}",
            index,
            axis,
            left,
            right
        );
    }

    /// The joint bounds of the entries listed by a leaf.
    pub(crate) fn leaf_bounds(&self, entries: &[Handle]) -> Aabb<T, D> {
        entries
            .iter()
            .fold(Aabb::empty(), |bounds, handle| bounds.join(&self.entries[handle.0]))
    }
}
