//! Consistency checks and debug printing of a [`BoundedVolumeIndex`].

use arrayvec::ArrayVec;

use crate::bounding_hierarchy::BHValue;
use crate::error::IndexError;
use crate::index::bucket::{BucketContent, ROOT};
use crate::index::{BoundedVolumeIndex, TRAVERSAL_STACK_SIZE};

macro_rules! ensure {
    ($condition:expr, $($message:tt)+) => {
        if !$condition {
            return Err(IndexError::Inconsistent(format!($($message)+)));
        }
    };
}

impl<T: BHValue, const D: usize> BoundedVolumeIndex<T, D> {
    /// Checks the structure of the tree and returns the first broken invariant found.
    ///
    /// Verified are:
    /// - the root region contains the bounds of every live entry,
    /// - the regions of the children of every internal bucket split the region of their parent
    ///   along a single plane, into two halves with volume,
    /// - the bounds of every bucket are exactly the joint bounds of its entries or children,
    /// - every live entry is stored exactly once, in the leaf its center routes to,
    /// - no reachable bucket is marked free and the number of reachable buckets matches
    ///   [`BoundedVolumeIndex::bucket_count`].
    pub fn check_consistency(&self) -> Result<(), IndexError> {
        let root_region = &self.buckets[ROOT].region;
        for handle in self.handles() {
            ensure!(
                root_region.contains_aabb(&self.entries[handle.0]),
                "root region {} does not contain entry {} ({})",
                root_region,
                handle,
                self.entries[handle.0]
            );
        }

        let mut seen = vec![false; self.entries.len()];
        let mut reachable = 0;
        let mut stack = ArrayVec::<usize, TRAVERSAL_STACK_SIZE>::new();
        stack.push(ROOT);

        while let Some(index) = stack.pop() {
            reachable += 1;
            ensure!(!self.is_free_bucket(index), "bucket {} is reachable but free", index);
            let bucket = &self.buckets[index];

            match bucket.content {
                BucketContent::Leaf { ref entries } => {
                    let bounds = self.leaf_bounds(entries);
                    ensure!(
                        bucket.bounds == bounds,
                        "bounds of leaf {} are {} instead of {}",
                        index,
                        bucket.bounds,
                        bounds
                    );
                    for &handle in entries {
                        ensure!(
                            handle.0 < self.entries.len() && !self.is_free_entry(handle.0),
                            "leaf {} stores entry {} which is not live",
                            index,
                            handle
                        );
                        ensure!(!seen[handle.0], "entry {} is stored twice", handle);
                        seen[handle.0] = true;

                        let leaf = self.locate_leaf(&self.entries[handle.0].center());
                        ensure!(
                            leaf == index,
                            "entry {} is stored in bucket {} but routes to bucket {}",
                            handle,
                            index,
                            leaf
                        );
                    }
                }
                BucketContent::Internal { left, right } => {
                    ensure!(
                        right == left + 1 && left % 2 == 1,
                        "children {} and {} of bucket {} are not a bucket pair",
                        left,
                        right,
                        index
                    );
                    ensure!(
                        right < self.buckets.len(),
                        "children of bucket {} are out of range",
                        index
                    );

                    let (left_region, right_region) =
                        (&self.buckets[left].region, &self.buckets[right].region);
                    let split_axes = (0..D)
                        .filter(|&axis| left_region.max[axis] == right_region.min[axis])
                        .count();
                    ensure!(
                        left_region.is_valid()
                            && right_region.is_valid()
                            && split_axes >= 1
                            && left_region.join(right_region) == bucket.region,
                        "regions of children {} and {} do not split region {} of bucket {}",
                        left,
                        right,
                        bucket.region,
                        index
                    );

                    let bounds = self.buckets[left].bounds.join(&self.buckets[right].bounds);
                    ensure!(
                        bucket.bounds == bounds,
                        "bounds of bucket {} are {} instead of {}",
                        index,
                        bucket.bounds,
                        bounds
                    );

                    ensure!(
                        stack.remaining_capacity() >= 2,
                        "tree is deeper than {} buckets",
                        TRAVERSAL_STACK_SIZE
                    );
                    stack.push(right);
                    stack.push(left);
                }
            }
        }

        let stored = seen.iter().filter(|&&stored| stored).count();
        ensure!(
            stored == self.entry_count(),
            "{} entries are stored in the tree, but {} are live",
            stored,
            self.entry_count()
        );
        ensure!(
            reachable == self.bucket_count(),
            "{} buckets are reachable, but {} are in use",
            reachable,
            self.bucket_count()
        );
        Ok(())
    }

    /// Returns true if [`BoundedVolumeIndex::check_consistency`] finds no broken invariant.
    pub fn is_consistent(&self) -> bool {
        self.check_consistency().is_ok()
    }

    /// Panics with a description of the first broken invariant, if any.
    pub fn assert_consistent(&self) {
        if let Err(error) = self.check_consistency() {
            panic!("{}", error);
        }
    }

    /// Prints the tree to stdout, one bucket per line, indented by depth.
    pub fn pretty_print(&self) {
        let mut stack = ArrayVec::<(usize, usize), TRAVERSAL_STACK_SIZE>::new();
        stack.push((ROOT, 0));
        while let Some((index, depth)) = stack.pop() {
            let bucket = &self.buckets[index];
            let padding = " ".repeat(depth);
            match bucket.content {
                BucketContent::Leaf { ref entries } => {
                    let handles = entries.iter().map(|handle| handle.0).collect::<Vec<_>>();
                    println!(
                        "{}leaf={} bounds={} entries={:?}",
                        padding, index, bucket.bounds, handles
                    );
                }
                BucketContent::Internal { left, right } => {
                    println!(
                        "{}node={} bounds={} region={}",
                        padding, index, bucket.bounds, bucket.region
                    );
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
            }
        }
    }

    /// The leaf a point with the given center is routed to.
    fn locate_leaf(&self, center: &nalgebra::Point<T, D>) -> usize {
        let mut index = ROOT;
        while let Some((left, right)) = self.buckets[index].children() {
            index = self.route(left, right, center);
        }
        index
    }
}
