use arrayvec::ArrayVec;

use crate::aabb::IntersectsAabb;
use crate::bounding_hierarchy::BHValue;
use crate::index::bucket::{BucketContent, ROOT};
use crate::index::{BoundedVolumeIndex, Handle, TRAVERSAL_STACK_SIZE};

/// Iterator over the entries of a [`BoundedVolumeIndex`] intersecting a query, without memory
/// allocations. Created by [`BoundedVolumeIndex::query_iter`].
pub struct QueryIterator<'index, 'query, T: BHValue, const D: usize, Query: IntersectsAabb<T, D>> {
    /// Reference to the [`BoundedVolumeIndex`] to traverse
    index: &'index BoundedVolumeIndex<T, D>,
    /// Reference to the input query
    query: &'query Query,
    /// Buckets whose bounds intersect the query and which were not visited yet
    stack: ArrayVec<usize, TRAVERSAL_STACK_SIZE>,
    /// Remaining entries of the leaf being visited
    leaf: &'index [Handle],
}

impl<'index, 'query, T: BHValue, const D: usize, Query: IntersectsAabb<T, D>>
    QueryIterator<'index, 'query, T, D, Query>
{
    /// Creates a new [`QueryIterator`]
    pub fn new(index: &'index BoundedVolumeIndex<T, D>, query: &'query Query) -> Self {
        let mut stack = ArrayVec::new();
        if query.intersects_aabb(&index.buckets[ROOT].bounds) {
            stack.push(ROOT);
        }
        QueryIterator {
            index,
            query,
            stack,
            leaf: &[],
        }
    }
}

impl<T: BHValue, const D: usize, Query: IntersectsAabb<T, D>> Iterator
    for QueryIterator<'_, '_, T, D, Query>
{
    type Item = Handle;

    fn next(&mut self) -> Option<Handle> {
        let index = self.index;
        loop {
            if let Some((&handle, rest)) = self.leaf.split_first() {
                self.leaf = rest;
                if self.query.intersects_aabb(&index.entries[handle.0]) {
                    return Some(handle);
                }
                continue;
            }

            let bucket = self.stack.pop()?;
            match index.buckets[bucket].content {
                BucketContent::Leaf { ref entries } => self.leaf = entries.as_slice(),
                BucketContent::Internal { left, right } => {
                    // Right first, so the left subtree is visited first.
                    for child in [right, left] {
                        if self.query.intersects_aabb(&index.buckets[child].bounds) {
                            self.stack.push(child);
                        }
                    }
                }
            }
        }
    }
}
