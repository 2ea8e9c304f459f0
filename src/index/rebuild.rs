use crate::aabb::Aabb;
use crate::bounding_hierarchy::BHValue;
use crate::index::bucket::{Bucket, BucketContent, ROOT};
use crate::index::free_list::FreeList;
use crate::index::BoundedVolumeIndex;

impl<T: BHValue, const D: usize> BoundedVolumeIndex<T, D> {
    /// Rebuilds the tree from scratch around the live entries.
    ///
    /// The root region is reset to the joint bounds of all live entries, every other bucket is
    /// released and the entries are inserted again in increasing handle order. The resulting
    /// tree only depends on the live entries and their order, not on the history of the index.
    /// Split counters start over from zero.
    ///
    /// [`BoundedVolumeIndex::try_add`] calls this whenever new bounds do not fit into the root
    /// region.
    pub fn rebuild(&mut self) {
        let region = self
            .handles()
            .fold(Aabb::empty(), |region, handle| region.join(&self.entries[handle.0]));

        for bucket in self.buckets.iter_mut().skip(1) {
            *bucket = Bucket::leaf(Aabb::empty());
        }
        self.free_buckets = FreeList::from_slots((ROOT + 1..self.buckets.len()).step_by(2));
        self.buckets[ROOT] = Bucket {
            region,
            bounds: region,
            content: BucketContent::empty_leaf(),
        };
        self.split_counts.fill(0);

        let handles = self.handles().collect::<Vec<_>>();
        for &handle in &handles {
            self.insert_entry(handle);
        }

        log::debug!(
            "rebuilt index over {} entries into {} buckets",
            handles.len(),
            self.bucket_count()
        );
    }
}
