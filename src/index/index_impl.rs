//! This module defines [`BoundedVolumeIndex`] and its storage bookkeeping: entry slots,
//! bucket pairs and the free lists recycling both.

use std::fmt;

use crate::aabb::Aabb;
use crate::bounding_hierarchy::BHValue;
use crate::error::IndexError;
use crate::index::bucket::{Bucket, BucketContent, ROOT};
use crate::index::free_list::FreeList;

/// Maximum number of entries a leaf bucket holds before it is split.
pub const MAX_ENTRIES: usize = 8;

/// Upper bound on the loop iterations of a single routed insertion. Reaching it means the
/// tree cannot separate the entry from its neighbours, which is treated as a fatal error.
pub const MAX_INSERT_ITERATIONS: usize = 30;

/// Capacity of the explicit stacks used to walk the tree.
pub const TRAVERSAL_STACK_SIZE: usize = 64;

/// Stable identifier of an entry of a [`BoundedVolumeIndex`].
///
/// A handle stays valid until the entry is removed. Its slot may then be handed out again by a
/// later insertion.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Handle(pub(crate) usize);

impl Handle {
    /// The index of the entry slot this handle refers to.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<Handle> for usize {
    fn from(handle: Handle) -> usize {
        handle.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The result of a successful ray query.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RayHit<T> {
    /// The entry that was hit.
    pub handle: Handle,
    /// Distance from the ray origin to the hit.
    pub distance: T,
}

/// A bounding volume hierarchy over a dynamic set of [`Aabb`]s.
///
/// Entries are routed by the center of their bounds through buckets whose regions are halved
/// along their longest axis whenever a leaf overflows. Inserting bounds that fall outside the
/// root region rebuilds the whole tree around the live entries.
///
/// # Examples
/// ```
/// use bvindex::aabb::Aabb;
/// use bvindex::index::BoundedVolumeIndex;
/// use bvindex::ray::Ray;
/// use nalgebra::{Point3, Vector3};
///
/// let mut index = BoundedVolumeIndex::<f32, 3>::new();
/// let target = index.add(Aabb::with_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 10.0)));
/// let other = index.add(Aabb::with_bounds(Point3::new(20.0, 0.0, 0.0), Point3::new(30.0, 10.0, 10.0)));
///
/// let ray = Ray::new(Point3::new(0.0, -5.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
/// let hit = index.intersects_ray(&ray).unwrap();
/// assert_eq!(hit.handle, target);
/// assert_eq!(hit.distance, 5.0);
///
/// index.remove(other);
/// assert_eq!(index.entry_count(), 1);
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundedVolumeIndex<T: BHValue, const D: usize> {
    pub(crate) entries: Vec<Aabb<T, D>>,
    pub(crate) buckets: Vec<Bucket<T, D>>,
    pub(crate) free_entries: FreeList,
    /// Base indices of free bucket pairs. Pairs always start at an odd index.
    pub(crate) free_buckets: FreeList,
    pub(crate) split_counts: Vec<usize>,
}

impl<T: BHValue, const D: usize> Default for BoundedVolumeIndex<T, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: BHValue, const D: usize> BoundedVolumeIndex<T, D> {
    /// Creates an empty index consisting of a single root leaf with an empty region.
    pub fn new() -> Self {
        BoundedVolumeIndex {
            entries: Vec::new(),
            buckets: vec![Bucket::leaf(Aabb::empty())],
            free_entries: FreeList::default(),
            free_buckets: FreeList::default(),
            split_counts: vec![0; D],
        }
    }

    /// Creates an empty index with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut index = Self::new();
        index.reserve(capacity);
        index
    }

    /// Reserves storage for `additional` more entries and the `2 * additional` buckets their
    /// splits can create.
    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
        self.buckets.reserve(2 * additional);
    }

    /// Removes every entry. Handles issued before the call become invalid.
    pub fn clear(&mut self) {
        log::debug!("clearing index with {} entries", self.entry_count());
        self.entries.clear();
        self.buckets.truncate(1);
        self.buckets[ROOT] = Bucket::leaf(Aabb::empty());
        self.free_entries.clear();
        self.free_buckets.clear();
        self.split_counts.fill(0);
    }

    /// Number of live entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len() - self.free_entries.len()
    }

    /// Number of buckets currently part of the tree, the root included.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len() - 2 * self.free_buckets.len()
    }

    /// Returns true if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }

    /// Number of bucket splits along each axis since the tree was last rebuilt or cleared.
    /// Merges do not decrement these counters.
    pub fn split_counts(&self) -> &[usize] {
        &self.split_counts
    }

    /// The routing region of the root bucket. It contains the bounds of every live entry.
    pub fn region(&self) -> &Aabb<T, D> {
        &self.buckets[ROOT].region
    }

    /// The joint bounds of every live entry, as tracked by the root bucket.
    pub fn bounds(&self) -> &Aabb<T, D> {
        &self.buckets[ROOT].bounds
    }

    /// The bounds of the entry behind `handle`, or [`None`] if it is not live.
    pub fn get(&self, handle: Handle) -> Option<&Aabb<T, D>> {
        if self.contains(handle) {
            Some(&self.entries[handle.0])
        } else {
            None
        }
    }

    /// Returns true if `handle` refers to a live entry.
    pub fn contains(&self, handle: Handle) -> bool {
        handle.0 < self.entries.len() && !self.is_free_entry(handle.0)
    }

    /// Iterates over the handles of all live entries in increasing order.
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        (0..self.entries.len())
            .filter(move |&slot| !self.is_free_entry(slot))
            .map(Handle)
    }

    /// The bucket stored at `index`, or [`None`] if the slot does not exist or is free.
    pub fn bucket(&self, index: usize) -> Option<&Bucket<T, D>> {
        if index < self.buckets.len() && !self.is_free_bucket(index) {
            Some(&self.buckets[index])
        } else {
            None
        }
    }

    /// Adds `bounds` to the index and returns the handle identifying it.
    ///
    /// # Panics
    /// Panics if `bounds` is not [valid](Aabb::is_valid). See [`BoundedVolumeIndex::try_add`]
    /// for the checked version.
    pub fn add(&mut self, bounds: Aabb<T, D>) -> Handle {
        match self.try_add(bounds) {
            Ok(handle) => handle,
            Err(error) => panic!("{}", error),
        }
    }

    /// Adds `bounds` to the index and returns the handle identifying it, or
    /// [`IndexError::InvalidBounds`] if the bounds are not finite or have no volume.
    ///
    /// The lowest recycled entry slot is reused before storage grows. Bounds inside the root
    /// region are routed into the existing tree, anything else triggers a
    /// [rebuild](BoundedVolumeIndex::rebuild).
    pub fn try_add(&mut self, bounds: Aabb<T, D>) -> Result<Handle, IndexError> {
        if !bounds.is_valid() {
            return Err(IndexError::InvalidBounds(bounds.to_string()));
        }

        let handle = match self.free_entries.take_lowest() {
            Some(slot) => {
                self.entries[slot] = bounds;
                Handle(slot)
            }
            None => {
                self.entries.push(bounds);
                Handle(self.entries.len() - 1)
            }
        };

        if self.buckets[ROOT].region.contains_aabb(&bounds) {
            self.insert_entry(handle);
        } else {
            self.rebuild();
        }
        Ok(handle)
    }

    pub(crate) fn is_free_entry(&self, slot: usize) -> bool {
        self.free_entries.contains(slot)
    }

    pub(crate) fn is_free_bucket(&self, index: usize) -> bool {
        index != ROOT && self.free_buckets.contains(pair_base(index))
    }

    /// Returns the base index of a bucket pair, reusing the lowest free pair if there is one.
    /// Both buckets of the pair must be overwritten by the caller.
    pub(crate) fn acquire_bucket_pair(&mut self) -> usize {
        match self.free_buckets.take_lowest() {
            Some(base) => base,
            None => {
                let base = self.buckets.len();
                self.buckets.push(Bucket::leaf(Aabb::empty()));
                self.buckets.push(Bucket::leaf(Aabb::empty()));
                base
            }
        }
    }

    /// Recycles the bucket pair starting at `base`.
    pub(crate) fn release_bucket_pair(&mut self, base: usize) {
        assert!(
            base != ROOT && pair_base(base) == base,
            "Tried to release bucket {} which does not start a pair.",
            base
        );
        self.buckets[base] = Bucket::leaf(Aabb::empty());
        self.buckets[base + 1] = Bucket::leaf(Aabb::empty());
        self.free_buckets.insert(base);
    }

    /// Picks the child whose region contains `center`. The left child wins on its boundary.
    pub(crate) fn route(&self, left: usize, right: usize, center: &nalgebra::Point<T, D>) -> usize {
        if self.buckets[left].region.contains(center) {
            left
        } else {
            right
        }
    }

    /// Recomputes the tight bounds of a bucket from its entries or its children.
    pub(crate) fn refit(&mut self, index: usize) {
        let bounds = match self.buckets[index].content {
            BucketContent::Leaf { ref entries } => self.leaf_bounds(entries),
            BucketContent::Internal { left, right } => {
                self.buckets[left].bounds.join(&self.buckets[right].bounds)
            }
        };
        self.buckets[index].bounds = bounds;
    }

    /// Fails unless `handle` indexes an allocated entry slot.
    pub(crate) fn check_handle(&self, handle: Handle) -> Result<(), IndexError> {
        if handle.0 < self.entries.len() {
            Ok(())
        } else {
            Err(IndexError::HandleOutOfRange {
                handle: handle.0,
                len: self.entries.len(),
            })
        }
    }
}

/// Buckets are allocated in pairs `(1, 2)`, `(3, 4)`, ... after the root.
pub(crate) fn pair_base(index: usize) -> usize {
    if index % 2 == 1 {
        index
    } else {
        index - 1
    }
}
