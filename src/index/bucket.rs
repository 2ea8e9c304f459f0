use arrayvec::ArrayVec;

use crate::aabb::Aabb;
use crate::bounding_hierarchy::BHValue;
use crate::index::{Handle, MAX_ENTRIES};

/// Index of the root [`Bucket`]. The root always exists and is never recycled.
pub const ROOT: usize = 0;

/// What a [`Bucket`] holds: either entries, or exactly two child buckets.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BucketContent {
    /// Leaf bucket.
    Leaf {
        /// Handles of the entries stored in this leaf.
        entries: ArrayVec<Handle, MAX_ENTRIES>,
    },
    /// Internal bucket.
    Internal {
        /// Index of the bucket covering the lower half of the region.
        left: usize,
        /// Index of the bucket covering the upper half of the region. Always `left + 1`.
        right: usize,
    },
}

impl BucketContent {
    /// An empty leaf.
    pub fn empty_leaf() -> BucketContent {
        BucketContent::Leaf {
            entries: ArrayVec::new(),
        }
    }
}

/// A node of a [`BoundedVolumeIndex`](crate::index::BoundedVolumeIndex).
///
/// The `region` is the static slice of space this bucket is responsible for and is only used
/// to route entries by their center. The `bounds` tightly wrap the entries stored below the
/// bucket and are what queries test against.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bucket<T: BHValue, const D: usize> {
    pub(crate) region: Aabb<T, D>,
    pub(crate) bounds: Aabb<T, D>,
    pub(crate) content: BucketContent,
}

impl<T: BHValue, const D: usize> Bucket<T, D> {
    /// Creates an empty leaf responsible for `region`.
    pub(crate) fn leaf(region: Aabb<T, D>) -> Bucket<T, D> {
        Bucket {
            region,
            bounds: Aabb::empty(),
            content: BucketContent::empty_leaf(),
        }
    }

    /// The routing region of this bucket.
    pub fn region(&self) -> &Aabb<T, D> {
        &self.region
    }

    /// The joint bounds of all entries stored below this bucket.
    pub fn bounds(&self) -> &Aabb<T, D> {
        &self.bounds
    }

    /// The content of this bucket.
    pub fn content(&self) -> &BucketContent {
        &self.content
    }

    /// Returns true if this bucket is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self.content, BucketContent::Leaf { .. })
    }

    /// The handles stored in this bucket. Empty for internal buckets.
    pub fn entries(&self) -> &[Handle] {
        match self.content {
            BucketContent::Leaf { ref entries } => entries.as_slice(),
            BucketContent::Internal { .. } => &[],
        }
    }

    /// The `(left, right)` child indices of an internal bucket, or [`None`] for a leaf.
    pub fn children(&self) -> Option<(usize, usize)> {
        match self.content {
            BucketContent::Internal { left, right } => Some((left, right)),
            BucketContent::Leaf { .. } => None,
        }
    }

    /// Returns true if this is a leaf without entries.
    pub(crate) fn is_empty_leaf(&self) -> bool {
        matches!(self.content, BucketContent::Leaf { ref entries } if entries.is_empty())
    }
}
