//! Errors reported by the checked operations of a
//! [`BoundedVolumeIndex`](crate::index::BoundedVolumeIndex).

/// An error returned by the fallible (`try_`) index operations and by the consistency check.
///
/// The unchecked counterparts (`add`, `remove`) treat these conditions as programming errors
/// and panic with the same message.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum IndexError {
    /// The bounds are not finite or have no extent along some axis.
    #[error("invalid bounds ({0}): every coordinate must be finite and min < max on every axis")]
    InvalidBounds(String),

    /// The handle does not index any entry slot that was ever allocated.
    #[error("handle {handle} is out of range for an index with {len} entry slots")]
    HandleOutOfRange {
        /// The offending handle index.
        handle: usize,
        /// The number of allocated entry slots.
        len: usize,
    },

    /// An internal invariant of the tree does not hold.
    #[error("inconsistent index: {0}")]
    Inconsistent(String),
}
