//! This module defines the [`BoundedVolumeIndex`], a binary bounding volume hierarchy over a
//! dynamic set of [`Aabb`]s, together with its buckets, handles and query results.
//!
//! [`Aabb`]: crate::aabb::Aabb

mod bucket;
mod free_list;
mod index_impl;
mod insert;
mod iter;
#[cfg(feature = "rayon")]
mod parallel;
mod queries;
mod rebuild;
mod remove;
mod validation;

pub use self::bucket::{Bucket, BucketContent, ROOT};
pub use self::index_impl::*;
pub use self::iter::QueryIterator;
