#![cfg_attr(feature = "bench", feature(test))]
//! A crate which exports rays, axis-aligned bounding boxes, balls, and an incrementally
//! updatable bounding volume index.
//!
//! ## About
//!
//! The [`BoundedVolumeIndex`](index::BoundedVolumeIndex) is a binary bounding volume hierarchy
//! over a dynamic set of [`Aabb`](aabb::Aabb)s. Entries can be added and removed at any time
//! and are identified by stable [`Handle`](index::Handle)s. The tree partitions space by
//! halving regions along their longest axis whenever a leaf overflows, so it stays balanced
//! without ever being rebuilt in the common case. Adding bounds outside of the space covered
//! so far rebuilds the tree around all live entries.
//!
//! The index answers nearest ray hits, optionally refined by a caller supplied hit test,
//! enumerations of all ray hits, and box, sphere or any other
//! [`IntersectsAabb`](aabb::IntersectsAabb) queries.
//!
//! ## Example
//!
//! ```
//! use bvindex::aabb::Aabb;
//! use bvindex::ball::Ball;
//! use bvindex::index::BoundedVolumeIndex;
//! use bvindex::ray::Ray;
//! use nalgebra::{Point3, Vector3};
//!
//! let mut index = BoundedVolumeIndex::<f32, 3>::with_capacity(1000);
//! let mut handles = Vec::new();
//! for i in 0..1000u32 {
//!     let center = Point3::new(i as f32, (i % 10) as f32, (i % 7) as f32);
//!     let half_size = Vector3::new(0.25, 0.25, 0.25);
//!     handles.push(index.add(Aabb::with_bounds(center - half_size, center + half_size)));
//! }
//!
//! let ray = Ray::new(Point3::new(-10.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
//! let hit = index.intersects_ray(&ray).unwrap();
//! assert_eq!(hit.handle, handles[0]);
//!
//! // Moving an entry means removing it and adding it again.
//! index.remove(handles[0]);
//! let moved = index.add(Aabb::with_bounds(
//!     Point3::new(-5.0, -0.25, -0.25),
//!     Point3::new(-4.5, 0.25, 0.25),
//! ));
//! assert_eq!(index.intersects_ray(&ray).unwrap().handle, moved);
//!
//! let nearby = index.within_bound_sphere(&Ball::new(Point3::new(490.0, 0.0, 0.0), 1.0));
//! assert!(!nearby.is_empty());
//! ```
//!
//! ## Features
//!
//! - `rayon` (default **enabled**) - adds batched parallel queries
//! - `serde` (default **disabled**) - adds `Serialize` and `Deserialize` implementations for
//!   the geometric types and the whole index
//! - `bench` (default **disabled**) - nightly-only micro benchmarks
//!

#[cfg(all(feature = "bench", test))]
extern crate test;

pub mod aabb;
pub mod ball;
pub mod bounding_hierarchy;
pub mod error;
pub mod index;
pub mod ray;
mod utils;

#[cfg(test)]
mod testbase;

#[cfg(doctest)]
doc_comment::doctest!("../README.md");
