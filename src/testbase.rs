//! Common utilities shared by unit tests.
#![cfg(test)]

use std::collections::HashSet;

use nalgebra::{Point, SVector};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::aabb::{Aabb, IntersectsAabb};
use crate::ball::Ball;
use crate::index::{BoundedVolumeIndex, Handle, RayHit, ROOT};
use crate::ray::Ray;

/// Point math type used by the tests.
pub type TPoint3 = Point<f32, 3>;
/// Vector math type used by the tests.
pub type TVector3 = SVector<f32, 3>;
/// Box type used by the tests.
pub type TAabb3 = Aabb<f32, 3>;
/// Ray type used by the tests.
pub type TRay3 = Ray<f32, 3>;
/// Sphere type used by the tests.
pub type TBall3 = Ball<f32, 3>;
/// Index type used by the tests.
pub type TIndex3 = BoundedVolumeIndex<f32, 3>;

/// A vector represented as a tuple
pub type TupleVec = (f32, f32, f32);

/// Generate a `TupleVec` for [`proptest::strategy::Strategy`] from -10e3 to 10e3.
/// Small enough to keep fp32 errors out of distance comparisons.
pub fn tuplevec_small_strategy() -> impl Strategy<Value = TupleVec> {
    (-10e3_f32..10e3_f32, -10e3_f32..10e3_f32, -10e3_f32..10e3_f32)
}

/// Convert a `TupleVec` to a [`TPoint3`].
pub fn tuple_to_point(tpl: &TupleVec) -> TPoint3 {
    TPoint3::new(tpl.0, tpl.1, tpl.2)
}

/// Convert a `TupleVec` to a [`TVector3`].
pub fn tuple_to_vector(tpl: &TupleVec) -> TVector3 {
    TVector3::new(tpl.0, tpl.1, tpl.2)
}

/// A unit [`TAabb3`] centered on `center`.
pub fn unit_box(center: TPoint3) -> TAabb3 {
    let half_size = TVector3::new(0.5, 0.5, 0.5);
    TAabb3::with_bounds(center - half_size, center + half_size)
}

/// `count` boxes with centers uniformly distributed in `[-500, 500]³` and half sizes between
/// 0.5 and 8. The same seed always yields the same boxes.
pub fn random_boxes(count: usize, seed: u64) -> Vec<TAabb3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let center = TPoint3::new(
                rng.random_range(-500.0..500.0),
                rng.random_range(-500.0..500.0),
                rng.random_range(-500.0..500.0),
            );
            let half_size = TVector3::new(
                rng.random_range(0.5..8.0),
                rng.random_range(0.5..8.0),
                rng.random_range(0.5..8.0),
            );
            TAabb3::with_bounds(center - half_size, center + half_size)
        })
        .collect()
}

/// Every live entry whose bounds intersect `query`, found without the tree.
pub fn brute_force_query<Query: IntersectsAabb<f32, 3>>(
    index: &TIndex3,
    query: &Query,
) -> HashSet<Handle> {
    index
        .handles()
        .filter(|&handle| query.intersects_aabb(index.get(handle).unwrap()))
        .collect()
}

/// The nearest live entry hit by `ray`, found without the tree.
pub fn brute_force_nearest(index: &TIndex3, ray: &TRay3) -> Option<RayHit<f32>> {
    index
        .handles()
        .filter_map(|handle| {
            ray.intersection_distance(index.get(handle).unwrap())
                .map(|distance| RayHit { handle, distance })
        })
        .fold(None, |best: Option<RayHit<f32>>, hit| match best {
            Some(best) if best.distance <= hit.distance => Some(best),
            _ => Some(hit),
        })
}

/// The shape of the tree in depth-first order: region, bounds and entry count of every bucket,
/// with `None` as entry count for internal buckets.
pub fn bucket_shapes(index: &TIndex3) -> Vec<(TAabb3, TAabb3, Option<usize>)> {
    let mut shapes = Vec::new();
    let mut stack = vec![ROOT];
    while let Some(i) = stack.pop() {
        let bucket = index.bucket(i).unwrap();
        match bucket.children() {
            Some((left, right)) => {
                shapes.push((*bucket.region(), *bucket.bounds(), None));
                stack.push(right);
                stack.push(left);
            }
            None => shapes.push((*bucket.region(), *bucket.bounds(), Some(bucket.entries().len()))),
        }
    }
    shapes
}

/// An index over `count` random boxes, see [`random_boxes`].
pub fn build_random_index(count: usize, seed: u64) -> TIndex3 {
    let mut index = TIndex3::with_capacity(count);
    for bounds in random_boxes(count, seed) {
        index.add(bounds);
    }
    index
}

/// A ray starting somewhere in `[-600, 600]³` and pointing at some other point of it.
pub fn random_ray(rng: &mut StdRng) -> TRay3 {
    let mut point = || {
        TPoint3::new(
            rng.random_range(-600.0..600.0),
            rng.random_range(-600.0..600.0),
            rng.random_range(-600.0..600.0),
        )
    };
    let origin = point();
    let target = point();
    TRay3::new(origin, target - origin + TVector3::new(0.0, 0.0, 1e-3))
}
