#![no_main]
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Debug, Formatter};

use arbitrary::Arbitrary;
use bvindex::aabb::Aabb;
use bvindex::ball::Ball;
use bvindex::index::{BoundedVolumeIndex, Handle, MAX_ENTRIES};
use bvindex::ray::Ray;
use libfuzzer_sys::fuzz_target;
use nalgebra::{Point, SimdPartialOrd};

type Float = f32;
const LIMIT: i16 = 1000;

fuzz_target!(|workload: Workload<3>| {
    workload.fuzz();
});

/// Coordinates live on a coarse integer grid.
#[derive(Arbitrary)]
struct ArbitraryPoint<const D: usize> {
    coordinates: [i16; D],
}

impl<const D: usize> ArbitraryPoint<D> {
    fn point(&self) -> Point<Float, D> {
        Point::from(self.coordinates.map(|c| c.clamp(-LIMIT, LIMIT) as Float))
    }
}

#[derive(Arbitrary)]
struct ArbitraryBox<const D: usize> {
    a: ArbitraryPoint<D>,
    b: ArbitraryPoint<D>,
}

impl<const D: usize> Debug for ArbitraryBox<D> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Debug::fmt(&self.aabb(), f)
    }
}

impl<const D: usize> ArbitraryBox<D> {
    fn aabb(&self) -> Aabb<Float, D> {
        let a = self.a.point();
        let b = self.b.point();
        let mut max = a.simd_max(b);
        // Ensure some separation.
        max.iter_mut().enumerate().for_each(|(i, max)| {
            if *max == a[i].min(b[i]) {
                *max += 1.0;
            }
        });
        Aabb::with_bounds(a.simd_min(b), max)
    }
}

#[derive(Arbitrary)]
struct ArbitraryRay<const D: usize> {
    origin: ArbitraryPoint<D>,
    destination: ArbitraryPoint<D>,
}

impl<const D: usize> Debug for ArbitraryRay<D> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Debug::fmt(&self.ray(), f)
    }
}

impl<const D: usize> ArbitraryRay<D> {
    fn ray(&self) -> Ray<Float, D> {
        let mut direction = self.destination.point() - self.origin.point();
        // Ensure no degenerate direction.
        if direction.iter().all(|f| *f == 0.0) {
            direction.iter_mut().for_each(|f| *f = 1.0);
        }
        Ray::new(self.origin.point(), direction)
    }
}

#[derive(Debug, Arbitrary)]
enum ArbitraryMutation<const D: usize> {
    Add(ArbitraryBox<D>),
    Remove(usize),
    Rebuild,
    MergeEmptyBuckets,
}

#[derive(Debug, Arbitrary)]
struct Workload<const D: usize> {
    boxes: Vec<ArbitraryBox<D>>,
    ray: ArbitraryRay<D>,
    query: ArbitraryBox<D>,
    radius: u16,
    mutations: Vec<ArbitraryMutation<D>>,
}

impl<const D: usize> Workload<D> {
    fn fuzz(self) {
        let added = self.boxes.iter().chain(self.mutations.iter().filter_map(|m| match m {
            ArbitraryMutation::Add(shape) => Some(shape),
            _ => None,
        }));

        // More than `MAX_ENTRIES` entries with the same center can never be separated, which
        // is a documented panic rather than a bug.
        let mut centers = HashMap::<Vec<i64>, usize>::new();
        let mut count = 0;
        for shape in added {
            let aabb = shape.aabb();
            let key = (0..D)
                .map(|i| (aabb.min[i] + aabb.max[i]) as i64)
                .collect::<Vec<_>>();
            *centers.entry(key).or_default() += 1;
            count += 1;
        }
        if count > 256 || centers.values().any(|&n| n > MAX_ENTRIES) {
            return;
        }

        let ray = self.ray.ray();
        let query = self.query.aabb();
        let ball = Ball::new(self.query.a.point(), self.radius as Float);

        let mut index = BoundedVolumeIndex::<Float, D>::new();
        let mut live = self
            .boxes
            .iter()
            .map(|shape| {
                let aabb = shape.aabb();
                (index.add(aabb), aabb)
            })
            .collect::<Vec<(Handle, Aabb<Float, D>)>>();

        let mut mutations = self.mutations;
        loop {
            index.assert_consistent();
            assert_eq!(index.entry_count(), live.len());

            let expected = live
                .iter()
                .filter(|(_, aabb)| query.intersects_aabb_strict(aabb))
                .map(|(handle, _)| *handle)
                .collect::<HashSet<_>>();
            let found = index.within_bound_box(&query);
            assert_eq!(found.len(), expected.len());
            assert_eq!(found.into_iter().collect::<HashSet<_>>(), expected);

            let expected = live
                .iter()
                .filter(|(_, aabb)| ball.intersects_aabb(aabb))
                .count();
            assert_eq!(index.within_bound_sphere(&ball).len(), expected);

            let nearest = live
                .iter()
                .filter_map(|(_, aabb)| ray.intersection_distance(aabb))
                .fold(None, |best: Option<Float>, distance| {
                    Some(best.map_or(distance, |best| best.min(distance)))
                });
            assert_eq!(index.intersects_ray(&ray).map(|hit| hit.distance), nearest);
            assert_eq!(
                index.ray_hits(&ray).len(),
                live.iter()
                    .filter(|(_, aabb)| ray.intersects_aabb(aabb))
                    .count()
            );

            match mutations.pop() {
                Some(ArbitraryMutation::Add(shape)) => {
                    let aabb = shape.aabb();
                    live.push((index.add(aabb), aabb));
                }
                Some(ArbitraryMutation::Remove(position)) => {
                    if !live.is_empty() {
                        let (handle, _) = live.swap_remove(position % live.len());
                        assert!(index.contains(handle));
                        index.remove(handle);
                        assert!(!index.contains(handle));
                    }
                }
                Some(ArbitraryMutation::Rebuild) => index.rebuild(),
                Some(ArbitraryMutation::MergeEmptyBuckets) => {
                    index.merge_empty_buckets();
                }
                None => break,
            }
        }
    }
}

trait StrictIntersection<const D: usize> {
    fn intersects_aabb_strict(&self, other: &Aabb<Float, D>) -> bool;
}

/// Reference box overlap, independent of the one in the library.
impl<const D: usize> StrictIntersection<D> for Aabb<Float, D> {
    fn intersects_aabb_strict(&self, other: &Aabb<Float, D>) -> bool {
        (0..D).all(|i| self.min[i] <= other.max[i] && other.min[i] <= self.max[i])
    }
}
