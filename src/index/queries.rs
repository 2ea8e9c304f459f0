//! Ray and region queries on a [`BoundedVolumeIndex`].

use std::cmp::Ordering;

use arrayvec::ArrayVec;

use crate::aabb::{Aabb, IntersectsAabb};
use crate::ball::Ball;
use crate::bounding_hierarchy::BHValue;
use crate::index::bucket::{BucketContent, ROOT};
use crate::index::{BoundedVolumeIndex, Handle, QueryIterator, RayHit, TRAVERSAL_STACK_SIZE};
use crate::ray::Ray;

impl<T: BHValue, const D: usize> BoundedVolumeIndex<T, D> {
    /// Returns the entry closest to the origin of `ray` whose bounds the ray hits, along with
    /// the distance at which the ray enters those bounds. An origin inside some bounds hits
    /// them at distance zero.
    ///
    /// # Examples
    /// ```
    /// use bvindex::aabb::Aabb;
    /// use bvindex::index::BoundedVolumeIndex;
    /// use bvindex::ray::Ray;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let mut index = BoundedVolumeIndex::<f64, 3>::new();
    /// index.add(Aabb::with_bounds(Point3::new(4.0, -1.0, -1.0), Point3::new(6.0, 1.0, 1.0)));
    /// let near = index.add(Aabb::with_bounds(Point3::new(2.0, -1.0, -1.0), Point3::new(3.0, 1.0, 1.0)));
    ///
    /// let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
    /// let hit = index.intersects_ray(&ray).unwrap();
    /// assert_eq!(hit.handle, near);
    /// assert_eq!(hit.distance, 2.0);
    ///
    /// let away = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0));
    /// assert!(index.intersects_ray(&away).is_none());
    /// ```
    pub fn intersects_ray(&self, ray: &Ray<T, D>) -> Option<RayHit<T>> {
        self.nearest_hit(ray, |_, distance| Some(distance))
    }

    /// Like [`BoundedVolumeIndex::intersects_ray`], but the final hit test of every entry whose
    /// bounds the ray hits is left to `hit_test`. It returns the distance of the actual hit
    /// (for example with a mesh inside the bounds), or [`None`] if there is none.
    ///
    /// Subtrees are pruned by the distance at which the ray enters their bounds, so `hit_test`
    /// must not report a hit closer than the bounds of its entry.
    pub fn intersects_ray_with<F>(&self, ray: &Ray<T, D>, mut hit_test: F) -> Option<RayHit<T>>
    where
        F: FnMut(Handle) -> Option<T>,
    {
        self.nearest_hit(ray, |handle, _| hit_test(handle))
    }

    fn nearest_hit<F>(&self, ray: &Ray<T, D>, mut hit_test: F) -> Option<RayHit<T>>
    where
        F: FnMut(Handle, T) -> Option<T>,
    {
        let mut best: Option<RayHit<T>> = None;
        let closer = |best: &Option<RayHit<T>>, distance: T| match best {
            Some(hit) => distance < hit.distance,
            None => true,
        };

        let mut stack = ArrayVec::<(usize, T), TRAVERSAL_STACK_SIZE>::new();
        if let Some(distance) = ray.intersection_distance(&self.buckets[ROOT].bounds) {
            stack.push((ROOT, distance));
        }

        while let Some((index, distance)) = stack.pop() {
            if let Some(hit) = best {
                if distance > hit.distance {
                    continue;
                }
            }
            match self.buckets[index].content {
                BucketContent::Leaf { ref entries } => {
                    for &handle in entries {
                        let bounds_distance =
                            match ray.intersection_distance(&self.entries[handle.0]) {
                                Some(distance) if closer(&best, distance) => distance,
                                _ => continue,
                            };
                        if let Some(distance) = hit_test(handle, bounds_distance) {
                            if closer(&best, distance) {
                                best = Some(RayHit { handle, distance });
                            }
                        }
                    }
                }
                BucketContent::Internal { left, right } => {
                    let left_distance = ray.intersection_distance(&self.buckets[left].bounds);
                    let right_distance = ray.intersection_distance(&self.buckets[right].bounds);
                    // The nearer child goes on top of the stack.
                    let children = match (left_distance, right_distance) {
                        (Some(l), Some(r)) if r < l => {
                            [(left, left_distance), (right, right_distance)]
                        }
                        _ => [(right, right_distance), (left, left_distance)],
                    };
                    for (child, child_distance) in children {
                        if let Some(child_distance) = child_distance {
                            if best.map_or(true, |hit| child_distance <= hit.distance) {
                                stack.push((child, child_distance));
                            }
                        }
                    }
                }
            }
        }
        best
    }

    /// Returns every entry whose bounds `ray` hits, sorted by increasing distance.
    pub fn ray_hits(&self, ray: &Ray<T, D>) -> Vec<RayHit<T>> {
        let mut hits = Vec::new();
        let mut stack = ArrayVec::<usize, TRAVERSAL_STACK_SIZE>::new();
        if ray.intersects_aabb(&self.buckets[ROOT].bounds) {
            stack.push(ROOT);
        }

        while let Some(index) = stack.pop() {
            match self.buckets[index].content {
                BucketContent::Leaf { ref entries } => {
                    hits.extend(entries.iter().filter_map(|&handle| {
                        ray.intersection_distance(&self.entries[handle.0])
                            .map(|distance| RayHit { handle, distance })
                    }));
                }
                BucketContent::Internal { left, right } => {
                    for child in [right, left] {
                        if ray.intersects_aabb(&self.buckets[child].bounds) {
                            stack.push(child);
                        }
                    }
                }
            }
        }

        hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
        hits
    }

    /// Returns every entry whose bounds intersect `query`.
    pub fn query<Query: IntersectsAabb<T, D>>(&self, query: &Query) -> Vec<Handle> {
        self.query_iter(query).collect()
    }

    /// Creates a [`QueryIterator`] over every entry whose bounds intersect `query`.
    pub fn query_iter<'index, 'query, Query: IntersectsAabb<T, D>>(
        &'index self,
        query: &'query Query,
    ) -> QueryIterator<'index, 'query, T, D, Query> {
        QueryIterator::new(self, query)
    }

    /// Returns every entry whose bounds intersect `aabb`. Touching counts as intersecting.
    ///
    /// # Examples
    /// ```
    /// use bvindex::aabb::Aabb;
    /// use bvindex::index::BoundedVolumeIndex;
    /// use nalgebra::Point3;
    ///
    /// let mut index = BoundedVolumeIndex::<f32, 3>::new();
    /// let inside = index.add(Aabb::with_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)));
    /// index.add(Aabb::with_bounds(Point3::new(5.0, 5.0, 5.0), Point3::new(6.0, 6.0, 6.0)));
    ///
    /// let query = Aabb::with_bounds(Point3::new(-1.0, -1.0, -1.0), Point3::new(2.0, 2.0, 2.0));
    /// assert_eq!(index.within_bound_box(&query), vec![inside]);
    /// ```
    pub fn within_bound_box(&self, aabb: &Aabb<T, D>) -> Vec<Handle> {
        self.query(aabb)
    }

    /// Returns every entry whose bounds intersect `ball`.
    pub fn within_bound_sphere(&self, ball: &Ball<T, D>) -> Vec<Handle> {
        self.query(ball)
    }
}


#[cfg(all(feature = "bench", test))]
mod bench {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::testbase::{build_random_index, random_boxes, random_ray, TAabb3, TIndex3, TPoint3};

    #[bench]
    /// Benchmark adding 10,000 random boxes one by one.
    fn bench_add_10k(b: &mut ::test::Bencher) {
        let boxes = random_boxes(10_000, 0);
        b.iter(|| {
            let mut index = TIndex3::new();
            for bounds in &boxes {
                index.add(*bounds);
            }
            index
        });
    }

    #[bench]
    /// Benchmark the nearest hit of random rays against 10,000 random boxes.
    fn bench_intersects_ray_10k(b: &mut ::test::Bencher) {
        let index = build_random_index(10_000, 0);
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| index.intersects_ray(&random_ray(&mut rng)));
    }

    #[bench]
    /// Benchmark a small box query against 10,000 random boxes.
    fn bench_within_bound_box_10k(b: &mut ::test::Bencher) {
        let index = build_random_index(10_000, 0);
        let query = TAabb3::with_bounds(TPoint3::new(-20.0, -20.0, -20.0), TPoint3::new(20.0, 20.0, 20.0));
        b.iter(|| index.within_bound_box(&query));
    }
}
