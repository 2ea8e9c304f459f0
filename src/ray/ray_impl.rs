//! This module defines a Ray structure and intersection algorithms
//! for axis aligned bounding boxes and triangles.

use nalgebra::{Point, SVector};

use crate::aabb::{Aabb, IntersectsAabb};
use crate::bounding_hierarchy::BHValue;
use crate::utils::{fast_max, fast_min};

/// A struct which defines a ray and some of its cached values.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ray<T: BHValue, const D: usize> {
    /// The ray origin.
    pub origin: Point<T, D>,

    /// The normalized ray direction.
    pub direction: SVector<T, D>,

    /// Inverse (1/x) ray direction. Cached for use in [`Aabb`] intersections.
    pub inv_direction: SVector<T, D>,
}

impl<T: BHValue, const D: usize> Ray<T, D> {
    /// Creates a new [`Ray`] from an `origin` and a `direction`.
    /// `direction` will be normalized.
    ///
    /// # Panics
    /// Panics, in debug mode, if `direction` has zero length.
    ///
    /// # Examples
    /// ```
    /// use bvindex::ray::Ray;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let origin = Point3::new(0.0, 0.0, 0.0);
    /// let ray = Ray::new(origin, Vector3::new(2.0, 0.0, 0.0));
    ///
    /// assert_eq!(ray.origin, origin);
    /// assert_eq!(ray.direction, Vector3::new(1.0, 0.0, 0.0));
    /// ```
    pub fn new(origin: Point<T, D>, direction: SVector<T, D>) -> Ray<T, D> {
        let length = direction.dot(&direction).sqrt();
        debug_assert!(length > T::zero(), "Tried to create a ray without a direction.");
        let direction = direction.map(|x| x / length);
        Ray {
            origin,
            direction,
            inv_direction: direction.map(|x| T::one() / x),
        }
    }

    /// Returns the point at `distance` along the ray.
    pub fn point_at(&self, distance: T) -> Point<T, D> {
        self.origin + self.direction.map(|x| x * distance)
    }

    /// Computes the distance along the [`Ray`] at which it enters the [`Aabb`], using the
    /// slab method. Returns zero if the origin lies inside the [`Aabb`] and [`None`] if the
    /// ray misses it or the [`Aabb`] is empty.
    ///
    /// Axes along which the ray does not move are handled explicitly, so a ray that grazes
    /// a face or starts on it still reports an exact distance.
    ///
    /// # Examples
    /// ```
    /// use bvindex::aabb::Aabb;
    /// use bvindex::ray::Ray;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let ray = Ray::new(Point3::new(0.0, -5.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
    /// let aabb = Aabb::with_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 10.0));
    ///
    /// assert_eq!(ray.intersection_distance(&aabb), Some(5.0));
    /// ```
    pub fn intersection_distance(&self, aabb: &Aabb<T, D>) -> Option<T> {
        if aabb.is_empty() {
            return None;
        }

        let mut entry = T::zero();
        let mut exit = T::infinity();
        for i in 0..D {
            if self.direction[i] == T::zero() {
                // The ray is parallel to this slab.
                if self.origin[i] < aabb.min[i] || self.origin[i] > aabb.max[i] {
                    return None;
                }
                continue;
            }

            let t1 = (aabb.min[i] - self.origin[i]) * self.inv_direction[i];
            let t2 = (aabb.max[i] - self.origin[i]) * self.inv_direction[i];
            entry = fast_max(entry, fast_min(t1, t2));
            exit = fast_min(exit, fast_max(t1, t2));
            if entry > exit {
                return None;
            }
        }
        Some(entry)
    }

    /// Tests the intersection of a [`Ray`] with an [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use bvindex::aabb::Aabb;
    /// use bvindex::ray::Ray;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
    /// let aabb = Aabb::with_bounds(Point3::new(99.9, -1.0, -1.0), Point3::new(100.1, 1.0, 1.0));
    ///
    /// assert!(ray.intersects_aabb(&aabb));
    /// ```
    pub fn intersects_aabb(&self, aabb: &Aabb<T, D>) -> bool {
        self.intersection_distance(aabb).is_some()
    }
}

impl<T: BHValue> Ray<T, 3> {
    /// Implementation of the
    /// [Möller-Trumbore triangle/ray intersection algorithm](https://en.wikipedia.org/wiki/M%C3%B6ller%E2%80%93Trumbore_intersection_algorithm).
    ///
    /// Returns the distance to the intersection, or [`None`] if the ray misses the triangle
    /// or hits it from behind. This is the shape of hit test that
    /// [`BoundedVolumeIndex::intersects_ray_with`] expects from mesh-level callbacks.
    ///
    /// [`BoundedVolumeIndex::intersects_ray_with`]: crate::index::BoundedVolumeIndex::intersects_ray_with
    #[allow(clippy::many_single_char_names)]
    pub fn intersects_triangle(
        &self,
        a: &Point<T, 3>,
        b: &Point<T, 3>,
        c: &Point<T, 3>,
    ) -> Option<T> {
        let a_to_b = *b - *a;
        let a_to_c = *c - *a;

        // Determinant of [dir, a_to_b, a_to_c]; only front faces have a positive one.
        let u_vec = self.direction.cross(&a_to_c);
        let det = a_to_b.dot(&u_vec);
        if det < T::epsilon() {
            return None;
        }

        let inv_det = T::one() / det;
        let a_to_origin = self.origin - *a;

        let u = a_to_origin.dot(&u_vec) * inv_det;
        if u < T::zero() || u > T::one() {
            return None;
        }

        let v_vec = a_to_origin.cross(&a_to_b);
        let v = self.direction.dot(&v_vec) * inv_det;
        if v < T::zero() || u + v > T::one() {
            return None;
        }

        let distance = a_to_c.dot(&v_vec) * inv_det;
        if distance > T::epsilon() {
            Some(distance)
        } else {
            None
        }
    }
}

impl<T: BHValue, const D: usize> IntersectsAabb<T, D> for Ray<T, D> {
    fn intersects_aabb(&self, aabb: &Aabb<T, D>) -> bool {
        self.intersects_aabb(aabb)
    }
}

#[cfg(test)]
mod tests {
    use crate::testbase::{tuple_to_point, tuplevec_small_strategy, TAabb3, TPoint3, TRay3, TVector3, TupleVec};
    use float_eq::assert_float_eq;
    use proptest::prelude::*;

    /// Generates a random [`Ray`] which points at at a random [`Aabb`].
    fn gen_ray_to_aabb(data: (TupleVec, TupleVec, TupleVec)) -> (TRay3, TAabb3) {
        let aabb = TAabb3::empty()
            .grow(&tuple_to_point(&data.0))
            .grow(&tuple_to_point(&data.1));

        let center = aabb.center();
        let pos = tuple_to_point(&data.2);
        let ray = TRay3::new(pos, center - pos);
        (ray, aabb)
    }

    /// Make sure a ray can intersect an [`Aabb`] with no depth.
    #[test]
    fn ray_hits_zero_depth_aabb() {
        let ray = TRay3::new(TPoint3::new(0.0, 0.0, 0.0), TVector3::new(0.0, 0.0, 1.0));
        let aabb = TAabb3::with_bounds(TPoint3::new(-1.0, -1.0, 1.0), TPoint3::new(1.0, 1.0, 1.0));
        assert_eq!(ray.intersection_distance(&aabb), Some(1.0));
    }

    #[test]
    fn ray_starting_on_face_reports_exact_distance() {
        let ray = TRay3::new(TPoint3::new(0.0, -5.0, 0.0), TVector3::new(0.0, 1.0, 0.0));
        let aabb = TAabb3::with_bounds(TPoint3::new(0.0, 0.0, 0.0), TPoint3::new(10.0, 10.0, 10.0));
        assert_eq!(ray.intersection_distance(&aabb), Some(5.0));
    }

    #[test]
    fn ray_inside_aabb_hits_at_zero() {
        let ray = TRay3::new(TPoint3::new(1.0, 1.0, 1.0), TVector3::new(-1.0, 2.0, 0.5));
        let aabb = TAabb3::with_bounds(TPoint3::new(0.0, 0.0, 0.0), TPoint3::new(2.0, 2.0, 2.0));
        assert_eq!(ray.intersection_distance(&aabb), Some(0.0));
    }

    #[test]
    fn ray_misses_parallel_slab_and_empty_box() {
        let ray = TRay3::new(TPoint3::new(0.0, 20.0, 0.0), TVector3::new(1.0, 0.0, 0.0));
        let aabb = TAabb3::with_bounds(TPoint3::new(5.0, 0.0, -1.0), TPoint3::new(6.0, 10.0, 1.0));
        assert_eq!(ray.intersection_distance(&aabb), None);
        assert_eq!(ray.intersection_distance(&TAabb3::empty()), None);
    }

    #[test]
    fn ray_diagonal_distance() {
        let ray = TRay3::new(TPoint3::new(-1.0, -1.0, 0.5), TVector3::new(1.0, 1.0, 0.0));
        let aabb = TAabb3::with_bounds(TPoint3::new(0.0, 0.0, 0.0), TPoint3::new(1.0, 1.0, 1.0));
        let distance = ray.intersection_distance(&aabb).unwrap();
        assert_float_eq!(distance, 2.0_f32.sqrt(), abs <= 1e-5);
        assert_float_eq!(ray.point_at(distance).x, 0.0, abs <= 1e-5);
    }

    #[test]
    fn ray_hits_triangle_front_face_only() {
        let a = TPoint3::new(0.0, 0.0, 0.0);
        let b = TPoint3::new(1.0, 0.0, 0.0);
        let c = TPoint3::new(0.0, 1.0, 0.0);
        let front = TRay3::new(TPoint3::new(0.25, 0.25, 3.0), TVector3::new(0.0, 0.0, -1.0));
        let back = TRay3::new(TPoint3::new(0.25, 0.25, -3.0), TVector3::new(0.0, 0.0, 1.0));
        let beside = TRay3::new(TPoint3::new(2.0, 2.0, 3.0), TVector3::new(0.0, 0.0, -1.0));

        let distance = front.intersects_triangle(&a, &b, &c).unwrap();
        assert_float_eq!(distance, 3.0, abs <= 1e-5);
        assert_eq!(back.intersects_triangle(&a, &b, &c), None);
        assert_eq!(beside.intersects_triangle(&a, &b, &c), None);
    }

    proptest! {
        // Test whether a `Ray` which points at the center of an `Aabb` intersects it.
        #[test]
        fn test_ray_points_at_aabb_center(data in (tuplevec_small_strategy(),
                                                   tuplevec_small_strategy(),
                                                   tuplevec_small_strategy())) {
            let (ray, aabb) = gen_ray_to_aabb(data);
            assert!(ray.intersects_aabb(&aabb));
        }

        // Test whether a `Ray` which points away from the center of an `Aabb`
        // does not intersect it, unless its origin is inside the `Aabb`.
        #[test]
        fn test_ray_points_from_aabb_center(data in (tuplevec_small_strategy(),
                                                     tuplevec_small_strategy(),
                                                     tuplevec_small_strategy())) {
            let (mut ray, aabb) = gen_ray_to_aabb(data);

            ray.direction = -ray.direction;
            ray.inv_direction = -ray.inv_direction;
            assert!(!ray.intersects_aabb(&aabb) || aabb.contains(&ray.origin));
        }
    }
}
