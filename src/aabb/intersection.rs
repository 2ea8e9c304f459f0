use nalgebra::Point;

use crate::{aabb::Aabb, bounding_hierarchy::BHValue};

/// A trait implemented by things that may or may not intersect an [`Aabb`] and, by extension,
/// things that can be used to query a [`BoundedVolumeIndex`].
///
/// [`BoundedVolumeIndex`]: crate::index::BoundedVolumeIndex
pub trait IntersectsAabb<T: BHValue, const D: usize> {
    /// Returns whether this object intersects an [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use bvindex::aabb::{Aabb, IntersectsAabb};
    /// use nalgebra::Point3;
    ///
    /// struct XyPlane;
    ///
    /// impl IntersectsAabb<f32, 3> for XyPlane {
    ///     fn intersects_aabb(&self, aabb: &Aabb<f32, 3>) -> bool {
    ///         aabb.min[2] <= 0.0 && aabb.max[2] >= 0.0
    ///     }
    /// }
    ///
    /// let xy_plane = XyPlane;
    /// let aabb = Aabb::with_bounds(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
    /// assert!(xy_plane.intersects_aabb(&aabb));
    /// ```
    fn intersects_aabb(&self, aabb: &Aabb<T, D>) -> bool;
}

/// Touching boxes intersect. The empty [`Aabb`] intersects nothing.
impl<T: BHValue, const D: usize> IntersectsAabb<T, D> for Aabb<T, D> {
    fn intersects_aabb(&self, aabb: &Aabb<T, D>) -> bool {
        for i in 0..D {
            if self.max[i] < aabb.min[i] || aabb.max[i] < self.min[i] {
                return false;
            }
        }
        !self.is_empty() && !aabb.is_empty()
    }
}

impl<T: BHValue, const D: usize> IntersectsAabb<T, D> for Point<T, D> {
    fn intersects_aabb(&self, aabb: &Aabb<T, D>) -> bool {
        aabb.contains(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::aabb::IntersectsAabb;
    use crate::testbase::{TAabb3, TPoint3};

    #[test]
    fn test_touching_boxes_intersect() {
        let a = TAabb3::with_bounds(TPoint3::new(0.0, 0.0, 0.0), TPoint3::new(1.0, 1.0, 1.0));
        let b = TAabb3::with_bounds(TPoint3::new(1.0, 0.0, 0.0), TPoint3::new(2.0, 1.0, 1.0));
        let c = TAabb3::with_bounds(TPoint3::new(1.5, 0.0, 0.0), TPoint3::new(2.0, 1.0, 1.0));
        assert!(a.intersects_aabb(&b));
        assert!(b.intersects_aabb(&a));
        assert!(!a.intersects_aabb(&c));
    }

    #[test]
    fn test_empty_box_intersects_nothing() {
        let a = TAabb3::with_bounds(TPoint3::new(0.0, 0.0, 0.0), TPoint3::new(1.0, 1.0, 1.0));
        assert!(!a.intersects_aabb(&TAabb3::empty()));
        assert!(!TAabb3::empty().intersects_aabb(&a));
        assert!(!TAabb3::infinite().intersects_aabb(&TAabb3::empty()));
    }

    #[test]
    fn test_point_intersects_containing_box() {
        let a = TAabb3::with_bounds(TPoint3::new(0.0, 0.0, 0.0), TPoint3::new(1.0, 1.0, 1.0));
        assert!(TPoint3::new(0.5, 1.0, 0.0).intersects_aabb(&a));
        assert!(!TPoint3::new(0.5, 1.5, 0.0).intersects_aabb(&a));
    }
}
