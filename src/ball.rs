//! Balls, including circles and spheres.

use nalgebra::Point;

use crate::aabb::{Aabb, Bounded, IntersectsAabb};
use crate::bounding_hierarchy::BHValue;

/// In 2D, a circle. In 3D, a sphere. Used for sphere queries against a
/// [`BoundedVolumeIndex`](crate::index::BoundedVolumeIndex).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ball<T: BHValue, const D: usize> {
    /// The center of the ball.
    pub center: Point<T, D>,
    /// The radius of the ball.
    pub radius: T,
}

impl<T: BHValue, const D: usize> Ball<T, D> {
    /// Creates a [`Ball`] with the given `center` and `radius`.
    ///
    /// # Panics
    /// Panics, in debug mode, if the radius is negative.
    ///
    /// # Examples
    /// ```
    /// use bvindex::ball::Ball;
    /// use nalgebra::Point3;
    ///
    /// let ball = Ball::new(Point3::new(1.0, 1.0, 1.0), 1.0);
    /// assert_eq!(ball.center, Point3::new(1.0, 1.0, 1.0));
    /// assert_eq!(ball.radius, 1.0)
    /// ```
    pub fn new(center: Point<T, D>, radius: T) -> Self {
        debug_assert!(radius >= T::zero(), "Tried to create a ball with a negative radius.");
        Self { center, radius }
    }

    /// Returns true if this [`Ball`] contains the [`Point`].
    pub fn contains(&self, point: &Point<T, D>) -> bool {
        let mut distance_squared = T::zero();
        for i in 0..D {
            distance_squared += (point[i] - self.center[i]).powi(2);
        }
        distance_squared <= self.radius.powi(2)
    }

    /// Returns true if this [`Ball`] intersects the [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use bvindex::{aabb::Aabb, ball::Ball};
    /// use nalgebra::Point3;
    ///
    /// let ball = Ball::new(Point3::new(1.0, 1.0, 1.0), 1.0);
    /// let near = Aabb::with_bounds(Point3::new(1.25, 1.25, 1.25), Point3::new(3.0, 3.0, 3.0));
    /// let far = Aabb::with_bounds(Point3::new(2.5, 2.5, 2.5), Point3::new(3.0, 3.0, 3.0));
    ///
    /// assert!(ball.intersects_aabb(&near));
    /// assert!(!ball.intersects_aabb(&far));
    /// ```
    pub fn intersects_aabb(&self, aabb: &Aabb<T, D>) -> bool {
        if aabb.is_empty() {
            return false;
        }
        self.contains(&aabb.closest_point(&self.center))
    }
}

impl<T: BHValue, const D: usize> IntersectsAabb<T, D> for Ball<T, D> {
    fn intersects_aabb(&self, aabb: &Aabb<T, D>) -> bool {
        self.intersects_aabb(aabb)
    }
}

impl<T: BHValue, const D: usize> Bounded<T, D> for Ball<T, D> {
    fn aabb(&self) -> Aabb<T, D> {
        let mut min = self.center;
        let mut max = self.center;
        for i in 0..D {
            min[i] -= self.radius;
            max[i] += self.radius;
        }
        Aabb::with_bounds(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::Ball;
    use crate::aabb::Bounded;
    use crate::testbase::{TAabb3, TPoint3};

    #[test]
    fn ball_contains() {
        let ball = Ball::new(TPoint3::new(3.0, 4.0, 5.0), 1.5);

        // Ball should contain its own center.
        assert!(ball.contains(&ball.center));

        // Test some manually-selected points.
        let just_inside = TPoint3::new(3.04605, 3.23758, 3.81607);
        let just_outside = TPoint3::new(3.06066, 3.15813, 3.70917);
        assert!(ball.contains(&just_inside));
        assert!(!ball.contains(&just_outside));
    }

    #[test]
    fn ball_misses_box_near_its_bounding_corner() {
        let ball = Ball::new(TPoint3::new(0.0, 0.0, 0.0), 1.0);
        let corner = TAabb3::with_bounds(TPoint3::new(0.8, 0.8, 0.8), TPoint3::new(1.0, 1.0, 1.0));
        assert!(ball.aabb().contains_aabb(&corner));
        assert!(!ball.intersects_aabb(&corner));
        assert!(!ball.intersects_aabb(&TAabb3::empty()));
    }
}
