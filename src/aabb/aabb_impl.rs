//! Axis Aligned Bounding Boxes.

use nalgebra::{Point, SVector};
use std::fmt;

use crate::bounding_hierarchy::BHValue;
use crate::utils::{fast_max, fast_min, midpoint};

/// [`Aabb`] struct.
///
/// An [`Aabb`] whose `min` is `+inf` and whose `max` is `-inf` on every axis is the
/// empty box. Joining anything with it yields the other operand unchanged.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb<T: BHValue, const D: usize> {
    /// Minimum coordinates
    pub min: Point<T, D>,

    /// Maximum coordinates
    pub max: Point<T, D>,
}

/// A trait implemented by things which can be bounded by an [`Aabb`].
pub trait Bounded<T: BHValue, const D: usize> {
    /// Returns the geometric bounds of this object in the form of an [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use bvindex::aabb::{Aabb, Bounded};
    /// use nalgebra::Point3;
    ///
    /// struct Something;
    ///
    /// impl Bounded<f32, 3> for Something {
    ///     fn aabb(&self) -> Aabb<f32, 3> {
    ///         let point1 = Point3::new(0.0, 0.0, 0.0);
    ///         let point2 = Point3::new(1.0, 1.0, 1.0);
    ///         Aabb::with_bounds(point1, point2)
    ///     }
    /// }
    ///
    /// let something = Something;
    /// let aabb = something.aabb();
    ///
    /// assert!(aabb.contains(&Point3::new(0.0, 0.0, 0.0)));
    /// assert!(aabb.contains(&Point3::new(1.0, 1.0, 1.0)));
    /// ```
    fn aabb(&self) -> Aabb<T, D>;
}

impl<T: BHValue, const D: usize> fmt::Display for Aabb<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Min bound: {}; Max bound: {}", self.min, self.max)
    }
}

impl<T: BHValue, const D: usize> Aabb<T, D> {
    /// Creates a new [`Aabb`] with the given bounds.
    ///
    /// # Examples
    /// ```
    /// use bvindex::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
    /// assert_eq!(aabb.min.x, -1.0);
    /// assert_eq!(aabb.max.z, 1.0);
    /// ```
    pub fn with_bounds(min: Point<T, D>, max: Point<T, D>) -> Self {
        Aabb { min, max }
    }

    /// Creates a new empty [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use bvindex::aabb::Aabb;
    ///
    /// let aabb = Aabb::<f32, 3>::empty();
    /// assert!(aabb.is_empty());
    /// assert!(aabb.min.x > aabb.max.x);
    /// ```
    pub fn empty() -> Self {
        Aabb {
            min: Point::from(SVector::repeat(T::infinity())),
            max: Point::from(SVector::repeat(T::neg_infinity())),
        }
    }

    /// Creates a new [`Aabb`] which covers the entire space.
    pub fn infinite() -> Self {
        Aabb {
            min: Point::from(SVector::repeat(T::neg_infinity())),
            max: Point::from(SVector::repeat(T::infinity())),
        }
    }

    /// Returns true if the [`Aabb`] is empty, i.e. `min` exceeds `max` on some axis.
    pub fn is_empty(&self) -> bool {
        (0..D).any(|i| self.min[i] > self.max[i])
    }

    /// Returns true if this [`Aabb`] may be stored in a
    /// [`BoundedVolumeIndex`](crate::index::BoundedVolumeIndex): every coordinate is finite
    /// and the box has a strictly positive extent along every axis.
    ///
    /// # Examples
    /// ```
    /// use bvindex::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let solid = Aabb::with_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
    /// let flat = Aabb::with_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0));
    /// let nan = Aabb::with_bounds(Point3::new(f32::NAN, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
    ///
    /// assert!(solid.is_valid());
    /// assert!(!flat.is_valid());
    /// assert!(!nan.is_valid());
    /// assert!(!Aabb::<f32, 3>::empty().is_valid());
    /// ```
    pub fn is_valid(&self) -> bool {
        (0..D).all(|i| {
            self.min[i].is_finite() && self.max[i].is_finite() && self.min[i] < self.max[i]
        })
    }

    /// Returns true if the [`Point`] is inside the [`Aabb`]. Points on the boundary count
    /// as inside.
    ///
    /// # Examples
    /// ```
    /// use bvindex::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
    /// assert!(aabb.contains(&Point3::new(0.5, -0.1, 1.0)));
    /// assert!(!aabb.contains(&Point3::new(0.5, -1.1, 0.0)));
    /// ```
    pub fn contains(&self, p: &Point<T, D>) -> bool {
        (0..D).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }

    /// Returns true if `other` lies completely inside this [`Aabb`].
    /// The empty [`Aabb`] is contained in everything.
    ///
    /// # Examples
    /// ```
    /// use bvindex::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let outer = Aabb::with_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 10.0));
    /// let inner = Aabb::with_bounds(Point3::new(1.0, 1.0, 1.0), Point3::new(10.0, 2.0, 2.0));
    /// let crossing = Aabb::with_bounds(Point3::new(9.0, 9.0, 9.0), Point3::new(11.0, 10.0, 10.0));
    ///
    /// assert!(outer.contains_aabb(&inner));
    /// assert!(!outer.contains_aabb(&crossing));
    /// ```
    pub fn contains_aabb(&self, other: &Aabb<T, D>) -> bool {
        other.is_empty()
            || (0..D).all(|i| other.min[i] >= self.min[i] && other.max[i] <= self.max[i])
    }

    /// Returns a new minimal [`Aabb`] which contains both this [`Aabb`] and `other`.
    ///
    /// # Examples
    /// ```
    /// use bvindex::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let a = Aabb::with_bounds(Point3::new(-1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 1.0));
    /// let b = Aabb::with_bounds(Point3::new(2.0, -3.0, 0.0), Point3::new(3.0, 0.0, 1.0));
    /// let joint = a.join(&b);
    ///
    /// assert_eq!(joint.min, Point3::new(-1.0, -3.0, 0.0));
    /// assert_eq!(joint.max, Point3::new(3.0, 1.0, 1.0));
    /// assert_eq!(Aabb::empty().join(&a), a);
    /// ```
    pub fn join(&self, other: &Aabb<T, D>) -> Aabb<T, D> {
        let mut joint = *self;
        joint.join_mut(other);
        joint
    }

    /// Mutable version of [`Aabb::join`].
    pub fn join_mut(&mut self, other: &Aabb<T, D>) {
        for i in 0..D {
            self.min[i] = fast_min(self.min[i], other.min[i]);
            self.max[i] = fast_max(self.max[i], other.max[i]);
        }
    }

    /// Returns a new minimal [`Aabb`] which contains both this [`Aabb`] and the [`Point`].
    pub fn grow(&self, other: &Point<T, D>) -> Aabb<T, D> {
        let mut grown = *self;
        grown.grow_mut(other);
        grown
    }

    /// Mutable version of [`Aabb::grow`].
    pub fn grow_mut(&mut self, other: &Point<T, D>) {
        for i in 0..D {
            self.min[i] = fast_min(self.min[i], other[i]);
            self.max[i] = fast_max(self.max[i], other[i]);
        }
    }

    /// Returns the size of this [`Aabb`] along every axis.
    pub fn size(&self) -> SVector<T, D> {
        self.max - self.min
    }

    /// Returns the center [`Point`] of the [`Aabb`]. Stays finite for finite boxes whose
    /// extent does not fit into `T`.
    ///
    /// # Examples
    /// ```
    /// use bvindex::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(-1.0, 0.0, 2.0), Point3::new(1.0, 10.0, 4.0));
    /// assert_eq!(aabb.center(), Point3::new(0.0, 5.0, 3.0));
    /// ```
    pub fn center(&self) -> Point<T, D> {
        Point::from(self.min.coords.zip_map(&self.max.coords, midpoint::<T>))
    }

    /// Returns the volume of this [`Aabb`]. The empty [`Aabb`] has zero volume.
    pub fn volume(&self) -> T {
        if self.is_empty() {
            return T::zero();
        }
        self.size().iter().fold(T::one(), |volume, extent| volume * *extent)
    }

    /// Returns the axis along which the [`Aabb`] is stretched the most.
    ///
    /// An axis other than the first one is only returned if it is strictly longer than every
    /// other axis. In every other case, ties included, the first axis wins. In three dimensions
    /// this means `z` if `z > x && z > y`, `y` if `y > x && y > z`, and `x` otherwise.
    ///
    /// # Examples
    /// ```
    /// use bvindex::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let min = Point3::new(0.0, 0.0, 0.0);
    /// assert_eq!(Aabb::with_bounds(min, Point3::new(1.0, 1.0, 2.0)).largest_axis(), 2);
    /// assert_eq!(Aabb::with_bounds(min, Point3::new(1.0, 3.0, 2.0)).largest_axis(), 1);
    /// assert_eq!(Aabb::with_bounds(min, Point3::new(1.0, 1.0, 1.0)).largest_axis(), 0);
    /// // `y` and `z` tie for the longest extent, so neither is strictly the longest.
    /// assert_eq!(Aabb::with_bounds(min, Point3::new(1.0, 2.0, 2.0)).largest_axis(), 0);
    /// ```
    pub fn largest_axis(&self) -> usize {
        let size = self.size();
        (1..D)
            .find(|&axis| (0..D).all(|other| other == axis || size[axis] > size[other]))
            .unwrap_or(0)
    }

    /// Returns the point inside this [`Aabb`] that is closest to `point`.
    pub fn closest_point(&self, point: &Point<T, D>) -> Point<T, D> {
        let mut closest = *point;
        for i in 0..D {
            closest[i] = fast_min(fast_max(point[i], self.min[i]), self.max[i]);
        }
        closest
    }
}

impl<T: BHValue, const D: usize> Default for Aabb<T, D> {
    fn default() -> Aabb<T, D> {
        Aabb::empty()
    }
}

impl<T: BHValue, const D: usize> Bounded<T, D> for Aabb<T, D> {
    fn aabb(&self) -> Aabb<T, D> {
        *self
    }
}

impl<T: BHValue, const D: usize> Bounded<T, D> for Point<T, D> {
    fn aabb(&self) -> Aabb<T, D> {
        Aabb::with_bounds(*self, *self)
    }
}
