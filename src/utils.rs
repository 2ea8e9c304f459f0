//! Utilities module.

use nalgebra::Scalar;

use crate::bounding_hierarchy::BHValue;

/// Fast floating point minimum. Matches the semantics of `if x < y { x } else { y }`,
/// which differs from `x.min(y)` only for signed zeros and NaNs.
///
/// Note: This exists because [`std::cmp::min`] requires Ord which floating point types do not satisfy
#[inline(always)]
pub fn fast_min<T: Scalar + Copy + PartialOrd>(x: T, y: T) -> T {
    if x < y {
        x
    } else {
        y
    }
}

/// Fast floating point maximum. Matches the semantics of `if x > y { x } else { y }`.
#[inline(always)]
pub fn fast_max<T: Scalar + Copy + PartialOrd>(x: T, y: T) -> T {
    if x > y {
        x
    } else {
        y
    }
}

/// Halfway between `x` and `y`. Never forms `x + y` or `y - x`, so the result is finite for
/// any two finite values.
#[inline(always)]
pub fn midpoint<T: BHValue>(x: T, y: T) -> T {
    let two = T::one() + T::one();
    x / two + y / two
}
