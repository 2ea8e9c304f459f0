//! This module defines the [`BHValue`] trait for the scalar types an index can be built over.

use nalgebra::{
    ClosedAddAssign, ClosedDivAssign, ClosedMulAssign, ClosedSubAssign, Scalar, SimdPartialOrd,
};
use num_traits::{Float, FromPrimitive, ToPrimitive};
use std::fmt::Display;

/// Encapsulates the required traits for the value type used in the index.
///
/// Implemented automatically for `f32` and `f64`.
pub trait BHValue:
    Scalar
    + Copy
    + FromPrimitive
    + ToPrimitive
    + ClosedSubAssign
    + ClosedAddAssign
    + ClosedMulAssign
    + ClosedDivAssign
    + SimdPartialOrd
    + Float
    + Display
    + Send
    + Sync
{
}

impl<T> BHValue for T where
    T: Scalar
        + Copy
        + FromPrimitive
        + ToPrimitive
        + ClosedSubAssign
        + ClosedAddAssign
        + ClosedMulAssign
        + ClosedDivAssign
        + SimdPartialOrd
        + Float
        + Display
        + Send
        + Sync
{
}
