//! This module holds the [`Ray`] definition and its intersection tests.
mod ray_impl;

pub use self::ray_impl::*;
