//! Batched queries on the rayon thread pool.

use rayon::prelude::*;

use crate::aabb::Aabb;
use crate::bounding_hierarchy::BHValue;
use crate::index::{BoundedVolumeIndex, Handle, RayHit};
use crate::ray::Ray;

impl<T: BHValue, const D: usize> BoundedVolumeIndex<T, D> {
    /// Runs [`BoundedVolumeIndex::intersects_ray`] for every ray in parallel. The results are
    /// in the order of `rays`.
    pub fn intersects_rays_par(&self, rays: &[Ray<T, D>]) -> Vec<Option<RayHit<T>>> {
        rays.par_iter().map(|ray| self.intersects_ray(ray)).collect()
    }

    /// Runs [`BoundedVolumeIndex::within_bound_box`] for every box in parallel. The results are
    /// in the order of `boxes`.
    pub fn within_bound_boxes_par(&self, boxes: &[Aabb<T, D>]) -> Vec<Vec<Handle>> {
        boxes.par_iter().map(|aabb| self.within_bound_box(aabb)).collect()
    }
}
