use bvindex::aabb::{Aabb, Bounded};
use bvindex::ball::Ball;
use bvindex::index::{BoundedVolumeIndex, Handle};
use bvindex::ray::Ray;
use nalgebra::{Point, SVector};

#[derive(Debug)]
struct Sphere {
    position: Point<f32, 3>,
    radius: f32,
}

impl Bounded<f32, 3> for Sphere {
    fn aabb(&self) -> Aabb<f32, 3> {
        let half_size = SVector::<f32, 3>::new(self.radius, self.radius, self.radius);
        let min = self.position - half_size;
        let max = self.position + half_size;
        Aabb::with_bounds(min, max)
    }
}

impl Sphere {
    /// Distance along `ray` to the front of the sphere.
    fn intersect(&self, ray: &Ray<f32, 3>) -> Option<f32> {
        let to_center = self.position - ray.origin;
        let along = to_center.dot(&ray.direction);
        let off_axis = to_center.norm_squared() - along * along;
        let radius_squared = self.radius * self.radius;
        if off_axis > radius_squared {
            return None;
        }
        let distance = along - (radius_squared - off_axis).sqrt();
        (distance >= 0.0).then_some(distance)
    }
}

pub fn main() {
    let mut spheres = Vec::new();
    for x in 0..32 {
        for y in 0..32 {
            for z in 0..32 {
                spheres.push(Sphere {
                    position: Point::<f32, 3>::new(x as f32, y as f32, z as f32) * 4.0,
                    radius: 1.5,
                });
            }
        }
    }

    // Adding the two outermost spheres first sets up the whole region, so no other insertion
    // has to rebuild the tree.
    let mut index = BoundedVolumeIndex::<f32, 3>::with_capacity(spheres.len());
    let mut sphere_at = Vec::with_capacity(spheres.len());
    for i in std::iter::once(0).chain((1..spheres.len()).rev()) {
        let handle = index.add(spheres[i].aabb());
        // Nothing was removed, so handles are issued in insertion order.
        assert_eq!(handle.index(), sphere_at.len());
        sphere_at.push(i);
    }
    let sphere_of = |handle: Handle| &spheres[sphere_at[handle.index()]];

    let origin = Point::<f32, 3>::new(-10.0, 0.3, 0.2);
    let direction = SVector::<f32, 3>::new(1.0, 0.0, 0.0);
    let ray = Ray::new(origin, direction);
    let hit = index.intersects_ray_with(&ray, |handle| sphere_of(handle).intersect(&ray));
    dbg!(hit.map(|hit| (sphere_of(hit.handle), hit.distance)));

    let ball = Ball::new(Point::<f32, 3>::new(64.0, 64.0, 64.0), 6.0);
    dbg!(index.within_bound_sphere(&ball).len());

    dbg!(index.entry_count(), index.bucket_count(), index.split_counts());
}
