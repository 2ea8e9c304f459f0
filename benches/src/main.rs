use std::{hint::black_box, time::Instant};

use bvindex::{aabb::Aabb, index::BoundedVolumeIndex, ray::Ray};
use clap::Parser;
use nalgebra::{Point3, Vector3};
use rand::{rng, Rng};

/// Measures how much faster nearest-hit ray casts against random triangles get with a
/// `BoundedVolumeIndex` compared to testing every triangle, and prints the median speedup.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(long)]
    rays: usize,
    #[arg(long)]
    triangles: usize,
    #[arg(long)]
    samples: usize,
    /// Also measure the time it takes to build the index.
    #[arg(long)]
    include_build: bool,
}

fn main() {
    let cli = Cli::parse();
    let mut rng = rng();

    let mut samples = Vec::new();
    let mut rays = Vec::new();
    let mut triangles = Vec::new();

    for i in 0..cli.samples {
        rays.clear();
        triangles.clear();

        for _ in 0..cli.rays {
            rays.push(Ray::<f32, 3>::new(
                Point3::new(
                    rng.random_range(-1.0..=1.0),
                    rng.random_range(-1.0..=1.0),
                    rng.random_range(-1.0..=1.0),
                ),
                Vector3::new(
                    rng.random_range(-1.0..=1.0),
                    rng.random_range(-1.0..=1.0),
                    rng.random_range(-1.0..=1.0),
                ),
            ));
        }

        for _ in 0..cli.triangles {
            let center = Point3::new(
                rng.random_range(-1000.0..=1000.0),
                rng.random_range(-1000.0..=1000.0),
                rng.random_range(-1000.0..=1000.0),
            );
            let mut corner = || {
                center
                    + Vector3::new(
                        rng.random_range(-1.0..=1.0),
                        rng.random_range(-1.0..=1.0),
                        rng.random_range(-1.0..=1.0),
                    )
            };
            let (a, b, c) = (corner(), corner(), corner());
            let aabb = Aabb::empty().grow(&a).grow(&b).grow(&c);
            if aabb.is_valid() {
                triangles.push(Triangle { a, b, c, aabb });
            }
        }

        let index = build_index(&triangles);

        let mut brute_force_duration = f64::NAN;
        let mut index_duration = f64::NAN;

        let mut measure_brute_force = |triangles: &[Triangle]| {
            let start_brute_force = Instant::now();
            for ray in &rays {
                black_box(
                    black_box(&triangles)
                        .iter()
                        .filter_map(|triangle| triangle.intersect(ray))
                        .fold(f32::INFINITY, f32::min),
                );
            }
            brute_force_duration = start_brute_force.elapsed().as_secs_f64();
        };

        let mut measure_index = |triangles: &[Triangle]| {
            let start_index = Instant::now();
            let rebuilt;
            let index = if cli.include_build {
                rebuilt = build_index(black_box(triangles));
                &rebuilt
            } else {
                &index
            };
            for ray in &rays {
                black_box(index.intersects_ray_with(black_box(ray), |handle| {
                    triangles[handle.index()].intersect(ray)
                }));
            }
            index_duration = start_index.elapsed().as_secs_f64();
        };

        // Flip order to minimize bias due to caching.
        if i % 2 == 0 {
            measure_index(&triangles);
            measure_brute_force(&triangles);
        } else {
            measure_brute_force(&triangles);
            measure_index(&triangles);
        }

        let index_speedup = brute_force_duration / index_duration;
        samples.push(index_speedup);
    }

    samples.sort_by(|a, b| a.total_cmp(b));

    // Median.
    println!("{}", samples[cli.samples / 2]);
}

/// Handles are issued in insertion order, so they double as triangle indices.
fn build_index(triangles: &[Triangle]) -> BoundedVolumeIndex<f32, 3> {
    let mut index = BoundedVolumeIndex::with_capacity(triangles.len());
    for triangle in triangles {
        index.add(triangle.aabb);
    }
    index
}

struct Triangle {
    a: Point3<f32>,
    b: Point3<f32>,
    c: Point3<f32>,
    aabb: Aabb<f32, 3>,
}

impl Triangle {
    fn intersect(&self, ray: &Ray<f32, 3>) -> Option<f32> {
        ray.intersects_triangle(&self.a, &self.b, &self.c)
    }
}
