//! Analytic signed distance functions for sampling test and demo grids.
//!
//! All shapes follow the extractor's sign convention: negative inside,
//! positive outside. Coordinates are in grid units.

use nalgebra::{Point3, Vector3};

use crate::error::SurfaceNetsResult;
use crate::field::ScalarGrid;

/// A built-in signed distance shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SdfShape {
    /// Ball around `center`.
    Sphere { center: Point3<f32>, radius: f32 },
    /// Half-space below `y = level`.
    Plane { level: f32 },
    /// Axis-aligned box.
    Box {
        center: Point3<f32>,
        half_extents: Vector3<f32>,
    },
    /// Heightfield `y - h(x, z)` with a smooth rolling height.
    Terrain {
        base: f32,
        amplitude: f32,
        frequency: f32,
    },
}

impl SdfShape {
    /// Sphere centred in a grid of `size` samples with radius `(size - 1) / 3`.
    pub fn centered_sphere(size: usize) -> Self {
        let extent = size.saturating_sub(1) as f32;
        Self::Sphere {
            center: Point3::new(extent * 0.5, extent * 0.5, extent * 0.5),
            radius: extent / 3.0,
        }
    }

    /// Box centred in a grid of `size` samples, a quarter of the grid per side.
    pub fn centered_box(size: usize) -> Self {
        let extent = size.saturating_sub(1) as f32;
        Self::Box {
            center: Point3::new(extent * 0.5, extent * 0.5, extent * 0.5),
            half_extents: Vector3::repeat(extent * 0.25),
        }
    }

    /// Rolling terrain sitting around half the grid height.
    pub fn terrain(size: usize) -> Self {
        let extent = size.saturating_sub(1) as f32;
        Self::Terrain {
            base: extent * 0.5,
            amplitude: extent * 0.25,
            frequency: 0.1,
        }
    }

    /// Signed distance at `p`.
    ///
    /// Exact for the sphere, plane and box; the terrain value is only a
    /// bound on the distance.
    pub fn eval(&self, p: Point3<f32>) -> f32 {
        match *self {
            Self::Sphere { center, radius } => sphere(p, center, radius),
            Self::Plane { level } => plane_y(p, level),
            Self::Box {
                center,
                half_extents,
            } => cuboid(p, center, half_extents),
            Self::Terrain {
                base,
                amplitude,
                frequency,
            } => p.y - terrain_height(p.x, p.z, base, amplitude, frequency),
        }
    }

    /// Sample the shape at every integer coordinate of a `size³` grid.
    pub fn sample(&self, size: usize) -> SurfaceNetsResult<ScalarGrid> {
        let shape = *self;
        ScalarGrid::from_fn(size, move |x, y, z| shape.eval(Point3::new(x, y, z)))
    }
}

/// Signed distance to a sphere.
#[inline]
pub fn sphere(p: Point3<f32>, center: Point3<f32>, radius: f32) -> f32 {
    (p - center).norm() - radius
}

/// Signed distance to the plane `y = level`, inside below.
#[inline]
pub fn plane_y(p: Point3<f32>, level: f32) -> f32 {
    p.y - level
}

/// Signed distance to an axis-aligned box.
pub fn cuboid(p: Point3<f32>, center: Point3<f32>, half_extents: Vector3<f32>) -> f32 {
    let q = (p - center).abs() - half_extents;
    let outside = q.sup(&Vector3::zeros()).norm();
    let inside = q.max().min(0.0);
    outside + inside
}

/// Height of the rolling terrain at `(x, z)`.
pub fn terrain_height(x: f32, z: f32, base: f32, amplitude: f32, frequency: f32) -> f32 {
    let wave = (x * frequency).sin() * (z * frequency).cos()
        + 0.5 * (x * frequency * 2.3 + 1.7).sin() * (z * frequency * 1.9 + 0.4).sin();
    // wave is in [-1.5, 1.5]
    base + amplitude * wave / 1.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_sign() {
        let c = Point3::new(5.0, 5.0, 5.0);
        assert!(sphere(c, c, 2.0) < 0.0);
        assert_relative_eq!(sphere(Point3::new(7.0, 5.0, 5.0), c, 2.0), 0.0);
        assert_relative_eq!(sphere(Point3::new(10.0, 5.0, 5.0), c, 2.0), 3.0);
    }

    #[test]
    fn test_cuboid_distance() {
        let c = Point3::origin();
        let h = Vector3::new(1.0, 2.0, 3.0);
        assert_relative_eq!(cuboid(Point3::origin(), c, h), -1.0);
        assert_relative_eq!(cuboid(Point3::new(3.0, 0.0, 0.0), c, h), 2.0);
        assert_relative_eq!(cuboid(Point3::new(4.0, 6.0, 0.0), c, h), 5.0);
    }

    #[test]
    fn test_terrain_height_range() {
        for i in 0..100 {
            let x = i as f32 * 0.77;
            let z = i as f32 * 1.31;
            let h = terrain_height(x, z, 8.0, 4.0, 0.1);
            assert!((4.0..=12.0).contains(&h));
        }
    }

    #[test]
    fn test_centered_sphere() {
        let SdfShape::Sphere { center, radius } = SdfShape::centered_sphere(31) else {
            panic!("expected sphere");
        };
        assert_eq!(center, Point3::new(15.0, 15.0, 15.0));
        assert_relative_eq!(radius, 10.0);
    }

    #[test]
    fn test_sample_grid() {
        let grid = SdfShape::Plane { level: 2.5 }.sample(4).unwrap();
        let field = grid.as_field().unwrap();
        assert_relative_eq!(field.value(0, 0, 0), -2.5);
        assert_relative_eq!(field.value(3, 3, 3), 0.5);
    }
}
