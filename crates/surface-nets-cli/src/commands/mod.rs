//! Subcommand implementations.

pub mod extract;
pub mod info;

use anyhow::{Result, bail};
use nalgebra::{Point3, Vector3};
use serde::Serialize;
use surface_nets::{Bounds, ScalarGrid, SdfShape, required_capacity};

use crate::{ShapeArgs, ShapeKind};

/// Bounding box as reported in JSON output.
#[derive(Serialize)]
pub struct BoundsInfo {
    pub min: [f32; 3],
    pub max: [f32; 3],
    pub center: [f32; 3],
    pub half_extent: [f32; 3],
}

impl From<Bounds> for BoundsInfo {
    fn from(b: Bounds) -> Self {
        let c = b.center();
        let e = b.half_extent();
        Self {
            min: [b.min.x, b.min.y, b.min.z],
            max: [b.max.x, b.max.y, b.max.z],
            center: [c.x, c.y, c.z],
            half_extent: [e.x, e.y, e.z],
        }
    }
}

/// Resolve command-line shape arguments into a concrete shape.
pub fn build_shape(args: &ShapeArgs) -> Result<SdfShape> {
    if let Some(r) = args.radius {
        if !(r.is_finite() && r > 0.0) {
            bail!("radius must be finite and positive, got {}", r);
        }
    }
    if let Some(l) = args.level {
        if !l.is_finite() {
            bail!("level must be finite, got {}", l);
        }
    }

    let extent = args.size.saturating_sub(1) as f32;
    let mid = extent * 0.5;
    let center = Point3::new(mid, mid, mid);

    let shape = match args.shape {
        ShapeKind::Sphere => match args.radius {
            Some(radius) => SdfShape::Sphere { center, radius },
            None => SdfShape::centered_sphere(args.size),
        },
        ShapeKind::Plane => SdfShape::Plane {
            level: args.level.unwrap_or(mid),
        },
        ShapeKind::Box => match args.radius {
            Some(r) => SdfShape::Box {
                center,
                half_extents: Vector3::repeat(r),
            },
            None => SdfShape::centered_box(args.size),
        },
        ShapeKind::Terrain => match (SdfShape::terrain(args.size), args.level) {
            (
                SdfShape::Terrain {
                    amplitude,
                    frequency,
                    ..
                },
                Some(base),
            ) => SdfShape::Terrain {
                base,
                amplitude,
                frequency,
            },
            (shape, _) => shape,
        },
    };

    Ok(shape)
}

/// Sample a shape, warning when the grid is too small to hold any cell.
///
/// Grids whose output buffers could not be indexed are rejected before any
/// sample is allocated.
pub fn sample(shape: &SdfShape, size: usize, quiet: bool) -> Result<ScalarGrid> {
    required_capacity(size)?;
    if size < 2 {
        crate::output::warn(
            &format!("grid size {} has no cells; the mesh will be empty", size),
            quiet,
        );
    }
    Ok(shape.sample(size)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use surface_nets::{SurfaceNetsError, SurfaceNetsErrorCode};

    fn args(shape: ShapeKind, radius: Option<f32>, level: Option<f32>) -> ShapeArgs {
        ShapeArgs {
            shape,
            size: 17,
            radius,
            level,
        }
    }

    #[test]
    fn test_default_sphere_is_centered() {
        let shape = build_shape(&args(ShapeKind::Sphere, None, None)).unwrap();
        assert_eq!(shape, SdfShape::centered_sphere(17));
    }

    #[test]
    fn test_radius_overrides_sphere() {
        let shape = build_shape(&args(ShapeKind::Sphere, Some(3.0), None)).unwrap();
        assert_eq!(
            shape,
            SdfShape::Sphere {
                center: Point3::new(8.0, 8.0, 8.0),
                radius: 3.0
            }
        );
    }

    #[test]
    fn test_level_sets_plane_and_terrain() {
        let plane = build_shape(&args(ShapeKind::Plane, None, Some(4.5))).unwrap();
        assert_eq!(plane, SdfShape::Plane { level: 4.5 });

        let terrain = build_shape(&args(ShapeKind::Terrain, None, Some(6.0))).unwrap();
        assert!(matches!(terrain, SdfShape::Terrain { base, .. } if base == 6.0));
    }

    #[test]
    fn test_invalid_radius_rejected() {
        assert!(build_shape(&args(ShapeKind::Box, Some(-1.0), None)).is_err());
        assert!(build_shape(&args(ShapeKind::Sphere, Some(f32::NAN), None)).is_err());
    }

    #[test]
    fn test_oversized_grid_rejected_before_sampling() {
        // 1700³ samples would need ~20 GB; the size check must fail first.
        let err = sample(&SdfShape::centered_sphere(1700), 1700, true).unwrap_err();
        let err = err.downcast_ref::<SurfaceNetsError>().unwrap();
        assert_eq!(err.code(), SurfaceNetsErrorCode::GridTooLarge);
    }
}
