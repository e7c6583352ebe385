//! Cubic scalar fields and trilinear resampling.

use nalgebra::Point3;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{SurfaceNetsError, SurfaceNetsResult};
use crate::tables::CORNER_OFFSETS;

/// Read-only view over `size³` signed distance samples.
///
/// Samples are laid out as `x + y * size + z * size * size`. Negative values
/// are inside the surface, zero and positive values outside.
#[derive(Debug, Clone, Copy)]
pub struct ScalarField<'a> {
    samples: &'a [f32],
    size: usize,
}

impl<'a> ScalarField<'a> {
    /// Wrap a sample slice, checking that it holds exactly `size³` values.
    pub fn new(samples: &'a [f32], size: usize) -> SurfaceNetsResult<Self> {
        let expected = size
            .checked_mul(size)
            .and_then(|n| n.checked_mul(size))
            .ok_or(SurfaceNetsError::GridTooLarge { size })?;

        if samples.len() != expected {
            return Err(SurfaceNetsError::field_size_mismatch(
                size,
                expected,
                samples.len(),
            ));
        }

        Ok(Self { samples, size })
    }

    /// Number of samples along each axis.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The underlying samples.
    #[inline]
    pub fn samples(&self) -> &'a [f32] {
        self.samples
    }

    /// Number of cells along each axis (`size - 1`, or 0 for degenerate grids).
    #[inline]
    pub fn cells_per_axis(&self) -> usize {
        self.size.saturating_sub(1)
    }

    /// Convert 3D grid coordinates to linear index.
    #[inline]
    pub fn linearize(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.size + z * self.size * self.size
    }

    /// Convert linear index to 3D grid coordinates.
    #[inline]
    pub fn delinearize(&self, idx: usize) -> [usize; 3] {
        let plane = self.size * self.size;
        let z = idx / plane;
        let rem = idx % plane;
        [rem % self.size, rem / self.size, z]
    }

    /// Sample at an integer grid coordinate.
    ///
    /// # Panics
    /// Panics if any coordinate is `>= size`.
    #[inline]
    pub fn value(&self, x: usize, y: usize, z: usize) -> f32 {
        self.samples[self.linearize(x, y, z)]
    }

    /// Sample at corner `corner` (0-7) of `cell`.
    ///
    /// Cells are valid for coordinates in `[0, size - 2]`.
    #[inline]
    pub fn sample(&self, cell: [usize; 3], corner: usize) -> f32 {
        let [dx, dy, dz] = CORNER_OFFSETS[corner];
        self.value(cell[0] + dx, cell[1] + dy, cell[2] + dz)
    }

    /// Trilinearly interpolate the field at a continuous grid-space point.
    ///
    /// Blends along x, then y, then z, matching the linear model used for
    /// edge zero crossings. Points outside `[0, size - 1]` are clamped to the
    /// grid, so lookups never leave the sample array.
    pub fn trilinear_sample(&self, p: Point3<f32>) -> f32 {
        match self.size {
            0 => return 0.0,
            1 => return self.samples[0],
            _ => {}
        }

        let max = (self.size - 1) as f32;
        let (x0, xd) = self.split_axis(p.x, max);
        let (y0, yd) = self.split_axis(p.y, max);
        let (z0, zd) = self.split_axis(p.z, max);
        let (x1, y1, z1) = (x0 + 1, y0 + 1, z0 + 1);

        let c00 = lerp(self.value(x0, y0, z0), self.value(x1, y0, z0), xd);
        let c01 = lerp(self.value(x0, y0, z1), self.value(x1, y0, z1), xd);
        let c10 = lerp(self.value(x0, y1, z0), self.value(x1, y1, z0), xd);
        let c11 = lerp(self.value(x0, y1, z1), self.value(x1, y1, z1), xd);

        let c0 = lerp(c00, c10, yd);
        let c1 = lerp(c01, c11, yd);
        lerp(c0, c1, zd)
    }

    /// Base index in `[0, size - 2]` and fractional offset for one axis.
    #[inline]
    fn split_axis(&self, v: f32, max: f32) -> (usize, f32) {
        // NaN clamps to NaN; map it onto the lower face.
        let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, max) };
        let base = (v.floor() as usize).min(self.size - 2);
        (base, v - base as f32)
    }
}

/// Linear interpolation in the `a + (b - a) * t` form, exact when `a == b`.
#[inline]
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Owned cubic grid of samples.
///
/// Convenience storage for callers that generate a field from a closure;
/// borrow it with [`ScalarGrid::as_field`] to extract a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarGrid {
    /// Number of samples along each axis.
    pub size: usize,
    /// Samples in `x + y * size + z * size * size` order.
    pub values: Vec<f32>,
}

impl ScalarGrid {
    /// Create a grid with every sample set to `value`.
    pub fn filled(size: usize, value: f32) -> SurfaceNetsResult<Self> {
        let total = total_samples(size)?;
        Ok(Self {
            size,
            values: vec![value; total],
        })
    }

    /// Sample `f(x, y, z)` at every integer grid coordinate.
    ///
    /// Samples are evaluated on the rayon pool.
    pub fn from_fn<F>(size: usize, f: F) -> SurfaceNetsResult<Self>
    where
        F: Fn(f32, f32, f32) -> f32 + Sync,
    {
        let total = total_samples(size)?;
        let plane = size * size;

        let values: Vec<f32> = (0..total)
            .into_par_iter()
            .map(|idx| {
                let z = idx / plane;
                let rem = idx % plane;
                let y = rem / size;
                let x = rem % size;
                f(x as f32, y as f32, z as f32)
            })
            .collect();

        debug!(
            size,
            min_sdf = values.iter().copied().fold(f32::INFINITY, f32::min),
            max_sdf = values.iter().copied().fold(f32::NEG_INFINITY, f32::max),
            "Sampled scalar grid"
        );

        Ok(Self { size, values })
    }

    /// Borrow as a read-only field.
    pub fn as_field(&self) -> SurfaceNetsResult<ScalarField<'_>> {
        ScalarField::new(&self.values, self.size)
    }

    /// Total number of samples.
    #[inline]
    pub fn total_samples(&self) -> usize {
        self.values.len()
    }
}

fn total_samples(size: usize) -> SurfaceNetsResult<usize> {
    size.checked_mul(size)
        .and_then(|n| n.checked_mul(size))
        .ok_or(SurfaceNetsError::GridTooLarge { size })
}
