//! Extraction parameters.

use crate::bounds::BoundsLayout;
use crate::error::{SurfaceNetsError, SurfaceNetsResult};
use crate::normals::DEFAULT_NORMAL_STEP;

/// Parameters for surface extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceNetsParams {
    /// Estimate a normal per vertex.
    pub compute_normals: bool,
    /// Estimate a tangent per vertex (derived from the normal).
    pub compute_tangents: bool,
    /// Central-difference step for normal estimation, in grid units.
    pub normal_step: f32,
    /// Layout used when writing bounds into a flat buffer.
    pub bounds_layout: BoundsLayout,
    /// Run cell classification and vertex placement on the rayon pool.
    ///
    /// Faces are still stitched in scan order, so the output is identical
    /// to the serial sweep.
    pub parallel: bool,
}

impl Default for SurfaceNetsParams {
    fn default() -> Self {
        Self {
            compute_normals: true,
            compute_tangents: true,
            normal_step: DEFAULT_NORMAL_STEP,
            bounds_layout: BoundsLayout::CenterExtent,
            parallel: false,
        }
    }
}

impl SurfaceNetsParams {
    /// Positions and indices only.
    pub fn positions_only() -> Self {
        Self {
            compute_normals: false,
            compute_tangents: false,
            ..Default::default()
        }
    }

    /// Every vertex attribute, extracted in parallel.
    pub fn full() -> Self {
        Self {
            parallel: true,
            ..Default::default()
        }
    }

    /// Enable or disable normal estimation.
    pub fn with_normals(mut self, enabled: bool) -> Self {
        self.compute_normals = enabled;
        self
    }

    /// Enable or disable tangent estimation.
    pub fn with_tangents(mut self, enabled: bool) -> Self {
        self.compute_tangents = enabled;
        self
    }

    /// Set the finite-difference step.
    pub fn with_normal_step(mut self, h: f32) -> Self {
        self.normal_step = h;
        self
    }

    /// Set the bounds buffer layout.
    pub fn with_bounds_layout(mut self, layout: BoundsLayout) -> Self {
        self.bounds_layout = layout;
        self
    }

    /// Enable or disable parallel extraction.
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Whether any per-vertex attribute needs the gradient.
    #[inline]
    pub fn needs_gradient(&self) -> bool {
        self.compute_normals || self.compute_tangents
    }

    /// Check parameter values.
    pub fn validate(&self) -> SurfaceNetsResult<()> {
        if self.needs_gradient() && !(self.normal_step.is_finite() && self.normal_step > 0.0) {
            return Err(SurfaceNetsError::invalid_params(format!(
                "normal_step must be finite and positive, got {}",
                self.normal_step
            )));
        }
        Ok(())
    }
}
