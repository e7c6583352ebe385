//! Bounding box of the cells that produced geometry.

use nalgebra::{Point3, Vector3};

/// Flat layout used when writing bounds into a 6-float buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundsLayout {
    /// `[center.x, center.y, center.z, half_extent.x, half_extent.y, half_extent.z]`.
    #[default]
    CenterExtent,
    /// `[min.x, min.y, min.z, max.x, max.y, max.z]`.
    MinMax,
}

/// Axis-aligned box in grid units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner.
    pub min: Point3<f32>,
    /// Maximum corner.
    pub max: Point3<f32>,
}

impl Bounds {
    /// Center of the box.
    #[inline]
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Half of the box size along each axis.
    #[inline]
    pub fn half_extent(&self) -> Vector3<f32> {
        (self.max - self.min) * 0.5
    }

    /// Flatten into the requested layout.
    pub fn to_array(&self, layout: BoundsLayout) -> [f32; 6] {
        match layout {
            BoundsLayout::CenterExtent => {
                let c = self.center();
                let e = self.half_extent();
                [c.x, c.y, c.z, e.x, e.y, e.z]
            }
            BoundsLayout::MinMax => [
                self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z,
            ],
        }
    }
}

/// Running min/max that starts empty.
///
/// Nothing is reported until the first point is added, so an extraction far
/// from the origin never gets a box stretched to include it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsAccumulator {
    bounds: Option<Bounds>,
}

impl BoundsAccumulator {
    /// Empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow the box to contain a cell coordinate.
    #[inline]
    pub fn extend_cell(&mut self, cell: [usize; 3]) {
        self.extend(Point3::new(cell[0] as f32, cell[1] as f32, cell[2] as f32));
    }

    /// Grow the box to contain `p`.
    #[inline]
    pub fn extend(&mut self, p: Point3<f32>) {
        self.bounds = Some(match self.bounds {
            None => Bounds { min: p, max: p },
            Some(b) => Bounds {
                min: b.min.inf(&p),
                max: b.max.sup(&p),
            },
        });
    }

    /// Whether no point has been added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// The accumulated box, or `None` if empty.
    #[inline]
    pub fn finish(self) -> Option<Bounds> {
        self.bounds
    }
}
