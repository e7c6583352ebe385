//! Dual vertex placement by averaging edge zero crossings.

use nalgebra::{Point3, Vector3};

use crate::classify::ClassificationMask;
use crate::field::ScalarField;
use crate::tables::{CORNER_OFFSETS, CUBE_EDGES};

/// A dual vertex placed inside a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedVertex {
    /// Grid-space position.
    pub position: Point3<f32>,
    /// Number of cell edges that crossed the surface.
    pub crossings: usize,
}

/// Point where the field crosses zero on the segment `p0 -> p1`.
///
/// `s0` and `s1` must have opposite classification, so `s1 - s0` is non-zero.
#[inline]
pub fn edge_crossing(p0: Point3<f32>, p1: Point3<f32>, s0: f32, s1: f32) -> Point3<f32> {
    let t = (0.0 - s0) / (s1 - s0);
    p0 + (p1 - p0) * t
}

/// Place the dual vertex of `cell` at the mean of its edge crossings.
///
/// Returns `None` for trivial masks, which have no crossing edges.
pub fn place_vertex(
    field: &ScalarField<'_>,
    cell: [usize; 3],
    mask: ClassificationMask,
) -> Option<PlacedVertex> {
    if mask.is_trivial() {
        return None;
    }

    let mut sum = Vector3::<f32>::zeros();
    let mut crossings = 0usize;

    for [c0, c1] in CUBE_EDGES {
        if !mask.crosses(c0, c1) {
            continue;
        }

        let p0 = corner_point(cell, c0);
        let p1 = corner_point(cell, c1);
        let s0 = field.sample(cell, c0);
        let s1 = field.sample(cell, c1);
        sum += edge_crossing(p0, p1, s0, s1).coords;
        crossings += 1;
    }

    // A non-trivial mask always crosses at least two edges.
    debug_assert!(crossings >= 2);

    Some(PlacedVertex {
        position: Point3::from(sum / crossings as f32),
        crossings,
    })
}

#[inline]
fn corner_point(cell: [usize; 3], corner: usize) -> Point3<f32> {
    let [dx, dy, dz] = CORNER_OFFSETS[corner];
    Point3::new(
        (cell[0] + dx) as f32,
        (cell[1] + dy) as f32,
        (cell[2] + dz) as f32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::field::ScalarGrid;
    use approx::assert_relative_eq;

    #[test]
    fn test_edge_crossing_midpoint() {
        let p = edge_crossing(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            -1.0,
            1.0,
        );
        assert_relative_eq!(p.x, 0.5);
    }

    #[test]
    fn test_edge_crossing_at_zero_endpoint() {
        // A zero sample classifies as outside; the crossing sits on it.
        let p = edge_crossing(
            Point3::new(2.0, 3.0, 4.0),
            Point3::new(2.0, 4.0, 4.0),
            -1.0,
            0.0,
        );
        assert_relative_eq!(p.y, 4.0);
    }

    #[test]
    fn test_trivial_mask_has_no_vertex() {
        let grid = ScalarGrid::filled(2, 1.0).unwrap();
        let field = grid.as_field().unwrap();
        assert!(place_vertex(&field, [0, 0, 0], ClassificationMask::EMPTY).is_none());
        assert!(place_vertex(&field, [0, 0, 0], ClassificationMask::FULL).is_none());
    }

    #[test]
    fn test_plane_vertex_position() {
        // y = 0.25 plane: the 4 vertical edges cross at y = 0.25.
        let grid = ScalarGrid::from_fn(2, |_, y, _| y - 0.25).unwrap();
        let field = grid.as_field().unwrap();
        let mask = classify(&field, [0, 0, 0]);
        let v = place_vertex(&field, [0, 0, 0], mask).unwrap();

        assert_eq!(v.crossings, 4);
        assert_relative_eq!(v.position.x, 0.5, epsilon = 1e-6);
        assert_relative_eq!(v.position.y, 0.25, epsilon = 1e-6);
        assert_relative_eq!(v.position.z, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_single_corner_vertex() {
        // Only corner 0 inside: 3 crossing edges, vertex near that corner.
        let grid = ScalarGrid::from_fn(2, |x, y, z| {
            if x + y + z == 0.0 { -1.0 } else { 1.0 }
        })
        .unwrap();
        let field = grid.as_field().unwrap();
        let mask = classify(&field, [0, 0, 0]);
        let v = place_vertex(&field, [0, 0, 0], mask).unwrap();

        assert_eq!(v.crossings, 3);
        // Each crossing is at 0.5 along one axis from the origin.
        assert_relative_eq!(v.position.x, 0.5 / 3.0, epsilon = 1e-6);
        assert_relative_eq!(v.position.y, 0.5 / 3.0, epsilon = 1e-6);
        assert_relative_eq!(v.position.z, 0.5 / 3.0, epsilon = 1e-6);
    }
}
