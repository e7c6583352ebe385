//! Fixed lookup tables describing the unit cell.

/// Offsets of the 8 cell corners relative to the cell's lower corner.
///
/// Corners 0-3 walk the `y = 0` face, corners 4-7 the `y = 1` face in the
/// same rotation. Bit `i` of a classification mask refers to corner `i`.
pub const CORNER_OFFSETS: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [1, 0, 1],
    [0, 0, 1],
    [0, 1, 0],
    [1, 1, 0],
    [1, 1, 1],
    [0, 1, 1],
];

/// The 12 cell edges as pairs of corner indices.
pub const CUBE_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// A primal edge leaving corner 0 of a cell along one axis, with the quad of
/// neighbouring cells that share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisEdge {
    /// Axis index (0 = x, 1 = y, 2 = z).
    pub axis: usize,
    /// Corner adjacent to corner 0 along this axis.
    pub corner: usize,
    /// Backward offsets of the 4 cells around the edge, in quad order.
    pub quad: [[usize; 3]; 4],
}

/// Primal edges stitched by every interior cell, in emission order.
///
/// The quad cells are the current cell and the cells one step back along the
/// two other axes, separately and together.
pub const AXIS_EDGES: [AxisEdge; 3] = [
    AxisEdge {
        axis: 0,
        corner: 1,
        quad: [[0, 0, 0], [0, 0, 1], [0, 1, 1], [0, 1, 0]],
    },
    AxisEdge {
        axis: 2,
        corner: 3,
        quad: [[0, 0, 0], [0, 1, 0], [1, 1, 0], [1, 0, 0]],
    },
    AxisEdge {
        axis: 1,
        corner: 4,
        quad: [[0, 0, 0], [1, 0, 0], [1, 0, 1], [0, 0, 1]],
    },
];
