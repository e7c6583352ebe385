//! Face stitching between dual vertices of neighbouring cells.
//!
//! A cell only looks backward: each of the three primal edges leaving its
//! corner 0 is shared with three cells that precede it in scan order, so
//! their vertices are already in the [`VertexIndexMap`] when the cell is
//! visited.

use crate::classify::ClassificationMask;
use crate::error::{SurfaceNetsError, SurfaceNetsResult};
use crate::tables::AXIS_EDGES;

/// Marker for cells without a vertex.
pub const NO_VERTEX: u32 = u32::MAX;

/// Flat arena mapping cell coordinates to vertex ids.
///
/// Sized `size³` and keyed with the same `x + y * size + z * size²` layout as
/// the field, so a cell's key is the index of its corner-0 sample.
#[derive(Debug, Clone)]
pub struct VertexIndexMap {
    ids: Vec<u32>,
    size: usize,
}

impl VertexIndexMap {
    /// Map for a grid with `size` samples per axis.
    ///
    /// Fails with [`SurfaceNetsError::GridTooLarge`] when `size³` overflows or
    /// leaves no room below [`NO_VERTEX`] for the ids.
    pub fn new(size: usize) -> SurfaceNetsResult<Self> {
        let len = size
            .checked_mul(size)
            .and_then(|n| n.checked_mul(size))
            .filter(|&n| n <= NO_VERTEX as usize)
            .ok_or(SurfaceNetsError::GridTooLarge { size })?;
        Ok(Self {
            ids: vec![NO_VERTEX; len],
            size,
        })
    }

    #[inline]
    fn key(&self, cell: [usize; 3]) -> usize {
        cell[0] + cell[1] * self.size + cell[2] * self.size * self.size
    }

    /// Record the vertex owned by `cell`.
    #[inline]
    pub fn insert(&mut self, cell: [usize; 3], id: u32) {
        let key = self.key(cell);
        self.ids[key] = id;
    }

    /// Vertex owned by `cell`, if any.
    #[inline]
    pub fn get(&self, cell: [usize; 3]) -> Option<u32> {
        self.ids
            .get(self.key(cell))
            .copied()
            .filter(|&id| id != NO_VERTEX)
    }

    /// Forget every recorded vertex.
    pub fn clear(&mut self) {
        self.ids.fill(NO_VERTEX);
    }
}

/// Bounds-checked cursor over a caller-owned slice.
#[derive(Debug)]
pub(crate) struct SliceWriter<'a, T> {
    slice: &'a mut [T],
    len: usize,
}

impl<'a, T> SliceWriter<'a, T> {
    pub(crate) fn new(slice: &'a mut [T]) -> Self {
        Self { slice, len: 0 }
    }

    /// Elements written so far.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Append one element; `None` when the slice is full.
    #[inline]
    pub(crate) fn push(&mut self, value: T) -> Option<()> {
        let slot = self.slice.get_mut(self.len)?;
        *slot = value;
        self.len += 1;
        Some(())
    }
}

/// Write the two triangles of quad `q`, split along the `q0`-`q2` diagonal.
///
/// `inside_first` is bit 0 of the mask (corner 0 inside); it selects the
/// rotation so the right-hand normal points out of the surface.
pub fn quad_indices(q: [u32; 4], inside_first: bool) -> [u32; 6] {
    let [q0, q1, q2, q3] = q;
    if inside_first {
        [q0, q3, q2, q2, q1, q0]
    } else {
        [q0, q1, q2, q2, q3, q0]
    }
}

/// Emit the faces owned by `cell` and return how many quads were written.
///
/// Must only be called for cells with every coordinate `>= 1`; cells on the
/// minimum boundary layer have no backward neighbours and never emit faces.
pub(crate) fn stitch_cell(
    cell: [usize; 3],
    mask: ClassificationMask,
    map: &VertexIndexMap,
    out: &mut SliceWriter<'_, u32>,
) -> SurfaceNetsResult<usize> {
    debug_assert!(cell.iter().all(|&c| c >= 1));

    let inside_first = mask.is_inside(0);
    let mut quads = 0;

    for edge in AXIS_EDGES {
        if mask.is_inside(edge.corner) == inside_first {
            continue;
        }

        let mut q = [0u32; 4];
        for (slot, offset) in q.iter_mut().zip(edge.quad) {
            let neighbor = [
                cell[0] - offset[0],
                cell[1] - offset[1],
                cell[2] - offset[2],
            ];
            *slot = map
                .get(neighbor)
                .ok_or(SurfaceNetsError::MissingNeighborVertex { cell })?;
        }

        for index in quad_indices(q, inside_first) {
            out.push(index).ok_or_else(|| {
                SurfaceNetsError::buffer_too_small(
                    crate::error::BufferKind::Triangles,
                    out.len() + 1,
                    out.len(),
                )
            })?;
        }
        quads += 1;
    }

    Ok(quads)
}
