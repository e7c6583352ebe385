//! Grid sweep that turns a scalar field into a triangle mesh.
//!
//! The sweep visits cells in lexicographic order (x outer, z inner). Every
//! non-trivial cell gets one vertex; every cell with all coordinates `>= 1`
//! then stitches quads to the vertices of the cells behind it. Output goes
//! into caller-owned buffers whose capacities are checked once, up front.

use std::time::Instant;

use nalgebra::{Vector3, Vector4};
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::bounds::{Bounds, BoundsAccumulator};
use crate::classify::{ClassificationMask, classify};
use crate::error::{BufferKind, SurfaceNetsError, SurfaceNetsResult};
use crate::field::ScalarField;
use crate::mesh::SurfaceMesh;
use crate::normals::{estimate_normal, estimate_tangent, pack_tangent};
use crate::params::SurfaceNetsParams;
use crate::tracing_ext::{OperationTimer, log_phase};
use crate::triangulate::{NO_VERTEX, SliceWriter, VertexIndexMap, stitch_cell};
use crate::vertex::{PlacedVertex, place_vertex};

/// Maximum index entries a single cell can emit (3 quads of 6).
pub const MAX_INDICES_PER_CELL: usize = 18;

/// Worst-case output sizes for a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCapacity {
    /// Vertex, normal and tangent buffer length (`size³`).
    pub vertices: usize,
    /// Triangle index buffer length (`size³ * 18`).
    pub triangle_indices: usize,
}

/// Buffer lengths callers must provide for a grid of `size` samples per axis.
///
/// Fails when the counts overflow `usize` or vertex ids would not fit in a
/// `u32`.
pub fn required_capacity(size: usize) -> SurfaceNetsResult<BufferCapacity> {
    let too_large = || SurfaceNetsError::GridTooLarge { size };

    let vertices = size
        .checked_mul(size)
        .and_then(|n| n.checked_mul(size))
        .ok_or_else(too_large)?;
    if vertices > NO_VERTEX as usize {
        return Err(too_large());
    }
    let triangle_indices = vertices
        .checked_mul(MAX_INDICES_PER_CELL)
        .ok_or_else(too_large)?;

    Ok(BufferCapacity {
        vertices,
        triangle_indices,
    })
}

/// Caller-owned output buffers.
///
/// Only a prefix of each buffer is written; trailing contents are left as
/// supplied.
#[derive(Debug)]
pub struct OutputBuffers<'a> {
    /// Vertex positions in grid units.
    pub vertices: &'a mut [[f32; 3]],
    /// Unit normals (zero where the gradient vanishes).
    pub normals: Option<&'a mut [[f32; 3]]>,
    /// Tangents as `[x, y, z, 0]`.
    pub tangents: Option<&'a mut [[f32; 4]]>,
    /// Triangle indices, three per triangle.
    pub triangles: &'a mut [u32],
    /// Bounding box of the contributing cells.
    pub bounds: Option<&'a mut [f32; 6]>,
}

impl<'a> OutputBuffers<'a> {
    /// Buffers for positions and indices only.
    pub fn new(vertices: &'a mut [[f32; 3]], triangles: &'a mut [u32]) -> Self {
        Self {
            vertices,
            normals: None,
            tangents: None,
            triangles,
            bounds: None,
        }
    }

    /// Attach a normal buffer.
    pub fn with_normals(mut self, normals: &'a mut [[f32; 3]]) -> Self {
        self.normals = Some(normals);
        self
    }

    /// Attach a tangent buffer.
    pub fn with_tangents(mut self, tangents: &'a mut [[f32; 4]]) -> Self {
        self.tangents = Some(tangents);
        self
    }

    /// Attach a bounds buffer.
    pub fn with_bounds(mut self, bounds: &'a mut [f32; 6]) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Reject buffers smaller than the worst case for `size`.
    pub fn check_capacity(&self, size: usize) -> SurfaceNetsResult<BufferCapacity> {
        let required = required_capacity(size)?;

        let check = |kind, provided: usize, needed: usize| {
            if provided < needed {
                Err(SurfaceNetsError::buffer_too_small(kind, needed, provided))
            } else {
                Ok(())
            }
        };

        check(BufferKind::Vertices, self.vertices.len(), required.vertices)?;
        if let Some(normals) = self.normals.as_deref() {
            check(BufferKind::Normals, normals.len(), required.vertices)?;
        }
        if let Some(tangents) = self.tangents.as_deref() {
            check(BufferKind::Tangents, tangents.len(), required.vertices)?;
        }
        check(
            BufferKind::Triangles,
            self.triangles.len(),
            required.triangle_indices,
        )?;

        Ok(required)
    }
}

/// Counts reported by an extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractSummary {
    /// Vertices written.
    pub vertex_count: usize,
    /// Triangle index entries written (three per triangle).
    pub triangle_index_count: usize,
    /// Box around the cells that produced vertices; `None` when empty.
    pub bounds: Option<Bounds>,
    /// Vertices whose gradient vanished (zero normal).
    pub degenerate_normals: usize,
}

impl ExtractSummary {
    /// Number of triangles written.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangle_index_count / 3
    }

    /// Whether no geometry was produced.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }
}

/// Lifecycle of a [`MeshExtractor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorState {
    /// Ready to run.
    Idle,
    /// Sweeping cells.
    Scanning,
    /// Last run completed.
    Done,
}

/// Everything computed for one non-trivial cell before it is committed.
#[derive(Debug, Clone, Copy)]
struct CellVertex {
    mask: ClassificationMask,
    vertex: PlacedVertex,
    normal: Vector3<f32>,
    tangent: Vector4<f32>,
}

/// Classify, place and shade one cell. `None` for trivial cells.
fn evaluate_cell(
    field: &ScalarField<'_>,
    cell: [usize; 3],
    params: &SurfaceNetsParams,
) -> Option<CellVertex> {
    let mask = classify(field, cell);
    let vertex = place_vertex(field, cell, mask)?;

    let (normal, tangent) = if params.needs_gradient() {
        let n = estimate_normal(field, vertex.position, params.normal_step);
        (n, pack_tangent(&estimate_tangent(&n)))
    } else {
        (Vector3::zeros(), Vector4::zeros())
    };

    Some(CellVertex {
        mask,
        vertex,
        normal,
        tangent,
    })
}

/// Write cursors over the caller's buffers.
struct Writers<'b> {
    vertices: SliceWriter<'b, [f32; 3]>,
    normals: Option<SliceWriter<'b, [f32; 3]>>,
    tangents: Option<SliceWriter<'b, [f32; 4]>>,
    triangles: SliceWriter<'b, u32>,
}

/// Drives one extraction over a field.
///
/// The vertex index map is sized once for the field and cleared at the start
/// of every run, so an extractor can be reused for several buffer sets.
pub struct MeshExtractor<'f> {
    field: ScalarField<'f>,
    params: SurfaceNetsParams,
    state: ExtractorState,
    index_map: VertexIndexMap,
    bounds: BoundsAccumulator,
    degenerate_normals: usize,
}

impl<'f> MeshExtractor<'f> {
    /// Create an extractor, validating the parameters.
    pub fn new(field: ScalarField<'f>, params: SurfaceNetsParams) -> SurfaceNetsResult<Self> {
        params.validate()?;
        required_capacity(field.size())?;

        Ok(Self {
            index_map: VertexIndexMap::new(field.size())?,
            field,
            params,
            state: ExtractorState::Idle,
            bounds: BoundsAccumulator::new(),
            degenerate_normals: 0,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ExtractorState {
        self.state
    }

    /// Parameters in use.
    pub fn params(&self) -> &SurfaceNetsParams {
        &self.params
    }

    /// Extract the surface into `out`.
    ///
    /// Buffer capacities are checked before anything is written; on a sizing
    /// error the buffers are untouched.
    pub fn run(&mut self, out: &mut OutputBuffers<'_>) -> SurfaceNetsResult<ExtractSummary> {
        out.check_capacity(self.field.size())?;

        let timer = OperationTimer::with_grid("extract", self.field.size());
        let _entered = timer.span().enter();
        info!(
            size = self.field.size(),
            cells = self.field.cells_per_axis().pow(3),
            parallel = self.params.parallel,
            normals = out.normals.is_some() && self.params.compute_normals,
            tangents = out.tangents.is_some() && self.params.compute_tangents,
            "Extracting surface"
        );

        self.reset();
        self.state = ExtractorState::Scanning;

        let result = self.sweep(out);
        self.state = match result {
            Ok(_) => ExtractorState::Done,
            Err(_) => ExtractorState::Idle,
        };
        let summary = result?;

        if let Some(bounds_out) = out.bounds.as_deref_mut() {
            *bounds_out = match summary.bounds {
                Some(b) => b.to_array(self.params.bounds_layout),
                None => [0.0; 6],
            };
        }

        info!(
            vertices = summary.vertex_count,
            triangles = summary.triangle_count(),
            degenerate_normals = summary.degenerate_normals,
            "Surface extraction complete"
        );

        Ok(summary)
    }

    fn reset(&mut self) {
        self.index_map.clear();
        self.bounds = BoundsAccumulator::new();
        self.degenerate_normals = 0;
    }

    fn sweep(&mut self, out: &mut OutputBuffers<'_>) -> SurfaceNetsResult<ExtractSummary> {
        let write_normals = self.params.compute_normals;
        let write_tangents = self.params.compute_tangents;

        let mut writers = Writers {
            vertices: SliceWriter::new(&mut *out.vertices),
            normals: out
                .normals
                .as_deref_mut()
                .filter(|_| write_normals)
                .map(SliceWriter::new),
            tangents: out
                .tangents
                .as_deref_mut()
                .filter(|_| write_tangents)
                .map(SliceWriter::new),
            triangles: SliceWriter::new(&mut *out.triangles),
        };

        let cells = self.field.cells_per_axis();
        if self.params.parallel {
            self.sweep_parallel(cells, &mut writers)?;
        } else {
            self.sweep_serial(cells, &mut writers)?;
        }

        Ok(ExtractSummary {
            vertex_count: writers.vertices.len(),
            triangle_index_count: writers.triangles.len(),
            bounds: self.bounds.finish(),
            degenerate_normals: self.degenerate_normals,
        })
    }

    fn sweep_serial(&mut self, cells: usize, writers: &mut Writers<'_>) -> SurfaceNetsResult<()> {
        let started = Instant::now();
        for x in 0..cells {
            for y in 0..cells {
                for z in 0..cells {
                    let cell = [x, y, z];
                    if let Some(cv) = evaluate_cell(&self.field, cell, &self.params) {
                        self.commit(cell, &cv, writers)?;
                    }
                }
            }
        }
        log_phase("serial_sweep", cells.pow(3), started);
        Ok(())
    }

    /// Two passes: evaluate every cell on the rayon pool, then commit in scan
    /// order so ids and faces match the serial sweep exactly.
    fn sweep_parallel(&mut self, cells: usize, writers: &mut Writers<'_>) -> SurfaceNetsResult<()> {
        let total = cells.pow(3);
        let plane = cells * cells;
        let field = self.field;
        let params = &self.params;

        let started = Instant::now();
        // Only active cells are kept; an indexed filter_map keeps scan order.
        let active: Vec<(usize, CellVertex)> = (0..total)
            .into_par_iter()
            .filter_map(|i| {
                evaluate_cell(&field, [i / plane, (i / cells) % cells, i % cells], params)
                    .map(|cv| (i, cv))
            })
            .collect();
        log_phase("evaluate", total, started);
        debug!(active_cells = active.len(), "Cells evaluated");

        let started = Instant::now();
        for (i, cv) in &active {
            let cell = [i / plane, (i / cells) % cells, i % cells];
            self.commit(cell, cv, writers)?;
        }
        log_phase("commit", total, started);
        Ok(())
    }

    /// Write a cell's vertex, record it, and stitch its faces.
    fn commit(
        &mut self,
        cell: [usize; 3],
        cv: &CellVertex,
        writers: &mut Writers<'_>,
    ) -> SurfaceNetsResult<()> {
        let id = writers.vertices.len();
        let p = cv.vertex.position;
        writers
            .vertices
            .push([p.x, p.y, p.z])
            .ok_or_else(|| SurfaceNetsError::buffer_too_small(BufferKind::Vertices, id + 1, id))?;

        if let Some(normals) = writers.normals.as_mut() {
            let n = cv.normal;
            normals
                .push([n.x, n.y, n.z])
                .ok_or_else(|| SurfaceNetsError::buffer_too_small(BufferKind::Normals, id + 1, id))?;
        }
        if let Some(tangents) = writers.tangents.as_mut() {
            let t = cv.tangent;
            tangents.push([t.x, t.y, t.z, t.w]).ok_or_else(|| {
                SurfaceNetsError::buffer_too_small(BufferKind::Tangents, id + 1, id)
            })?;
        }

        if self.params.needs_gradient() && cv.normal == Vector3::zeros() {
            self.degenerate_normals += 1;
            trace!(cell = ?cell, "Zero gradient at vertex");
        }

        // Capacity was checked against size³, so the id fits below NO_VERTEX.
        self.index_map.insert(cell, id as u32);
        self.bounds.extend_cell(cell);

        if cell.iter().all(|&c| c >= 1) {
            stitch_cell(cell, cv.mask, &self.index_map, &mut writers.triangles)?;
        }

        Ok(())
    }
}

/// Extract the surface of `field` into caller-owned buffers.
pub fn extract(
    field: &ScalarField<'_>,
    out: &mut OutputBuffers<'_>,
    params: &SurfaceNetsParams,
) -> SurfaceNetsResult<ExtractSummary> {
    MeshExtractor::new(*field, params.clone())?.run(out)
}

/// Extract the surface of `field` into a newly allocated mesh.
pub fn extract_mesh(
    field: &ScalarField<'_>,
    params: &SurfaceNetsParams,
) -> SurfaceNetsResult<SurfaceMesh> {
    let capacity = required_capacity(field.size())?;

    let mut vertices = vec![[0.0f32; 3]; capacity.vertices];
    let mut normals = vec![[0.0f32; 3]; if params.compute_normals { capacity.vertices } else { 0 }];
    let mut tangents =
        vec![[0.0f32; 4]; if params.compute_tangents { capacity.vertices } else { 0 }];
    let mut triangles = vec![0u32; capacity.triangle_indices];

    let summary = {
        let mut out = OutputBuffers::new(&mut vertices, &mut triangles);
        if params.compute_normals {
            out = out.with_normals(&mut normals);
        }
        if params.compute_tangents {
            out = out.with_tangents(&mut tangents);
        }
        extract(field, &mut out, params)?
    };

    let vc = summary.vertex_count;
    normals.truncate(if params.compute_normals { vc } else { 0 });
    tangents.truncate(if params.compute_tangents { vc } else { 0 });
    vertices.truncate(vc);
    triangles.truncate(summary.triangle_index_count);

    Ok(SurfaceMesh::from_buffers(
        vertices,
        normals,
        tangents,
        triangles,
        summary.bounds,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ScalarGrid;

    #[test]
    fn test_required_capacity() {
        let cap = required_capacity(4).unwrap();
        assert_eq!(cap.vertices, 64);
        assert_eq!(cap.triangle_indices, 64 * 18);

        assert_eq!(required_capacity(0).unwrap().vertices, 0);
        assert!(required_capacity(1 << 22).is_err());
    }

    #[test]
    fn test_state_transitions() {
        let grid = ScalarGrid::from_fn(4, |_, y, _| y - 1.5).unwrap();
        let field = grid.as_field().unwrap();
        let mut extractor = MeshExtractor::new(field, SurfaceNetsParams::default()).unwrap();
        assert_eq!(extractor.state(), ExtractorState::Idle);

        let cap = required_capacity(4).unwrap();
        let mut vertices = vec![[0.0; 3]; cap.vertices];
        let mut triangles = vec![0; cap.triangle_indices];
        let mut out = OutputBuffers::new(&mut vertices, &mut triangles);

        let first = extractor.run(&mut out).unwrap();
        assert_eq!(extractor.state(), ExtractorState::Done);

        // A second run over the same buffers reproduces the first.
        let second = extractor.run(&mut out).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sizing_error_leaves_state_idle() {
        let grid = ScalarGrid::filled(3, 1.0).unwrap();
        let field = grid.as_field().unwrap();
        let mut extractor = MeshExtractor::new(field, SurfaceNetsParams::default()).unwrap();

        let mut vertices = vec![[0.0; 3]; 1];
        let mut triangles = vec![0; 27 * 18];
        let mut out = OutputBuffers::new(&mut vertices, &mut triangles);
        assert!(extractor.run(&mut out).is_err());
        assert_eq!(extractor.state(), ExtractorState::Idle);
    }

    #[test]
    fn test_invalid_params_rejected_at_construction() {
        let grid = ScalarGrid::filled(3, 1.0).unwrap();
        let field = grid.as_field().unwrap();
        let params = SurfaceNetsParams::default().with_normal_step(-1.0);
        assert!(matches!(
            MeshExtractor::new(field, params),
            Err(SurfaceNetsError::InvalidParams { .. })
        ));
    }

    #[test]
    fn test_single_boundary_cell_has_no_faces() {
        // Only sample (0,0,0) is inside, so only cell (0,0,0) gets a vertex.
        let grid = ScalarGrid::from_fn(3, |x, y, z| {
            if x + y + z == 0.0 { -1.0 } else { 1.0 }
        })
        .unwrap();
        let field = grid.as_field().unwrap();
        let mesh = extract_mesh(&field, &SurfaceNetsParams::default()).unwrap();
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_parallel_sparse_field_matches_serial() {
        // A lone inside sample deep in the grid: most cells are inactive.
        let grid = ScalarGrid::from_fn(12, |x, y, z| {
            if (x, y, z) == (6.0, 5.0, 7.0) { -1.0 } else { 1.0 }
        })
        .unwrap();
        let field = grid.as_field().unwrap();
        let serial = extract_mesh(&field, &SurfaceNetsParams::full()).unwrap();
        let parallel =
            extract_mesh(&field, &SurfaceNetsParams::full().with_parallel(true)).unwrap();

        assert_eq!(serial.vertex_count(), 8);
        assert_eq!(serial.triangle_count(), 12);
        assert_eq!(parallel.positions, serial.positions);
        assert_eq!(parallel.normals, serial.normals);
        assert_eq!(parallel.indices, serial.indices);
        assert_eq!(parallel.bounds, serial.bounds);
    }

    #[test]
    fn test_run_logs_inside_operation_span() {
        use std::sync::{Arc, Mutex};
        use tracing_subscriber::layer::{Context, SubscriberExt};
        use tracing_subscriber::registry::LookupSpan;
        use tracing_subscriber::Layer;

        struct EventSpans(Arc<Mutex<Vec<&'static str>>>);

        impl<S> Layer<S> for EventSpans
        where
            S: tracing::Subscriber + for<'a> LookupSpan<'a>,
        {
            fn on_event(&self, event: &tracing::Event<'_>, ctx: Context<'_, S>) {
                if let Some(span) = ctx.event_span(event) {
                    self.0.lock().unwrap().push(span.name());
                }
            }
        }

        let names = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(EventSpans(Arc::clone(&names)));

        let grid = ScalarGrid::from_fn(4, |_, y, _| y - 1.5).unwrap();
        let field = grid.as_field().unwrap();
        tracing::subscriber::with_default(subscriber, || {
            extract_mesh(&field, &SurfaceNetsParams::default()).unwrap();
        });

        assert!(names.lock().unwrap().contains(&"surface_nets_operation"));
    }
}
