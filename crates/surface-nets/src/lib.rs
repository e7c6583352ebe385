//! Naive surface nets isosurface extraction.
//!
//! This crate turns a cubic, regularly sampled signed distance field into a
//! triangle mesh. Every cell that straddles the zero level set gets one
//! vertex, placed at the mean of its edge crossings; every primal edge that
//! crosses the surface becomes a quad joining the vertices of the four cells
//! around it.
//!
//! # Features
//!
//! - **Caller-owned buffers**: fixed-capacity output slices, sized once with
//!   [`required_capacity`] and checked before anything is written
//! - **Per-vertex attributes**: gradient normals and tangents, both optional
//! - **Deterministic parallel mode**: cell evaluation on the rayon pool with
//!   output identical to the serial sweep
//! - **Rich diagnostics**: [`SurfaceNetsError`] carries machine-readable codes
//!   and recovery suggestions
//!
//! # Conventions
//!
//! - Samples are stored at index `x + y * N + z * N * N`.
//! - Negative samples are inside, non-negative samples outside.
//! - Positions are in grid units; triangles wind counter-clockwise seen from
//!   outside.
//! - Cells with any coordinate equal to 0 own a vertex but never emit faces,
//!   so the minimum boundary layer of the grid is left open.
//!
//! # Quick Start
//!
//! ```
//! use surface_nets::{SdfShape, SurfaceNetsParams, extract_mesh};
//!
//! let grid = SdfShape::centered_sphere(32).sample(32).unwrap();
//! let field = grid.as_field().unwrap();
//!
//! let mesh = extract_mesh(&field, &SurfaceNetsParams::default()).unwrap();
//! assert!(mesh.triangle_count() > 0);
//! ```
//!
//! # Caller-Owned Buffers
//!
//! ```
//! use surface_nets::{OutputBuffers, ScalarGrid, SurfaceNetsParams, extract, required_capacity};
//!
//! let grid = ScalarGrid::from_fn(16, |_, y, _| y - 7.5).unwrap();
//! let field = grid.as_field().unwrap();
//!
//! let cap = required_capacity(16).unwrap();
//! let mut vertices = vec![[0.0f32; 3]; cap.vertices];
//! let mut normals = vec![[0.0f32; 3]; cap.vertices];
//! let mut triangles = vec![0u32; cap.triangle_indices];
//! let mut bounds = [0.0f32; 6];
//!
//! let mut out = OutputBuffers::new(&mut vertices, &mut triangles)
//!     .with_normals(&mut normals)
//!     .with_bounds(&mut bounds);
//! let summary = extract(&field, &mut out, &SurfaceNetsParams::default()).unwrap();
//!
//! assert_eq!(summary.vertex_count, 15 * 15);
//! ```

mod bounds;
mod classify;
mod error;
mod extract;
mod field;
mod mesh;
mod normals;
mod params;
pub mod shapes;
pub mod tables;
pub mod tracing_ext;
mod triangulate;
mod vertex;

pub use error::{
    BufferKind, SurfaceNetsError, SurfaceNetsErrorCode, SurfaceNetsRecoverySuggestion,
    SurfaceNetsResult,
};

// Input
pub use field::{ScalarField, ScalarGrid};
pub use shapes::SdfShape;

// Configuration
pub use bounds::{Bounds, BoundsAccumulator, BoundsLayout};
pub use params::SurfaceNetsParams;

// Extraction
pub use extract::{
    BufferCapacity, ExtractSummary, ExtractorState, MAX_INDICES_PER_CELL, MeshExtractor,
    OutputBuffers, extract, extract_mesh, required_capacity,
};
pub use mesh::SurfaceMesh;

// Building blocks
pub use classify::{ClassificationMask, classify};
pub use normals::{DEFAULT_NORMAL_STEP, estimate_normal, estimate_tangent, gradient, pack_tangent};
pub use triangulate::{NO_VERTEX, VertexIndexMap, quad_indices};
pub use vertex::{PlacedVertex, edge_crossing, place_vertex};
