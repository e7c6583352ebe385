// Allow unused_assignments lint for error struct fields that are used in thiserror Display macros
// but appear as "never read" to the compiler. This is a false positive in newer Rust versions.
#![allow(unused_assignments)]

//! Error types for surface extraction with rich diagnostics.
//!
//! Extraction over a well-formed field cannot fail in the numerical sense:
//! a flat field yields a zero normal, an empty field yields an empty mesh.
//! What can fail is the contract with the caller (field length, output buffer
//! capacities, parameters) and the topology invariant that every
//! neighbour referenced while stitching a face already owns a vertex.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for surface extraction operations.
pub type SurfaceNetsResult<T> = Result<T, SurfaceNetsError>;

/// Machine-readable error codes.
///
/// Codes follow the pattern `SNETS-XXXX` where:
/// - 1xxx = Input / contract validation errors
/// - 2xxx = Extraction invariant errors
/// - 3xxx = Output export errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceNetsErrorCode {
    /// SNETS-1001: Sample count does not match the grid size
    FieldSizeMismatch = 1001,
    /// SNETS-1002: Grid capacity arithmetic overflows
    GridTooLarge = 1002,
    /// SNETS-1003: Caller output buffer is undersized
    BufferTooSmall = 1003,
    /// SNETS-1004: Invalid parameters
    InvalidParams = 1004,

    /// SNETS-2001: Face references a cell without a vertex
    MissingNeighborVertex = 2001,

    /// SNETS-3001: Writing the mesh failed
    Io = 3001,
}

impl SurfaceNetsErrorCode {
    /// Returns the error code as a string in the format `SNETS-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceNetsErrorCode::FieldSizeMismatch => "SNETS-1001",
            SurfaceNetsErrorCode::GridTooLarge => "SNETS-1002",
            SurfaceNetsErrorCode::BufferTooSmall => "SNETS-1003",
            SurfaceNetsErrorCode::InvalidParams => "SNETS-1004",
            SurfaceNetsErrorCode::MissingNeighborVertex => "SNETS-2001",
            SurfaceNetsErrorCode::Io => "SNETS-3001",
        }
    }
}

impl std::fmt::Display for SurfaceNetsErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The caller-owned output buffer a sizing error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Vertex positions.
    Vertices,
    /// Per-vertex normals.
    Normals,
    /// Per-vertex tangents.
    Tangents,
    /// Triangle indices.
    Triangles,
}

impl std::fmt::Display for BufferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BufferKind::Vertices => "vertices",
            BufferKind::Normals => "normals",
            BufferKind::Tangents => "tangents",
            BufferKind::Triangles => "triangles",
        };
        f.write_str(name)
    }
}

/// Recovery suggestions for extraction errors.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceNetsRecoverySuggestion {
    /// Resize the sample array to `size³` entries.
    ResizeField { expected: usize },
    /// Grow an output buffer.
    GrowBuffer { buffer: BufferKind, required: usize },
    /// Split the volume into smaller grids.
    SplitVolume,
    /// Fix the parameter values.
    CheckParams,
    /// Check the field for inconsistent samples.
    InspectField,
    /// Check the output path.
    CheckOutputPath,
}

impl std::fmt::Display for SurfaceNetsRecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceNetsRecoverySuggestion::ResizeField { expected } => {
                write!(f, "Provide exactly {} samples (size³)", expected)
            }
            SurfaceNetsRecoverySuggestion::GrowBuffer { buffer, required } => {
                write!(
                    f,
                    "Allocate at least {} elements for the {} buffer",
                    required, buffer
                )
            }
            SurfaceNetsRecoverySuggestion::SplitVolume => {
                write!(f, "Split the volume into several smaller grids")
            }
            SurfaceNetsRecoverySuggestion::CheckParams => {
                write!(f, "Use a finite, positive normal step")
            }
            SurfaceNetsRecoverySuggestion::InspectField => {
                write!(f, "Check the field for NaN or inconsistent samples")
            }
            SurfaceNetsRecoverySuggestion::CheckOutputPath => {
                write!(f, "Check that the output directory exists and is writable")
            }
        }
    }
}

/// Errors that can occur during surface extraction.
#[derive(Debug, Error, Diagnostic)]
pub enum SurfaceNetsError {
    /// Sample array length does not match `size³`.
    #[error("field has {actual} samples, but a grid of size {size} needs {expected}")]
    #[diagnostic(
        code(surface_nets::field::size_mismatch),
        help("Samples are laid out as x + y*size + z*size*size; the slice must hold size³ values.")
    )]
    FieldSizeMismatch {
        size: usize,
        expected: usize,
        actual: usize,
    },

    /// Capacity computation for the grid overflows `usize`.
    #[error("grid of size {size} is too large: output capacities overflow")]
    #[diagnostic(
        code(surface_nets::grid::too_large),
        help("Split the volume into several smaller grids.")
    )]
    GridTooLarge { size: usize },

    /// A caller-supplied output buffer cannot hold the worst case output.
    #[error("{buffer} buffer too small: {required} elements required, {provided} provided")]
    #[diagnostic(
        code(surface_nets::buffer::too_small),
        help("Use required_capacity(size) to size output buffers before extracting.")
    )]
    BufferTooSmall {
        buffer: BufferKind,
        required: usize,
        provided: usize,
    },

    /// Invalid parameters.
    #[error("invalid extraction parameters: {details}")]
    #[diagnostic(
        code(surface_nets::params::invalid),
        help("Check parameter values: normal_step must be finite and > 0.")
    )]
    InvalidParams { details: String },

    /// A face referenced a neighbouring cell that has no vertex.
    #[error("cell {cell:?} references a neighbour without a vertex")]
    #[diagnostic(
        code(surface_nets::topology::missing_vertex),
        help("Neighbour cells share the crossing edge and must own a vertex; the field may contain inconsistent samples.")
    )]
    MissingNeighborVertex { cell: [usize; 3] },

    /// Writing the mesh failed.
    #[error("failed to write mesh to {path:?}: {source}")]
    #[diagnostic(code(surface_nets::io::write))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SurfaceNetsError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> SurfaceNetsErrorCode {
        match self {
            SurfaceNetsError::FieldSizeMismatch { .. } => SurfaceNetsErrorCode::FieldSizeMismatch,
            SurfaceNetsError::GridTooLarge { .. } => SurfaceNetsErrorCode::GridTooLarge,
            SurfaceNetsError::BufferTooSmall { .. } => SurfaceNetsErrorCode::BufferTooSmall,
            SurfaceNetsError::InvalidParams { .. } => SurfaceNetsErrorCode::InvalidParams,
            SurfaceNetsError::MissingNeighborVertex { .. } => {
                SurfaceNetsErrorCode::MissingNeighborVertex
            }
            SurfaceNetsError::Io { .. } => SurfaceNetsErrorCode::Io,
        }
    }

    /// Returns a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> SurfaceNetsRecoverySuggestion {
        match self {
            SurfaceNetsError::FieldSizeMismatch { expected, .. } => {
                SurfaceNetsRecoverySuggestion::ResizeField {
                    expected: *expected,
                }
            }
            SurfaceNetsError::GridTooLarge { .. } => SurfaceNetsRecoverySuggestion::SplitVolume,
            SurfaceNetsError::BufferTooSmall {
                buffer, required, ..
            } => SurfaceNetsRecoverySuggestion::GrowBuffer {
                buffer: *buffer,
                required: *required,
            },
            SurfaceNetsError::InvalidParams { .. } => SurfaceNetsRecoverySuggestion::CheckParams,
            SurfaceNetsError::MissingNeighborVertex { .. } => {
                SurfaceNetsRecoverySuggestion::InspectField
            }
            SurfaceNetsError::Io { .. } => SurfaceNetsRecoverySuggestion::CheckOutputPath,
        }
    }

    // Constructor helpers

    /// Create a field size mismatch error.
    pub fn field_size_mismatch(size: usize, expected: usize, actual: usize) -> Self {
        SurfaceNetsError::FieldSizeMismatch {
            size,
            expected,
            actual,
        }
    }

    /// Create a buffer too small error.
    pub fn buffer_too_small(buffer: BufferKind, required: usize, provided: usize) -> Self {
        SurfaceNetsError::BufferTooSmall {
            buffer,
            required,
            provided,
        }
    }

    /// Create an invalid params error.
    pub fn invalid_params(details: impl Into<String>) -> Self {
        SurfaceNetsError::InvalidParams {
            details: details.into(),
        }
    }

    /// Create an I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SurfaceNetsError::Io {
            path: path.into(),
            source,
        }
    }
}
