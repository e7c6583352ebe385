//! C ABI for naive surface nets extraction.
//!
//! The host owns every buffer. Sizes are passed alongside each pointer as
//! element counts of the flat arrays (floats or indices, not vertices), so
//! an undersized buffer is reported instead of overrun.
//!
//! ```c
//! SnetsCapacity cap;
//! snets_required_capacity(size, &cap);
//! /* allocate cap.vertices_len floats, cap.triangles_len ints, ... */
//! SnetsCounts counts;
//! int32_t status = snets_naive_surface_nets(sdf, size,
//!     vertices, cap.vertices_len, normals, cap.normals_len,
//!     tangents, cap.tangents_len, triangles, cap.triangles_len,
//!     bounds, &counts);
//! ```
//!
//! Normals and tangents are computed only when their pointer is non-null.
//! Bounds are written as `[center.xyz, half_extent.xyz]`.

use std::ffi::c_char;
use std::panic::{AssertUnwindSafe, catch_unwind};

use surface_nets::{
    OutputBuffers, ScalarField, SurfaceNetsError, SurfaceNetsParams, extract, required_capacity,
};
use tracing::warn;

/// Status codes returned by every entry point.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnetsStatus {
    /// Extraction completed.
    Ok = 0,
    /// A required pointer was null.
    NullPointer = 1,
    /// Grid size is negative or too large.
    InvalidSize = 2,
    /// An output buffer is smaller than the worst case for the grid.
    BufferTooSmall = 3,
    /// Unexpected failure, including a caught panic.
    Internal = 99,
}

impl From<&SurfaceNetsError> for SnetsStatus {
    fn from(err: &SurfaceNetsError) -> Self {
        match err {
            SurfaceNetsError::FieldSizeMismatch { .. } | SurfaceNetsError::GridTooLarge { .. } => {
                SnetsStatus::InvalidSize
            }
            SurfaceNetsError::BufferTooSmall { .. } => SnetsStatus::BufferTooSmall,
            SurfaceNetsError::InvalidParams { .. }
            | SurfaceNetsError::MissingNeighborVertex { .. }
            | SurfaceNetsError::Io { .. } => SnetsStatus::Internal,
        }
    }
}

/// Counts written by a successful extraction.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnetsCounts {
    /// Vertices written (3 floats each in `vertices`).
    pub vertex_count: usize,
    /// Index entries written to `triangles` (3 per triangle).
    pub triangle_index_count: usize,
}

/// Required flat buffer lengths for a grid.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnetsCapacity {
    /// Floats in the vertex buffer.
    pub vertices_len: usize,
    /// Floats in the normal buffer.
    pub normals_len: usize,
    /// Floats in the tangent buffer.
    pub tangents_len: usize,
    /// Integers in the triangle index buffer.
    pub triangles_len: usize,
}

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

/// Largest vertex count whose ids still fit in a non-negative `int32_t`.
const MAX_FFI_VERTICES: usize = i32::MAX as usize;

fn capacity_for(size: i32) -> Result<SnetsCapacity, SnetsStatus> {
    let size = usize::try_from(size).map_err(|_| SnetsStatus::InvalidSize)?;
    let cap = required_capacity(size).map_err(|e| SnetsStatus::from(&e))?;
    if cap.vertices > MAX_FFI_VERTICES {
        return Err(SnetsStatus::InvalidSize);
    }

    // vertices * 18 did not overflow, so * 3 and * 4 cannot either
    Ok(SnetsCapacity {
        vertices_len: cap.vertices * 3,
        normals_len: cap.vertices * 3,
        tangents_len: cap.vertices * 4,
        triangles_len: cap.triangle_indices,
    })
}

/// Report the buffer lengths required for a grid of `size` samples per axis.
///
/// # Safety
///
/// `out` must be null or point to writable memory for one `SnetsCapacity`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn snets_required_capacity(size: i32, out: *mut SnetsCapacity) -> SnetsStatus {
    if out.is_null() {
        return SnetsStatus::NullPointer;
    }
    match capacity_for(size) {
        Ok(cap) => {
            // SAFETY: non-null and writable per the caller contract.
            unsafe { out.write(cap) };
            SnetsStatus::Ok
        }
        Err(status) => status,
    }
}

/// Extract the zero isosurface of a `size³` signed distance field.
///
/// `sdf` holds `size³` samples at index `x + y * size + z * size * size`,
/// negative inside. On success the first `vertex_count * 3` vertex floats
/// and `triangle_index_count` indices are written; remaining buffer contents
/// are left as supplied. On error nothing is written and `out_counts` (if
/// given) is zeroed.
///
/// # Safety
///
/// - `sdf` must point to `size³` readable floats.
/// - `vertices` and `triangles` must be non-null and writable for
///   `vertices_len` and `triangles_len` elements.
/// - `normals` and `tangents` may be null; otherwise they must be writable for
///   `normals_len` and `tangents_len` floats.
/// - `bounds` may be null; otherwise it must be writable for 6 floats.
/// - `out_counts` may be null; otherwise it must be writable.
/// - No output buffer may alias `sdf` or another output buffer.
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn snets_naive_surface_nets(
    sdf: *const f32,
    size: i32,
    vertices: *mut f32,
    vertices_len: usize,
    normals: *mut f32,
    normals_len: usize,
    tangents: *mut f32,
    tangents_len: usize,
    triangles: *mut i32,
    triangles_len: usize,
    bounds: *mut f32,
    out_counts: *mut SnetsCounts,
) -> SnetsStatus {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        if sdf.is_null() || vertices.is_null() || triangles.is_null() {
            return Err(SnetsStatus::NullPointer);
        }
        capacity_for(size)?;

        // SAFETY: pointers checked non-null above; lengths and aliasing per
        // the caller contract.
        unsafe {
            run_extraction(
                sdf,
                size as usize,
                (vertices, vertices_len),
                (normals, normals_len),
                (tangents, tangents_len),
                (triangles, triangles_len),
                bounds,
            )
        }
    }));

    let result = outcome.unwrap_or_else(|_| {
        warn!("panic caught at FFI boundary");
        Err(SnetsStatus::Internal)
    });

    let (status, counts) = match result {
        Ok(counts) => (SnetsStatus::Ok, counts),
        Err(status) => (status, SnetsCounts::default()),
    };

    if !out_counts.is_null() {
        // SAFETY: non-null and writable per the caller contract.
        unsafe { out_counts.write(counts) };
    }
    status
}

/// # Safety
///
/// Same contract as [`snets_naive_surface_nets`], with `sdf`, `vertices` and
/// `triangles` already checked non-null and `size` already validated.
unsafe fn run_extraction(
    sdf: *const f32,
    size: usize,
    (vertices, vertices_len): (*mut f32, usize),
    (normals, normals_len): (*mut f32, usize),
    (tangents, tangents_len): (*mut f32, usize),
    (triangles, triangles_len): (*mut i32, usize),
    bounds: *mut f32,
) -> Result<SnetsCounts, SnetsStatus> {
    // size³ was checked against i32::MAX by the caller
    let samples = unsafe { std::slice::from_raw_parts(sdf, size * size * size) };
    let field = ScalarField::new(samples, size).map_err(|e| SnetsStatus::from(&e))?;

    // [f32; N] has the alignment of f32 and i32 the layout of u32.
    let vertices =
        unsafe { std::slice::from_raw_parts_mut(vertices.cast::<[f32; 3]>(), vertices_len / 3) };
    let triangles = unsafe { std::slice::from_raw_parts_mut(triangles.cast::<u32>(), triangles_len) };

    let mut out = OutputBuffers::new(vertices, triangles);
    if !normals.is_null() {
        out = out.with_normals(unsafe {
            std::slice::from_raw_parts_mut(normals.cast::<[f32; 3]>(), normals_len / 3)
        });
    }
    if !tangents.is_null() {
        out = out.with_tangents(unsafe {
            std::slice::from_raw_parts_mut(tangents.cast::<[f32; 4]>(), tangents_len / 4)
        });
    }
    if !bounds.is_null() {
        out = out.with_bounds(unsafe { &mut *bounds.cast::<[f32; 6]>() });
    }

    let params = SurfaceNetsParams::default()
        .with_normals(!normals.is_null())
        .with_tangents(!tangents.is_null());

    match extract(&field, &mut out, &params) {
        Ok(summary) => Ok(SnetsCounts {
            vertex_count: summary.vertex_count,
            triangle_index_count: summary.triangle_index_count,
        }),
        Err(e) => {
            warn!(code = %e.code(), error = %e, "surface extraction failed");
            Err(SnetsStatus::from(&e))
        }
    }
}

/// Library version as a static NUL-terminated string.
#[unsafe(no_mangle)]
pub extern "C" fn snets_version() -> *const c_char {
    VERSION.as_ptr().cast()
}

/// Static NUL-terminated description of a status code.
#[unsafe(no_mangle)]
pub extern "C" fn snets_status_message(status: i32) -> *const c_char {
    let message: &'static str = match status {
        0 => "ok\0",
        1 => "null pointer\0",
        2 => "invalid grid size\0",
        3 => "output buffer too small\0",
        99 => "internal error\0",
        _ => "unknown status\0",
    };
    message.as_ptr().cast()
}
