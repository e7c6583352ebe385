//! Owned extraction result and OBJ export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::{Point3, Vector3, Vector4};
use tracing::info;

use crate::bounds::Bounds;
use crate::error::{SurfaceNetsError, SurfaceNetsResult};

/// Triangle mesh produced by [`extract_mesh`](crate::extract_mesh).
///
/// Positions are in grid units. `normals` and `tangents` are either empty
/// (attribute disabled) or parallel to `positions`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceMesh {
    /// Vertex positions.
    pub positions: Vec<Point3<f32>>,
    /// Unit normals; zero where the gradient vanished.
    pub normals: Vec<Vector3<f32>>,
    /// Tangents with `w = 0`.
    pub tangents: Vec<Vector4<f32>>,
    /// Triangle indices, three per triangle.
    pub indices: Vec<u32>,
    /// Box around the cells that produced vertices.
    pub bounds: Option<Bounds>,
}

impl SurfaceMesh {
    pub(crate) fn from_buffers(
        vertices: Vec<[f32; 3]>,
        normals: Vec<[f32; 3]>,
        tangents: Vec<[f32; 4]>,
        indices: Vec<u32>,
        bounds: Option<Bounds>,
    ) -> Self {
        Self {
            positions: vertices.into_iter().map(Point3::from).collect(),
            normals: normals.into_iter().map(Vector3::from).collect(),
            tangents: tangents.into_iter().map(Vector4::from).collect(),
            indices,
            bounds,
        }
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate over triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Unnormalized right-hand normal of a triangle.
    pub fn face_normal(&self, tri: [u32; 3]) -> Vector3<f32> {
        let a = self.positions[tri[0] as usize];
        let b = self.positions[tri[1] as usize];
        let c = self.positions[tri[2] as usize];
        (b - a).cross(&(c - a))
    }

    /// Surface area in square grid units.
    pub fn surface_area(&self) -> f32 {
        self.triangles()
            .map(|t| self.face_normal(t).norm() * 0.5)
            .sum()
    }

    /// Write the mesh as Wavefront OBJ.
    ///
    /// Normals are emitted as `vn` records and referenced from faces when
    /// present. Tangents have no OBJ representation and are skipped.
    pub fn write_obj<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writeln!(writer, "# OBJ file exported by surface-nets")?;
        writeln!(writer, "# Vertices: {}", self.vertex_count())?;
        writeln!(writer, "# Faces: {}", self.triangle_count())?;
        writeln!(writer)?;

        for p in &self.positions {
            writeln!(writer, "v {:.6} {:.6} {:.6}", p.x, p.y, p.z)?;
        }

        let has_normals = !self.normals.is_empty();
        if has_normals {
            for n in &self.normals {
                writeln!(writer, "vn {:.6} {:.6} {:.6}", n.x, n.y, n.z)?;
            }
        }

        writeln!(writer)?;

        // OBJ indices are 1-based
        for [a, b, c] in self.triangles() {
            let (a, b, c) = (a + 1, b + 1, c + 1);
            if has_normals {
                writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
            } else {
                writeln!(writer, "f {a} {b} {c}")?;
            }
        }

        writer.flush()
    }

    /// Save the mesh as an OBJ file.
    pub fn save_obj(&self, path: impl AsRef<Path>) -> SurfaceNetsResult<()> {
        let path = path.as_ref();
        info!("Saving mesh to {:?} (OBJ format)", path);

        let file = File::create(path).map_err(|e| SurfaceNetsError::io(path, e))?;
        self.write_obj(BufWriter::new(file))
            .map_err(|e| SurfaceNetsError::io(path, e))?;

        info!(
            vertices = self.vertex_count(),
            faces = self.triangle_count(),
            "Saved OBJ"
        );
        Ok(())
    }
}
