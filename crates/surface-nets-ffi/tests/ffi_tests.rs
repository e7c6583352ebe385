//! Tests for the C ABI, driven from Rust through the exported functions.

use std::ptr;

use approx::assert_relative_eq;
use surface_nets::{SdfShape, SurfaceNetsParams, extract_mesh};
use surface_nets_ffi::{
    SnetsCapacity, SnetsCounts, SnetsStatus, snets_naive_surface_nets, snets_required_capacity,
};

struct Buffers {
    vertices: Vec<f32>,
    normals: Vec<f32>,
    tangents: Vec<f32>,
    triangles: Vec<i32>,
    bounds: [f32; 6],
}

impl Buffers {
    fn for_size(size: i32) -> Self {
        let mut cap = SnetsCapacity::default();
        let status = unsafe { snets_required_capacity(size, &mut cap) };
        assert_eq!(status, SnetsStatus::Ok);
        Self {
            vertices: vec![0.0; cap.vertices_len],
            normals: vec![0.0; cap.normals_len],
            tangents: vec![0.0; cap.tangents_len],
            triangles: vec![-1; cap.triangles_len],
            bounds: [0.0; 6],
        }
    }

    fn run(&mut self, sdf: &[f32], size: i32) -> (SnetsStatus, SnetsCounts) {
        let mut counts = SnetsCounts {
            vertex_count: 123,
            triangle_index_count: 456,
        };
        let status = unsafe {
            snets_naive_surface_nets(
                sdf.as_ptr(),
                size,
                self.vertices.as_mut_ptr(),
                self.vertices.len(),
                self.normals.as_mut_ptr(),
                self.normals.len(),
                self.tangents.as_mut_ptr(),
                self.tangents.len(),
                self.triangles.as_mut_ptr(),
                self.triangles.len(),
                self.bounds.as_mut_ptr(),
                &mut counts,
            )
        };
        (status, counts)
    }
}

fn sphere_field(size: usize) -> Vec<f32> {
    SdfShape::centered_sphere(size).sample(size).unwrap().values
}

#[test]
fn test_matches_rust_api() {
    let size = 24;
    let sdf = sphere_field(size);
    let mut buffers = Buffers::for_size(size as i32);
    let (status, counts) = buffers.run(&sdf, size as i32);
    assert_eq!(status, SnetsStatus::Ok);

    let field = surface_nets::ScalarField::new(&sdf, size).unwrap();
    let mesh = extract_mesh(&field, &SurfaceNetsParams::default()).unwrap();

    assert_eq!(counts.vertex_count, mesh.vertex_count());
    assert_eq!(counts.triangle_index_count, mesh.indices.len());

    for (i, p) in mesh.positions.iter().enumerate() {
        assert_eq!(&buffers.vertices[i * 3..i * 3 + 3], &[p.x, p.y, p.z]);
    }
    for (i, n) in mesh.normals.iter().enumerate() {
        assert_eq!(&buffers.normals[i * 3..i * 3 + 3], &[n.x, n.y, n.z]);
    }
    for (i, t) in mesh.tangents.iter().enumerate() {
        assert_eq!(&buffers.tangents[i * 4..i * 4 + 4], &[t.x, t.y, t.z, t.w]);
    }
    for (ffi, &rust) in buffers.triangles.iter().zip(&mesh.indices) {
        assert_eq!(*ffi, rust as i32);
    }
    // Tail of the index buffer untouched.
    assert_eq!(buffers.triangles[counts.triangle_index_count], -1);

    let b = mesh.bounds.unwrap();
    let c = b.center();
    assert_relative_eq!(buffers.bounds[0], c.x);
    assert_relative_eq!(buffers.bounds[1], c.y);
    assert_relative_eq!(buffers.bounds[2], c.z);
}

#[test]
fn test_optional_buffers_may_be_null() {
    let size = 12;
    let sdf = sphere_field(size);
    let mut buffers = Buffers::for_size(size as i32);

    let status = unsafe {
        snets_naive_surface_nets(
            sdf.as_ptr(),
            size as i32,
            buffers.vertices.as_mut_ptr(),
            buffers.vertices.len(),
            ptr::null_mut(),
            0,
            ptr::null_mut(),
            0,
            buffers.triangles.as_mut_ptr(),
            buffers.triangles.len(),
            ptr::null_mut(),
            ptr::null_mut(),
        )
    };
    assert_eq!(status, SnetsStatus::Ok);
    assert!(buffers.triangles.iter().any(|&i| i >= 0));
}

#[test]
fn test_null_required_pointers_rejected() {
    let sdf = sphere_field(4);
    let mut buffers = Buffers::for_size(4);
    let mut counts = SnetsCounts::default();

    let status = unsafe {
        snets_naive_surface_nets(
            ptr::null(),
            4,
            buffers.vertices.as_mut_ptr(),
            buffers.vertices.len(),
            ptr::null_mut(),
            0,
            ptr::null_mut(),
            0,
            buffers.triangles.as_mut_ptr(),
            buffers.triangles.len(),
            ptr::null_mut(),
            &mut counts,
        )
    };
    assert_eq!(status, SnetsStatus::NullPointer);

    let status = unsafe {
        snets_naive_surface_nets(
            sdf.as_ptr(),
            4,
            ptr::null_mut(),
            0,
            ptr::null_mut(),
            0,
            ptr::null_mut(),
            0,
            buffers.triangles.as_mut_ptr(),
            buffers.triangles.len(),
            ptr::null_mut(),
            &mut counts,
        )
    };
    assert_eq!(status, SnetsStatus::NullPointer);

    let status = unsafe { snets_required_capacity(4, ptr::null_mut()) };
    assert_eq!(status, SnetsStatus::NullPointer);
}

#[test]
fn test_undersized_buffer_reports_and_zeroes_counts() {
    let size = 8;
    let sdf = sphere_field(size);
    let mut buffers = Buffers::for_size(size as i32);
    buffers.triangles.truncate(10);

    let (status, counts) = buffers.run(&sdf, size as i32);
    assert_eq!(status, SnetsStatus::BufferTooSmall);
    assert_eq!(counts, SnetsCounts::default());
    assert!(buffers.triangles.iter().all(|&i| i == -1));
    assert_eq!(buffers.bounds, [0.0; 6]);
}

#[test]
fn test_undersized_optional_buffers_rejected() {
    let size = 8;
    let sdf = sphere_field(size);

    let mut buffers = Buffers::for_size(size as i32);
    buffers.normals.truncate(3);
    let (status, counts) = buffers.run(&sdf, size as i32);
    assert_eq!(status, SnetsStatus::BufferTooSmall);
    assert_eq!(counts, SnetsCounts::default());
    assert!(buffers.vertices.iter().all(|&v| v == 0.0));

    let mut buffers = Buffers::for_size(size as i32);
    buffers.tangents.truncate(4);
    let (status, counts) = buffers.run(&sdf, size as i32);
    assert_eq!(status, SnetsStatus::BufferTooSmall);
    assert_eq!(counts, SnetsCounts::default());
    assert!(buffers.triangles.iter().all(|&i| i == -1));
}

#[test]
fn test_invalid_sizes() {
    let sdf = [0.0f32; 1];
    let mut buffers = Buffers::for_size(1);

    let (status, _) = buffers.run(&sdf, -3);
    assert_eq!(status, SnetsStatus::InvalidSize);

    let mut cap = SnetsCapacity::default();
    assert_eq!(
        unsafe { snets_required_capacity(-1, &mut cap) },
        SnetsStatus::InvalidSize
    );
}

#[test]
fn test_single_sample_grid_is_empty() {
    let sdf = [-1.0f32; 1];
    let mut buffers = Buffers::for_size(1);
    let (status, counts) = buffers.run(&sdf, 1);
    assert_eq!(status, SnetsStatus::Ok);
    assert_eq!(counts, SnetsCounts::default());
    assert_eq!(buffers.bounds, [0.0; 6]);
}
