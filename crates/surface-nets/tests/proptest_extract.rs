//! Property-based tests for surface extraction.
//!
//! These tests use proptest to generate random scalar fields and verify the
//! structural invariants of the output.
//!
//! Run with: cargo test -p surface-nets -- proptest

use proptest::prelude::*;
use surface_nets::{
    ClassificationMask, ScalarField, SurfaceNetsParams, classify, extract_mesh, place_vertex,
    required_capacity,
};

// =============================================================================
// Strategies for generating random fields
// =============================================================================

/// Generate a random cubic field with `min..=max` samples per axis.
fn arb_field(min: usize, max: usize) -> impl Strategy<Value = (usize, Vec<f32>)> {
    (min..=max).prop_flat_map(|size| {
        prop::collection::vec(-1.0f32..1.0, size * size * size).prop_map(move |v| (size, v))
    })
}

/// Generate the 8 corner samples of a single cell.
fn arb_corners() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-1.0f32..1.0, 8)
}

// =============================================================================
// Extraction invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Output always fits the worst-case capacity and references valid vertices.
    #[test]
    fn proptest_output_within_capacity((size, samples) in arb_field(2, 7)) {
        let field = ScalarField::new(&samples, size).unwrap();
        let mesh = extract_mesh(&field, &SurfaceNetsParams::default()).unwrap();
        let cap = required_capacity(size).unwrap();

        prop_assert!(mesh.vertex_count() <= cap.vertices);
        prop_assert!(mesh.indices.len() <= cap.triangle_indices);
        prop_assert_eq!(mesh.indices.len() % 6, 0);
        for &i in &mesh.indices {
            prop_assert!((i as usize) < mesh.vertex_count());
        }
    }

    /// Every vertex lies within the box of contributing cells, grown by one cell.
    #[test]
    fn proptest_vertices_within_bounds((size, samples) in arb_field(2, 7)) {
        let field = ScalarField::new(&samples, size).unwrap();
        let mesh = extract_mesh(&field, &SurfaceNetsParams::positions_only()).unwrap();

        match mesh.bounds {
            None => prop_assert!(mesh.is_empty()),
            Some(b) => {
                for p in &mesh.positions {
                    for axis in 0..3 {
                        prop_assert!(p[axis] >= b.min[axis] - 1e-5);
                        prop_assert!(p[axis] <= b.max[axis] + 1.0 + 1e-5);
                    }
                }
            }
        }
    }

    /// The parallel sweep reproduces the serial one exactly.
    #[test]
    fn proptest_parallel_matches_serial((size, samples) in arb_field(2, 6)) {
        let field = ScalarField::new(&samples, size).unwrap();
        let serial = extract_mesh(&field, &SurfaceNetsParams::default()).unwrap();
        let parallel =
            extract_mesh(&field, &SurfaceNetsParams::default().with_parallel(true)).unwrap();
        prop_assert_eq!(serial, parallel);
    }

    /// NaN samples never break the topology.
    #[test]
    fn proptest_nan_samples_tolerated(
        (size, mut samples) in arb_field(3, 5),
        holes in prop::collection::vec(any::<prop::sample::Index>(), 1..4),
    ) {
        let len = samples.len();
        for hole in holes {
            samples[hole.index(len)] = f32::NAN;
        }
        let field = ScalarField::new(&samples, size).unwrap();
        let mesh = extract_mesh(&field, &SurfaceNetsParams::default()).unwrap();
        for &i in &mesh.indices {
            prop_assert!((i as usize) < mesh.vertex_count());
        }
    }
}

// =============================================================================
// Single-cell invariants
// =============================================================================

proptest! {
    /// The vertex lies in its unit cell and the crossing count matches the mask.
    #[test]
    fn proptest_vertex_inside_cell(corners in arb_corners()) {
        // Lay the corners out on a 2³ grid in CORNER_OFFSETS order.
        let mut samples = vec![0.0f32; 8];
        for (corner, &[dx, dy, dz]) in surface_nets::tables::CORNER_OFFSETS.iter().enumerate() {
            samples[dx + dy * 2 + dz * 4] = corners[corner];
        }
        let field = ScalarField::new(&samples, 2).unwrap();
        let mask = classify(&field, [0, 0, 0]);

        match place_vertex(&field, [0, 0, 0], mask) {
            None => prop_assert!(mask == ClassificationMask::EMPTY || mask == ClassificationMask::FULL),
            Some(v) => {
                prop_assert!(v.crossings >= 3);
                // Cut size of a corner set on the cube graph has the set's parity.
                prop_assert_eq!(v.crossings % 2, mask.bits().count_ones() as usize % 2);
                for axis in 0..3 {
                    prop_assert!(v.position[axis] >= -1e-5);
                    prop_assert!(v.position[axis] <= 1.0 + 1e-5);
                }
            }
        }
    }
}
