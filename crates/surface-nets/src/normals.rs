//! Surface normals and tangents from the field gradient.
//!
//! Normals are central differences of [`ScalarField::trilinear_sample`], so
//! they follow the same linear model that places vertices on cell edges.

use nalgebra::{Point3, Vector3, Vector4};

use crate::field::ScalarField;

/// Default finite-difference step, in grid units.
pub const DEFAULT_NORMAL_STEP: f32 = 0.01;

/// Squared length below which the up-based tangent candidate is rejected.
const TANGENT_DEGENERATE_SQ: f32 = 1e-6;

/// Unnormalized central-difference gradient at `p`.
pub fn gradient(field: &ScalarField<'_>, p: Point3<f32>, h: f32) -> Vector3<f32> {
    let dx = Vector3::new(h, 0.0, 0.0);
    let dy = Vector3::new(0.0, h, 0.0);
    let dz = Vector3::new(0.0, 0.0, h);

    Vector3::new(
        field.trilinear_sample(p + dx) - field.trilinear_sample(p - dx),
        field.trilinear_sample(p + dy) - field.trilinear_sample(p - dy),
        field.trilinear_sample(p + dz) - field.trilinear_sample(p - dz),
    )
}

/// Outward unit normal at `p`.
///
/// A flat neighbourhood has a zero gradient; the result is then the zero
/// vector rather than NaN.
pub fn estimate_normal(field: &ScalarField<'_>, p: Point3<f32>, h: f32) -> Vector3<f32> {
    normalize_or_zero(gradient(field, p, h))
}

/// Unit tangent perpendicular to `normal`.
///
/// Crosses the normal with world up, falling back to world forward when the
/// normal is nearly vertical. A zero normal gives a zero tangent.
pub fn estimate_tangent(normal: &Vector3<f32>) -> Vector3<f32> {
    let mut candidate = normal.cross(&Vector3::y());
    if candidate.norm_squared() < TANGENT_DEGENERATE_SQ {
        candidate = normal.cross(&Vector3::z());
    }
    normalize_or_zero(candidate)
}

/// Tangent packed as `[x, y, z, w]`.
///
/// `w` is always 0: no bitangent handedness is computed. Consumers that need
/// a sign must derive it themselves.
#[inline]
pub fn pack_tangent(tangent: &Vector3<f32>) -> Vector4<f32> {
    Vector4::new(tangent.x, tangent.y, tangent.z, 0.0)
}

#[inline]
fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    v.try_normalize(0.0).unwrap_or_else(Vector3::zeros)
}
