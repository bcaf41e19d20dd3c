//! Angle utilities shared by the trajectory helpers.

/// Computes the unsigned angle between two 2D vectors in radians.
/// Returns a value in [0, π]. Zero if the vectors are parallel
/// and pointing in the same direction; π if they are opposite.
#[inline]
pub fn angle_between(a: &[f32; 2], b: &[f32; 2]) -> f32 {
    let dot = a[0] * b[0] + a[1] * b[1];
    let na = norm(a).max(1e-6);
    let nb = norm(b).max(1e-6);
    (dot / (na * nb)).clamp(-1.0, 1.0).acos()
}

/// Euclidean length of a 2D vector.
#[inline]
pub fn norm(v: &[f32; 2]) -> f32 {
    (v[0] * v[0] + v[1] * v[1]).sqrt()
}
