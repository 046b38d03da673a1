//! Scalar and small-vector helpers shared by the SDF code
//!
//! These mirror the handful of shading-language builtins that distance
//! functions lean on (`mix`, `smoothstep`, `mod`) plus planar rotations.

use glam::{Vec2, Vec3};

/// Linear interpolation `a + (b - a) * t`
#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite smoothstep between two edges
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Floored modulo, matching the shading-language `mod` (result has the sign of `y`)
#[inline]
pub fn modulo(x: f32, y: f32) -> f32 {
    x - y * (x / y).floor()
}

/// Squared length, `dot(v, v)`
#[inline]
pub fn dot2(v: Vec2) -> f32 {
    v.dot(v)
}

/// Rotate a 2D vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate_2d(v: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(c * v.x - s * v.y, s * v.x + c * v.y)
}

/// Normalize `v`, or return `None` when it is too short to have a direction
#[inline]
pub fn safe_normalize(v: Vec3) -> Option<Vec3> {
    v.try_normalize()
}

/// Deterministic point set for sampling a cube, used by tests and calibration.
///
/// Uses the R3 low-discrepancy sequence so results are reproducible without
/// a random number generator.
pub fn sample_points(count: usize, half_extent: f32) -> impl Iterator<Item = Vec3> {
    const G: f32 = 1.220_744_1; // plastic constant for three dimensions
    let alpha = Vec3::new(1.0 / G, 1.0 / (G * G), 1.0 / (G * G * G));
    (0..count).map(move |i| {
        let u = (Vec3::splat(0.5) + alpha * (i as f32 + 1.0)).fract();
        (u * 2.0 - Vec3::ONE) * half_extent
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn modulo_is_floored() {
        assert_relative_eq!(modulo(-0.25, 1.0), 0.75);
        assert_relative_eq!(modulo(2.5, 1.0), 0.5);
    }

    #[test]
    fn rotate_quarter_turn() {
        let r = rotate_2d(Vec2::X, std::f32::consts::FRAC_PI_2);
        assert_relative_eq!(r.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(r.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn smoothstep_edges() {
        assert_relative_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_relative_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
        assert_relative_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
    }

    #[test]
    fn sample_points_stay_in_cube() {
        let points: Vec<_> = sample_points(256, 2.0).collect();
        assert_eq!(points.len(), 256);
        assert!(points.iter().all(|p| p.abs().max_element() <= 2.0));
        // not all the same point
        assert!(points.windows(2).all(|w| w[0] != w[1]));
    }

    #[test]
    fn safe_normalize_rejects_zero() {
        assert!(safe_normalize(Vec3::ZERO).is_none());
        assert!(safe_normalize(Vec3::new(0.0, 3.0, 0.0)).is_some());
    }
}
