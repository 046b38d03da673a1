//! Clifford torus seen through an inverse stereographic projection
//!
//! Points in 3D are lifted onto the unit 3-sphere, rotated in 4D, measured
//! against the flat torus `|xy| = |zw|`, and the resulting distance is
//! pulled back to 3D. The projection is not an isometry, so the final
//! distance goes through [`fix_distance`], whose constants were tuned by
//! comparing against an ordinary torus of the same size.

use super::{DistanceSample, Sdf};
use crate::math::rotate_2d;
use glam::{Vec2, Vec3, Vec4};
use std::f32::consts::PI;

/// Scale that makes surface uv distances match depth distances
pub const DEFAULT_UV_SCALE: f32 = 2.25;

/// Lift `p` onto the unit 3-sphere. Returns the 4D point and the scale factor `k`.
#[inline]
pub fn inverse_stereographic(p: Vec3) -> (Vec4, f32) {
    let k = 2.0 / (1.0 + p.dot(p));
    ((k * p).extend(k - 1.0), k)
}

/// Distance to the flat torus `|xy| = |zw|` on the 3-sphere, plus surface uv in `0..1`.
///
/// The two sides are mirror images: where `|xy| < |zw|` the value is
/// positive, elsewhere negative.
pub fn torus_4d(p4: Vec4) -> (f32, Vec2) {
    let xy = Vec2::new(p4.x, p4.y).length();
    let zw = Vec2::new(p4.z, p4.w).length();
    let d1 = xy / zw - 1.0;
    let d2 = zw / xy - 1.0;
    let d = (if d1 < 0.0 { -d1 } else { d2 }) / PI;
    let uv = Vec2::new(p4.y.atan2(p4.x), p4.z.atan2(p4.w)) / PI * 0.5 + Vec2::splat(0.5);
    (d, uv)
}

/// Pull a distance measured on the projected surface back into 3D space
#[inline]
pub fn fix_distance(d: f32, k: f32) -> f32 {
    let sn = if d < 0.0 { -1.0 } else { 1.0 };
    let d = ((d.abs() / k * 1.82 + 1.0).sqrt() - 1.0) * (5.0 / 3.0);
    d * sn
}

/// A pattern wrapped around a Clifford torus.
///
/// `surface` is evaluated in the unrolled frame `(u, v, depth)` where `u, v`
/// run over `0..uv_scale` and `depth` is the signed distance to the torus.
/// A surface of `|depth| - t` gives a plain shell.
pub struct CliffordTorus<S: Sdf> {
    pub surface: S,
    pub uv_scale: f32,
    /// Rotation in the 4D `zy` plane
    pub zy_angle: f32,
    /// Rotation in the 4D `xw` plane; turning this turns the torus inside out
    pub xw_angle: f32,
}

impl<S: Sdf> CliffordTorus<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            uv_scale: DEFAULT_UV_SCALE,
            zy_angle: 0.0,
            xw_angle: 0.0,
        }
    }

    /// Rotate both 4D planes by the same angle
    pub fn with_rotation(mut self, angle: f32) -> Self {
        self.zy_angle = angle;
        self.xw_angle = angle;
        self
    }

    pub fn with_uv_scale(mut self, uv_scale: f32) -> Self {
        self.uv_scale = uv_scale;
        self
    }

    /// Map a 3D point into the unrolled surface frame, returning the frame
    /// point and the stereographic scale needed by [`fix_distance`]
    pub fn unroll(&self, p: Vec3) -> (Vec3, f32) {
        let (mut p4, k) = inverse_stereographic(p);

        let zy = rotate_2d(Vec2::new(p4.z, p4.y), -self.zy_angle);
        p4.z = zy.x;
        p4.y = zy.y;

        let xw = rotate_2d(Vec2::new(p4.x, p4.w), -self.xw_angle);
        p4.x = xw.x;
        p4.w = xw.y;

        let (d, uv) = torus_4d(p4);
        ((uv * self.uv_scale).extend(d), k)
    }
}

impl<S: Sdf> Sdf for CliffordTorus<S> {
    fn distance(&self, p: Vec3) -> f32 {
        let (local, k) = self.unroll(p);
        fix_distance(self.surface.distance(local), k)
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        let (local, k) = self.unroll(p);
        let s = self.surface.sample(local);
        DistanceSample::new(fix_distance(s.distance, k), s.material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::sample_points;
    use crate::sdf::field;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    /// Radius of the inner equator of the projected torus
    const INNER: f32 = std::f32::consts::SQRT_2 - 1.0;
    const OUTER: f32 = std::f32::consts::SQRT_2 + 1.0;

    #[test]
    fn projection_lands_on_unit_three_sphere() {
        for p in sample_points(128, 4.0) {
            let (p4, _) = inverse_stereographic(p);
            assert_relative_eq!(p4.length(), 1.0, epsilon = 1e-5);
        }
        let (p4, k) = inverse_stereographic(Vec3::ZERO);
        assert_eq!(p4, Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_relative_eq!(k, 2.0);
    }

    #[test]
    fn flat_torus_distance_is_antisymmetric() {
        let (a, _) = torus_4d(Vec4::new(0.3, 0.0, 0.0, 0.8));
        let (b, _) = torus_4d(Vec4::new(0.8, 0.0, 0.0, 0.3));
        assert_relative_eq!(a, -b, epsilon = 1e-6);
        assert!(a > 0.0);

        let s = std::f32::consts::FRAC_1_SQRT_2;
        let (on, _) = torus_4d(Vec4::new(s, 0.0, 0.0, s));
        assert_abs_diff_eq!(on, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn uv_stays_in_unit_square() {
        for p in sample_points(128, 3.0) {
            let (p4, _) = inverse_stereographic(p);
            let (_, uv) = torus_4d(p4);
            assert!((0.0..=1.0).contains(&uv.x));
            assert!((0.0..=1.0).contains(&uv.y));
        }
    }

    #[test]
    fn fixed_distance_is_odd_and_monotonic() {
        assert_relative_eq!(fix_distance(0.0, 1.3), 0.0);
        assert_relative_eq!(fix_distance(-0.2, 0.7), -fix_distance(0.2, 0.7));
        assert!(fix_distance(0.3, 1.0) > fix_distance(0.2, 1.0));
    }

    #[test]
    fn plain_torus_has_its_equators_on_the_x_axis() {
        let torus = CliffordTorus::new(field(|p: Vec3| p.z));
        assert_abs_diff_eq!(torus.distance(Vec3::new(INNER, 0.0, 0.0)), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(torus.distance(Vec3::new(0.0, OUTER, 0.0)), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn fixed_distance_never_oversteps_along_the_axis() {
        let torus = CliffordTorus::new(field(|p: Vec3| p.z));
        for x in [0.0f32, 0.2, 0.8, 1.5, 3.0, 5.0] {
            // nearest equator is an upper bound on the true distance
            let bound = (x - INNER).abs().min((x - OUTER).abs());
            let inside = x > INNER && x < OUTER;
            let d = torus.distance(Vec3::new(x, 0.0, 0.0));
            assert_eq!(d < 0.0, inside, "wrong side at x = {x}");
            assert!(d.abs() <= bound + 1e-4, "overstep at x = {x}: {d} > {bound}");
        }
    }

    #[test]
    fn rotated_torus_stays_finite() {
        let torus = CliffordTorus::new(field(|p: Vec3| p.z.abs() - 0.01)).with_rotation(PI / 4.0);
        for p in sample_points(64, 2.0) {
            assert!(torus.distance(p).is_finite());
        }
    }
}
