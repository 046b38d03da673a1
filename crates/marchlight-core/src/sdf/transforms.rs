//! SDF Transforms - Translation, rotation, scale, deformations
//!
//! A transform maps the query point into the shape's local frame. Rigid
//! transforms keep distances exact. Scale rescales the result. Bend and
//! twist stretch space, so they multiply the inner distance by a caller
//! supplied factor to keep the field a lower bound.

use super::{DistanceSample, Sdf};
use crate::math::rotate_2d;
use glam::{Quat, Vec2, Vec3, Vec3Swizzles};

// ============================================================================
// Basic Transforms
// ============================================================================

/// Translation transform
pub struct Translate<S: Sdf> {
    pub inner: S,
    pub offset: Vec3,
}

impl<S: Sdf> Translate<S> {
    pub fn new(inner: S, offset: Vec3) -> Self {
        Self { inner, offset }
    }
}

impl<S: Sdf> Sdf for Translate<S> {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(p - self.offset)
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        self.inner.sample(p - self.offset)
    }
}

/// Rotation transform
pub struct Rotate<S: Sdf> {
    pub inner: S,
    pub rotation: Quat,
    inverse: Quat,
}

impl<S: Sdf> Rotate<S> {
    pub fn new(inner: S, rotation: Quat) -> Self {
        let rotation = rotation.normalize();
        Self {
            inner,
            rotation,
            inverse: rotation.inverse(),
        }
    }

    /// Rotation about an arbitrary axis. A zero axis leaves the shape as is.
    pub fn axis_angle(inner: S, axis: Vec3, angle: f32) -> Self {
        let rotation = axis
            .try_normalize()
            .map_or(Quat::IDENTITY, |axis| Quat::from_axis_angle(axis, angle));
        Self::new(inner, rotation)
    }
}

impl<S: Sdf> Sdf for Rotate<S> {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(self.inverse * p)
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        self.inner.sample(self.inverse * p)
    }
}

/// Uniform scale transform
pub struct Scale<S: Sdf> {
    pub inner: S,
    pub factor: f32,
}

impl<S: Sdf> Scale<S> {
    /// Non-positive factors are clamped to a tiny positive scale
    pub fn new(inner: S, factor: f32) -> Self {
        Self {
            inner,
            factor: factor.max(f32::EPSILON),
        }
    }
}

impl<S: Sdf> Sdf for Scale<S> {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(p / self.factor) * self.factor
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        let s = self.inner.sample(p / self.factor);
        DistanceSample::new(s.distance * self.factor, s.material)
    }
}

/// Mirror across a plane through origin
pub struct Mirror<S: Sdf> {
    pub inner: S,
    pub axis: Vec3,
}

impl<S: Sdf> Mirror<S> {
    pub fn new(inner: S, axis: Vec3) -> Self {
        Self {
            inner,
            axis: axis.try_normalize().unwrap_or(Vec3::X),
        }
    }

    fn fold(&self, p: Vec3) -> Vec3 {
        let d = p.dot(self.axis);
        if d < 0.0 { p - 2.0 * d * self.axis } else { p }
    }
}

impl<S: Sdf> Sdf for Mirror<S> {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(self.fold(p))
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        self.inner.sample(self.fold(p))
    }
}

/// Absolute value per selected axis
pub struct Symmetry<S: Sdf> {
    pub inner: S,
    pub axes: [bool; 3],
}

impl<S: Sdf> Symmetry<S> {
    pub fn new(inner: S, x: bool, y: bool, z: bool) -> Self {
        Self {
            inner,
            axes: [x, y, z],
        }
    }

    fn fold(&self, p: Vec3) -> Vec3 {
        let [x, y, z] = self.axes;
        Vec3::new(
            if x { p.x.abs() } else { p.x },
            if y { p.y.abs() } else { p.y },
            if z { p.z.abs() } else { p.z },
        )
    }
}

impl<S: Sdf> Sdf for Symmetry<S> {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(self.fold(p))
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        self.inner.sample(self.fold(p))
    }
}

// ============================================================================
// Deformation Transforms
// ============================================================================

/// Twist: `p.xz` turns by `amount * p.y` radians (clockwise seen from +Y)
pub struct Twist<S: Sdf> {
    pub inner: S,
    pub amount: f32,
    pub distance_scale: f32,
}

impl<S: Sdf> Twist<S> {
    pub fn new(inner: S, amount: f32) -> Self {
        Self {
            inner,
            amount,
            distance_scale: 1.0,
        }
    }

    /// Multiply returned distances by `scale`, typically `1 / (1 + |k| * extent)`
    pub fn with_distance_scale(mut self, scale: f32) -> Self {
        self.distance_scale = scale;
        self
    }

    /// Scale distances for a shape reaching `extent` from the Y axis
    pub fn with_extent(self, extent: f32) -> Self {
        let scale = warp_distance_scale(self.amount, extent);
        self.with_distance_scale(scale)
    }

    fn warp(&self, p: Vec3) -> Vec3 {
        twist_point(p, self.amount)
    }
}

impl<S: Sdf> Sdf for Twist<S> {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(self.warp(p)) * self.distance_scale
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        let s = self.inner.sample(self.warp(p));
        DistanceSample::new(s.distance * self.distance_scale, s.material)
    }
}

/// Cheap bend: `p.xy` turns by `amount * p.x` radians (clockwise seen from +Z)
pub struct Bend<S: Sdf> {
    pub inner: S,
    pub amount: f32,
    pub distance_scale: f32,
}

impl<S: Sdf> Bend<S> {
    pub fn new(inner: S, amount: f32) -> Self {
        Self {
            inner,
            amount,
            distance_scale: 1.0,
        }
    }

    /// Multiply returned distances by `scale`, typically `1 / (1 + |k| * extent)`
    pub fn with_distance_scale(mut self, scale: f32) -> Self {
        self.distance_scale = scale;
        self
    }

    /// Scale distances for a shape reaching `extent` from the Z axis
    pub fn with_extent(self, extent: f32) -> Self {
        let scale = warp_distance_scale(self.amount, extent);
        self.with_distance_scale(scale)
    }

    fn warp(&self, p: Vec3) -> Vec3 {
        bend_point(p, self.amount)
    }
}

impl<S: Sdf> Sdf for Bend<S> {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(self.warp(p)) * self.distance_scale
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        let s = self.inner.sample(self.warp(p));
        DistanceSample::new(s.distance * self.distance_scale, s.material)
    }
}

/// Distance factor that keeps a bend or twist of `amount` a lower bound
/// while the warped plane stays within `extent` of its axis.
///
/// The warp stretches space by at most `1 + |amount| * extent` there.
#[inline]
pub fn warp_distance_scale(amount: f32, extent: f32) -> f32 {
    1.0 / (1.0 + amount.abs() * extent.max(0.0))
}

/// The bend warp on its own, for scene code that warps points by hand
#[inline]
pub fn bend_point(p: Vec3, k: f32) -> Vec3 {
    let xy = rotate_2d(Vec2::new(p.x, p.y), -k * p.x);
    Vec3::new(xy.x, xy.y, p.z)
}

/// The twist warp on its own
#[inline]
pub fn twist_point(p: Vec3, k: f32) -> Vec3 {
    let xz = rotate_2d(p.xz(), -k * p.y);
    Vec3::new(xz.x, p.y, xz.y)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::sample_points;
    use crate::sdf::primitives::{box3, sphere, torus};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn translate_moves_center() {
        let s = Translate::new(sphere(1.0), Vec3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(s.distance(Vec3::new(2.0, 0.0, 0.0)), -1.0);
        assert_relative_eq!(s.distance(Vec3::ZERO), 1.0);
    }

    #[test]
    fn rotate_quarter_turn_about_z() {
        let b = Rotate::new(box3(Vec3::new(2.0, 0.5, 0.5)), Quat::from_rotation_z(FRAC_PI_2));
        // the long axis now points along Y
        assert!(b.distance(Vec3::new(0.0, 1.5, 0.0)) < 0.0);
        assert!(b.distance(Vec3::new(1.5, 0.0, 0.0)) > 0.0);
    }

    #[test]
    fn rotate_preserves_distance() {
        let t = torus(1.0, 0.25);
        let r = Rotate::axis_angle(torus(1.0, 0.25), Vec3::new(1.0, 1.0, 0.0), 0.7);
        let q = Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.0).normalize(), 0.7);
        for p in sample_points(128, 2.0) {
            assert_abs_diff_eq!(r.distance(q * p), t.distance(p), epsilon = 1e-5);
        }
    }

    #[test]
    fn rotate_with_zero_axis_is_identity() {
        let r = Rotate::axis_angle(sphere(1.0), Vec3::ZERO, 1.0);
        assert_relative_eq!(r.distance(Vec3::new(2.0, 0.0, 0.0)), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn scale_keeps_distances_metric() {
        let s = Scale::new(sphere(1.0), 2.0);
        assert_relative_eq!(s.distance(Vec3::new(3.0, 0.0, 0.0)), 1.0);
        assert_relative_eq!(s.distance(Vec3::ZERO), -2.0);
    }

    #[test]
    fn mirror_reflects_negative_side() {
        let m = Mirror::new(Translate::new(sphere(0.5), Vec3::X), Vec3::X);
        assert_relative_eq!(m.distance(Vec3::new(-1.0, 0.0, 0.0)), -0.5);
    }

    #[test]
    fn symmetry_folds_selected_axes() {
        let s = Symmetry::new(Translate::new(sphere(0.25), Vec3::new(1.0, 1.0, 0.0)), true, false, false);
        assert_relative_eq!(s.distance(Vec3::new(-1.0, 1.0, 0.0)), -0.25);
        assert!(s.distance(Vec3::new(1.0, -1.0, 0.0)) > 0.0);
    }

    #[test]
    fn bend_and_twist_are_identity_at_zero() {
        for p in sample_points(64, 1.5) {
            assert!((bend_point(p, 0.0) - p).length() < 1e-6);
            assert!((twist_point(p, 0.0) - p).length() < 1e-6);
        }
    }

    #[test]
    fn bend_leaves_the_y_axis_alone() {
        // points with x = 0 are not rotated
        let p = Vec3::new(0.0, 0.7, -0.3);
        assert!((bend_point(p, 2.0) - p).length() < 1e-6);
    }

    #[test]
    fn bend_rotates_clockwise_by_k_x() {
        let q = bend_point(Vec3::new(1.0, 0.0, 0.0), FRAC_PI_2);
        assert_abs_diff_eq!(q.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(q.y, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn twist_keeps_height() {
        let q = twist_point(Vec3::new(1.0, 2.0, 0.0), 0.3);
        assert_relative_eq!(q.y, 2.0);
        assert_relative_eq!(q.xz().length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn warp_distance_scale_multiplies() {
        let b = Bend::new(sphere(1.0), 0.0).with_distance_scale(0.5);
        assert_relative_eq!(b.distance(Vec3::new(3.0, 0.0, 0.0)), 1.0);
        let t = Twist::new(sphere(1.0), 1.0).with_distance_scale(0.5);
        assert_relative_eq!(t.distance(Vec3::ZERO), -0.5);
    }
}
