//! SDF Operations - Boolean, modifiers, repetition
//!
//! The scalar functions at the top of this module are the building blocks;
//! the structs wrap them around whole SDFs so they compose with [`SdfExt`].
//!
//! [`SdfExt`]: super::SdfExt

use super::{DistanceSample, Sdf, smooth_weight};
use crate::math::{mix, modulo};
use glam::{UVec3, Vec2, Vec3, Vec3Swizzles};

// ============================================================================
// Scalar combinators
// ============================================================================

/// Hard union
#[inline]
pub fn op_union(a: f32, b: f32) -> f32 {
    a.min(b)
}

/// Cut `b` out of `a`
#[inline]
pub fn op_subtract(a: f32, b: f32) -> f32 {
    a.max(-b)
}

/// Keep the overlap of `a` and `b`
#[inline]
pub fn op_intersect(a: f32, b: f32) -> f32 {
    a.max(b)
}

/// Polynomial smooth minimum. `k <= 0` is a hard union.
#[inline]
pub fn smooth_min(a: f32, b: f32, k: f32) -> f32 {
    if k <= 0.0 {
        return a.min(b);
    }
    let h = smooth_weight(a, b, k);
    mix(b, a, h) - k * h * (1.0 - h)
}

/// Polynomial smooth subtraction of `b` from `a`
#[inline]
pub fn smooth_subtract(a: f32, b: f32, k: f32) -> f32 {
    if k <= 0.0 {
        return op_subtract(a, b);
    }
    let h = (0.5 - 0.5 * (a + b) / k).clamp(0.0, 1.0);
    mix(a, -b, h) + k * h * (1.0 - h)
}

/// Polynomial smooth intersection
#[inline]
pub fn smooth_intersect(a: f32, b: f32, k: f32) -> f32 {
    if k <= 0.0 {
        return op_intersect(a, b);
    }
    let h = (0.5 - 0.5 * (b - a) / k).clamp(0.0, 1.0);
    mix(b, a, h) + k * h * (1.0 - h)
}

/// Round max: intersection with a circular fillet of radius `r`
#[inline]
pub fn smooth_max(a: f32, b: f32, r: f32) -> f32 {
    let u = Vec2::new(r + a, r + b).max(Vec2::ZERO);
    (-r).min(a.max(b)) + u.length()
}

/// Exponential smooth minimum, `-ln(e^-ka + e^-kb) / k`
#[inline]
pub fn smooth_min_exp(a: f32, b: f32, k: f32) -> f32 {
    if k <= 0.0 {
        return a.min(b);
    }
    // factor out the smaller term so large k does not overflow
    let m = a.min(b);
    let sum = (-k * (a - m)).exp() + (-k * (b - m)).exp();
    m - sum.ln() / k
}

/// Shell of half thickness `h` around the zero set of `d`
#[inline]
pub fn onion(d: f32, h: f32) -> f32 {
    d.abs() - h
}

/// Fold `p` into a cell of `size` centred on the origin and return the cell id
#[inline]
pub fn mod2(p: Vec2, size: Vec2) -> (Vec2, Vec2) {
    let half = size * 0.5;
    let cell = ((p + half) / size).floor();
    let folded = Vec2::new(modulo(p.x + half.x, size.x), modulo(p.y + half.y, size.y)) - half;
    (folded, cell)
}

// ============================================================================
// Boolean Operations
// ============================================================================

/// Union of two SDFs (combine shapes)
pub struct Union<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf, B: Sdf> Union<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf, B: Sdf> Sdf for Union<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        op_union(self.a.distance(p), self.b.distance(p))
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        self.a.sample(p).union(self.b.sample(p))
    }
}

/// Subtraction of two SDFs (cut B from A)
pub struct Subtract<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf, B: Sdf> Subtract<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf, B: Sdf> Sdf for Subtract<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        op_subtract(self.a.distance(p), self.b.distance(p))
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        self.a.sample(p).subtract(self.b.sample(p))
    }
}

/// Intersection of two SDFs (keep only overlap)
pub struct Intersect<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf, B: Sdf> Intersect<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf, B: Sdf> Sdf for Intersect<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        op_intersect(self.a.distance(p), self.b.distance(p))
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        self.a.sample(p).intersect(self.b.sample(p))
    }
}

// ============================================================================
// Smooth Boolean Operations
// ============================================================================

/// Smooth union with polynomial blending
pub struct SmoothUnion<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
    pub k: f32,
}

impl<A: Sdf, B: Sdf> SmoothUnion<A, B> {
    pub fn new(a: A, b: B, k: f32) -> Self {
        Self { a, b, k }
    }
}

impl<A: Sdf, B: Sdf> Sdf for SmoothUnion<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        smooth_min(self.a.distance(p), self.b.distance(p), self.k)
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        self.a.sample(p).smooth_union(self.b.sample(p), self.k)
    }
}

/// Smooth subtraction
pub struct SmoothSubtract<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
    pub k: f32,
}

impl<A: Sdf, B: Sdf> SmoothSubtract<A, B> {
    pub fn new(a: A, b: B, k: f32) -> Self {
        Self { a, b, k }
    }
}

impl<A: Sdf, B: Sdf> Sdf for SmoothSubtract<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        smooth_subtract(self.a.distance(p), self.b.distance(p), self.k)
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        let a = self.a.sample(p);
        DistanceSample::new(smooth_subtract(a.distance, self.b.distance(p), self.k), a.material)
    }
}

/// Smooth intersection
pub struct SmoothIntersect<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
    pub k: f32,
}

impl<A: Sdf, B: Sdf> SmoothIntersect<A, B> {
    pub fn new(a: A, b: B, k: f32) -> Self {
        Self { a, b, k }
    }
}

impl<A: Sdf, B: Sdf> Sdf for SmoothIntersect<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        smooth_intersect(self.a.distance(p), self.b.distance(p), self.k)
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        let a = self.a.sample(p);
        DistanceSample::new(smooth_intersect(a.distance, self.b.distance(p), self.k), a.material)
    }
}

/// Intersection with a round fillet (see [`smooth_max`])
pub struct RoundIntersect<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
    pub r: f32,
}

impl<A: Sdf, B: Sdf> RoundIntersect<A, B> {
    pub fn new(a: A, b: B, r: f32) -> Self {
        Self { a, b, r }
    }
}

impl<A: Sdf, B: Sdf> Sdf for RoundIntersect<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        smooth_max(self.a.distance(p), self.b.distance(p), self.r)
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        let a = self.a.sample(p);
        DistanceSample::new(smooth_max(a.distance, self.b.distance(p), self.r), a.material)
    }
}

// ============================================================================
// Modifiers
// ============================================================================

/// Inflate the surface by a radius
pub struct Round<S: Sdf> {
    pub inner: S,
    pub radius: f32,
}

impl<S: Sdf> Round<S> {
    pub fn new(inner: S, radius: f32) -> Self {
        Self { inner, radius }
    }
}

impl<S: Sdf> Sdf for Round<S> {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(p) - self.radius
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        let s = self.inner.sample(p);
        DistanceSample::new(s.distance - self.radius, s.material)
    }
}

/// Hollow shell, `|d| - thickness`. Nest it for concentric shells.
pub struct Onion<S: Sdf> {
    pub inner: S,
    pub thickness: f32,
}

impl<S: Sdf> Onion<S> {
    pub fn new(inner: S, thickness: f32) -> Self {
        Self { inner, thickness }
    }
}

impl<S: Sdf> Sdf for Onion<S> {
    fn distance(&self, p: Vec3) -> f32 {
        onion(self.inner.distance(p), self.thickness)
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        let s = self.inner.sample(p);
        DistanceSample::new(onion(s.distance, self.thickness), s.material)
    }
}

/// Shell is the same operation under its modelling-tool name
pub type Shell<S> = Onion<S>;

/// Inside-out field, used to march from within a solid
pub struct Negate<S: Sdf> {
    pub inner: S,
}

impl<S: Sdf> Negate<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: Sdf> Sdf for Negate<S> {
    fn distance(&self, p: Vec3) -> f32 {
        -self.inner.distance(p)
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        self.inner.sample(p).negate()
    }
}

/// Tag every sample of the inner SDF with a fixed material id
pub struct Material<S: Sdf> {
    pub inner: S,
    pub id: f32,
}

impl<S: Sdf> Material<S> {
    pub fn new(inner: S, id: f32) -> Self {
        Self { inner, id }
    }
}

impl<S: Sdf> Sdf for Material<S> {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(p)
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        DistanceSample::new(self.inner.distance(p), self.id)
    }
}

// ============================================================================
// Repetition
// ============================================================================

/// Infinite repetition, `mod(p + s/2, s) - s/2` per axis
pub struct RepeatInfinite<S: Sdf> {
    pub inner: S,
    pub spacing: Vec3,
}

impl<S: Sdf> RepeatInfinite<S> {
    pub fn new(inner: S, spacing: Vec3) -> Self {
        Self { inner, spacing }
    }

    fn fold(&self, p: Vec3) -> Vec3 {
        (p + self.spacing * 0.5).rem_euclid(self.spacing) - self.spacing * 0.5
    }
}

impl<S: Sdf> Sdf for RepeatInfinite<S> {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(self.fold(p))
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        self.inner.sample(self.fold(p))
    }
}

/// Limited (finite) repetition, `count` copies per axis starting at the origin
pub struct RepeatLimited<S: Sdf> {
    pub inner: S,
    pub spacing: Vec3,
    pub count: UVec3,
}

impl<S: Sdf> RepeatLimited<S> {
    pub fn new(inner: S, spacing: Vec3, count: UVec3) -> Self {
        Self {
            inner,
            spacing,
            count: count.max(UVec3::ONE),
        }
    }
}

impl<S: Sdf> Sdf for RepeatLimited<S> {
    fn distance(&self, p: Vec3) -> f32 {
        self.sample(p).distance
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        let last = self.count.as_vec3() - Vec3::ONE;
        let id = (p / self.spacing).round().clamp(Vec3::ZERO, last);
        let o = (p - self.spacing * id).signum();
        let mut best = DistanceSample::MISS;

        // the nearest copy is either this cell or one of its neighbours
        for z in 0..=1 {
            for y in 0..=1 {
                for x in 0..=1 {
                    let rid = (id + Vec3::new(x as f32, y as f32, z as f32) * o)
                        .clamp(Vec3::ZERO, last);
                    best = best.union(self.inner.sample(p - self.spacing * rid));
                }
            }
        }

        best
    }
}

/// Polar (radial) repetition around Y axis
pub struct RepeatPolar<S: Sdf> {
    pub inner: S,
    pub count: u32,
}

impl<S: Sdf> RepeatPolar<S> {
    pub fn new(inner: S, count: u32) -> Self {
        Self {
            inner,
            count: count.max(1),
        }
    }

    fn fold(&self, p: Vec3) -> Vec3 {
        let sector = std::f32::consts::TAU / self.count as f32;
        let angle = p.z.atan2(p.x) + sector * 0.5;
        let folded = modulo(angle, sector) - sector * 0.5;
        let r = p.xz().length();
        Vec3::new(r * folded.cos(), p.y, r * folded.sin())
    }
}

impl<S: Sdf> Sdf for RepeatPolar<S> {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(self.fold(p))
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        self.inner.sample(self.fold(p))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::sample_points;
    use crate::sdf::primitives::{cube, sphere};
    use crate::sdf::transforms::Translate;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    // ------------------------------------------------------------------------
    // Scalar combinators
    // ------------------------------------------------------------------------

    #[test]
    fn smooth_union_never_exceeds_union() {
        for p in sample_points(256, 4.0) {
            let (a, b) = (p.x, p.y);
            for k in [0.0, 0.01, 0.25, 1.0, 4.0] {
                assert!(smooth_min(a, b, k) <= op_union(a, b) + 1e-6);
            }
        }
    }

    #[test]
    fn smooth_union_with_zero_radius_is_union() {
        for p in sample_points(64, 2.0) {
            assert_relative_eq!(smooth_min(p.x, p.z, 0.0), p.x.min(p.z));
        }
    }

    #[test]
    fn smooth_union_far_apart_is_union() {
        assert_relative_eq!(smooth_min(0.1, 5.0, 0.5), 0.1);
    }

    #[test]
    fn smooth_union_equal_inputs_dip_by_quarter_k() {
        assert_relative_eq!(smooth_min(1.0, 1.0, 0.4), 0.9, epsilon = 1e-6);
    }

    #[test]
    fn smooth_intersect_never_below_intersection() {
        for p in sample_points(128, 2.0) {
            assert!(smooth_intersect(p.x, p.y, 0.3) >= op_intersect(p.x, p.y) - 1e-6);
        }
    }

    #[test]
    fn smooth_subtract_far_from_cutter_is_base() {
        // cutter far away (large positive), base surface untouched
        assert_relative_eq!(smooth_subtract(-0.5, 5.0, 0.2), -0.5);
    }

    #[test]
    fn smooth_max_matches_max_away_from_crease() {
        assert_relative_eq!(smooth_max(1.0, -2.0, 0.1), 1.0, epsilon = 1e-6);
        // inside both, the fillet bites into the corner
        assert!(smooth_max(-0.05, -0.05, 0.1) > -0.05);
    }

    #[test]
    fn exponential_smin_is_below_min() {
        let d = smooth_min_exp(0.3, 0.4, 8.0);
        assert!(d < 0.3);
        assert_relative_eq!(smooth_min_exp(0.3, 0.4, 0.0), 0.3);
        // huge k does not overflow
        assert!(smooth_min_exp(10.0, 20.0, 1e4).is_finite());
    }

    #[test]
    fn onion_makes_shell() {
        assert_relative_eq!(onion(0.0, 0.1), -0.1);
        assert_relative_eq!(onion(-1.0, 0.1), 0.9);
        assert_relative_eq!(onion(onion(0.3, 0.1), 0.05), 0.15);
    }

    #[test]
    fn mod2_folds_and_reports_cell() {
        let (p, cell) = mod2(Vec2::new(1.3, -0.2), Vec2::splat(1.0));
        assert_abs_diff_eq!(p.x, 0.3, epsilon = 1e-5);
        assert_abs_diff_eq!(p.y, -0.2, epsilon = 1e-5);
        assert_eq!(cell, Vec2::new(1.0, 0.0));

        let (p, cell) = mod2(Vec2::new(-0.7, 0.0), Vec2::splat(1.0));
        assert_abs_diff_eq!(p.x, 0.3, epsilon = 1e-5);
        assert_eq!(cell, Vec2::new(-1.0, 0.0));
    }

    // ------------------------------------------------------------------------
    // Boolean Operations
    // ------------------------------------------------------------------------

    #[test]
    fn union_takes_minimum_distance() {
        let u = Union::new(sphere(1.0), cube(2.0));
        assert_relative_eq!(u.distance(Vec3::ZERO), -1.0, epsilon = 1e-6);
    }

    #[test]
    fn union_inside_either_is_inside() {
        let a = sphere(0.5);
        let b = Translate::new(sphere(0.5), Vec3::new(2.0, 0.0, 0.0));
        let u = Union::new(a, b);

        assert!(u.distance(Vec3::ZERO) < 0.0);
        assert!(u.distance(Vec3::new(2.0, 0.0, 0.0)) < 0.0);
        assert!(u.distance(Vec3::new(1.0, 0.0, 0.0)) > 0.0);
    }

    #[test]
    fn subtract_hollows_out() {
        let s = Subtract::new(sphere(1.0), sphere(0.5));
        assert_relative_eq!(s.distance(Vec3::ZERO), 0.5);
        assert!(s.distance(Vec3::new(0.75, 0.0, 0.0)) < 0.0);
    }

    #[test]
    fn intersect_keeps_overlap() {
        let i = Intersect::new(sphere(1.0), Translate::new(sphere(1.0), Vec3::X));
        assert!(i.distance(Vec3::new(0.5, 0.0, 0.0)) < 0.0);
        assert!(i.distance(Vec3::new(-0.75, 0.0, 0.0)) > 0.0);
    }

    #[test]
    fn union_sample_keeps_material_of_closer_shape() {
        let u = Union::new(
            Material::new(sphere(0.5), 1.0),
            Material::new(Translate::new(sphere(0.5), Vec3::X * 2.0), 2.0),
        );
        assert_relative_eq!(u.sample(Vec3::new(-0.6, 0.0, 0.0)).material, 1.0);
        assert_relative_eq!(u.sample(Vec3::new(2.6, 0.0, 0.0)).material, 2.0);
    }

    // ------------------------------------------------------------------------
    // Modifiers
    // ------------------------------------------------------------------------

    #[test]
    fn onion_sphere_is_hollow() {
        let shell = Onion::new(sphere(1.0), 0.1);
        assert_relative_eq!(shell.distance(Vec3::ZERO), 0.9);
        assert_relative_eq!(shell.distance(Vec3::X), -0.1);
    }

    #[test]
    fn negate_flips_sign_and_keeps_material() {
        let n = Negate::new(Material::new(sphere(1.0), 3.0));
        let s = n.sample(Vec3::ZERO);
        assert_relative_eq!(s.distance, 1.0);
        assert_relative_eq!(s.material, 3.0);
    }

    // ------------------------------------------------------------------------
    // Repetition
    // ------------------------------------------------------------------------

    #[test]
    fn infinite_repetition_tiles() {
        let r = RepeatInfinite::new(sphere(0.25), Vec3::splat(1.0));
        assert_relative_eq!(r.distance(Vec3::ZERO), -0.25);
        assert_abs_diff_eq!(r.distance(Vec3::new(3.0, -2.0, 5.0)), -0.25, epsilon = 1e-5);
        assert_abs_diff_eq!(r.distance(Vec3::new(-4.5, 0.0, 0.0)), 0.25, epsilon = 1e-5);
    }

    #[test]
    fn limited_repetition_stops_at_count() {
        let r = RepeatLimited::new(sphere(0.25), Vec3::splat(1.0), UVec3::new(3, 1, 1));
        assert_abs_diff_eq!(r.distance(Vec3::new(2.0, 0.0, 0.0)), -0.25, epsilon = 1e-5);
        // no fourth copy at x = 3
        assert_abs_diff_eq!(r.distance(Vec3::new(3.0, 0.0, 0.0)), 0.75, epsilon = 1e-5);
        // nothing on the negative side
        assert_abs_diff_eq!(r.distance(Vec3::new(-1.0, 0.0, 0.0)), 0.75, epsilon = 1e-5);
    }

    #[test]
    fn polar_repetition_copies_around_y() {
        let petal = Translate::new(sphere(0.2), Vec3::new(1.0, 0.0, 0.0));
        let r = RepeatPolar::new(petal, 4);
        for angle in [0.0f32, 90.0, 180.0, 270.0] {
            let (s, c) = angle.to_radians().sin_cos();
            let p = Vec3::new(c, 0.0, s);
            assert_abs_diff_eq!(r.distance(p), -0.2, epsilon = 1e-4);
        }
        assert!(r.distance(Vec3::new(0.7071, 0.0, 0.7071)) > 0.0);
    }
}
