//! Signed Distance Functions (SDF) for 3D shape definition
//!
//! SDFs represent shapes as functions that return the distance from any
//! point in space to the nearest surface. Negative values are inside,
//! positive values are outside, and zero is exactly on the surface.
//!
//! Sphere tracing only needs the value to be a lower bound on the true
//! distance (Lipschitz constant <= 1). Every primitive here is exact or
//! bounded; the warps that bend space carry a correction factor so the
//! composed field keeps that property.
//!
//! ## Example
//!
//! ```rust
//! use marchlight_core::prelude::*;
//!
//! let snowman = sphere(1.0)
//!     .union(sphere(0.7).translate_y(1.5))
//!     .union(sphere(0.5).translate_y(2.5));
//!
//! assert!(snowman.distance(Vec3::new(0.0, 2.5, 0.0)) < 0.0);
//! ```

pub mod bezier;
pub mod clifford;
pub mod operations;
pub mod planar;
pub mod primitives;
pub mod scene;
pub mod shape;
pub mod transforms;

use glam::{Quat, UVec3, Vec3};
use std::sync::Arc;

pub use operations::*;
pub use primitives::*;
pub use scene::SceneBuilder;
pub use transforms::*;

/// A signed distance paired with a material tag.
///
/// The material is a plain float so scenes can select shading branches by id
/// or blend between ids in smooth unions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceSample {
    pub distance: f32,
    pub material: f32,
}

impl DistanceSample {
    /// A sample that never registers as a hit
    pub const MISS: Self = Self {
        distance: f32::MAX,
        material: -1.0,
    };

    pub fn new(distance: f32, material: f32) -> Self {
        Self { distance, material }
    }

    /// Keep whichever operand is closer, material included
    pub fn union(self, other: Self) -> Self {
        if other.distance < self.distance {
            other
        } else {
            self
        }
    }

    /// Polynomial smooth union; the material is blended with the same weight
    pub fn smooth_union(self, other: Self, k: f32) -> Self {
        if k <= 0.0 {
            return self.union(other);
        }
        let h = smooth_weight(self.distance, other.distance, k);
        Self {
            distance: crate::math::mix(other.distance, self.distance, h) - k * h * (1.0 - h),
            material: crate::math::mix(other.material, self.material, h),
        }
    }

    /// Cut `other` out of `self`, keeping the material of the surface that bounds the result
    pub fn subtract(self, other: Self) -> Self {
        if -other.distance > self.distance {
            Self::new(-other.distance, other.material)
        } else {
            self
        }
    }

    /// Keep the overlap, taking the material of the farther operand
    pub fn intersect(self, other: Self) -> Self {
        if other.distance > self.distance {
            other
        } else {
            self
        }
    }

    /// Flip inside and outside
    pub fn negate(self) -> Self {
        Self::new(-self.distance, self.material)
    }
}

impl Default for DistanceSample {
    fn default() -> Self {
        Self::MISS
    }
}

/// The core SDF trait - any type that can compute distance from a point
pub trait Sdf: Send + Sync {
    /// Calculate the signed distance from point `p` to the surface.
    ///
    /// - Returns negative values for points inside the shape
    /// - Returns positive values for points outside the shape
    /// - Returns zero for points exactly on the surface
    fn distance(&self, p: Vec3) -> f32;

    /// Distance plus material tag. Untagged shapes report material `0.0`.
    fn sample(&self, p: Vec3) -> DistanceSample {
        DistanceSample::new(self.distance(p), 0.0)
    }
}

impl<T: Sdf + ?Sized> Sdf for Box<T> {
    fn distance(&self, p: Vec3) -> f32 {
        (**self).distance(p)
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        (**self).sample(p)
    }
}

impl<T: Sdf + ?Sized> Sdf for Arc<T> {
    fn distance(&self, p: Vec3) -> f32 {
        (**self).distance(p)
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        (**self).sample(p)
    }
}

impl<T: Sdf + ?Sized> Sdf for &T {
    fn distance(&self, p: Vec3) -> f32 {
        (**self).distance(p)
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        (**self).sample(p)
    }
}

/// A boxed SDF for dynamic dispatch and composition
pub type BoxedSdf = Box<dyn Sdf>;

/// An SDF node that can be composed and transformed
#[derive(Clone)]
pub struct SdfNode {
    inner: Arc<dyn Sdf>,
}

impl SdfNode {
    /// Create a new SDF node from any type implementing Sdf
    pub fn new<S: Sdf + 'static>(sdf: S) -> Self {
        Self {
            inner: Arc::new(sdf),
        }
    }
}

impl std::fmt::Debug for SdfNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdfNode").finish_non_exhaustive()
    }
}

impl Sdf for SdfNode {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(p)
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        self.inner.sample(p)
    }
}

/// Scene function built from a closure returning a full [`DistanceSample`]
pub struct SdfFn<F> {
    f: F,
}

impl<F> Sdf for SdfFn<F>
where
    F: Fn(Vec3) -> DistanceSample + Send + Sync,
{
    fn distance(&self, p: Vec3) -> f32 {
        (self.f)(p).distance
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        (self.f)(p)
    }
}

/// Scene function built from a closure returning a bare distance
pub struct FieldFn<F> {
    f: F,
}

impl<F> Sdf for FieldFn<F>
where
    F: Fn(Vec3) -> f32 + Send + Sync,
{
    fn distance(&self, p: Vec3) -> f32 {
        (self.f)(p)
    }
}

/// Lift a `(point) -> (distance, material)` closure into an SDF
pub fn from_fn<F>(f: F) -> SdfFn<F>
where
    F: Fn(Vec3) -> DistanceSample + Send + Sync,
{
    SdfFn { f }
}

/// Lift a `(point) -> distance` closure into an SDF
pub fn field<F>(f: F) -> FieldFn<F>
where
    F: Fn(Vec3) -> f32 + Send + Sync,
{
    FieldFn { f }
}

/// Extension trait providing chainable operations on SDFs
pub trait SdfExt: Sdf + Sized + 'static {
    // === Boolean Operations ===

    /// Union: combine two shapes (OR)
    fn union<S: Sdf + 'static>(self, other: S) -> SdfNode {
        SdfNode::new(operations::Union::new(self, other))
    }

    /// Subtraction: cut shape `other` from `self`
    fn subtract<S: Sdf + 'static>(self, other: S) -> SdfNode {
        SdfNode::new(operations::Subtract::new(self, other))
    }

    /// Intersection: keep only where both shapes overlap (AND)
    fn intersect<S: Sdf + 'static>(self, other: S) -> SdfNode {
        SdfNode::new(operations::Intersect::new(self, other))
    }

    // === Smooth Boolean Operations ===

    /// Smooth union with blend radius `k`
    fn smooth_union<S: Sdf + 'static>(self, other: S, k: f32) -> SdfNode {
        SdfNode::new(operations::SmoothUnion::new(self, other, k))
    }

    /// Smooth subtraction with blend radius `k`
    fn smooth_subtract<S: Sdf + 'static>(self, other: S, k: f32) -> SdfNode {
        SdfNode::new(operations::SmoothSubtract::new(self, other, k))
    }

    /// Smooth intersection with blend radius `k`
    fn smooth_intersect<S: Sdf + 'static>(self, other: S, k: f32) -> SdfNode {
        SdfNode::new(operations::SmoothIntersect::new(self, other, k))
    }

    /// Rounded intersection (round max) with radius `r`
    fn round_intersect<S: Sdf + 'static>(self, other: S, r: f32) -> SdfNode {
        SdfNode::new(operations::RoundIntersect::new(self, other, r))
    }

    // === Transforms ===

    /// Translate (move) the shape
    fn translate(self, x: f32, y: f32, z: f32) -> SdfNode {
        SdfNode::new(transforms::Translate::new(self, Vec3::new(x, y, z)))
    }

    /// Translate along X axis
    fn translate_x(self, x: f32) -> SdfNode {
        self.translate(x, 0.0, 0.0)
    }

    /// Translate along Y axis
    fn translate_y(self, y: f32) -> SdfNode {
        self.translate(0.0, y, 0.0)
    }

    /// Translate along Z axis
    fn translate_z(self, z: f32) -> SdfNode {
        self.translate(0.0, 0.0, z)
    }

    /// Rotate around X axis (angle in radians)
    fn rotate_x(self, angle: f32) -> SdfNode {
        SdfNode::new(transforms::Rotate::new(self, Quat::from_rotation_x(angle)))
    }

    /// Rotate around Y axis (angle in radians)
    fn rotate_y(self, angle: f32) -> SdfNode {
        SdfNode::new(transforms::Rotate::new(self, Quat::from_rotation_y(angle)))
    }

    /// Rotate around Z axis (angle in radians)
    fn rotate_z(self, angle: f32) -> SdfNode {
        SdfNode::new(transforms::Rotate::new(self, Quat::from_rotation_z(angle)))
    }

    /// Rotate around arbitrary axis (angle in radians)
    fn rotate(self, axis: Vec3, angle: f32) -> SdfNode {
        SdfNode::new(transforms::Rotate::axis_angle(self, axis, angle))
    }

    /// Uniform scale
    fn scale(self, factor: f32) -> SdfNode {
        SdfNode::new(transforms::Scale::new(self, factor))
    }

    /// Mirror across a plane defined by its normal
    fn mirror(self, axis: Vec3) -> SdfNode {
        SdfNode::new(transforms::Mirror::new(self, axis))
    }

    /// Fold every selected axis onto its positive half
    fn symmetry(self, x: bool, y: bool, z: bool) -> SdfNode {
        SdfNode::new(transforms::Symmetry::new(self, x, y, z))
    }

    // === Modifiers ===

    /// Turn the solid into a shell of thickness `2 * thickness`
    fn onion(self, thickness: f32) -> SdfNode {
        SdfNode::new(operations::Onion::new(self, thickness))
    }

    /// Shorthand for onion
    fn shell(self, thickness: f32) -> SdfNode {
        self.onion(thickness)
    }

    /// Inflate the surface by `radius`, rounding edges
    fn round(self, radius: f32) -> SdfNode {
        SdfNode::new(operations::Round::new(self, radius))
    }

    /// Flip inside and outside, used to march from within a solid
    fn negate(self) -> SdfNode {
        SdfNode::new(operations::Negate::new(self))
    }

    /// Tag every sample with a material id
    fn material(self, id: f32) -> SdfNode {
        SdfNode::new(operations::Material::new(self, id))
    }

    // === Repetition ===

    /// Infinite repetition with given cell size
    fn repeat(self, spacing: Vec3) -> SdfNode {
        SdfNode::new(operations::RepeatInfinite::new(self, spacing))
    }

    /// Limited repetition with given spacing and count
    fn repeat_limited(self, spacing: Vec3, count: UVec3) -> SdfNode {
        SdfNode::new(operations::RepeatLimited::new(self, spacing, count))
    }

    /// Polar (radial) repetition around Y axis
    fn repeat_polar(self, count: u32) -> SdfNode {
        SdfNode::new(operations::RepeatPolar::new(self, count))
    }

    // === Deformations ===

    /// Twist around Y axis
    fn twist(self, amount: f32) -> SdfNode {
        SdfNode::new(transforms::Twist::new(self, amount))
    }

    /// Bend the XY plane as a function of X
    fn bend(self, amount: f32) -> SdfNode {
        SdfNode::new(transforms::Bend::new(self, amount))
    }
}

// Implement SdfExt for all types that implement Sdf
impl<T: Sdf + 'static> SdfExt for T {}

/// Weight used by the polynomial smooth-min family
#[inline]
pub(crate) fn smooth_weight(a: f32, b: f32, k: f32) -> f32 {
    (0.5 + 0.5 * (b - a) / k).clamp(0.0, 1.0)
}
