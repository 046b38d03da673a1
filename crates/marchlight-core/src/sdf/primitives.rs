//! SDF Primitive shapes
//!
//! All primitives are centered at the origin unless they take explicit end
//! points. Use transforms to position them.

use super::Sdf;
use crate::math::dot2;
use glam::{Vec2, Vec3, Vec3Swizzles};

// ============================================================================
// Constructor functions (ergonomic API)
// ============================================================================

/// Create a sphere with given radius
pub fn sphere(radius: f32) -> Sphere {
    Sphere::new(radius)
}

/// Create a box with given half-extents (size/2 in each direction)
pub fn box3(half_extents: Vec3) -> Box3 {
    Box3::new(half_extents)
}

/// Create a cube with given size
pub fn cube(size: f32) -> Box3 {
    Box3::new(Vec3::splat(size * 0.5))
}

/// Create a box whose surface is pushed out by `radius`
pub fn rounded_box(half_extents: Vec3, radius: f32) -> RoundBox {
    RoundBox::new(half_extents, radius)
}

/// Create a capsule around the segment `a`..`b`
pub fn capsule(a: Vec3, b: Vec3, radius: f32) -> Capsule {
    Capsule::new(a, b, radius)
}

/// Create a capsule standing on the origin, `height` tall along +Y
pub fn vertical_capsule(height: f32, radius: f32) -> VerticalCapsule {
    VerticalCapsule::new(height, radius)
}

/// Create a torus (donut) lying in the XZ plane
pub fn torus(major_radius: f32, minor_radius: f32) -> Torus {
    Torus::new(major_radius, minor_radius)
}

/// Create a cylinder with flat caps between two end points
pub fn capped_cylinder(a: Vec3, b: Vec3, radius: f32) -> CappedCylinder {
    CappedCylinder::new(a, b, radius)
}

/// Create a Y-aligned cone frustum with half height `height`
pub fn capped_cone(height: f32, bottom_radius: f32, top_radius: f32) -> CappedCone {
    CappedCone::new(height, bottom_radius, top_radius)
}

/// Create a hexagonal prism extruded along Z
pub fn hex_prism(radius: f32, half_length: f32) -> HexPrism {
    HexPrism::new(radius, half_length)
}

/// Create a triangular prism extruded along Z
pub fn tri_prism(size: Vec2) -> TriPrism {
    TriPrism::new(size)
}

/// Create a plane with given normal and offset from origin
pub fn plane(normal: Vec3, offset: f32) -> Plane {
    Plane::new(normal, offset)
}

/// Create an infinite ground plane (Y = 0)
pub fn ground_plane() -> Plane {
    Plane::new(Vec3::Y, 0.0)
}

/// Create a hollow sphere cut open by the plane `y = cut`
pub fn cut_hollow_sphere(radius: f32, cut: f32, thickness: f32) -> CutHollowSphere {
    CutHollowSphere::new(radius, cut, thickness)
}

/// Create a faceted crystal built by reflection folding
pub fn crystal(size: f32) -> Crystal {
    Crystal::new(size)
}

// ============================================================================
// Primitive Structs
// ============================================================================

/// Sphere centered at origin
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub radius: f32,
}

impl Sphere {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl Sdf for Sphere {
    fn distance(&self, p: Vec3) -> f32 {
        p.length() - self.radius
    }
}

/// Axis-aligned box (rectangular prism)
#[derive(Debug, Clone, Copy)]
pub struct Box3 {
    pub half_extents: Vec3,
}

impl Box3 {
    pub fn new(half_extents: Vec3) -> Self {
        Self { half_extents }
    }
}

impl Sdf for Box3 {
    fn distance(&self, p: Vec3) -> f32 {
        let q = p.abs() - self.half_extents;
        q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
    }
}

/// Box inflated by a rounding radius; the half-extents describe the inner box
#[derive(Debug, Clone, Copy)]
pub struct RoundBox {
    pub half_extents: Vec3,
    pub radius: f32,
}

impl RoundBox {
    pub fn new(half_extents: Vec3, radius: f32) -> Self {
        Self {
            half_extents,
            radius,
        }
    }
}

impl Sdf for RoundBox {
    fn distance(&self, p: Vec3) -> f32 {
        Box3::new(self.half_extents).distance(p) - self.radius
    }
}

/// Capsule: every point within `radius` of the segment `a`..`b`
#[derive(Debug, Clone, Copy)]
pub struct Capsule {
    pub a: Vec3,
    pub b: Vec3,
    pub radius: f32,
}

impl Capsule {
    pub fn new(a: Vec3, b: Vec3, radius: f32) -> Self {
        Self { a, b, radius }
    }
}

impl Sdf for Capsule {
    fn distance(&self, p: Vec3) -> f32 {
        let pa = p - self.a;
        let ba = self.b - self.a;
        let baba = ba.dot(ba);
        // a degenerate segment is a sphere around `a`
        let h = if baba > f32::EPSILON {
            (pa.dot(ba) / baba).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (pa - ba * h).length() - self.radius
    }
}

/// Capsule from `y = 0` to `y = height`
#[derive(Debug, Clone, Copy)]
pub struct VerticalCapsule {
    pub height: f32,
    pub radius: f32,
}

impl VerticalCapsule {
    pub fn new(height: f32, radius: f32) -> Self {
        Self { height, radius }
    }
}

impl Sdf for VerticalCapsule {
    fn distance(&self, p: Vec3) -> f32 {
        let q = Vec3::new(p.x, p.y - p.y.clamp(0.0, self.height), p.z);
        q.length() - self.radius
    }
}

/// Torus (donut) lying in the XZ plane
#[derive(Debug, Clone, Copy)]
pub struct Torus {
    pub major_radius: f32,
    pub minor_radius: f32,
}

impl Torus {
    pub fn new(major_radius: f32, minor_radius: f32) -> Self {
        Self {
            major_radius,
            minor_radius,
        }
    }
}

impl Sdf for Torus {
    fn distance(&self, p: Vec3) -> f32 {
        let q = Vec2::new(p.xz().length() - self.major_radius, p.y);
        q.length() - self.minor_radius
    }
}

/// Cylinder with flat caps between two arbitrary end points
#[derive(Debug, Clone, Copy)]
pub struct CappedCylinder {
    pub a: Vec3,
    pub b: Vec3,
    pub radius: f32,
}

impl CappedCylinder {
    pub fn new(a: Vec3, b: Vec3, radius: f32) -> Self {
        Self { a, b, radius }
    }
}

impl Sdf for CappedCylinder {
    fn distance(&self, p: Vec3) -> f32 {
        let ba = self.b - self.a;
        let pa = p - self.a;
        let baba = ba.dot(ba);
        if baba <= f32::EPSILON {
            return pa.length() - self.radius;
        }
        let paba = pa.dot(ba);
        let x = (pa * baba - ba * paba).length() - self.radius * baba;
        let y = (paba - baba * 0.5).abs() - baba * 0.5;
        let x2 = x * x;
        let y2 = y * y * baba;
        let d = if x.max(y) < 0.0 {
            -x2.min(y2)
        } else {
            (if x > 0.0 { x2 } else { 0.0 }) + (if y > 0.0 { y2 } else { 0.0 })
        };
        d.signum() * d.abs().sqrt() / baba
    }
}

/// Cone frustum aligned with Y, spanning `-height..height`
#[derive(Debug, Clone, Copy)]
pub struct CappedCone {
    pub height: f32,
    pub bottom_radius: f32,
    pub top_radius: f32,
}

impl CappedCone {
    pub fn new(height: f32, bottom_radius: f32, top_radius: f32) -> Self {
        Self {
            height,
            bottom_radius,
            top_radius,
        }
    }
}

impl Sdf for CappedCone {
    fn distance(&self, p: Vec3) -> f32 {
        let h = self.height;
        let (r1, r2) = (self.bottom_radius, self.top_radius);
        let q = Vec2::new(p.xz().length(), p.y);
        let k1 = Vec2::new(r2, h);
        let k2 = Vec2::new(r2 - r1, 2.0 * h);
        let cap_radius = if q.y < 0.0 { r1 } else { r2 };
        let ca = Vec2::new(q.x - q.x.min(cap_radius), q.y.abs() - h);
        let cb = q - k1 + k2 * ((k1 - q).dot(k2) / dot2(k2)).clamp(0.0, 1.0);
        let s = if cb.x < 0.0 && ca.y < 0.0 { -1.0 } else { 1.0 };
        s * dot2(ca).min(dot2(cb)).sqrt()
    }
}

/// Hexagonal prism: hexagon of inner radius `radius` in XY, extruded along Z
#[derive(Debug, Clone, Copy)]
pub struct HexPrism {
    pub radius: f32,
    pub half_length: f32,
}

impl HexPrism {
    pub fn new(radius: f32, half_length: f32) -> Self {
        Self {
            radius,
            half_length,
        }
    }
}

impl Sdf for HexPrism {
    fn distance(&self, p: Vec3) -> f32 {
        const K: Vec3 = Vec3::new(-0.866_025_4, 0.5, 0.577_35);
        let p = p.abs();
        let kxy = K.xy();
        let xy = p.xy() - 2.0 * kxy.dot(p.xy()).min(0.0) * kxy;
        let edge = Vec2::new(xy.x.clamp(-K.z * self.radius, K.z * self.radius), self.radius);
        let d = Vec2::new(
            (xy - edge).length() * (xy.y - self.radius).signum(),
            p.z - self.half_length,
        );
        d.max_element().min(0.0) + d.max(Vec2::ZERO).length()
    }
}

/// Triangular prism extruded along Z; `size.x` is the triangle size, `size.y` the half length
#[derive(Debug, Clone, Copy)]
pub struct TriPrism {
    pub size: Vec2,
}

impl TriPrism {
    pub fn new(size: Vec2) -> Self {
        Self { size }
    }
}

impl Sdf for TriPrism {
    fn distance(&self, p: Vec3) -> f32 {
        let q = p.abs();
        (q.z - self.size.y).max((q.x * 0.866_025 + p.y * 0.5).max(-p.y) - self.size.x * 0.5)
    }
}

/// Infinite plane `dot(p, normal) = offset`
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub normal: Vec3,
    pub offset: f32,
}

impl Plane {
    /// A zero normal falls back to +Y
    pub fn new(normal: Vec3, offset: f32) -> Self {
        Self {
            normal: normal.try_normalize().unwrap_or(Vec3::Y),
            offset,
        }
    }
}

impl Sdf for Plane {
    fn distance(&self, p: Vec3) -> f32 {
        p.dot(self.normal) - self.offset
    }
}

/// Spherical shell of radius `radius` and half thickness `thickness`,
/// opened by the plane `y = cut`
#[derive(Debug, Clone, Copy)]
pub struct CutHollowSphere {
    pub radius: f32,
    pub cut: f32,
    pub thickness: f32,
}

impl CutHollowSphere {
    pub fn new(radius: f32, cut: f32, thickness: f32) -> Self {
        Self {
            radius,
            cut,
            thickness,
        }
    }
}

impl Sdf for CutHollowSphere {
    fn distance(&self, p: Vec3) -> f32 {
        let (r, h) = (self.radius, self.cut);
        let q = Vec2::new(p.xz().length(), p.y);
        let w = (r * r - h * h).max(0.0).sqrt();
        let d = if h * q.x < w * q.y {
            (q - Vec2::new(w, h)).length()
        } else {
            (q.length() - r).abs()
        };
        d - self.thickness
    }
}

/// Crystal made by folding space through three mirror planes
///
/// The fold normal comes from the pentagonal dihedral angle, so the faces
/// tile like an icosahedron's.
#[derive(Debug, Clone, Copy)]
pub struct Crystal {
    pub size: f32,
}

impl Crystal {
    pub fn new(size: f32) -> Self {
        Self { size }
    }

    fn fold_normal() -> Vec3 {
        let c = (std::f32::consts::PI / 5.0).cos();
        let s = (0.75 - c * c).sqrt();
        Vec3::new(-0.5, -c, s)
    }
}

impl Sdf for Crystal {
    fn distance(&self, p: Vec3) -> f32 {
        let n = Self::fold_normal();
        let mut p = p.abs();
        p -= 2.0 * p.dot(n).min(0.0) * n;
        for _ in 0..2 {
            p = Vec3::new(p.x.abs(), p.y.abs(), p.z);
            p -= 2.0 * p.dot(n).min(0.0) * n;
        }
        p.z - self.size
    }
}

// ============================================================================
// Tests
// ============================================================================
