//! 2D distance functions
//!
//! Used for patterns drawn on a surface after the surface has been unrolled
//! into a local `(u, v, depth)` frame, e.g. tiles on the Clifford torus.

use glam::{Vec2, Vec3, Vec3Swizzles};

/// Regular hexagon with inner radius `r`, flat sides facing +-Y
pub fn hexagon_2d(p: Vec2, r: f32) -> f32 {
    const K: Vec3 = Vec3::new(-0.866_025_4, 0.5, 0.577_350_27);
    let kxy = K.xy();
    let mut p = p.abs();
    p -= 2.0 * kxy.dot(p).min(0.0) * kxy;
    p -= Vec2::new(p.x.clamp(-K.z * r, K.z * r), r);
    p.length() * sign(p.y)
}

/// Equilateral triangle pointing up with side length `2r`, centred on its incentre
pub fn equilateral_triangle_2d(p: Vec2, r: f32) -> f32 {
    let k = 3.0f32.sqrt();
    let mut p = Vec2::new(p.x.abs() - r, p.y + r / k);
    if p.x + k * p.y > 0.0 {
        p = Vec2::new(p.x - k * p.y, -k * p.x - p.y) / 2.0;
    }
    p.x -= p.x.clamp(-2.0 * r, 0.0);
    -p.length() * sign(p.y)
}

/// Axis-aligned rectangle with half extents `b`
pub fn box_2d(p: Vec2, b: Vec2) -> f32 {
    let d = p.abs() - b;
    d.max(Vec2::ZERO).length() + d.max_element().min(0.0)
}

/// Shading-language `sign`: zero maps to zero
#[inline]
pub(crate) fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
