//! Quadratic Bézier curves
//!
//! The closest point on a quadratic Bézier is a root of a cubic. Both
//! variants reduce it to a depressed cubic and split on its discriminant:
//! one real root is found with the hyperbolic (or Cardano) form, three real
//! roots with the trigonometric form. Picking the wrong branch makes the
//! distance jump, so the branch test is kept exactly as derived.

use super::planar::sign;
use super::Sdf;
use glam::{Vec2, Vec3};

/// Degenerate-curve threshold on `|A - 2B + C|^2`
const STRAIGHT_EPSILON: f32 = 1e-10;

/// Signed distance to a 2D quadratic Bézier `A, B, C`.
///
/// The sign tells which side of the curve `pos` lies on (left of the
/// direction of travel is negative).
pub fn bezier_2d(pos: Vec2, a_pt: Vec2, b_pt: Vec2, c_pt: Vec2) -> f32 {
    let a = b_pt - a_pt;
    let b = a_pt - 2.0 * b_pt + c_pt;
    let c = a * 2.0;
    let d = a_pt - pos;

    let bb = b.dot(b);
    if bb < STRAIGHT_EPSILON {
        return segment_2d(pos, a_pt, c_pt);
    }

    let kk = 1.0 / bb;
    let kx = kk * a.dot(b);
    let ky = kk * (2.0 * a.dot(a) + d.dot(b)) / 3.0;
    let kz = kk * d.dot(a);

    let p = ky - kx * kx;
    let q = kx * (2.0 * kx * kx - 3.0 * ky) + kz;
    let p3 = p * p * p;
    let h = q * q + 4.0 * p3;

    let (res, sgn) = if h >= 0.0 {
        // one real root
        let h = h.sqrt();
        let x = (Vec2::new(h, -h) - Vec2::splat(q)) / 2.0;
        let uv = Vec2::new(x.x.cbrt(), x.y.cbrt());
        let t = (uv.x + uv.y - kx).clamp(0.0, 1.0);
        let qp = d + (c + b * t) * t;
        (qp.dot(qp), cross_2d(c + 2.0 * b * t, qp))
    } else {
        // three real roots; the middle one is never the closest
        let z = (-p).sqrt();
        let v = (q / (p * z * 2.0)).clamp(-1.0, 1.0).acos() / 3.0;
        let m = v.cos();
        let n = v.sin() * 1.732_050_8;
        let tx = ((m + m) * z - kx).clamp(0.0, 1.0);
        let ty = ((-n - m) * z - kx).clamp(0.0, 1.0);
        let qx = d + (c + b * tx) * tx;
        let qy = d + (c + b * ty) * ty;
        let (dx, dy) = (qx.dot(qx), qy.dot(qy));
        if dx < dy {
            (dx, cross_2d(c + 2.0 * b * tx, qx))
        } else {
            (dy, cross_2d(c + 2.0 * b * ty, qy))
        }
    };

    res.sqrt() * sign(sgn)
}

/// Unsigned distance to a 3D quadratic Bézier `v1, v2, v3`
pub fn bezier_3d(p: Vec3, v1: Vec3, v2: Vec3, v3: Vec3) -> f32 {
    let c1 = p - v1;
    let c2 = 2.0 * v2 - v3 - v1;
    let c3 = v1 - v2;

    let t3 = c2.dot(c2);
    if t3 < STRAIGHT_EPSILON {
        return segment_3d(p, v1, v3);
    }
    let t2 = c3.dot(c2) * 3.0 / t3;
    let t1 = (c1.dot(c2) + 2.0 * c3.dot(c3)) / t3;
    let t0 = c1.dot(c3) / t3;

    let t22 = t2 * t2;
    let pq = Vec2::new(t1 - t22 / 3.0, t22 * t2 / 13.5 - t2 * t1 / 3.0 + t0);
    let ppp = pq.x * pq.x * pq.x;
    let qq = pq.y * pq.y;
    let p2 = pq.x.abs();

    let curve = |t: f32| v1.lerp(v2, t).lerp(v2.lerp(v3, t), t);

    if qq * 0.25 + ppp / 27.0 > 0.0 {
        // one real root
        let root = if p2 < STRAIGHT_EPSILON {
            (-pq.y).cbrt()
        } else {
            let r2 = 1.5 / pq.x * pq.y * (3.0 / p2).sqrt();
            let shape = if pq.x < 0.0 {
                sign(pq.y) * ((r2 * -sign(pq.y)).max(1.0).acosh() / 3.0).cosh()
            } else {
                (r2.asinh() / 3.0).sinh()
            };
            -2.0 * (p2 / 3.0).sqrt() * shape
        };
        let t = (root - t2 / 3.0).clamp(0.0, 1.0);
        (p - curve(t)).length()
    } else {
        // three real roots
        let r1 = 1.5 / pq.x * pq.y;
        let ac = (r1 * (-3.0 / pq.x).sqrt()).clamp(-1.0, 1.0).acos() / 3.0;
        let scale = 2.0 * (-pq.x / 3.0).sqrt();
        let ta = (scale * ac.cos() - t2 / 3.0).clamp(0.0, 1.0);
        let tb = (scale * (ac - 4.188_790_2).cos() - t2 / 3.0).clamp(0.0, 1.0);
        let da = p - curve(ta);
        let db = p - curve(tb);
        da.dot(da).min(db.dot(db)).sqrt()
    }
}

/// Tube of radius `radius` swept along a 3D quadratic Bézier
#[derive(Debug, Clone, Copy)]
pub struct Bezier {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    pub radius: f32,
}

impl Bezier {
    pub fn new(a: Vec3, b: Vec3, c: Vec3, radius: f32) -> Self {
        Self { a, b, c, radius }
    }

    /// Point on the curve at parameter `t` in `0..=1`
    pub fn point(&self, t: f32) -> Vec3 {
        self.a.lerp(self.b, t).lerp(self.b.lerp(self.c, t), t)
    }
}

impl Sdf for Bezier {
    fn distance(&self, p: Vec3) -> f32 {
        bezier_3d(p, self.a, self.b, self.c) - self.radius
    }
}

/// Create a tube swept along a quadratic Bézier
pub fn bezier(a: Vec3, b: Vec3, c: Vec3, radius: f32) -> Bezier {
    Bezier::new(a, b, c, radius)
}

fn cross_2d(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

fn segment_2d(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let pa = p - a;
    let ba = b - a;
    let baba = ba.dot(ba);
    let h = if baba > 0.0 {
        (pa.dot(ba) / baba).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let q = a + ba * h - p;
    let s = cross_2d(ba, q);
    q.length() * if s < 0.0 { -1.0 } else { 1.0 }
}

fn segment_3d(p: Vec3, a: Vec3, b: Vec3) -> f32 {
    let pa = p - a;
    let ba = b - a;
    let baba = ba.dot(ba);
    let h = if baba > 0.0 {
        (pa.dot(ba) / baba).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (pa - ba * h).length()
}
