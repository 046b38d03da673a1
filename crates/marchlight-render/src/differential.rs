//! Normals and soft shadows from extra field samples

use glam::Vec3;
use marchlight_core::Sdf;
use serde::{Deserialize, Serialize};

/// How to estimate the gradient at a surface point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NormalMethod {
    /// Four samples at the corners of a tetrahedron, offset by the given epsilon
    Tetrahedron(f32),
    /// Six samples, a central difference per axis
    Central(f32),
}

impl Default for NormalMethod {
    fn default() -> Self {
        Self::Tetrahedron(0.002)
    }
}

impl NormalMethod {
    /// The `(1, -1) * 0.5773` tetrahedron with epsilon `0.0005` used by the studio scenes
    pub const FINE: Self = Self::Tetrahedron(0.0005 * 0.5773);
}

/// Unit surface normal at `p`. A flat gradient yields +Y instead of NaN.
pub fn normal<S: Sdf + ?Sized>(p: Vec3, scene: &S, method: NormalMethod) -> Vec3 {
    let gradient = match method {
        NormalMethod::Tetrahedron(eps) => {
            const V1: Vec3 = Vec3::new(1.0, -1.0, -1.0);
            const V2: Vec3 = Vec3::new(-1.0, -1.0, 1.0);
            const V3: Vec3 = Vec3::new(-1.0, 1.0, -1.0);
            const V4: Vec3 = Vec3::new(1.0, 1.0, 1.0);
            V1 * scene.distance(p + V1 * eps)
                + V2 * scene.distance(p + V2 * eps)
                + V3 * scene.distance(p + V3 * eps)
                + V4 * scene.distance(p + V4 * eps)
        }
        NormalMethod::Central(eps) => {
            let dx = Vec3::X * eps;
            let dy = Vec3::Y * eps;
            let dz = Vec3::Z * eps;
            Vec3::new(
                scene.distance(p + dx) - scene.distance(p - dx),
                scene.distance(p + dy) - scene.distance(p - dy),
                scene.distance(p + dz) - scene.distance(p - dz),
            )
        }
    };
    gradient.try_normalize().unwrap_or(Vec3::Y)
}

/// Penumbra march toward a light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSettings {
    pub tmin: f32,
    pub tmax: f32,
    /// Penumbra sharpness; higher is harder
    pub k: f32,
    pub max_steps: u32,
    pub min_step: f32,
    pub max_step: f32,
    /// Offset along the normal before marching, to leave the surface
    pub bias: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            tmin: 0.001,
            tmax: 1.0,
            k: 32.0,
            max_steps: 64,
            min_step: 0.01,
            max_step: 0.10,
            bias: 0.001,
        }
    }
}

impl ShadowSettings {
    /// Stop the march at `distance`, where the light sits
    pub fn reaching(mut self, distance: f32) -> Self {
        self.tmax = self.tmax.min(distance);
        self
    }
}

/// Attenuation in `0..=1` for light arriving along `direction` at `origin`.
///
/// Tracks `min(k * d / t)` along the way; stops once the value is negligible
/// or `tmax` is passed.
pub fn soft_shadow<S: Sdf + ?Sized>(
    origin: Vec3,
    direction: Vec3,
    scene: &S,
    settings: &ShadowSettings,
) -> f32 {
    let mut res: f32 = 1.0;
    let mut t = settings.tmin.max(f32::EPSILON);
    for _ in 0..settings.max_steps {
        let h = scene.distance(origin + direction * t);
        res = res.min(settings.k * h / t);
        t += h.clamp(settings.min_step, settings.max_step);
        if res < 0.002 || t > settings.tmax {
            break;
        }
    }
    if res.is_nan() { 0.0 } else { res.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use marchlight_core::math::sample_points;
    use marchlight_core::prelude::*;

    #[test]
    fn sphere_normals_match_analytic() {
        let s = sphere(1.0);
        for method in [NormalMethod::default(), NormalMethod::Central(0.001), NormalMethod::FINE] {
            for dir in sample_points(64, 1.0).filter_map(|p| p.try_normalize()) {
                let n = normal(dir, &s, method);
                assert!(n.dot(dir) > 0.9999, "{method:?} at {dir:?}: {n:?}");
            }
        }
    }

    #[test]
    fn flat_field_falls_back_to_up() {
        let flat = field(|_| 1.0);
        assert_eq!(normal(Vec3::ZERO, &flat, NormalMethod::default()), Vec3::Y);
    }

    #[test]
    fn open_sky_is_unshadowed() {
        let floor = ground_plane();
        let p = Vec3::new(0.0, 0.001, 0.0);
        assert_relative_eq!(soft_shadow(p, Vec3::Y, &floor, &ShadowSettings::default()), 1.0);
    }

    #[test]
    fn blocker_casts_shadow() {
        let scene = ground_plane().union(sphere(0.2).translate_y(0.5));
        let p = Vec3::new(0.0, 0.001, 0.0);
        let shadow = soft_shadow(p, Vec3::Y, &scene, &ShadowSettings::default());
        assert!(shadow < 0.01);

        // off to the side the penumbra is partial or absent
        let side = soft_shadow(Vec3::new(0.6, 0.001, 0.0), Vec3::Y, &scene, &ShadowSettings::default());
        assert!(side > shadow);
    }

    #[test]
    fn blocker_past_the_light_casts_no_shadow() {
        let scene = ground_plane().union(sphere(0.2).translate_y(0.5));
        let p = Vec3::new(0.0, 0.001, 0.0);
        let settings = ShadowSettings::default().reaching(0.2);
        assert_relative_eq!(settings.tmax, 0.2);
        assert_relative_eq!(soft_shadow(p, Vec3::Y, &scene, &settings), 1.0);
        // a far light never extends the march
        assert_relative_eq!(ShadowSettings::default().reaching(50.0).tmax, 1.0);
    }
}
