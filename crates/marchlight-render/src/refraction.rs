//! Glass: refraction through a solid with chromatic aberration
//!
//! The entry ray bends into the solid, marches the negated field to find the
//! far wall, and bends out again once per color channel with a slightly
//! different index. Light lost inside follows Beer-Lambert; the outside
//! reflection is mixed in with a Schlick-style Fresnel weight.

use crate::differential::normal;
use crate::march::march;
use crate::ray::Ray;
use crate::shading::{ShadeContext, SurfaceHit, reflect};
use glam::Vec3;
use marchlight_core::Sdf;
use marchlight_core::sdf::Negate;
use serde::{Deserialize, Serialize};

/// Optical properties of a glass material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassParams {
    /// Index of refraction
    pub ior: f32,
    /// Index spread between red and blue on exit
    pub aberration: f32,
    /// Absorption per unit length inside the solid
    pub density: f32,
    /// Entry point sits this many hit epsilons below the surface
    pub entry_depth: f32,
}

impl Default for GlassParams {
    fn default() -> Self {
        Self {
            ior: 1.45,
            aberration: 0.01,
            density: 0.1,
            entry_depth: 3.0,
        }
    }
}

/// Refract `incident` through `normal` with index ratio `eta`.
///
/// Returns `None` on total internal reflection.
pub fn refract(incident: Vec3, normal: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = normal.dot(incident);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }
    Some(eta * incident - (eta * cos_i + k.sqrt()) * normal)
}

/// Schlick-style weight of the outside reflection
pub fn fresnel(direction: Vec3, normal: Vec3) -> f32 {
    (1.0 + direction.dot(normal)).clamp(0.0, 1.0).powi(5)
}

/// Shade a hit on a glass surface; linear output
pub fn shade_glass<S: Sdf + ?Sized>(
    hit: &SurfaceHit,
    ctx: &ShadeContext<'_, S>,
    glass: &GlassParams,
) -> Vec3 {
    let rd = hit.ray.direction;
    let n = hit.normal;
    let reflection = ctx.backdrop(reflect(rd, n));

    let Some(inward) = refract(rd, n, 1.0 / glass.ior) else {
        return reflection;
    };

    let enter = hit.point - n * ctx.march.hit_epsilon * glass.entry_depth;
    let inside = march(&Ray::new(enter, inward), &Negate::new(ctx.scene), ctx.march);
    let exit = enter + inward * inside.t;
    let exit_normal = -normal(exit, ctx.scene, ctx.normals);

    // red bends least, blue most
    let channel = |ior: f32| {
        let out = refract(inward, exit_normal, ior)
            .filter(|d| d.length_squared() > 0.0)
            .unwrap_or_else(|| reflect(inward, exit_normal));
        ctx.backdrop(out)
    };
    let refracted = Vec3::new(
        channel(glass.ior - glass.aberration).x,
        channel(glass.ior).y,
        channel(glass.ior + glass.aberration).z,
    ) * (-inside.t * glass.density).exp();

    refracted.lerp(reflection, fresnel(rd, n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::differential::NormalMethod;
    use crate::environment::Background;
    use crate::march::MarchSettings;
    use crate::shading::ShadingParams;
    use approx::assert_relative_eq;
    use marchlight_core::prelude::*;

    #[test]
    fn straight_through_keeps_direction() {
        let d = refract(Vec3::NEG_Z, Vec3::Z, 1.0 / 1.45).unwrap();
        assert_relative_eq!(d.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn snell_law_holds() {
        let incident = Vec3::new(0.5, 0.0, -(0.75f32).sqrt());
        let eta = 1.0 / 1.5;
        let out = refract(incident, Vec3::Z, eta).unwrap();
        assert_relative_eq!(out.length(), 1.0, epsilon = 1e-6);
        // sin(out) = eta * sin(in)
        assert_relative_eq!(out.x, eta * 0.5, epsilon = 1e-6);
    }

    #[test]
    fn grazing_exit_is_total_internal_reflection() {
        let incident = Vec3::new(0.9, 0.0, -(0.19f32).sqrt());
        assert!(refract(incident, Vec3::Z, 1.45).is_none());
    }

    #[test]
    fn fresnel_grows_toward_grazing() {
        assert_relative_eq!(fresnel(Vec3::NEG_Z, Vec3::Z), 0.0);
        let grazing = Vec3::new(1.0, 0.0, -0.05).normalize();
        assert!(fresnel(grazing, Vec3::Z) > 0.7);
    }

    #[test]
    fn head_on_glass_ball_shows_attenuated_background() {
        let scene = sphere(1.0);
        let params = ShadingParams::default();
        let march = MarchSettings::default();
        let background = Background::Solid(Vec3::ONE);
        let ctx = ShadeContext {
            scene: &scene,
            params: &params,
            march: &march,
            normals: NormalMethod::default(),
            background: &background,
            environment: None,
        };
        let hit = SurfaceHit {
            ray: Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z),
            t: 2.0,
            point: Vec3::Z,
            normal: Vec3::Z,
            material: 0.0,
        };
        let c = shade_glass(&hit, &ctx, &GlassParams::default());
        // two units of glass at density 0.1
        assert_relative_eq!(c.x, (-0.2f32).exp(), epsilon = 0.01);
    }
}
