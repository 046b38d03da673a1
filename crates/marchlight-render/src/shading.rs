//! Shading models
//!
//! Every model takes the same [`SurfaceHit`] and returns a linear color.
//! Fog and gamma are applied afterwards by [`ShadingParams::finish`].

use crate::differential::{NormalMethod, ShadowSettings, soft_shadow};
use crate::environment::{Background, CubeMap};
use crate::march::MarchSettings;
use crate::ray::Ray;
use crate::refraction::{GlassParams, shade_glass};
use glam::Vec3;
use marchlight_core::Sdf;
use marchlight_core::math::smoothstep;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// A light source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Light {
    /// Light arriving from the given direction (pointing toward the light)
    Directional(Vec3),
    /// Light at a position in world space
    Point(Vec3),
}

impl Default for Light {
    fn default() -> Self {
        Self::Point(Vec3::ONE)
    }
}

impl Light {
    /// Unit vector from `p` toward the light
    pub fn direction_from(&self, p: Vec3) -> Vec3 {
        let v = match *self {
            Self::Directional(dir) => dir,
            Self::Point(pos) => pos - p,
        };
        v.try_normalize().unwrap_or(Vec3::Y)
    }

    /// Distance from `p` to a point light; directional lights are unbounded
    pub fn distance_from(&self, p: Vec3) -> Option<f32> {
        match *self {
            Self::Directional(_) => None,
            Self::Point(pos) => Some(pos.distance(p)),
        }
    }
}

/// Linear distance fog between `near` and `far`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fog {
    pub near: f32,
    pub far: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            near: 2.8,
            far: 8.0,
        }
    }
}

impl Fog {
    /// Blend weight toward the background at distance `t`
    pub fn amount(&self, t: f32) -> f32 {
        let span = self.far - self.near;
        if span.abs() <= f32::EPSILON {
            return if t >= self.far { 1.0 } else { 0.0 };
        }
        ((t - self.near) / span).clamp(0.0, 1.0)
    }
}

/// Output transfer curve
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Gamma {
    None,
    /// `sqrt(c)`
    #[default]
    Sqrt,
    /// `pow(c, 1 / gamma)`
    Power(f32),
}

impl Gamma {
    pub fn apply(self, color: Vec3) -> Vec3 {
        let c = color.max(Vec3::ZERO);
        match self {
            Self::None => color,
            Self::Sqrt => Vec3::new(c.x.sqrt(), c.y.sqrt(), c.z.sqrt()),
            Self::Power(gamma) => c.powf(1.0 / gamma),
        }
    }
}

/// Weights of the Blinn-Phong terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhongWeights {
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
}

impl Default for PhongWeights {
    fn default() -> Self {
        Self {
            ambient: 0.0,
            diffuse: 0.0,
            specular: 1.0,
        }
    }
}

/// Accumulated glow for under-stepped marches that pass through surfaces
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowParams {
    /// Added when a sample lies within 0.01 of a surface
    pub surface_tint: Vec3,
    /// Added on every step
    pub haze: Vec3,
    /// Glow fades between these radii from the origin
    pub fade_outer: f32,
    pub fade_inner: f32,
}

impl Default for GlowParams {
    fn default() -> Self {
        Self {
            surface_tint: Vec3::new(1.4, 2.1, 1.7),
            haze: Vec3::new(0.6, 0.25, 0.7),
            fade_outer: 20.0,
            fade_inner: 7.0,
        }
    }
}

/// How hits are turned into color
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ShadingModel {
    /// Normal mapped to RGB
    Normals,
    /// Hemispheric ambient plus shadowed diffuse
    #[default]
    Studio,
    BlinnPhong(PhongWeights),
    /// Spectrum palette over a banded highlight, mixed into Blinn-Phong by `blend`.
    ///
    /// `base` scales the normal-colored specular under the spectrum and
    /// `bands` adds the rippled highlight.
    Iridescent { blend: f32, base: f32, bands: bool },
    Glass(GlassParams),
    Glow(GlowParams),
}

/// Light and material parameters for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingParams {
    pub model: ShadingModel,

    // Lighting
    pub light: Light,
    /// Ambient color, weighted by how much the normal faces up
    pub sky_color: Vec3,
    /// Diffuse light color
    pub sun_color: Vec3,
    /// Soft shadows on diffuse light; `None` disables them
    pub shadows: Option<ShadowSettings>,

    // Material
    /// Tint used when a material id has no palette entry
    pub material_color: Vec3,
    /// Tints indexed by rounded material id
    pub palette: Vec<Vec3>,
    /// Blinn-Phong exponent
    pub shininess: f32,

    // Atmosphere
    pub fog: Option<Fog>,
    pub gamma: Gamma,
}

impl Default for ShadingParams {
    fn default() -> Self {
        Self {
            model: ShadingModel::Studio,

            // Cool sky, warm sun
            light: Light::Directional(Vec3::splat(0.57703)),
            sky_color: Vec3::new(0.2, 0.3, 0.4),
            sun_color: Vec3::new(0.8, 0.7, 0.5),
            shadows: Some(ShadowSettings::default()),

            material_color: Vec3::ONE,
            palette: Vec::new(),
            shininess: 0.5,

            fog: None,
            gamma: Gamma::Sqrt,
        }
    }
}

impl ShadingParams {
    /// Tint for a material id
    pub fn tint(&self, material: f32) -> Vec3 {
        self.palette
            .get(material.round() as usize)
            .filter(|_| material >= 0.0)
            .copied()
            .unwrap_or(self.material_color)
    }

    /// Apply fog toward `background` at distance `t`, then gamma
    pub fn finish(&self, color: Vec3, t: f32, background: Vec3) -> Vec3 {
        let color = match self.fog {
            Some(fog) => color.lerp(background, fog.amount(t)),
            None => color,
        };
        self.gamma.apply(color)
    }
}

/// Everything known about a surface point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub ray: Ray,
    pub t: f32,
    pub point: Vec3,
    pub normal: Vec3,
    pub material: f32,
}

/// Scene-wide inputs shared by every pixel
pub struct ShadeContext<'a, S: Sdf + ?Sized> {
    pub scene: &'a S,
    pub params: &'a ShadingParams,
    pub march: &'a MarchSettings,
    pub normals: NormalMethod,
    pub background: &'a Background,
    pub environment: Option<&'a CubeMap>,
}

impl<S: Sdf + ?Sized> ShadeContext<'_, S> {
    /// Background color along `direction`
    pub fn backdrop(&self, direction: Vec3) -> Vec3 {
        self.background.color(direction, self.environment)
    }

    /// Shade a surface hit with the configured model; linear output
    pub fn shade(&self, hit: &SurfaceHit) -> Vec3 {
        let params = self.params;
        let n = hit.normal;
        let eye = -hit.ray.direction;
        let l = params.light.direction_from(hit.point);
        let tint = params.tint(hit.material);

        match params.model {
            ShadingModel::Normals => n * 0.5 + Vec3::splat(0.5),
            ShadingModel::Studio => {
                let dif = self.diffuse(hit, l);
                let amb = 0.5 + 0.5 * n.y;
                (params.sky_color * amb + params.sun_color * dif) * tint
            }
            ShadingModel::BlinnPhong(w) => {
                let amb = 0.5 + 0.5 * n.y;
                let dif = self.diffuse(hit, l);
                let spec = blinn_phong_specular(l, eye, n, params.shininess);
                tint * (w.ambient * amb + w.diffuse * dif + w.specular * spec)
            }
            ShadingModel::Iridescent { blend, base, bands } => {
                let spec = blinn_phong_specular(l, eye, n, params.shininess);
                let phong = tint * spec;
                let irid = iridescent(hit, l, eye, base * spec * (n * 0.5 + Vec3::splat(0.5)), bands);
                phong.lerp(irid, blend)
            }
            ShadingModel::Glass(glass) => shade_glass(hit, self, &glass),
            // glow is accumulated along the whole ray, see `glow`
            ShadingModel::Glow(_) => Vec3::ZERO,
        }
    }

    fn diffuse(&self, hit: &SurfaceHit, l: Vec3) -> f32 {
        let mut dif = hit.normal.dot(l).clamp(0.0, 1.0);
        if let Some(shadow) = self.params.shadows.filter(|_| dif > 0.001) {
            let origin = hit.point + hit.normal * shadow.bias;
            let shadow = match self.params.light.distance_from(origin) {
                Some(distance) => shadow.reaching(distance),
                None => shadow,
            };
            dif *= soft_shadow(origin, l, self.scene, &shadow);
        }
        dif
    }
}

/// `pow(max(0, dot(n, h)), shininess)` with `h` the half vector
pub fn blinn_phong_specular(light: Vec3, eye: Vec3, normal: Vec3, shininess: f32) -> f32 {
    match (light + eye).try_normalize() {
        Some(h) => normal.dot(h).max(0.0).powf(shininess),
        None => 0.0,
    }
}

/// Cosine palette `a + b * cos(2π(c t + d))`
pub fn palette(t: f32, a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> Vec3 {
    let phase = (c * t + d) * TAU;
    a + b * Vec3::new(phase.x.cos(), phase.y.cos(), phase.z.cos())
}

/// Rainbow cycling once per unit of `t`
pub fn spectrum(t: f32) -> Vec3 {
    palette(
        t,
        Vec3::splat(0.5),
        Vec3::splat(0.5),
        Vec3::ONE,
        Vec3::new(0.0, 0.33, 0.67),
    )
}

fn iridescent(hit: &SurfaceHit, l: Vec3, eye: Vec3, under: Vec3, bands: bool) -> Vec3 {
    let n = hit.normal;
    let p = hit.point * 10.0;
    let perturb = Vec3::new(p.x.sin(), p.y.sin(), p.z.sin());
    let color = under + spectrum((n + perturb * 0.05).dot(eye) * 2.0);

    // dome light from straight above
    let dome = (n.y * 0.5 + 1.2).clamp(0.0, 1.0).powi(3);
    let color = color * dome;

    if !bands {
        return color;
    }
    let r = reflect(hit.ray.direction, n).dot(l).clamp(0.0, 1.0);
    let mut specular = ((r * 20.0 - 3.0).sin() * 0.5 + 0.5 + 0.1).powf(32.0) * r * 0.1;
    specular += (r + 0.3).powf(8.0) * 0.1;
    color + Vec3::splat(specular)
}

/// Mirror `incident` about `normal`
#[inline]
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

/// Accumulate glow along `ray`, stepping through surfaces.
///
/// Each step advances by `max(hit_epsilon, |d| * step_scale)` and adds a
/// little haze plus a bright tint near surfaces, faded by distance.
pub fn glow<S: Sdf + ?Sized>(
    ray: &Ray,
    scene: &S,
    march: &MarchSettings,
    params: &GlowParams,
) -> Vec3 {
    let scale = march.step_scale;
    let mut t = 0.0;
    let mut d: f32 = 0.0;
    let mut color = Vec3::ZERO;
    for _ in 0..march.max_steps {
        t += march.hit_epsilon.max(d.abs() * scale);
        let p = ray.at(t);
        d = scene.distance(p);

        let mut c = Vec3::splat((0.01 - d.abs()).max(0.0) * 0.5) * params.surface_tint;
        c += params.haze * scale / 160.0;
        c *= smoothstep(params.fade_outer, params.fade_inner, p.length());
        let fade = smoothstep(march.max_distance, 0.1, t);
        c *= fade;
        c *= spectrum(fade * 6.0 - 0.6);
        color += c;

        if t > march.max_distance {
            break;
        }
    }
    // contrast curve, then the usual gamma
    color.max(Vec3::ZERO).powf(1.0 / 0.9) * 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use marchlight_core::prelude::*;

    fn hit_on_sphere(normal: Vec3) -> SurfaceHit {
        SurfaceHit {
            ray: Ray::new(normal * 3.0, -normal),
            t: 2.0,
            point: normal,
            normal,
            material: 0.0,
        }
    }

    fn context<'a>(
        scene: &'a Sphere,
        params: &'a ShadingParams,
        march: &'a MarchSettings,
        background: &'a Background,
    ) -> ShadeContext<'a, Sphere> {
        ShadeContext {
            scene,
            params,
            march,
            normals: NormalMethod::default(),
            background,
            environment: None,
        }
    }

    #[test]
    fn spectrum_stays_in_range() {
        for i in 0..100 {
            let c = spectrum(i as f32 * 0.037 - 1.0);
            assert!(c.min_element() >= -1e-6 && c.max_element() <= 1.0 + 1e-6);
        }
        assert_relative_eq!(spectrum(0.0).x, 1.0);
    }

    #[test]
    fn blinn_phong_peaks_on_the_half_vector() {
        let n = Vec3::Z;
        assert_relative_eq!(blinn_phong_specular(n, n, n, 8.0), 1.0);
        assert_relative_eq!(blinn_phong_specular(Vec3::X, -Vec3::X, n, 8.0), 0.0);
        assert!(blinn_phong_specular(Vec3::X, Vec3::Z, n, 8.0) < 1.0);
    }

    #[test]
    fn studio_is_brightest_facing_the_light() {
        let scene = sphere(1.0);
        let params = ShadingParams::default();
        let march = MarchSettings::default();
        let bg = Background::default();
        let ctx = context(&scene, &params, &march, &bg);

        let lit = ctx.shade(&hit_on_sphere(Vec3::ONE.normalize()));
        let dark = ctx.shade(&hit_on_sphere(-Vec3::ONE.normalize()));
        assert!(lit.element_sum() > dark.element_sum());
        // unlit side keeps only ambient: sky * (0.5 - 0.5 / sqrt 3)
        assert_relative_eq!(dark.x, 0.2 * (0.5 - 0.5 / 3f32.sqrt()), epsilon = 1e-5);
    }

    #[test]
    fn palette_overrides_material_color() {
        let params = ShadingParams {
            palette: vec![Vec3::X, Vec3::Y],
            ..Default::default()
        };
        assert_eq!(params.tint(1.2), Vec3::Y);
        assert_eq!(params.tint(7.0), Vec3::ONE);
        assert_eq!(params.tint(-1.0), Vec3::ONE);
    }

    #[test]
    fn fog_blends_toward_background() {
        let params = ShadingParams {
            fog: Some(Fog::default()),
            gamma: Gamma::None,
            ..Default::default()
        };
        assert_eq!(params.finish(Vec3::ONE, 1.0, Vec3::ZERO), Vec3::ONE);
        assert_eq!(params.finish(Vec3::ONE, 9.0, Vec3::ZERO), Vec3::ZERO);
        assert_relative_eq!(params.finish(Vec3::ONE, 5.4, Vec3::ZERO).x, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn gamma_curves() {
        assert_relative_eq!(Gamma::Sqrt.apply(Vec3::splat(0.25)).x, 0.5);
        assert_relative_eq!(Gamma::Power(2.0).apply(Vec3::splat(0.25)).y, 0.5);
        assert_eq!(Gamma::None.apply(Vec3::splat(0.25)), Vec3::splat(0.25));
    }

    #[test]
    fn iridescent_mix_endpoints() {
        let scene = sphere(1.0);
        let march = MarchSettings::default();
        let bg = Background::default();
        let hit = hit_on_sphere(Vec3::Z);

        let phong_only = ShadingParams {
            model: ShadingModel::Iridescent {
                blend: 0.0,
                base: 0.0,
                bands: false,
            },
            ..Default::default()
        };
        let c = context(&scene, &phong_only, &march, &bg).shade(&hit);
        let l = phong_only.light.direction_from(hit.point);
        let expected = blinn_phong_specular(l, Vec3::Z, Vec3::Z, 0.5);
        assert_relative_eq!(c.x, expected, epsilon = 1e-5);

        let full = ShadingParams {
            model: ShadingModel::Iridescent {
                blend: 1.0,
                base: 0.25,
                bands: true,
            },
            ..Default::default()
        };
        let c = context(&scene, &full, &march, &bg).shade(&hit);
        assert!(c.is_finite());
        assert!(c.min_element() >= 0.0);
    }

    #[test]
    fn glow_accumulates_near_surfaces() {
        let scene = sphere(1.0);
        let march = MarchSettings {
            max_steps: 82,
            step_scale: 0.4,
            ..Default::default()
        };
        let params = GlowParams::default();
        let through = glow(&Ray::new(Vec3::new(0.0, 0.0, 4.0), Vec3::NEG_Z), &scene, &march, &params);
        let past = glow(&Ray::new(Vec3::new(0.0, 3.0, 4.0), Vec3::NEG_Z), &scene, &march, &params);
        assert!(through.element_sum() > past.element_sum());
    }
}
