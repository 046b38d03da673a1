//! Sphere tracing
//!
//! Steps along a ray by the distance the field reports. As long as the
//! field never overestimates, a step can not skip past the first surface.
//! The step budget is mandatory: fields that are not Lipschitz-bounded may
//! never converge, and running out of steps counts as a miss.

use crate::ray::Ray;
use glam::Vec3;
use marchlight_core::Sdf;
use serde::{Deserialize, Serialize};

/// Limits for one sphere trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarchSettings {
    pub max_steps: u32,
    pub max_distance: f32,
    pub hit_epsilon: f32,
    /// Multiplier on each step; below 1 under-steps to sample more of the volume
    pub step_scale: f32,
}

impl Default for MarchSettings {
    fn default() -> Self {
        Self {
            max_steps: 90,
            max_distance: 20.0,
            hit_epsilon: 0.001,
            step_scale: 1.0,
        }
    }
}

impl MarchSettings {
    pub fn with_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_epsilon(mut self, hit_epsilon: f32) -> Self {
        self.hit_epsilon = hit_epsilon;
        self
    }
}

/// Outcome of one sphere trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchResult {
    pub hit: bool,
    /// Distance travelled along the ray
    pub t: f32,
    pub point: Vec3,
    /// Field evaluations used
    pub steps: u32,
    /// Smallest absolute distance seen on the way
    pub closest: f32,
    /// Material of the last sample
    pub material: f32,
}

/// Trace `ray` through `scene`
pub fn march<S: Sdf + ?Sized>(ray: &Ray, scene: &S, settings: &MarchSettings) -> MarchResult {
    march_with(ray, scene, settings, |_, _, _| {})
}

/// Trace `ray`, calling `visit(point, distance, t)` after every field evaluation.
///
/// Used by glow shading to accumulate light along under-stepped marches.
pub fn march_with<S, F>(ray: &Ray, scene: &S, settings: &MarchSettings, mut visit: F) -> MarchResult
where
    S: Sdf + ?Sized,
    F: FnMut(Vec3, f32, f32),
{
    let scale = settings.step_scale.max(f32::EPSILON);
    let mut t = 0.0;
    let mut closest = f32::MAX;
    let mut material = -1.0;

    for step in 0..settings.max_steps {
        let point = ray.at(t);
        let sample = scene.sample(point);
        visit(point, sample.distance, t);

        closest = closest.min(sample.distance.abs());
        material = sample.material;

        if sample.distance < settings.hit_epsilon {
            return MarchResult {
                hit: true,
                t,
                point,
                steps: step + 1,
                closest,
                material,
            };
        }

        t += sample.distance * scale;
        if t > settings.max_distance || !t.is_finite() {
            return miss(ray, t, step + 1, closest, material);
        }
    }

    miss(ray, t, settings.max_steps, closest, material)
}

fn miss(ray: &Ray, t: f32, steps: u32, closest: f32, material: f32) -> MarchResult {
    MarchResult {
        hit: false,
        t,
        point: ray.at(t),
        steps,
        closest,
        material,
    }
}
