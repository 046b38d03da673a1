//! Sketches lit only by a Blinn-Phong highlight

use crate::sketch::Sketch;
use marchlight_core::prelude::*;
use marchlight_render::{
    Background, CameraPose, FrameTime, Gamma, Light, PhongWeights, RenderSettings, ShadingModel,
    ShadingParams,
};
use std::f32::consts::{PI, TAU};

fn highlight(color: Vec3, shininess: f32) -> ShadingParams {
    ShadingParams {
        model: ShadingModel::BlinnPhong(PhongWeights::default()),
        light: Light::Point(Vec3::ONE),
        shadows: None,
        material_color: color,
        shininess,
        gamma: Gamma::None,
        ..Default::default()
    }
}

/// Four triangular prisms drifting apart and melting back together
pub struct LitPrisms;

impl Sketch for LitPrisms {
    fn name(&self) -> &'static str {
        "lit-prisms"
    }

    fn description(&self) -> &'static str {
        "Smooth-blended triangular prisms under a pink specular light"
    }

    fn scene(&self, time: FrameTime) -> SdfNode {
        let s = (time.playhead * PI).sin();
        let prism = || tri_prism(Vec2::new(0.5, 0.25));
        let drift = Vec3::new(0.75, -0.75, -0.25) * s;

        prism()
            .translate(-0.5 * s, -0.5 * s, -0.5 * s)
            .smooth_union(prism().translate(0.5 * s, 0.5 * s, 0.5 * s), 0.8)
            .smooth_union(prism().translate(-drift.x, -drift.y, -drift.z), 0.8)
            .smooth_union(prism(), 0.8)
    }

    fn camera(&self, time: FrameTime) -> CameraPose {
        CameraPose::new(Vec3::new(3.5, 3.0, 3.5), Vec3::ZERO, 2.0).orbit(TAU * time.playhead)
    }

    fn settings(&self) -> RenderSettings {
        RenderSettings {
            shading: highlight(Vec3::new(0.8, 0.33, 0.42), 0.8),
            background: Background::Solid(Vec3::ZERO),
            ..Default::default()
        }
    }
}

/// An arched window frame drawn with quadratic Bézier tubes and capsules
pub struct BezierWindow;

impl BezierWindow {
    const TUBE: f32 = 0.15;
}

impl Sketch for BezierWindow {
    fn name(&self) -> &'static str {
        "bezier-window"
    }

    fn description(&self) -> &'static str {
        "A pointed-arch window frame of Bézier curves and capsules"
    }

    fn scene(&self, _time: FrameTime) -> SdfNode {
        let apex = Vec3::new(0.0, 4.0, 0.0);
        let shoulder = Vec3::new(-3.0, 2.0, 0.0);
        let spring = Vec3::new(-3.0, 1.0, 0.0);
        let flip = Vec3::new(-1.0, 1.0, 1.0);

        bezier(apex, shoulder, spring, Self::TUBE)
            .union(bezier(apex, shoulder * flip, spring * flip, Self::TUBE))
            .union(vertical_capsule(5.0, Self::TUBE).translate(-3.0, -4.0, 0.0))
            .union(vertical_capsule(5.0, Self::TUBE).translate(3.0, -4.0, 0.0))
            .union(capsule(
                Vec3::new(-3.0, -4.0, 0.0),
                Vec3::new(3.0, -4.0, 0.0),
                Self::TUBE,
            ))
    }

    fn camera(&self, _time: FrameTime) -> CameraPose {
        CameraPose::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 1.0)
    }

    fn settings(&self) -> RenderSettings {
        RenderSettings {
            shading: highlight(Vec3::new(0.93, 0.79, 0.48), 0.1),
            background: Background::Solid(Vec3::new(0.1, 0.11, 0.14)),
            ..Default::default()
        }
    }

    fn duration(&self) -> f32 {
        2.0
    }
}
