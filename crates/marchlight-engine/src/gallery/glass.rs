//! Light passing through solids: refraction and volumetric glow

use crate::sketch::Sketch;
use marchlight_core::math::rotate_2d;
use marchlight_core::prelude::*;
use marchlight_render::{
    Background, CameraPose, FrameTime, Gamma, GlassParams, GlowParams, MarchSettings,
    RenderSettings, ShadingModel, ShadingParams,
};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// A faceted crystal refracting the environment map
pub struct Crystal;

impl Sketch for Crystal {
    fn name(&self) -> &'static str {
        "crystal"
    }

    fn description(&self) -> &'static str {
        "A glass crystal splitting the environment into colored fringes"
    }

    fn scene(&self, _time: FrameTime) -> SdfNode {
        SdfNode::new(crystal(1.0))
    }

    fn camera(&self, _time: FrameTime) -> CameraPose {
        // pointer resting in the middle of the canvas
        CameraPose::new(Vec3::new(3.5, 0.0, 3.5), Vec3::ZERO, 2.0).with_pointer(FRAC_PI_2 - 1.0, PI)
    }

    fn settings(&self) -> RenderSettings {
        RenderSettings {
            shading: ShadingParams {
                model: ShadingModel::Glass(GlassParams::default()),
                shadows: None,
                gamma: Gamma::None,
                ..Default::default()
            },
            background: Background::Environment,
            ..Default::default()
        }
    }
}

/// Nested folded boxes seen as glowing fog rather than hard surfaces
pub struct FoggedGlass;

impl Sketch for FoggedGlass {
    fn name(&self) -> &'static str {
        "fogged-glass"
    }

    fn description(&self) -> &'static str {
        "Folded boxes traced as purple glow, breaking apart and rejoining"
    }

    fn scene(&self, time: FrameTime) -> SdfNode {
        let a = time.playhead * TAU;
        let off = 0.8 * (2.5 * (a.sin() * 0.5 + 0.5)).min(1.5);
        SdfNode::new(field(move |p: Vec3| {
            let xy = rotate_2d(Vec2::new(p.x, p.y), a);
            let yz = rotate_2d(Vec2::new(xy.y, p.z), -a);
            let zx = rotate_2d(Vec2::new(yz.y, xy.x), a);
            let p = Vec3::new(zx.y, yz.x, zx.x);

            let p = p.abs() - Vec3::splat(off * 0.8);
            let p = p.abs() - Vec3::splat(off * 1.2);
            (p.abs() - Vec3::splat(0.75)).max_element()
        }))
    }

    fn camera(&self, _time: FrameTime) -> CameraPose {
        CameraPose::new(Vec3::new(4.0, 4.0, -4.0), Vec3::ZERO, 1.0)
    }

    fn settings(&self) -> RenderSettings {
        RenderSettings {
            march: MarchSettings {
                max_steps: 82,
                step_scale: 0.4,
                ..Default::default()
            },
            shading: ShadingParams {
                model: ShadingModel::Glow(GlowParams::default()),
                gamma: Gamma::Power(2.2),
                ..Default::default()
            },
            background: Background::Solid(Vec3::ZERO),
            ..Default::default()
        }
    }

    fn duration(&self) -> f32 {
        6.0
    }
}
