//! Iridescent sketches: a rainbow palette driven by the view angle

use crate::sketch::Sketch;
use marchlight_core::math::rotate_2d;
use marchlight_core::prelude::*;
use marchlight_core::sdf::clifford::DEFAULT_UV_SCALE;
use marchlight_core::sdf::planar::hexagon_2d;
use marchlight_core::sdf::{mod2, smooth_max};
use marchlight_render::{
    Background, CameraPose, Fog, FrameTime, Gamma, Light, RenderSettings, ShadingModel,
    ShadingParams,
};
use std::f32::consts::{PI, TAU};

fn iridescent(blend: f32, base: f32, bands: bool) -> ShadingParams {
    ShadingParams {
        model: ShadingModel::Iridescent { blend, base, bands },
        light: Light::Point(Vec3::ONE),
        shadows: None,
        shininess: 0.5,
        fog: Some(Fog::default()),
        gamma: Gamma::Power(2.2),
        ..Default::default()
    }
}

/// A torus rolling over once per loop while the camera circles it
pub struct IridescentDonut;

impl Sketch for IridescentDonut {
    fn name(&self) -> &'static str {
        "iridescent-donut"
    }

    fn description(&self) -> &'static str {
        "A rolling torus with a soap-film sheen and rippled highlights"
    }

    fn scene(&self, time: FrameTime) -> SdfNode {
        torus(0.5, 0.25).rotate_x(TAU * time.playhead)
    }

    fn camera(&self, time: FrameTime) -> CameraPose {
        CameraPose::new(Vec3::new(3.5, 3.0, 3.5), Vec3::ZERO, 2.0).orbit(TAU * time.playhead)
    }

    fn settings(&self) -> RenderSettings {
        RenderSettings {
            shading: iridescent(1.0, 0.25, true),
            background: Background::Solid(Vec3::ZERO),
            ..Default::default()
        }
    }
}

/// Hexagonal tiles on a Clifford torus that turns inside out
pub struct CliffordTorusShapes;

impl CliffordTorusShapes {
    /// Tiles around each direction of the surface
    const TILES: f32 = 10.0;
    const BACKGROUND: Vec3 = Vec3::new(0.075, 0.071, 0.09);

    /// Thin hexagonal tiles in the unrolled surface frame, each spun by `spin`
    fn tiles(spin: f32) -> impl Sdf + 'static {
        let repeat = DEFAULT_UV_SCALE / Self::TILES;
        field(move |p: Vec3| {
            let (cell, _) = mod2(p.truncate() + Vec2::splat(repeat * 0.5), Vec2::splat(repeat));
            let cell = rotate_2d(cell, spin);
            let d = hexagon_2d(cell, 0.09) * 0.5;
            smooth_max(d, p.z.abs() - 0.013, 0.01)
        })
    }
}

impl Sketch for CliffordTorusShapes {
    fn name(&self) -> &'static str {
        "clifford-torus"
    }

    fn description(&self) -> &'static str {
        "Spinning hexagons tiled over a Clifford torus turning inside out"
    }

    fn scene(&self, time: FrameTime) -> SdfNode {
        let playhead = time.playhead;
        SdfNode::new(
            CliffordTorus::new(Self::tiles(playhead * PI * 0.845))
                .with_rotation(playhead * -PI / 2.0),
        )
    }

    fn camera(&self, _time: FrameTime) -> CameraPose {
        CameraPose::new(Vec3::splat(3.0), Vec3::ZERO, 1.25)
    }

    fn settings(&self) -> RenderSettings {
        RenderSettings {
            shading: iridescent(0.5, 0.0, false),
            background: Background::Solid(Self::BACKGROUND),
            ..Default::default()
        }
    }

    fn duration(&self) -> f32 {
        5.0
    }
}
