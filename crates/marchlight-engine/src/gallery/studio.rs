//! Studio-lit sketches: sky ambient plus a shadowed sun, square-root gamma

use crate::sketch::Sketch;
use marchlight_core::prelude::*;
use marchlight_render::{
    Background, CameraPose, FrameTime, Light, MarchSettings, NormalMethod, RenderSettings,
    ShadingParams,
};
use std::f32::consts::{PI, TAU};

/// Close-up march used by the studio sketches: many small steps, short range
fn close_up_march() -> MarchSettings {
    MarchSettings::default()
        .with_steps(256)
        .with_max_distance(5.0)
        .with_epsilon(0.0001)
}

fn close_up_settings(shading: ShadingParams) -> RenderSettings {
    RenderSettings {
        march: close_up_march(),
        normals: NormalMethod::FINE,
        shading,
        background: Background::Solid(Vec3::ZERO),
        ..Default::default()
    }
}

/// Unit sphere under a single directional light
pub struct UnitSphere;

impl Sketch for UnitSphere {
    fn name(&self) -> &'static str {
        "unit-sphere"
    }

    fn description(&self) -> &'static str {
        "Reference scene: a unit sphere under a directional light from (1, 1, 1)"
    }

    fn scene(&self, _time: FrameTime) -> SdfNode {
        SdfNode::new(sphere(1.0))
    }

    fn camera(&self, _time: FrameTime) -> CameraPose {
        CameraPose::look_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO)
    }

    fn settings(&self) -> RenderSettings {
        RenderSettings {
            shading: ShadingParams {
                light: Light::Directional(Vec3::ONE),
                ..Default::default()
            },
            background: Background::Solid(Vec3::new(0.05, 0.05, 0.08)),
            ..Default::default()
        }
    }
}

/// Thin spherical shell with a moving cut, tumbling about the long diagonal
pub struct HollowSphere;

impl Sketch for HollowSphere {
    fn name(&self) -> &'static str {
        "hollow-sphere"
    }

    fn description(&self) -> &'static str {
        "A cut hollow sphere opening and closing as it tumbles"
    }

    fn scene(&self, time: FrameTime) -> SdfNode {
        let t = time.time;
        let cut = 0.2 + 0.2 * t.cos();
        cut_hollow_sphere(0.25, cut, 0.01).rotate(Vec3::NEG_ONE, t.sin() * PI * 1.5)
    }

    fn camera(&self, time: FrameTime) -> CameraPose {
        let an = (0.2 * time.time).sin();
        CameraPose::new(Vec3::new(an.cos(), 0.0, an.sin()), Vec3::ZERO, 1.5)
    }

    fn settings(&self) -> RenderSettings {
        close_up_settings(ShadingParams::default())
    }

    // sin(0.2 t) comes back around after 10π seconds
    fn duration(&self) -> f32 {
        5.0 * TAU
    }
}

/// Half of a breathing rounded box, onioned twice
pub struct BoxOnion;

impl Sketch for BoxOnion {
    fn name(&self) -> &'static str {
        "box-onion"
    }

    fn description(&self) -> &'static str {
        "Nested shells of a breathing rounded box, cut open at y = 0"
    }

    fn scene(&self, time: FrameTime) -> SdfNode {
        let (s, c) = time.time.sin_cos();
        let size = Vec3::new(0.25 + 0.125 * c, 0.25 + 0.125 * c, 0.25 + 0.125 * s);
        rounded_box(size, 0.02)
            .onion(0.05)
            .onion(0.02)
            .intersect(plane(Vec3::Y, 0.0))
    }

    fn camera(&self, _time: FrameTime) -> CameraPose {
        CameraPose::new(Vec3::ONE, Vec3::ZERO, 1.5)
    }

    fn settings(&self) -> RenderSettings {
        let coral = Vec3::new(0.996, 0.4, 0.4);
        close_up_settings(ShadingParams {
            sky_color: coral,
            sun_color: coral,
            ..Default::default()
        })
    }

    fn duration(&self) -> f32 {
        TAU
    }
}

/// Thin rounded plates on a grid, each rotated and bent on its own phase
pub struct BentBoxes;

impl BentBoxes {
    const COLUMNS: u32 = 7;
    const ROWS: u32 = 3;
    const SPACING: Vec2 = Vec2::new(0.5, 0.25);
    /// Phase shift per column and per row
    const OFFSET: f32 = 0.0625;
    const AXIS: Vec3 = Vec3::new(0.3, 1.0, 0.5);
    /// Furthest a plate reaches from its bend axis
    const REACH: f32 = 0.3;
}

impl Sketch for BentBoxes {
    fn name(&self) -> &'static str {
        "bent-boxes"
    }

    fn description(&self) -> &'static str {
        "A grid of paper-thin plates rocking and bending in a wave"
    }

    fn scene(&self, time: FrameTime) -> SdfNode {
        let playhead = time.playhead;
        let centre = Vec2::new((Self::COLUMNS - 1) as f32, (Self::ROWS - 1) as f32) * 0.5;
        let scene = SceneBuilder::new()
            .grid(Self::COLUMNS, Self::ROWS, Self::SPACING, |x, y| {
                let cell = Vec2::new(x as f32, y as f32) - centre;
                let amount = (playhead + (cell.x + cell.y) * Self::OFFSET) * TAU;
                let rotation = amount.sin() * PI * 0.25;
                let bend = amount.cos() * 0.5;
                let transform = Transform::axis_angle(Self::AXIS, rotation)
                    .then(Transform::bend(bend, Self::REACH));
                let plate = rounded_box(Vec3::new(0.25, 0.00625 / 4.0, 0.25), 0.0125);
                (transform, plate, 0.0)
            })
            .build();
        SdfNode::new(scene)
    }

    fn camera(&self, _time: FrameTime) -> CameraPose {
        CameraPose::new(Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO, 1.5)
    }

    fn settings(&self) -> RenderSettings {
        close_up_settings(ShadingParams::default())
    }

    fn duration(&self) -> f32 {
        4.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hollow_sphere_shell_thickness() {
        // at t = 0 the cut sits above the sphere, leaving a closed shell
        let scene = HollowSphere.scene(FrameTime::new(0.0, 0.0));
        assert_relative_eq!(scene.distance(Vec3::new(0.0, -0.25, 0.0)), -0.01, epsilon = 1e-5);
    }

    #[test]
    fn test_box_onion_is_cut_open() {
        let scene = BoxOnion.scene(FrameTime::default());
        // nothing above the cutting plane
        assert!(scene.distance(Vec3::new(0.0, 0.2, 0.0)) > 0.0);
        // the outer shell at time 0: half extent 0.375 + rounding 0.02
        let outer = 0.375 + 0.02;
        assert!(scene.distance(Vec3::new(outer + 0.05, -0.1, 0.0)).abs() < 0.03);
    }

    #[test]
    fn test_bent_boxes_grid_is_centred() {
        let scene = BentBoxes.scene(FrameTime::new(0.0, 0.0));
        let left = scene.distance(Vec3::new(-1.5, 0.0, 0.0));
        let right = scene.distance(Vec3::new(1.5, 0.0, 0.0));
        assert!(left < 0.3 && right < 0.3);
        assert!(scene.distance(Vec3::new(0.0, 0.0, 1.0)) > 0.5);
    }

    #[test]
    fn test_unit_sphere_reference() {
        let scene = UnitSphere.scene(FrameTime::default());
        assert_relative_eq!(scene.distance(Vec3::new(0.0, 0.0, 3.0)), 2.0);
        assert!(matches!(UnitSphere.settings().shading.light, Light::Directional(_)));
    }
}
