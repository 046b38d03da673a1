//! Per-pixel pipeline and the frame entry points
//!
//! Each pixel is independent: camera ray, sphere trace, normal, shading,
//! fog and gamma. Scanlines are shaded in parallel and written straight into
//! their slice of the frame, so no locking is needed.

use crate::camera::{CameraFrame, CameraPose, screen_uv};
use crate::differential::{NormalMethod, normal};
use crate::environment::{Background, CubeMap};
use crate::error::{RenderError, Result};
use crate::frame::Frame;
use crate::march::{MarchSettings, march};
use crate::ray::Ray;
use crate::shading::{ShadeContext, ShadingModel, ShadingParams, SurfaceHit, glow};
use glam::Vec3;
use marchlight_core::Sdf;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Animation clock sampled once per frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameTime {
    /// Seconds since the start
    pub time: f32,
    /// Position in the loop, `0..1`
    pub playhead: f32,
}

impl FrameTime {
    pub fn new(time: f32, playhead: f32) -> Self {
        Self { time, playhead }
    }

    /// Clock at `time` seconds into a loop of `duration` seconds
    pub fn at(time: f32, duration: f32) -> Self {
        let playhead = if duration > 0.0 {
            (time / duration).rem_euclid(1.0)
        } else {
            0.0
        };
        Self { time, playhead }
    }

    /// Clock for frame `frame` of `frames` evenly spread over `duration` seconds
    pub fn looping(frame: u32, frames: u32, duration: f32) -> Self {
        let playhead = if frames > 0 {
            (frame % frames) as f32 / frames as f32
        } else {
            0.0
        };
        Self {
            time: playhead * duration,
            playhead,
        }
    }
}

/// Everything the renderer needs besides the camera and the scene
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub march: MarchSettings,
    pub normals: NormalMethod,
    pub shading: ShadingParams,
    pub background: Background,
    /// Decoded cube map for [`Background::Environment`] and glass
    #[serde(skip)]
    pub environment: Option<Arc<CubeMap>>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            march: MarchSettings::default(),
            normals: NormalMethod::default(),
            shading: ShadingParams::default(),
            background: Background::default(),
            environment: None,
        }
    }
}

impl RenderSettings {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_environment(mut self, environment: CubeMap) -> Self {
        self.environment = Some(Arc::new(environment));
        self
    }

    fn context<'a, S: Sdf + ?Sized>(&'a self, scene: &'a S) -> ShadeContext<'a, S> {
        ShadeContext {
            scene,
            params: &self.shading,
            march: &self.march,
            normals: self.normals,
            background: &self.background,
            environment: self.environment.as_deref(),
        }
    }
}

/// Result of tracing one primary ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSample {
    pub color: Vec3,
    pub hit: bool,
    pub steps: u32,
}

/// Trace and shade one primary ray. Non-finite colors become the background,
/// and every component is clamped to `0..=1`.
pub fn trace<S: Sdf + ?Sized>(ray: &Ray, settings: &RenderSettings, scene: &S) -> PixelSample {
    trace_in(&settings.context(scene), ray)
}

fn trace_in<S: Sdf + ?Sized>(ctx: &ShadeContext<'_, S>, ray: &Ray) -> PixelSample {
    let background = ctx.backdrop(ray.direction);

    let sample = if let ShadingModel::Glow(params) = ctx.params.model {
        PixelSample {
            color: ctx.params.gamma.apply(glow(ray, ctx.scene, ctx.march, &params)),
            hit: false,
            steps: ctx.march.max_steps,
        }
    } else {
        let result = march(ray, ctx.scene, ctx.march);
        let color = if result.hit {
            let hit = SurfaceHit {
                ray: *ray,
                t: result.t,
                point: result.point,
                normal: normal(result.point, ctx.scene, ctx.normals),
                material: result.material,
            };
            ctx.params.finish(ctx.shade(&hit), result.t, background)
        } else {
            background
        };
        PixelSample {
            color,
            hit: result.hit,
            steps: result.steps,
        }
    };

    let color = if sample.color.is_finite() {
        sample.color
    } else {
        background
    };
    PixelSample {
        color: color.clamp(Vec3::ZERO, Vec3::ONE),
        ..sample
    }
}

/// Render one frame of `scene` at the size given in `settings`
pub fn render_scene<S: Sdf + ?Sized>(
    settings: &RenderSettings,
    camera: &CameraPose,
    scene: &S,
) -> Result<Frame> {
    let start = Instant::now();
    let (width, height) = (settings.width, settings.height);
    let mut frame = Frame::new(width, height, Vec3::ZERO)?;
    let view: CameraFrame = camera.frame();
    let ctx = settings.context(scene);

    let (hits, steps) = frame
        .pixels_mut()
        .par_chunks_mut(width as usize)
        .enumerate()
        .map(|(y, row)| {
            let mut hits = 0u64;
            let mut steps = 0u64;
            for (x, slot) in row.iter_mut().enumerate() {
                let uv = screen_uv(x as u32, y as u32, width, height);
                let sample = trace_in(&ctx, &view.ray(uv));
                *slot = sample.color;
                hits += u64::from(sample.hit);
                steps += u64::from(sample.steps);
            }
            (hits, steps)
        })
        .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

    let pixels = u64::from(width) * u64::from(height);
    debug!(
        width,
        height,
        hits,
        mean_steps = steps as f64 / pixels as f64,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "rendered frame"
    );
    Ok(frame)
}

/// Build the scene for `time` and render it at `width x height`.
///
/// The scene closure runs once, before any pixel is shaded.
pub fn render<S, F>(
    width: u32,
    height: u32,
    camera: &CameraPose,
    scene_at: F,
    settings: &RenderSettings,
    time: FrameTime,
) -> Result<Frame>
where
    S: Sdf,
    F: FnOnce(FrameTime) -> S,
{
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    let scene = scene_at(time);
    let sized = RenderSettings {
        width,
        height,
        ..settings.clone()
    };
    render_scene(&sized, camera, &scene)
}
