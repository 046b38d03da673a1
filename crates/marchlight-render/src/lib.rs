//! Marchlight Render - CPU sphere tracer for signed distance fields
//!
//! Turns a scene function from `marchlight-core` and a camera pose into a
//! frame of RGB pixels.
//!
//! ## Pipeline
//!
//! For every pixel, in parallel across scanlines:
//!
//! 1. [`camera`] builds a ray from the pixel's square-frame coordinate
//! 2. [`march`] sphere-traces it through the scene
//! 3. [`differential`] estimates the normal and soft shadow at a hit
//! 4. [`shading`] lights the hit, then applies fog and gamma
//!
//! A miss, or anything that produces a non-finite color, shows the
//! [`Background`] instead. Nothing inside a frame can fail.
//!
//! ## Example
//!
//! ```rust
//! use marchlight_core::prelude::*;
//! use marchlight_render::{CameraPose, FrameTime, RenderSettings, render};
//!
//! let camera = CameraPose::look_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO);
//! let frame = render(32, 32, &camera, |_| sphere(1.0), &RenderSettings::default(), FrameTime::default())?;
//! assert_eq!(frame.width(), 32);
//! # Ok::<(), marchlight_render::RenderError>(())
//! ```

pub mod camera;
pub mod differential;
pub mod environment;
pub mod frame;
pub mod march;
pub mod ray;
pub mod refraction;
pub mod render;
pub mod shading;

mod error;

pub use camera::{CameraFrame, CameraPose, screen_uv};
pub use differential::{NormalMethod, ShadowSettings, normal, soft_shadow};
pub use environment::{Background, CubeFace, CubeMap, FaceImage};
pub use error::{RenderError, Result};
pub use frame::Frame;
pub use march::{MarchResult, MarchSettings, march, march_with};
pub use ray::Ray;
pub use refraction::GlassParams;
pub use render::{FrameTime, PixelSample, RenderSettings, render, render_scene, trace};
pub use shading::{
    Fog, Gamma, GlowParams, Light, PhongWeights, ShadingModel, ShadingParams, palette, spectrum,
};
