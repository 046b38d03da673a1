//! Camera pose and primary ray generation

use crate::ray::Ray;
use glam::{Vec2, Vec3};
use marchlight_core::math::rotate_2d;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A pinhole camera looking from `origin` at `target`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPose {
    /// Camera position in world space
    pub origin: Vec3,
    /// Point the camera is looking at
    pub target: Vec3,
    /// Distance from the eye to the image plane; larger values zoom in
    pub lens_length: f32,
    /// Up vector (usually Y-up)
    pub up: Vec3,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            origin: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            lens_length: 2.0,
            up: Vec3::Y,
        }
    }
}

impl CameraPose {
    pub fn new(origin: Vec3, target: Vec3, lens_length: f32) -> Self {
        Self {
            origin,
            target,
            lens_length,
            ..Default::default()
        }
    }

    /// Create a camera looking at a target from a position
    pub fn look_at(origin: Vec3, target: Vec3) -> Self {
        Self {
            origin,
            target,
            ..Default::default()
        }
    }

    pub fn with_lens(mut self, lens_length: f32) -> Self {
        self.lens_length = lens_length;
        self
    }

    /// Distance from camera to target
    pub fn distance(&self) -> f32 {
        (self.origin - self.target).length()
    }

    /// Spin the origin around Y: `origin * (sin a, 1, cos a)`.
    ///
    /// This scales rather than rotates, so the orbit is an ellipse unless
    /// `origin.x == origin.z`. At `a = 0` the x component drops out.
    pub fn orbit(mut self, angle: f32) -> Self {
        self.origin *= Vec3::new(angle.sin(), 1.0, angle.cos());
        self
    }

    /// Drive the origin from two angular inputs: `pitch` turns `origin.yz`,
    /// then `yaw` turns `origin.xz`. Both rotations are counter-clockwise.
    pub fn with_pointer(mut self, pitch: f32, yaw: f32) -> Self {
        let yz = rotate_2d(Vec2::new(self.origin.y, self.origin.z), pitch);
        self.origin.y = yz.x;
        self.origin.z = yz.y;
        let xz = rotate_2d(Vec2::new(self.origin.x, self.origin.z), yaw);
        self.origin.x = xz.x;
        self.origin.z = xz.y;
        self
    }

    /// Build the view basis: `right = up x forward`, `up' = forward x right`.
    ///
    /// Logs and substitutes a fallback when the pose is degenerate.
    pub fn frame(&self) -> CameraFrame {
        let forward = match (self.target - self.origin).try_normalize() {
            Some(f) => f,
            None => {
                warn!(origin = ?self.origin, "camera target equals origin, looking down -Z");
                Vec3::NEG_Z
            }
        };

        let right = [self.up, Vec3::Z, Vec3::X]
            .into_iter()
            .enumerate()
            .find_map(|(i, up)| {
                let right = up.cross(forward).try_normalize()?;
                if i > 0 {
                    warn!(?forward, fallback = ?up, "camera forward is parallel to up, using fallback");
                }
                Some(right)
            })
            .unwrap_or(Vec3::X);

        CameraFrame {
            origin: self.origin,
            forward,
            right,
            up: forward.cross(right),
            lens_length: self.lens_length,
        }
    }

    /// Get the forward direction (normalized)
    pub fn forward(&self) -> Vec3 {
        self.frame().forward
    }

    /// Get the right direction (normalized)
    pub fn right(&self) -> Vec3 {
        self.frame().right
    }

    /// Ray through square-frame coordinate `uv`
    pub fn ray(&self, uv: Vec2) -> Ray {
        self.frame().ray(uv)
    }
}

/// Orthonormal view basis, built once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub origin: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub lens_length: f32,
}

impl CameraFrame {
    #[inline]
    pub fn ray(&self, uv: Vec2) -> Ray {
        Ray::new(
            self.origin,
            uv.x * self.right + uv.y * self.up + self.lens_length * self.forward,
        )
    }
}

/// Map a pixel to square-frame coordinates.
///
/// The pixel centre is used. Y points up and row 0 is the top of the image.
/// The shorter axis spans `-1..1`; x is scaled by the aspect ratio.
pub fn screen_uv(x: u32, y: u32, width: u32, height: u32) -> Vec2 {
    let size = Vec2::new(width.max(1) as f32, height.max(1) as f32);
    let coord = Vec2::new(x as f32 + 0.5, size.y - y as f32 - 0.5);
    let mut uv = 2.0 * (coord / size) - Vec2::ONE;
    uv.x *= size.x / size.y;
    uv
}
