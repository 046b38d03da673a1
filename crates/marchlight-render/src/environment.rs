//! Backgrounds and environment maps
//!
//! A ray that misses the scene takes its color from the [`Background`].
//! Reflections and refractions look up the same background, so a scene lit
//! by a cube map shows that map in its glass as well.

use crate::error::{RenderError, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// What a ray sees when it leaves the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Background {
    /// One flat color
    Solid(Vec3),
    /// Vertical gradient from `bottom` (looking down) to `top` (looking up)
    Sky { bottom: Vec3, top: Vec3 },
    /// Look up the cube map along the ray; black when none is loaded
    Environment,
}

impl Default for Background {
    fn default() -> Self {
        Self::Solid(Vec3::ZERO)
    }
}

impl Background {
    /// Color seen along `direction`
    pub fn color(&self, direction: Vec3, environment: Option<&CubeMap>) -> Vec3 {
        match *self {
            Self::Solid(color) => color,
            Self::Sky { bottom, top } => bottom.lerp(top, direction.y.clamp(-1.0, 1.0) * 0.5 + 0.5),
            Self::Environment => environment.map_or(Vec3::ZERO, |map| map.sample(direction)),
        }
    }
}

/// Face order of a [`CubeMap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [Self; 6] = [
        Self::PositiveX,
        Self::NegativeX,
        Self::PositiveY,
        Self::NegativeY,
        Self::PositiveZ,
        Self::NegativeZ,
    ];

    /// Conventional file stem, `posx` .. `negz`
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::PositiveX => "posx",
            Self::NegativeX => "negx",
            Self::PositiveY => "posy",
            Self::NegativeY => "negy",
            Self::PositiveZ => "posz",
            Self::NegativeZ => "negz",
        }
    }
}

/// One decoded square face, row-major from the top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct FaceImage {
    pub size: u32,
    pub pixels: Vec<Vec3>,
}

impl FaceImage {
    /// Wrap 8-bit RGB data
    pub fn from_rgb8(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        if width != height {
            return Err(RenderError::InvalidCubeMap(format!(
                "face is {width}x{height}, faces must be square"
            )));
        }
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(RenderError::BufferSize {
                expected,
                got: data.len(),
            });
        }
        let pixels = data
            .chunks_exact(3)
            .map(|rgb| Vec3::new(rgb[0] as f32, rgb[1] as f32, rgb[2] as f32) / 255.0)
            .collect();
        Ok(Self {
            size: width,
            pixels,
        })
    }

    /// A face of one color, mostly for tests
    pub fn solid(size: u32, color: Vec3) -> Self {
        Self {
            size,
            pixels: vec![color; size as usize * size as usize],
        }
    }

    fn texel(&self, u: f32, v: f32) -> Vec3 {
        let last = self.size.saturating_sub(1);
        let x = ((u * self.size as f32) as u32).min(last);
        let y = ((v * self.size as f32) as u32).min(last);
        self.pixels[(y * self.size + x) as usize]
    }
}

/// Six faces in [`CubeFace::ALL`] order, nearest-texel lookup
#[derive(Debug, Clone, PartialEq)]
pub struct CubeMap {
    faces: Vec<FaceImage>,
}

impl CubeMap {
    /// Validate and assemble six faces
    pub fn new(faces: Vec<FaceImage>) -> Result<Self> {
        if faces.len() != 6 {
            return Err(RenderError::InvalidCubeMap(format!(
                "expected 6 faces, got {}",
                faces.len()
            )));
        }
        let size = faces[0].size;
        if size == 0 {
            return Err(RenderError::InvalidCubeMap("faces are empty".into()));
        }
        for (face, image) in CubeFace::ALL.iter().zip(&faces) {
            if image.size != size {
                return Err(RenderError::InvalidCubeMap(format!(
                    "face {} is {} pixels, expected {size}",
                    face.file_stem(),
                    image.size
                )));
            }
            let expected = size as usize * size as usize;
            if image.pixels.len() != expected {
                return Err(RenderError::BufferSize {
                    expected,
                    got: image.pixels.len(),
                });
            }
        }
        Ok(Self { faces })
    }

    pub fn face_size(&self) -> u32 {
        self.faces[0].size
    }

    /// Color along `direction`
    pub fn sample(&self, direction: Vec3) -> Vec3 {
        let a = direction.abs();
        let (face, sc, tc, ma) = if a.x >= a.y && a.x >= a.z {
            if direction.x > 0.0 {
                (CubeFace::PositiveX, -direction.z, -direction.y, a.x)
            } else {
                (CubeFace::NegativeX, direction.z, -direction.y, a.x)
            }
        } else if a.y >= a.z {
            if direction.y > 0.0 {
                (CubeFace::PositiveY, direction.x, direction.z, a.y)
            } else {
                (CubeFace::NegativeY, direction.x, -direction.z, a.y)
            }
        } else if direction.z > 0.0 {
            (CubeFace::PositiveZ, direction.x, -direction.y, a.z)
        } else {
            (CubeFace::NegativeZ, -direction.x, -direction.y, a.z)
        };
        if ma <= 0.0 || !ma.is_finite() {
            return Vec3::ZERO;
        }
        let u = (sc / ma + 1.0) * 0.5;
        let v = (tc / ma + 1.0) * 0.5;
        self.faces[face as usize].texel(u, v)
    }
}
