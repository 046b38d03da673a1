//! Frame buffer

use crate::error::{RenderError, Result};
use glam::Vec3;
use image::RgbImage;

/// Row-major RGB pixels in `0..=1`, row 0 at the top
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Vec3>,
}

impl Frame {
    /// A frame filled with one color
    pub fn new(width: u32, height: u32, fill: Vec3) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Vec3] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Vec3] {
        &mut self.pixels
    }

    /// Color at `(x, y)`, or `None` outside the frame
    pub fn pixel(&self, x: u32, y: u32) -> Option<Vec3> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Packed 8-bit RGB, three bytes per pixel
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&c| to_bytes(c)).collect()
    }

    /// Packed 8-bit RGBA with opaque alpha
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&c| {
                let [r, g, b] = to_bytes(c);
                [r, g, b, 255]
            })
            .collect()
    }

    /// Encodable image
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(to_bytes(self.pixel(x, y).unwrap_or(Vec3::ZERO)))
        })
    }
}

fn to_bytes(c: Vec3) -> [u8; 3] {
    let c = (c.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8]
}
