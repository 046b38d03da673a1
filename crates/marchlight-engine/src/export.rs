//! Image export for the Marchlight engine
//!
//! Frames are written as 8-bit RGB PNG files. A sequence is one file per
//! frame, named `frame-0000.png`, `frame-0001.png`, … so the loop can be fed
//! straight to a video encoder.

use anyhow::{Context, Result};
use marchlight_render::Frame;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of frame `index` in an exported sequence
pub fn sequence_file_name(index: u32) -> String {
    format!("frame-{index:04}.png")
}

/// Result of a successful export operation
#[derive(Debug, Clone, PartialEq)]
pub struct ExportResult {
    /// Directory or file that was written
    pub path: PathBuf,

    /// Number of PNG files written
    pub frames: u32,

    /// Size of each image
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for ExportResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.frames == 1 {
            write!(
                f,
                "Exported {} ({}x{})",
                self.path.display(),
                self.width,
                self.height
            )
        } else {
            write!(
                f,
                "Exported {} frames to {} ({}x{})",
                self.frames,
                self.path.display(),
                self.width,
                self.height
            )
        }
    }
}

/// Write one frame as a PNG, adding the extension if the path has none
pub fn export_png(frame: &Frame, path: &Path) -> Result<ExportResult> {
    let mut output_path = path.to_path_buf();
    if output_path.extension().is_none() {
        output_path.set_extension("png");
    }

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    frame
        .to_image()
        .save_with_format(&output_path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    info!(path = %output_path.display(), width = frame.width(), height = frame.height(), "wrote frame");

    Ok(ExportResult {
        path: output_path,
        frames: 1,
        width: frame.width(),
        height: frame.height(),
    })
}

/// Render `frames` frames with `render_frame` and write them into `dir`
pub fn export_sequence<F>(dir: &Path, frames: u32, mut render_frame: F) -> Result<ExportResult>
where
    F: FnMut(u32) -> Result<Frame>,
{
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut size = (0, 0);
    for index in 0..frames {
        let frame = render_frame(index).with_context(|| format!("Failed to render frame {index}"))?;
        size = (frame.width(), frame.height());

        let path = dir.join(sequence_file_name(index));
        frame
            .to_image()
            .save_with_format(&path, image::ImageFormat::Png)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    info!(dir = %dir.display(), frames, "wrote sequence");

    Ok(ExportResult {
        path: dir.to_path_buf(),
        frames,
        width: size.0,
        height: size.1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("marchlight-export-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_sequence_file_names() {
        assert_eq!(sequence_file_name(0), "frame-0000.png");
        assert_eq!(sequence_file_name(42), "frame-0042.png");
        assert_eq!(sequence_file_name(12345), "frame-12345.png");
    }

    #[test]
    fn test_export_png_adds_extension() {
        let dir = temp_dir("single");
        let frame = Frame::new(4, 3, Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let result = export_png(&frame, &dir.join("still")).unwrap();

        assert_eq!(result.path, dir.join("still.png"));
        let decoded = image::open(&result.path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.get_pixel(2, 1).0, [255, 0, 0]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_export_sequence_writes_every_frame() {
        let dir = temp_dir("sequence");
        let result = export_sequence(&dir, 3, |i| {
            Ok(Frame::new(2, 2, Vec3::splat(i as f32 * 0.5))?)
        })
        .unwrap();

        assert_eq!(result.frames, 3);
        assert_eq!((result.width, result.height), (2, 2));
        for i in 0..3 {
            assert!(dir.join(sequence_file_name(i)).exists());
        }
        assert!(result.to_string().contains("3 frames"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_export_sequence_stops_on_error() {
        let dir = temp_dir("failing");
        let result = export_sequence(&dir, 3, |i| {
            if i == 1 {
                anyhow::bail!("boom");
            }
            Ok(Frame::new(2, 2, Vec3::ZERO)?)
        });
        assert!(result.is_err());
        assert!(!dir.join(sequence_file_name(2)).exists());
        std::fs::remove_dir_all(&dir).ok();
    }
}
