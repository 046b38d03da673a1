//! Sketch definition for the Marchlight engine
//!
//! A sketch is an animated scene: for every point in its loop it produces a
//! scene function and a camera pose, and it carries the render settings
//! (march budget, shading model, background) it was designed with.

use marchlight_core::SdfNode;
use marchlight_render::{CameraPose, FrameTime, RenderSettings};
use thiserror::Error;

/// Errors that can occur when looking up or configuring sketches
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SketchError {
    /// No gallery sketch has this name
    #[error("Unknown sketch '{0}' (run `marchlight list` for the gallery)")]
    UnknownSketch(String),

    /// A render configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for sketch lookup and configuration
pub type Result<T> = std::result::Result<T, SketchError>;

/// An animated scene with its camera and render settings
///
/// Implementations are plain descriptions: building a scene must not touch
/// the filesystem or any global state, so the same [`FrameTime`] always
/// yields the same picture.
pub trait Sketch: Send + Sync {
    /// Gallery name, lowercase and hyphenated
    fn name(&self) -> &'static str;

    /// One-line description for listings
    fn description(&self) -> &'static str;

    /// Scene function at `time`
    fn scene(&self, time: FrameTime) -> SdfNode;

    /// Camera pose at `time`
    fn camera(&self, time: FrameTime) -> CameraPose;

    /// Settings the sketch is meant to be rendered with
    fn settings(&self) -> RenderSettings {
        RenderSettings::default()
    }

    /// Length of one animation loop in seconds
    fn duration(&self) -> f32 {
        10.0
    }
}

impl std::fmt::Debug for dyn Sketch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sketch")
            .field("name", &self.name())
            .field("duration", &self.duration())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use marchlight_core::prelude::*;

    struct Still;

    impl Sketch for Still {
        fn name(&self) -> &'static str {
            "still"
        }

        fn description(&self) -> &'static str {
            "A sphere that never moves"
        }

        fn scene(&self, _time: FrameTime) -> SdfNode {
            SdfNode::new(sphere(1.0))
        }

        fn camera(&self, _time: FrameTime) -> CameraPose {
            CameraPose::look_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO)
        }
    }

    #[test]
    fn test_default_settings_and_duration() {
        let sketch = Still;
        assert_eq!(sketch.duration(), 10.0);
        assert_eq!(sketch.settings().width, RenderSettings::default().width);
    }

    #[test]
    fn test_debug_names_the_sketch() {
        let sketch: Box<dyn Sketch> = Box::new(Still);
        assert!(format!("{sketch:?}").contains("still"));
    }

    #[test]
    fn test_error_messages() {
        let err = SketchError::UnknownSketch("nope".to_string());
        assert!(err.to_string().contains("'nope'"));
        let err = SketchError::InvalidConfig("frames must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: frames must be positive");
    }
}
