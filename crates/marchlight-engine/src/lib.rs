//! Marchlight Engine - sketch orchestration, timing and export
//!
//! The Engine is a thin orchestration layer over `marchlight-render`: it
//! holds one [`Sketch`] and a [`RenderConfig`], turns frame numbers into
//! [`FrameTime`]s, and writes the results as PNG files.
//!
//! ## Example
//!
//! ```rust,no_run
//! use marchlight_engine::{Engine, RenderConfig};
//!
//! let engine = Engine::from_name("iridescent-donut")?
//!     .with_config(RenderConfig::default().with_size(256, 256).with_frames(30));
//!
//! // One still, three seconds in
//! engine.export_png("donut.png".as_ref(), 3.0)?;
//!
//! // The whole loop as frame-0000.png, frame-0001.png, ...
//! engine.export_sequence("donut-frames".as_ref())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod export;
pub mod gallery;
pub mod sketch;

use anyhow::Result;
use glam::Vec3;
use marchlight_render::{Background, CubeMap, Frame, render};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

// Re-export commonly used types from dependencies
pub use marchlight_core::SdfNode;
pub use marchlight_render::{CameraPose, FrameTime, RenderSettings};

// Re-export our own types
pub use config::RenderConfig;
pub use export::ExportResult;
pub use sketch::{Sketch, SketchError};

/// Sky used in place of an environment map that was never loaded
const FALLBACK_SKY: Background = Background::Sky {
    bottom: Vec3::new(0.05, 0.05, 0.08),
    top: Vec3::new(0.75, 0.8, 0.9),
};

/// The main Marchlight engine
///
/// Provides a unified interface for:
/// - Frame timing over the sketch's loop
/// - Layering a render config over the sketch's settings
/// - Rendering single frames
/// - PNG and frame-sequence export
pub struct Engine {
    /// The sketch being rendered
    sketch: Box<dyn Sketch>,

    /// Output size, loop length and overrides
    config: RenderConfig,

    /// Decoded cube map for sketches with an environment background
    environment: Option<Arc<CubeMap>>,
}

impl Engine {
    /// Create an engine for a sketch with the default config
    pub fn new(sketch: Box<dyn Sketch>) -> Self {
        Self {
            sketch,
            config: RenderConfig::default(),
            environment: None,
        }
    }

    /// Create an engine for a gallery sketch
    pub fn from_name(name: &str) -> Result<Self> {
        Ok(Self::new(gallery::find(name)?))
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_environment(mut self, environment: CubeMap) -> Self {
        self.set_environment(environment);
        self
    }

    // ========================================================================
    // Access
    // ========================================================================

    pub fn sketch(&self) -> &dyn Sketch {
        self.sketch.as_ref()
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }

    pub fn set_environment(&mut self, environment: CubeMap) {
        self.environment = Some(Arc::new(environment));
    }

    pub fn has_environment(&self) -> bool {
        self.environment.is_some()
    }

    // ========================================================================
    // Timing
    // ========================================================================

    /// Loop length: the config's override or the sketch's own
    pub fn duration(&self) -> f32 {
        self.config.duration.unwrap_or_else(|| self.sketch.duration())
    }

    /// Clock for frame `frame` of the exported loop
    pub fn frame_time(&self, frame: u32) -> FrameTime {
        FrameTime::looping(frame, self.config.frames, self.duration())
    }

    /// Clock at `seconds` into the loop
    pub fn time_at(&self, seconds: f32) -> FrameTime {
        FrameTime::at(seconds, self.duration())
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Effective settings: sketch settings, config overrides, environment map
    pub fn settings(&self) -> Result<RenderSettings> {
        let mut settings = self.config.apply(self.sketch.settings())?;
        settings.environment = self.environment.clone();

        if settings.background == Background::Environment && settings.environment.is_none() {
            warn!(
                sketch = self.sketch.name(),
                "no environment map loaded, using a plain sky"
            );
            settings.background = FALLBACK_SKY;
        }
        Ok(settings)
    }

    /// Render the sketch at an arbitrary clock
    pub fn render_at(&self, time: FrameTime) -> Result<Frame> {
        self.config.validate()?;
        let settings = self.settings()?;
        let camera = self.sketch.camera(time);
        debug!(sketch = self.sketch.name(), time = time.time, playhead = time.playhead, "rendering");

        let frame = render(
            self.config.width,
            self.config.height,
            &camera,
            |t| self.sketch.scene(t),
            &settings,
            time,
        )?;
        Ok(frame)
    }

    /// Render frame `frame` of the exported loop
    pub fn render_frame(&self, frame: u32) -> Result<Frame> {
        self.render_at(self.frame_time(frame))
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Render the frame at `seconds` and write it as a PNG
    pub fn export_png(&self, path: &Path, seconds: f32) -> Result<ExportResult> {
        let frame = self.render_at(self.time_at(seconds))?;
        export::export_png(&frame, path)
    }

    /// Render every frame of the loop into `dir`
    pub fn export_sequence(&self, dir: &Path) -> Result<ExportResult> {
        self.config.validate()?;
        export::export_sequence(dir, self.config.frames, |i| self.render_frame(i))
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("sketch", &self.sketch.name())
            .field("config", &self.config)
            .field("environment", &self.environment.is_some())
            .finish()
    }
}
