//! Render configuration files
//!
//! A [`RenderConfig`] is a JSON document with the output size, the number of
//! frames in an exported loop, and optional overrides for the sketch's own
//! render settings. Every field has a default, so a file only needs to name
//! what it changes:
//!
//! ```json
//! { "width": 1080, "height": 1080, "march": { "max_steps": 256 } }
//! ```
//!
//! `march` and `shading` are patches: they are merged key by key over the
//! sketch's own settings, so the example above raises the step budget and
//! keeps the sketch's step scale, epsilon and distance.

use crate::sketch::{Result, SketchError};
use anyhow::Context;
use marchlight_render::{Background, NormalMethod, RenderSettings};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Output size, loop length and setting overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Frames in one exported loop
    pub frames: u32,
    /// Loop length in seconds; the sketch's own duration when absent
    pub duration: Option<f32>,

    // Overrides, applied on top of the sketch's settings
    /// Partial `MarchSettings`
    pub march: Option<Value>,
    pub normals: Option<NormalMethod>,
    /// Partial `ShadingParams`
    pub shading: Option<Value>,
    pub background: Option<Background>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            frames: 60,
            duration: None,
            march: None,
            normals: None,
            shading: None,
            background: None,
        }
    }
}

impl RenderConfig {
    /// Read and validate a JSON config file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty-printed JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_frames(mut self, frames: u32) -> Self {
        self.frames = frames;
        self
    }

    /// Patch the sketch's march settings, e.g. `json!({ "max_steps": 256 })`
    pub fn with_march(mut self, patch: Value) -> Self {
        self.march = Some(patch);
        self
    }

    /// Patch the sketch's shading parameters
    pub fn with_shading(mut self, patch: Value) -> Self {
        self.shading = Some(patch);
        self
    }

    /// Check the values a renderer cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SketchError::InvalidConfig(format!(
                "image size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.frames == 0 {
            return Err(SketchError::InvalidConfig(
                "frames must be positive".to_string(),
            ));
        }
        if let Some(duration) = self.duration
            && !(duration.is_finite() && duration > 0.0)
        {
            return Err(SketchError::InvalidConfig(format!(
                "duration must be a positive number of seconds, got {duration}"
            )));
        }
        // patches must at least fit the default settings
        self.apply(RenderSettings::default())?;
        Ok(())
    }

    /// Layer this config over a sketch's settings
    pub fn apply(&self, settings: RenderSettings) -> Result<RenderSettings> {
        Ok(RenderSettings {
            width: self.width,
            height: self.height,
            march: patch("march", settings.march, self.march.as_ref())?,
            normals: self.normals.unwrap_or(settings.normals),
            shading: patch("shading", settings.shading, self.shading.as_ref())?,
            background: self.background.unwrap_or(settings.background),
            environment: settings.environment,
        })
    }
}

/// Merge a JSON patch over the serialized form of `base`
fn patch<T: Serialize + DeserializeOwned>(
    section: &str,
    base: T,
    changes: Option<&Value>,
) -> Result<T> {
    let Some(changes) = changes else {
        return Ok(base);
    };
    let invalid = |e: serde_json::Error| SketchError::InvalidConfig(format!("{section}: {e}"));
    let mut value = serde_json::to_value(&base).map_err(invalid)?;
    merge(&mut value, changes);
    serde_json::from_value(value).map_err(invalid)
}

/// Objects merge key by key; anything else replaces
fn merge(base: &mut Value, changes: &Value) {
    if let (Value::Object(fields), Value::Object(updates)) = (&mut *base, changes)
        && !switches_variant(fields, updates)
    {
        for (key, value) in updates {
            match fields.get_mut(key) {
                Some(slot) => merge(slot, value),
                None => {
                    fields.insert(key.clone(), value.clone());
                }
            }
        }
        return;
    }
    *base = changes.clone();
}

/// An enum variant is a one-key object; naming another variant replaces it
fn switches_variant(fields: &Map<String, Value>, updates: &Map<String, Value>) -> bool {
    fields.len() == 1 && updates.keys().all(|key| !fields.contains_key(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::glass::FoggedGlass;
    use crate::sketch::Sketch;
    use glam::Vec3;
    use marchlight_render::{Gamma, Light, MarchSettings, ShadingModel};
    use serde_json::json;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("marchlight-config-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: RenderConfig =
            serde_json::from_str(r#"{ "width": 1080, "march": { "max_steps": 256 } }"#).unwrap();
        assert_eq!(config.width, 1080);
        assert_eq!(config.height, 512);
        assert_eq!(config.frames, 60);

        let march = config.apply(RenderSettings::default()).unwrap().march;
        assert_eq!(march.max_steps, 256);
        assert_eq!(march.max_distance, MarchSettings::default().max_distance);
    }

    #[test]
    fn test_march_patch_keeps_sketch_values() {
        let sketch = FoggedGlass.settings();
        let config: RenderConfig =
            serde_json::from_str(r#"{ "march": { "max_steps": 256 } }"#).unwrap();
        let merged = config.apply(sketch.clone()).unwrap();
        assert_eq!(merged.march.max_steps, 256);
        assert_eq!(merged.march.step_scale, sketch.march.step_scale);
        assert_eq!(merged.march.max_distance, sketch.march.max_distance);
        assert_eq!(merged.shading, sketch.shading);
    }

    #[test]
    fn test_shading_patch_merges_nested_values() {
        let sketch = FoggedGlass.settings();
        let config = RenderConfig::default().with_shading(json!({
            "model": { "Glow": { "haze": [0.0, 1.0, 0.0] } },
            "gamma": "Sqrt",
        }));
        let merged = config.apply(sketch.clone()).unwrap().shading;
        let (ShadingModel::Glow(before), ShadingModel::Glow(after)) = (sketch.shading.model, merged.model)
        else {
            panic!("glow model lost: {:?}", merged.model);
        };
        assert_eq!(after.haze, Vec3::Y);
        assert_eq!(after.surface_tint, before.surface_tint);
        assert_eq!(merged.gamma, Gamma::Sqrt);
        assert_eq!(merged.light, sketch.shading.light);
    }

    #[test]
    fn test_shading_patch_can_switch_model() {
        let config = RenderConfig::default().with_shading(json!({ "model": "Normals" }));
        let merged = config.apply(FoggedGlass.settings()).unwrap();
        assert_eq!(merged.shading.model, ShadingModel::Normals);

        let config = RenderConfig::default()
            .with_shading(json!({ "light": { "Point": [0.0, 2.0, 0.0] } }));
        let merged = config.apply(FoggedGlass.settings()).unwrap();
        assert_eq!(merged.shading.light, Light::Point(Vec3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn test_bad_patch_is_invalid() {
        let config = RenderConfig::default().with_march(json!({ "max_steps": "lots" }));
        assert!(matches!(config.validate(), Err(SketchError::InvalidConfig(_))));
    }

    #[test]
    fn test_apply_overrides_only_what_is_set() {
        let sketch = RenderSettings {
            background: Background::Solid(Vec3::ONE),
            ..Default::default()
        };
        let config = RenderConfig::default()
            .with_size(64, 32)
            .with_march(json!({ "max_steps": 12 }));
        let merged = config.apply(sketch).unwrap();
        assert_eq!((merged.width, merged.height), (64, 32));
        assert_eq!(merged.march.max_steps, 12);
        assert_eq!(merged.background, Background::Solid(Vec3::ONE));
    }

    #[test]
    fn test_validate() {
        assert!(RenderConfig::default().validate().is_ok());
        assert!(RenderConfig::default().with_size(0, 10).validate().is_err());
        assert!(RenderConfig::default().with_frames(0).validate().is_err());
        let config = RenderConfig {
            duration: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SketchError::InvalidConfig(_))));
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip.json");
        let config = RenderConfig {
            duration: Some(4.0),
            background: Some(Background::Solid(Vec3::new(0.1, 0.2, 0.3))),
            ..RenderConfig::default()
                .with_frames(24)
                .with_march(json!({ "step_scale": 0.5 }))
        };
        config.save(&path).unwrap();
        let loaded = RenderConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_bad_files() {
        assert!(RenderConfig::load(Path::new("/definitely/not/here.json")).is_err());

        let path = temp_path("zero.json");
        std::fs::write(&path, r#"{ "frames": 0 }"#).unwrap();
        let err = RenderConfig::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("frames"));
    }
}
