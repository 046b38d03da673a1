//! Built-in sketches
//!
//! Each sketch is a small unit struct implementing [`Sketch`]. They are
//! grouped by how they are lit:
//!
//! - [`studio`]: hemispheric ambient plus soft-shadowed sun
//! - [`specular`]: bare Blinn-Phong highlights
//! - [`iridescent`]: spectrum palettes over banded highlights
//! - [`glass`]: refraction and accumulated glow

pub mod glass;
pub mod iridescent;
pub mod specular;
pub mod studio;

use crate::sketch::{Result, Sketch, SketchError};

/// Every built-in sketch, in listing order
pub fn all() -> Vec<Box<dyn Sketch>> {
    vec![
        Box::new(studio::UnitSphere),
        Box::new(studio::HollowSphere),
        Box::new(studio::BoxOnion),
        Box::new(studio::BentBoxes),
        Box::new(specular::LitPrisms),
        Box::new(specular::BezierWindow),
        Box::new(iridescent::IridescentDonut),
        Box::new(iridescent::CliffordTorusShapes),
        Box::new(glass::Crystal),
        Box::new(glass::FoggedGlass),
    ]
}

/// Names of every built-in sketch
pub fn names() -> Vec<&'static str> {
    all().iter().map(|s| s.name()).collect()
}

/// Look up a sketch by name
pub fn find(name: &str) -> Result<Box<dyn Sketch>> {
    all()
        .into_iter()
        .find(|s| s.name() == name)
        .ok_or_else(|| SketchError::UnknownSketch(name.to_string()))
}
