//! # Marchlight Core
//!
//! Signed distance functions for sphere-traced sketches.
//!
//! A scene is a single function from a point to a [`DistanceSample`]: the
//! signed distance to the nearest surface plus a material tag. Scenes are
//! composed from primitives, combinators and domain transforms, either by
//! chaining [`SdfExt`] methods or by folding instances with a
//! [`SceneBuilder`].
//!
//! ## Quick Start
//!
//! ```rust
//! use marchlight_core::prelude::*;
//!
//! // Three tori blended into one surface
//! let knot = torus(0.5, 0.25)
//!     .translate(0.75, 0.0, 0.0)
//!     .smooth_union(torus(0.5, 0.25).translate(-0.75, 0.0, 0.0), 0.8);
//!
//! assert!(knot.distance(Vec3::new(0.25, 0.0, 0.0)) < 0.0);
//! ```
//!
//! ## Units and Conventions
//!
//! - **Angles**: radians
//! - **Precision**: `f32` everywhere, matching the shading-language originals
//! - **Coordinate system**: right-handed, Y-up

pub mod math;
pub mod sdf;

mod error;

pub use error::{Error, Result};
pub use sdf::{DistanceSample, SceneBuilder, Sdf, SdfExt, SdfNode};

/// Prelude module for convenient imports
pub mod prelude {
    // SDF primitives and composition
    pub use crate::sdf::{
        DistanceSample, Sdf, SdfExt, SdfNode, bezier::*, clifford::CliffordTorus, field, from_fn,
        primitives::*,
    };

    // Enum dispatch and instancing
    pub use crate::sdf::scene::{Blend, Instance, Scene, SceneBuilder, Transform};
    pub use crate::sdf::shape::Shape;

    // Math (re-export glam)
    pub use glam::{Quat, Vec2, Vec3, Vec4};

    // Error handling
    pub use crate::{Error, Result};
}
