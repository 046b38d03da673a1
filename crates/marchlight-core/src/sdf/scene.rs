//! Scene assembly from transformed instances
//!
//! Sketches that lay a shape out on a grid, each copy with its own rotation
//! or bend, describe every copy as an [`Instance`] and let [`SceneBuilder`]
//! fold them into one [`Scene`].
//!
//! ```rust
//! use marchlight_core::prelude::*;
//!
//! let scene = SceneBuilder::new()
//!     .blend(Blend::Smooth(0.1))
//!     .add(Transform::Translate(Vec3::X), sphere(0.5), 1.0)
//!     .add(Transform::Translate(-Vec3::X), sphere(0.5), 2.0)
//!     .build();
//!
//! assert_eq!(scene.len(), 2);
//! assert!(scene.distance(Vec3::X) < 0.0);
//! ```

use super::transforms::{bend_point, twist_point, warp_distance_scale};
use super::{DistanceSample, Sdf, SdfNode};
use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// How instances are combined
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Blend {
    /// Hard union, keeps the closest instance's material
    #[default]
    Union,
    /// Polynomial smooth union with the given radius
    Smooth(f32),
}

/// Point-space transform applied before evaluating an instance's shape.
///
/// Each variant moves the *shape*; evaluating it maps the query point the
/// opposite way. `Then` applies its entries to the query point in order.
/// `Bend` and `Twist` carry the factor that keeps their output a distance
/// bound; build them with [`Transform::bend`] and [`Transform::twist`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Transform {
    Translate(Vec3),
    Rotate(Quat),
    Scale(f32),
    Bend { amount: f32, distance_scale: f32 },
    Twist { amount: f32, distance_scale: f32 },
    Then(Vec<Transform>),
}

impl Default for Transform {
    fn default() -> Self {
        Self::Translate(Vec3::ZERO)
    }
}

impl Transform {
    /// Rotation about `axis` by `angle` radians; a zero axis is the identity
    pub fn axis_angle(axis: Vec3, angle: f32) -> Self {
        Self::Rotate(
            axis.try_normalize()
                .map_or(Quat::IDENTITY, |axis| Quat::from_axis_angle(axis, angle)),
        )
    }

    /// Bend by `amount` for a shape reaching `extent` from the Z axis
    pub fn bend(amount: f32, extent: f32) -> Self {
        Self::Bend {
            amount,
            distance_scale: warp_distance_scale(amount, extent),
        }
    }

    /// Twist by `amount` for a shape reaching `extent` from the Y axis
    pub fn twist(amount: f32, extent: f32) -> Self {
        Self::Twist {
            amount,
            distance_scale: warp_distance_scale(amount, extent),
        }
    }

    /// Map a world-space point into the shape's local frame.
    ///
    /// Returns the local point and the factor that converts local distances
    /// back to world distances.
    pub fn apply(&self, p: Vec3) -> (Vec3, f32) {
        match self {
            Self::Translate(offset) => (p - *offset, 1.0),
            Self::Rotate(q) => (q.inverse() * p, 1.0),
            Self::Scale(s) => {
                let s = s.max(f32::EPSILON);
                (p / s, s)
            }
            Self::Bend {
                amount,
                distance_scale,
            } => (bend_point(p, *amount), *distance_scale),
            Self::Twist {
                amount,
                distance_scale,
            } => (twist_point(p, *amount), *distance_scale),
            Self::Then(steps) => steps.iter().fold((p, 1.0), |(p, scale), step| {
                let (q, s) = step.apply(p);
                (q, scale * s)
            }),
        }
    }

    /// Append another transform after this one
    pub fn then(self, next: Transform) -> Self {
        match self {
            Self::Then(mut steps) => {
                steps.push(next);
                Self::Then(steps)
            }
            first => Self::Then(vec![first, next]),
        }
    }
}

/// One placed copy of a shape
#[derive(Debug, Clone)]
pub struct Instance {
    pub transform: Transform,
    pub shape: SdfNode,
    pub material: f32,
}

impl Instance {
    pub fn sample(&self, p: Vec3) -> DistanceSample {
        let (local, scale) = self.transform.apply(p);
        DistanceSample::new(self.shape.distance(local) * scale, self.material)
    }
}

/// A folded list of instances; itself an SDF
#[derive(Debug, Clone, Default)]
pub struct Scene {
    instances: Vec<Instance>,
    blend: Blend,
}

impl Scene {
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl Sdf for Scene {
    fn distance(&self, p: Vec3) -> f32 {
        self.sample(p).distance
    }

    fn sample(&self, p: Vec3) -> DistanceSample {
        let mut samples = self.instances.iter().map(|i| i.sample(p));
        let Some(first) = samples.next() else {
            return DistanceSample::MISS;
        };
        samples.fold(first, |acc, s| match self.blend {
            Blend::Union => acc.union(s),
            Blend::Smooth(k) => acc.smooth_union(s, k),
        })
    }
}

/// Builder that collects instances and folds them into a [`Scene`]
#[derive(Debug, Clone, Default)]
pub struct SceneBuilder {
    instances: Vec<Instance>,
    blend: Blend,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blend(mut self, blend: Blend) -> Self {
        self.blend = blend;
        self
    }

    pub fn add<S: Sdf + 'static>(mut self, transform: Transform, shape: S, material: f32) -> Self {
        self.instances.push(Instance {
            transform,
            shape: SdfNode::new(shape),
            material,
        });
        self
    }

    /// Add a centred `columns x rows` grid in the XY plane.
    ///
    /// `cell(x, y)` returns the per-instance transform (applied after the
    /// grid offset), shape and material. Indices run from zero.
    pub fn grid<S, F>(mut self, columns: u32, rows: u32, spacing: Vec2, mut cell: F) -> Self
    where
        S: Sdf + 'static,
        F: FnMut(u32, u32) -> (Transform, S, f32),
    {
        let centre = Vec2::new(columns.saturating_sub(1) as f32, rows.saturating_sub(1) as f32) * 0.5;
        for y in 0..rows {
            for x in 0..columns {
                let offset = (Vec2::new(x as f32, y as f32) - centre) * spacing;
                let (transform, shape, material) = cell(x, y);
                self = self.add(
                    Transform::Translate(offset.extend(0.0)).then(transform),
                    shape,
                    material,
                );
            }
        }
        self
    }

    pub fn build(self) -> Scene {
        Scene {
            instances: self.instances,
            blend: self.blend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::sample_points;
    use crate::sdf::primitives::{box3, rounded_box, sphere};
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn empty_scene_misses_everywhere() {
        let scene = SceneBuilder::new().build();
        assert!(scene.is_empty());
        assert_eq!(scene.distance(Vec3::ZERO), f32::MAX);
    }

    #[test]
    fn union_keeps_closest_material() {
        let scene = SceneBuilder::new()
            .add(Transform::Translate(Vec3::X * 2.0), sphere(0.5), 1.0)
            .add(Transform::Translate(-Vec3::X * 2.0), sphere(0.5), 2.0)
            .build();
        let right = scene.sample(Vec3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(right.distance, -0.5);
        assert_relative_eq!(right.material, 1.0);
        assert_relative_eq!(scene.sample(Vec3::new(-1.0, 0.0, 0.0)).material, 2.0);
    }

    #[test]
    fn smooth_blend_fills_the_gap() {
        let hard = SceneBuilder::new()
            .add(Transform::Translate(Vec3::X * 0.6), sphere(0.5), 0.0)
            .add(Transform::Translate(-Vec3::X * 0.6), sphere(0.5), 0.0)
            .build();
        let soft = SceneBuilder::new()
            .blend(Blend::Smooth(0.3))
            .add(Transform::Translate(Vec3::X * 0.6), sphere(0.5), 0.0)
            .add(Transform::Translate(-Vec3::X * 0.6), sphere(0.5), 0.0)
            .build();
        let gap = Vec3::new(0.0, 0.45, 0.0);
        assert!(soft.distance(gap) < hard.distance(gap));
    }

    #[test]
    fn rotation_moves_the_shape() {
        let scene = SceneBuilder::new()
            .add(
                Transform::Rotate(Quat::from_rotation_z(FRAC_PI_2)),
                box3(Vec3::new(1.0, 0.1, 0.1)),
                0.0,
            )
            .build();
        assert!(scene.distance(Vec3::new(0.0, 0.9, 0.0)) < 0.0);
        assert!(scene.distance(Vec3::new(0.9, 0.0, 0.0)) > 0.0);
    }

    #[test]
    fn scale_rescales_distance() {
        let (local, s) = Transform::Scale(2.0).apply(Vec3::new(4.0, 0.0, 0.0));
        assert_relative_eq!(local.x, 2.0);
        assert_relative_eq!(s, 2.0);
    }

    #[test]
    fn chained_transforms_apply_in_order() {
        // move right, then turn a quarter about z
        let t = Transform::Translate(Vec3::X).then(Transform::Rotate(Quat::from_rotation_z(FRAC_PI_2)));
        let (local, _) = t.apply(Vec3::new(1.0, 1.0, 0.0));
        // (1,1) - (1,0) = (0,1), rotated back by a quarter turn = (1,0)
        assert_relative_eq!(local.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(local.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn grid_is_centred() {
        let scene = SceneBuilder::new()
            .grid(7, 3, Vec2::new(0.5, 0.25), |x, y| {
                (Transform::default(), sphere(0.05), (x + y * 7) as f32)
            })
            .build();
        assert_eq!(scene.len(), 21);
        // corners at (+-1.5, +-0.25)
        assert_relative_eq!(scene.distance(Vec3::new(-1.5, -0.25, 0.0)), -0.05, epsilon = 1e-6);
        assert_relative_eq!(scene.sample(Vec3::new(1.5, 0.25, 0.0)).material, 20.0);
        assert_relative_eq!(scene.sample(Vec3::ZERO).material, 10.0);
    }

    /// Largest central-difference slope of `scene` over points within `half` of the origin
    fn max_gradient(scene: &Scene, half: f32) -> f32 {
        let h = 1e-3;
        sample_points(4000, half)
            .map(|p| {
                let g = Vec3::new(
                    scene.distance(p + Vec3::X * h) - scene.distance(p - Vec3::X * h),
                    scene.distance(p + Vec3::Y * h) - scene.distance(p - Vec3::Y * h),
                    scene.distance(p + Vec3::Z * h) - scene.distance(p - Vec3::Z * h),
                );
                g.length() / (2.0 * h)
            })
            .fold(0.0, f32::max)
    }

    #[test]
    fn bent_instances_stay_distance_bounds() {
        // every sample lies within sqrt(2) of the bend axis
        let extent = 2.0f32.sqrt();
        let plate = || rounded_box(Vec3::new(0.8, 0.05, 0.5), 0.02);
        for amount in [0.5, 2.0, -3.0] {
            let scene = SceneBuilder::new()
                .add(Transform::bend(amount, extent), plate(), 0.0)
                .build();
            let slope = max_gradient(&scene, 1.0);
            assert!(slope <= 1.01, "bend {amount} has slope {slope}");
        }
    }

    #[test]
    fn twisted_instances_stay_distance_bounds() {
        let extent = 2.0f32.sqrt();
        let scene = SceneBuilder::new()
            .add(Transform::twist(2.5, extent), box3(Vec3::new(0.6, 1.0, 0.2)), 0.0)
            .build();
        let slope = max_gradient(&scene, 1.0);
        assert!(slope <= 1.01, "twist has slope {slope}");
    }

    #[test]
    fn warp_scale_folds_into_chains() {
        let t = Transform::Translate(Vec3::X).then(Transform::bend(2.0, 0.5));
        let (_, scale) = t.apply(Vec3::ONE);
        assert_relative_eq!(scale, 0.5);
    }

    #[test]
    fn axis_angle_with_zero_axis_is_identity() {
        let (p, _) = Transform::axis_angle(Vec3::ZERO, 1.0).apply(Vec3::ONE);
        assert_relative_eq!(p.x, 1.0);
        assert_relative_eq!(p.y, 1.0);
    }
}
