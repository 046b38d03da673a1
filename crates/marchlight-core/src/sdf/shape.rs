//! Enum dispatch over every primitive
//!
//! Scenes that pick a primitive at run time ("block type 2 is a hex prism")
//! use [`Shape`] instead of comparing integer ids inside the distance
//! function. Shapes serialize, so scene descriptions can live in config files.

use super::Sdf;
use super::bezier::Bezier;
use super::primitives::{
    Box3, CappedCone, CappedCylinder, Capsule, Crystal, CutHollowSphere, HexPrism, Plane,
    RoundBox, Sphere, Torus, TriPrism, VerticalCapsule,
};
use crate::{Error, Result};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// A primitive chosen at run time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
    RoundBox { half_extents: Vec3, radius: f32 },
    Capsule { a: Vec3, b: Vec3, radius: f32 },
    VerticalCapsule { height: f32, radius: f32 },
    Torus { major_radius: f32, minor_radius: f32 },
    CappedCylinder { a: Vec3, b: Vec3, radius: f32 },
    CappedCone { height: f32, bottom_radius: f32, top_radius: f32 },
    HexPrism { radius: f32, half_length: f32 },
    TriPrism { size: Vec2 },
    Plane { normal: Vec3, offset: f32 },
    CutHollowSphere { radius: f32, cut: f32, thickness: f32 },
    Crystal { size: f32 },
    Bezier { a: Vec3, b: Vec3, c: Vec3, radius: f32 },
}

impl Shape {
    /// Build a shape from an integer id and a flat parameter list.
    ///
    /// | id | shape | parameters |
    /// |----|-------|------------|
    /// | 0 | sphere | radius |
    /// | 1 | box | hx hy hz |
    /// | 2 | round box | hx hy hz radius |
    /// | 3 | capsule | ax ay az bx by bz radius |
    /// | 4 | vertical capsule | height radius |
    /// | 5 | torus | major minor |
    /// | 6 | capped cylinder | ax ay az bx by bz radius |
    /// | 7 | capped cone | height bottom top |
    /// | 8 | hex prism | radius half_length |
    /// | 9 | tri prism | size half_length |
    /// | 10 | plane | nx ny nz offset |
    /// | 11 | cut hollow sphere | radius cut thickness |
    /// | 12 | crystal | size |
    /// | 13 | bezier tube | ax ay az bx by bz cx cy cz radius |
    pub fn from_id(id: u32, params: &[f32]) -> Result<Self> {
        let v3 = |i: usize| Vec3::new(params[i], params[i + 1], params[i + 2]);
        let shape = match id {
            0 => {
                arity("sphere", params, 1)?;
                Self::Sphere { radius: params[0] }
            }
            1 => {
                arity("box", params, 3)?;
                Self::Box { half_extents: v3(0) }
            }
            2 => {
                arity("round_box", params, 4)?;
                Self::RoundBox {
                    half_extents: v3(0),
                    radius: params[3],
                }
            }
            3 => {
                arity("capsule", params, 7)?;
                Self::Capsule {
                    a: v3(0),
                    b: v3(3),
                    radius: params[6],
                }
            }
            4 => {
                arity("vertical_capsule", params, 2)?;
                Self::VerticalCapsule {
                    height: params[0],
                    radius: params[1],
                }
            }
            5 => {
                arity("torus", params, 2)?;
                Self::Torus {
                    major_radius: params[0],
                    minor_radius: params[1],
                }
            }
            6 => {
                arity("capped_cylinder", params, 7)?;
                Self::CappedCylinder {
                    a: v3(0),
                    b: v3(3),
                    radius: params[6],
                }
            }
            7 => {
                arity("capped_cone", params, 3)?;
                Self::CappedCone {
                    height: params[0],
                    bottom_radius: params[1],
                    top_radius: params[2],
                }
            }
            8 => {
                arity("hex_prism", params, 2)?;
                Self::HexPrism {
                    radius: params[0],
                    half_length: params[1],
                }
            }
            9 => {
                arity("tri_prism", params, 2)?;
                Self::TriPrism {
                    size: Vec2::new(params[0], params[1]),
                }
            }
            10 => {
                arity("plane", params, 4)?;
                if v3(0).length_squared() == 0.0 {
                    return Err(Error::InvalidParameter("plane normal is zero".into()));
                }
                Self::Plane {
                    normal: v3(0),
                    offset: params[3],
                }
            }
            11 => {
                arity("cut_hollow_sphere", params, 3)?;
                Self::CutHollowSphere {
                    radius: params[0],
                    cut: params[1],
                    thickness: params[2],
                }
            }
            12 => {
                arity("crystal", params, 1)?;
                Self::Crystal { size: params[0] }
            }
            13 => {
                arity("bezier", params, 10)?;
                Self::Bezier {
                    a: v3(0),
                    b: v3(3),
                    c: v3(6),
                    radius: params[9],
                }
            }
            other => return Err(Error::UnknownShape(other)),
        };
        Ok(shape)
    }

    /// Snake-case name, matching the serialized tag
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sphere { .. } => "sphere",
            Self::Box { .. } => "box",
            Self::RoundBox { .. } => "round_box",
            Self::Capsule { .. } => "capsule",
            Self::VerticalCapsule { .. } => "vertical_capsule",
            Self::Torus { .. } => "torus",
            Self::CappedCylinder { .. } => "capped_cylinder",
            Self::CappedCone { .. } => "capped_cone",
            Self::HexPrism { .. } => "hex_prism",
            Self::TriPrism { .. } => "tri_prism",
            Self::Plane { .. } => "plane",
            Self::CutHollowSphere { .. } => "cut_hollow_sphere",
            Self::Crystal { .. } => "crystal",
            Self::Bezier { .. } => "bezier",
        }
    }
}

impl Sdf for Shape {
    fn distance(&self, p: Vec3) -> f32 {
        match *self {
            Self::Sphere { radius } => Sphere::new(radius).distance(p),
            Self::Box { half_extents } => Box3::new(half_extents).distance(p),
            Self::RoundBox {
                half_extents,
                radius,
            } => RoundBox::new(half_extents, radius).distance(p),
            Self::Capsule { a, b, radius } => Capsule::new(a, b, radius).distance(p),
            Self::VerticalCapsule { height, radius } => {
                VerticalCapsule::new(height, radius).distance(p)
            }
            Self::Torus {
                major_radius,
                minor_radius,
            } => Torus::new(major_radius, minor_radius).distance(p),
            Self::CappedCylinder { a, b, radius } => CappedCylinder::new(a, b, radius).distance(p),
            Self::CappedCone {
                height,
                bottom_radius,
                top_radius,
            } => CappedCone::new(height, bottom_radius, top_radius).distance(p),
            Self::HexPrism {
                radius,
                half_length,
            } => HexPrism::new(radius, half_length).distance(p),
            Self::TriPrism { size } => TriPrism::new(size).distance(p),
            Self::Plane { normal, offset } => Plane::new(normal, offset).distance(p),
            Self::CutHollowSphere {
                radius,
                cut,
                thickness,
            } => CutHollowSphere::new(radius, cut, thickness).distance(p),
            Self::Crystal { size } => Crystal::new(size).distance(p),
            Self::Bezier { a, b, c, radius } => Bezier::new(a, b, c, radius).distance(p),
        }
    }
}

fn arity(shape: &'static str, params: &[f32], expected: usize) -> Result<()> {
    if params.len() == expected {
        Ok(())
    } else {
        Err(Error::ShapeArity {
            shape,
            expected,
            got: params.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::primitives::{hex_prism, sphere, torus};
    use approx::assert_relative_eq;

    #[test]
    fn ids_dispatch_to_primitives() {
        let p = Vec3::new(0.3, 0.9, -0.2);

        let s = Shape::from_id(0, &[1.5]).unwrap();
        assert_relative_eq!(s.distance(p), sphere(1.5).distance(p));

        let t = Shape::from_id(5, &[1.0, 0.25]).unwrap();
        assert_relative_eq!(t.distance(p), torus(1.0, 0.25).distance(p));

        let h = Shape::from_id(8, &[0.5, 0.5]).unwrap();
        assert_relative_eq!(h.distance(p), hex_prism(0.5, 0.5).distance(p));
    }

    #[test]
    fn every_id_up_to_thirteen_is_known() {
        let arities = [1, 3, 4, 7, 2, 2, 7, 3, 2, 2, 4, 3, 1, 10];
        for (id, n) in arities.iter().enumerate() {
            let params = vec![0.5; *n];
            let shape = Shape::from_id(id as u32, &params).unwrap();
            assert!(shape.distance(Vec3::splat(0.1)).is_finite(), "{}", shape.name());
        }
    }

    #[test]
    fn unknown_id_is_an_error() {
        assert_eq!(Shape::from_id(42, &[]), Err(Error::UnknownShape(42)));
    }

    #[test]
    fn wrong_parameter_count_is_an_error() {
        assert_eq!(
            Shape::from_id(5, &[1.0]),
            Err(Error::ShapeArity {
                shape: "torus",
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn zero_plane_normal_is_rejected() {
        assert!(matches!(
            Shape::from_id(10, &[0.0, 0.0, 0.0, 1.0]),
            Err(Error::InvalidParameter(_))
        ));
    }
}
