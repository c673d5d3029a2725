//! Collision shape descriptors and derivation options
//!
//! The descriptor is the hand-off format to the physics engine: a tagged
//! shape variant plus optional local placement. The engine instantiates its
//! own native shape object from it.

use crate::collision::hull::{ConvexHull, HullError};
use crate::foundation::math::{Point3, Quat, Vec3};
use std::f64::consts::FRAC_PI_2;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while deriving a collision shape
#[derive(Error, Debug)]
pub enum ShapeError {
    /// Explicitly requested shape type is not recognized
    #[error("invalid shape type \"{0}\"")]
    InvalidType(String),
    /// Convex hull construction failed
    #[error("convex hull construction failed: {0}")]
    Hull(#[from] HullError),
}

/// Derivation paths that can be requested explicitly
///
/// When a type is requested, geometry-type inference is bypassed entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    /// Axis-aligned bounding box of the subtree
    Box,
    /// Axis-oriented bounding cylinder of the subtree
    Cylinder,
    /// Bounding sphere of the merged geometry
    Sphere,
    /// Convex hull of the merged geometry
    Hull,
    /// Triangle mesh built from the merged geometry
    Mesh,
}

impl FromStr for ShapeType {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, ShapeError> {
        match s {
            "box" => Ok(Self::Box),
            "cylinder" => Ok(Self::Cylinder),
            "sphere" => Ok(Self::Sphere),
            "hull" => Ok(Self::Hull),
            "mesh" => Ok(Self::Mesh),
            other => Err(ShapeError::InvalidType(other.to_string())),
        }
    }
}

/// Cardinal axis selection for the bounding cylinder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// World x axis
    X,
    /// World y axis (default)
    #[default]
    Y,
    /// World z axis
    Z,
}

impl Axis {
    /// Component of `v` along this axis
    #[must_use]
    pub fn component(self, v: &Vec3) -> f64 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }

    /// Components of `v` along the two remaining axes
    #[must_use]
    pub fn minor_components(self, v: &Vec3) -> (f64, f64) {
        match self {
            Self::X => (v.y, v.z),
            Self::Y => (v.x, v.z),
            Self::Z => (v.x, v.y),
        }
    }

    /// Rotation taking the canonical y-aligned cylinder onto this axis
    #[must_use]
    pub fn cylinder_orientation(self) -> Quat {
        match self {
            Self::X => Quat::identity(),
            Self::Y => Quat::from_axis_angle(&Vec3::x_axis(), FRAC_PI_2),
            Self::Z => Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2),
        }
    }
}

/// Recognized derivation options
#[derive(Debug, Clone, Default)]
pub struct ShapeOptions {
    /// Force a specific derivation path instead of inferring one
    pub shape_type: Option<ShapeType>,
    /// Major axis of the bounding cylinder
    pub cylinder_axis: Axis,
    /// Explicit sphere radius; bypasses geometry inspection entirely
    pub sphere_radius: Option<f64>,
}

/// Simplified collision shape, tagged by kind
#[derive(Debug, Clone)]
pub enum Shape {
    /// Box given by half extents per axis
    Box {
        /// Half extent along each axis
        half_extents: Vec3,
    },
    /// Sphere given by radius
    Sphere {
        /// Sphere radius
        radius: f64,
    },
    /// Cylinder authored along its local y axis
    Cylinder {
        /// Radius at +y
        radius_top: f64,
        /// Radius at -y
        radius_bottom: f64,
        /// Extent along the major axis
        height: f64,
        /// Radial tessellation hint for engines that need one
        num_segments: u32,
        /// Rotation mapping the canonical y-aligned cylinder onto the
        /// requested axis
        orientation: Quat,
    },
    /// Convex hull of the merged geometry
    Hull(ConvexHull),
    /// Raw triangle mesh
    Trimesh {
        /// Vertex positions
        vertices: Vec<Point3>,
        /// Triangle indices, three per face
        indices: Vec<u32>,
    },
}

/// A derived shape plus its placement within the owning body
///
/// Offset and orientation are relative to the requesting object's local
/// frame. The identity case is represented as absent, not identity-valued.
#[derive(Debug, Clone)]
pub struct ShapeDescriptor {
    /// The derived shape
    pub shape: Shape,
    /// Local-frame offset from the object's origin, when non-zero
    pub offset: Option<Vec3>,
    /// Local-frame orientation, when not identity
    pub orientation: Option<Quat>,
}

impl ShapeDescriptor {
    /// Descriptor with no local placement
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            offset: None,
            orientation: None,
        }
    }

    /// Descriptor offset by `offset` when it is non-zero
    #[must_use]
    pub fn with_offset(shape: Shape, offset: Vec3) -> Self {
        Self {
            shape,
            offset: (offset.norm_squared() > 0.0).then_some(offset),
            orientation: None,
        }
    }
}
