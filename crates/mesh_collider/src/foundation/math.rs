//! Math utilities and types
//!
//! Provides fundamental math types for collision-shape derivation. Physics
//! engines consume double-precision geometry, so everything here is `f64`.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f64>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f64>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f64>>;

/// Transform representing position, rotation, and scale
///
/// Applies to points as scale, then rotation, then translation.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Per-axis scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with only scale
    #[must_use]
    pub fn from_scale(scale: Vec3) -> Self {
        Self {
            scale,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    #[must_use]
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point (scale, rotate, translate)
    #[must_use]
    pub fn transform_point(&self, point: &Point3) -> Point3 {
        let scaled = self.scale.component_mul(&point.coords);
        Point3::from(self.position + self.rotation * scaled)
    }

    /// Combine this transform with a child transform (parent * child)
    #[must_use]
    pub fn combine(&self, other: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * self.scale.component_mul(&other.position),
            rotation: self.rotation * other.rotation,
            scale: self.scale.component_mul(&other.scale),
        }
    }

    /// Copy of this transform with the rotation reset to identity
    ///
    /// Used when measuring an axis-aligned box that should not inherit the
    /// object's own orientation.
    #[must_use]
    pub fn without_rotation(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: Quat::identity(),
            scale: self.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_transform_identity() {
        let transform = Transform::identity();

        assert_eq!(transform.position, Vec3::zeros());
        assert_relative_eq!(transform.rotation, Quat::identity(), epsilon = EPSILON);
        assert_eq!(transform.scale, Vec3::new(1.0, 1.0, 1.0));

        let point = Point3::new(1.0, 2.0, 3.0);
        assert_relative_eq!(transform.transform_point(&point), point, epsilon = EPSILON);
    }

    #[test]
    fn test_transform_point_applies_scale_then_rotation_then_translation() {
        let transform = Transform {
            position: Vec3::new(10.0, 0.0, 0.0),
            rotation: Quat::from_axis_angle(&Vec3::z_axis(), FRAC_PI_2),
            scale: Vec3::new(2.0, 1.0, 1.0),
        };

        // (1,0,0) -> scaled (2,0,0) -> rotated (0,2,0) -> translated (10,2,0)
        let result = transform.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(result, Point3::new(10.0, 2.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_combine_matches_sequential_application() {
        let parent = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_axis_angle(&Vec3::y_axis(), 0.7),
            scale: Vec3::new(2.0, 2.0, 2.0),
        };
        let child = Transform {
            position: Vec3::new(-4.0, 0.5, 1.0),
            rotation: Quat::from_axis_angle(&Vec3::x_axis(), -0.3),
            scale: Vec3::new(1.5, 1.5, 1.5),
        };

        let combined = parent.combine(&child);
        let point = Point3::new(0.25, -1.0, 2.0);

        let expected = parent.transform_point(&child.transform_point(&point));
        assert_relative_eq!(combined.transform_point(&point), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_without_rotation_keeps_position_and_scale() {
        let transform = Transform {
            position: Vec3::new(5.0, 6.0, 7.0),
            rotation: Quat::from_axis_angle(&Vec3::x_axis(), 1.2),
            scale: Vec3::new(3.0, 2.0, 1.0),
        };

        let unrotated = transform.without_rotation();
        assert_eq!(unrotated.position, transform.position);
        assert_eq!(unrotated.scale, transform.scale);
        assert_relative_eq!(unrotated.rotation, Quat::identity(), epsilon = EPSILON);
    }
}
