//! Bounding primitive computation
//!
//! Axis-aligned boxes, bounding spheres, and axis-oriented bounding
//! cylinders over point sets and subtree footprints. Each operation is a
//! pure function of its input; degenerate or non-finite geometry yields
//! `None` rather than an error ("no shape").

use crate::collision::shape::Axis;
use crate::foundation::math::{Point3, Quat, Transform, Vec3};
use crate::scene::MeshNode;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    /// Minimum corner
    pub min: Point3,
    /// Maximum corner
    pub max: Point3,
}

impl Aabb {
    /// Tight box around a point set
    ///
    /// Returns `None` for an empty set or when any coordinate is non-finite.
    #[must_use]
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut aabb = Self {
            min: *first,
            max: *first,
        };
        for point in rest {
            aabb.extend(point);
        }
        aabb.is_finite().then_some(aabb)
    }

    /// Grow the box to contain `point`
    pub fn extend(&mut self, point: &Point3) {
        self.min = self.min.coords.inf(&point.coords).into();
        self.max = self.max.coords.sup(&point.coords).into();
    }

    /// Whether both corners are finite
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.min.coords.iter().all(|c| c.is_finite())
            && self.max.coords.iter().all(|c| c.is_finite())
    }

    /// Center of the box
    #[must_use]
    pub fn center(&self) -> Point3 {
        Point3::from((self.min.coords + self.max.coords) * 0.5)
    }

    /// Half-size of the box per axis
    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Full size of the box per axis
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Bounding sphere of a point set
#[derive(Debug, Clone, Copy)]
pub struct BoundingSphere {
    /// Sphere center
    pub center: Point3,
    /// Sphere radius
    pub radius: f64,
}

/// Axis-oriented bounding cylinder of a subtree
#[derive(Debug, Clone, Copy)]
pub struct BoundingCylinder {
    /// Radius (top and bottom are equal for a bounding cylinder)
    pub radius: f64,
    /// Extent along the major axis
    pub height: f64,
    /// Rotation taking the canonical y-aligned cylinder onto the major axis
    pub orientation: Quat,
}

/// Axis-aligned box measured over a subtree with the root's rotation
/// neutralized
#[derive(Debug, Clone, Copy)]
pub struct SubtreeBox {
    /// Half extent per axis
    pub half_extents: Vec3,
    /// Local-frame vector from the root's origin to the box center
    pub offset: Vec3,
}

/// World-space AABB of every vertex under `root`, with `base` replacing the
/// root's own transform
#[must_use]
pub fn subtree_aabb(root: &MeshNode, base: &Transform) -> Option<Aabb> {
    let mut aabb: Option<Aabb> = None;
    root.for_each_geometry(base, |geometry, transform| {
        for position in &geometry.positions {
            let point = transform.transform_point(position);
            match aabb {
                Some(ref mut aabb) => aabb.extend(&point),
                None => {
                    aabb = Some(Aabb {
                        min: point,
                        max: point,
                    });
                }
            }
        }
    });
    aabb.filter(Aabb::is_finite)
}

/// Axis-aligned box sized to the unrotated subtree, offset to recentre it
///
/// The root's local rotation is reset to identity (scale and translation
/// retained) before measuring, so ancestor-applied rotation cannot skew the
/// box. The offset is reported in the root's local frame.
#[must_use]
pub fn bounding_box_of_subtree(root: &MeshNode) -> Option<SubtreeBox> {
    let base = root.transform.without_rotation();
    let aabb = subtree_aabb(root, &base)?;
    Some(SubtreeBox {
        half_extents: aabb.half_extents(),
        offset: aabb.center().coords - root.transform.position,
    })
}

/// Bounding sphere of a point set
///
/// Policy: the center is the bounding-box center, not the centroid; the
/// radius is the max distance from that center to any point.
#[must_use]
pub fn bounding_sphere(points: &[Point3]) -> Option<BoundingSphere> {
    let center = Aabb::from_points(points)?.center();
    let radius = points
        .iter()
        .map(|p| (p - center).norm())
        .fold(0.0, f64::max);
    Some(BoundingSphere { center, radius })
}

/// Axis-oriented bounding cylinder of the full subtree footprint
///
/// Height is the AABB extent along the major axis; radius is half the
/// larger of the two remaining extents. The root's rotation is retained
/// here, unlike [`bounding_box_of_subtree`].
#[must_use]
pub fn bounding_cylinder(root: &MeshNode, axis: Axis) -> Option<BoundingCylinder> {
    let aabb = subtree_aabb(root, &root.transform)?;
    let size = aabb.size();
    let (minor_a, minor_b) = axis.minor_components(&size);
    Some(BoundingCylinder {
        radius: 0.5 * minor_a.max(minor_b),
        height: axis.component(&size),
        orientation: axis.cylinder_orientation(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Geometry;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn cube_node() -> MeshNode {
        MeshNode::with_geometry(Transform::identity(), Geometry::cuboid(10.0, 10.0, 10.0))
    }

    #[test]
    fn test_aabb_from_points() {
        let points = [
            Point3::new(-1.0, 2.0, 0.5),
            Point3::new(3.0, -4.0, 0.0),
            Point3::new(0.0, 0.0, -2.0),
        ];
        let aabb = Aabb::from_points(&points).unwrap();
        assert_relative_eq!(aabb.min, Point3::new(-1.0, -4.0, -2.0), epsilon = 1e-12);
        assert_relative_eq!(aabb.max, Point3::new(3.0, 2.0, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn test_aabb_rejects_empty_and_non_finite() {
        assert!(Aabb::from_points(&[]).is_none());
        assert!(Aabb::from_points(&[Point3::new(f64::NAN, 0.0, 0.0)]).is_none());
        assert!(Aabb::from_points(&[Point3::new(0.0, f64::INFINITY, 0.0)]).is_none());
    }

    #[test]
    fn test_cube_bounding_box() {
        let shape = bounding_box_of_subtree(&cube_node()).unwrap();
        assert_relative_eq!(shape.half_extents, Vec3::new(5.0, 5.0, 5.0), epsilon = 1e-12);
        assert_relative_eq!(shape.offset, Vec3::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn test_bounding_box_offset_excludes_root_translation() {
        // Child geometry baked at (0,50,0), root sitting at (100,0,0): the
        // offset is local-frame only.
        let mut root = MeshNode::new(Transform::from_position(Vec3::new(100.0, 0.0, 0.0)));
        let mut geometry = Geometry::cuboid(10.0, 10.0, 10.0);
        for position in &mut geometry.positions {
            position.y += 50.0;
        }
        root.add_child(MeshNode::with_geometry(Transform::identity(), geometry));

        let shape = bounding_box_of_subtree(&root).unwrap();
        assert_relative_eq!(shape.half_extents, Vec3::new(5.0, 5.0, 5.0), epsilon = 1e-12);
        assert_relative_eq!(shape.offset, Vec3::new(0.0, 50.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_bounding_box_scales_with_root() {
        let mut root = MeshNode::new(Transform::from_scale(Vec3::new(100.0, 100.0, 50.0)));
        root.add_child(MeshNode::with_geometry(
            Transform::identity(),
            Geometry::cuboid(10.0, 10.0, 10.0),
        ));

        let shape = bounding_box_of_subtree(&root).unwrap();
        assert_relative_eq!(
            shape.half_extents,
            Vec3::new(500.0, 500.0, 250.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_bounding_box_ignores_root_rotation() {
        let mut root = MeshNode::new(Transform {
            position: Vec3::zeros(),
            rotation: Quat::from_axis_angle(&Vec3::y_axis(), 0.9),
            scale: Vec3::new(1.0, 1.0, 1.0),
        });
        root.add_child(cube_node());

        let shape = bounding_box_of_subtree(&root).unwrap();
        assert_relative_eq!(shape.half_extents, Vec3::new(5.0, 5.0, 5.0), epsilon = 1e-12);
    }

    #[test]
    fn test_cube_bounding_sphere() {
        let merged = crate::collision::merge::merge(&cube_node()).unwrap();
        let sphere = bounding_sphere(&merged.points).unwrap();
        // Half the space diagonal of a side-10 cube.
        assert_relative_eq!(sphere.radius, 75.0_f64.sqrt(), epsilon = 1e-9);
        assert_relative_eq!(sphere.center, Point3::origin(), epsilon = 1e-12);
    }

    #[test]
    fn test_cube_bounding_cylinder_y_axis() {
        let cylinder = bounding_cylinder(&cube_node(), Axis::Y).unwrap();
        assert_relative_eq!(cylinder.radius, 5.0, epsilon = 1e-12);
        assert_relative_eq!(cylinder.height, 10.0, epsilon = 1e-12);

        let q = cylinder.orientation.into_inner();
        assert_relative_eq!(q.i, 0.707_106_78, epsilon = 1e-6);
        assert_relative_eq!(q.j, 0.0, epsilon = 1e-12);
        assert_relative_eq!(q.k, 0.0, epsilon = 1e-12);
        assert_relative_eq!(q.w, 0.707_106_78, epsilon = 1e-6);
    }

    #[test]
    fn test_bounding_cylinder_axis_variants() {
        let x = bounding_cylinder(&cube_node(), Axis::X).unwrap();
        assert_relative_eq!(
            x.orientation,
            Quat::identity(),
            epsilon = 1e-12
        );

        let z = bounding_cylinder(&cube_node(), Axis::Z).unwrap();
        let expected = Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2);
        assert_relative_eq!(z.orientation, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_bounding_cylinder_empty_subtree() {
        let root = MeshNode::new(Transform::identity());
        assert!(bounding_cylinder(&root, Axis::Y).is_none());
        assert!(bounding_box_of_subtree(&root).is_none());
    }
}
