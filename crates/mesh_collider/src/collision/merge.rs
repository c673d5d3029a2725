//! Geometry merging and normalization
//!
//! Collects every geometry-bearing node under a derivation root and bakes
//! the transforms into one position-only point set. The point set lives in
//! the root's local frame scaled by the root's world scale: descendant
//! transforms are applied in full, while of the root's own transform only
//! the scale is baked (its rotation and translation belong to the physics
//! body, not the shape).

use crate::foundation::math::{Point3, Transform};
use crate::scene::{MeshNode, PrimitiveKind};
use std::collections::HashSet;

/// Vertices closer than this per axis collapse to one point in compound merges
const WELD_TOLERANCE: f64 = 1e-4;

/// Where the merged point set came from
///
/// Downstream dispatch uses closed-form parameters for single canonical
/// primitives; only the compound case forces numeric recomputation from
/// merged points.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometrySource {
    /// Exactly one geometry-bearing node, authored as a canonical primitive
    Primitive(PrimitiveKind),
    /// Exactly one geometry-bearing node, arbitrary mesh data
    Mesh,
    /// Multiple nodes merged into a generic point cloud
    Compound,
}

/// Result of merging a subtree's geometry
#[derive(Debug, Clone)]
pub struct MergedGeometry {
    /// Merged vertex positions
    pub points: Vec<Point3>,
    /// Origin hint for downstream shape dispatch
    pub source: GeometrySource,
}

/// Merge every geometry-bearing node under `root` into one point set
///
/// Returns `None` when the subtree carries no renderable geometry.
#[must_use]
pub fn merge(root: &MeshNode) -> Option<MergedGeometry> {
    let base = Transform::from_scale(root.transform.scale);
    let mut parts = Vec::new();
    root.for_each_geometry(&base, |geometry, transform| {
        parts.push((geometry, transform.clone()));
    });

    match parts.as_slice() {
        [] => None,
        [(geometry, transform)] => {
            let points = transform_points(&geometry.positions, transform);
            let source = geometry
                .primitive
                .clone()
                .map_or(GeometrySource::Mesh, GeometrySource::Primitive);
            Some(MergedGeometry { points, source })
        }
        _ => {
            let mut points = Vec::new();
            for (geometry, transform) in &parts {
                points.extend(transform_points(&geometry.positions, transform));
            }
            Some(MergedGeometry {
                points: weld_points(&points, WELD_TOLERANCE),
                source: GeometrySource::Compound,
            })
        }
    }
}

fn transform_points(positions: &[Point3], transform: &Transform) -> Vec<Point3> {
    positions
        .iter()
        .map(|p| transform.transform_point(p))
        .collect()
}

/// Collapse near-coincident vertices, keeping first-occurrence order
///
/// Hashes each position truncated to the tolerance grid; positions landing
/// in the same cell count as the same vertex.
fn weld_points(points: &[Point3], tolerance: f64) -> Vec<Point3> {
    let inv = 1.0 / tolerance.max(f64::EPSILON);
    let mut seen = HashSet::with_capacity(points.len());
    let mut welded = Vec::with_capacity(points.len());

    for point in points {
        let key = (
            (point.x * inv).trunc() as i64,
            (point.y * inv).trunc() as i64,
            (point.z * inv).trunc() as i64,
        );
        if seen.insert(key) {
            welded.push(*point);
        }
    }
    welded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Vec3};
    use crate::scene::Geometry;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_merge_empty_subtree() {
        let root = MeshNode::new(Transform::identity());
        assert!(merge(&root).is_none());
    }

    #[test]
    fn test_single_leaf_preserves_primitive_hint() {
        let root = MeshNode::with_geometry(Transform::identity(), Geometry::cuboid(2.0, 2.0, 2.0));

        let merged = merge(&root).unwrap();
        assert_eq!(merged.points.len(), 8);
        assert!(matches!(
            merged.source,
            GeometrySource::Primitive(PrimitiveKind::Box { .. })
        ));
    }

    #[test]
    fn test_single_leaf_without_hint_is_mesh() {
        let root = MeshNode::with_geometry(
            Transform::identity(),
            Geometry::from_positions(vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)]),
        );

        let merged = merge(&root).unwrap();
        assert_eq!(merged.source, GeometrySource::Mesh);
    }

    #[test]
    fn test_root_translation_and_rotation_excluded_scale_baked() {
        let mut root = MeshNode::new(Transform {
            position: Vec3::new(100.0, 0.0, 0.0),
            rotation: Quat::from_axis_angle(&Vec3::z_axis(), FRAC_PI_2),
            scale: Vec3::new(2.0, 2.0, 2.0),
        });
        root.add_child(MeshNode::with_geometry(
            Transform::from_position(Vec3::new(0.0, 50.0, 0.0)),
            Geometry::from_positions(vec![Point3::new(1.0, 0.0, 0.0)]),
        ));

        let merged = merge(&root).unwrap();
        // Child translation and vertex are scaled by the root's scale; the
        // root's translation and rotation must not appear.
        assert_relative_eq!(
            merged.points[0],
            Point3::new(2.0, 100.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_descendant_rotation_applied() {
        let mut root = MeshNode::new(Transform::identity());
        root.add_child(MeshNode::with_geometry(
            Transform {
                position: Vec3::zeros(),
                rotation: Quat::from_axis_angle(&Vec3::z_axis(), FRAC_PI_2),
                scale: Vec3::new(1.0, 1.0, 1.0),
            },
            Geometry::from_positions(vec![Point3::new(1.0, 0.0, 0.0)]),
        ));

        let merged = merge(&root).unwrap();
        assert_relative_eq!(merged.points[0], Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_compound_merge_welds_duplicates() {
        let mut root = MeshNode::new(Transform::identity());
        root.add_child(MeshNode::with_geometry(
            Transform::identity(),
            Geometry::from_positions(vec![
                Point3::new(1.0, 1.0, 1.0),
                Point3::new(0.0, 0.0, 0.0),
            ]),
        ));
        root.add_child(MeshNode::with_geometry(
            Transform::identity(),
            Geometry::from_positions(vec![
                Point3::new(1.0, 1.0, 1.0),
                Point3::new(5.0, 0.0, 0.0),
            ]),
        ));

        let merged = merge(&root).unwrap();
        assert_eq!(merged.source, GeometrySource::Compound);
        assert_eq!(merged.points.len(), 3);
    }
}
