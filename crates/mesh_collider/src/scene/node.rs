//! Mesh node snapshot and authored primitive parameters

use crate::foundation::math::{Point3, Transform};

/// Authored parameters of canonical primitive geometries
///
/// Carried alongside the vertex buffer when the host knows the geometry was
/// authored as a canonical primitive. The deriver uses these closed-form
/// parameters instead of recomputing a bounding volume from points.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveKind {
    /// Axis-aligned box authored with full extents
    Box {
        /// Extent along x
        width: f64,
        /// Extent along y
        height: f64,
        /// Extent along z
        depth: f64,
    },
    /// Sphere authored with a radius
    Sphere {
        /// Authored radius
        radius: f64,
    },
    /// Cylinder authored along its local y axis
    Cylinder {
        /// Radius at +y
        radius_top: f64,
        /// Radius at -y
        radius_bottom: f64,
        /// Extent along y
        height: f64,
        /// Segment count of the authored tessellation
        radial_segments: u32,
    },
    /// Flat plane in the local xy plane
    Plane {
        /// Extent along x
        width: f64,
        /// Extent along y
        height: f64,
    },
    /// Tube extrusion; recognized but has no closed-form collision shape
    Tube,
}

/// Renderable geometry attached to a mesh node
#[derive(Debug, Clone)]
pub struct Geometry {
    /// Vertex positions in the node's local space
    pub positions: Vec<Point3>,
    /// Authored primitive hint, when the host knows one
    pub primitive: Option<PrimitiveKind>,
}

impl Geometry {
    /// Geometry from a raw vertex buffer with no primitive hint
    #[must_use]
    pub fn from_positions(positions: Vec<Point3>) -> Self {
        Self {
            positions,
            primitive: None,
        }
    }

    /// Geometry from a vertex buffer plus its authored primitive parameters
    #[must_use]
    pub fn from_primitive(positions: Vec<Point3>, primitive: PrimitiveKind) -> Self {
        Self {
            positions,
            primitive: Some(primitive),
        }
    }

    /// Canonical box primitive centered at the origin
    ///
    /// Builds the eight corner vertices and records the authored extents.
    #[must_use]
    pub fn cuboid(width: f64, height: f64, depth: f64) -> Self {
        let (hw, hh, hd) = (width * 0.5, height * 0.5, depth * 0.5);
        let mut positions = Vec::with_capacity(8);
        for &x in &[-hw, hw] {
            for &y in &[-hh, hh] {
                for &z in &[-hd, hd] {
                    positions.push(Point3::new(x, y, z));
                }
            }
        }
        Self::from_primitive(
            positions,
            PrimitiveKind::Box {
                width,
                height,
                depth,
            },
        )
    }
}

/// A node of the snapshot subtree handed in by the host scene graph
///
/// Ephemeral: constructed for one derivation call and discarded after.
#[derive(Debug, Clone)]
pub struct MeshNode {
    /// Local-to-parent transform; for the derivation root, local-to-world
    pub transform: Transform,
    /// Renderable geometry, if this node carries any
    pub geometry: Option<Geometry>,
    /// Child nodes
    pub children: Vec<MeshNode>,
}

impl MeshNode {
    /// Create an empty node (no geometry, no children)
    #[must_use]
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            geometry: None,
            children: Vec::new(),
        }
    }

    /// Create a leaf node carrying geometry
    #[must_use]
    pub fn with_geometry(transform: Transform, geometry: Geometry) -> Self {
        Self {
            transform,
            geometry: Some(geometry),
            children: Vec::new(),
        }
    }

    /// Attach a child node
    pub fn add_child(&mut self, child: MeshNode) {
        self.children.push(child);
    }

    /// Visit every geometry-bearing node in this subtree
    ///
    /// `base` replaces the root's own transform; descendant transforms are
    /// composed onto it. Traversal uses an explicit worklist so deep
    /// hierarchies cannot overflow the stack. Visit order is unspecified.
    pub fn for_each_geometry<'a, F>(&'a self, base: &Transform, mut visit: F)
    where
        F: FnMut(&'a Geometry, &Transform),
    {
        let mut stack = vec![(self, base.clone())];
        while let Some((node, transform)) = stack.pop() {
            if let Some(geometry) = &node.geometry {
                visit(geometry, &transform);
            }
            for child in &node.children {
                stack.push((child, transform.combine(&child.transform)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_cuboid_corners() {
        let geometry = Geometry::cuboid(10.0, 10.0, 10.0);
        assert_eq!(geometry.positions.len(), 8);
        for corner in &geometry.positions {
            assert_relative_eq!(corner.coords.abs(), Vec3::new(5.0, 5.0, 5.0), epsilon = 1e-12);
        }
        assert!(matches!(geometry.primitive, Some(PrimitiveKind::Box { .. })));
    }

    #[test]
    fn test_for_each_geometry_composes_relative_transforms() {
        let mut root = MeshNode::new(Transform::from_position(Vec3::new(100.0, 0.0, 0.0)));
        let mut group = MeshNode::new(Transform::from_position(Vec3::new(0.0, 50.0, 0.0)));
        group.add_child(MeshNode::with_geometry(
            Transform::from_position(Vec3::new(0.0, 0.0, 7.0)),
            Geometry::from_positions(vec![Point3::origin()]),
        ));
        root.add_child(group);

        let mut visited = Vec::new();
        root.for_each_geometry(&Transform::identity(), |geometry, transform| {
            visited.push(transform.transform_point(&geometry.positions[0]));
        });

        // Root's own transform is replaced by the base, so the 100-unit
        // translation must not appear.
        assert_eq!(visited.len(), 1);
        assert_relative_eq!(visited[0], Point3::new(0.0, 50.0, 7.0), epsilon = 1e-12);
    }

    #[test]
    fn test_deep_hierarchy_does_not_recurse() {
        let mut node = MeshNode::with_geometry(
            Transform::from_position(Vec3::new(0.0, 1.0, 0.0)),
            Geometry::from_positions(vec![Point3::origin()]),
        );
        for _ in 0..4096 {
            let mut parent = MeshNode::new(Transform::identity());
            parent.add_child(node);
            node = parent;
        }

        let mut count = 0;
        node.for_each_geometry(&Transform::identity(), |_, _| count += 1);
        assert_eq!(count, 1);
    }
}
