//! Top-level shape derivation dispatch
//!
//! Routes a scene object to the right computer: an explicitly requested
//! shape type wins; otherwise the merged geometry's origin hint picks a
//! closed-form primitive path or falls back to the bounding box.

use crate::collision::bounds;
use crate::collision::hull::{self, ConvexHull};
use crate::collision::merge::{merge, GeometrySource, MergedGeometry};
use crate::collision::shape::{Axis, Shape, ShapeDescriptor, ShapeError, ShapeOptions, ShapeType};
use crate::foundation::math::{Quat, Vec3};
use crate::scene::{MeshNode, PrimitiveKind};
use rand::Rng;
use std::f64::consts::FRAC_PI_2;

/// Segment count reported for derived bounding cylinders
const BOUNDING_CYLINDER_SEGMENTS: u32 = 12;

/// Substitute half extent for degenerate plane axes
const PLANE_MIN_HALF_EXTENT: f64 = 0.1;

/// Derive a collision-shape descriptor for a scene object
///
/// Returns `Ok(None)` when the subtree carries no renderable geometry or
/// its bounds are degenerate; that is "no shape", not an error. The random
/// generator seeds the hull-degeneracy perturbation; pass a seeded
/// generator for reproducible results.
///
/// # Errors
///
/// [`ShapeError::Hull`] when an explicitly requested hull cannot be built
/// from the geometry. (An unrecognized type string already fails at
/// [`ShapeType`] parse time.)
pub fn derive_shape<R: Rng + ?Sized>(
    object: &MeshNode,
    options: &ShapeOptions,
    rng: &mut R,
) -> Result<Option<ShapeDescriptor>, ShapeError> {
    if let Some(shape_type) = options.shape_type {
        return match shape_type {
            ShapeType::Box => Ok(bounding_box_shape(object)),
            ShapeType::Cylinder => Ok(bounding_cylinder_shape(object, options.cylinder_axis)),
            ShapeType::Sphere => Ok(bounding_sphere_shape(object, options)),
            ShapeType::Hull => hull_shape(object, rng),
            ShapeType::Mesh => Ok(trimesh_shape(object)),
        };
    }

    let Some(merged) = merge(object) else {
        return Ok(None);
    };

    match &merged.source {
        GeometrySource::Primitive(PrimitiveKind::Box { .. }) => {
            Ok(box_from_points(&merged, false))
        }
        GeometrySource::Primitive(PrimitiveKind::Plane { .. }) => {
            Ok(box_from_points(&merged, true))
        }
        GeometrySource::Primitive(PrimitiveKind::Sphere { radius }) => {
            Ok(Some(ShapeDescriptor::new(Shape::Sphere { radius: *radius })))
        }
        GeometrySource::Primitive(PrimitiveKind::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
        }) => Ok(Some(ShapeDescriptor::new(Shape::Cylinder {
            radius_top: *radius_top,
            radius_bottom: *radius_bottom,
            height: *height,
            num_segments: *radial_segments,
            // Authored cylinders stand along local y; the engine's canonical
            // primitive does not, hence the fixed correction.
            orientation: Quat::from_axis_angle(&Vec3::x_axis(), -FRAC_PI_2),
        }))),
        GeometrySource::Primitive(PrimitiveKind::Tube) => {
            log::warn!("unsupported primitive hint Tube; using bounding box as shape");
            Ok(bounding_box_shape(object))
        }
        GeometrySource::Mesh | GeometrySource::Compound => Ok(bounding_box_shape(object)),
    }
}

/// Axis-aligned box of the subtree with the root's rotation neutralized
fn bounding_box_shape(object: &MeshNode) -> Option<ShapeDescriptor> {
    let subtree_box = bounds::bounding_box_of_subtree(object)?;
    Some(ShapeDescriptor::with_offset(
        Shape::Box {
            half_extents: subtree_box.half_extents,
        },
        subtree_box.offset,
    ))
}

/// Box sized to the merged point set's AABB
///
/// The single-leaf primitive path: cheaper than the subtree walk and
/// measured in the object's local frame. Plane geometry substitutes a thin
/// slab extent for any flat axis.
fn box_from_points(merged: &MergedGeometry, plane: bool) -> Option<ShapeDescriptor> {
    let aabb = bounds::Aabb::from_points(&merged.points)?;
    let mut half_extents = aabb.half_extents();
    if plane {
        half_extents = half_extents.map(|h| if h > 0.0 { h } else { PLANE_MIN_HALF_EXTENT });
    }
    Some(ShapeDescriptor::with_offset(
        Shape::Box { half_extents },
        aabb.center().coords,
    ))
}

fn bounding_cylinder_shape(object: &MeshNode, axis: Axis) -> Option<ShapeDescriptor> {
    let cylinder = bounds::bounding_cylinder(object, axis)?;
    Some(ShapeDescriptor::new(Shape::Cylinder {
        radius_top: cylinder.radius,
        radius_bottom: cylinder.radius,
        height: cylinder.height,
        num_segments: BOUNDING_CYLINDER_SEGMENTS,
        orientation: cylinder.orientation,
    }))
}

fn bounding_sphere_shape(object: &MeshNode, options: &ShapeOptions) -> Option<ShapeDescriptor> {
    if let Some(radius) = options.sphere_radius {
        return Some(ShapeDescriptor::new(Shape::Sphere { radius }));
    }
    let merged = merge(object)?;
    let sphere = bounds::bounding_sphere(&merged.points)?;
    Some(ShapeDescriptor::new(Shape::Sphere {
        radius: sphere.radius,
    }))
}

fn hull_shape<R: Rng + ?Sized>(
    object: &MeshNode,
    rng: &mut R,
) -> Result<Option<ShapeDescriptor>, ShapeError> {
    let Some(merged) = merge(object) else {
        return Ok(None);
    };
    if merged.points.is_empty() {
        return Ok(None);
    }
    let points = hull::perturbed(&merged.points, rng);
    let hull = ConvexHull::build(&points)?;
    Ok(Some(ShapeDescriptor::new(Shape::Hull(hull))))
}

fn trimesh_shape(object: &MeshNode) -> Option<ShapeDescriptor> {
    let merged = merge(object)?;
    if merged.points.is_empty() {
        return None;
    }
    let indices = (0..merged.points.len() as u32).collect();
    Some(ShapeDescriptor::new(Shape::Trimesh {
        vertices: merged.points,
        indices,
    }))
}
