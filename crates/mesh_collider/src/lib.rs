//! # Mesh Collider
//!
//! Derives a simplified collision-shape descriptor (box, sphere, cylinder,
//! convex hull, or triangle mesh) from arbitrary 3D mesh data, for physics
//! engines that cannot consume raw render geometry directly.
//!
//! ## Features
//!
//! - **Geometry Merging**: Bakes per-node transforms and merges a whole
//!   subtree into one point set
//! - **Bounding Primitives**: Tight axis-aligned boxes, bounding spheres,
//!   and axis-oriented bounding cylinders
//! - **Convex Hulls**: Incremental Quickhull construction with watertight,
//!   outward-oriented output
//! - **Primitive Shortcuts**: Canonical primitives keep their authored
//!   parameters instead of a recomputed bounding volume
//!
//! ## Quick Start
//!
//! ```rust
//! use mesh_collider::prelude::*;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! // Snapshot of a scene object: a 10x10x10 box mesh.
//! let object = MeshNode::with_geometry(
//!     Transform::identity(),
//!     Geometry::cuboid(10.0, 10.0, 10.0),
//! );
//!
//! // Seeded generator keeps hull perturbation reproducible.
//! let mut rng = StdRng::seed_from_u64(7);
//! let descriptor = derive_shape(&object, &ShapeOptions::default(), &mut rng)
//!     .expect("options are valid")
//!     .expect("object has geometry");
//!
//! match descriptor.shape {
//!     Shape::Box { half_extents } => assert_eq!(half_extents.x, 5.0),
//!     _ => unreachable!("a canonical box derives a box shape"),
//! }
//! ```
//!
//! Each derivation call is a pure, self-contained computation over the
//! input snapshot: no caching, no shared state, no mutation of host-owned
//! geometry.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::many_single_char_names)]

pub mod collision;
pub mod foundation;
pub mod scene;

pub use collision::{derive_shape, ConvexHull, Shape, ShapeDescriptor, ShapeError, ShapeOptions};
pub use scene::{Geometry, MeshNode, PrimitiveKind};

/// Commonly used types, importable in one line
pub mod prelude {
    pub use crate::collision::{
        derive_shape, Axis, ConvexHull, Shape, ShapeDescriptor, ShapeError, ShapeOptions,
        ShapeType,
    };
    pub use crate::foundation::math::{Point3, Quat, Transform, Vec3};
    pub use crate::scene::{Geometry, MeshNode, PrimitiveKind};
}
