//! Collision-shape derivation pipeline
//!
//! Turns arbitrary mesh geometry into a simplified collision shape the
//! physics engine can instantiate. Data flows one way:
//!
//! scene object → [`merge`] → point set → bounding computation or hull
//! construction → [`ShapeDescriptor`] → physics engine.
//!
//! # Module Organization
//!
//! - [`merge`] - Geometry collection and transform baking
//! - [`bounds`] - Bounding box / sphere / cylinder computation
//! - [`hull`] - Incremental 3D convex hull (Quickhull)
//! - [`shape`] - Shape descriptors, options, and errors
//! - [`derive`] - Top-level dispatch
//!
//! # Key Types
//!
//! - [`ShapeDescriptor`] - The derived shape plus its local placement
//! - [`ConvexHull`] - Watertight triangulated hull with outward normals
//! - [`ShapeOptions`] - Caller overrides (type, cylinder axis, sphere radius)

pub mod bounds;
pub mod derive;
pub mod hull;
pub mod merge;
pub mod shape;

// Re-export commonly used types
pub use bounds::{Aabb, BoundingCylinder, BoundingSphere, SubtreeBox};
pub use derive::derive_shape;
pub use hull::{ConvexHull, ConvexHullBuilder, HullError, HullFace};
pub use merge::{GeometrySource, MergedGeometry};
pub use shape::{Axis, Shape, ShapeDescriptor, ShapeError, ShapeOptions, ShapeType};
