//! Scene snapshot data model
//!
//! The host application owns the real scene graph. Shape derivation works on
//! an ephemeral snapshot of one subtree: each node carries its local
//! transform, an optional vertex buffer, and the authored primitive
//! parameters when the host knows them.

pub mod node;

pub use node::{Geometry, MeshNode, PrimitiveKind};
