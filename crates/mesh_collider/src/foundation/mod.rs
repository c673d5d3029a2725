//! Foundation module - core math utilities and types
//!
//! Provides the fundamental math types used throughout the crate:
//! vectors, points, quaternions, and affine transforms.

pub mod math;
