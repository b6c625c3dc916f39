//! Shared types and utilities for the artwalk demo engine.
//!
//! # Invariants
//! - These are plain value types; no crate here owns per-frame behavior.
//! - All types are serializable so scene configs can reference them.

pub mod types;

pub use types::{Aabb, CameraRig, Heading, SceneObjectId, RAINBOW};
