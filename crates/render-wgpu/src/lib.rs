//! wgpu render backend for the walkable art space.
//!
//! Renders the animated blob iso-surface, the loaded collision solids, the
//! placed image planes, and a grid floor. The camera is first-person: its
//! position comes from the session's rig, its orientation from the look
//! controller.
//!
//! # Invariants
//! - The renderer never mutates session state.
//! - Look orientation is render-side; locomotion only reads the yaw.

mod camera;
mod gpu;
mod shaders;

pub use camera::LookController;
pub use gpu::WgpuRenderer;
