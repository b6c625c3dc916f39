//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read session state; they never mutate it.
//! - The view derives from the rig and look direction each frame.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
