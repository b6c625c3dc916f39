//! Scene assembly: the configured art space, its loaded models, and the
//! collision set the locomotion integrator probes against.
//!
//! # Invariants
//! - A model that fails to load is logged and skipped; the scene keeps
//!   running with whatever did load.
//! - The collision set only ever grows within a session; objects are
//!   registered as their loads complete.

pub mod config;
pub mod loader;
pub mod objects;
pub mod queue;

pub use config::{LightRig, ModelPlacement, PlanePlacement, SceneConfig};
pub use loader::{LoadedModel, ModelId, ModelLoader, SceneError};
pub use objects::{SceneObject, SceneObjectSet};
pub use queue::{LoadEvent, LoadQueue};
