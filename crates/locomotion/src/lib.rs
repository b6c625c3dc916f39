//! First-person locomotion: a damped-friction velocity integrator with
//! gravity, a downward ground probe, a hard floor clamp, and a single-impulse
//! jump.
//!
//! # Invariants
//! - The integrator is pure with respect to its inputs; identical state,
//!   input, and dt produce identical results.
//! - `rig.position.y >= config.eye_height` holds after every step.
//! - The jump impulse fires at most once per ground contact.

pub mod integrator;

pub use integrator::{GroundProbe, Integrator, LocomotionConfig, NoGround};
