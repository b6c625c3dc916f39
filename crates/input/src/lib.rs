//! Movement input: raw key press/release events mapped onto per-frame
//! boolean intent, plus pointer-lock state.
//!
//! # Invariants
//! - Booleans toggle strictly on matching press/release pairs; key repeat
//!   never accumulates.
//! - `jump_pressed` is a one-shot edge, cleared when the integrator
//!   consumes it.
//! - Lock state is tracked here but enforced by the session: the integrator
//!   only runs while the pointer is locked.

pub mod movement;
pub mod pointer_lock;

pub use movement::{Key, MovementInput};
pub use pointer_lock::PointerLockState;
