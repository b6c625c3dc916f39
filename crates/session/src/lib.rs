//! The frame driver: owns all per-session state and advances it once per
//! rendered frame.
//!
//! # Invariants
//! - Load events are drained exactly once, at the start of the frame, before
//!   the integrator can probe the collision set.
//! - Locomotion only advances while pointer lock is held; the field animates
//!   either way.
//! - Given the same configuration and the same (dt, input) sequence, two
//!   sessions produce identical state hashes.

mod session;

pub use session::Session;
