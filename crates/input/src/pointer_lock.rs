use serde::{Deserialize, Serialize};

/// Pointer-lock engagement, polled by the session every frame.
///
/// The windowing shell calls [`lock`](PointerLockState::lock) when the user
/// clicks the start overlay and [`unlock`](PointerLockState::unlock) when the
/// platform releases the grab (escape key). While disengaged the locomotion
/// integrator is frozen and the rig does not move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerLockState {
    locked: bool,
}

impl PointerLockState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&mut self) {
        if !self.locked {
            tracing::debug!("pointer lock engaged");
        }
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        if self.locked {
            tracing::debug!("pointer lock released");
        }
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}
