use serde::{Deserialize, Serialize};

/// Platform-agnostic key codes the demo binds. The windowing shell maps its
/// native key events onto these; everything below the shell is backend-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    ArrowUp,
    ArrowLeft,
    ArrowDown,
    ArrowRight,
    Space,
}

/// Per-frame movement intent.
///
/// Four independent direction booleans plus a one-shot jump edge. Key
/// handlers write these from the event callback; the locomotion integrator
/// reads them once per frame. Arrow keys alias WASD, matching the demo's
/// original bindings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// One-shot jump press for this frame. Set on key-down, cleared by
    /// [`MovementInput::take_jump`] so holding Space does not repeat-jump.
    pub jump_pressed: bool,
}

impl MovementInput {
    /// Apply a raw key event. `pressed` is true on key-down.
    pub fn apply(&mut self, key: Key, pressed: bool) {
        match key {
            Key::KeyW | Key::ArrowUp => self.forward = pressed,
            Key::KeyA | Key::ArrowLeft => self.left = pressed,
            Key::KeyS | Key::ArrowDown => self.backward = pressed,
            Key::KeyD | Key::ArrowRight => self.right = pressed,
            Key::Space => {
                // Only the press edge matters; release is ignored so a held
                // key cannot queue a second jump.
                if pressed {
                    self.jump_pressed = true;
                }
            }
        }
    }

    /// Consume the jump edge, returning whether a press happened since the
    /// last call.
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_pressed)
    }

    /// True when any direction key is held.
    pub fn any_direction(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
