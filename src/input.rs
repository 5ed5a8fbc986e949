//! Input snapshot
//!
//! Keyboard, touch and on-screen-button handlers mutate only this snapshot;
//! the simulation step is the sole writer of body positions. Unknown keys
//! are simply never mapped, so invalid input is ignored by construction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Input state sampled once per tick (deterministic).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Held directional flags.
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// One-shot action (flap, fire, launch, start).
    pub action: bool,
    /// One-shot pause toggle.
    pub pause: bool,
    /// One-shot restart request.
    pub restart: bool,
    /// Pointer position in the game's logical coordinates, when a pointer
    /// or touch drag is active.
    pub pointer: Option<Vec2>,
}

impl InputSnapshot {
    /// Clear one-shot flags after a tick has consumed them. Held flags and
    /// the pointer persist until the matching release event.
    pub fn clear_transient(&mut self) {
        self.action = false;
        self.pause = false;
        self.restart = false;
    }

    /// Horizontal axis from held flags: -1, 0 or +1.
    pub fn axis_x(&self) -> f32 {
        (self.right as i8 - self.left as i8) as f32
    }

    /// Vertical axis from held flags: -1 (up) to +1 (down), matching the
    /// screen-space convention the games use.
    pub fn axis_y(&self) -> f32 {
        (self.down as i8 - self.up as i8) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_combine_held_flags() {
        let mut input = InputSnapshot::default();
        assert_eq!(input.axis_x(), 0.0);
        input.left = true;
        assert_eq!(input.axis_x(), -1.0);
        input.right = true;
        assert_eq!(input.axis_x(), 0.0);
        input.up = true;
        assert_eq!(input.axis_y(), -1.0);
    }

    #[test]
    fn clear_transient_keeps_held_state() {
        let mut input = InputSnapshot {
            left: true,
            action: true,
            pause: true,
            restart: true,
            pointer: Some(Vec2::new(1.0, 2.0)),
            ..Default::default()
        };
        input.clear_transient();
        assert!(input.left);
        assert!(input.pointer.is_some());
        assert!(!input.action && !input.pause && !input.restart);
    }
}
