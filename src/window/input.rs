//! Buffered input state
//!
//! Key state persists between frames. The mouse delta accumulates between
//! reads and resets when taken.

use super::event::Key;
use crate::renderer::camera::MoveKeys;

/// Number of slots in the key table.
pub const KEY_TABLE_SIZE: usize = 1024;

/// Keyboard and mouse state for the frame loop.
#[derive(Debug, Clone)]
pub struct InputState {
    keys: [bool; KEY_TABLE_SIZE],
    last_cursor: Option<(f64, f64)>,
    mouse_delta: (f32, f32),
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            keys: [false; KEY_TABLE_SIZE],
            last_cursor: None,
            mouse_delta: (0.0, 0.0),
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_pressed(&mut self, key: Key) {
        if let Some(slot) = self.keys.get_mut(key.index()) {
            *slot = true;
        }
    }

    pub fn key_released(&mut self, key: Key) {
        if let Some(slot) = self.keys.get_mut(key.index()) {
            *slot = false;
        }
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.keys.get(key.index()).copied().unwrap_or(false)
    }

    /// Release every key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.keys = [false; KEY_TABLE_SIZE];
    }

    /// Record an absolute cursor position.
    ///
    /// The first position only seeds the tracker and yields no movement.
    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.last_cursor {
            self.mouse_motion(x - last_x, y - last_y);
        }
        self.last_cursor = Some((x, y));
    }

    /// Record relative motion in window coordinates (+y is down).
    pub fn mouse_motion(&mut self, dx: f64, dy: f64) {
        self.mouse_delta.0 += dx as f32;
        // Moving the mouse up looks up.
        self.mouse_delta.1 -= dy as f32;
    }

    /// Movement since the last call. Positive y is up.
    pub fn take_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Camera movement keys: W/S forward and back, A/D left and right.
    pub fn move_keys(&self) -> MoveKeys {
        MoveKeys {
            forward: self.is_down(Key::W),
            back: self.is_down(Key::S),
            left: self.is_down(Key::A),
            right: self.is_down(Key::D),
        }
    }
}
