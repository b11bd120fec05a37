//! Keyboard steering
//!
//! Arrow keys set the steering of their axis on press and clear it on
//! release. Per axis the last event wins: releasing Left while Right is
//! still held stops horizontal movement until Right is pressed again.

use super::state::Car;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// Context-dependent: restart on game over, back to menu on info screens
    Space,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "Up" => Some(Key::Up),
            "ArrowDown" | "Down" => Some(Key::Down),
            "ArrowLeft" | "Left" => Some(Key::Left),
            "ArrowRight" | "Right" => Some(Key::Right),
            " " | "Spacebar" => Some(Key::Space),
            _ => None,
        }
    }

    pub fn is_direction(self) -> bool {
        !matches!(self, Key::Space)
    }

    /// Whether a held-key auto-repeat should be handled like a fresh press
    ///
    /// Steering keys keep re-applying; Space only acts on the first press.
    pub fn accepts_repeat(self) -> bool {
        self.is_direction()
    }
}

/// Apply a key press to the car's steering
pub fn key_down(car: &mut Car, key: Key) {
    match key {
        Key::Right => car.steer.x = 1.0,
        Key::Left => car.steer.x = -1.0,
        Key::Down => car.steer.y = 1.0,
        Key::Up => car.steer.y = -1.0,
        Key::Space => {}
    }
}

/// Apply a key release to the car's steering
pub fn key_up(car: &mut Car, key: Key) {
    match key {
        Key::Left | Key::Right => car.steer.x = 0.0,
        Key::Up | Key::Down => car.steer.y = 0.0,
        Key::Space => {}
    }
}
