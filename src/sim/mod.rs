//! Simulation module
//!
//! All gameplay logic lives here, independent of rendering and platform:
//! - Host-supplied frame deltas, scaled against a nominal 16 ms frame
//! - Seeded RNG only, so a seed plus input replays exactly
//! - No globals: every mutable value is a field of `GameState`

pub mod autopilot;
pub mod collision;
pub mod input;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use input::{Key, key_down, key_up};
pub use state::{
    Car, CarPaint, Difficulty, EndReason, GameEvent, GamePhase, GameState, Obstacle, Particle,
    PowerUp, PowerUpKind, Road,
};
pub use tick::{apply_powerup, tick};
