//! Road Rush - a single-screen arcade driving game
//!
//! Core modules:
//! - `sim`: Per-frame simulation (movement, spawning, collisions, fuel, difficulty)
//! - `game`: Frame clock, input routing and the phase state machine
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Procedural sound cues
//! - `persistence`: Key-value storage backends (LocalStorage, file, memory)
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{Command, Game};
pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Canvas dimensions (pixels, y grows downward)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Nominal frame duration that all per-frame speeds are tuned for (~60 Hz)
    pub const NOMINAL_FRAME_MS: f32 = 16.0;
    /// Longest frame delta fed to the simulation (tab switches, debugger stalls)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Road geometry
    pub const ROAD_X: f32 = 150.0;
    pub const ROAD_WIDTH: f32 = 500.0;
    pub const STRIPE_WIDTH: f32 = 10.0;
    pub const STRIPE_HEIGHT: f32 = 50.0;
    pub const STRIPE_GAP: f32 = 30.0;

    /// Car defaults
    pub const CAR_WIDTH: f32 = 50.0;
    pub const CAR_HEIGHT: f32 = 80.0;
    pub const CAR_START_X: f32 = 400.0;
    pub const CAR_START_Y: f32 = 500.0;

    /// Fuel tank bounds
    pub const MAX_FUEL: f32 = 100.0;

    /// Falling entity sizes
    pub const OBSTACLE_WIDTH: f32 = 50.0;
    pub const OBSTACLE_HEIGHT: f32 = 50.0;
    pub const POWERUP_SIZE: f32 = 30.0;

    /// Number of entries shown on the high score screen
    pub const HIGH_SCORE_DISPLAY: usize = 5;
}

/// Scale factor turning a frame delta into "nominal frames"
#[inline]
pub fn frame_scale(dt_ms: f32) -> f32 {
    dt_ms / consts::NOMINAL_FRAME_MS
}
