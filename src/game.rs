//! Game shell around the simulation
//!
//! Owns the frame clock, routes keys and button commands, drives the phase
//! state machine and persists high scores and settings through a
//! [`KeyValueStore`]. Platform code only forwards events and timestamps.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::highscores::HighScores;
use crate::persistence::KeyValueStore;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, Key, autopilot, key_down, key_up, tick};
use crate::tuning::Tuning;

/// Button/menu commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    ShowInstructions,
    ShowHighScores,
    /// Record the finished run under this name
    SubmitScore(String),
    Restart,
    Menu,
}

/// A game session
pub struct Game<S: KeyValueStore> {
    pub state: GameState,
    pub high_scores: HighScores,
    pub settings: Settings,
    /// AI steers instead of the keyboard
    pub demo_mode: bool,
    /// Rank earned by the last submitted score
    pub last_rank: Option<usize>,
    store: S,
    seeds: Pcg32,
    last_time: Option<f64>,
    score_submitted: bool,
}

impl<S: KeyValueStore> Game<S> {
    /// Create a session on the menu, loading scores and settings from `store`
    pub fn new(store: S, seed: u64, tuning: Tuning) -> Self {
        let high_scores = HighScores::load(&store);
        let settings = Settings::load(&store);
        let mut state = GameState::new(seed, tuning);
        state.max_particles = settings.max_particles();

        Self {
            state,
            high_scores,
            settings,
            demo_mode: false,
            last_rank: None,
            store,
            seeds: Pcg32::seed_from_u64(seed),
            last_time: None,
            score_submitted: false,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether the finished run can still be submitted
    pub fn can_submit(&self) -> bool {
        self.state.phase == GamePhase::GameOver && !self.score_submitted
    }

    /// Replace settings, persist them and apply what affects the sim
    pub fn set_settings(&mut self, settings: Settings) {
        settings.save(&mut self.store);
        self.state.max_particles = settings.max_particles();
        self.settings = settings;
    }

    /// Apply a command; returns false when it is not valid in the current phase
    pub fn apply(&mut self, command: Command) -> bool {
        let phase = self.state.phase;
        let applied = match phase {
            GamePhase::Menu => match command {
                Command::Start | Command::Restart => self.start_run(),
                Command::ShowInstructions => self.go_to(GamePhase::Instructions),
                Command::ShowHighScores => self.go_to(GamePhase::HighScores),
                _ => false,
            },
            GamePhase::Playing => false,
            GamePhase::Instructions | GamePhase::HighScores => match command {
                Command::Menu => self.go_to(GamePhase::Menu),
                _ => false,
            },
            GamePhase::GameOver => match command {
                Command::Start | Command::Restart => self.start_run(),
                Command::ShowInstructions => self.go_to(GamePhase::Instructions),
                Command::ShowHighScores => self.go_to(GamePhase::HighScores),
                Command::Menu => self.go_to(GamePhase::Menu),
                Command::SubmitScore(ref name) => self.submit_score(name),
            },
        };

        if !applied {
            log::debug!("Ignoring {:?} in {:?}", command, phase);
        }
        applied
    }

    /// Handle a key press
    pub fn key_down(&mut self, key: Key) -> bool {
        match key {
            Key::Space => match self.state.phase {
                GamePhase::GameOver => self.apply(Command::Restart),
                GamePhase::Instructions | GamePhase::HighScores => self.apply(Command::Menu),
                GamePhase::Menu | GamePhase::Playing => false,
            },
            _ if self.state.phase == GamePhase::Playing && !self.demo_mode => {
                key_down(&mut self.state.car, key);
                true
            }
            _ => false,
        }
    }

    /// Handle a key release
    pub fn key_up(&mut self, key: Key) {
        if key.is_direction() && self.state.phase == GamePhase::Playing && !self.demo_mode {
            key_up(&mut self.state.car, key);
        }
    }

    /// Run one animation frame at host time `now_ms`
    ///
    /// The first frame after creation is treated as one nominal frame.
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let dt = match self.last_time {
            Some(last) => ((now_ms - last) as f32).clamp(0.0, MAX_FRAME_MS),
            None => NOMINAL_FRAME_MS,
        };
        self.last_time = Some(now_ms);
        self.step(dt)
    }

    /// Advance the simulation by `dt_ms` and return what happened
    pub fn step(&mut self, dt_ms: f32) -> Vec<GameEvent> {
        if self.demo_mode && self.state.phase == GamePhase::Playing {
            self.state.car.steer = autopilot::steer(&self.state);
        }
        tick(&mut self.state, dt_ms);
        self.state.drain_events()
    }

    fn go_to(&mut self, phase: GamePhase) -> bool {
        self.state.phase = phase;
        true
    }

    fn start_run(&mut self) -> bool {
        let seed = self.seeds.random::<u64>();
        self.state.start_run(seed);
        self.score_submitted = false;
        self.last_rank = None;
        true
    }

    fn submit_score(&mut self, name: &str) -> bool {
        if self.score_submitted {
            return false;
        }
        let rank = self.high_scores.add_score(name, self.state.score);
        self.high_scores.save(&mut self.store);
        log::info!("Score {} submitted at rank {}", self.state.score, rank);

        self.score_submitted = true;
        self.last_rank = Some(rank);
        self.go_to(GamePhase::HighScores)
    }
}
