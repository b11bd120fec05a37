//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in [`GameState`]; nothing is
//! global. Timed power-up effects are expiry timestamps on the [`Car`],
//! compared against the simulation clock each frame.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Which screen the game is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen (initial and idle-return state)
    Menu,
    /// Active run
    Playing,
    /// How-to-play screen
    Instructions,
    /// Leaderboard screen
    HighScores,
    /// Run ended, waiting for submit/restart/menu
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Crash,
    OutOfFuel,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Temporary extra car speed
    SpeedBoost,
    /// Temporary invincibility paint
    Invincibility,
    /// Instant fuel top-up
    Refuel,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::SpeedBoost,
        PowerUpKind::Invincibility,
        PowerUpKind::Refuel,
    ];
}

/// Something the host may want to react to (audio, HUD flashes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PowerUpCollected { kind: PowerUpKind, pos: Vec2 },
    /// Invincible car plowed through an obstacle
    ObstacleSmashed { pos: Vec2 },
    Crashed,
    OutOfFuel,
    LowFuel,
    LevelUp { level: u32 },
}

/// How the car is currently painted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarPaint {
    Normal,
    Invincible,
}

/// The player's car
#[derive(Debug, Clone)]
pub struct Car {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Steering direction per axis, each component in {-1, 0, 1}
    pub steer: Vec2,
    pub base_speed: f32,
    pub fuel: f32,
    /// Sim time (seconds) at which the speed boost wears off
    pub boost_until: Option<f64>,
    /// Sim time (seconds) at which invincibility wears off
    pub invincible_until: Option<f64>,
}

impl Car {
    pub fn new(base_speed: f32) -> Self {
        Self {
            pos: Vec2::new(CAR_START_X, CAR_START_Y),
            size: Vec2::new(CAR_WIDTH, CAR_HEIGHT),
            steer: Vec2::ZERO,
            base_speed,
            fuel: MAX_FUEL,
            boost_until: None,
            invincible_until: None,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Current speed scalar (base plus any active boost)
    pub fn speed(&self, tuning: &Tuning) -> f32 {
        if self.boost_until.is_some() {
            self.base_speed + tuning.boost_amount
        } else {
            self.base_speed
        }
    }

    /// Velocity in pixels per nominal frame
    pub fn velocity(&self, tuning: &Tuning) -> Vec2 {
        self.steer * self.speed(tuning)
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_until.is_some()
    }

    pub fn paint(&self) -> CarPaint {
        if self.is_invincible() {
            CarPaint::Invincible
        } else {
            CarPaint::Normal
        }
    }

    /// Drop effects whose expiry has passed
    pub fn expire_effects(&mut self, now: f64) {
        if self.boost_until.is_some_and(|t| now >= t) {
            self.boost_until = None;
        }
        if self.invincible_until.is_some_and(|t| now >= t) {
            self.invincible_until = None;
        }
    }

    /// Keep the car on the road horizontally and on the canvas vertically
    pub fn clamp_to(&mut self, road: &Road) {
        self.pos.x = self.pos.x.clamp(road.x, road.x + road.width - self.size.x);
        self.pos.y = self.pos.y.clamp(0.0, CANVAS_HEIGHT - self.size.y);
    }

    /// Add fuel, never exceeding a full tank
    pub fn refuel(&mut self, amount: f32) {
        self.fuel = (self.fuel + amount).min(MAX_FUEL);
    }
}

/// Number of obstacle paint colors (see `renderer::vertex::colors::OBSTACLES`)
pub const OBSTACLE_PAINTS: u8 = 4;

/// A falling obstacle
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward speed (pixels per nominal frame)
    pub speed: f32,
    /// Palette index
    pub paint: u8,
}

impl Obstacle {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// A falling pickup
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// A particle for pickup bursts
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per nominal frame
    pub vel: Vec2,
    /// 0-1, decreases over time
    pub life: f32,
    /// Color source
    pub kind: PowerUpKind,
}

/// Road geometry
#[derive(Debug, Clone)]
pub struct Road {
    pub x: f32,
    pub width: f32,
    /// Scroll position of the lane stripes, in [0, stripe period)
    pub stripe_offset: f32,
}

impl Default for Road {
    fn default() -> Self {
        Self {
            x: ROAD_X,
            width: ROAD_WIDTH,
            stripe_offset: 0.0,
        }
    }
}

impl Road {
    pub fn stripe_period() -> f32 {
        STRIPE_HEIGHT + STRIPE_GAP
    }

    pub fn scroll(&mut self, amount: f32) {
        self.stripe_offset = (self.stripe_offset + amount).rem_euclid(Self::stripe_period());
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Difficulty knobs that step up with each level
#[derive(Debug, Clone, PartialEq)]
pub struct Difficulty {
    pub level: u32,
    pub obstacle_speed_min: f32,
    pub obstacle_speed_max: f32,
    pub obstacle_frequency: f32,
    pub fuel_rate: f32,
}

impl Difficulty {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            level: 1,
            obstacle_speed_min: tuning.obstacle_speed_min,
            obstacle_speed_max: tuning.obstacle_speed_max,
            obstacle_frequency: tuning.obstacle_frequency,
            fuel_rate: tuning.fuel_rate,
        }
    }

    /// Advance one level, raising every knob together
    pub fn step_up(&mut self, tuning: &Tuning) {
        self.level += 1;
        self.obstacle_speed_min += tuning.obstacle_speed_min_step;
        self.obstacle_speed_max += tuning.obstacle_speed_max_step;
        self.obstacle_frequency = (self.obstacle_frequency + tuning.obstacle_frequency_step)
            .min(tuning.obstacle_frequency_cap);
        self.fuel_rate += tuning.fuel_rate_step;
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    /// Set when the last run ended
    pub end_reason: Option<EndReason>,
    pub score: u64,
    /// Simulation clock (seconds of played time in this run)
    pub time_secs: f64,
    pub car: Car,
    pub obstacles: Vec<Obstacle>,
    pub powerups: Vec<PowerUp>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub road: Road,
    pub difficulty: Difficulty,
    /// Low-fuel warning already raised for the current dip below threshold
    pub low_fuel_warned: bool,
    /// Particle cap (from settings)
    pub max_particles: usize,
    /// Pending events for the host
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a game sitting on the menu
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            car: Car::new(tuning.car_speed),
            difficulty: Difficulty::new(&tuning),
            tuning,
            phase: GamePhase::Menu,
            end_reason: None,
            score: 0,
            time_secs: 0.0,
            obstacles: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            road: Road::default(),
            low_fuel_warned: false,
            max_particles: 256,
            events: Vec::new(),
        }
    }

    /// Reset every per-run field and enter `Playing`
    pub fn start_run(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.phase = GamePhase::Playing;
        self.end_reason = None;
        self.score = 0;
        self.time_secs = 0.0;
        self.car = Car::new(self.tuning.car_speed);
        self.obstacles.clear();
        self.powerups.clear();
        self.particles.clear();
        self.road = Road::default();
        self.difficulty = Difficulty::new(&self.tuning);
        self.low_fuel_warned = false;
        self.events.clear();
        log::info!("Run started (seed {})", seed);
    }

    /// End the current run
    pub fn end_run(&mut self, reason: EndReason) {
        self.phase = GamePhase::GameOver;
        self.end_reason = Some(reason);
        self.car.steer = Vec2::ZERO;
        self.events.push(match reason {
            EndReason::Crash => GameEvent::Crashed,
            EndReason::OutOfFuel => GameEvent::OutOfFuel,
        });
        log::info!(
            "Run over ({:?}): score {}, level {}",
            reason,
            self.score,
            self.difficulty.level
        );
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add a particle, dropping the oldest ones past the cap
    pub fn push_particle(&mut self, particle: Particle) {
        if self.max_particles == 0 {
            return;
        }
        while self.particles.len() >= self.max_particles {
            self.particles.remove(0);
        }
        self.particles.push(particle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_sits_on_menu() {
        let state = GameState::new(1, Tuning::default());
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.car.fuel, MAX_FUEL);
        assert_eq!(state.difficulty.level, 1);
    }

    #[test]
    fn test_start_run_resets() {
        let mut state = GameState::new(1, Tuning::default());
        state.start_run(2);
        state.score = 1234;
        state.car.fuel = 3.0;
        state.difficulty.step_up(&state.tuning);
        state.end_run(EndReason::OutOfFuel);
        assert_eq!(state.phase, GamePhase::GameOver);

        state.start_run(3);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.car.fuel, MAX_FUEL);
        assert_eq!(state.difficulty.level, 1);
        assert_eq!(state.end_reason, None);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_effects_expire_at_deadline() {
        let tuning = Tuning::default();
        let mut car = Car::new(tuning.car_speed);
        car.boost_until = Some(5.0);
        car.invincible_until = Some(3.0);
        assert_eq!(car.speed(&tuning), 7.0);
        assert_eq!(car.paint(), CarPaint::Invincible);

        car.expire_effects(3.0);
        assert_eq!(car.paint(), CarPaint::Normal);
        assert_eq!(car.speed(&tuning), 7.0);

        car.expire_effects(5.0);
        assert_eq!(car.speed(&tuning), 5.0);
    }

    #[test]
    fn test_refuel_caps_at_full() {
        let mut car = Car::new(5.0);
        car.fuel = 90.0;
        car.refuel(30.0);
        assert_eq!(car.fuel, MAX_FUEL);
    }

    #[test]
    fn test_difficulty_steps_together() {
        let tuning = Tuning::default();
        let mut d = Difficulty::new(&tuning);
        d.step_up(&tuning);
        assert_eq!(d.level, 2);
        assert_eq!(
            d.obstacle_speed_min,
            tuning.obstacle_speed_min + tuning.obstacle_speed_min_step
        );
        assert_eq!(
            d.obstacle_speed_max,
            tuning.obstacle_speed_max + tuning.obstacle_speed_max_step
        );
        assert!(d.obstacle_frequency > tuning.obstacle_frequency);
        assert!(d.fuel_rate > tuning.fuel_rate);
    }

    #[test]
    fn test_particle_cap_drops_oldest() {
        let mut state = GameState::new(1, Tuning::default());
        state.max_particles = 2;
        for i in 0..3 {
            state.push_particle(Particle {
                pos: Vec2::new(i as f32, 0.0),
                vel: Vec2::ZERO,
                life: 1.0,
                kind: PowerUpKind::Refuel,
            });
        }
        assert_eq!(state.particles.len(), 2);
        assert_eq!(state.particles[0].pos.x, 1.0);
    }

    #[test]
    fn test_stripe_offset_wraps() {
        let mut road = Road::default();
        road.scroll(Road::stripe_period() + 5.0);
        assert!((road.stripe_offset - 5.0).abs() < 1e-4);
    }
}
