//! Randomized spawning of obstacles, power-ups and particle bursts

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, OBSTACLE_PAINTS, Obstacle, Particle, PowerUp, PowerUpKind};
use crate::consts::*;

/// Roll the per-frame spawn chances for an obstacle and a power-up
pub fn maybe_spawn(state: &mut GameState) {
    let roll: f32 = state.rng.random();
    if roll < state.difficulty.obstacle_frequency {
        spawn_obstacle(state);
    }

    let roll: f32 = state.rng.random();
    if roll < state.tuning.powerup_frequency {
        spawn_powerup(state);
    }
}

/// Uniform x such that a `width`-wide entity stays on the road
fn random_lane_x(state: &mut GameState, width: f32) -> f32 {
    let span = (state.road.width - width).max(0.0);
    state.road.x + state.rng.random::<f32>() * span
}

/// Drop a new obstacle just above the visible road
pub fn spawn_obstacle(state: &mut GameState) {
    let x = random_lane_x(state, OBSTACLE_WIDTH);
    let lo = state.difficulty.obstacle_speed_min;
    let hi = state.difficulty.obstacle_speed_max.max(lo);
    let speed = state.rng.random_range(lo..=hi);
    let paint = state.rng.random_range(0..OBSTACLE_PAINTS);

    state.obstacles.push(Obstacle {
        pos: Vec2::new(x, -OBSTACLE_HEIGHT),
        size: Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
        speed,
        paint,
    });
}

/// Drop a new power-up of a random kind just above the visible road
pub fn spawn_powerup(state: &mut GameState) {
    let x = random_lane_x(state, POWERUP_SIZE);
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];

    state.powerups.push(PowerUp {
        pos: Vec2::new(x, -POWERUP_SIZE),
        size: Vec2::splat(POWERUP_SIZE),
        speed: state.tuning.powerup_speed,
        kind,
    });
}

/// Spray particles outward from a pickup point
pub fn spawn_burst(state: &mut GameState, center: Vec2, kind: PowerUpKind) {
    let count = state.tuning.particle_burst.min(state.max_particles);
    let max_speed = state.tuning.particle_speed.max(0.5);

    for _ in 0..count {
        let angle = state.rng.random::<f32>() * std::f32::consts::TAU;
        let speed = state.rng.random_range(0.5..=max_speed);
        let life = state.rng.random_range(0.6..=1.0);
        state.push_particle(Particle {
            pos: center,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life,
            kind,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_obstacles_spawn_on_road_above_view() {
        let mut state = GameState::new(7, Tuning::default());
        state.start_run(7);
        for _ in 0..200 {
            spawn_obstacle(&mut state);
        }
        for o in &state.obstacles {
            assert!(o.pos.x >= ROAD_X);
            assert!(o.pos.x + o.size.x <= ROAD_X + ROAD_WIDTH);
            assert_eq!(o.pos.y, -OBSTACLE_HEIGHT);
            assert!(o.speed >= state.difficulty.obstacle_speed_min);
            assert!(o.speed <= state.difficulty.obstacle_speed_max);
            assert!(o.paint < OBSTACLE_PAINTS);
        }
    }

    #[test]
    fn test_all_powerup_kinds_appear() {
        let mut state = GameState::new(11, Tuning::default());
        state.start_run(11);
        for _ in 0..300 {
            spawn_powerup(&mut state);
        }
        for kind in PowerUpKind::ALL {
            assert!(state.powerups.iter().any(|p| p.kind == kind), "{kind:?} never spawned");
        }
    }

    #[test]
    fn test_zero_frequency_never_spawns() {
        let tuning = Tuning {
            obstacle_frequency: 0.0,
            powerup_frequency: 0.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(3, tuning);
        state.start_run(3);
        for _ in 0..1000 {
            maybe_spawn(&mut state);
        }
        assert!(state.obstacles.is_empty());
        assert!(state.powerups.is_empty());
    }

    #[test]
    fn test_certain_frequency_spawns_every_frame() {
        let tuning = Tuning {
            obstacle_frequency: 1.0,
            powerup_frequency: 1.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(3, tuning);
        state.start_run(3);
        for _ in 0..10 {
            maybe_spawn(&mut state);
        }
        assert_eq!(state.obstacles.len(), 10);
        assert_eq!(state.powerups.len(), 10);
    }

    #[test]
    fn test_burst_respects_particle_cap() {
        let mut state = GameState::new(5, Tuning::default());
        state.max_particles = 8;
        spawn_burst(&mut state, Vec2::new(300.0, 300.0), PowerUpKind::Refuel);
        assert_eq!(state.particles.len(), 8);

        state.max_particles = 0;
        state.particles.clear();
        spawn_burst(&mut state, Vec2::new(300.0, 300.0), PowerUpKind::Refuel);
        assert!(state.particles.is_empty());
    }
}
