//! Per-frame simulation tick
//!
//! One call advances a playing run by the host's frame delta. Speeds are
//! tuned per nominal 16 ms frame and scaled by the actual delta. Steps run
//! in a fixed order: effects expiry, car, falling entities, obstacle
//! collisions, pickups, fuel, difficulty, particles, spawning, score.

use super::collision::first_overlap;
use super::spawn;
use super::state::{EndReason, GameEvent, GamePhase, GameState, PowerUpKind};
use crate::consts::*;
use crate::frame_scale;

/// Advance the game by one frame of `dt_ms` milliseconds
///
/// Does nothing outside [`GamePhase::Playing`].
pub fn tick(state: &mut GameState, dt_ms: f32) {
    match state.phase {
        GamePhase::Playing => {}
        GamePhase::Menu
        | GamePhase::Instructions
        | GamePhase::HighScores
        | GamePhase::GameOver => return,
    }

    let dt_ms = dt_ms.clamp(0.0, MAX_FRAME_MS);
    let scale = frame_scale(dt_ms);
    state.time_secs += dt_ms as f64 / 1000.0;
    state.car.expire_effects(state.time_secs);

    move_car(state, scale);
    move_falling(state, scale);

    if check_obstacles(state) {
        return;
    }
    collect_powerups(state);

    if burn_fuel(state, scale) {
        return;
    }
    ramp_difficulty(state);
    update_particles(state, scale);
    spawn::maybe_spawn(state);

    state.score += 1;
}

fn move_car(state: &mut GameState, scale: f32) {
    let vel = state.car.velocity(&state.tuning);
    state.car.pos += vel * scale;
    state.car.clamp_to(&state.road);
}

/// Move obstacles and power-ups down, dropping whatever left the canvas
fn move_falling(state: &mut GameState, scale: f32) {
    for obstacle in &mut state.obstacles {
        obstacle.pos.y += obstacle.speed * scale;
    }
    state.obstacles.retain(|o| o.pos.y < CANVAS_HEIGHT);

    for powerup in &mut state.powerups {
        powerup.pos.y += powerup.speed * scale;
    }
    state.powerups.retain(|p| p.pos.y < CANVAS_HEIGHT);

    state.road.scroll(state.tuning.road_scroll_speed * scale);
}

/// Returns true when the run ended
fn check_obstacles(state: &mut GameState) -> bool {
    let car_box = state.car.bounds();

    if state.car.is_invincible() && state.tuning.invincibility_shields {
        let mut smashed = Vec::new();
        state.obstacles.retain(|o| {
            let hit = car_box.overlaps(&o.bounds());
            if hit {
                smashed.push(o.bounds().center());
            }
            !hit
        });
        for pos in smashed {
            state.events.push(GameEvent::ObstacleSmashed { pos });
        }
        return false;
    }

    if first_overlap(&car_box, state.obstacles.iter().map(|o| o.bounds())).is_some() {
        state.end_run(EndReason::Crash);
        return true;
    }
    false
}

fn collect_powerups(state: &mut GameState) {
    let car_box = state.car.bounds();
    let mut collected = Vec::new();
    state.powerups.retain(|p| {
        let hit = car_box.overlaps(&p.bounds());
        if hit {
            collected.push((p.kind, p.center()));
        }
        !hit
    });

    for (kind, pos) in collected {
        apply_powerup(state, kind);
        spawn::spawn_burst(state, pos, kind);
        state.events.push(GameEvent::PowerUpCollected { kind, pos });
    }
}

/// Apply a collected power-up to the car
///
/// Timed effects restart their full duration when picked up again.
pub fn apply_powerup(state: &mut GameState, kind: PowerUpKind) {
    let now = state.time_secs;
    match kind {
        PowerUpKind::SpeedBoost => {
            state.car.boost_until = Some(now + state.tuning.boost_secs);
        }
        PowerUpKind::Invincibility => {
            state.car.invincible_until = Some(now + state.tuning.invincibility_secs);
        }
        PowerUpKind::Refuel => {
            state.car.refuel(state.tuning.refuel_amount);
            if state.car.fuel > state.tuning.low_fuel_threshold {
                state.low_fuel_warned = false;
            }
        }
    }
}

/// Returns true when the tank ran dry
fn burn_fuel(state: &mut GameState, scale: f32) -> bool {
    state.car.fuel = (state.car.fuel - state.difficulty.fuel_rate * scale).clamp(0.0, MAX_FUEL);

    if state.car.fuel <= 0.0 {
        state.end_run(EndReason::OutOfFuel);
        return true;
    }

    if state.car.fuel <= state.tuning.low_fuel_threshold && !state.low_fuel_warned {
        state.low_fuel_warned = true;
        state.events.push(GameEvent::LowFuel);
    }
    false
}

fn ramp_difficulty(state: &mut GameState) {
    if state.score > 0 && state.score.is_multiple_of(state.tuning.level_interval) {
        state.difficulty.step_up(&state.tuning);
        let level = state.difficulty.level;
        state.events.push(GameEvent::LevelUp { level });
        log::info!(
            "Level {}: obstacle speed {:.1}-{:.1}, frequency {:.3}, fuel rate {:.3}",
            level,
            state.difficulty.obstacle_speed_min,
            state.difficulty.obstacle_speed_max,
            state.difficulty.obstacle_frequency,
            state.difficulty.fuel_rate
        );
    }
}

fn update_particles(state: &mut GameState, scale: f32) {
    let decay = state.tuning.particle_decay;
    for particle in &mut state.particles {
        particle.pos += particle.vel * scale;
        particle.vel *= 0.98;
        particle.life -= decay * scale;
    }
    state.particles.retain(|p| p.life > 0.0);
}
