//! Scene assembly: turns a `GameState` into one triangle list

use glam::Vec2;

use super::shapes::{circle, fade, rect};
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::sim::{CarPaint, GamePhase, GameState, PowerUpKind, Road};

/// Particle radius at full life
const PARTICLE_RADIUS: f32 = 3.0;
/// Fuel gauge placement (left verge)
const GAUGE_POS: Vec2 = Vec2::new(20.0, 20.0);
const GAUGE_SIZE: Vec2 = Vec2::new(110.0, 14.0);

pub fn powerup_color(kind: PowerUpKind) -> [f32; 4] {
    match kind {
        PowerUpKind::SpeedBoost => colors::SPEED_BOOST,
        PowerUpKind::Invincibility => colors::INVINCIBILITY,
        PowerUpKind::Refuel => colors::REFUEL,
    }
}

/// Build every vertex for the current frame, back to front
pub fn build(state: &GameState, circle_segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(1024);
    road(&mut vertices, &state.road);

    match state.phase {
        GamePhase::Playing | GamePhase::GameOver => {
            entities(&mut vertices, state, circle_segments);
            fuel_gauge(&mut vertices, state);
        }
        // Menus draw over an empty road
        GamePhase::Menu | GamePhase::Instructions | GamePhase::HighScores => {}
    }

    vertices
}

fn road(out: &mut Vec<Vertex>, road: &Road) {
    out.extend(rect(
        Vec2::ZERO,
        Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
        colors::GRASS,
    ));
    out.extend(rect(
        Vec2::new(road.x, 0.0),
        Vec2::new(road.width, CANVAS_HEIGHT),
        colors::ROAD,
    ));

    let period = Road::stripe_period();
    let x = road.center_x() - STRIPE_WIDTH / 2.0;
    let mut y = road.stripe_offset - period;
    while y < CANVAS_HEIGHT {
        out.extend(rect(
            Vec2::new(x, y),
            Vec2::new(STRIPE_WIDTH, STRIPE_HEIGHT),
            colors::STRIPE,
        ));
        y += period;
    }
}

fn entities(out: &mut Vec<Vertex>, state: &GameState, segments: u32) {
    for obstacle in &state.obstacles {
        let color = colors::OBSTACLES[obstacle.paint as usize % colors::OBSTACLES.len()];
        out.extend(rect(obstacle.pos, obstacle.size, color));
    }

    for powerup in &state.powerups {
        out.extend(circle(
            powerup.center(),
            powerup.size.x / 2.0,
            powerup_color(powerup.kind),
            segments,
        ));
    }

    let car_color = match state.car.paint() {
        CarPaint::Normal => colors::CAR,
        CarPaint::Invincible => colors::CAR_INVINCIBLE,
    };
    out.extend(rect(state.car.pos, state.car.size, car_color));

    for particle in &state.particles {
        out.extend(circle(
            particle.pos,
            PARTICLE_RADIUS * particle.life.max(0.2),
            fade(powerup_color(particle.kind), particle.life),
            segments.min(8),
        ));
    }
}

fn fuel_gauge(out: &mut Vec<Vertex>, state: &GameState) {
    out.extend(rect(GAUGE_POS, GAUGE_SIZE, colors::FUEL_GAUGE_BACK));

    let fraction = (state.car.fuel / MAX_FUEL).clamp(0.0, 1.0);
    let color = if state.car.fuel <= state.tuning.low_fuel_threshold {
        colors::FUEL_GAUGE_LOW
    } else {
        colors::FUEL_GAUGE
    };
    out.extend(rect(
        GAUGE_POS,
        Vec2::new(GAUGE_SIZE.x * fraction, GAUGE_SIZE.y),
        color,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Obstacle, tick};
    use crate::tuning::Tuning;

    fn stripes() -> usize {
        let period = Road::stripe_period();
        ((CANVAS_HEIGHT + period) / period).ceil() as usize
    }

    #[test]
    fn test_menu_draws_only_road() {
        let state = GameState::new(1, Tuning::default());
        let vertices = build(&state, 16);
        assert_eq!(vertices.len(), 6 * (2 + stripes()));
    }

    #[test]
    fn test_playing_draws_entities_and_gauge() {
        let mut state = GameState::new(1, Tuning::default());
        state.start_run(1);
        let base = build(&state, 16).len();

        state.obstacles.push(Obstacle {
            pos: Vec2::new(200.0, 10.0),
            size: Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
            speed: 1.0,
            paint: 2,
        });
        assert_eq!(build(&state, 16).len(), base + 6);
    }

    #[test]
    fn test_car_color_follows_paint() {
        let mut state = GameState::new(1, Tuning::default());
        state.start_run(1);
        state.car.invincible_until = Some(5.0);
        let vertices = build(&state, 16);
        assert!(vertices.iter().any(|v| v.color == colors::CAR_INVINCIBLE));
        assert!(!vertices.iter().any(|v| v.color == colors::CAR));
    }

    #[test]
    fn test_vertices_stay_near_canvas() {
        let mut state = GameState::new(5, Tuning::default());
        state.start_run(5);
        for _ in 0..300 {
            tick(&mut state, NOMINAL_FRAME_MS);
        }
        for v in build(&state, 16) {
            assert!(v.position[0] >= -PARTICLE_RADIUS * 100.0);
            assert!(v.position[1] >= -Road::stripe_period() - OBSTACLE_HEIGHT);
            assert!(v.position[1] <= CANVAS_HEIGHT + Road::stripe_period() + OBSTACLE_HEIGHT);
        }
    }
}
