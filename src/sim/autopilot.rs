//! Demo-mode driver
//!
//! A simple reactive heuristic: dodge the closest obstacle about to land on
//! the car, otherwise chase refuels when the tank runs low, otherwise drift
//! back to the middle of the road. Used by the headless runner and the
//! browser's demo toggle.

use glam::Vec2;

use super::state::{GameState, PowerUpKind};
use crate::consts::CAR_START_Y;

/// How far above the car an obstacle counts as a threat (pixels)
const LOOKAHEAD: f32 = 260.0;
/// Horizontal clearance kept around the car when judging threats
const MARGIN: f32 = 12.0;
/// Ignore horizontal errors smaller than this
const DEADBAND: f32 = 4.0;
/// Start looking for refuels below this much fuel
const HUNGRY_FUEL: f32 = 45.0;

/// Steering (each axis in {-1, 0, 1}) the autopilot wants this frame
pub fn steer(state: &GameState) -> Vec2 {
    let car = &state.car;
    let car_left = car.pos.x - MARGIN;
    let car_right = car.pos.x + car.size.x + MARGIN;
    let car_top = car.pos.y;
    let car_bottom = car.pos.y + car.size.y;

    // Closest obstacle overlapping our lane and about to reach us
    let threat = state
        .obstacles
        .iter()
        .filter(|o| o.pos.x < car_right && o.pos.x + o.size.x > car_left)
        .filter(|o| o.pos.y < car_bottom && o.pos.y + o.size.y > car_top - LOOKAHEAD)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    // Where the car's center should go
    let target_x = if let Some(obstacle) = threat {
        let road_left = state.road.x;
        let road_right = state.road.x + state.road.width;
        let room_left = obstacle.pos.x - road_left;
        let room_right = road_right - (obstacle.pos.x + obstacle.size.x);
        let needed = car.size.x + MARGIN;
        if room_left >= needed && (room_left >= room_right || room_right < needed) {
            obstacle.pos.x - MARGIN - car.size.x / 2.0
        } else {
            obstacle.pos.x + obstacle.size.x + MARGIN + car.size.x / 2.0
        }
    } else if car.fuel < HUNGRY_FUEL {
        state
            .powerups
            .iter()
            .filter(|p| p.kind == PowerUpKind::Refuel && p.pos.y < car_bottom)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|p| p.center().x)
            .unwrap_or(state.road.center_x())
    } else {
        state.road.center_x()
    };

    let dx = target_x - car.center().x;
    let x = if dx.abs() <= DEADBAND { 0.0 } else { dx.signum() };

    // Hold the starting row
    let dy = CAR_START_Y - car.pos.y;
    let y = if dy.abs() <= DEADBAND { 0.0 } else { dy.signum() };

    Vec2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{Obstacle, PowerUp};
    use crate::sim::tick;
    use crate::tuning::Tuning;

    fn playing() -> GameState {
        let mut state = GameState::new(1, Tuning::default());
        state.start_run(1);
        state
    }

    #[test]
    fn test_dodges_obstacle_overhead() {
        let mut state = playing();
        state.obstacles.push(Obstacle {
            pos: Vec2::new(state.car.pos.x, state.car.pos.y - 150.0),
            size: Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
            speed: 3.0,
            paint: 0,
        });
        assert_ne!(steer(&state).x, 0.0);
    }

    #[test]
    fn test_ignores_obstacles_in_other_lanes() {
        let mut state = playing();
        state.car.pos.x = state.road.center_x() - CAR_WIDTH / 2.0;
        state.obstacles.push(Obstacle {
            pos: Vec2::new(ROAD_X, state.car.pos.y - 150.0),
            size: Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
            speed: 3.0,
            paint: 0,
        });
        assert_eq!(steer(&state), Vec2::ZERO);
    }

    #[test]
    fn test_centers_car_on_road() {
        let mut state = playing();
        // Car center within the deadband of the road center
        state.car.pos.x = state.road.center_x() - CAR_WIDTH / 2.0 + 3.0;
        assert_eq!(state.car.center().x, state.road.center_x() + 3.0);
        assert_eq!(steer(&state).x, 0.0);

        state.car.pos.x = ROAD_X;
        assert_eq!(steer(&state).x, 1.0);
    }

    #[test]
    fn test_chases_refuel_when_hungry() {
        let mut state = playing();
        state.car.fuel = 10.0;
        state.powerups.push(PowerUp {
            pos: Vec2::new(ROAD_X, 100.0),
            size: Vec2::splat(POWERUP_SIZE),
            speed: 2.0,
            kind: PowerUpKind::Refuel,
        });
        assert_eq!(steer(&state).x, -1.0);
    }

    #[test]
    fn test_autopilot_survives_a_while() {
        let mut state = playing();
        for _ in 0..600 {
            let wanted = steer(&state);
            state.car.steer = wanted;
            tick(&mut state, NOMINAL_FRAME_MS);
        }
        assert!(state.score > 0);
    }
}
