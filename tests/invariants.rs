//! Property tests: frame invariants that must hold for any seed, input
//! sequence and frame timing.

use glam::Vec2;
use proptest::prelude::*;
use road_rush::consts::*;
use road_rush::sim::{GamePhase, GameState, Key, Rect, key_down, key_up, tick};
use road_rush::Tuning;

/// One frame of player input followed by a tick of `dt_ms`
#[derive(Debug, Clone)]
struct Frame {
    press: Option<Key>,
    release: Option<Key>,
    dt_ms: f32,
}

fn direction() -> impl Strategy<Value = Key> {
    prop_oneof![
        Just(Key::Up),
        Just(Key::Down),
        Just(Key::Left),
        Just(Key::Right),
    ]
}

fn frame() -> impl Strategy<Value = Frame> {
    (
        proptest::option::of(direction()),
        proptest::option::of(direction()),
        // Includes stalls longer than the clamp
        0.0f32..250.0,
    )
        .prop_map(|(press, release, dt_ms)| Frame { press, release, dt_ms })
}

fn playing(seed: u64) -> GameState {
    // Busy road so collisions and pickups actually happen
    let tuning = Tuning {
        obstacle_frequency: 0.08,
        powerup_frequency: 0.05,
        ..Tuning::default()
    };
    let mut state = GameState::new(seed, tuning);
    state.start_run(seed);
    state
}

fn assert_frame_invariants(state: &GameState) -> Result<(), TestCaseError> {
    let car = &state.car;
    prop_assert!(car.pos.x >= ROAD_X, "car left of road: {}", car.pos.x);
    prop_assert!(car.pos.x + car.size.x <= ROAD_X + ROAD_WIDTH, "car right of road: {}", car.pos.x);
    prop_assert!(car.pos.y >= 0.0 && car.pos.y + car.size.y <= CANVAS_HEIGHT);
    prop_assert!((0.0..=MAX_FUEL).contains(&car.fuel), "fuel {}", car.fuel);

    for o in &state.obstacles {
        prop_assert!(o.pos.y < CANVAS_HEIGHT, "obstacle below canvas: {}", o.pos.y);
        prop_assert!(o.pos.x >= ROAD_X && o.pos.x + o.size.x <= ROAD_X + ROAD_WIDTH);
    }
    for p in &state.powerups {
        prop_assert!(p.pos.y < CANVAS_HEIGHT, "power-up below canvas: {}", p.pos.y);
    }
    prop_assert!(state.particles.len() <= state.max_particles);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn frames_keep_invariants(
        seed in any::<u64>(),
        frames in prop::collection::vec(frame(), 1..400),
    ) {
        let mut state = playing(seed);

        for f in frames {
            if let Some(key) = f.press {
                key_down(&mut state.car, key);
            }
            if let Some(key) = f.release {
                key_up(&mut state.car, key);
            }

            let score_before = state.score;
            tick(&mut state, f.dt_ms);
            assert_frame_invariants(&state)?;

            match state.phase {
                GamePhase::Playing => prop_assert_eq!(state.score, score_before + 1),
                GamePhase::GameOver => {
                    prop_assert_eq!(state.score, score_before);
                    prop_assert!(state.end_reason.is_some());
                    break;
                }
                other => prop_assert!(false, "unexpected phase {:?}", other),
            }
        }
    }

    #[test]
    fn level_tracks_score(seed in any::<u64>(), steps in 1usize..3000) {
        let mut state = playing(seed);
        state.car.fuel = MAX_FUEL;
        for _ in 0..steps {
            // Keep the tank topped up so the run only ends by crashing
            state.car.fuel = MAX_FUEL;
            tick(&mut state, NOMINAL_FRAME_MS);
            if state.phase != GamePhase::Playing {
                break;
            }
        }
        let interval = state.tuning.level_interval;
        // Level-up is checked before the frame's point is added
        let expected = 1 + state.score.saturating_sub(1) / interval;
        prop_assert_eq!(state.difficulty.level as u64, expected);
        prop_assert!(state.difficulty.obstacle_frequency <= state.tuning.obstacle_frequency_cap);
    }

    #[test]
    fn aabb_overlap_is_symmetric(
        ax in -100.0f32..100.0, ay in -100.0f32..100.0, aw in 0.1f32..80.0, ah in 0.1f32..80.0,
        bx in -100.0f32..100.0, by in -100.0f32..100.0, bw in 0.1f32..80.0, bh in 0.1f32..80.0,
    ) {
        let a = Rect::new(Vec2::new(ax, ay), Vec2::new(aw, ah));
        let b = Rect::new(Vec2::new(bx, by), Vec2::new(bw, bh));
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        prop_assert!(a.overlaps(&a));
    }

    #[test]
    fn touching_boxes_never_overlap(
        x in -100.0f32..100.0, y in -100.0f32..100.0, w in 1.0f32..80.0, h in 1.0f32..80.0,
    ) {
        let a = Rect::new(Vec2::new(x, y), Vec2::new(w, h));
        let right = Rect::new(Vec2::new(a.right(), y), Vec2::new(w, h));
        let below = Rect::new(Vec2::new(x, a.bottom()), Vec2::new(w, h));
        prop_assert!(!a.overlaps(&right));
        prop_assert!(!a.overlaps(&below));
    }
}
