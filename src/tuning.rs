//! Data-driven game balance
//!
//! Every number that shapes how the game plays lives here so it can be
//! tweaked from JSON without touching the simulation. Speeds and rates are
//! expressed per nominal 16 ms frame.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Balance constants consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Car ===
    /// Base car speed (pixels per nominal frame)
    pub car_speed: f32,
    /// Extra speed while a speed boost is active
    pub boost_amount: f32,
    /// Speed boost duration (seconds)
    pub boost_secs: f64,
    /// Invincibility duration (seconds)
    pub invincibility_secs: f64,
    /// When set, obstacles hit while invincible are smashed instead of ending the run
    pub invincibility_shields: bool,

    // === Fuel ===
    /// Fuel added by a refuel pickup
    pub refuel_amount: f32,
    /// Fuel burned per nominal frame at level 1
    pub fuel_rate: f32,
    /// Extra burn per level
    pub fuel_rate_step: f32,
    /// Fuel level at or below which the low-fuel warning fires
    pub low_fuel_threshold: f32,

    // === Obstacles ===
    pub obstacle_speed_min: f32,
    pub obstacle_speed_max: f32,
    /// Added to the low end of the speed range per level
    pub obstacle_speed_min_step: f32,
    /// Added to the high end of the speed range per level
    pub obstacle_speed_max_step: f32,
    /// Spawn probability per frame at level 1
    pub obstacle_frequency: f32,
    pub obstacle_frequency_step: f32,
    /// Spawn probability never exceeds this
    pub obstacle_frequency_cap: f32,

    // === Power-ups ===
    pub powerup_frequency: f32,
    pub powerup_speed: f32,

    // === Progression ===
    /// Score between level-ups
    pub level_interval: u64,
    /// Road stripe scroll speed (pixels per nominal frame)
    pub road_scroll_speed: f32,

    // === Effects ===
    /// Particles spawned per power-up pickup
    pub particle_burst: usize,
    /// Life lost per nominal frame (particles start at 1.0)
    pub particle_decay: f32,
    /// Max particle speed (pixels per nominal frame)
    pub particle_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            car_speed: 5.0,
            boost_amount: 2.0,
            boost_secs: 5.0,
            invincibility_secs: 5.0,
            invincibility_shields: false,

            refuel_amount: 30.0,
            fuel_rate: 0.05,
            fuel_rate_step: 0.01,
            low_fuel_threshold: 20.0,

            obstacle_speed_min: 2.0,
            obstacle_speed_max: 4.0,
            obstacle_speed_min_step: 0.5,
            obstacle_speed_max_step: 1.0,
            obstacle_frequency: 0.02,
            obstacle_frequency_step: 0.005,
            obstacle_frequency_cap: 0.2,

            powerup_frequency: 0.005,
            powerup_speed: 2.0,

            level_interval: 1000,
            road_scroll_speed: 6.0,

            particle_burst: 20,
            particle_decay: 0.02,
            particle_speed: 3.0,
        }
    }
}

impl Tuning {
    /// Storage key for balance overrides
    pub const STORAGE_KEY: &'static str = "road_rush_tuning";

    /// Overrides from `store`, or defaults when absent or malformed
    pub fn load(store: &dyn KeyValueStore) -> Self {
        store
            .get_item(Self::STORAGE_KEY)
            .and_then(|json| Self::from_json(&json))
            .unwrap_or_default()
    }

    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(tuning) => Some(tuning),
            Err(e) => {
                log::warn!("Ignoring malformed tuning: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"car_speed": 7.5}"#).unwrap();
        assert_eq!(tuning.car_speed, 7.5);
        assert_eq!(tuning.refuel_amount, Tuning::default().refuel_amount);
        assert_eq!(tuning.level_interval, 1000);
    }

    #[test]
    fn test_load_from_store() {
        use crate::persistence::MemoryStore;

        let mut store = MemoryStore::new();
        assert_eq!(Tuning::load(&store), Tuning::default());

        store.set_item(Tuning::STORAGE_KEY, r#"{"level_interval": 500}"#);
        assert_eq!(Tuning::load(&store).level_interval, 500);

        store.set_item(Tuning::STORAGE_KEY, "{");
        assert_eq!(Tuning::load(&store), Tuning::default());
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(Tuning::from_json("not json").is_none());
        assert!(Tuning::from_json(r#"{"car_speed": "fast"}"#).is_none());
    }
}
