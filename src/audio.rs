//! Audio cues using the Web Audio API
//!
//! Procedurally generated sound effects - no external files needed.
//! The event-to-cue mapping is platform independent; playback is wasm only.

use crate::sim::{GameEvent, PowerUpKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Speed boost collected
    Boost,
    /// Invincibility collected
    Shield,
    /// Refuel collected
    Refuel,
    /// Invincible car smashed an obstacle
    Smash,
    /// Car hit an obstacle
    Crash,
    /// Tank ran dry
    OutOfFuel,
    /// Fuel dropped under the warning threshold
    LowFuel,
    /// Difficulty went up
    LevelUp,
}

impl SoundEffect {
    /// Cue for a simulation event
    ///
    /// `low_fuel_warning` mirrors the player's setting.
    pub fn for_event(event: &GameEvent, low_fuel_warning: bool) -> Option<Self> {
        match event {
            GameEvent::PowerUpCollected { kind, .. } => Some(match kind {
                PowerUpKind::SpeedBoost => SoundEffect::Boost,
                PowerUpKind::Invincibility => SoundEffect::Shield,
                PowerUpKind::Refuel => SoundEffect::Refuel,
            }),
            GameEvent::ObstacleSmashed { .. } => Some(SoundEffect::Smash),
            GameEvent::Crashed => Some(SoundEffect::Crash),
            GameEvent::OutOfFuel => Some(SoundEffect::OutOfFuel),
            GameEvent::LowFuel if low_fuel_warning => Some(SoundEffect::LowFuel),
            GameEvent::LowFuel => None,
            GameEvent::LevelUp { .. } => Some(SoundEffect::LevelUp),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, volume: 0.8 }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Set effective volume (0.0 - 1.0), already combining master/sfx/mute
        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Boost => self.play_boost(ctx, vol),
                SoundEffect::Shield => self.play_shield(ctx, vol),
                SoundEffect::Refuel => self.play_refuel(ctx, vol),
                SoundEffect::Smash => self.play_smash(ctx, vol),
                SoundEffect::Crash => self.play_crash(ctx, vol),
                SoundEffect::OutOfFuel => self.play_out_of_fuel(ctx, vol),
                SoundEffect::LowFuel => self.play_low_fuel(ctx, vol),
                SoundEffect::LevelUp => self.play_level_up(ctx, vol),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Rising whoosh
        fn play_boost(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.frequency().set_value_at_time(200.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(900.0, t + 0.25)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
        }

        /// Shimmering chord
        fn play_shield(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [660.0, 880.0, 1320.0].iter().enumerate() {
                let delay = i as f64 * 0.03;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.2, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.45).ok();
                }
            }
        }

        /// Glug glug
        fn play_refuel(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.35, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency().set_value_at_time(450.0, t + 0.08).ok();
            osc.frequency().set_value_at_time(350.0, t + 0.16).ok();
            osc.frequency().set_value_at_time(600.0, t + 0.24).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.32).ok();
        }

        /// Short crunch
        fn play_smash(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 0.12)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Low boom with a metallic crack
        fn play_crash(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            if let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.5, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                    .ok();
                osc.frequency().set_value_at_time(100.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(30.0, t + 0.5)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.6).ok();
            }
            if let Some((osc, gain)) = self.create_osc(ctx, 1500.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }

        /// Engine sputtering out
        fn play_out_of_fuel(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain().set_value_at_time(0.01, t + 0.1).ok();
            gain.gain().set_value_at_time(vol * 0.25, t + 0.2).ok();
            gain.gain().set_value_at_time(0.01, t + 0.3).ok();
            gain.gain().set_value_at_time(vol * 0.2, t + 0.45).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.8)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, t + 0.8)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.85).ok();
        }

        /// Two-tone alarm beep
        fn play_low_fuel(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [880.0, 660.0, 880.0, 660.0].iter().enumerate() {
                let start = i as f64 * 0.15;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                    let t = ctx.current_time() + start;
                    gain.gain().set_value_at_time(vol * 0.15, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.13).ok();
                }
            }
        }

        /// Ascending arpeggio
        fn play_level_up(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [523.0, 659.0, 784.0, 1047.0].iter().enumerate() {
                let start = i as f64 * 0.08;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + start;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.22).ok();
                }
            }
        }
    }
}
