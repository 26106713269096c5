//! Audio using the Web Audio API
//!
//! Procedurally generated sound effects, one per game event worth hearing.

use crate::sim::{FailureCause, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Wing flap
    Flap,
    /// Pipe cleared
    Score,
    /// Hit a pipe or left the field
    Crash,
    /// Quiz answered correctly
    Correct,
    /// Quiz answered incorrectly
    Wrong,
    /// Countdown finished
    Go,
    /// Run over
    GameOver,
}

impl SoundEffect {
    /// Sound to play for an event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Flapped => Some(SoundEffect::Flap),
            GameEvent::ObstaclePassed { .. } => Some(SoundEffect::Score),
            GameEvent::Failure {
                cause: FailureCause::Boundary | FailureCause::Collision,
                ..
            } => Some(SoundEffect::Crash),
            GameEvent::AnswerCorrect => Some(SoundEffect::Correct),
            GameEvent::AnswerWrong => Some(SoundEffect::Wrong),
            GameEvent::Resumed => Some(SoundEffect::Go),
            GameEvent::FinalScore { .. } => Some(SoundEffect::GameOver),
            _ => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
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
            Self {
                ctx,
                volume: 0.8,
                muted: false,
            }
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        pub fn is_muted(&self) -> bool {
            self.muted
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = if self.muted { 0.0 } else { self.volume };
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Flap => self.play_flap(ctx, vol),
                SoundEffect::Score => self.play_score(ctx, vol),
                SoundEffect::Crash => self.play_crash(ctx, vol),
                SoundEffect::Correct => self.play_correct(ctx, vol),
                SoundEffect::Wrong => self.play_wrong(ctx, vol),
                SoundEffect::Go => self.play_go(ctx, vol),
                SoundEffect::GameOver => self.play_game_over(ctx, vol),
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

        /// Single enveloped tone with an optional pitch sweep
        #[allow(clippy::too_many_arguments)]
        fn sweep(
            &self,
            ctx: &AudioContext,
            from: f32,
            to: f32,
            osc_type: OscillatorType,
            peak: f32,
            offset: f64,
            duration: f64,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
                return;
            };
            let t = ctx.current_time() + offset;

            gain.gain().set_value_at_time(peak, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + duration)
                .ok();
            osc.frequency().set_value_at_time(from, t).ok();
            if to != from {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(to, t + duration)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + duration + 0.02).ok();
        }

        /// Flap - short upward chirp
        fn play_flap(&self, ctx: &AudioContext, vol: f32) {
            self.sweep(ctx, 300.0, 600.0, OscillatorType::Sine, vol * 0.25, 0.0, 0.08);
        }

        /// Score - two-note ding
        fn play_score(&self, ctx: &AudioContext, vol: f32) {
            self.sweep(ctx, 880.0, 880.0, OscillatorType::Triangle, vol * 0.3, 0.0, 0.08);
            self.sweep(ctx, 1320.0, 1320.0, OscillatorType::Triangle, vol * 0.3, 0.08, 0.12);
        }

        /// Crash - falling sawtooth
        fn play_crash(&self, ctx: &AudioContext, vol: f32) {
            self.sweep(ctx, 400.0, 80.0, OscillatorType::Sawtooth, vol * 0.3, 0.0, 0.4);
        }

        /// Correct - rising arpeggio
        fn play_correct(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [523.0, 659.0, 784.0].into_iter().enumerate() {
                let offset = i as f64 * 0.08;
                self.sweep(ctx, freq, freq, OscillatorType::Square, vol * 0.15, offset, 0.1);
            }
        }

        /// Wrong - low buzz
        fn play_wrong(&self, ctx: &AudioContext, vol: f32) {
            self.sweep(ctx, 150.0, 110.0, OscillatorType::Square, vol * 0.2, 0.0, 0.3);
        }

        /// Go - bright blip
        fn play_go(&self, ctx: &AudioContext, vol: f32) {
            self.sweep(ctx, 1046.0, 1046.0, OscillatorType::Sine, vol * 0.3, 0.0, 0.15);
        }

        /// Game over - descending three notes
        fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [392.0, 330.0, 262.0].into_iter().enumerate() {
                let offset = i as f64 * 0.2;
                self.sweep(ctx, freq, freq * 0.95, OscillatorType::Triangle, vol * 0.3, offset, 0.25);
            }
        }
    }
}
