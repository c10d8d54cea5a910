//! Audio cues using the Web Audio API
//!
//! Every effect is a short oscillator envelope, so no sound files ship with the game.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::events::{GameHooks, SessionOutcome};
use crate::sim::progression::VictoryGrade;
use crate::sim::state::ObstacleKind;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Jump from the ground
    Jump,
    /// Reduced mid-air jump
    AirJump,
    /// Ran into an obstacle
    Collision(ObstacleKind),
    /// Entered the next scenario
    ScenarioAdvance,
    /// Treasure found
    Victory,
    /// Session began
    SessionStart,
    /// Session lost
    GameOver,
}

/// Audio manager for the game.
///
/// Holds the audio context only. Volume and mute come from the [`Settings`]
/// passed to [`cues`](Self::cues) at dispatch time.
pub struct AudioManager {
    ctx: Option<AudioContext>,
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
        Self { ctx }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Event sink playing at the volume `settings` currently asks for
    pub fn cues(&self, settings: &Settings) -> AudioCues<'_> {
        AudioCues {
            audio: self,
            volume: settings.effective_volume(),
        }
    }

    /// Play a sound effect at `vol`; silent when `vol` is zero
    pub fn play(&self, effect: SoundEffect, vol: f32) {
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Browsers start the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Jump => self.play_sweep(ctx, vol, 220.0, 520.0, 0.15),
            SoundEffect::AirJump => self.play_sweep(ctx, vol * 0.8, 360.0, 760.0, 0.12),
            SoundEffect::Collision(kind) => self.play_collision(ctx, vol, kind),
            SoundEffect::ScenarioAdvance => {
                self.play_notes(ctx, vol, &[400.0, 500.0, 600.0, 800.0], 0.1, OscillatorType::Triangle)
            }
            SoundEffect::Victory => self.play_notes(
                ctx,
                vol,
                &[500.0, 600.0, 700.0, 800.0, 1000.0],
                0.08,
                OscillatorType::Triangle,
            ),
            SoundEffect::SessionStart => {
                self.play_notes(ctx, vol, &[600.0, 800.0, 1000.0], 0.08, OscillatorType::Sine)
            }
            SoundEffect::GameOver => {
                self.play_notes(ctx, vol, &[400.0, 350.0, 300.0, 200.0], 0.2, OscillatorType::Sine)
            }
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

    /// Rising whoosh from `from` to `to` Hz
    fn play_sweep(&self, ctx: &AudioContext, vol: f32, from: f32, to: f32, len: f64) {
        let Some((osc, gain)) = self.create_osc(ctx, from, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + len + 0.05)
            .ok();
        osc.frequency().set_value_at_time(from, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(to, t + len)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + len + 0.1).ok();
    }

    /// Impact thump, pitched per obstacle
    fn play_collision(&self, ctx: &AudioContext, vol: f32, kind: ObstacleKind) {
        let (start, osc_type) = match kind {
            ObstacleKind::Rock => (150.0, OscillatorType::Sine),
            ObstacleKind::Fruit => (260.0, OscillatorType::Triangle),
            ObstacleKind::Lamp => (420.0, OscillatorType::Square),
        };
        let Some((osc, gain)) = self.create_osc(ctx, start, osc_type) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.6, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok();
        osc.frequency().set_value_at_time(start, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(40.0, t + 0.3)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.35).ok();
    }

    /// Short arpeggio, one note every `spacing` seconds
    fn play_notes(
        &self,
        ctx: &AudioContext,
        vol: f32,
        freqs: &[f32],
        spacing: f64,
        osc_type: OscillatorType,
    ) {
        for (i, freq) in freqs.iter().enumerate() {
            let delay = i as f64 * spacing;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + spacing * 2.5)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + spacing * 3.0).ok();
            }
        }
    }
}

/// [`AudioManager`] bound to one dispatch's volume
pub struct AudioCues<'a> {
    audio: &'a AudioManager,
    volume: f32,
}

impl AudioCues<'_> {
    fn play(&self, effect: SoundEffect) {
        self.audio.play(effect, self.volume);
    }
}

impl GameHooks for AudioCues<'_> {
    fn on_session_start(&mut self) {
        self.play(SoundEffect::SessionStart);
    }

    fn on_jump(&mut self, airborne: bool) {
        self.play(if airborne {
            SoundEffect::AirJump
        } else {
            SoundEffect::Jump
        });
    }

    fn on_collision(&mut self, kind: ObstacleKind) {
        self.play(SoundEffect::Collision(kind));
    }

    fn on_scenario_advance(&mut self, _index: usize) {
        self.play(SoundEffect::ScenarioAdvance);
    }

    fn on_victory(&mut self, _grade: VictoryGrade) {
        self.play(SoundEffect::Victory);
    }

    fn on_session_end(&mut self, outcome: SessionOutcome) {
        if outcome == SessionOutcome::Collided {
            self.play(SoundEffect::GameOver);
        }
    }
}
