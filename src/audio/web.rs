//! Web Audio playback

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use super::{SoundEffect, Volume};
use crate::sim::GameEvent;

/// One oscillator voice of a sound effect
struct Tone {
    freq: f32,
    osc_type: OscillatorType,
    /// Peak gain relative to the effective volume
    level: f32,
    /// Seconds after the effect starts
    delay: f64,
    /// Seconds until the gain has decayed
    decay: f64,
    /// Exponential frequency sweep target, reached at the end of the decay
    sweep_to: Option<f32>,
}

impl Tone {
    fn new(freq: f32, osc_type: OscillatorType, level: f32, delay: f64, decay: f64) -> Self {
        Self {
            freq,
            osc_type,
            level,
            delay,
            decay,
            sweep_to: None,
        }
    }

    fn sweep(mut self, to: f32) -> Self {
        self.sweep_to = Some(to);
        self
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: Volume,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: Volume::default(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Nudge master volume up or down by whole steps
    pub fn step_volume(&mut self, steps: i32) -> f32 {
        self.volume.step(steps)
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.volume.set_muted(muted);
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Play the sounds for a batch of simulation events
    pub fn play_events(&self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume.effective();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        for tone in Self::tones(effect) {
            self.play_tone(ctx, &tone, vol);
        }
    }

    fn tones(effect: SoundEffect) -> Vec<Tone> {
        use OscillatorType::{Sawtooth, Sine, Square, Triangle};

        match effect {
            SoundEffect::WallHit => vec![Tone::new(380.0, Sine, 0.3, 0.0, 0.08)],
            SoundEffect::BlockBreak => vec![
                // Stone crunch over a low thump
                Tone::new(900.0, Sawtooth, 0.25, 0.0, 0.12).sweep(120.0),
                Tone::new(70.0, Sine, 0.35, 0.0, 0.15),
            ],
            SoundEffect::BlockThud => vec![Tone::new(220.0, Triangle, 0.3, 0.0, 0.1).sweep(110.0)],
            SoundEffect::Header => vec![Tone::new(160.0, Sine, 0.5, 0.0, 0.1).sweep(70.0)],
            SoundEffect::ExtraLife => [660.0, 880.0, 1100.0]
                .iter()
                .enumerate()
                .map(|(i, &f)| Tone::new(f, Sine, 0.25, i as f64 * 0.08, 0.15))
                .collect(),
            SoundEffect::Serve => vec![Tone::new(200.0, Triangle, 0.25, 0.0, 0.2).sweep(500.0)],
            SoundEffect::BallLost => vec![Tone::new(320.0, Square, 0.2, 0.0, 0.5).sweep(60.0)],
            SoundEffect::Victory => [400.0, 500.0, 600.0, 800.0]
                .iter()
                .enumerate()
                .map(|(i, &f)| Tone::new(f, Triangle, 0.3, i as f64 * 0.1, 0.4))
                .collect(),
            SoundEffect::GameOver => [400.0, 350.0, 300.0, 200.0]
                .iter()
                .enumerate()
                .map(|(i, &f)| Tone::new(f, Sine, 0.3, i as f64 * 0.2, 0.3))
                .collect(),
        }
    }

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

    fn play_tone(&self, ctx: &AudioContext, tone: &Tone, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, tone.freq, tone.osc_type) else {
            return;
        };
        let t = ctx.current_time() + tone.delay;
        let end = t + tone.decay;

        gain.gain().set_value_at_time(vol * tone.level, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
        if let Some(to) = tone.sweep_to {
            osc.frequency().set_value_at_time(tone.freq, t).ok();
            osc.frequency().exponential_ramp_to_value_at_time(to, end).ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(end + 0.05).ok();
    }
}
