//! Audio system
//!
//! Procedurally generated sound effects - no external files needed!
//! Playback goes through the Web Audio API, so `AudioManager` only exists on
//! wasm.

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

use crate::sim::{GameEvent, Outcome};

/// Master volume change per key press
pub const VOLUME_STEP: f32 = 0.1;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits a castle or side wall
    WallHit,
    /// Ball knocks a block out
    BlockBreak,
    /// Ball hits the indestructible block
    BlockThud,
    /// Princess heads the ball
    Header,
    /// Extra life granted
    ExtraLife,
    /// New ball served
    Serve,
    /// Ball dropped off the bottom
    BallLost,
    /// Castle cleared
    Victory,
    /// Out of lives
    GameOver,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::WallBounce => Some(SoundEffect::WallHit),
            GameEvent::BlockDestroyed { .. } => Some(SoundEffect::BlockBreak),
            GameEvent::BlockBounce { .. } => Some(SoundEffect::BlockThud),
            GameEvent::Deflected { .. } => Some(SoundEffect::Header),
            GameEvent::ExtraLife { .. } => Some(SoundEffect::ExtraLife),
            GameEvent::BallSpawned { .. } => Some(SoundEffect::Serve),
            GameEvent::BallLost { .. } => Some(SoundEffect::BallLost),
            GameEvent::GameEnded { outcome: Outcome::Won } => Some(SoundEffect::Victory),
            GameEvent::GameEnded { outcome: Outcome::Lost } => Some(SoundEffect::GameOver),
            GameEvent::LifeLost { .. } => None,
        }
    }
}

/// Master volume and mute switch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    master: f32,
    muted: bool,
}

impl Default for Volume {
    fn default() -> Self {
        Self {
            master: 0.8,
            muted: false,
        }
    }
}

impl Volume {
    pub fn master(&self) -> f32 {
        self.master
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master(&mut self, vol: f32) {
        self.master = vol.clamp(0.0, 1.0);
    }

    /// Move the master volume by whole steps, returning the new level
    pub fn step(&mut self, steps: i32) -> f32 {
        let raw = self.master + steps as f32 * VOLUME_STEP;
        // Snap to the step grid so repeated presses land on round values
        self.set_master((raw / VOLUME_STEP).round() * VOLUME_STEP);
        self.master
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Gain applied to every effect
    pub fn effective(&self) -> f32 {
        if self.muted { 0.0 } else { self.master }
    }
}
