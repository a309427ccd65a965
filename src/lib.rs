//! Castle Break-In - Princess Ann's castle-siege Breakout level
//!
//! Core modules:
//! - `sim`: Deterministic simulation (sprites, collisions, level rules)
//! - `tuning`: Data-driven level layout and balance
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Sound effect mapping and volume; Web Audio playback on wasm

pub mod audio;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Sprite sheet animation rate (frames per second)
    pub const ANIMATION_FPS: f32 = 20.0;

    /// Speed multiplier when bouncing off a sprite that accelerates bounces
    pub const BOUNCE_ACCELERATION: f32 = 1.05;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit direction for an angle in degrees (0 = right, 90 = up on screen)
///
/// Screen y grows downward, so the y component is negated.
#[inline]
pub fn heading(angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(rad.cos(), -rad.sin())
}

/// Angle in degrees for a screen-space direction vector
#[inline]
pub fn direction_to_degrees(dir: Vec2) -> f32 {
    normalize_degrees((-dir.y).atan2(dir.x).to_degrees())
}
