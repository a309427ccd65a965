//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by sprite ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod sprite;
pub mod state;
pub mod tick;

pub use collision::{Bounce, BounceAxis, Rect, resolve_bounce};
pub use sprite::{Animation, AnimationState, Sprite, SpriteId, SpriteKind};
pub use state::{GameEvent, GamePhase, GameState, Outcome, PrincessState, TextArea, TextAreaId};
pub use tick::{TickInput, tick};
