//! Sprite records and sprite-sheet animation
//!
//! Positions are the top-left corner in screen space (y grows downward).
//! Angles are in degrees, counter-clockwise from the positive x axis as seen
//! on screen.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::ANIMATION_FPS;
use crate::{heading, normalize_degrees};

/// Stable sprite identifier (allocated in ascending order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpriteId(pub u32);

/// What a sprite is, and therefore which level rules apply to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKind {
    /// Destructible block
    Block,
    /// Indestructible block that grants a life
    ExtraLifeBlock,
    /// Destructible block that releases another ball
    ExtraBallBlock,
    Wall,
    Princess,
    Ball,
}

impl SpriteKind {
    /// Any of the three block kinds
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            SpriteKind::Block | SpriteKind::ExtraLifeBlock | SpriteKind::ExtraBallBlock
        )
    }
}

/// A named run of sprite-sheet frames
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animation {
    pub name: String,
    pub first_frame: u32,
    pub last_frame: u32,
}

/// The animation currently playing on a sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationState {
    pub name: String,
    pub frame: u32,
    pub looping: bool,
    pub finished: bool,
    /// Seconds accumulated toward the next frame
    elapsed: f32,
}

/// A sprite entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprite {
    pub id: SpriteId,
    pub kind: SpriteKind,
    pub name: String,
    pub image: String,
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per second along `angle`
    pub speed: f32,
    /// Degrees, normalized to [0, 360)
    pub angle: f32,
    /// Whether sprites bouncing off this one speed up
    pub accelerate_on_bounce: bool,
    /// Cleared when removed from play; purged at the end of the tick
    pub alive: bool,
    animations: Vec<Animation>,
    pub animation: Option<AnimationState>,
}

impl Sprite {
    pub fn new(id: SpriteId, kind: SpriteKind, name: &str, image: &str, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            kind,
            name: name.to_string(),
            image: image.to_string(),
            pos,
            size,
            speed: 0.0,
            angle: 0.0,
            accelerate_on_bounce: true,
            alive: true,
            animations: Vec::new(),
            animation: None,
        }
    }

    /// Axis-aligned bounds
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Current velocity in pixels per second
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        heading(self.angle) * self.speed
    }

    pub fn is_moving(&self) -> bool {
        self.speed != 0.0
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = normalize_degrees(angle);
    }

    /// Move along the current heading
    pub fn advance(&mut self, dt: f32) {
        if self.speed != 0.0 {
            self.pos += self.velocity() * dt;
        }
    }

    /// Register a named frame range (inclusive)
    pub fn define_animation(&mut self, name: &str, first_frame: u32, last_frame: u32) {
        let animation = Animation {
            name: name.to_string(),
            first_frame,
            last_frame: last_frame.max(first_frame),
        };
        match self.animations.iter_mut().find(|a| a.name == name) {
            Some(existing) => *existing = animation,
            None => self.animations.push(animation),
        }
    }

    /// Start an animation unless it is already running
    ///
    /// Finished one-shot animations start over.
    pub fn play_animation(&mut self, name: &str, looping: bool) {
        if let Some(current) = &self.animation {
            if current.name == name && !current.finished {
                return;
            }
        }

        let Some(animation) = self.animations.iter().find(|a| a.name == name) else {
            log::warn!("{}: no animation named '{}'", self.name, name);
            return;
        };

        self.animation = Some(AnimationState {
            name: animation.name.clone(),
            frame: animation.first_frame,
            looping,
            finished: false,
            elapsed: 0.0,
        });
    }

    /// Sprite-sheet frame to draw
    pub fn current_frame(&self) -> u32 {
        self.animation.as_ref().map(|a| a.frame).unwrap_or(0)
    }

    /// Advance the playing animation by `dt` seconds
    pub fn animate(&mut self, dt: f32) {
        let Some(state) = self.animation.as_mut() else {
            return;
        };
        if state.finished {
            return;
        }
        let Some(animation) = self.animations.iter().find(|a| a.name == state.name) else {
            return;
        };

        let frame_time = 1.0 / ANIMATION_FPS;
        state.elapsed += dt;
        while state.elapsed >= frame_time {
            state.elapsed -= frame_time;
            if state.frame < animation.last_frame {
                state.frame += 1;
            } else if state.looping {
                state.frame = animation.first_frame;
            } else {
                state.finished = true;
                state.elapsed = 0.0;
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_sprite() -> Sprite {
        Sprite::new(
            SpriteId(1),
            SpriteKind::Princess,
            "Test",
            "test.png",
            Vec2::new(100.0, 100.0),
            Vec2::new(48.0, 48.0),
        )
    }

    #[test]
    fn test_advance_moves_along_heading() {
        let mut sprite = test_sprite();
        sprite.speed = 60.0;
        sprite.set_angle(90.0);
        sprite.advance(1.0);
        // Up on screen is negative y
        assert!((sprite.pos.x - 100.0).abs() < 1e-3);
        assert!((sprite.pos.y - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_stationary_sprite_stays_put() {
        let mut sprite = test_sprite();
        sprite.set_angle(45.0);
        sprite.advance(1.0);
        assert_eq!(sprite.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_one_shot_animation_stops_on_last_frame() {
        let mut sprite = test_sprite();
        sprite.define_animation("right", 3, 5);
        sprite.play_animation("right", false);
        assert_eq!(sprite.current_frame(), 3);

        // Well past the end of the run
        sprite.animate(1.0);
        assert_eq!(sprite.current_frame(), 5);
        assert!(sprite.animation.as_ref().is_some_and(|a| a.finished));
    }

    #[test]
    fn test_looping_animation_wraps() {
        let mut sprite = test_sprite();
        sprite.define_animation("spin", 0, 2);
        sprite.play_animation("spin", true);

        let frame_time = 1.0 / ANIMATION_FPS;
        let mut frames = Vec::new();
        for _ in 0..4 {
            sprite.animate(frame_time);
            frames.push(sprite.current_frame());
        }
        assert_eq!(frames, vec![1, 2, 0, 1]);
    }

    #[test]
    fn test_replaying_running_animation_does_not_restart() {
        let mut sprite = test_sprite();
        sprite.define_animation("left", 9, 11);
        sprite.play_animation("left", false);
        sprite.animate(1.0 / ANIMATION_FPS);
        assert_eq!(sprite.current_frame(), 10);

        sprite.play_animation("left", false);
        assert_eq!(sprite.current_frame(), 10);

        // Once finished, playing again starts over
        sprite.animate(1.0);
        sprite.play_animation("left", false);
        assert_eq!(sprite.current_frame(), 9);
    }

    #[test]
    fn test_unknown_animation_is_ignored() {
        let mut sprite = test_sprite();
        sprite.play_animation("dance", true);
        assert!(sprite.animation.is_none());
        assert_eq!(sprite.current_frame(), 0);
    }
}
