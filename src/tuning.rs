//! Data-driven level layout and balance
//!
//! Every field has a default matching the castle level, so a tuning file only
//! needs to list what it changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("Failed to read tuning file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Display must be positive, got {width}x{height}")]
    InvalidDisplay { width: f32, height: f32 },

    #[error("Level has no destructible blocks, it could never be won")]
    NoDestructibleBlocks,

    #[error("Side walls ({walls} px) leave no room for the princess in a {width} px display")]
    WallsTooWide { walls: f32, width: f32 },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("Princess must start with at least one life")]
    NoLives,
}

/// Pixel size of a single frame of an image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f32,
    pub height: f32,
}

impl ImageSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A row of identical blocks laid out left to right
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockRow {
    pub count: u32,
    pub x: f32,
    pub y: f32,
    pub spacing: f32,
}

impl Default for BlockRow {
    fn default() -> Self {
        Self {
            count: 5,
            x: 200.0,
            y: 200.0,
            spacing: 48.0,
        }
    }
}

/// Level tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Display ===
    pub display_width: f32,
    pub display_height: f32,
    pub background: String,

    // === Layout ===
    pub block_row: BlockRow,
    /// Indestructible blocks that grant a life
    pub extra_life_blocks: Vec<(f32, f32)>,
    /// Destructible blocks that release another ball
    pub extra_ball_blocks: Vec<(f32, f32)>,
    /// Height of the castle wall across the top
    pub castle_height: f32,

    // === Image sizes (per animation frame) ===
    pub block_size: ImageSize,
    pub castle_size: ImageSize,
    pub side_wall_size: ImageSize,
    pub princess_size: ImageSize,
    pub ball_size: ImageSize,

    // === Princess ===
    pub starting_lives: u32,
    pub walking_speed: f32,

    // === Ball ===
    /// Launch speed; the ball then ramps up to `ball_max_speed`
    pub ball_start_speed: f32,
    pub ball_max_speed: f32,
    /// Speed gained per tick while ramping
    pub ball_speed_ramp: f32,
    /// Lowest launch angle (degrees)
    pub ball_angle_min: f32,
    /// Width of the random launch angle window (degrees)
    pub ball_angle_spread: f32,

    // === Messages ===
    pub win_message: String,
    pub lose_message: String,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            display_width: 800.0,
            display_height: 600.0,
            background: "grass.png".to_string(),

            block_row: BlockRow::default(),
            extra_life_blocks: vec![(200.0, 250.0)],
            extra_ball_blocks: vec![(300.0, 250.0)],
            castle_height: 200.0,

            block_size: ImageSize::new(48.0, 48.0),
            castle_size: ImageSize::new(800.0, 200.0),
            side_wall_size: ImageSize::new(48.0, 400.0),
            princess_size: ImageSize::new(48.0, 48.0),
            ball_size: ImageSize::new(48.0, 48.0),

            starting_lives: 1,
            walking_speed: 150.0,

            ball_start_speed: 1.0,
            ball_max_speed: 200.0,
            ball_speed_ramp: 2.0,
            ball_angle_min: 50.0,
            ball_angle_spread: 80.0,

            win_message: "Congratulations!\n\nPrincess Ann can continue her pursuit\nof the mysterious stranger!".to_string(),
            lose_message: "The mysterious stranger has escaped\nPrincess Ann for now!\n\nBetter luck next time.".to_string(),
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning file
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a tuning file from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &str) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path);
        Ok(tuning)
    }

    /// Reject layouts that cannot be played
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.display_width <= 0.0 || self.display_height <= 0.0 {
            return Err(TuningError::InvalidDisplay {
                width: self.display_width,
                height: self.display_height,
            });
        }

        if self.destructible_block_count() == 0 {
            return Err(TuningError::NoDestructibleBlocks);
        }

        let walls = self.side_wall_size.width * 2.0;
        if walls + self.princess_size.width > self.display_width {
            return Err(TuningError::WallsTooWide {
                walls,
                width: self.display_width,
            });
        }

        for (name, value) in [
            ("walking_speed", self.walking_speed),
            ("ball_start_speed", self.ball_start_speed),
            ("ball_max_speed", self.ball_max_speed),
            ("ball_speed_ramp", self.ball_speed_ramp),
            ("block_size.width", self.block_size.width),
            ("block_size.height", self.block_size.height),
            ("castle_size.width", self.castle_size.width),
            ("castle_size.height", self.castle_size.height),
            ("side_wall_size.width", self.side_wall_size.width),
            ("side_wall_size.height", self.side_wall_size.height),
            ("princess_size.width", self.princess_size.width),
            ("princess_size.height", self.princess_size.height),
            ("ball_size.width", self.ball_size.width),
            ("ball_size.height", self.ball_size.height),
        ] {
            if value <= 0.0 {
                return Err(TuningError::NonPositive { name, value });
            }
        }

        if self.starting_lives == 0 {
            return Err(TuningError::NoLives);
        }

        Ok(())
    }

    /// Number of blocks that must be destroyed to win
    pub fn destructible_block_count(&self) -> u32 {
        self.block_row.count + self.extra_ball_blocks.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.destructible_block_count(), 6);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "starting_lives": 3, "block_row": { "count": 8 } }"#)
            .expect("valid tuning");
        assert_eq!(tuning.starting_lives, 3);
        assert_eq!(tuning.block_row.count, 8);
        // Unlisted fields fall back to the castle level
        assert_eq!(tuning.block_row.spacing, 48.0);
        assert_eq!(tuning.display_width, 800.0);
    }

    #[test]
    fn test_malformed_json() {
        let err = Tuning::from_json("{ starting_lives: ").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_rejects_unwinnable_layout() {
        let err = Tuning::from_json(r#"{ "block_row": { "count": 0 }, "extra_ball_blocks": [] }"#)
            .unwrap_err();
        assert!(matches!(err, TuningError::NoDestructibleBlocks));
    }

    #[test]
    fn test_rejects_walls_wider_than_display() {
        let err = Tuning::from_json(r#"{ "display_width": 100.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::WallsTooWide { .. }));
    }

    #[test]
    fn test_rejects_zero_display() {
        let err = Tuning::from_json(r#"{ "display_height": 0.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::InvalidDisplay { height, .. } if height == 0.0));
    }

    #[test]
    fn test_rejects_negative_speed() {
        let err = Tuning::from_json(r#"{ "walking_speed": -150.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::NonPositive { name: "walking_speed", value } if value == -150.0
        ));
    }

    #[test]
    fn test_rejects_non_positive_ramp() {
        // A negative ramp would drive the ball speed below zero every tick
        let err = Tuning::from_json(r#"{ "ball_speed_ramp": -2.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::NonPositive { name: "ball_speed_ramp", .. }));

        let err = Tuning::from_json(r#"{ "ball_speed_ramp": 0.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::NonPositive { name: "ball_speed_ramp", .. }));
    }

    #[test]
    fn test_rejects_zero_sized_image() {
        let err = Tuning::from_json(r#"{ "ball_size": { "width": 48.0, "height": 0.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, TuningError::NonPositive { name: "ball_size.height", .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Tuning::load("/nonexistent/castle.json").unwrap_err();
        assert!(matches!(err, TuningError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/castle.json"));
    }

    #[test]
    fn test_rejects_zero_lives() {
        let err = Tuning::from_json(r#"{ "starting_lives": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::NoLives));
    }
}
