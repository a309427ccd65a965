//! Collision detection and response for axis-aligned sprites
//!
//! Every sprite is a box. A bounce reflects the mover on the axis of least
//! penetration and pushes it back out of the obstacle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::normalize_degrees;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Strict overlap; rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Penetration depth on each axis (non-positive components mean no overlap)
    pub fn overlap_depth(&self, other: &Rect) -> Vec2 {
        Vec2::new(
            self.max.x.min(other.max.x) - self.min.x.max(other.min.x),
            self.max.y.min(other.max.y) - self.min.y.max(other.min.y),
        )
    }

    /// Whether this rectangle lies entirely inside `bounds`
    pub fn inside(&self, bounds: &Rect) -> bool {
        self.min.x >= bounds.min.x
            && self.min.y >= bounds.min.y
            && self.max.x <= bounds.max.x
            && self.max.y <= bounds.max.y
    }
}

/// Axis a bounce reflects on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceAxis {
    /// Side hit: horizontal velocity flips
    Horizontal,
    /// Top/bottom hit: vertical velocity flips
    Vertical,
}

/// Result of a bounce check
#[derive(Debug, Clone, Copy)]
pub struct Bounce {
    pub axis: BounceAxis,
    /// Offset that moves the mover out of the obstacle
    pub correction: Vec2,
}

impl Bounce {
    /// Apply the reflection to an angle in degrees
    pub fn reflect(&self, angle: f32) -> f32 {
        match self.axis {
            BounceAxis::Horizontal => reflect_angle_horizontal(angle),
            BounceAxis::Vertical => reflect_angle_vertical(angle),
        }
    }
}

/// Compute the bounce of `mover` travelling at `velocity` into `obstacle`
///
/// Returns `None` when the boxes don't overlap or the mover is already
/// travelling away on the contact axis.
pub fn resolve_bounce(mover: &Rect, obstacle: &Rect, velocity: Vec2) -> Option<Bounce> {
    let depth = mover.overlap_depth(obstacle);
    if depth.x <= 0.0 || depth.y <= 0.0 {
        return None;
    }

    let to_obstacle = obstacle.center() - mover.center();

    if depth.x < depth.y {
        let dir = if to_obstacle.x >= 0.0 { 1.0 } else { -1.0 };
        if velocity.x * dir <= 0.0 {
            return None;
        }
        Some(Bounce {
            axis: BounceAxis::Horizontal,
            correction: Vec2::new(-dir * depth.x, 0.0),
        })
    } else {
        let dir = if to_obstacle.y >= 0.0 { 1.0 } else { -1.0 };
        if velocity.y * dir <= 0.0 {
            return None;
        }
        Some(Bounce {
            axis: BounceAxis::Vertical,
            correction: Vec2::new(0.0, -dir * depth.y),
        })
    }
}

/// Shortest push that moves `mover` out of `obstacle`, along the axis of
/// least penetration
pub fn separation(mover: &Rect, obstacle: &Rect) -> Option<Vec2> {
    let depth = mover.overlap_depth(obstacle);
    if depth.x <= 0.0 || depth.y <= 0.0 {
        return None;
    }

    let to_obstacle = obstacle.center() - mover.center();
    if depth.x < depth.y {
        let dir = if to_obstacle.x >= 0.0 { 1.0 } else { -1.0 };
        Some(Vec2::new(-dir * depth.x, 0.0))
    } else {
        let dir = if to_obstacle.y >= 0.0 { 1.0 } else { -1.0 };
        Some(Vec2::new(0.0, -dir * depth.y))
    }
}

/// Reflect off a vertical surface
#[inline]
pub fn reflect_angle_horizontal(angle: f32) -> f32 {
    normalize_degrees(180.0 - angle)
}

/// Reflect off a horizontal surface
#[inline]
pub fn reflect_angle_vertical(angle: f32) -> f32 {
    normalize_degrees(-angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heading;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        // Adjacent blocks in a row share an edge
        let a = rect(200.0, 200.0, 48.0, 48.0);
        let b = rect(248.0, 200.0, 48.0, 48.0);
        assert!(!a.overlaps(&b));

        let c = rect(247.0, 200.0, 48.0, 48.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_bounce_off_block_from_below() {
        let block = rect(200.0, 200.0, 48.0, 48.0);
        // Ball just entered the bottom face, moving up
        let ball = rect(205.0, 245.0, 48.0, 48.0);
        let velocity = heading(80.0) * 100.0;

        let bounce = resolve_bounce(&ball, &block, velocity).expect("should bounce");
        assert_eq!(bounce.axis, BounceAxis::Vertical);
        assert!((bounce.correction.y - 3.0).abs() < 1e-4);
        // Moving up at 80 degrees reflects to moving down at 280
        assert!((bounce.reflect(80.0) - 280.0).abs() < 1e-3);
    }

    #[test]
    fn test_bounce_off_side_wall() {
        let wall = rect(0.0, 200.0, 48.0, 400.0);
        let ball = rect(46.0, 300.0, 48.0, 48.0);
        let velocity = heading(170.0) * 100.0;

        let bounce = resolve_bounce(&ball, &wall, velocity).expect("should bounce");
        assert_eq!(bounce.axis, BounceAxis::Horizontal);
        assert!((bounce.correction.x - 2.0).abs() < 1e-4);
        assert!((bounce.reflect(170.0) - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_no_bounce_when_moving_away() {
        let block = rect(200.0, 200.0, 48.0, 48.0);
        let ball = rect(205.0, 245.0, 48.0, 48.0);
        // Already heading down, away from the block
        let velocity = heading(270.0) * 100.0;
        assert!(resolve_bounce(&ball, &block, velocity).is_none());
    }

    #[test]
    fn test_separation_from_corner_graze() {
        let block = rect(200.0, 250.0, 48.0, 48.0);
        // Clipping the bottom-right corner, 1 px deep sideways and 3 px vertically
        let ball = rect(247.0, 295.0, 48.0, 48.0);

        let push = separation(&ball, &block).expect("overlapping");
        assert_eq!(push, Vec2::new(1.0, 0.0));
        assert!(!rect(248.0, 295.0, 48.0, 48.0).overlaps(&block));

        assert!(separation(&rect(248.0, 295.0, 48.0, 48.0), &block).is_none());
    }

    #[test]
    fn test_no_bounce_without_overlap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(20.0, 20.0, 10.0, 10.0);
        assert!(resolve_bounce(&a, &b, Vec2::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_inside_bounds() {
        let display = rect(0.0, 0.0, 800.0, 600.0);
        assert!(rect(400.0, 552.0, 48.0, 48.0).inside(&display));
        assert!(!rect(400.0, 560.0, 48.0, 48.0).inside(&display));
    }
}
