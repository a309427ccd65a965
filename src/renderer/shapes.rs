//! Shape generation for 2D primitives
//!
//! All shapes are built in screen space (pixels, y down); the pipeline maps
//! them to NDC.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::{GameState, Sprite, SpriteKind};

/// Scale the RGB part of a color, keeping alpha
fn shade(color: [f32; 4], factor: f32) -> [f32; 4] {
    [
        (color[0] * factor).min(1.0),
        (color[1] * factor).min(1.0),
        (color[2] * factor).min(1.0),
        color[3],
    ]
}

/// Brightness wobble for the current sprite-sheet frame
fn frame_shade(frame: u32) -> f32 {
    0.85 + 0.05 * (frame % 4) as f32
}

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for one sprite
pub fn sprite(sprite: &Sprite) -> Vec<Vertex> {
    let base = shade(colors::for_image(&sprite.image), frame_shade(sprite.current_frame()));
    let rect_min = sprite.pos;
    let rect_max = sprite.pos + sprite.size;

    match sprite.kind {
        SpriteKind::Ball => {
            let center = sprite.center();
            let radius = sprite.size.x.min(sprite.size.y) / 2.0;
            let mut vertices = circle(center, radius, base, 24);
            // Spin the patch with the animation frame (12 frames per turn)
            let turn = sprite.current_frame() as f32 / 12.0 * 2.0 * PI;
            let patch = center + Vec2::new(turn.cos(), turn.sin()) * radius * 0.5;
            vertices.extend(circle(patch, radius * 0.25, colors::BALL_PATCH, 12));
            vertices
        }
        SpriteKind::Princess => {
            // Ann fills the middle third; her head is the top quarter
            let third = sprite.size.x / 3.0;
            let body_min = Vec2::new(rect_min.x + third, rect_min.y);
            let body_max = Vec2::new(rect_max.x - third, rect_max.y);
            let head_max = Vec2::new(body_max.x, rect_min.y + sprite.size.y / 4.0);
            let mut vertices = rect(body_min, body_max, base);
            vertices.extend(rect(body_min, head_max, colors::PRINCESS_HEAD));
            vertices
        }
        _ => {
            let mut vertices = rect(rect_min, rect_max, shade(base, 0.7));
            // Inset face so adjacent blocks read as separate
            let inset = Vec2::splat(2.0);
            vertices.extend(rect(rect_min + inset, rect_max - inset, base));
            vertices
        }
    }
}

/// Generate vertices for the whole scene, background first
pub fn scene(state: &GameState) -> Vec<Vertex> {
    let display = state.display_rect();
    let mut vertices = rect(display.min, display.max, colors::for_image(&state.background));

    for s in state.sprites.iter().filter(|s| s.alive) {
        vertices.extend(sprite(s));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_is_two_triangles() {
        let v = rect(Vec2::ZERO, Vec2::new(10.0, 20.0), colors::BLOCK);
        assert_eq!(v.len(), 6);
        assert_eq!(v[5].position, [10.0, 20.0]);
    }

    #[test]
    fn test_scene_covers_every_live_sprite() {
        let state = GameState::new(3);
        let vertices = scene(&state);
        // Background plus at least one quad per sprite
        assert!(vertices.len() >= 6 + state.sprites.len() * 6);
        assert!(vertices.iter().all(|v| v.color != colors::UNKNOWN));
    }
}
