//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collision::{resolve_bounce, separation};
use super::level;
use super::sprite::{SpriteId, SpriteKind};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::BOUNCE_ACCELERATION;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Left arrow held
    pub left: bool,
    /// Right arrow held
    pub right: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - the princess plays herself
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::Ended { .. } => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    if !state.first_loop_done {
        state.first_loop_done = true;
        for id in state.live_ids() {
            level::on_first_game_loop(state, id);
        }
    }

    for id in state.live_ids() {
        if state.is_alive(id) {
            level::on_game_loop(state, id);
        }
    }

    let mut input = input.clone();
    if input.autopilot {
        steer(state, &mut input);
    }
    if input.right {
        level::on_right_arrow(state);
    } else if input.left {
        level::on_left_arrow(state);
    }

    for sprite in state.sprites.iter_mut().filter(|s| s.alive) {
        sprite.advance(dt);
    }

    check_boundaries(state);
    if !state.is_over() {
        check_collisions(state);
    }

    for sprite in state.sprites.iter_mut().filter(|s| s.alive) {
        sprite.animate(dt);
    }

    state.purge_dead();
}

/// Sprites that left the display
fn check_boundaries(state: &mut GameState) {
    let display = state.display_rect();
    for id in state.live_ids() {
        let Some(rect) = state.sprite(id).filter(|s| s.alive).map(|s| s.rect()) else {
            continue;
        };
        if rect.inside(&display) {
            continue;
        }
        if level::on_boundary_contact(state, id) {
            if state.is_over() {
                return;
            }
            continue;
        }

        // Default: stop at the edge
        if let Some(sprite) = state.sprite_mut(id) {
            let max = display.max - sprite.size;
            sprite.pos = sprite.pos.clamp(display.min, max.max(display.min));
        }
    }
}

/// Every overlapping pair with at least one mover, in id order
fn check_collisions(state: &mut GameState) {
    let ids = state.live_ids();
    for (i, &a) in ids.iter().enumerate() {
        for &b in &ids[i + 1..] {
            if state.is_over() {
                return;
            }
            let (Some(sa), Some(sb)) = (state.sprite(a), state.sprite(b)) else {
                continue;
            };
            if !sa.alive || !sb.alive {
                continue;
            }
            if !sa.is_moving() && !sb.is_moving() {
                continue;
            }
            if sa.rect().overlaps(&sb.rect()) {
                collide(state, a, b);
            }
        }
    }
}

/// Run both collision hooks and bounce if both agree
fn collide(state: &mut GameState, a: SpriteId, b: SpriteId) {
    let a_agrees = level::on_collision(state, a, b);
    let b_agrees = level::on_collision(state, b, a);
    if !(a_agrees && b_agrees) {
        return;
    }

    // Snapshot both sprites before moving either
    let (Some(sa), Some(sb)) = (state.sprite(a).cloned(), state.sprite(b).cloned()) else {
        return;
    };
    let both_moving = sa.is_moving() && sb.is_moving();
    let share = if both_moving { 0.5 } else { 1.0 };

    for (mover, obstacle) in [(&sa, &sb), (&sb, &sa)] {
        if !mover.is_moving() {
            continue;
        }
        let Some(bounce) = resolve_bounce(&mover.rect(), &obstacle.rect(), mover.velocity()) else {
            // Already heading away: push clear so the contact isn't reported again next tick
            if let (Some(push), Some(sprite)) = (
                separation(&mover.rect(), &obstacle.rect()),
                state.sprite_mut(mover.id),
            ) {
                sprite.pos += push * share;
            }
            continue;
        };

        if let Some(sprite) = state.sprite_mut(mover.id) {
            sprite.pos += bounce.correction * share;
            sprite.set_angle(bounce.reflect(mover.angle));
            if obstacle.accelerate_on_bounce {
                sprite.speed *= BOUNCE_ACCELERATION;
            }
        }

        if obstacle.kind == SpriteKind::Wall {
            state.events.push(GameEvent::WallBounce);
        }
    }
}

/// Walk the princess under the lowest falling ball
///
/// A slow sideways sway keeps her from heading every ball straight up.
fn steer(state: &GameState, input: &mut TickInput) {
    let Some(ann) = state.princess_sprite() else {
        return;
    };

    let falling = state
        .balls()
        .filter(|b| b.velocity().y > 0.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
    let Some(ball) = falling.or_else(|| state.balls().max_by(|a, b| a.pos.y.total_cmp(&b.pos.y)))
    else {
        return;
    };

    let time_factor = state.time_ticks as f32 * 0.02;
    let sway = time_factor.sin() * ann.size.x / 4.0;
    let target_x = ball.pos.x + sway;
    let dead_zone = 2.0;

    input.left = false;
    input.right = false;
    if target_x > ann.pos.x + dead_zone {
        input.right = true;
    } else if target_x < ann.pos.x - dead_zone {
        input.left = true;
    }
}
