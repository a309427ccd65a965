//! The castle level: layout and per-kind game rules
//!
//! The tick loop calls into here for every hook a sprite can receive. Kinds
//! without a rule for a hook get the default behaviour.

use glam::Vec2;
use rand::Rng;

use super::sprite::{Sprite, SpriteId, SpriteKind};
use super::state::{GameEvent, GameState, Outcome};
use crate::tuning::ImageSize;

fn size(image: ImageSize) -> Vec2 {
    Vec2::new(image.width, image.height)
}

/// Lay out the whole level and serve the first ball
pub fn build_castle(state: &mut GameState) {
    let row = state.tuning.block_row.clone();
    for i in 0..row.count {
        spawn_block(state, row.x + i as f32 * row.spacing, row.y);
    }
    for (x, y) in state.tuning.extra_life_blocks.clone() {
        spawn_extra_life_block(state, x, y);
    }
    for (x, y) in state.tuning.extra_ball_blocks.clone() {
        spawn_extra_ball_block(state, x, y);
    }

    let castle = size(state.tuning.castle_size);
    let side = size(state.tuning.side_wall_size);
    let wall_top = state.tuning.castle_height;
    let right_x = state.tuning.display_width - side.x;

    spawn_wall(state, Vec2::ZERO, castle, "A spooky castle wall", "castle.png");
    state.left_wall = spawn_wall(state, Vec2::new(0.0, wall_top), side, "Left side wall", "wall.png");
    state.right_wall = spawn_wall(state, Vec2::new(right_x, wall_top), side, "Right side wall", "wall.png");

    state.princess.id = spawn_princess(state);

    spawn_ball(state);
}

// === Construction ===

fn spawn_block_kind(state: &mut GameState, kind: SpriteKind, image: &str, x: f32, y: f32) -> SpriteId {
    let id = state.next_sprite_id();
    let mut block = Sprite::new(id, kind, "A block", image, Vec2::new(x, y), size(state.tuning.block_size));
    block.accelerate_on_bounce = false;
    state.add_sprite(block)
}

/// Destructible block; counts toward the win
pub fn spawn_block(state: &mut GameState, x: f32, y: f32) -> SpriteId {
    state.blocks_to_destroy += 1;
    spawn_block_kind(state, SpriteKind::Block, "block1.png", x, y)
}

/// Indestructible block; hitting it grants a life
pub fn spawn_extra_life_block(state: &mut GameState, x: f32, y: f32) -> SpriteId {
    spawn_block_kind(state, SpriteKind::ExtraLifeBlock, "block2.png", x, y)
}

/// Destructible block that releases another ball
pub fn spawn_extra_ball_block(state: &mut GameState, x: f32, y: f32) -> SpriteId {
    state.blocks_to_destroy += 1;
    spawn_block_kind(state, SpriteKind::ExtraBallBlock, "block3.png", x, y)
}

pub fn spawn_wall(state: &mut GameState, pos: Vec2, wall_size: Vec2, name: &str, image: &str) -> SpriteId {
    let id = state.next_sprite_id();
    let mut wall = Sprite::new(id, SpriteKind::Wall, name, image, pos, wall_size);
    wall.accelerate_on_bounce = false;
    state.add_sprite(wall)
}

fn spawn_princess(state: &mut GameState) -> SpriteId {
    let id = state.next_sprite_id();
    let princess_size = size(state.tuning.princess_size);
    let pos = Vec2::new(
        state.tuning.display_width / 2.0,
        state.tuning.display_height - princess_size.y,
    );
    let mut ann = Sprite::new(id, SpriteKind::Princess, "Princess Ann", "ann.png", pos, princess_size);
    ann.accelerate_on_bounce = false;
    ann.define_animation("left", 9, 11);
    ann.define_animation("right", 3, 5);
    state.add_sprite(ann)
}

/// Serve a new ball from the middle of the screen
pub fn spawn_ball(state: &mut GameState) -> SpriteId {
    let id = state.next_sprite_id();
    let min = state.tuning.ball_angle_min;
    let spread = state.tuning.ball_angle_spread;
    let angle = min + state.rng().random::<f32>() * spread;

    let pos = Vec2::new(state.tuning.display_width / 2.0, state.tuning.display_height / 2.0);
    let mut ball = Sprite::new(
        id,
        SpriteKind::Ball,
        "Ann's souvenir East Alexandria soccer ball",
        "ball.png",
        pos,
        size(state.tuning.ball_size),
    );
    ball.speed = state.tuning.ball_start_speed;
    ball.set_angle(angle);
    ball.define_animation("spin", 0, 11);
    ball.play_animation("spin", true);

    state.balls_in_play += 1;
    state.events.push(GameEvent::BallSpawned { id });
    log::debug!("Ball {:?} served at {:.1} degrees ({} in play)", id, angle, state.balls_in_play);

    state.add_sprite(ball)
}

// === Hooks ===

/// Runs once, on the first tick of the game
pub fn on_first_game_loop(state: &mut GameState, id: SpriteId) {
    if id == state.princess.id {
        let x = state.tuning.display_width - 3.0 * state.tuning.princess_size.width;
        let display = state.create_text_area(x, 20.0);
        state.princess.lives_display = Some(display);
        update_lives_display(state);
    }
}

/// Runs every tick for every live sprite
pub fn on_game_loop(state: &mut GameState, id: SpriteId) {
    let Some(kind) = state.sprite(id).map(|s| s.kind) else {
        return;
    };

    match kind {
        SpriteKind::Princess => {
            let min_x = state.sprite(state.left_wall).map(|w| w.size.x).unwrap_or(0.0);
            let right_width = state.sprite(state.right_wall).map(|w| w.size.x).unwrap_or(0.0);
            let display_width = state.tuning.display_width;
            if let Some(ann) = state.sprite_mut(id) {
                ann.speed = 0.0;
                let max_x = display_width - right_width - ann.size.x;
                ann.pos.x = ann.pos.x.max(min_x).min(max_x);
            }
        }
        SpriteKind::Ball => {
            // Movement starts slowly so the player can get set
            let max_speed = state.tuning.ball_max_speed;
            let ramp = state.tuning.ball_speed_ramp;
            if let Some(ball) = state.sprite_mut(id) {
                if ball.speed < max_speed {
                    ball.speed += ramp;
                }
            }
        }
        _ => {}
    }
}

pub fn on_left_arrow(state: &mut GameState) {
    walk(state, "left", 180.0);
}

pub fn on_right_arrow(state: &mut GameState) {
    walk(state, "right", 0.0);
}

fn walk(state: &mut GameState, animation: &str, angle: f32) {
    let speed = state.princess.speed_when_walking;
    let id = state.princess.id;
    if let Some(ann) = state.sprite_mut(id) {
        ann.play_animation(animation, false);
        ann.set_angle(angle);
        ann.speed = speed;
    }
}

/// Collision hook for `id` touching `other`
///
/// Returns whether `id` agrees to a physical bounce. The bounce only happens
/// when both sprites agree.
pub fn on_collision(state: &mut GameState, id: SpriteId, other: SpriteId) -> bool {
    let Some(kind) = state.sprite(id).map(|s| s.kind) else {
        return true;
    };

    match kind {
        SpriteKind::Block => {
            destroy_block(state, id);
            true
        }
        SpriteKind::ExtraLifeBlock => {
            add_a_life(state);
            state.events.push(GameEvent::BlockBounce { id });
            true
        }
        SpriteKind::ExtraBallBlock => {
            destroy_block(state, id);
            spawn_ball(state);
            true
        }
        SpriteKind::Princess => {
            deflect_ball(state, id, other);
            false
        }
        SpriteKind::Wall | SpriteKind::Ball => true,
    }
}

/// Remove a destructible block and check for the win
fn destroy_block(state: &mut GameState, id: SpriteId) {
    if !state.remove_sprite(id) {
        return;
    }
    state.blocks_to_destroy = state.blocks_to_destroy.saturating_sub(1);
    state.events.push(GameEvent::BlockDestroyed { id });
    log::debug!("Block {:?} destroyed, {} to go", id, state.blocks_to_destroy);

    if state.blocks_to_destroy == 0 {
        let message = state.tuning.win_message.clone();
        state.end(Outcome::Won, &message);
    }
}

/// Head the ball if it landed on Ann's head
///
/// Horizontally the image is one-third Ann between blank thirds; her head is
/// the top quarter.
fn deflect_ball(state: &mut GameState, princess: SpriteId, ball: SpriteId) {
    let Some(ann) = state.sprite(princess) else {
        return;
    };
    let (ann_pos, ann_size) = (ann.pos, ann.size);

    let Some(target) = state.sprite_mut(ball) else {
        return;
    };
    if target.kind != SpriteKind::Ball {
        return;
    }

    let horizontal_offset = ann_pos.x - target.pos.x;
    let vertical_offset = ann_pos.y - target.pos.y;
    if horizontal_offset.abs() < ann_size.x / 3.0 && vertical_offset > ann_size.y / 4.0 {
        // Steeper the closer to centre
        target.set_angle(90.0 + 2.0 * horizontal_offset);
        state.events.push(GameEvent::Deflected { ball });
    }
}

/// Runs when a sprite leaves the display. Returns true if a level rule
/// handled it.
pub fn on_boundary_contact(state: &mut GameState, id: SpriteId) -> bool {
    if state.sprite(id).map(|s| s.kind) != Some(SpriteKind::Ball) {
        return false;
    }

    // Only the bottom is open; the ball is gone
    if !state.remove_sprite(id) {
        return true;
    }
    state.balls_in_play = state.balls_in_play.saturating_sub(1);
    state.events.push(GameEvent::BallLost { id });
    log::debug!("Ball {:?} lost, {} in play", id, state.balls_in_play);

    // Only the last ball out costs a life
    if state.balls_in_play == 0 {
        lose_a_life(state);
    }
    true
}

pub fn add_a_life(state: &mut GameState) {
    state.princess.lives += 1;
    state.events.push(GameEvent::ExtraLife {
        lives: state.princess.lives,
    });
    log::info!("Extra life! Lives = {}", state.princess.lives);
    update_lives_display(state);
}

pub fn lose_a_life(state: &mut GameState) {
    state.princess.lives = state.princess.lives.saturating_sub(1);
    state.events.push(GameEvent::LifeLost {
        lives: state.princess.lives,
    });
    log::info!("Life lost. Lives = {}", state.princess.lives);
    update_lives_display(state);

    if state.princess.lives > 0 {
        spawn_ball(state);
    } else {
        let message = state.tuning.lose_message.clone();
        state.end(Outcome::Lost, &message);
    }
}

fn update_lives_display(state: &mut GameState) {
    if let Some(display) = state.princess.lives_display {
        let text = format!("Lives = {}", state.princess.lives);
        state.write_to_text_area(display, &text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;

    fn first_of(state: &GameState, kind: SpriteKind) -> SpriteId {
        state
            .sprites
            .iter()
            .find(|s| s.alive && s.kind == kind)
            .map(|s| s.id)
            .expect("sprite of kind exists")
    }

    #[test]
    fn test_castle_layout() {
        let state = GameState::new(7);
        assert_eq!(state.count_kind(SpriteKind::Block), 5);
        assert_eq!(state.count_kind(SpriteKind::ExtraLifeBlock), 1);
        assert_eq!(state.count_kind(SpriteKind::ExtraBallBlock), 1);
        assert_eq!(state.count_kind(SpriteKind::Wall), 3);
        assert_eq!(state.count_kind(SpriteKind::Princess), 1);
        assert_eq!(state.count_kind(SpriteKind::Ball), 1);

        // Five blocks plus the extra-ball block; the extra-life block is indestructible
        assert_eq!(state.blocks_to_destroy, 6);
        assert_eq!(state.balls_in_play, 1);
        assert_eq!(state.princess.lives, 1);

        let xs: Vec<f32> = state
            .sprites
            .iter()
            .filter(|s| s.kind == SpriteKind::Block)
            .map(|s| s.pos.x)
            .collect();
        assert_eq!(xs, vec![200.0, 248.0, 296.0, 344.0, 392.0]);

        let right = state.sprite(state.right_wall).expect("right wall");
        assert_eq!(right.pos, Vec2::new(752.0, 200.0));

        let ann = state.princess_sprite().expect("princess");
        assert_eq!(ann.pos, Vec2::new(400.0, 552.0));
        assert!(!ann.accelerate_on_bounce);
        assert_eq!(state.background, "grass.png");
    }

    #[test]
    fn test_ball_serve() {
        let state = GameState::new(7);
        let ball = state.balls().next().expect("ball");
        assert_eq!(ball.pos, Vec2::new(400.0, 300.0));
        assert_eq!(ball.speed, 1.0);
        assert!(ball.angle >= 50.0 && ball.angle < 130.0);
        assert_eq!(ball.animation.as_ref().map(|a| a.name.as_str()), Some("spin"));
    }

    #[test]
    fn test_block_hit_removes_and_counts_down() {
        let mut state = GameState::new(7);
        let block = first_of(&state, SpriteKind::Block);
        let ball = first_of(&state, SpriteKind::Ball);

        assert!(on_collision(&mut state, block, ball));
        assert!(!state.is_alive(block));
        assert_eq!(state.blocks_to_destroy, 5);

        // A second hit on the same block in the same tick changes nothing
        assert!(on_collision(&mut state, block, ball));
        assert_eq!(state.blocks_to_destroy, 5);
    }

    #[test]
    fn test_last_block_wins() {
        let mut state = GameState::new(7);
        let ball = first_of(&state, SpriteKind::Ball);
        let destructible: Vec<SpriteId> = state
            .sprites
            .iter()
            .filter(|s| matches!(s.kind, SpriteKind::Block | SpriteKind::ExtraBallBlock))
            .map(|s| s.id)
            .collect();

        for id in destructible {
            assert!(!state.is_over());
            on_collision(&mut state, id, ball);
        }

        assert_eq!(state.blocks_to_destroy, 0);
        assert_eq!(state.outcome(), Some(Outcome::Won));
        assert!(state.end_message().is_some_and(|m| m.starts_with("Congratulations!")));
    }

    #[test]
    fn test_extra_life_block_is_indestructible() {
        let mut state = GameState::new(7);
        let block = first_of(&state, SpriteKind::ExtraLifeBlock);
        let ball = first_of(&state, SpriteKind::Ball);

        assert!(on_collision(&mut state, block, ball));
        assert!(on_collision(&mut state, block, ball));
        assert!(state.is_alive(block));
        assert_eq!(state.princess.lives, 3);
        assert_eq!(state.blocks_to_destroy, 6);
    }

    #[test]
    fn test_extra_ball_block_serves_another_ball() {
        let mut state = GameState::new(7);
        let block = first_of(&state, SpriteKind::ExtraBallBlock);
        let ball = first_of(&state, SpriteKind::Ball);

        assert!(on_collision(&mut state, block, ball));
        assert!(!state.is_alive(block));
        assert_eq!(state.blocks_to_destroy, 5);
        assert_eq!(state.balls_in_play, 2);
        assert_eq!(state.count_kind(SpriteKind::Ball), 2);
    }

    #[test]
    fn test_princess_heads_the_ball() {
        let mut state = GameState::new(7);
        let ann = state.princess.id;
        let ball = first_of(&state, SpriteKind::Ball);

        // Ball dropping onto her head, 10 px right of her
        state.sprite_mut(ball).expect("ball").pos = Vec2::new(410.0, 552.0 - 30.0);
        state.sprite_mut(ball).expect("ball").set_angle(270.0);

        assert!(!on_collision(&mut state, ann, ball));
        let angle = state.sprite(ball).expect("ball").angle;
        // 90 + 2 * (400 - 410)
        assert!((angle - 70.0).abs() < 1e-3);
    }

    #[test]
    fn test_princess_misses_low_ball() {
        let mut state = GameState::new(7);
        let ann = state.princess.id;
        let ball = first_of(&state, SpriteKind::Ball);

        // Level with her body, below the head
        state.sprite_mut(ball).expect("ball").pos = Vec2::new(405.0, 552.0 - 5.0);
        state.sprite_mut(ball).expect("ball").set_angle(270.0);

        assert!(!on_collision(&mut state, ann, ball));
        assert_eq!(state.sprite(ball).expect("ball").angle, 270.0);
    }

    #[test]
    fn test_princess_stays_between_walls() {
        let mut state = GameState::new(7);
        let ann = state.princess.id;

        state.sprite_mut(ann).expect("ann").pos.x = 5.0;
        on_game_loop(&mut state, ann);
        assert_eq!(state.sprite(ann).expect("ann").pos.x, 48.0);

        state.sprite_mut(ann).expect("ann").pos.x = 790.0;
        on_game_loop(&mut state, ann);
        assert_eq!(state.sprite(ann).expect("ann").pos.x, 800.0 - 48.0 - 48.0);
    }

    #[test]
    fn test_last_ball_out_costs_a_life() {
        let tuning = crate::Tuning {
            starting_lives: 2,
            ..Default::default()
        };
        let mut state = GameState::with_tuning(7, tuning);
        let first = first_of(&state, SpriteKind::Ball);

        assert!(on_boundary_contact(&mut state, first));
        assert_eq!(state.princess.lives, 1);
        // A fresh ball restarts play
        assert_eq!(state.balls_in_play, 1);
        assert_eq!(state.phase, GamePhase::Playing);

        let second = state.balls().next().map(|b| b.id).expect("new ball");
        assert_ne!(first, second);
        on_boundary_contact(&mut state, second);
        assert_eq!(state.princess.lives, 0);
        assert_eq!(state.balls_in_play, 0);
        assert_eq!(state.outcome(), Some(Outcome::Lost));
    }

    #[test]
    fn test_spare_ball_out_keeps_lives() {
        let mut state = GameState::new(7);
        spawn_ball(&mut state);
        let first = first_of(&state, SpriteKind::Ball);

        on_boundary_contact(&mut state, first);
        assert_eq!(state.balls_in_play, 1);
        assert_eq!(state.princess.lives, 1);
        assert!(!state.is_over());
    }

    #[test]
    fn test_walls_ignore_boundary_rule() {
        let mut state = GameState::new(7);
        let wall = state.left_wall;
        assert!(!on_boundary_contact(&mut state, wall));
        assert!(state.is_alive(wall));
    }

    #[test]
    fn test_lives_display() {
        let mut state = GameState::new(7);
        let ann = state.princess.id;
        on_first_game_loop(&mut state, ann);

        let display = state.princess.lives_display.expect("display created");
        let area = state.text_area(display).expect("text area");
        assert_eq!(area.text, "Lives = 1");
        assert_eq!(area.pos, Vec2::new(800.0 - 144.0, 20.0));

        add_a_life(&mut state);
        assert_eq!(state.text_area(display).map(|a| a.text.as_str()), Some("Lives = 2"));
    }

    #[test]
    fn test_arrow_keys_walk() {
        let mut state = GameState::new(7);
        on_left_arrow(&mut state);
        let ann = state.princess_sprite().expect("ann");
        assert_eq!(ann.angle, 180.0);
        assert_eq!(ann.speed, 150.0);
        assert_eq!(ann.current_frame(), 9);

        on_right_arrow(&mut state);
        let ann = state.princess_sprite().expect("ann");
        assert_eq!(ann.angle, 0.0);
        assert_eq!(ann.current_frame(), 3);
    }
}
