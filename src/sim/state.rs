//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::level;
use super::sprite::{Sprite, SpriteId, SpriteKind};
use crate::tuning::Tuning;

/// How a finished game turned out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

/// Current phase of gameplay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Game over, with the message shown to the player
    Ended { outcome: Outcome, message: String },
}

/// Something the shell may want to react to (sound, effects)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    BlockDestroyed { id: SpriteId },
    /// Ball bounced off a block that stays in play
    BlockBounce { id: SpriteId },
    WallBounce,
    /// Princess headed a ball
    Deflected { ball: SpriteId },
    ExtraLife { lives: u32 },
    BallSpawned { id: SpriteId },
    BallLost { id: SpriteId },
    LifeLost { lives: u32 },
    GameEnded { outcome: Outcome },
}

/// Handle to an on-screen text area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAreaId(pub u32);

/// A line of HUD text at a fixed screen position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextArea {
    pub id: TextAreaId,
    pub pos: Vec2,
    pub text: String,
}

/// Per-game princess bookkeeping (her sprite lives in `sprites`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincessState {
    pub id: SpriteId,
    pub lives: u32,
    pub speed_when_walking: f32,
    pub lives_display: Option<TextAreaId>,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub background: String,
    /// All sprites, ascending by id
    pub sprites: Vec<Sprite>,
    /// Destructible blocks still standing
    pub blocks_to_destroy: u32,
    pub balls_in_play: u32,
    pub princess: PrincessState,
    pub left_wall: SpriteId,
    pub right_wall: SpriteId,
    pub text_areas: Vec<TextArea>,
    /// Whether first-game-loop hooks have run
    pub first_loop_done: bool,
    /// Events since the last drain (not gameplay-affecting)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create the castle level with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create the castle level from a tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            background: tuning.background.clone(),
            phase: GamePhase::Playing,
            time_ticks: 0,
            sprites: Vec::new(),
            blocks_to_destroy: 0,
            balls_in_play: 0,
            princess: PrincessState {
                id: SpriteId(0),
                lives: tuning.starting_lives,
                speed_when_walking: tuning.walking_speed,
                lives_display: None,
            },
            left_wall: SpriteId(0),
            right_wall: SpriteId(0),
            text_areas: Vec::new(),
            first_loop_done: false,
            events: Vec::new(),
            next_id: 1,
            tuning,
        };

        level::build_castle(&mut state);
        // Setup isn't gameplay; the shell hears from the first tick on
        state.events.clear();

        log::info!(
            "Castle level built (seed {}): {} sprites, {} blocks to destroy",
            seed,
            state.sprites.len(),
            state.blocks_to_destroy
        );

        state
    }

    /// Allocate a new sprite ID
    pub fn next_sprite_id(&mut self) -> SpriteId {
        let id = SpriteId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a sprite; ids are allocated in order so `sprites` stays sorted
    pub fn add_sprite(&mut self, sprite: Sprite) -> SpriteId {
        let id = sprite.id;
        debug_assert!(self.sprites.last().is_none_or(|s| s.id < id));
        self.sprites.push(sprite);
        id
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites
            .binary_search_by_key(&id, |s| s.id)
            .ok()
            .map(|i| &self.sprites[i])
    }

    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites
            .binary_search_by_key(&id, |s| s.id)
            .ok()
            .map(|i| &mut self.sprites[i])
    }

    /// Whether the sprite exists and is still in play
    pub fn is_alive(&self, id: SpriteId) -> bool {
        self.sprite(id).is_some_and(|s| s.alive)
    }

    /// Take a sprite out of play. Returns false if it was already gone.
    pub fn remove_sprite(&mut self, id: SpriteId) -> bool {
        match self.sprite_mut(id) {
            Some(sprite) if sprite.alive => {
                sprite.alive = false;
                true
            }
            _ => false,
        }
    }

    /// Drop removed sprites
    pub fn purge_dead(&mut self) {
        self.sprites.retain(|s| s.alive);
    }

    /// Ids of live sprites in ascending order
    pub fn live_ids(&self) -> Vec<SpriteId> {
        self.sprites.iter().filter(|s| s.alive).map(|s| s.id).collect()
    }

    pub fn princess_sprite(&self) -> Option<&Sprite> {
        self.sprite(self.princess.id)
    }

    /// Live balls, ascending by id
    pub fn balls(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites
            .iter()
            .filter(|s| s.alive && s.kind == SpriteKind::Ball)
    }

    /// Live sprites of a kind
    pub fn count_kind(&self, kind: SpriteKind) -> usize {
        self.sprites
            .iter()
            .filter(|s| s.alive && s.kind == kind)
            .count()
    }

    /// The playfield as a rectangle
    pub fn display_rect(&self) -> Rect {
        Rect::new(
            Vec2::ZERO,
            Vec2::new(self.tuning.display_width, self.tuning.display_height),
        )
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Create an empty text area and return its handle
    pub fn create_text_area(&mut self, x: f32, y: f32) -> TextAreaId {
        let id = TextAreaId(self.text_areas.len() as u32);
        self.text_areas.push(TextArea {
            id,
            pos: Vec2::new(x, y),
            text: String::new(),
        });
        id
    }

    pub fn write_to_text_area(&mut self, id: TextAreaId, text: &str) {
        match self.text_areas.get_mut(id.0 as usize) {
            Some(area) => area.text = text.to_string(),
            None => log::warn!("Write to unknown text area {:?}", id),
        }
    }

    pub fn text_area(&self, id: TextAreaId) -> Option<&TextArea> {
        self.text_areas.get(id.0 as usize)
    }

    /// End the game. Only the first call has any effect.
    pub fn end(&mut self, outcome: Outcome, message: &str) {
        if self.is_over() {
            return;
        }
        log::info!("Game over ({:?}) after {} ticks", outcome, self.time_ticks);
        self.phase = GamePhase::Ended {
            outcome,
            message: message.to_string(),
        };
        self.events.push(GameEvent::GameEnded { outcome });
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::Ended { .. })
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            GamePhase::Ended { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    /// Message shown when the game has ended
    pub fn end_message(&self) -> Option<&str> {
        match &self.phase {
            GamePhase::Ended { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_lookup_by_id() {
        let state = GameState::new(1);
        for sprite in &state.sprites {
            assert_eq!(state.sprite(sprite.id).map(|s| s.id), Some(sprite.id));
        }
        assert!(state.sprite(SpriteId(9999)).is_none());
    }

    #[test]
    fn test_remove_sprite_once() {
        let mut state = GameState::new(1);
        let id = state.left_wall;
        assert!(state.remove_sprite(id));
        assert!(!state.remove_sprite(id));
        assert!(!state.is_alive(id));

        state.purge_dead();
        assert!(state.sprite(id).is_none());
    }

    #[test]
    fn test_text_areas() {
        let mut state = GameState::new(1);
        let id = state.create_text_area(10.0, 20.0);
        state.write_to_text_area(id, "Hello");
        let area = state.text_area(id).expect("text area exists");
        assert_eq!(area.text, "Hello");
        assert_eq!(area.pos, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_new_state_has_no_pending_events() {
        let mut state = GameState::new(1);
        // The first ball is served during construction
        assert_eq!(state.balls_in_play, 1);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_event_serde() {
        let event = GameEvent::ExtraLife { lives: 2 };
        let json = serde_json::to_string(&event).expect("serialize");
        let back: GameEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, event);
    }

    #[test]
    fn test_end_is_sticky() {
        let mut state = GameState::new(1);
        state.end(Outcome::Won, "first");
        state.end(Outcome::Lost, "second");
        assert_eq!(state.outcome(), Some(Outcome::Won));
        assert_eq!(state.end_message(), Some("first"));

        let events = state.drain_events();
        assert_eq!(events, vec![GameEvent::GameEnded { outcome: Outcome::Won }]);
        assert!(state.drain_events().is_empty());
    }
}
