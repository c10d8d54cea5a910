//! Game state and core simulation types
//!
//! Everything a session mutates lives in [`GameState`]. Tunables live in
//! [`GameConfig`] and are passed alongside it, never stored globally.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::difficulty::DifficultyConfig;
use super::events::{GameEvent, SessionOutcome};
use super::screen::{Screen, ScreenAction, TransitionError};
use super::spawner::{IdleTimer, SpawnSchedule};
use crate::config::GameConfig;
use crate::render::Color;
use crate::ticks_to_ms;

/// Vertical motion phase of the character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionPhase {
    #[default]
    Grounded,
    Ascending,
    Descending,
}

/// The runner. Horizontal position is fixed by config; only height changes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Character {
    /// Height above the ground line (0 = standing)
    pub y: f32,
    /// Vertical velocity per tick, positive is up
    pub velocity_y: f32,
    pub phase: MotionPhase,
    /// Reduced impulses used since leaving the ground
    pub air_jumps: u32,
}

impl Character {
    pub fn on_ground(&self) -> bool {
        self.phase == MotionPhase::Grounded
    }

    pub fn is_jumping(&self) -> bool {
        !self.on_ground()
    }
}

/// Obstacle variants. Sprite and fallback color are looked up from the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Rock,
    Fruit,
    Lamp,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Rock, ObstacleKind::Fruit, ObstacleKind::Lamp];

    /// Index into the manifest's obstacle sprite list
    pub fn sprite_index(self) -> usize {
        match self {
            ObstacleKind::Rock => 0,
            ObstacleKind::Fruit => 1,
            ObstacleKind::Lamp => 2,
        }
    }

    /// Solid color drawn when the sprite is not loaded
    pub fn fallback_color(self) -> Color {
        match self {
            ObstacleKind::Rock => Color::rgb(0x8B, 0x45, 0x13),
            ObstacleKind::Fruit => Color::rgb(0xFF, 0x8C, 0x00),
            ObstacleKind::Lamp => Color::rgb(0xFF, 0xD7, 0x00),
        }
    }
}

/// An obstacle entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner in screen space
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// True once the obstacle has fully left the field on any axis
    pub fn is_off_field(&self, width: f32, height: f32) -> bool {
        let b = self.bounds();
        b.right() < 0.0 || b.left() > width || b.bottom() < 0.0 || b.top() > height
    }
}

/// Per-session counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub jumps: u32,
    pub obstacles_spawned: u32,
    pub forced_spawns: u32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Base seed; each session derives its own RNG stream from it
    pub seed: u64,
    /// Sessions started so far (first session is 1)
    pub session: u32,
    pub screen: Screen,
    /// Current scenario (0-based). Equals the scenario count after victory.
    pub scenario_index: usize,
    /// Percent complete of the current scenario, 0-100
    pub progress: f64,
    /// Always 1; the first hit ends the run
    pub lives: u8,
    pub character: Character,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub difficulty: DifficultyConfig,
    pub spawn: SpawnSchedule,
    pub idle: IdleTimer,
    pub stats: SessionStats,
    /// Simulation ticks elapsed this session
    pub time_ticks: u64,
    pub outcome: Option<SessionOutcome>,
    pub rng: Pcg32,
    /// Events produced since the host last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a state sitting on the first screen (loading or start)
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let screen = if config.assets.preload {
            Screen::Loading
        } else {
            Screen::Start
        };
        Self {
            seed,
            session: 0,
            screen,
            scenario_index: 0,
            progress: 0.0,
            lives: 1,
            character: Character::default(),
            obstacles: Vec::new(),
            difficulty: config.difficulty.initial,
            spawn: SpawnSchedule::default(),
            idle: IdleTimer::default(),
            stats: SessionStats::default(),
            time_ticks: 0,
            outcome: None,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Session clock in milliseconds, derived from the tick counter
    pub fn now_ms(&self) -> f64 {
        ticks_to_ms(self.time_ticks)
    }

    /// Apply a screen transition, asserting the legal predecessor
    pub fn transition(&mut self, action: ScreenAction) -> Result<Screen, TransitionError> {
        let next = self.screen.transition(action)?;
        self.screen = next;
        Ok(next)
    }

    /// Reinitialize everything a session touches to its initial values.
    ///
    /// Difficulty always returns to the configured initial values; nothing
    /// carries over from the previous session except the base seed.
    pub fn reset_session(&mut self, config: &GameConfig) {
        self.scenario_index = 0;
        self.progress = 0.0;
        self.lives = 1;
        self.character = Character::default();
        self.obstacles.clear();
        self.difficulty = config.difficulty.initial;
        self.spawn = SpawnSchedule::default();
        self.idle = IdleTimer::default();
        self.stats = SessionStats::default();
        self.time_ticks = 0;
        self.outcome = None;
        self.rng = Pcg32::seed_from_u64(self.seed.wrapping_add(self.session as u64));
        self.next_id = 1;
    }

    /// Reset and arm a fresh session. Screen must already be `Playing`.
    pub fn begin_session(&mut self, config: &GameConfig) {
        self.session += 1;
        self.reset_session(config);
        self.spawn.arm(self.now_ms(), self.difficulty.spawn_interval_ms);
        self.events.push(GameEvent::SessionStart {
            session: self.session,
        });
        log::info!("Session {} started (seed {})", self.session, self.seed);
    }

    /// Enter a terminal screen and stop spawning in the same step.
    ///
    /// Returns false (and changes nothing) if the session already ended.
    pub fn end_session(&mut self, outcome: SessionOutcome) -> bool {
        let action = match outcome {
            SessionOutcome::Collided => ScreenAction::Collide,
            SessionOutcome::Victory(_) => ScreenAction::Win,
        };
        if let Err(e) = self.transition(action) {
            log::debug!("Ignoring session end: {}", e);
            return false;
        }
        self.spawn.disarm();
        self.outcome = Some(outcome);
        self.events.push(GameEvent::SessionEnd { outcome });
        log::info!("Session {} ended: {}", self.session, outcome.message());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_flags_are_exclusive() {
        let mut c = Character::default();
        assert!(c.on_ground() && !c.is_jumping());
        c.phase = MotionPhase::Descending;
        assert!(!c.on_ground() && c.is_jumping());
    }

    #[test]
    fn test_off_field_on_every_axis() {
        let mut o = Obstacle {
            id: 1,
            kind: ObstacleKind::Lamp,
            pos: Vec2::new(-39.0, 100.0),
            vel: Vec2::ZERO,
            size: Vec2::new(40.0, 40.0),
        };
        assert!(!o.is_off_field(800.0, 400.0));
        o.pos.x = -40.5;
        assert!(o.is_off_field(800.0, 400.0));
        o.pos = Vec2::new(100.0, 400.5);
        assert!(o.is_off_field(800.0, 400.0));
        o.pos = Vec2::new(100.0, -41.0);
        assert!(o.is_off_field(800.0, 400.0));
        // Spawning exactly on the right edge is still on the field
        o.pos = Vec2::new(800.0, 100.0);
        assert!(!o.is_off_field(800.0, 400.0));
    }

    #[test]
    fn test_new_state_respects_preload_gate() {
        let mut config = GameConfig::default();
        assert_eq!(GameState::new(&config, 1).screen, Screen::Loading);
        config.assets.preload = false;
        assert_eq!(GameState::new(&config, 1).screen, Screen::Start);
    }

    #[test]
    fn test_end_session_only_once() {
        let config = GameConfig {
            assets: crate::config::AssetsConfig {
                preload: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut state = GameState::new(&config, 5);
        state.transition(ScreenAction::Start).unwrap();
        state.begin_session(&config);
        assert!(state.spawn.is_armed());

        assert!(state.end_session(SessionOutcome::Collided));
        assert!(!state.spawn.is_armed());
        assert!(!state.end_session(SessionOutcome::Collided));

        let ends = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::SessionEnd { .. }))
            .count();
        assert_eq!(ends, 1);
    }
}
