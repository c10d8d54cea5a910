//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Time measured in ticks, never the wall clock
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod events;
pub mod physics;
pub mod progression;
pub mod scheduler;
pub mod screen;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, Rect, check_collisions};
pub use difficulty::{DifficultyConfig, DifficultyTuning};
pub use events::{GameEvent, GameHooks, SessionOutcome, dispatch};
pub use physics::{AirJumpPolicy, CharacterConfig, JumpOutcome, jump, update_character, update_obstacles};
pub use progression::{ProgressOutcome, VictoryGrade, advance_progress};
pub use scheduler::{FixedStepLoop, LoopToken};
pub use screen::{Screen, ScreenAction, TransitionError};
pub use spawner::{
    IdlePolicy, IdleTimer, SpawnConfig, SpawnPlacement, SpawnSchedule, SpawnStrategy,
    maybe_spawn_obstacle,
};
pub use state::{Character, GameState, MotionPhase, Obstacle, ObstacleKind, SessionStats};
pub use tick::{DEFAULT_SEED, Hud, Simulation, tick};
