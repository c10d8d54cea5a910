//! Treasure Run - a side-scrolling treasure hunt runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, progression)
//! - `config`: Data-driven game tuning, loadable from JSON
//! - `assets`: Asset manifest and load tracking
//! - `render`: Backend-agnostic draw command list
//! - `settings`: Player preferences (sound, HUD)
//! - `audio`, `canvas`: Browser-only Web Audio cues and 2D canvas backend

pub mod assets;
pub mod config;
pub mod render;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use config::{ConfigError, GameConfig};
pub use settings::Settings;
pub use sim::Simulation;

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second. All per-tick tunables assume this rate.
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Logical play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 400.0;
    /// Gap between the character's feet and the bottom edge of the field
    pub const GROUND_MARGIN: f32 = 50.0;

    /// Character defaults
    pub const CHARACTER_X: f32 = 100.0;
    pub const CHARACTER_SIZE: f32 = 60.0;
    pub const JUMP_SPEED: f32 = 8.0;
    pub const GRAVITY: f32 = 0.5;
    pub const MAX_JUMP_HEIGHT: f32 = 120.0;

    /// Obstacle defaults
    pub const OBSTACLE_SIZE: f32 = 40.0;
    pub const OBSTACLE_SPEED: f32 = 3.0;
    pub const SPAWN_INTERVAL_MS: f64 = 2000.0;
    pub const SPAWN_INTERVAL_FLOOR_MS: f64 = 1000.0;

    /// Progress gained per tick (percentage points)
    pub const PROGRESS_PER_TICK: f64 = 0.2;
}

/// Convert a tick count to elapsed session milliseconds
#[inline]
pub fn ticks_to_ms(ticks: u64) -> f64 {
    // Multiply before dividing so whole-millisecond tick counts stay exact
    ticks as f64 * 1000.0 / consts::TICK_RATE as f64
}
