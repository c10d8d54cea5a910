//! Difficulty scaling between scenarios
//!
//! Scaling is a pure function of the previous config. Speeds only go up and
//! the spawn interval only goes down, never past its floor.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunables that change as scenarios advance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Horizontal obstacle speed (px per tick)
    pub obstacle_speed: f32,
    /// Gap between fixed-interval spawns (ms)
    pub spawn_interval_ms: f64,
    /// Vertical speed of falling obstacles (px per tick)
    pub fall_speed: f32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            obstacle_speed: OBSTACLE_SPEED,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            fall_speed: 2.0,
        }
    }
}

/// How difficulty ramps per scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    /// Values at the start of every session
    pub initial: DifficultyConfig,
    pub speed_step: f32,
    pub interval_step_ms: f64,
    /// Spawn interval never drops below this
    pub interval_floor_ms: f64,
    pub fall_speed_step: f32,
    pub fall_speed_max: f32,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            initial: DifficultyConfig::default(),
            speed_step: 0.5,
            interval_step_ms: 200.0,
            interval_floor_ms: SPAWN_INTERVAL_FLOOR_MS,
            fall_speed_step: 0.25,
            fall_speed_max: 5.0,
        }
    }
}

impl DifficultyTuning {
    /// Config for the scenario after the one `current` belongs to
    pub fn next_config(&self, current: &DifficultyConfig) -> DifficultyConfig {
        DifficultyConfig {
            obstacle_speed: current.obstacle_speed + self.speed_step,
            spawn_interval_ms: (current.spawn_interval_ms - self.interval_step_ms)
                .max(self.interval_floor_ms),
            fall_speed: (current.fall_speed + self.fall_speed_step)
                .min(self.fall_speed_max)
                .max(current.fall_speed),
        }
    }

    /// Config in effect while playing `scenario_index` (0 = initial)
    pub fn config_for(&self, scenario_index: usize) -> DifficultyConfig {
        (0..scenario_index).fold(self.initial, |config, _| self.next_config(&config))
    }
}
