//! Obstacle spawning
//!
//! There are no timers. The schedule holds one authoritative deadline that the
//! tick compares against the session clock; re-arming replaces it outright, so
//! a difficulty change can never leave two competing schedules.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{GameState, Obstacle, ObstacleKind};
use crate::config::GameConfig;

/// When obstacles appear
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SpawnStrategy {
    /// One obstacle every `DifficultyConfig::spawn_interval_ms`
    FixedInterval,
    /// Each tick, with the current scenario's `obstacle_rate`
    Probabilistic {
        /// Minimum gap between two spawns (ms)
        min_cooldown_ms: f64,
        /// No spawn while this many obstacles are active
        max_active: usize,
    },
}

/// Where a new obstacle starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnPlacement {
    /// Resting on the ground line
    Ground,
    /// Uniform height band, top edge in `[min_y, max_y)`
    Aerial { min_y: f32, max_y: f32 },
    /// Drops from the top edge at `fall_speed`, lands just ahead of the
    /// character and scrolls on as a ground obstacle
    Falling,
}

/// Anti-stalling policy: punish a player who never jumps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdlePolicy {
    pub enabled: bool,
    /// Time without a jump before a ground obstacle is forced (ms)
    pub timeout_ms: f64,
}

impl Default for IdlePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: 8000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub strategy: SpawnStrategy,
    /// Sampled uniformly for every regular spawn
    pub placements: Vec<SpawnPlacement>,
    pub idle: IdlePolicy,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            strategy: SpawnStrategy::FixedInterval,
            placements: vec![
                SpawnPlacement::Ground,
                SpawnPlacement::Aerial {
                    min_y: 50.0,
                    max_y: 300.0,
                },
                SpawnPlacement::Falling,
            ],
            idle: IdlePolicy::default(),
        }
    }
}

/// Spawn deadline bookkeeping. Disarmed outside of an active session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnSchedule {
    next_deadline_ms: Option<f64>,
    last_spawn_ms: Option<f64>,
}

impl SpawnSchedule {
    /// Set (or replace) the next deadline to `now + interval`
    pub fn arm(&mut self, now_ms: f64, interval_ms: f64) {
        self.next_deadline_ms = Some(now_ms + interval_ms);
    }

    /// Replace the pending deadline after a rate change. No-op when disarmed.
    pub fn rearm(&mut self, now_ms: f64, interval_ms: f64) {
        if self.is_armed() {
            self.arm(now_ms, interval_ms);
        }
    }

    pub fn disarm(&mut self) {
        self.next_deadline_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_deadline_ms.is_some()
    }

    pub fn deadline(&self) -> Option<f64> {
        self.next_deadline_ms
    }

    pub fn last_spawn(&self) -> Option<f64> {
        self.last_spawn_ms
    }

    fn record_spawn(&mut self, now_ms: f64) {
        self.last_spawn_ms = Some(now_ms);
    }
}

/// Time of the last jump, for the idle policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IdleTimer {
    pub last_jump_ms: f64,
}

impl IdleTimer {
    pub fn record_jump(&mut self, now_ms: f64) {
        self.last_jump_ms = now_ms;
    }

    fn expired(&self, now_ms: f64, policy: &IdlePolicy) -> bool {
        policy.enabled && now_ms - self.last_jump_ms >= policy.timeout_ms
    }

    /// Rewind halfway so a still-idle player gets the next forced obstacle sooner
    fn partial_reset(&mut self, now_ms: f64, policy: &IdlePolicy) {
        self.last_jump_ms = now_ms - policy.timeout_ms / 2.0;
    }
}

/// Decide whether an obstacle appears this tick.
///
/// The caller pushes the returned obstacle into `state.obstacles`. Nothing
/// spawns while the schedule is disarmed.
pub fn maybe_spawn_obstacle(
    state: &mut GameState,
    config: &GameConfig,
    now_ms: f64,
) -> Option<Obstacle> {
    if !state.spawn.is_armed() {
        return None;
    }

    let idle = &config.spawn.idle;
    if state.idle.expired(now_ms, idle) {
        state.idle.partial_reset(now_ms, idle);
        state.spawn.record_spawn(now_ms);
        state.stats.forced_spawns += 1;
        log::debug!("Idle for {}ms, forcing a ground obstacle", idle.timeout_ms);
        return Some(build_obstacle(state, config, SpawnPlacement::Ground));
    }

    match config.spawn.strategy {
        SpawnStrategy::FixedInterval => {
            let deadline = state.spawn.deadline()?;
            if now_ms < deadline {
                return None;
            }
            state.spawn.arm(now_ms, state.difficulty.spawn_interval_ms);
        }
        SpawnStrategy::Probabilistic {
            min_cooldown_ms,
            max_active,
        } => {
            if state.obstacles.len() >= max_active {
                return None;
            }
            if let Some(last) = state.spawn.last_spawn() {
                if now_ms - last < min_cooldown_ms {
                    return None;
                }
            }
            let rate = config
                .scenario(state.scenario_index)
                .map_or(0.0, |s| s.obstacle_rate)
                .clamp(0.0, 1.0);
            if !state.rng.random_bool(rate) {
                return None;
            }
        }
    }

    state.spawn.record_spawn(now_ms);
    let placement = pick_placement(state, config);
    Some(build_obstacle(state, config, placement))
}

fn pick_placement(state: &mut GameState, config: &GameConfig) -> SpawnPlacement {
    let placements = &config.spawn.placements;
    if placements.is_empty() {
        return SpawnPlacement::Ground;
    }
    placements[state.rng.random_range(0..placements.len())]
}

/// Horizontal range past the character's front edge where falling obstacles land
const FALLING_LANDING_SPREAD: f32 = 120.0;

/// Build an obstacle for `placement`. Ground and aerial obstacles enter at the
/// right edge; falling ones drop from the top edge.
pub fn build_obstacle(
    state: &mut GameState,
    config: &GameConfig,
    placement: SpawnPlacement,
) -> Obstacle {
    let size = Vec2::new(config.obstacles.width, config.obstacles.height);
    let kind = ObstacleKind::ALL[state.rng.random_range(0..ObstacleKind::ALL.len())];
    let mut vel = Vec2::new(-state.difficulty.obstacle_speed, 0.0);
    let mut x = config.field.width;

    let y = match placement {
        SpawnPlacement::Ground => config.ground_obstacle_y(),
        SpawnPlacement::Aerial { min_y, max_y } if min_y < max_y => {
            state.rng.random_range(min_y..max_y)
        }
        SpawnPlacement::Aerial { min_y, .. } => min_y,
        SpawnPlacement::Falling => {
            vel.y = state.difficulty.fall_speed;
            // Start where the drop touches down just ahead of the character
            let landing_x = config.character.x
                + config.character.width
                + state.rng.random_range(0.0..=FALLING_LANDING_SPREAD);
            let ticks_to_land = config.ground_obstacle_y() / vel.y;
            x = (landing_x - vel.x * ticks_to_land).min(config.field.width);
            0.0
        }
    };

    state.stats.obstacles_spawned += 1;
    Obstacle {
        id: state.next_entity_id(),
        kind,
        pos: Vec2::new(x, y),
        vel,
        size,
    }
}
