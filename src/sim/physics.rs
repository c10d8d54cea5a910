//! Character and obstacle motion
//!
//! Simplified Euler integration in per-tick units. `dt` is measured in ticks,
//! so the fixed-step loop always passes `1.0`.
//!
//! Clamping policy: both limits apply. Landing on the ground line snaps to
//! `y = 0` and grounds the character. Rising past `max_height` snaps to the
//! ceiling and zeroes the upward velocity, so the character starts falling on
//! the following tick.

use serde::{Deserialize, Serialize};

use super::state::{Character, MotionPhase, Obstacle};
use crate::config::FieldConfig;
use crate::consts::*;

/// What a jump request does while already airborne
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AirJumpPolicy {
    /// Mid-air jump requests are ignored. Validation only accepts this when a
    /// single jump clears a ground obstacle at the initial speed.
    Ignore,
    /// Grant `factor * jump_speed`, at most `max_air_jumps` times per flight
    Reduced { factor: f32, max_air_jumps: u32 },
}

impl Default for AirJumpPolicy {
    fn default() -> Self {
        AirJumpPolicy::Reduced {
            factor: 0.7,
            max_air_jumps: 1,
        }
    }
}

/// Character geometry and motion tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Fixed horizontal position (left edge)
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Upward velocity granted by a grounded jump
    pub jump_speed: f32,
    /// Velocity lost per tick
    pub gravity: f32,
    /// Ceiling for `Character::y`
    pub max_height: f32,
    pub air_jump: AirJumpPolicy,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            x: CHARACTER_X,
            width: CHARACTER_SIZE,
            height: CHARACTER_SIZE,
            jump_speed: JUMP_SPEED,
            gravity: GRAVITY,
            max_height: MAX_JUMP_HEIGHT,
            air_jump: AirJumpPolicy::default(),
        }
    }
}

/// Result of a granted jump request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpOutcome {
    pub airborne: bool,
    pub velocity: f32,
}

/// Start a jump if the policy allows one right now
pub fn jump(character: &mut Character, config: &CharacterConfig) -> Option<JumpOutcome> {
    let (velocity, airborne) = if character.on_ground() {
        (config.jump_speed, false)
    } else {
        match config.air_jump {
            AirJumpPolicy::Ignore => return None,
            AirJumpPolicy::Reduced {
                factor,
                max_air_jumps,
            } => {
                if character.air_jumps >= max_air_jumps {
                    return None;
                }
                character.air_jumps += 1;
                (config.jump_speed * factor, true)
            }
        }
    };

    character.velocity_y = velocity;
    character.phase = MotionPhase::Ascending;
    Some(JumpOutcome { airborne, velocity })
}

/// Advance the character by `dt` ticks
pub fn update_character(character: &mut Character, config: &CharacterConfig, dt: f32) {
    if character.on_ground() {
        character.y = 0.0;
        character.velocity_y = 0.0;
        return;
    }

    character.velocity_y -= config.gravity * dt;
    character.y += character.velocity_y * dt;

    if character.y <= 0.0 && character.velocity_y <= 0.0 {
        character.y = 0.0;
        character.velocity_y = 0.0;
        character.phase = MotionPhase::Grounded;
        character.air_jumps = 0;
    } else if character.y > config.max_height {
        character.y = config.max_height;
        character.velocity_y = character.velocity_y.min(0.0);
        character.phase = MotionPhase::Descending;
    } else if character.velocity_y > 0.0 {
        character.phase = MotionPhase::Ascending;
    } else {
        character.phase = MotionPhase::Descending;
    }
}

/// Ticks a single grounded jump, with no air jump, spends at `y >= height`
pub fn single_jump_airtime(config: &CharacterConfig, height: f32) -> u32 {
    let mut c = Character::default();
    c.velocity_y = config.jump_speed;
    c.phase = MotionPhase::Ascending;

    let mut ticks = 0;
    while !c.on_ground() && ticks < AIRTIME_TICK_LIMIT {
        update_character(&mut c, config, 1.0);
        if c.y >= height {
            ticks += 1;
        }
    }
    ticks
}

const AIRTIME_TICK_LIMIT: u32 = 10_000;

/// Move every obstacle and drop the ones that left the field.
///
/// A falling obstacle that reaches the ground line settles on it and keeps
/// scrolling as a ground obstacle.
pub fn update_obstacles(obstacles: &mut Vec<Obstacle>, field: &FieldConfig, dt: f32) {
    let ground = field.ground_line();
    for obstacle in obstacles.iter_mut() {
        obstacle.advance(dt);
        if obstacle.vel.y > 0.0 && obstacle.pos.y + obstacle.size.y >= ground {
            obstacle.pos.y = ground - obstacle.size.y;
            obstacle.vel.y = 0.0;
        }
    }
    obstacles.retain(|o| !o.is_off_field(field.width, field.height));
}
