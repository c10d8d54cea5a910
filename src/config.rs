//! Data-driven game tuning
//!
//! Every section defaults to the shipped values, so a JSON override only needs
//! the fields it changes:
//!
//! ```json
//! { "collision": { "hitbox_margin": 4.0 }, "spawn": { "strategy": { "mode": "fixed_interval" } } }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::AssetManifest;
use crate::consts::*;
use crate::sim::collision::Rect;
use crate::sim::difficulty::DifficultyTuning;
use crate::sim::physics::{AirJumpPolicy, CharacterConfig, single_jump_airtime};
use crate::sim::spawner::{SpawnConfig, SpawnPlacement, SpawnStrategy};
use crate::sim::state::Character;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse game config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid game config: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Logical play field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
    /// Distance from the ground line to the bottom edge
    pub ground_margin: f32,
}

impl FieldConfig {
    /// Screen y of the ground line
    pub fn ground_line(&self) -> f32 {
        self.height - self.ground_margin
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            ground_margin: GROUND_MARGIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            width: OBSTACLE_SIZE,
            height: OBSTACLE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Inward shrink of the character's hit-box on every side (px)
    pub hitbox_margin: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self { hitbox_margin: 10.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Percentage points gained per tick
    pub per_tick: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            per_tick: PROGRESS_PER_TICK,
        }
    }
}

/// One stage of the run. Its background is the manifest entry at the same index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    /// Per-tick spawn probability under the probabilistic strategy
    pub obstacle_rate: f64,
}

impl ScenarioConfig {
    fn new(name: &str, obstacle_rate: f64) -> Self {
        Self {
            name: name.to_string(),
            obstacle_rate,
        }
    }
}

pub fn default_scenarios() -> Vec<ScenarioConfig> {
    vec![
        ScenarioConfig::new("Chapada Diamantina", 0.010),
        ScenarioConfig::new("Arabian Desert", 0.014),
        ScenarioConfig::new("Magic City", 0.018),
        ScenarioConfig::new("Treasure Cave", 0.022),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Hold the start screen until every asset has loaded or failed
    pub preload: bool,
    pub manifest: AssetManifest,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            preload: true,
            manifest: AssetManifest::default(),
        }
    }
}

/// Complete game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub field: FieldConfig,
    pub character: CharacterConfig,
    pub obstacles: ObstacleConfig,
    pub difficulty: DifficultyTuning,
    pub spawn: SpawnConfig,
    pub collision: CollisionConfig,
    pub progress: ProgressConfig,
    pub scenarios: Vec<ScenarioConfig>,
    pub assets: AssetsConfig,
    /// Fixed RNG seed; the host picks one from the clock when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            character: CharacterConfig::default(),
            obstacles: ObstacleConfig::default(),
            difficulty: DifficultyTuning::default(),
            spawn: SpawnConfig::default(),
            collision: CollisionConfig::default(),
            progress: ProgressConfig::default(),
            scenarios: default_scenarios(),
            assets: AssetsConfig::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON override
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn scenario(&self, index: usize) -> Option<&ScenarioConfig> {
        self.scenarios.get(index)
    }

    /// Screen-space top of the character when standing
    pub fn ground_top(&self) -> f32 {
        self.field.height - self.field.ground_margin - self.character.height
    }

    /// Screen-space top of an obstacle resting on the ground line
    pub fn ground_obstacle_y(&self) -> f32 {
        self.field.height - self.field.ground_margin - self.obstacles.height
    }

    /// Character sprite box in screen space
    pub fn character_box(&self, character: &Character) -> Rect {
        Rect::new(
            self.character.x,
            self.ground_top() - character.y,
            self.character.width,
            self.character.height,
        )
    }

    /// Whether ground obstacles can occur: placed directly, landing from a
    /// fall, or forced on an idle player
    fn has_ground_obstacles(&self) -> bool {
        self.spawn.idle.enabled
            || self
                .spawn
                .placements
                .iter()
                .any(|p| matches!(p, SpawnPlacement::Ground | SpawnPlacement::Falling))
    }

    /// One jump must keep the hit-box above a ground obstacle for as long as
    /// the slowest obstacle takes to pass under it
    fn check_single_jump_clears(&self) -> Result<(), ConfigError> {
        let margin = self.collision.hitbox_margin;
        let clearance = self.obstacles.height - margin;
        if clearance <= 0.0 {
            return Ok(());
        }
        let hitbox_width = (self.character.width - 2.0 * margin).max(0.0);
        let needed = (hitbox_width + self.obstacles.width) / self.difficulty.initial.obstacle_speed;
        let airtime = single_jump_airtime(&self.character, clearance);
        if (airtime as f32) < needed {
            return Err(invalid(
                "character.air_jump",
                format!(
                    "a single jump stays {} ticks above a ground obstacle, {:.1} needed",
                    airtime, needed
                ),
            ));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field.width <= 0.0 || self.field.height <= 0.0 {
            return Err(invalid("field", "dimensions must be positive"));
        }
        if self.ground_top() < 0.0 {
            return Err(invalid("field.ground_margin", "leaves no room for the character"));
        }

        let c = &self.character;
        if c.width <= 0.0 || c.height <= 0.0 {
            return Err(invalid("character", "dimensions must be positive"));
        }
        if c.gravity <= 0.0 || c.jump_speed <= 0.0 {
            return Err(invalid("character", "gravity and jump_speed must be positive"));
        }
        if c.max_height <= 0.0 {
            return Err(invalid("character.max_height", "must be positive"));
        }
        if let AirJumpPolicy::Reduced { factor, .. } = c.air_jump {
            if !(0.0..=1.0).contains(&factor) {
                return Err(invalid("character.air_jump.factor", format!("{} not in [0, 1]", factor)));
            }
        }

        if self.obstacles.width <= 0.0 || self.obstacles.height <= 0.0 {
            return Err(invalid("obstacles", "dimensions must be positive"));
        }

        let d = &self.difficulty;
        if d.interval_floor_ms <= 0.0 {
            return Err(invalid("difficulty.interval_floor_ms", "must be positive"));
        }
        if d.initial.spawn_interval_ms < d.interval_floor_ms {
            return Err(invalid("difficulty.initial.spawn_interval_ms", "is below the floor"));
        }
        if d.speed_step < 0.0 || d.interval_step_ms < 0.0 || d.fall_speed_step < 0.0 {
            return Err(invalid("difficulty", "steps must not be negative"));
        }
        if d.initial.obstacle_speed <= 0.0 {
            return Err(invalid("difficulty.initial.obstacle_speed", "must be positive"));
        }

        if self.spawn.placements.is_empty() {
            return Err(invalid("spawn.placements", "must not be empty"));
        }
        for placement in &self.spawn.placements {
            if let SpawnPlacement::Aerial { min_y, max_y } = *placement {
                if min_y > max_y {
                    return Err(invalid("spawn.placements", "aerial min_y exceeds max_y"));
                }
            }
        }
        let falling = self.spawn.placements.contains(&SpawnPlacement::Falling);
        if falling && d.initial.fall_speed <= 0.0 {
            return Err(invalid("difficulty.initial.fall_speed", "must be positive"));
        }
        if c.air_jump == AirJumpPolicy::Ignore && self.has_ground_obstacles() {
            self.check_single_jump_clears()?;
        }
        if let SpawnStrategy::Probabilistic { min_cooldown_ms, .. } = self.spawn.strategy {
            if min_cooldown_ms < 0.0 {
                return Err(invalid("spawn.strategy.min_cooldown_ms", "must not be negative"));
            }
        }
        if self.spawn.idle.timeout_ms <= 0.0 {
            return Err(invalid("spawn.idle.timeout_ms", "must be positive"));
        }

        if self.collision.hitbox_margin < 0.0 {
            return Err(invalid("collision.hitbox_margin", "must not be negative"));
        }
        if self.progress.per_tick <= 0.0 {
            return Err(invalid("progress.per_tick", "must be positive"));
        }

        if self.scenarios.is_empty() {
            return Err(invalid("scenarios", "must not be empty"));
        }
        for scenario in &self.scenarios {
            if !(0.0..=1.0).contains(&scenario.obstacle_rate) {
                return Err(invalid(
                    "scenarios.obstacle_rate",
                    format!("{} for {} not in [0, 1]", scenario.obstacle_rate, scenario.name),
                ));
            }
        }
        if self.assets.manifest.scenarios.len() < self.scenarios.len() {
            log::warn!(
                "Manifest has {} backgrounds for {} scenarios; the rest use a solid color",
                self.assets.manifest.scenarios.len(),
                self.scenarios.len()
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn test_geometry_matches_field() {
        let config = GameConfig::default();
        assert_eq!(config.ground_top(), 290.0);
        assert_eq!(config.ground_obstacle_y(), 310.0);

        let mut c = Character::default();
        assert_eq!(config.character_box(&c), Rect::new(100.0, 290.0, 60.0, 60.0));
        c.y = 40.0;
        assert_eq!(config.character_box(&c).y, 250.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(
            r#"{
                "collision": { "hitbox_margin": 4.0 },
                "character": { "air_jump": { "mode": "reduced", "factor": 0.5, "max_air_jumps": 2 } },
                "spawn": { "strategy": { "mode": "probabilistic", "min_cooldown_ms": 600.0, "max_active": 3 } },
                "seed": 7
            }"#,
        )
        .unwrap();
        assert_eq!(config.collision.hitbox_margin, 4.0);
        assert_eq!(
            config.character.air_jump,
            AirJumpPolicy::Reduced {
                factor: 0.5,
                max_air_jumps: 2
            }
        );
        assert_eq!(config.character.jump_speed, JUMP_SPEED);
        assert_eq!(
            config.spawn.strategy,
            SpawnStrategy::Probabilistic {
                min_cooldown_ms: 600.0,
                max_active: 3
            }
        );
        assert_eq!(config.spawn.placements.len(), 3);
        assert_eq!(config.scenarios.len(), 4);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_initial_interval_below_floor() {
        let err = GameConfig::from_json(
            r#"{ "difficulty": { "initial": { "spawn_interval_ms": 500.0 } } }"#,
        )
        .unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => {
                assert_eq!(field, "difficulty.initial.spawn_interval_ms")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn invalid_field(config: &GameConfig) -> &'static str {
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => field,
            other => panic!("expected an invalid field, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_stationary_obstacles() {
        let mut config = GameConfig::default();
        config.difficulty.initial.obstacle_speed = 0.0;
        assert_eq!(invalid_field(&config), "difficulty.initial.obstacle_speed");
        config.difficulty.initial.obstacle_speed = -3.0;
        assert_eq!(invalid_field(&config), "difficulty.initial.obstacle_speed");

        let err = GameConfig::from_json(
            r#"{ "difficulty": { "initial": { "obstacle_speed": 0.0 } } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("obstacle_speed"), "{err}");
    }

    #[test]
    fn test_rejects_falling_without_fall_speed() {
        let mut config = GameConfig::default();
        config.difficulty.initial.fall_speed = 0.0;
        assert_eq!(invalid_field(&config), "difficulty.initial.fall_speed");

        config.spawn.placements = vec![SpawnPlacement::Ground];
        config.validate().unwrap();
    }

    #[test]
    fn test_rejects_single_jump_that_cannot_clear_ground() {
        let mut config = GameConfig::default();
        config.character.air_jump = AirJumpPolicy::Ignore;
        // 22 ticks above 30 px against 80 px / 3 px per tick
        assert_eq!(invalid_field(&config), "character.air_jump");

        // Still rejected when ground obstacles only come from the idle policy
        config.spawn.placements = vec![SpawnPlacement::Aerial {
            min_y: 50.0,
            max_y: 200.0,
        }];
        assert_eq!(invalid_field(&config), "character.air_jump");

        // Or only from falling obstacles landing
        config.spawn.idle.enabled = false;
        config.spawn.placements.push(SpawnPlacement::Falling);
        assert_eq!(invalid_field(&config), "character.air_jump");
    }

    #[test]
    fn test_accepts_single_jump_when_geometry_allows() {
        let ignore = |config: &mut GameConfig| config.character.air_jump = AirJumpPolicy::Ignore;

        // No ground obstacles at all
        let mut config = GameConfig::default();
        ignore(&mut config);
        config.spawn.idle.enabled = false;
        config.spawn.placements = vec![SpawnPlacement::Aerial {
            min_y: 50.0,
            max_y: 200.0,
        }];
        config.validate().unwrap();

        // Fast enough to pass under a 22 tick jump
        let mut config = GameConfig::default();
        ignore(&mut config);
        config.difficulty.initial.obstacle_speed = 4.0;
        config.validate().unwrap();

        // Low obstacles: 28 ticks above 10 px
        let mut config = GameConfig::default();
        ignore(&mut config);
        config.obstacles.height = 20.0;
        config.validate().unwrap();
    }

    #[test]
    fn test_rejects_empty_scenarios() {
        let mut config = GameConfig::default();
        config.scenarios.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }
}
