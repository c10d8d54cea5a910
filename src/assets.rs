//! Asset manifest and load tracking
//!
//! The core never loads anything itself. The host walks [`AssetManifest::entries`],
//! starts a load per entry, and reports completion to an [`AssetTracker`]. A
//! failed load still counts toward completion; the renderer draws a solid
//! color in place of any sprite that is not ready.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::render::SpriteAvailability;

/// Index-based handle to a sprite in the manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    Character,
    /// Scenario background by scenario index
    Background(usize),
    /// Obstacle sprite by `ObstacleKind::sprite_index`
    Obstacle(usize),
}

/// Ordered asset identifiers (file names or URLs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    pub character: String,
    pub scenarios: Vec<String>,
    pub obstacles: Vec<String>,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            character: "character_toy.png".to_string(),
            scenarios: vec![
                "scenario_1_chapada.png".to_string(),
                "scenario_2_deserto.png".to_string(),
                "scenario_3_cidade.png".to_string(),
                "scenario_4_caverna_tesouro.png".to_string(),
            ],
            obstacles: vec![
                "obstacle_1_rock.png".to_string(),
                "obstacle_2_fruit.png".to_string(),
                "obstacle_3_lamp.png".to_string(),
            ],
        }
    }
}

impl AssetManifest {
    /// Number of sprites, character included
    pub fn total(&self) -> usize {
        1 + self.scenarios.len() + self.obstacles.len()
    }

    pub fn path(&self, sprite: SpriteId) -> Option<&str> {
        match sprite {
            SpriteId::Character => Some(self.character.as_str()),
            SpriteId::Background(i) => self.scenarios.get(i).map(String::as_str),
            SpriteId::Obstacle(i) => self.obstacles.get(i).map(String::as_str),
        }
    }

    /// Every sprite with its path, character first
    pub fn entries(&self) -> Vec<(SpriteId, &str)> {
        let mut entries = Vec::with_capacity(self.total());
        entries.push((SpriteId::Character, self.character.as_str()));
        for (i, path) in self.scenarios.iter().enumerate() {
            entries.push((SpriteId::Background(i), path.as_str()));
        }
        for (i, path) in self.obstacles.iter().enumerate() {
            entries.push((SpriteId::Obstacle(i), path.as_str()));
        }
        entries
    }
}

/// Tracks which sprites finished loading
#[derive(Debug, Clone, Default)]
pub struct AssetTracker {
    total: usize,
    ready: HashSet<SpriteId>,
    failed: HashSet<SpriteId>,
}

impl AssetTracker {
    pub fn new(manifest: &AssetManifest) -> Self {
        Self {
            total: manifest.total(),
            ready: HashSet::new(),
            failed: HashSet::new(),
        }
    }

    /// Record a successful load. Returns true only on the call that completes the set.
    pub fn mark_loaded(&mut self, sprite: SpriteId) -> bool {
        let was_complete = self.is_complete();
        self.failed.remove(&sprite);
        self.ready.insert(sprite);
        !was_complete && self.is_complete()
    }

    /// Record a failed load. Returns true only on the call that completes the set.
    pub fn mark_failed(&mut self, sprite: SpriteId) -> bool {
        let was_complete = self.is_complete();
        if !self.ready.contains(&sprite) {
            log::warn!("Asset failed to load: {:?}", sprite);
            self.failed.insert(sprite);
        }
        !was_complete && self.is_complete()
    }

    pub fn settled(&self) -> usize {
        self.ready.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.settled() >= self.total
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

impl SpriteAvailability for AssetTracker {
    fn is_ready(&self, sprite: SpriteId) -> bool {
        self.ready.contains(&sprite)
    }
}
