//! Frame building
//!
//! Turns the current state into an ordered list of draw commands. The host
//! replays them on whatever surface it has (a 2D canvas in the browser). A
//! sprite that is not loaded degrades to a solid rectangle; it never stops the
//! frame.

use serde::{Deserialize, Serialize};

use crate::assets::SpriteId;
use crate::config::GameConfig;
use crate::sim::collision::Rect;
use crate::sim::state::GameState;

/// Opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`
    pub fn to_css(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

pub const SKY_COLOR: Color = Color::rgb(0x87, 0xCE, 0xEB);
pub const CHARACTER_COLOR: Color = Color::rgb(0xFF, 0x6B, 0x6B);

/// Fallback background per scenario
const SCENARIO_COLORS: [Color; 4] = [
    SKY_COLOR,
    Color::rgb(0xED, 0xC9, 0x8A),
    Color::rgb(0x9B, 0x8A, 0xD8),
    Color::rgb(0x4A, 0x3B, 0x2A),
];

/// Whether a sprite can be drawn right now
pub trait SpriteAvailability {
    fn is_ready(&self, sprite: SpriteId) -> bool;
}

/// Nothing loaded; everything falls back to solid colors
pub struct NoSprites;

impl SpriteAvailability for NoSprites {
    fn is_ready(&self, _sprite: SpriteId) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: f32, height: f32 },
    FillRect { rect: Rect, color: Color },
    DrawImage { sprite: SpriteId, rect: Rect },
}

fn sprite_or_fill(
    sprites: &impl SpriteAvailability,
    sprite: SpriteId,
    rect: Rect,
    fallback: Color,
) -> DrawCommand {
    if sprites.is_ready(sprite) {
        DrawCommand::DrawImage { sprite, rect }
    } else {
        DrawCommand::FillRect {
            rect,
            color: fallback,
        }
    }
}

/// Fallback background color for a scenario
pub fn scenario_color(index: usize) -> Color {
    SCENARIO_COLORS[index % SCENARIO_COLORS.len()]
}

/// Build the draw list for one frame: background, character, then obstacles
pub fn build_frame(
    state: &GameState,
    config: &GameConfig,
    sprites: &impl SpriteAvailability,
) -> Vec<DrawCommand> {
    let field = Rect::new(0.0, 0.0, config.field.width, config.field.height);
    let mut commands = Vec::with_capacity(3 + state.obstacles.len());

    commands.push(DrawCommand::Clear {
        width: field.w,
        height: field.h,
    });

    // After victory the index runs one past the end; keep the final backdrop
    let scenario = state
        .scenario_index
        .min(config.scenarios.len().saturating_sub(1));
    commands.push(sprite_or_fill(
        sprites,
        SpriteId::Background(scenario),
        field,
        scenario_color(scenario),
    ));

    commands.push(sprite_or_fill(
        sprites,
        SpriteId::Character,
        config.character_box(&state.character),
        CHARACTER_COLOR,
    ));

    for obstacle in &state.obstacles {
        commands.push(sprite_or_fill(
            sprites,
            SpriteId::Obstacle(obstacle.kind.sprite_index()),
            obstacle.bounds(),
            obstacle.kind.fallback_color(),
        ));
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, ObstacleKind};
    use glam::Vec2;

    struct Only(SpriteId);

    impl SpriteAvailability for Only {
        fn is_ready(&self, sprite: SpriteId) -> bool {
            sprite == self.0
        }
    }

    fn state_with_obstacle(config: &GameConfig) -> GameState {
        let mut state = GameState::new(config, 1);
        state.obstacles.push(Obstacle {
            id: 1,
            kind: ObstacleKind::Fruit,
            pos: Vec2::new(500.0, 310.0),
            vel: Vec2::new(-3.0, 0.0),
            size: Vec2::new(40.0, 40.0),
        });
        state
    }

    #[test]
    fn test_missing_sprites_fall_back_to_fills() {
        let config = GameConfig::default();
        let state = state_with_obstacle(&config);
        let frame = build_frame(&state, &config, &NoSprites);

        assert_eq!(frame.len(), 4);
        assert_eq!(
            frame[0],
            DrawCommand::Clear {
                width: 800.0,
                height: 400.0
            }
        );
        assert_eq!(
            frame[2],
            DrawCommand::FillRect {
                rect: Rect::new(100.0, 290.0, 60.0, 60.0),
                color: CHARACTER_COLOR
            }
        );
        assert_eq!(
            frame[3],
            DrawCommand::FillRect {
                rect: Rect::new(500.0, 310.0, 40.0, 40.0),
                color: ObstacleKind::Fruit.fallback_color()
            }
        );
    }

    #[test]
    fn test_loaded_sprite_is_drawn() {
        let config = GameConfig::default();
        let state = state_with_obstacle(&config);
        let frame = build_frame(&state, &config, &Only(SpriteId::Obstacle(1)));
        assert_eq!(
            frame[3],
            DrawCommand::DrawImage {
                sprite: SpriteId::Obstacle(1),
                rect: Rect::new(500.0, 310.0, 40.0, 40.0)
            }
        );
        assert!(matches!(frame[1], DrawCommand::FillRect { .. }));
    }

    #[test]
    fn test_background_clamped_after_victory() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 1);
        state.scenario_index = config.scenarios.len();
        let frame = build_frame(&state, &config, &Only(SpriteId::Background(3)));
        assert!(matches!(
            frame[1],
            DrawCommand::DrawImage {
                sprite: SpriteId::Background(3),
                ..
            }
        ));
    }

    #[test]
    fn test_css_color() {
        assert_eq!(SKY_COLOR.to_css(), "#87CEEB");
    }
}
