//! Scripted jump input for the headless demo and session tests
//!
//! Ground-level obstacles sit too low and too long under the character for a
//! single jump to clear, so the bot leaves the ground shortly before contact
//! and spends its air jump on the way down while the obstacle is still below.

use super::collision::Rect;
use super::state::{GameState, MotionPhase, Obstacle};
use crate::config::GameConfig;

/// Ticks of obstacle travel ahead of the hit-box at which a jump starts
pub const JUMP_LEAD_TICKS: f32 = 12.0;
/// Height below which a descending character spends its air jump (px)
pub const AIR_JUMP_HEIGHT: f32 = 50.0;

/// Hit-box of the character standing on the ground
fn standing_hitbox(config: &GameConfig) -> Rect {
    config
        .character_box(&Default::default())
        .inset(config.collision.hitbox_margin)
}

/// Obstacle that would hit a grounded character if it kept its row
fn threatens(obstacle: &Obstacle, hitbox: &Rect) -> bool {
    let b = obstacle.bounds();
    b.bottom() > hitbox.top() && b.top() < hitbox.bottom() && b.right() > hitbox.left()
}

/// Whether the bot presses jump before the next tick
pub fn wants_jump(state: &GameState, config: &GameConfig) -> bool {
    if !state.screen.is_simulating() {
        return false;
    }
    let hitbox = standing_hitbox(config);
    let ahead = |o: &Obstacle| {
        let reach = hitbox.right() + o.vel.x.abs() * JUMP_LEAD_TICKS;
        threatens(o, &hitbox) && o.bounds().left() < reach
    };

    match state.character.phase {
        MotionPhase::Grounded => state.obstacles.iter().any(ahead),
        MotionPhase::Descending => {
            state.character.y < AIR_JUMP_HEIGHT && state.obstacles.iter().any(ahead)
        }
        MotionPhase::Ascending => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::screen::Screen;
    use crate::sim::state::ObstacleKind;
    use glam::Vec2;

    fn playing() -> (GameState, GameConfig) {
        let mut config = GameConfig::default();
        config.assets.preload = false;
        let mut state = GameState::new(&config, 3);
        state.screen = Screen::Playing;
        (state, config)
    }

    fn rock(x: f32, y: f32) -> Obstacle {
        Obstacle {
            id: 1,
            kind: ObstacleKind::Rock,
            pos: Vec2::new(x, y),
            vel: Vec2::new(-3.0, 0.0),
            size: Vec2::new(40.0, 40.0),
        }
    }

    #[test]
    fn test_waits_for_the_lead() {
        let (mut state, config) = playing();
        let y = config.ground_obstacle_y();
        state.obstacles.push(rock(300.0, y));
        assert!(!wants_jump(&state, &config));
        state.obstacles[0].pos.x = 180.0;
        assert!(wants_jump(&state, &config));
    }

    #[test]
    fn test_ignores_high_and_passed_obstacles() {
        let (mut state, config) = playing();
        state.obstacles.push(rock(150.0, 60.0));
        state.obstacles.push(rock(40.0, config.ground_obstacle_y()));
        assert!(!wants_jump(&state, &config));
    }

    #[test]
    fn test_air_jump_only_when_low_and_descending() {
        let (mut state, config) = playing();
        state.obstacles.push(rock(120.0, config.ground_obstacle_y()));
        state.character.phase = MotionPhase::Ascending;
        state.character.y = 20.0;
        assert!(!wants_jump(&state, &config));

        state.character.phase = MotionPhase::Descending;
        state.character.y = 80.0;
        assert!(!wants_jump(&state, &config));
        state.character.y = 30.0;
        assert!(wants_jump(&state, &config));
    }

    #[test]
    fn test_idle_when_not_playing() {
        let (mut state, config) = playing();
        state.obstacles.push(rock(170.0, config.ground_obstacle_y()));
        state.screen = Screen::Paused;
        assert!(!wants_jump(&state, &config));
    }
}
