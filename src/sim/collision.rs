//! Axis-aligned collision detection
//!
//! The character and every obstacle are boxes in screen space (y grows
//! downward). Overlap is strict on both axes: boxes that merely touch along an
//! edge do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Obstacle;

/// Axis-aligned rectangle, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap test on both axes
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Shrink the box inward by `margin` on every side.
    ///
    /// A margin larger than half a dimension collapses that dimension to zero
    /// around the center, which can never strictly overlap anything.
    pub fn inset(&self, margin: f32) -> Rect {
        let mx = margin.min(self.w / 2.0);
        let my = margin.min(self.h / 2.0);
        Rect::new(self.x + mx, self.y + my, self.w - 2.0 * mx, self.h - 2.0 * my)
    }

    pub fn translate(&self, by: Vec2) -> Rect {
        Rect::new(self.x + by.x, self.y + by.y, self.w, self.h)
    }
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionResult {
    None,
    /// First obstacle (in spawn order) overlapping the character
    Hit(Obstacle),
}

impl CollisionResult {
    pub fn is_hit(&self) -> bool {
        matches!(self, CollisionResult::Hit(_))
    }
}

/// Check the character box against every active obstacle.
///
/// `hitbox_margin` shrinks the character box inward before testing so grazing
/// contacts with the sprite corners are forgiven. Only the first hit is
/// reported.
pub fn check_collisions(
    character_box: Rect,
    obstacles: &[Obstacle],
    hitbox_margin: f32,
) -> CollisionResult {
    let hitbox = character_box.inset(hitbox_margin);
    obstacles
        .iter()
        .find(|o| hitbox.intersects(&o.bounds()))
        .map_or(CollisionResult::None, |o| CollisionResult::Hit(*o))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleKind;
    use proptest::prelude::*;

    fn obstacle_at(x: f32, y: f32) -> Obstacle {
        Obstacle {
            id: 1,
            kind: ObstacleKind::Rock,
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: Vec2::new(40.0, 40.0),
        }
    }

    #[test]
    fn test_overlapping_boxes_hit() {
        let character = Rect::new(100.0, 300.0, 60.0, 60.0);
        let result = check_collisions(character, &[obstacle_at(120.0, 310.0)], 0.0);
        assert!(result.is_hit());

        let result = check_collisions(character, &[obstacle_at(200.0, 310.0)], 0.0);
        assert_eq!(result, CollisionResult::None);
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert!(a.intersects(&Rect::new(9.9, 9.9, 10.0, 10.0)));
    }

    #[test]
    fn test_hitbox_margin_forgives_corner_graze() {
        let character = Rect::new(100.0, 300.0, 60.0, 60.0);
        // Overlaps the sprite box by 5px on the right edge only
        let grazing = obstacle_at(155.0, 310.0);
        assert!(check_collisions(character, &[grazing], 0.0).is_hit());
        assert!(!check_collisions(character, &[grazing], 10.0).is_hit());
    }

    #[test]
    fn test_reports_first_hit_only() {
        let character = Rect::new(100.0, 300.0, 60.0, 60.0);
        let mut first = obstacle_at(110.0, 310.0);
        first.id = 7;
        let mut second = obstacle_at(120.0, 310.0);
        second.id = 8;
        match check_collisions(character, &[first, second], 0.0) {
            CollisionResult::Hit(o) => assert_eq!(o.id, 7),
            CollisionResult::None => panic!("expected a hit"),
        }
    }

    #[test]
    fn test_inset_collapses_without_going_negative() {
        let r = Rect::new(0.0, 0.0, 10.0, 4.0).inset(5.0);
        assert_eq!(r.w, 0.0);
        assert_eq!(r.h, 0.0);
        assert_eq!(r.x, 5.0);
        assert_eq!(r.y, 2.0);
    }

    proptest! {
        // Integer-valued coordinates keep the translated sums exact in f32
        #[test]
        fn prop_verdict_invariant_under_translation(
            cx in -400i32..400, cy in -400i32..400,
            ox in -400i32..400, oy in -400i32..400,
            dx in -1000i32..1000, dy in -1000i32..1000,
            margin in 0u8..20,
        ) {
            let character = Rect::new(cx as f32, cy as f32, 60.0, 60.0);
            let obstacle = obstacle_at(ox as f32, oy as f32);
            let before = check_collisions(character, &[obstacle], margin as f32).is_hit();

            let shift = Vec2::new(dx as f32, dy as f32);
            let mut moved = obstacle;
            moved.pos += shift;
            let after = check_collisions(character.translate(shift), &[moved], margin as f32).is_hit();

            prop_assert_eq!(before, after);
        }
    }
}
