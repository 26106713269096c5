//! Collision and bounds checks
//!
//! Everything is an axis-aligned box in the logical 400x600 field: the bird is
//! a square, a pipe pair is a vertical band with a hole in it.

use glam::Vec2;

use super::state::{Bird, Obstacle};
use crate::consts::GROUND_Y;

/// Axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Open-interval overlap on the x axis (touching edges do not overlap)
    #[inline]
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        self.max.x > left && self.min.x < right
    }
}

/// Whether the bird has left the playable band (above the top or into the ground)
pub fn out_of_bounds(bird: &Bird) -> bool {
    let b = bird.bounds();
    b.max.y > GROUND_Y || b.min.y < 0.0
}

/// Whether the bird hits a pipe pair.
///
/// A hit needs horizontal overlap while some part of the bird sits outside the
/// gap. Always false while the bird is invincible.
pub fn hits_obstacle(bird: &Bird, obstacle: &Obstacle) -> bool {
    if bird.invincible {
        return false;
    }
    let b = bird.bounds();
    if !b.overlaps_x(obstacle.x, obstacle.right()) {
        return false;
    }
    b.min.y < obstacle.gap_top || b.max.y > obstacle.gap_bottom
}

/// Whether the bird's left edge is past the pipe's right edge
#[inline]
pub fn has_cleared(bird: &Bird, obstacle: &Obstacle) -> bool {
    bird.pos.x > obstacle.right()
}
