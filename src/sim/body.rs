//! Shared geometry record for every actor
//!
//! A body is an axis-aligned box: top-left position, size, velocity and a
//! liveness flag. Dead bodies stay in their collection until the end-of-frame
//! sweep so iteration order is never disturbed mid-update.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box with velocity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
    /// Units per second
    pub vel: Vec2,
    /// Cleared on collision or bounds exit; swept at frame end
    pub alive: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            alive: true,
        }
    }

    /// Body of `size` centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size / 2.0, size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    /// Advance by velocity
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Open-interval overlap with another body
    #[inline]
    pub fn intersects(&self, other: &Body) -> bool {
        super::collision::rects_overlap(self.pos, self.size, other.pos, other.size)
    }

    /// Mark for removal at the next sweep
    #[inline]
    pub fn kill(&mut self) {
        self.alive = false;
    }
}
