//! Collision and bounds tests for axis-aligned boxes
//!
//! The overlap predicate is the only collision test the simulation uses.
//! Intervals are open: boxes that merely touch along an edge do not collide.

use glam::Vec2;

use super::body::Body;

/// Check whether two boxes overlap (touching edges do not count)
#[inline]
pub fn rects_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && a_pos.x + a_size.x > b_pos.x
        && a_pos.y < b_pos.y + b_size.y
        && a_pos.y + a_size.y > b_pos.y
}

/// True once a body's top-left corner leaves the playfield by more than `margin`
#[inline]
pub fn outside_playfield(body: &Body, width: f32, height: f32, margin: f32) -> bool {
    body.pos.x < -margin
        || body.pos.x > width + margin
        || body.pos.y < -margin
        || body.pos.y > height + margin
}

/// True once a falling body has dropped past the bottom edge plus `margin`
#[inline]
pub fn below_playfield(body: &Body, height: f32, margin: f32) -> bool {
    body.pos.y > height + margin
}

/// Clamp a box so it stays fully inside `[min, max - size]` on each axis
#[inline]
pub fn clamp_into(pos: Vec2, size: Vec2, min: Vec2, max: Vec2) -> Vec2 {
    let hi = (max - size).max(min);
    pos.clamp(min, hi)
}
