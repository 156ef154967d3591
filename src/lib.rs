//! Neon Barrage - a vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actors, collisions, waves, session)
//! - `renderer`: Minimal drawing capability polled by the host
//! - `tuning`: Data-driven game balance

pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed host timestep (60 Hz, one display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Player ship
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 350.0;
    /// Distance of the spawn row above the bottom edge
    pub const PLAYER_SPAWN_OFFSET: f32 = 80.0;
    /// Seconds between volleys
    pub const PLAYER_FIRE_RATE: f32 = 0.35;

    /// Friendly bullets
    pub const PLAYER_BULLET_SPEED: f32 = 920.0;
    pub const PLAYER_BULLET_SIZE: f32 = 8.0;
    /// Horizontal spacing between bullets of one volley
    pub const VOLLEY_SPACING: f32 = 10.0;

    /// Hostile bullets
    pub const ENEMY_BULLET_SPEED: f32 = 230.0;
    pub const ENEMY_BULLET_SIZE: f32 = 6.0;
    /// Bullets are retired this far outside the playfield
    pub const BULLET_MARGIN: f32 = 50.0;

    /// Enemy orbs
    pub const ENEMY_SIZE: f32 = 40.0;
    pub const ENEMY_MIN_SPEED: f32 = 30.0;
    pub const ENEMY_MAX_SPEED: f32 = 70.0;
    /// Re-target interval bounds (seconds)
    pub const ENEMY_RETARGET_MIN: f64 = 0.4;
    pub const ENEMY_RETARGET_MAX: f64 = 1.4;
    /// Weight of the pull toward the player in the steering blend
    pub const ENEMY_ATTRACTION: f32 = 0.06;
    /// Enemies never descend closer than this to the bottom edge
    pub const ENEMY_FLOOR_OFFSET: f32 = 120.0;
    pub const ENEMY_CEILING: f32 = 20.0;
    /// Spawn margin from every playfield edge
    pub const ENEMY_SPAWN_MARGIN: f32 = 40.0;

    /// Boss flagship
    pub const BOSS_WIDTH: f32 = 160.0;
    pub const BOSS_HEIGHT: f32 = 100.0;
    pub const BOSS_SPAWN_Y: f32 = 60.0;
    pub const BOSS_PATROL_SPEED: f32 = 80.0;
    pub const BOSS_EDGE_MARGIN: f32 = 20.0;
    /// Ring rotation speed (radians/sec)
    pub const BOSS_RING_SPIN: f32 = 1.2;

    /// Phase 1: five-bullet fan
    pub const FAN_INTERVAL: f32 = 1.1;
    pub const FAN_BULLETS: i32 = 5;
    pub const FAN_STEP_DEG: f32 = 12.0;
    pub const FAN_SPEED: f32 = 240.0;
    /// Horizontal offset between fan muzzles
    pub const FAN_MUZZLE_SPACING: f32 = 6.0;

    /// Phase 2: rotating ring plus an aimed shot
    pub const RING_INTERVAL: f32 = 0.55;
    pub const RING_BULLETS: u32 = 10;
    pub const RING_SPEED: f32 = 180.0;
    pub const RING_MUZZLE_RADIUS: f32 = 10.0;
    pub const AIMED_SPEED: f32 = 300.0;
    pub const AIMED_SIZE: f32 = 8.0;

    /// Falling pickups
    pub const PICKUP_SIZE: f32 = 20.0;
    /// Pickups are retired this far below the bottom edge
    pub const PICKUP_EXIT_MARGIN: f32 = 50.0;
    pub const POWER_FALL_SPEED: f32 = 70.0;
    pub const HEALTH_FALL_SPEED: f32 = 55.0;

    /// Boss warning overlay blink period (seconds)
    pub const WARNING_BLINK: f64 = 0.2;
}

/// Unit vector for `v`, or `fallback` when `v` has no length.
#[inline]
pub fn direction_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let len = v.length();
    if len > f32::EPSILON { v / len } else { fallback }
}

/// Direction for an angle measured from straight down (+y in screen space).
///
/// Angle 0 points down the screen; positive angles lean right.
#[inline]
pub fn downward_angle_to_dir(angle: f32) -> Vec2 {
    Vec2::new(angle.sin(), angle.cos())
}
