//! Player, bullets and pickups
//!
//! Every actor wraps a [`Body`] and adds its own update rule. Rendering code
//! never touches actors directly; it polls [`ActorView`]s instead.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::boss::BossPhase;
use super::collision::{below_playfield, clamp_into, outside_playfield};
use crate::consts::*;
use crate::tuning::Tuning;

/// What kind of actor a view describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    PlayerBullet,
    EnemyBullet,
    Enemy,
    Boss { phase: BossPhase },
    PowerUp,
    HealthItem,
}

/// Read-only snapshot of one actor for the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorView {
    pub kind: ActorKind,
    pub pos: Vec2,
    pub size: Vec2,
}

impl ActorView {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Common capability of everything that lives in the playfield
pub trait Entity {
    fn body(&self) -> &Body;
    fn kind(&self) -> ActorKind;

    fn is_alive(&self) -> bool {
        self.body().alive
    }

    fn view(&self) -> ActorView {
        let body = self.body();
        ActorView {
            kind: self.kind(),
            pos: body.pos,
            size: body.size,
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Units per second at full stick
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    /// Bullets per volley (1..=max_power)
    pub power: u32,
    pub max_power: u32,
    /// Seconds until the next volley is allowed (may dip slightly below zero)
    pub fire_cooldown: f32,
    pub fire_rate: f32,
}

impl Player {
    /// Fresh ship at the bottom center of the playfield
    pub fn new(tuning: &Tuning) -> Self {
        let pos = Vec2::new(
            tuning.width / 2.0 - PLAYER_SIZE / 2.0,
            tuning.height - PLAYER_SPAWN_OFFSET,
        );
        Self {
            body: Body::new(pos, Vec2::splat(PLAYER_SIZE)),
            speed: PLAYER_SPEED,
            health: tuning.max_health,
            max_health: tuning.max_health,
            power: 1,
            max_power: tuning.max_power,
            fire_cooldown: 0.0,
            fire_rate: PLAYER_FIRE_RATE,
        }
    }

    /// Move by a direction intent, clamped to the playfield on each axis
    ///
    /// `dir` components are expected in [-1, 1]; diagonals are scaled back to
    /// unit length so the ship is not faster on the diagonal.
    pub fn move_by(&mut self, dir: Vec2, dt: f32, width: f32, height: f32) {
        let dir = if dir.length_squared() > 1.0 {
            dir.normalize_or_zero()
        } else {
            dir
        };
        let dt = dt.max(0.0);
        self.body.vel = dir * self.speed;
        let next = self.body.pos + self.body.vel * dt;
        self.body.pos = clamp_into(next, self.body.size, Vec2::ZERO, Vec2::new(width, height));
    }

    pub fn can_fire(&self) -> bool {
        self.fire_cooldown <= 0.0
    }

    /// Start the cooldown; bullets are spawned by the world
    pub fn fire(&mut self) {
        self.fire_cooldown = self.fire_rate;
    }

    pub fn update(&mut self, dt: f32) {
        if self.fire_cooldown > 0.0 {
            self.fire_cooldown -= dt;
        }
    }

    pub fn take_hit(&mut self) {
        self.health -= 1;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    pub fn power_up(&mut self) {
        self.power = (self.power + 1).min(self.max_power);
    }

    /// Muzzle positions for one volley, spread evenly around the ship's nose
    pub fn volley_origins(&self) -> Vec<Vec2> {
        let count = self.power.max(1);
        let nose = Vec2::new(self.body.center().x, self.body.pos.y);
        let mid = (count - 1) as f32 / 2.0;
        (0..count)
            .map(|i| nose + Vec2::X * (i as f32 - mid) * VOLLEY_SPACING)
            .collect()
    }
}

impl Entity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn kind(&self) -> ActorKind {
        ActorKind::Player
    }
}

/// A projectile travelling at constant velocity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub body: Body,
    /// Friendly bullets hit enemies and the boss; hostile ones hit the player
    pub friendly: bool,
}

impl Bullet {
    /// Bullet centered on `origin` heading along `dir` (normalized here)
    pub fn new(origin: Vec2, dir: Vec2, speed: f32, size: f32, friendly: bool) -> Self {
        let mut body = Body::centered(origin, Vec2::splat(size));
        body.vel = dir.normalize_or_zero() * speed;
        Self { body, friendly }
    }

    pub fn friendly(origin: Vec2) -> Self {
        Self::new(origin, Vec2::NEG_Y, PLAYER_BULLET_SPEED, PLAYER_BULLET_SIZE, true)
    }

    pub fn hostile(origin: Vec2, dir: Vec2, speed: f32, size: f32) -> Self {
        Self::new(origin, dir, speed, size, false)
    }

    /// Move and retire once well outside the playfield
    pub fn update(&mut self, dt: f32, width: f32, height: f32) {
        self.body.integrate(dt);
        if outside_playfield(&self.body, width, height, BULLET_MARGIN) {
            self.body.kill();
        }
    }
}

impl Entity for Bullet {
    fn body(&self) -> &Body {
        &self.body
    }

    fn kind(&self) -> ActorKind {
        if self.friendly {
            ActorKind::PlayerBullet
        } else {
            ActorKind::EnemyBullet
        }
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// One more bullet per volley
    Power,
    /// Restores health
    Health,
}

impl PickupKind {
    pub fn fall_speed(&self) -> f32 {
        match self {
            PickupKind::Power => POWER_FALL_SPEED,
            PickupKind::Health => HEALTH_FALL_SPEED,
        }
    }
}

/// A falling pickup dropped by a destroyed enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub body: Body,
    pub kind: PickupKind,
}

impl Pickup {
    pub fn new(kind: PickupKind, center: Vec2) -> Self {
        let mut body = Body::centered(center, Vec2::splat(PICKUP_SIZE));
        body.vel = Vec2::new(0.0, kind.fall_speed());
        Self { body, kind }
    }

    pub fn update(&mut self, dt: f32, height: f32) {
        self.body.integrate(dt);
        if below_playfield(&self.body, height, PICKUP_EXIT_MARGIN) {
            self.body.kill();
        }
    }

    /// Apply this pickup's effect to the player
    pub fn apply(&self, player: &mut Player, tuning: &Tuning) {
        match self.kind {
            PickupKind::Power => player.power_up(),
            PickupKind::Health => player.heal(tuning.health_recover_amount),
        }
    }
}

impl Entity for Pickup {
    fn body(&self) -> &Body {
        &self.body
    }

    fn kind(&self) -> ActorKind {
        match self.kind {
            PickupKind::Power => ActorKind::PowerUp,
            PickupKind::Health => ActorKind::HealthItem,
        }
    }
}
