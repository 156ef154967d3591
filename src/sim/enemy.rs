//! Enemy orbs: wandering movement with a weak pull toward the player

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actors::{ActorKind, Bullet, Entity};
use super::body::Body;
use crate::consts::*;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub health: i32,
    /// Units per second, rolled at spawn
    pub speed: f32,
    /// Current wander heading (not normalized)
    pub heading: Vec2,
    /// Sim time at which the heading is re-rolled
    pub retarget_at: f64,
}

impl Enemy {
    pub fn new<R: Rng>(pos: Vec2, clock: f64, rng: &mut R) -> Self {
        Self {
            body: Body::new(pos, Vec2::splat(ENEMY_SIZE)),
            health: 1,
            speed: rng.random_range(ENEMY_MIN_SPEED..ENEMY_MAX_SPEED),
            heading: Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-0.3..0.3)),
            retarget_at: clock + rng.random_range(ENEMY_RETARGET_MIN..ENEMY_RETARGET_MAX),
        }
    }

    /// Blend the wander heading with the direction to `target`
    ///
    /// Returns a unit vector (or zero if the blend cancels out).
    pub fn steer(heading: Vec2, from: Vec2, target: Vec2) -> Vec2 {
        let pull = (target - from).normalize_or_zero();
        (heading * (1.0 - ENEMY_ATTRACTION) + pull * ENEMY_ATTRACTION).normalize_or_zero()
    }

    /// Wander, stay in the upper region, maybe fire one bullet straight down
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        clock: f64,
        target: Vec2,
        tuning: &Tuning,
        rng: &mut R,
        shots: &mut Vec<Bullet>,
    ) {
        if clock > self.retarget_at {
            self.heading = Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-0.6..0.6));
            self.retarget_at = clock + rng.random_range(ENEMY_RETARGET_MIN..ENEMY_RETARGET_MAX);
        }

        let dir = Self::steer(self.heading, self.body.center(), target);
        self.body.vel = dir * self.speed;
        self.body.integrate(dt);

        self.body.pos.x = self.body.pos.x.clamp(0.0, tuning.width - self.body.size.x);
        self.body.pos.y = self
            .body
            .pos
            .y
            .clamp(ENEMY_CEILING, tuning.height - ENEMY_FLOOR_OFFSET);

        if rng.random::<f64>() < tuning.enemy_shoot_chance {
            let muzzle = Vec2::new(self.body.center().x, self.body.bottom());
            shots.push(Bullet::hostile(
                muzzle,
                Vec2::Y,
                ENEMY_BULLET_SPEED,
                ENEMY_BULLET_SIZE,
            ));
        }
    }

    /// Take one point of damage; true if this destroyed the enemy
    pub fn hit(&mut self) -> bool {
        self.health -= 1;
        if self.health <= 0 {
            self.body.kill();
            true
        } else {
            false
        }
    }
}

impl Entity for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn kind(&self) -> ActorKind {
        ActorKind::Enemy
    }
}
