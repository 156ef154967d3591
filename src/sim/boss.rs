//! Boss flagship
//!
//! Two phases, switched once and for all when health falls to half:
//!
//! | Phase | Cadence | Pattern                                            |
//! |-------|---------|----------------------------------------------------|
//! | One   | 1.1 s   | 5-bullet fan about straight down, 12° apart         |
//! | Two   | 0.55 s  | 10-bullet rotating ring plus one shot at the player |
//!
//! The boss patrols horizontally and turns around at the side margins.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actors::{ActorKind, Bullet, Entity};
use super::body::Body;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{direction_or, downward_angle_to_dir};

/// Boss behavior phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    One,
    Two,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub body: Body,
    pub health: i32,
    pub initial_health: i32,
    /// Health at or below which phase two begins
    pub phase_change_health: i32,
    pub phase: BossPhase,
    /// +1 moving right, -1 moving left
    pub direction: f32,
    /// Seconds until the next pattern; fires immediately on spawn
    pub shoot_timer: f32,
    /// Accumulated ring rotation (radians)
    pub ring_rot: f32,
}

impl Boss {
    /// Boss at top center with health scaled to `level`
    pub fn new(level: u32, tuning: &Tuning) -> Self {
        let health = tuning.boss_health(level);
        let pos = Vec2::new(tuning.width / 2.0 - BOSS_WIDTH / 2.0, BOSS_SPAWN_Y);
        Self {
            body: Body::new(pos, Vec2::new(BOSS_WIDTH, BOSS_HEIGHT)),
            health,
            initial_health: health,
            phase_change_health: (health / 2).max(1),
            phase: BossPhase::One,
            direction: 1.0,
            shoot_timer: 0.0,
            ring_rot: 0.0,
        }
    }

    /// Patrol, switch phase if due, fire the current pattern when the timer runs out
    ///
    /// Returns the new phase on the frame the switch happens.
    pub fn update(
        &mut self,
        dt: f32,
        target: Vec2,
        width: f32,
        shots: &mut Vec<Bullet>,
    ) -> Option<BossPhase> {
        self.body.vel = Vec2::new(self.direction * BOSS_PATROL_SPEED, 0.0);
        self.body.integrate(dt);
        if self.body.pos.x <= BOSS_EDGE_MARGIN {
            self.direction = 1.0;
        } else if self.body.right() >= width - BOSS_EDGE_MARGIN {
            self.direction = -1.0;
        }

        let mut changed = None;
        if self.phase == BossPhase::One && self.health <= self.phase_change_health {
            self.phase = BossPhase::Two;
            self.shoot_timer = 0.0;
            changed = Some(BossPhase::Two);
        }

        self.shoot_timer -= dt;
        if self.shoot_timer <= 0.0 {
            match self.phase {
                BossPhase::One => {
                    self.fire_fan(shots);
                    self.shoot_timer = FAN_INTERVAL;
                }
                BossPhase::Two => {
                    self.fire_ring(target, shots);
                    self.shoot_timer = RING_INTERVAL;
                }
            }
        }

        self.ring_rot += dt * BOSS_RING_SPIN;
        changed
    }

    /// Bottom-center muzzle
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.body.center().x, self.body.bottom())
    }

    fn fire_fan(&self, shots: &mut Vec<Bullet>) {
        let muzzle = self.muzzle();
        let half = FAN_BULLETS / 2;
        for i in -half..=half {
            let angle = (i as f32 * FAN_STEP_DEG).to_radians();
            let origin = muzzle + Vec2::X * (i as f32 * FAN_MUZZLE_SPACING);
            shots.push(Bullet::hostile(
                origin,
                downward_angle_to_dir(angle),
                FAN_SPEED,
                ENEMY_BULLET_SIZE,
            ));
        }
    }

    fn fire_ring(&self, target: Vec2, shots: &mut Vec<Bullet>) {
        let muzzle = self.muzzle();
        for i in 0..RING_BULLETS {
            let angle = i as f32 / RING_BULLETS as f32 * std::f32::consts::TAU + self.ring_rot;
            let dir = Vec2::new(angle.cos(), angle.sin());
            shots.push(Bullet::hostile(
                muzzle + dir * RING_MUZZLE_RADIUS,
                dir,
                RING_SPEED,
                ENEMY_BULLET_SIZE,
            ));
        }
        // Straight down if the player sits on the muzzle
        let aim = direction_or(target - muzzle, Vec2::Y);
        shots.push(Bullet::hostile(muzzle, aim, AIMED_SPEED, AIMED_SIZE));
    }

    /// Take one point of damage; true if this defeated the boss
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

impl Entity for Boss {
    fn body(&self) -> &Body {
        &self.body
    }

    fn kind(&self) -> ActorKind {
        ActorKind::Boss { phase: self.phase }
    }
}
