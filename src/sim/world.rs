//! Simulation manager
//!
//! Owns every actor collection and runs the per-frame update in a fixed
//! order: player, friendly bullets, hostile bullets, enemies and boss,
//! pickups, then a single sweep that drops everything marked dead.
//! Collections are walked newest first, so among overlapping targets the
//! most recently spawned one is hit.
//! Nothing is removed from a collection while it is being iterated.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actors::{ActorView, Bullet, Entity, Pickup, PickupKind, Player};
use super::boss::Boss;
use super::enemy::Enemy;
use super::state::GameEvent;
use super::tick::TickInput;
use crate::consts::*;
use crate::tuning::Tuning;

/// Outcome of the drop rolls for one destroyed enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Drops {
    pub power: bool,
    pub health: bool,
}

/// Roll the two independent drop chances for a destroyed enemy
pub fn roll_drops<R: Rng>(rng: &mut R, tuning: &Tuning) -> Drops {
    let power = rng.random::<f64>() < tuning.power_drop_rate;
    let health = rng.random::<f64>() < tuning.health_drop_rate;
    Drops { power, health }
}

/// All live actors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub player: Player,
    /// Friendly bullets
    pub bullets: Vec<Bullet>,
    /// Hostile bullets
    pub enemy_bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<Pickup>,
    pub health_items: Vec<Pickup>,
    pub boss: Option<Boss>,
    /// Events raised during the current frame
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl World {
    /// Fresh player, nothing else
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            player: Player::new(tuning),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            power_ups: Vec::new(),
            health_items: Vec::new(),
            boss: None,
            events: Vec::new(),
        }
    }

    pub fn spawn_enemy<R: Rng>(&mut self, pos: Vec2, clock: f64, rng: &mut R) {
        self.enemies.push(Enemy::new(pos, clock, rng));
    }

    /// Replace the enemy population with a fresh wave in the upper half
    pub fn spawn_wave<R: Rng>(&mut self, count: usize, clock: f64, tuning: &Tuning, rng: &mut R) {
        self.enemies.clear();
        let x_max = tuning.width - ENEMY_SPAWN_MARGIN - ENEMY_SIZE;
        let y_max = tuning.height / 2.0 - ENEMY_SPAWN_MARGIN;
        for _ in 0..count {
            let x = rng.random_range(ENEMY_SPAWN_MARGIN..x_max);
            let y = rng.random_range(ENEMY_SPAWN_MARGIN..y_max);
            self.spawn_enemy(Vec2::new(x, y), clock, rng);
        }
    }

    /// One volley of `power` bullets from the ship's nose
    pub fn spawn_player_volley(&mut self) {
        for origin in self.player.volley_origins() {
            self.bullets.push(Bullet::friendly(origin));
        }
    }

    pub fn spawn_enemy_bullet(&mut self, origin: Vec2, dir: Vec2, speed: f32, size: f32) {
        self.enemy_bullets.push(Bullet::hostile(origin, dir, speed, size));
    }

    pub fn spawn_pickup(&mut self, kind: PickupKind, center: Vec2) {
        let pickup = Pickup::new(kind, center);
        match kind {
            PickupKind::Power => self.power_ups.push(pickup),
            PickupKind::Health => self.health_items.push(pickup),
        }
    }

    pub fn spawn_boss(&mut self, level: u32, tuning: &Tuning) {
        self.boss = Some(Boss::new(level, tuning));
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Advance every actor by `dt`, resolve collisions, sweep the dead
    ///
    /// Returns the score earned this frame.
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        clock: f64,
        input: &TickInput,
        tuning: &Tuning,
        rng: &mut R,
    ) -> u64 {
        let (width, height) = (tuning.width, tuning.height);
        let mut score = 0;

        // --- PLAYER ---
        self.player.move_by(input.direction(), dt, width, height);
        if input.fire && self.player.can_fire() {
            self.spawn_player_volley();
            self.player.fire();
        }
        self.player.update(dt);

        // --- FRIENDLY BULLETS ---
        for bullet in self.bullets.iter_mut().rev() {
            if !bullet.body.alive {
                continue;
            }
            bullet.update(dt, width, height);
            if !bullet.body.alive || !bullet.friendly {
                continue;
            }

            // Newest overlapping live enemy takes the hit and consumes the bullet
            for enemy in self.enemies.iter_mut().rev() {
                if !enemy.body.alive || !bullet.body.intersects(&enemy.body) {
                    continue;
                }
                bullet.body.kill();
                if enemy.hit() {
                    let center = enemy.body.center();
                    score += tuning.enemy_score;
                    self.events.push(GameEvent::EnemyDestroyed { pos: center });

                    let drops = roll_drops(rng, tuning);
                    if drops.power {
                        self.power_ups.push(Pickup::new(PickupKind::Power, center));
                        self.events.push(GameEvent::PickupDropped {
                            kind: PickupKind::Power,
                            pos: center,
                        });
                    }
                    if drops.health {
                        self.health_items.push(Pickup::new(PickupKind::Health, center));
                        self.events.push(GameEvent::PickupDropped {
                            kind: PickupKind::Health,
                            pos: center,
                        });
                    }
                }
                break;
            }

            if !bullet.body.alive {
                continue;
            }
            let boss_defeated = match self.boss.as_mut() {
                Some(boss) if bullet.body.intersects(&boss.body) => {
                    bullet.body.kill();
                    boss.hit()
                }
                _ => false,
            };
            if boss_defeated {
                score += tuning.boss_score;
                self.boss = None;
                self.events.push(GameEvent::BossDefeated);
                log::info!("Boss defeated");
            }
        }

        // --- HOSTILE BULLETS ---
        for bullet in self.enemy_bullets.iter_mut().rev() {
            if !bullet.body.alive {
                continue;
            }
            bullet.update(dt, width, height);
            if !bullet.body.alive || bullet.friendly {
                continue;
            }
            if bullet.body.intersects(&self.player.body) {
                bullet.body.kill();
                self.player.take_hit();
                self.events.push(GameEvent::PlayerHit {
                    health: self.player.health,
                });
            }
        }

        // --- ENEMIES & BOSS ---
        let target = self.player.body.center();
        for enemy in self.enemies.iter_mut().rev() {
            if enemy.body.alive {
                enemy.update(dt, clock, target, tuning, rng, &mut self.enemy_bullets);
            }
        }
        if let Some(boss) = self.boss.as_mut() {
            if let Some(phase) = boss.update(dt, target, width, &mut self.enemy_bullets) {
                log::debug!("Boss entered phase {:?} at {} hp", phase, boss.health);
                self.events.push(GameEvent::BossPhaseChanged { phase });
            }
        }

        // --- PICKUPS ---
        let pickups = self.power_ups.iter_mut().rev();
        for pickup in pickups.chain(self.health_items.iter_mut().rev()) {
            if !pickup.body.alive {
                continue;
            }
            pickup.update(dt, height);
            if pickup.body.alive && pickup.body.intersects(&self.player.body) {
                pickup.apply(&mut self.player, tuning);
                pickup.body.kill();
                log::debug!("Picked up {:?}", pickup.kind);
                self.events.push(GameEvent::PickupCollected { kind: pickup.kind });
            }
        }

        self.sweep();
        score
    }

    /// Drop every actor marked dead
    pub fn sweep(&mut self) {
        self.bullets.retain(|b| b.body.alive);
        self.enemy_bullets.retain(|b| b.body.alive);
        self.enemies.retain(|e| e.body.alive);
        self.power_ups.retain(|p| p.body.alive);
        self.health_items.retain(|p| p.body.alive);
        if self.boss.as_ref().is_some_and(|b| !b.body.alive) {
            self.boss = None;
        }
    }

    /// Views of every live actor, back to front
    pub fn views(&self) -> Vec<ActorView> {
        let mut views = Vec::with_capacity(
            1 + self.bullets.len()
                + self.enemy_bullets.len()
                + self.enemies.len()
                + self.power_ups.len()
                + self.health_items.len()
                + 1,
        );
        views.extend(self.power_ups.iter().filter(|p| p.is_alive()).map(Entity::view));
        views.extend(self.health_items.iter().filter(|p| p.is_alive()).map(Entity::view));
        views.extend(self.enemies.iter().filter(|e| e.is_alive()).map(Entity::view));
        views.extend(self.boss.iter().filter(|b| b.is_alive()).map(Entity::view));
        views.extend(self.bullets.iter().filter(|b| b.is_alive()).map(Entity::view));
        views.extend(self.enemy_bullets.iter().filter(|b| b.is_alive()).map(Entity::view));
        views.push(self.player.view());
        views
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actors::ActorKind;
    use crate::sim::boss::BossPhase;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Tuning with no random enemy fire so tests stay focused
    fn quiet() -> Tuning {
        Tuning {
            enemy_shoot_chance: 0.0,
            ..Tuning::default()
        }
    }

    fn enemy_at(pos: Vec2) -> Enemy {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut e = Enemy::new(pos, 0.0, &mut rng);
        e.speed = 0.0;
        e.retarget_at = f64::MAX;
        e
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_fire_spawns_volley_and_starts_cooldown() {
        let t = quiet();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut w = World::new(&t);
        w.player.power = 3;
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };

        w.update(0.0, 0.0, &fire, &t, &mut rng);
        assert_eq!(w.bullets.len(), 3);
        assert!(!w.player.can_fire());

        // Holding fire does not spawn more until the cooldown expires
        w.update(0.1, 0.1, &fire, &t, &mut rng);
        assert_eq!(w.bullets.len(), 3);
    }

    #[test]
    fn test_bullet_kills_enemy_and_scores() {
        let t = Tuning {
            power_drop_rate: 0.0,
            health_drop_rate: 0.0,
            ..quiet()
        };
        let mut rng = Pcg32::seed_from_u64(2);
        let mut w = World::new(&t);
        w.enemies.push(enemy_at(Vec2::new(100.0, 100.0)));
        w.bullets.push(Bullet::friendly(Vec2::new(120.0, 130.0)));

        let score = w.update(0.0, 0.0, &idle(), &t, &mut rng);
        assert_eq!(score, 10);
        assert!(w.enemies.is_empty());
        assert!(w.bullets.is_empty());
        assert!(w.power_ups.is_empty() && w.health_items.is_empty());
        assert!(w
            .drain_events()
            .any(|e| matches!(e, GameEvent::EnemyDestroyed { .. })));
    }

    #[test]
    fn test_one_bullet_one_enemy_among_overlapping() {
        let t = quiet();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut w = World::new(&t);
        // Two enemies stacked on the same spot
        w.enemies.push(enemy_at(Vec2::new(100.0, 100.0)));
        w.enemies.push(enemy_at(Vec2::new(100.0, 100.0)));
        w.bullets.push(Bullet::friendly(Vec2::new(120.0, 120.0)));

        w.update(0.0, 0.0, &idle(), &t, &mut rng);
        assert_eq!(w.enemies.len(), 1);
        assert!(w.bullets.is_empty());
    }

    #[test]
    fn test_newest_overlapping_enemy_takes_the_hit() {
        let t = quiet();
        let mut rng = Pcg32::seed_from_u64(14);
        let mut w = World::new(&t);
        w.enemies.push(enemy_at(Vec2::new(100.0, 100.0)));
        w.enemies.push(enemy_at(Vec2::new(110.0, 100.0)));
        w.bullets.push(Bullet::friendly(Vec2::new(125.0, 120.0)));

        w.update(0.0, 0.0, &idle(), &t, &mut rng);
        assert_eq!(w.enemies.len(), 1);
        assert_eq!(w.enemies[0].body.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_hostile_bullets_ignore_enemies_and_boss() {
        let t = quiet();
        let mut rng = Pcg32::seed_from_u64(15);
        let mut w = World::new(&t);
        w.spawn_boss(3, &t);
        let boss_center = w.boss.as_ref().unwrap().body.center();
        w.enemies.push(enemy_at(Vec2::new(300.0, 200.0)));
        w.spawn_enemy_bullet(Vec2::new(320.0, 220.0), Vec2::Y, 0.0, 6.0);
        w.spawn_enemy_bullet(boss_center, Vec2::Y, 0.0, 6.0);

        w.update(0.0, 0.0, &idle(), &t, &mut rng);
        assert_eq!(w.enemies.len(), 1);
        assert_eq!(w.enemies[0].health, 1);
        assert_eq!(w.boss.as_ref().unwrap().health, 140);
        // Both still in flight, plus the boss's opening fan
        assert_eq!(w.enemy_bullets.len(), 2 + 5);
    }

    #[test]
    fn test_spent_bullets_skip_later_checks() {
        let t = Tuning {
            power_drop_rate: 0.0,
            health_drop_rate: 0.0,
            ..quiet()
        };
        let mut rng = Pcg32::seed_from_u64(16);
        let mut w = World::new(&t);

        // Already dead from an earlier pass: must not strike anything
        let mut spent = Bullet::friendly(Vec2::new(120.0, 120.0));
        spent.body.kill();
        w.bullets.push(spent);
        w.enemies.push(enemy_at(Vec2::new(100.0, 100.0)));
        assert_eq!(w.update(0.0, 0.0, &idle(), &t, &mut rng), 0);
        assert_eq!(w.enemies.len(), 1);
        assert!(w.bullets.is_empty());

        // Two bullets on one enemy: the enemy dies once, the other bullet flies on
        w.bullets.push(Bullet::friendly(Vec2::new(115.0, 120.0)));
        w.bullets.push(Bullet::friendly(Vec2::new(125.0, 120.0)));
        assert_eq!(w.update(0.0, 0.0, &idle(), &t, &mut rng), 10);
        assert!(w.enemies.is_empty());
        assert_eq!(w.bullets.len(), 1);
        assert_eq!(w.bullets[0].body.center(), Vec2::new(115.0, 120.0));
    }

    #[test]
    fn test_drops_spawn_at_enemy_center() {
        let t = Tuning {
            power_drop_rate: 1.0,
            health_drop_rate: 1.0,
            ..quiet()
        };
        let mut rng = Pcg32::seed_from_u64(4);
        let mut w = World::new(&t);
        w.enemies.push(enemy_at(Vec2::new(200.0, 100.0)));
        w.bullets.push(Bullet::friendly(Vec2::new(220.0, 120.0)));

        w.update(0.0, 0.0, &idle(), &t, &mut rng);
        assert_eq!(w.power_ups.len(), 1);
        assert_eq!(w.health_items.len(), 1);
        assert_eq!(w.power_ups[0].body.center(), Vec2::new(220.0, 120.0));
    }

    #[test]
    fn test_boss_hit_and_defeat() {
        let t = quiet();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut w = World::new(&t);
        w.spawn_boss(3, &t);
        let center = w.boss.as_ref().unwrap().body.center();
        w.boss.as_mut().unwrap().health = 2;

        w.bullets.push(Bullet::friendly(center));
        assert_eq!(w.update(0.0, 0.0, &idle(), &t, &mut rng), 0);
        assert_eq!(w.boss.as_ref().unwrap().health, 1);

        w.bullets.push(Bullet::friendly(center));
        assert_eq!(w.update(0.0, 0.0, &idle(), &t, &mut rng), 200);
        assert!(w.boss.is_none());
        assert!(w.drain_events().any(|e| e == GameEvent::BossDefeated));
    }

    #[test]
    fn test_enemy_shields_boss_from_same_bullet() {
        let t = quiet();
        let mut rng = Pcg32::seed_from_u64(6);
        let mut w = World::new(&t);
        w.spawn_boss(3, &t);
        let boss_center = w.boss.as_ref().unwrap().body.center();
        w.enemies.push(enemy_at(boss_center - Vec2::splat(20.0)));
        w.bullets.push(Bullet::friendly(boss_center));

        w.update(0.0, 0.0, &idle(), &t, &mut rng);
        assert!(w.enemies.is_empty());
        assert_eq!(w.boss.as_ref().unwrap().health, 140);
    }

    #[test]
    fn test_spawn_frame_overlap_hurts_player() {
        let t = quiet();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut w = World::new(&t);
        w.player.body.pos = Vec2::new(100.0, 100.0);
        // 6x6 hostile bullet whose top-left sits on the player's corner, moving away
        let mut bullet = Bullet::hostile(Vec2::ZERO, Vec2::NEG_Y, 230.0, 6.0);
        bullet.body.pos = Vec2::new(100.0, 100.0);
        w.enemy_bullets.push(bullet);

        w.update(1.0 / 60.0, 0.0, &idle(), &t, &mut rng);
        assert_eq!(w.player.health, 9);
        assert!(w.enemy_bullets.is_empty());
    }

    #[test]
    fn test_friendly_bullets_never_hurt_player() {
        let t = quiet();
        let mut rng = Pcg32::seed_from_u64(8);
        let mut w = World::new(&t);
        let center = w.player.body.center();
        w.bullets.push(Bullet::friendly(center));
        w.update(0.0, 0.0, &idle(), &t, &mut rng);
        assert_eq!(w.player.health, 10);
    }

    #[test]
    fn test_pickups_collected_on_contact() {
        let t = quiet();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut w = World::new(&t);
        w.player.health = 5;
        let center = w.player.body.center();
        w.spawn_pickup(PickupKind::Power, center);
        w.spawn_pickup(PickupKind::Health, center);

        w.update(0.0, 0.0, &idle(), &t, &mut rng);
        assert_eq!(w.player.power, 2);
        assert_eq!(w.player.health, 6);
        assert!(w.power_ups.is_empty() && w.health_items.is_empty());
    }

    #[test]
    fn test_boss_phase_event() {
        let t = quiet();
        let mut rng = Pcg32::seed_from_u64(10);
        let mut w = World::new(&t);
        w.spawn_boss(3, &t);
        w.boss.as_mut().unwrap().health = 70;
        w.update(0.01, 0.0, &idle(), &t, &mut rng);
        let events: Vec<_> = w.drain_events().collect();
        assert!(events.contains(&GameEvent::BossPhaseChanged {
            phase: BossPhase::Two
        }));
    }

    #[test]
    fn test_spawn_wave_respects_margins() {
        let t = quiet();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut w = World::new(&t);
        w.spawn_wave(200, 0.0, &t, &mut rng);
        assert_eq!(w.enemies.len(), 200);
        for e in &w.enemies {
            assert!(e.body.pos.x >= 40.0 && e.body.right() <= t.width - 40.0);
            assert!(e.body.pos.y >= 40.0 && e.body.pos.y <= t.height / 2.0 - 40.0);
        }
    }

    #[test]
    fn test_views_include_everything_live() {
        let t = quiet();
        let mut rng = Pcg32::seed_from_u64(12);
        let mut w = World::new(&t);
        w.spawn_wave(3, 0.0, &t, &mut rng);
        w.spawn_boss(3, &t);
        let views = w.views();
        assert_eq!(views.len(), 5);
        assert_eq!(views.last().unwrap().kind, ActorKind::Player);
        assert!(views
            .iter()
            .any(|v| v.kind == ActorKind::Boss { phase: BossPhase::One }));
    }

    #[test]
    fn test_drop_rates_statistical() {
        const N: u32 = 100_000;
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(0xD20D);
        let (mut power, mut health) = (0u32, 0u32);
        for _ in 0..N {
            let d = roll_drops(&mut rng, &t);
            power += d.power as u32;
            health += d.health as u32;
        }

        // Binomial 99.9% interval: N*p +/- 3.29 * sqrt(N*p*(1-p))
        let within = |count: u32, p: f64| {
            let n = N as f64;
            let mean = n * p;
            let tolerance = 3.29 * (n * p * (1.0 - p)).sqrt();
            (count as f64 - mean).abs() <= tolerance
        };
        assert!(within(power, t.power_drop_rate), "power drops: {power}");
        assert!(within(health, t.health_drop_rate), "health drops: {health}");
    }

    proptest! {
        #[test]
        fn prop_bullet_consumes_at_most_one_hit(
            offsets in prop::collection::vec((-30.0f32..30.0, -30.0f32..30.0), 1..6),
        ) {
            let t = Tuning {
                power_drop_rate: 0.0,
                health_drop_rate: 0.0,
                ..quiet()
            };
            let mut rng = Pcg32::seed_from_u64(13);
            let mut w = World::new(&t);
            let spot = Vec2::new(300.0, 200.0);
            for (dx, dy) in &offsets {
                w.enemies.push(enemy_at(spot + Vec2::new(*dx, *dy)));
            }
            let before = w.enemies.len();
            w.bullets.push(Bullet::friendly(spot + Vec2::splat(20.0)));

            w.update(0.0, 0.0, &idle(), &t, &mut rng);
            prop_assert!(before - w.enemies.len() <= 1);
            prop_assert!(w.bullets.is_empty() || before == w.enemies.len());
        }
    }
}
