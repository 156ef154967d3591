//! Per-frame simulation tick
//!
//! Core game loop entry point: session controls, world update, terminal
//! checks, then wave progression.

use glam::Vec2;

use super::state::{GameOverReason, GamePhase, GameState};
use super::wave;

/// Input snapshot for a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire held
    pub fire: bool,
    /// Start from the title screen / restart after game over
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - the autopilot flies the ship
    pub autopilot: bool,
}

impl TickInput {
    /// Direction intent with each axis in [-1, 1] (screen space, +y down)
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i32 - neg as i32) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    // Negative or NaN frame times would run the world backwards
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    match state.phase {
        GamePhase::Title | GamePhase::GameOver => {
            if input.start {
                state.start_session();
            }
            return;
        }
        GamePhase::Paused => {
            if !input.pause {
                return;
            }
            state.phase = GamePhase::Playing;
            log::info!("Resumed");
        }
        GamePhase::Playing => {
            if input.pause {
                state.phase = GamePhase::Paused;
                log::info!("Paused");
                return;
            }
        }
    }

    let input = if input.autopilot {
        autopilot(state, input)
    } else {
        input.clone()
    };

    state.clock += dt as f64;

    let earned = state
        .world
        .update(dt, state.clock, &input, &state.tuning, &mut state.rng);
    state.score += earned;
    state.events.extend(state.world.drain_events());

    if state.world.player.is_dead() {
        state.end_session(GameOverReason::Destroyed);
        return;
    }
    if state.elapsed() >= state.tuning.max_time_secs {
        state.end_session(GameOverReason::TimeUp);
        return;
    }

    wave::update(state);
}

/// Hostile bullets closer than this (vertically, above the ship) are dodged
const DODGE_RANGE: f32 = 140.0;
/// Horizontal slack when lining up under a target
const AIM_SLACK: f32 = 8.0;

/// Synthesize input for demo mode: dodge what is about to hit, otherwise
/// line up under the nearest target and keep firing
fn autopilot(state: &GameState, base: &TickInput) -> TickInput {
    let world = &state.world;
    let ship = &world.player.body;
    let ship_center = ship.center();
    let mut input = TickInput {
        fire: true,
        autopilot: true,
        start: base.start,
        pause: base.pause,
        ..Default::default()
    };

    // Closest incoming hostile bullet in the ship's column
    let threat = world
        .enemy_bullets
        .iter()
        .filter(|b| b.body.alive && b.body.vel.y > 0.0)
        .filter(|b| {
            let c = b.body.center();
            let above = ship.pos.y - c.y;
            (0.0..DODGE_RANGE).contains(&above)
                && (c.x - ship_center.x).abs() < ship.size.x * 0.5 + b.body.size.x + 10.0
        })
        .min_by(|a, b| {
            (ship.pos.y - a.body.center().y).total_cmp(&(ship.pos.y - b.body.center().y))
        });

    if let Some(bullet) = threat {
        let bx = bullet.body.center().x;
        // Step away from the bullet, toward the roomier side near walls
        let go_left = if ship.pos.x < ship.size.x {
            false
        } else if ship.pos.x > state.tuning.width - ship.size.x * 2.0 {
            true
        } else {
            bx >= ship_center.x
        };
        input.left = go_left;
        input.right = !go_left;
        return input;
    }

    // Pickups fall into reach; chase them when close to the ship's row
    let pickup = world
        .power_ups
        .iter()
        .chain(world.health_items.iter())
        .filter(|p| p.body.alive && p.body.pos.y > ship.pos.y - 200.0)
        .map(|p| p.body.center().x)
        .min_by(|a, b| (a - ship_center.x).abs().total_cmp(&(b - ship_center.x).abs()));

    let target_x = pickup.or_else(|| {
        world
            .boss
            .as_ref()
            .map(|b| b.body.center().x)
            .or_else(|| {
                world
                    .enemies
                    .iter()
                    .filter(|e| e.body.alive)
                    .map(|e| e.body.center().x)
                    .min_by(|a, b| {
                        (a - ship_center.x).abs().total_cmp(&(b - ship_center.x).abs())
                    })
            })
    });

    if let Some(x) = target_x {
        let dx = x - ship_center.x;
        if dx.abs() > AIM_SLACK {
            input.left = dx < 0.0;
            input.right = dx > 0.0;
        }
    }
    input
}
