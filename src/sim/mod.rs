//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time comes from the session clock, never the wall clock
//! - Dead actors are swept at frame end, never mid-iteration
//! - No rendering or platform dependencies

pub mod actors;
pub mod body;
pub mod boss;
pub mod collision;
pub mod enemy;
pub mod state;
pub mod tick;
pub mod wave;
pub mod world;

pub use actors::{ActorKind, ActorView, Bullet, Entity, Pickup, PickupKind, Player};
pub use body::Body;
pub use boss::{Boss, BossPhase};
pub use collision::rects_overlap;
pub use enemy::Enemy;
pub use state::{BossWarning, GameEvent, GameOverReason, GamePhase, GameState, Hud};
pub use tick::{TickInput, tick};
pub use world::{Drops, World, roll_drops};
