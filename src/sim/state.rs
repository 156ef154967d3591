//! Session state and core simulation types
//!
//! Everything needed to resume a run lives in [`GameState`], including the
//! RNG, so a restored snapshot replays identically under identical input.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actors::PickupKind;
use super::boss::BossPhase;
use super::world::World;
use crate::consts::WARNING_BLINK;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start input
    Title,
    /// Active gameplay
    Playing,
    /// Simulation frozen by the host
    Paused,
    /// Run ended; waiting for restart
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    Destroyed,
    TimeUp,
}

/// Gameplay events raised during a tick (for sound, logging, effects)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    EnemyDestroyed { pos: Vec2 },
    PickupDropped { kind: PickupKind, pos: Vec2 },
    PickupCollected { kind: PickupKind },
    PlayerHit { health: i32 },
    BossPhaseChanged { phase: BossPhase },
    BossDefeated,
    StageAdvanced { level: u32 },
    BossIncoming { level: u32 },
    BossSpawned { health: i32 },
    GameOver { reason: GameOverReason },
}

/// Pending boss windup: the boss appears once the clock reaches `spawn_at`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossWarning {
    pub started_at: f64,
    pub spawn_at: f64,
}

/// Read-only session snapshot for the HUD
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub phase: GamePhase,
    pub score: u64,
    pub level: u32,
    pub health: i32,
    pub max_health: i32,
    pub power: u32,
    pub max_power: u32,
    /// Whole seconds left in the run
    pub time_remaining: u32,
    pub game_over: bool,
    /// Some while the boss windup runs; `true` on the bright half of the blink
    pub boss_warning: Option<bool>,
    /// Opacity of the "LEVEL n" banner, if it is still showing
    pub banner_alpha: Option<f32>,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Current stage (starts at 1)
    pub level: u32,
    pub score: u64,
    /// Simulation clock in seconds; only advances while playing
    pub clock: f64,
    /// Clock value when the current run started
    pub session_start: f64,
    /// Clock value of the last stage transition (drives the banner and debounce)
    pub stage_display_at: f64,
    pub boss_warning: Option<BossWarning>,
    pub world: World,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new session on the title screen with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new session on the title screen
    ///
    /// The first wave is already populated so the title screen has something
    /// drifting behind it.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.validated();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut world = World::new(&tuning);
        world.spawn_wave(tuning.enemy_count(1), 0.0, &tuning, &mut rng);

        Self {
            seed,
            world,
            tuning,
            phase: GamePhase::Title,
            level: 1,
            score: 0,
            clock: 0.0,
            session_start: 0.0,
            stage_display_at: 0.0,
            boss_warning: None,
            events: Vec::new(),
            rng,
        }
    }

    /// Begin (or restart) a run: fresh player, empty collections, level 1
    ///
    /// Any pending boss windup from the previous run is discarded.
    pub fn start_session(&mut self) {
        self.level = 1;
        self.score = 0;
        self.session_start = self.clock;
        self.stage_display_at = self.clock;
        self.boss_warning = None;
        self.world = World::new(&self.tuning);
        let count = self.tuning.enemy_count(self.level);
        self.world
            .spawn_wave(count, self.clock, &self.tuning, &mut self.rng);
        self.phase = GamePhase::Playing;
        log::info!("Run started (seed {}, {} enemies)", self.seed, count);
    }

    /// End the run
    pub fn end_session(&mut self, reason: GameOverReason) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.boss_warning = None;
        self.events.push(GameEvent::GameOver { reason });
        log::info!(
            "Game over ({:?}): score {} at level {}",
            reason,
            self.score,
            self.level
        );
    }

    /// Session started and not over (paused counts as running)
    pub fn is_running(&self) -> bool {
        matches!(self.phase, GamePhase::Playing | GamePhase::Paused)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Seconds since the run started
    pub fn elapsed(&self) -> f64 {
        self.clock - self.session_start
    }

    /// Whole seconds left in the time budget
    pub fn time_remaining(&self) -> u32 {
        (self.tuning.max_time_secs - self.elapsed().floor()).max(0.0) as u32
    }

    /// Opacity of the stage banner, fading out over `stage_display_secs`
    pub fn banner_alpha(&self) -> Option<f32> {
        let since = self.clock - self.stage_display_at;
        let span = self.tuning.stage_display_secs;
        if self.is_running() && span > 0.0 && since < span {
            Some((1.0 - since / span) as f32)
        } else {
            None
        }
    }

    /// Blink state of the boss warning overlay, if a windup is pending
    pub fn boss_warning_blink(&self) -> Option<bool> {
        self.boss_warning.map(|w| {
            let flips = ((self.clock - w.started_at) / WARNING_BLINK).floor() as i64;
            flips % 2 == 0
        })
    }

    pub fn hud(&self) -> Hud {
        let player = &self.world.player;
        Hud {
            phase: self.phase,
            score: self.score,
            level: self.level,
            health: player.health.max(0),
            max_health: player.max_health,
            power: player.power,
            max_power: player.max_power,
            time_remaining: self.time_remaining(),
            game_over: self.is_game_over(),
            boss_warning: self.boss_warning_blink(),
            banner_alpha: self.banner_alpha(),
        }
    }

    /// Serialize the full session (including RNG) to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore a session serialized with [`GameState::to_json`]
    ///
    /// The embedded tuning is sanitized the same way a loaded config is.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut state: Self = serde_json::from_str(json)?;
        state.tuning = std::mem::take(&mut state.tuning).validated();
        Ok(state)
    }
}
