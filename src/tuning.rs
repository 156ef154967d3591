//! Data-driven game balance
//!
//! Every knob a designer might want to tweak without touching simulation
//! code. Loaded from JSON; missing fields fall back to the shipped defaults.

use serde::{Deserialize, Serialize};

/// Upper bounds for counts a run has to allocate or add up
const MAX_HEALTH_CAP: i32 = 1000;
const MAX_POWER_CAP: u32 = 20;
const ENEMY_COUNT_CAP: u32 = 500;

/// Balance parameters for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Playfield width in world units
    pub width: f32,
    /// Playfield height in world units
    pub height: f32,

    // === Player ===
    pub max_health: i32,
    pub max_power: u32,

    // === Drop economy ===
    /// Chance a destroyed enemy drops a power-up
    pub power_drop_rate: f64,
    /// Chance a destroyed enemy drops a health item (independent of power)
    pub health_drop_rate: f64,
    /// Health restored per health item
    pub health_recover_amount: i32,

    // === Enemies ===
    /// Per-frame chance that an enemy fires
    pub enemy_shoot_chance: f64,
    /// Enemies in the first wave; each later wave adds two
    pub base_enemy_count: u32,
    pub enemy_score: u64,

    // === Boss ===
    pub boss_base_health: i32,
    pub boss_health_per_level: i32,
    pub boss_score: u64,
    /// Windup between the warning and the boss appearing
    pub boss_warning_secs: f64,

    // === Session ===
    /// Total time budget for a run
    pub max_time_secs: f64,
    /// How long the "LEVEL n" banner stays up
    pub stage_display_secs: f64,
    /// Minimum gap between stage transitions
    pub stage_debounce_secs: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 600.0,

            max_health: 10,
            max_power: 5,

            power_drop_rate: 0.08,
            health_drop_rate: 0.10,
            health_recover_amount: 1,

            enemy_shoot_chance: 0.015,
            base_enemy_count: 10,
            enemy_score: 10,

            boss_base_health: 80,
            boss_health_per_level: 20,
            boss_score: 200,
            boss_warning_secs: 1.4,

            max_time_secs: 120.0,
            stage_display_secs: 1.5,
            stage_debounce_secs: 0.2,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON and sanitize it
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.validated())
    }

    /// Serialize tuning to pretty JSON (for editing)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp values into ranges the simulation can work with
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        // Enemies need room to spawn: 40 units of margin plus their own size on each axis
        if self.width.is_nan() || self.width < 200.0 {
            log::warn!("Tuning width {} too small, using {}", self.width, defaults.width);
            self.width = defaults.width;
        }
        if self.height.is_nan() || self.height < 300.0 {
            log::warn!("Tuning height {} too small, using {}", self.height, defaults.height);
            self.height = defaults.height;
        }

        self.max_health = self.max_health.clamp(1, MAX_HEALTH_CAP);
        self.max_power = self.max_power.clamp(1, MAX_POWER_CAP);
        self.health_recover_amount = self.health_recover_amount.clamp(0, self.max_health);

        self.power_drop_rate = clamp_probability(self.power_drop_rate);
        self.health_drop_rate = clamp_probability(self.health_drop_rate);
        self.enemy_shoot_chance = clamp_probability(self.enemy_shoot_chance);

        self.base_enemy_count = self.base_enemy_count.clamp(1, ENEMY_COUNT_CAP);
        self.boss_warning_secs = self.boss_warning_secs.max(0.0);
        self.max_time_secs = self.max_time_secs.max(1.0);
        self.stage_display_secs = self.stage_display_secs.max(0.0);
        self.stage_debounce_secs = self.stage_debounce_secs.max(0.0);

        self
    }

    /// Boss health for a level, never below 1
    pub fn boss_health(&self, level: u32) -> i32 {
        let scaled = self
            .boss_base_health
            .saturating_add((level as i32).saturating_mul(self.boss_health_per_level));
        scaled.max(1)
    }

    /// Number of enemies in a regular wave
    pub fn enemy_count(&self, level: u32) -> usize {
        let extra = level.saturating_sub(1).saturating_mul(2);
        self.base_enemy_count.saturating_add(extra) as usize
    }
}

fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}
