//! Wave/stage controller
//!
//! Watches the population once per frame. When the enemies and the boss are
//! both gone (and the last transition is at least `stage_debounce_secs` old)
//! the level advances: every third level opens a boss windup, the rest get a
//! fresh enemy wave. The windup is a deadline on the session, so a restart
//! that clears it also cancels the boss.

use super::state::{BossWarning, GameEvent, GameState};

/// Every third level is a boss stage
pub fn is_boss_level(level: u32) -> bool {
    level % 3 == 0
}

/// Advance wave progression for this frame
pub fn update(state: &mut GameState) {
    if let Some(warning) = state.boss_warning {
        if state.clock >= warning.spawn_at {
            spawn_boss(state);
        }
        // Nothing else progresses until the boss is out
        return;
    }

    if stage_cleared(state) {
        next_stage(state);
    }
}

/// No enemies, no boss, no windup, and the debounce has elapsed
pub fn stage_cleared(state: &GameState) -> bool {
    state.world.enemies.is_empty()
        && state.world.boss.is_none()
        && state.boss_warning.is_none()
        && state.clock - state.stage_display_at >= state.tuning.stage_debounce_secs
}

/// Move to the next level and stage its population
pub fn next_stage(state: &mut GameState) {
    state.level += 1;
    state.stage_display_at = state.clock;

    if is_boss_level(state.level) {
        state.boss_warning = Some(BossWarning {
            started_at: state.clock,
            spawn_at: state.clock + state.tuning.boss_warning_secs,
        });
        state.events.push(GameEvent::BossIncoming { level: state.level });
        log::info!("Level {}: boss incoming", state.level);
    } else {
        let count = state.tuning.enemy_count(state.level);
        state
            .world
            .spawn_wave(count, state.clock, &state.tuning, &mut state.rng);
        state.events.push(GameEvent::StageAdvanced { level: state.level });
        log::info!("Level {}: {} enemies", state.level, count);
    }
}

/// End the windup and put the boss on the field
fn spawn_boss(state: &mut GameState) {
    state.boss_warning = None;
    state.world.spawn_boss(state.level, &state.tuning);
    let health = state.world.boss.as_ref().map_or(0, |b| b.health);
    state.events.push(GameEvent::BossSpawned { health });
    log::info!("Boss spawned with {} hp", health);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleared_state(level: u32) -> GameState {
        let mut state = GameState::new(42);
        state.start_session();
        state.level = level;
        state.world.enemies.clear();
        state
    }

    #[test]
    fn test_boss_levels() {
        assert!(!is_boss_level(1));
        assert!(!is_boss_level(2));
        assert!(is_boss_level(3));
        assert!(is_boss_level(6));
        assert!(!is_boss_level(7));
    }

    #[test]
    fn test_debounce_holds_advance() {
        let mut state = cleared_state(1);
        state.clock = 0.1;
        update(&mut state);
        assert_eq!(state.level, 1);

        state.clock = 0.2;
        update(&mut state);
        assert_eq!(state.level, 2);
        assert_eq!(state.world.enemies.len(), 12);
    }

    #[test]
    fn test_single_advance_per_idle_period() {
        let mut state = cleared_state(1);
        state.clock = 1.0;
        update(&mut state);
        assert_eq!(state.level, 2);

        // Clear again within the same instant: debounce blocks a second advance
        state.world.enemies.clear();
        update(&mut state);
        update(&mut state);
        assert_eq!(state.level, 2);
    }

    #[test]
    fn test_boss_windup_then_spawn() {
        let mut state = cleared_state(2);
        state.clock = 1.0;
        update(&mut state);
        assert_eq!(state.level, 3);
        assert!(state.boss_warning.is_some());
        assert!(state.world.boss.is_none());
        assert!(state.world.enemies.is_empty());

        // Windup blocks any further advance even though the field is empty
        state.clock = 2.0;
        update(&mut state);
        assert_eq!(state.level, 3);
        assert!(state.world.boss.is_none());

        state.clock = 2.45;
        update(&mut state);
        let boss = state.world.boss.as_ref().expect("boss after windup");
        assert_eq!(boss.health, 140);
        assert!(state.boss_warning.is_none());
        assert!(state
            .events
            .contains(&GameEvent::BossSpawned { health: 140 }));
    }

    #[test]
    fn test_boss_present_blocks_advance() {
        let mut state = cleared_state(3);
        state.world.spawn_boss(3, &state.tuning);
        state.clock = 10.0;
        update(&mut state);
        assert_eq!(state.level, 3);
    }

    #[test]
    fn test_restart_cancels_windup() {
        let mut state = cleared_state(2);
        state.clock = 1.0;
        update(&mut state);
        assert!(state.boss_warning.is_some());

        state.start_session();
        state.clock = 5.0;
        update(&mut state);
        assert!(state.world.boss.is_none());
        assert_eq!(state.level, 1);
    }
}
