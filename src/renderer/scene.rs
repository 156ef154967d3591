//! Frame composition: actors, HUD, banners and screens

use glam::Vec2;

use super::palette::*;
use super::{Canvas, TextAlign};
use crate::consts::RING_BULLETS;
use crate::sim::{ActorKind, ActorView, Boss, BossPhase, GamePhase, GameState, Hud};

const HUD_FONT: f32 = 18.0;
const HUD_LEFT: f32 = 12.0;
const HUD_LINE: f32 = 22.0;
const BANNER_FONT: f32 = 56.0;
const WARNING_FONT: f32 = 64.0;
const TITLE_FONT: f32 = 48.0;
const PROMPT_FONT: f32 = 20.0;

/// Draw one complete frame of `state`
pub fn draw_frame(state: &GameState, canvas: &mut impl Canvas) {
    let hud = state.hud();
    let center = Vec2::new(state.tuning.width, state.tuning.height) / 2.0;

    canvas.set_alpha(1.0);
    canvas.clear(BACKGROUND);

    for view in state.world.views() {
        draw_actor(&view, canvas);
    }
    if let Some(boss) = state.world.boss.as_ref().filter(|b| b.body.alive) {
        draw_boss_details(boss, canvas);
    }

    match hud.phase {
        GamePhase::Title => {
            canvas.text("NEON BARRAGE", center - Vec2::Y * 40.0, TITLE_FONT, TextAlign::Center, TEXT);
            canvas.text(
                "Press ENTER to Start",
                center + Vec2::Y * 10.0,
                PROMPT_FONT,
                TextAlign::Center,
                TEXT,
            );
        }
        GamePhase::Playing | GamePhase::Paused => {
            draw_hud(&hud, canvas);
            if let Some(bright) = hud.boss_warning {
                draw_boss_warning(bright, state, canvas);
            } else if let Some(alpha) = hud.banner_alpha {
                canvas.set_alpha(alpha);
                canvas.text(
                    &format!("LEVEL {}", hud.level),
                    center,
                    BANNER_FONT,
                    TextAlign::Center,
                    TEXT,
                );
                canvas.set_alpha(1.0);
            }
            if hud.phase == GamePhase::Paused {
                canvas.fill_rect(Vec2::ZERO, center * 2.0, OVERLAY);
                canvas.text("PAUSED", center, TITLE_FONT, TextAlign::Center, TEXT);
            }
        }
        GamePhase::GameOver => {
            canvas.text("GAME OVER", center - Vec2::Y * 20.0, TITLE_FONT, TextAlign::Center, TEXT);
            canvas.text(
                &format!("Score: {}", hud.score),
                center + Vec2::Y * 20.0,
                PROMPT_FONT,
                TextAlign::Center,
                TEXT,
            );
            canvas.text(
                "Press ENTER to Restart",
                center + Vec2::Y * 60.0,
                PROMPT_FONT,
                TextAlign::Center,
                TEXT,
            );
        }
    }
}

fn draw_actor(view: &ActorView, canvas: &mut impl Canvas) {
    let c = view.center();
    match view.kind {
        ActorKind::Player => {
            // Nose up
            let points = [
                Vec2::new(c.x, view.pos.y),
                Vec2::new(view.pos.x + view.size.x, view.pos.y + view.size.y),
                Vec2::new(c.x, view.pos.y + view.size.y * 0.75),
                Vec2::new(view.pos.x, view.pos.y + view.size.y),
            ];
            canvas.fill_polygon(&points, PLAYER);
        }
        ActorKind::PlayerBullet => canvas.fill_rect(view.pos, view.size, PLAYER_BULLET),
        ActorKind::EnemyBullet => canvas.fill_circle(c, view.size.x / 2.0, ENEMY_BULLET),
        ActorKind::Enemy => {
            let r = view.size.x / 2.0;
            canvas.fill_circle(c, r, ENEMY);
            canvas.fill_circle(c, r * 0.3, ENEMY_CORE);
        }
        ActorKind::Boss { phase } => {
            let color = match phase {
                BossPhase::One => BOSS_ONE,
                BossPhase::Two => BOSS_TWO,
            };
            canvas.fill_rect(view.pos, view.size, color);
        }
        ActorKind::PowerUp => canvas.fill_circle(c, view.size.x / 2.0, POWER_UP),
        ActorKind::HealthItem => {
            let arm = view.size.x / 3.0;
            canvas.fill_rect(
                Vec2::new(view.pos.x, c.y - arm / 2.0),
                Vec2::new(view.size.x, arm),
                HEALTH_ITEM,
            );
            canvas.fill_rect(
                Vec2::new(c.x - arm / 2.0, view.pos.y),
                Vec2::new(arm, view.size.y),
                HEALTH_ITEM,
            );
        }
    }
}

/// Rotating core ring and the health bar above the hull
fn draw_boss_details(boss: &Boss, canvas: &mut impl Canvas) {
    let c = boss.body.center();
    let radius = boss.body.size.y * 0.3;
    for i in 0..RING_BULLETS {
        let angle = i as f32 / RING_BULLETS as f32 * std::f32::consts::TAU + boss.ring_rot;
        canvas.fill_circle(c + Vec2::from_angle(angle) * radius, 3.0, BOSS_CORE);
    }

    let frac = (boss.health.max(0) as f32 / boss.initial_health.max(1) as f32).min(1.0);
    canvas.fill_rect(
        boss.body.pos - Vec2::Y * 12.0,
        Vec2::new(boss.body.size.x * frac, 6.0),
        BOSS_BAR,
    );
}

fn draw_hud(hud: &Hud, canvas: &mut impl Canvas) {
    let lines = [
        format!("Score: {}", hud.score),
        format!("HP: {}", hud.health),
        format!("Time: {}", hud.time_remaining),
        format!("Level: {}", hud.level),
        format!("Power: {}/{}", hud.power, hud.max_power),
    ];
    for (i, line) in lines.iter().enumerate() {
        let pos = Vec2::new(HUD_LEFT, HUD_LINE * (i + 1) as f32);
        canvas.text(line, pos, HUD_FONT, TextAlign::Left, TEXT);
    }
}

fn draw_boss_warning(bright: bool, state: &GameState, canvas: &mut impl Canvas) {
    let size = Vec2::new(state.tuning.width, state.tuning.height);
    canvas.fill_rect(Vec2::ZERO, size, OVERLAY);
    let color = if bright { WARNING_BRIGHT } else { WARNING_DIM };
    canvas.text(
        "BOSS INCOMING",
        size / 2.0 - Vec2::Y * 20.0,
        WARNING_FONT,
        TextAlign::Center,
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BossWarning, GameOverReason};

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Clear,
        Rect(String),
        Circle(String),
        Polygon(usize),
        Text(String, String),
        Alpha(f32),
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl Recorder {
        fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text(t, _) => Some(t.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn count_circles(&self, color: &str) -> usize {
            self.ops
                .iter()
                .filter(|op| matches!(op, Op::Circle(c) if c == color))
                .count()
        }
    }

    impl Canvas for Recorder {
        fn clear(&mut self, _color: &str) {
            self.ops.push(Op::Clear);
        }
        fn fill_rect(&mut self, _pos: Vec2, _size: Vec2, color: &str) {
            self.ops.push(Op::Rect(color.to_string()));
        }
        fn fill_circle(&mut self, _center: Vec2, _radius: f32, color: &str) {
            self.ops.push(Op::Circle(color.to_string()));
        }
        fn fill_polygon(&mut self, points: &[Vec2], _color: &str) {
            self.ops.push(Op::Polygon(points.len()));
        }
        fn text(&mut self, text: &str, _pos: Vec2, _size_px: f32, _align: TextAlign, color: &str) {
            self.ops.push(Op::Text(text.to_string(), color.to_string()));
        }
        fn set_alpha(&mut self, alpha: f32) {
            self.ops.push(Op::Alpha(alpha));
        }
    }

    #[test]
    fn test_title_screen() {
        let state = GameState::new(1);
        let mut rec = Recorder::default();
        draw_frame(&state, &mut rec);
        assert_eq!(rec.ops[1], Op::Clear);
        let texts = rec.texts();
        assert!(texts.contains(&"NEON BARRAGE"));
        assert!(!texts.iter().any(|t| t.starts_with("Score")));
    }

    #[test]
    fn test_playing_draws_actors_and_hud() {
        let mut state = GameState::new(2);
        state.start_session();
        let mut rec = Recorder::default();
        draw_frame(&state, &mut rec);

        assert_eq!(rec.count_circles(ENEMY), state.world.enemies.len());
        assert!(rec.ops.contains(&Op::Polygon(4)));
        let texts = rec.texts();
        assert!(texts.contains(&"Score: 0"));
        assert!(texts.contains(&"HP: 10"));
        assert!(texts.contains(&"Time: 120"));
        assert!(texts.contains(&"Level: 1"));
        assert!(texts.contains(&"Power: 1/5"));
        // Banner is fully visible right after start
        assert!(texts.contains(&"LEVEL 1"));
    }

    #[test]
    fn test_boss_warning_replaces_banner() {
        let mut state = GameState::new(3);
        state.start_session();
        state.boss_warning = Some(BossWarning {
            started_at: 0.0,
            spawn_at: 1.4,
        });
        state.clock = 0.3;
        let mut rec = Recorder::default();
        draw_frame(&state, &mut rec);
        assert!(rec.ops.contains(&Op::Text(
            "BOSS INCOMING".to_string(),
            WARNING_DIM.to_string()
        )));
        assert!(!rec.texts().iter().any(|t| t.starts_with("LEVEL ")));
    }

    #[test]
    fn test_boss_ring_and_bar() {
        let mut state = GameState::new(4);
        state.start_session();
        state.world.spawn_boss(3, &state.tuning);
        let mut rec = Recorder::default();
        draw_frame(&state, &mut rec);
        assert!(rec.ops.contains(&Op::Rect(BOSS_ONE.to_string())));
        assert!(rec.ops.contains(&Op::Rect(BOSS_BAR.to_string())));
        assert_eq!(rec.count_circles(BOSS_CORE), RING_BULLETS as usize);
    }

    #[test]
    fn test_game_over_shows_score() {
        let mut state = GameState::new(5);
        state.start_session();
        state.score = 370;
        state.end_session(GameOverReason::Destroyed);
        let mut rec = Recorder::default();
        draw_frame(&state, &mut rec);
        let texts = rec.texts();
        assert!(texts.contains(&"GAME OVER"));
        assert!(texts.contains(&"Score: 370"));
        assert!(!texts.contains(&"HP: 10"));
    }
}
