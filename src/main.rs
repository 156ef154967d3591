//! Neon Barrage entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use neon_barrage::consts::*;
    use neon_barrage::renderer::{Canvas, TextAlign, draw_frame};
    use neon_barrage::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

    /// 2D canvas context as a drawing surface
    struct Ctx2d(CanvasRenderingContext2d);

    impl Canvas for Ctx2d {
        fn clear(&mut self, color: &str) {
            let canvas = self.0.canvas();
            let (w, h) = canvas.map_or((0.0, 0.0), |c| (c.width() as f64, c.height() as f64));
            self.0.set_fill_style_str(color);
            self.0.fill_rect(0.0, 0.0, w, h);
        }

        fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: &str) {
            self.0.set_fill_style_str(color);
            self.0
                .fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
        }

        fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str) {
            self.0.set_fill_style_str(color);
            self.0.begin_path();
            let _ = self.0.arc(
                center.x as f64,
                center.y as f64,
                radius.max(0.0) as f64,
                0.0,
                std::f64::consts::TAU,
            );
            self.0.fill();
        }

        fn fill_polygon(&mut self, points: &[Vec2], color: &str) {
            let Some((first, rest)) = points.split_first() else {
                return;
            };
            self.0.set_fill_style_str(color);
            self.0.begin_path();
            self.0.move_to(first.x as f64, first.y as f64);
            for p in rest {
                self.0.line_to(p.x as f64, p.y as f64);
            }
            self.0.close_path();
            self.0.fill();
        }

        fn text(&mut self, text: &str, pos: Vec2, size_px: f32, align: TextAlign, color: &str) {
            self.0.set_fill_style_str(color);
            self.0.set_font(&format!("{}px Inter, Arial", size_px));
            self.0.set_text_align(match align {
                TextAlign::Left => "left",
                TextAlign::Center => "center",
            });
            let _ = self.0.fill_text(text, pos.x as f64, pos.y as f64);
        }

        fn set_alpha(&mut self, alpha: f32) {
            self.0.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        ctx: Ctx2d,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
    }

    impl Game {
        fn new(state: GameState, ctx: CanvasRenderingContext2d) -> Self {
            Self {
                state,
                ctx: Ctx2d(ctx),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                for event in &self.state.events {
                    match event {
                        GameEvent::BossDefeated => log::info!("Boss down"),
                        GameEvent::PlayerHit { health } => log::debug!("Hit, {} hp left", health),
                        _ => {}
                    }
                }

                // Clear one-shot inputs after processing
                self.input.start = false;
                self.input.pause = false;
            }
        }

        fn render(&mut self) {
            draw_frame(&self.state, &mut self.ctx);
        }

        fn key(&mut self, key: &str, down: bool) -> bool {
            match key {
                "ArrowLeft" | "a" | "A" => self.input.left = down,
                "ArrowRight" | "d" | "D" => self.input.right = down,
                "ArrowUp" | "w" | "W" => self.input.up = down,
                "ArrowDown" | "s" | "S" => self.input.down = down,
                " " => self.input.fire = down,
                "Enter" if down => self.input.start = true,
                "Escape" | "p" | "P" if down => self.input.pause = true,
                "i" | "I" if down => {
                    self.input.autopilot = !self.input.autopilot;
                    log::info!("Autopilot: {}", self.input.autopilot);
                }
                _ => return false,
            }
            true
        }

        /// Request a pause if a run is in progress
        fn auto_pause(&mut self, why: &str) {
            if self.state.phase == GamePhase::Playing {
                self.input.pause = true;
                log::info!("Auto-paused ({})", why);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Neon Barrage starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(seed);
        canvas.set_width(state.tuning.width as u32);
        canvas.set_height(state.tuning.height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let game = Rc::new(RefCell::new(Game::new(state, ctx)));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());
        request_animation_frame(game);

        log::info!("Neon Barrage running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        for (kind, down) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().key(event.key().as_str(), down) {
                    // Keep arrows and space from scrolling the page
                    event.prevent_default();
                }
            });
            let _ = window.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.auto_pause("tab hidden");
                    // Drop the held keys; their keyup never arrives
                    g.input = TickInput {
                        pause: g.input.pause,
                        autopilot: g.input.autopilot,
                        ..Default::default()
                    };
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().auto_pause("window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry point is wasm_main via wasm_bindgen(start)
}

/// Headless demo: the autopilot plays one full run and the outcome is logged.
///
/// Usage: `neon-barrage [tuning.json] [seed]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_barrage::Tuning;
    use neon_barrage::consts::SIM_DT;
    use neon_barrage::sim::{GameEvent, GameState, TickInput, tick};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Neon Barrage (native) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Bad tuning file {}: {}, using defaults", path, e);
                Tuning::default()
            }),
            Err(e) => {
                log::warn!("Cannot read {}: {}, using defaults", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x5eed);

    let mut state = GameState::with_tuning(seed, tuning);
    let mut input = TickInput {
        start: true,
        autopilot: true,
        ..Default::default()
    };

    // Time budget plus a second of slack
    let max_frames = ((state.tuning.max_time_secs + 1.0) / SIM_DT as f64).ceil() as u64;
    let mut bosses = 0;
    let mut hits = 0;
    for _ in 0..max_frames {
        tick(&mut state, &input, SIM_DT);
        input.start = false;
        for event in &state.events {
            match event {
                GameEvent::BossDefeated => bosses += 1,
                GameEvent::PlayerHit { .. } => hits += 1,
                _ => {}
            }
        }
        if state.is_game_over() {
            break;
        }
    }

    let hud = state.hud();
    println!(
        "seed {}: score {} | level {} | hp {}/{} | power {}/{} | bosses {} | hits taken {}",
        seed,
        hud.score,
        hud.level,
        hud.health,
        hud.max_health,
        hud.power,
        hud.max_power,
        bosses,
        hits
    );
}
