//! Hemorrhoids entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, TouchEvent};

    use hemorrhoids::consts::*;
    use hemorrhoids::hud::{Hud, HudChanges, padded_score};
    use hemorrhoids::platform::InputState;
    use hemorrhoids::renderer::{RenderState, background_color, build_scene};
    use hemorrhoids::sim::{GamePhase, GameState, tick};
    use hemorrhoids::{Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        hud: Hud,
        input: InputState,
        render_state: Option<RenderState>,
        /// Unsimulated time in milliseconds
        accumulator: f32,
        last_time: f64,
        /// Start screen dismissed
        started: bool,
        /// Arena size in CSS pixels
        arena: (f32, f32),
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, settings: Settings, arena: (f32, f32)) -> Self {
            let state = new_session(seed, &settings, arena);
            Self {
                hud: Hud::new(&state),
                state,
                settings,
                input: InputState::new(),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                started: false,
                arena,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt_ms: f32, time: f64) -> HudChanges {
            if !self.started {
                return HudChanges::default();
            }

            if self.input.take_quality_cycle() {
                let preset = self.settings.cycle_quality();
                self.settings.save();
                log::info!("Quality set to {}", preset.as_str());
            }

            let dt_ms = dt_ms.min(100.0);
            self.accumulator += dt_ms;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
                let input = self.input.sample();
                tick(&mut self.state, &input, SIM_DT_MS);
                self.accumulator -= SIM_DT_MS;
                substeps += 1;
            }
            if substeps == MAX_SUBSTEPS {
                // Drop the backlog rather than spiral
                self.accumulator = self.accumulator.min(SIM_DT_MS);
            }

            let events = self.state.drain_events();
            let changes = self.hud.apply(&self.state, &events);

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            changes
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = build_scene(&self.state, &self.settings);
            match render_state.render(&vertices, background_color(&self.settings)) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    render_state.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document, changes: HudChanges) {
            if changes.counters {
                set_text(document, "score", &self.hud.score_text());
                set_text(document, "lives", &self.hud.lives_text());
                set_text(document, "level", &self.hud.level_text());
                set_text(document, "remaining", &self.hud.remaining_text());
                set_text(document, "rank", self.hud.rank().title);
            }

            match &self.hud.banner {
                Some(banner) => {
                    if changes.banner {
                        set_text(document, "level-heading", &banner.heading);
                        set_text(document, "rank-title", banner.rank.title);
                        set_text(document, "rank-description", banner.rank.description);
                        set_text(document, "level-subtitle", &banner.subtitle);
                        set_hidden(document, "level-message", false);
                    }
                    let opacity = banner.opacity(self.state.time_ms, self.settings.reduced_motion);
                    set_opacity(document, "level-message", opacity);
                }
                None if changes.banner => set_hidden(document, "level-message", true),
                None => {}
            }

            set_hidden(document, "pause-menu", self.state.phase != GamePhase::Paused);

            if changes.game_over {
                if let Some(score) = self.hud.final_score {
                    set_text(document, "final-score", &padded_score(score));
                }
                set_hidden(document, "game-screen", true);
                set_hidden(document, "game-over", false);
            }

            if self.settings.show_fps {
                set_text(document, "fps", &format!("{} FPS", self.fps));
            }
        }

        /// Fresh session with a new seed
        fn restart(&mut self, seed: u64) {
            self.state = new_session(seed, &self.settings, self.arena);
            self.hud = Hud::new(&self.state);
            self.state.drain_events();
            self.accumulator = 0.0;
            self.input = InputState::new();
            self.started = true;
            log::info!("Game started with seed: {}", seed);
        }

        fn resize(&mut self, arena: (f32, f32), surface: (u32, u32)) {
            self.arena = arena;
            self.state.resize(arena.0, arena.1);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(surface.0, surface.1);
                render_state.set_arena(arena.0, arena.1);
            }
        }
    }

    fn new_session(seed: u64, settings: &Settings, arena: (f32, f32)) -> GameState {
        let mut tuning = Tuning::default();
        settings.apply_to_tuning(&mut tuning);
        GameState::with_tuning(seed, tuning, arena.0, arena.1, settings.microbe_count())
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn set_opacity(document: &Document, id: &str, opacity: f32) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.style().set_property("opacity", &format!("{:.2}", opacity));
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    /// Size the canvas backing store; returns (arena, surface) sizes
    fn fit_canvas(canvas: &HtmlCanvasElement) -> ((f32, f32), (u32, u32)) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        ((client_w as f32, client_h as f32), (width, height))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger already set: {}", e).into());
        }

        log::info!("Hemorrhoids starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        set_hidden(&document, "loading", true);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let (arena, surface_size) = fit_canvas(&canvas);

        // Initialize game
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings, arena)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {}", e)))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut render_state = RenderState::new(surface, &adapter, surface_size.0, surface_size.1)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to create device: {}", e)))?;
        render_state.set_arena(arena.0, arena.1);
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone())?;
        setup_buttons(game.clone());
        setup_auto_pause(game.clone())?;
        setup_resize(canvas, game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("Hemorrhoids running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                if g.started && g.input.key_down(&event.key()) {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut()
                        .input
                        .touch_start(touch.client_x() as f32, touch.client_y() as f32);
                }
            });
            canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut()
                        .input
                        .touch_move(touch.client_x() as f32, touch.client_y() as f32);
                }
            });
            canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch end (fire)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.touch_end();
            });
            canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(doc) = document() else {
            return;
        };

        for (id, screen) in [("start-button", "start-screen"), ("restart-button", "game-over")] {
            let Some(btn) = doc.get_element_by_id(id) else {
                log::warn!("missing #{}", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let Some(document) = document() else {
                    return;
                };
                set_hidden(&document, screen, true);
                set_hidden(&document, "game-screen", false);
                set_hidden(&document, "hud", false);

                let mut g = game.borrow_mut();
                g.restart(js_sys::Date::now() as u64);
                g.update_hud(
                    &document,
                    HudChanges {
                        counters: true,
                        banner: true,
                        game_over: false,
                    },
                );
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resume button
        if let Some(btn) = doc.get_element_by_id("resume-button") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Paused {
                    g.input.request_pause(); // Toggle back to playing
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.input.release_all();
                    if g.settings.pause_on_blur && g.state.phase == GamePhase::Playing {
                        g.input.request_pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.input.release_all();
                if g.settings.pause_on_blur && g.state.phase == GamePhase::Playing {
                    g.input.request_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (arena, surface) = fit_canvas(&canvas);
            game.borrow_mut().resize(arena, surface);
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt_ms = if g.last_time > 0.0 {
                (time - g.last_time) as f32
            } else {
                SIM_DT_MS
            };
            g.last_time = time;

            let changes = g.update(dt_ms, time);
            g.render();
            if g.started {
                if let Some(document) = document() {
                    g.update_hud(&document, changes);
                }
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Hemorrhoids (native) starting...");
    log::info!("Rendering needs a browser - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    let tuning = native::load_tuning();
    native::run_demo(seed, tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autopilot session for native runs
#[cfg(not(target_arch = "wasm32"))]
mod native {
    use hemorrhoids::Tuning;
    use hemorrhoids::consts::*;
    use hemorrhoids::hud::padded_score;
    use hemorrhoids::ranks::current_rank;
    use hemorrhoids::sim::{GameEvent, GameState, TickInput, tick};

    /// Ten simulated minutes
    const DEMO_TICKS: u32 = 60 * 60 * 10;

    /// Tuning from the file named by `HEMORRHOIDS_TUNING`, else defaults
    pub fn load_tuning() -> Tuning {
        let Ok(path) = std::env::var("HEMORRHOIDS_TUNING") else {
            return Tuning::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => match Tuning::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path);
                    tuning
                }
                Err(e) => {
                    log::error!("Invalid tuning in {}: {}", path, e);
                    Tuning::default()
                }
            },
            Err(e) => {
                log::error!("Cannot read {}: {}", path, e);
                Tuning::default()
            }
        }
    }

    /// Aim at the nearest enemy and keep spraying
    fn autopilot(state: &GameState) -> TickInput {
        let target = state
            .enemies
            .iter()
            .min_by(|a, b| {
                a.pos
                    .distance_squared(state.ship.pos)
                    .total_cmp(&b.pos.distance_squared(state.ship.pos))
            })
            .map(|enemy| enemy.pos - state.ship.pos);

        TickInput {
            aim: target.map(|d| d.y.atan2(d.x)),
            fire: target.is_some() && state.time_ticks % 8 == 0,
            ..Default::default()
        }
    }

    pub fn run_demo(seed: u64, tuning: Tuning) {
        let mut state = GameState::with_tuning(seed, tuning, DEFAULT_ARENA_WIDTH, DEFAULT_ARENA_HEIGHT, 0);

        for _ in 0..DEMO_TICKS {
            let input = autopilot(&state);
            tick(&mut state, &input, SIM_DT_MS);

            for event in state.drain_events() {
                match event {
                    GameEvent::LevelCleared { level } => {
                        log::info!("Cleared level {} at {:.1}s", level, state.time_ms / 1000.0);
                    }
                    GameEvent::LevelStarted { level, enemies } => {
                        log::debug!("Level {} with {} enemies", level, enemies);
                    }
                    _ => {}
                }
            }
            if state.is_game_over() {
                break;
            }
        }

        println!(
            "Seed {}: score {} | level {} ({}) | lives {} | {:.1}s",
            seed,
            padded_score(state.score),
            state.level,
            current_rank(state.level).title,
            state.lives,
            state.time_ms / 1000.0
        );
    }
}
