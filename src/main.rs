//! Treasure Run entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use treasure_run::assets::{AssetTracker, SpriteId};
    use treasure_run::audio::AudioManager;
    use treasure_run::canvas::{self, ImageStore};
    use treasure_run::render::build_frame;
    use treasure_run::sim::{FixedStepLoop, LoopToken, Screen, Simulation, autopilot};
    use treasure_run::GameConfig;

    /// Every overlay the page carries, hidden unless its screen is active
    const OVERLAYS: [&str; 5] = [
        "loading-screen",
        "start-screen",
        "game-play-screen",
        "pause-screen",
        "game-over-screen",
    ];

    /// Game instance holding all state
    struct Game {
        sim: Simulation,
        frame_loop: FixedStepLoop,
        last_time: f64,
        audio: AudioManager,
        images: ImageStore,
        tracker: AssetTracker,
        ctx: CanvasRenderingContext2d,
        document: Document,
        /// Screen the overlays were last laid out for
        shown: Option<Screen>,
        /// Bot presses jump instead of the player
        autopilot: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(config: GameConfig, seed: u64, ctx: CanvasRenderingContext2d, document: Document) -> Self {
            let tracker = AssetTracker::new(&config.assets.manifest);
            Self {
                sim: Simulation::with_seed(config, seed),
                frame_loop: FixedStepLoop::new(),
                last_time: 0.0,
                audio: AudioManager::new(),
                images: ImageStore::default(),
                tracker,
                ctx,
                document,
                shown: None,
                autopilot: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Start a fresh loop generation for a new session
        fn arm_loop(&mut self) -> LoopToken {
            self.last_time = 0.0;
            self.frame_loop.arm()
        }

        /// One animation frame. Returns whether to request another.
        fn frame(&mut self, token: LoopToken, time: f64) -> bool {
            if !self.frame_loop.is_current(token) {
                return false;
            }

            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                treasure_run::consts::SIM_DT
            };
            self.last_time = time;

            if self.autopilot {
                self.frame_loop.advance_with(&mut self.sim, dt, |sim| {
                    if autopilot::wants_jump(sim.state(), sim.config()) {
                        sim.jump();
                    }
                });
            } else {
                self.frame_loop.advance(&mut self.sim, dt);
            }

            self.track_fps(time);
            self.present();
            self.frame_loop.is_current(token)
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Oldest sample sits at the next write position
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Flush events to audio, then draw and refresh the DOM
        fn present(&mut self) {
            // Muted settings yield a zero volume, so every cue is skipped
            let mut cues = self.audio.cues(self.sim.settings());
            self.sim.dispatch_events(&mut cues);
            self.render();
            self.update_hud();
        }

        fn render(&self) {
            let commands = build_frame(self.sim.state(), self.sim.config(), &self.tracker);
            canvas::draw(&self.ctx, &commands, &self.images, &self.tracker);
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let classes = el.class_list();
                let _ = if hidden {
                    classes.add_1("hidden")
                } else {
                    classes.remove_1("hidden")
                };
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let hud = self.sim.hud();
            self.set_text("current-scenario", &hud.scenario_label);
            self.set_text("life-indicator", &format!("\u{2764}\u{fe0f} Lives: {}", hud.lives));
            self.set_text("progress-indicator", &format!("Progress: {}%", hud.progress_percent));
            if self.sim.settings().show_fps {
                self.set_text("fps-counter", &self.fps.to_string());
            }

            let screen = self.sim.screen();
            if self.shown == Some(screen) {
                return;
            }
            self.shown = Some(screen);

            for id in OVERLAYS {
                // The play field stays up underneath the pause overlay
                let visible = id == screen.overlay_id()
                    || (screen == Screen::Paused && id == Screen::Playing.overlay_id());
                self.set_hidden(id, !visible);
            }
            if let Some(message) = self.sim.final_message() {
                self.set_text("final-message", message);
            }
        }

        fn on_asset_settled(&mut self, sprite: SpriteId, loaded: bool) {
            let complete = if loaded {
                self.tracker.mark_loaded(sprite)
            } else {
                self.tracker.mark_failed(sprite)
            };
            if complete {
                log::info!(
                    "Assets settled: {} loaded, {} failed",
                    self.tracker.settled() - self.tracker.failed_count(),
                    self.tracker.failed_count()
                );
                self.sim.assets_ready();
            }
            // Repaint the idle screens as sprites arrive
            if !self.frame_loop.is_running() {
                self.present();
            }
        }

        fn toggle_sound(&mut self) {
            let enabled = self.sim.toggle_sound();
            self.set_text("sound-toggle", if enabled { "Sound: on" } else { "Sound: off" });
        }
    }

    fn js_err(msg: &str) -> JsValue {
        JsValue::from_str(msg)
    }

    /// Optional inline tuning from `<script type="application/json" id="game-config">`
    fn load_config(document: &Document) -> GameConfig {
        let Some(json) = document
            .get_element_by_id("game-config")
            .and_then(|el| el.text_content())
            .filter(|text| !text.trim().is_empty())
        else {
            log::info!("Using default game config");
            return GameConfig::default();
        };
        match GameConfig::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded game config from page");
                config
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                GameConfig::default()
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(|e| js_err(&e.to_string()))?;

        log::info!("Treasure Run starting...");

        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let document = window.document().ok_or_else(|| js_err("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .ok_or_else(|| js_err("no canvas"))?
            .dyn_into()?;

        let config = load_config(&document);
        canvas.set_width(config.field.width as u32);
        canvas.set_height(config.field.height as u32);
        let ctx = canvas::context_2d(&canvas)?;

        let seed = config.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let manifest = config.assets.manifest.clone();
        let game = Rc::new(RefCell::new(Game::new(config, seed, ctx, document.clone())));
        log::info!("Game initialized with seed: {}", seed);

        let images = {
            let game = game.clone();
            ImageStore::load(&manifest, move |sprite, loaded| {
                game.borrow_mut().on_asset_settled(sprite, loaded);
            })?
        };
        game.borrow_mut().images = images;

        setup_input_handlers(&document, &canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_auto_pause(&document, game.clone());

        game.borrow_mut().present();
        log::info!("Treasure Run running!");
        Ok(())
    }

    /// Arm a new loop generation and schedule its first frame
    fn start_loop(game: &Rc<RefCell<Game>>) {
        let token = game.borrow_mut().arm_loop();
        request_animation_frame(game.clone(), token);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, token: LoopToken) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, token, time);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, token: LoopToken, time: f64) {
        let keep_going = game.borrow_mut().frame(token, time);
        if keep_going {
            request_animation_frame(game, token);
        }
    }

    /// Attach a click handler to the element with `id`, if the page has one
    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        let Some(el) = document.get_element_by_id(id) else {
            log::debug!("No #{} on page", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click(document, "start-button", move || {
                let started = {
                    let mut g = game.borrow_mut();
                    g.audio.resume();
                    g.sim.start()
                };
                if started {
                    start_loop(&game);
                }
            });
        }
        {
            let game = game.clone();
            on_click(document, "restart-button", move || {
                let restarted = game.borrow_mut().sim.restart();
                if restarted {
                    start_loop(&game);
                }
            });
        }
        {
            let game = game.clone();
            on_click(document, "jump-button", move || {
                game.borrow_mut().sim.jump();
            });
        }
        {
            let game = game.clone();
            on_click(document, "resume-button", move || {
                game.borrow_mut().sim.resume();
            });
        }
        on_click(document, "sound-toggle", move || {
            game.borrow_mut().toggle_sound();
        });
    }

    fn setup_input_handlers(document: &Document, canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Touch start (jump)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().sim.jump();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" => {
                        // Keep the page from scrolling
                        event.prevent_default();
                        g.sim.jump();
                    }
                    "Escape" | "KeyP" => {
                        g.sim.toggle_pause();
                    }
                    "KeyM" => g.toggle_sound(),
                    "KeyA" => {
                        g.autopilot = !g.autopilot;
                        log::info!("Autopilot: {}", g.autopilot);
                    }
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.sim.settings().pause_on_blur && g.sim.pause() {
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.sim.settings().pause_on_blur && g.sim.pause() {
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    log::info!("Treasure Run (native) starting...");
    log::info!("Browser build required to play - running a headless autopilot session");

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(&path),
        None => treasure_run::GameConfig::default(),
    };
    demo_session(config);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(path: &str) -> treasure_run::GameConfig {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| treasure_run::GameConfig::from_json(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(config) => {
            log::info!("Loaded config from {}", path);
            config
        }
        Err(e) => {
            log::warn!("Could not load {}: {}; using defaults", path, e);
            treasure_run::GameConfig::default()
        }
    }
}

/// Play one seeded session with the autopilot at a simulated 60 fps
#[cfg(not(target_arch = "wasm32"))]
fn demo_session(config: treasure_run::GameConfig) {
    use treasure_run::consts::{SIM_DT, TICK_RATE};
    use treasure_run::sim::{FixedStepLoop, Screen, autopilot};

    // Five minutes of frames is far past any finished run
    const MAX_FRAMES: u32 = 5 * 60 * TICK_RATE;

    let mut sim = treasure_run::Simulation::new(config);
    if sim.screen() == Screen::Loading {
        sim.assets_ready();
    }
    sim.start();

    let mut frame_loop = FixedStepLoop::new();
    frame_loop.arm();
    let mut frames = 0;
    while frame_loop.is_running() && frames < MAX_FRAMES {
        frame_loop.advance_with(&mut sim, SIM_DT, |sim| {
            if autopilot::wants_jump(sim.state(), sim.config()) {
                sim.jump();
            }
        });
        for event in sim.drain_events() {
            log::debug!("{:?}", event);
        }
        frames += 1;
    }

    let state = sim.state();
    let hud = sim.hud();
    log::info!(
        "Session over after {:.1}s: {:?}, {} at {}%",
        treasure_run::ticks_to_ms(state.time_ticks) / 1000.0,
        state.screen,
        hud.scenario_label,
        hud.progress_percent
    );
    log::info!(
        "Jumps: {}, obstacles spawned: {} ({} forced by idle)",
        state.stats.jumps,
        state.stats.obstacles_spawned,
        state.stats.forced_spawns
    );
    println!("{}", sim.final_message().unwrap_or("Session did not finish"));
}
