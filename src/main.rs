//! Road Rush entry point
//!
//! The browser build runs the game against a WebGPU canvas and DOM
//! overlays. The native build is a headless autopilot runner.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlInputElement, KeyboardEvent};

    use road_rush::audio::{AudioManager, SoundEffect};
    use road_rush::consts::HIGH_SCORE_DISPLAY;
    use road_rush::persistence::LocalStore;
    use road_rush::renderer::{RenderState, scene};
    use road_rush::sim::{EndReason, GamePhase, Key};
    use road_rush::{Command, Game, Tuning};

    /// Everything the page holds on to between frames
    struct App {
        game: Game<LocalStore>,
        render_state: Option<RenderState>,
        audio: AudioManager,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        /// Phase the overlays were last drawn for
        shown_phase: Option<GamePhase>,
    }

    impl App {
        fn new(game: Game<LocalStore>) -> Self {
            let mut audio = AudioManager::new();
            audio.set_volume(game.settings.effective_volume());
            Self {
                game,
                render_state: None,
                audio,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                shown_phase: None,
            }
        }

        /// Advance the game and play cues for whatever happened
        fn update(&mut self, time: f64) {
            let events = self.game.frame(time);
            let warn = self.game.settings.low_fuel_warning;
            for event in &events {
                if let Some(effect) = SoundEffect::for_event(event, warn) {
                    self.audio.play(effect);
                }
            }

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        fn render(&mut self) {
            let segments = self.game.settings.quality.circle_segments();
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = scene::build(&self.game.state, segments);
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Sync DOM overlays with the game
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let state = &self.game.state;
            let phase = state.phase;

            set_text(&document, "score", &state.score.to_string());
            set_text(&document, "level", &state.difficulty.level.to_string());
            set_text(&document, "fuel", &format!("{:.0}", state.car.fuel));
            set_text(&document, "fps", &self.fps.to_string());
            set_visible(&document, "fps-counter", self.game.settings.show_fps);
            set_visible(&document, "demo-badge", self.game.demo_mode);

            if self.shown_phase == Some(phase) {
                return;
            }
            self.shown_phase = Some(phase);

            set_visible(&document, "menu-screen", phase == GamePhase::Menu);
            set_visible(&document, "hud", phase == GamePhase::Playing);
            set_visible(
                &document,
                "instructions-screen",
                phase == GamePhase::Instructions,
            );
            set_visible(&document, "highscores-screen", phase == GamePhase::HighScores);
            set_visible(&document, "game-over-screen", phase == GamePhase::GameOver);

            match phase {
                GamePhase::GameOver => {
                    set_text(&document, "final-score", &state.score.to_string());
                    let reason = match state.end_reason {
                        Some(EndReason::OutOfFuel) => "Out of fuel!",
                        Some(EndReason::Crash) | None => "You crashed!",
                    };
                    set_text(&document, "end-reason", reason);
                    set_visible(&document, "submit-form", self.game.can_submit());
                }
                GamePhase::HighScores => fill_high_scores(&document, &self.game),
                GamePhase::Menu | GamePhase::Playing | GamePhase::Instructions => {}
            }
        }

        /// Apply a command and redraw overlays if it took effect
        fn command(&mut self, command: Command) {
            self.audio.resume();
            if self.game.apply(command) {
                self.update_hud();
            }
        }

        fn toggle_demo(&mut self) {
            self.game.demo_mode = !self.game.demo_mode;
            self.game.state.car.steer = Vec2::ZERO;
            log::info!("Demo mode: {}", self.game.demo_mode);
        }

        fn toggle_mute(&mut self) {
            let mut settings = self.game.settings.clone();
            settings.muted = !settings.muted;
            self.audio.set_volume(settings.effective_volume());
            self.game.set_settings(settings);
        }

        fn cycle_quality(&mut self) {
            let mut settings = self.game.settings.clone();
            settings.quality = settings.quality.next();
            log::info!("Quality: {}", settings.quality.as_str());
            self.game.set_settings(settings);
        }

        fn toggle_fps(&mut self) {
            let mut settings = self.game.settings.clone();
            settings.show_fps = !settings.show_fps;
            self.game.set_settings(settings);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    /// Rebuild the leaderboard list, highlighting the entry just submitted
    fn fill_high_scores(document: &Document, game: &Game<LocalStore>) {
        let Some(list) = document.get_element_by_id("highscores-list") else {
            return;
        };
        list.set_text_content(None);

        if game.high_scores.is_empty() {
            if let Ok(li) = document.create_element("li") {
                li.set_text_content(Some("No scores yet"));
                let _ = list.append_child(&li);
            }
            return;
        }

        for (i, entry) in game.high_scores.top().iter().enumerate() {
            let Ok(li) = document.create_element("li") else {
                continue;
            };
            // Names go through text nodes, never markup
            li.set_text_content(Some(&format!("{}. {} - {}", i + 1, entry.name, entry.score)));
            if game.last_rank == Some(i + 1) {
                let _ = li.class_list().add_1("highlight");
            }
            let _ = list.append_child(&li);
        }

        if let Some(rank) = game.last_rank.filter(|r| *r > HIGH_SCORE_DISPLAY) {
            if let Ok(li) = document.create_element("li") {
                li.set_text_content(Some(&format!("Your rank: {}", rank)));
                let _ = li.class_list().add_1("highlight");
                let _ = list.append_child(&li);
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Road Rush starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let store = LocalStore::new();
        let tuning = Tuning::load(&store);
        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(Game::new(store, seed, tuning))));

        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get device: {e}")))?;
        app.borrow_mut().render_state = Some(render_state);

        setup_keyboard(&window, app.clone());
        setup_buttons(&document, app.clone());

        app.borrow_mut().update_hud();
        request_animation_frame(app);

        log::info!("Road Rush running!");
        Ok(())
    }

    /// Keys typed into the name field belong to the field
    fn typing_in_input(event: &KeyboardEvent) -> bool {
        event
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            .is_some()
    }

    fn setup_keyboard(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if typing_in_input(&event) {
                    return;
                }
                let mut a = app.borrow_mut();
                if let Some(key) = Key::from_dom(&event.key()) {
                    // Keep arrows and space from scrolling the page
                    event.prevent_default();
                    if event.repeat() && !key.accepts_repeat() {
                        return;
                    }
                    if a.game.key_down(key) {
                        a.update_hud();
                    }
                    return;
                }
                match event.key().as_str() {
                    "d" | "D" => a.toggle_demo(),
                    "m" | "M" => a.toggle_mute(),
                    "q" | "Q" => a.cycle_quality(),
                    "f" | "F" => a.toggle_fps(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_dom(&event.key()) {
                    app.borrow_mut().game.key_up(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click<F>(el: &Element, mut handler: F)
    where
        F: FnMut() + 'static,
    {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        let simple = [
            ("start-btn", Command::Start),
            ("instructions-btn", Command::ShowInstructions),
            ("highscores-btn", Command::ShowHighScores),
            ("restart-btn", Command::Restart),
        ];
        for (id, command) in simple {
            if let Some(btn) = document.get_element_by_id(id) {
                let app = app.clone();
                on_click(&btn, move || app.borrow_mut().command(command.clone()));
            }
        }

        if let Some(btn) = document.get_element_by_id("submit-score-btn") {
            let app = app.clone();
            let input = document
                .get_element_by_id("player-name")
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
            on_click(&btn, move || {
                let name = input.as_ref().map(|i| i.value()).unwrap_or_default();
                app.borrow_mut().command(Command::SubmitScore(name));
            });
        }

        // Every screen has its own back-to-menu button
        if let Ok(buttons) = document.query_selector_all(".menu-btn") {
            for i in 0..buttons.length() {
                let Some(btn) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                    continue;
                };
                let app = app.clone();
                on_click(&btn, move || app.borrow_mut().command(Command::Menu));
            }
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.update(time);
            a.render();
            a.update_hud();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Road Rush failed to start: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use anyhow::{Context, Result};

    use road_rush::consts::NOMINAL_FRAME_MS;
    use road_rush::persistence::KeyValueStore;
    use road_rush::sim::{GameEvent, GamePhase};
    use road_rush::{Command, Game, Tuning};

    pub const DEFAULT_SEED: u64 = 42;
    /// About five minutes of play at 60 Hz
    pub const DEFAULT_MAX_FRAMES: u64 = 18_000;

    /// `road-rush [seed] [max_frames]`
    pub fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(u64, u64)> {
        let seed = args
            .next()
            .map(|s| s.parse::<u64>())
            .transpose()
            .context("seed must be an unsigned integer")?
            .unwrap_or(DEFAULT_SEED);
        let max_frames = args
            .next()
            .map(|s| s.parse::<u64>())
            .transpose()
            .context("max_frames must be an unsigned integer")?
            .unwrap_or(DEFAULT_MAX_FRAMES);
        Ok((seed, max_frames))
    }

    /// Play one autopilot run at a fixed step and record the score
    pub fn run<S: KeyValueStore>(store: S, seed: u64, max_frames: u64) -> Game<S> {
        let tuning = Tuning::load(&store);
        let mut game = Game::new(store, seed, tuning);
        game.demo_mode = true;
        game.apply(Command::Start);
        log::info!("Autopilot run with seed {}", game.state.seed);

        let mut frames = 0;
        while frames < max_frames && game.phase() == GamePhase::Playing {
            for event in game.step(NOMINAL_FRAME_MS) {
                match event {
                    GameEvent::PowerUpCollected { kind, .. } => {
                        log::debug!("Frame {}: collected {:?}", frames, kind)
                    }
                    GameEvent::ObstacleSmashed { .. } => log::debug!("Frame {}: smash", frames),
                    GameEvent::LowFuel => log::info!("Frame {}: fuel low", frames),
                    GameEvent::LevelUp { .. } | GameEvent::Crashed | GameEvent::OutOfFuel => {}
                }
            }
            frames += 1;
        }

        let state = &game.state;
        match state.end_reason {
            Some(reason) => println!(
                "Run ended ({:?}) after {} frames: score {}, level {}",
                reason, frames, state.score, state.difficulty.level
            ),
            None => println!(
                "Stopped after {} frames: score {}, level {}, fuel {:.1}",
                frames, state.score, state.difficulty.level, state.car.fuel
            ),
        }

        if game.can_submit() && game.apply(Command::SubmitScore("Autopilot".into())) {
            println!("High scores:");
            for (i, entry) in game.high_scores.top().iter().enumerate() {
                let marker = if game.last_rank == Some(i + 1) { " <" } else { "" };
                println!("{:>2}. {:<16} {:>8}{}", i + 1, entry.name, entry.score, marker);
            }
        }
        game
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use road_rush::persistence::MemoryStore;
        use road_rush::HighScores;

        fn args(list: &[&str]) -> impl Iterator<Item = String> {
            list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
        }

        #[test]
        fn test_parse_args() {
            assert_eq!(parse_args(args(&[])).unwrap(), (DEFAULT_SEED, DEFAULT_MAX_FRAMES));
            assert_eq!(parse_args(args(&["7", "100"])).unwrap(), (7, 100));
            assert!(parse_args(args(&["seven"])).is_err());
        }

        #[test]
        fn test_short_run_does_not_submit() {
            let game = run(MemoryStore::new(), 1, 5);
            assert_eq!(game.phase(), GamePhase::Playing);
            assert_eq!(game.state.score, 5);
            assert!(game.store().get_item(HighScores::STORAGE_KEY).is_none());
        }

        #[test]
        fn test_finished_run_is_recorded() {
            // Fuel burn outgrows refuels within a few levels
            let game = run(MemoryStore::new(), 3, 200_000);
            assert_eq!(game.phase(), GamePhase::HighScores);
            assert_eq!(game.last_rank, Some(1));
            assert_eq!(game.high_scores.top()[0].name, "Autopilot");
            assert!(game.store().get_item(HighScores::STORAGE_KEY).is_some());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use road_rush::persistence::{FileStore, MemoryStore};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Road Rush (native) starting...");

    let (seed, max_frames) = headless::parse_args(std::env::args().skip(1))?;

    match FileStore::open_default() {
        Ok(store) => {
            headless::run(store, seed, max_frames);
        }
        Err(e) => {
            log::warn!("High scores will not be saved: {:#}", e);
            headless::run(MemoryStore::new(), seed, max_frames);
        }
    }
    Ok(())
}
