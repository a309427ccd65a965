//! Castle Break-In entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement, HtmlElement, KeyboardEvent};

    use castle_break_in::audio::AudioManager;
    use castle_break_in::consts::*;
    use castle_break_in::renderer::{RenderState, shapes};
    use castle_break_in::sim::{GamePhase, GameState, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        audio: AudioManager,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// DOM nodes mirroring the simulation's text areas
        text_nodes: Vec<Element>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed),
                render_state: None,
                audio: AudioManager::new(),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                text_nodes: Vec::new(),
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

                // Clear one-shot inputs after processing
                self.input.pause = false;
            }

            let events = self.state.drain_events();
            self.audio.play_events(&events);
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = shapes::scene(&self.state);
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            // Mirror text areas, creating nodes for new ones
            if let Some(hud) = document.get_element_by_id("hud") {
                let (display_w, display_h) = (
                    self.state.tuning.display_width,
                    self.state.tuning.display_height,
                );
                for area in &self.state.text_areas[self.text_nodes.len().min(self.state.text_areas.len())..] {
                    let Ok(node) = document.create_element("div") else {
                        continue;
                    };
                    let _ = node.set_attribute("class", "text-area");
                    if let Ok(html) = node.clone().dyn_into::<HtmlElement>() {
                        let style = html.style();
                        let _ = style.set_property("left", &format!("{}%", area.pos.x / display_w * 100.0));
                        let _ = style.set_property("top", &format!("{}%", area.pos.y / display_h * 100.0));
                    }
                    let _ = hud.append_child(&node);
                    self.text_nodes.push(node);
                }
            }
            for (node, area) in self.text_nodes.iter().zip(&self.state.text_areas) {
                if node.text_content().as_deref() != Some(area.text.as_str()) {
                    node.set_text_content(Some(&area.text));
                }
            }

            // Show/hide pause menu
            if let Some(el) = document.get_element_by_id("pause-menu") {
                if self.state.phase == GamePhase::Paused {
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            // Show/hide game over
            if let Some(el) = document.get_element_by_id("game-over") {
                if let Some(message) = self.state.end_message() {
                    let _ = el.set_attribute("class", "");
                    if let Some(msg_el) = document.get_element_by_id("end-message") {
                        msg_el.set_text_content(Some(message));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        /// Reset game state for restart
        fn restart(&mut self, seed: u64) {
            self.state = GameState::with_tuning(seed, self.state.tuning.clone());
            self.accumulator = 0.0;
            self.input = TickInput {
                autopilot: self.input.autopilot,
                ..Default::default()
            };
            for node in self.text_nodes.drain(..) {
                node.remove();
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Castle Break-In starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let display = {
            let g = game.borrow();
            (g.state.tuning.display_width, g.state.tuning.display_height)
        };
        match RenderState::new(surface, &adapter, width, height, display).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        }

        setup_input_handlers(game.clone());
        setup_restart_button(game.clone());
        setup_auto_pause(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Castle Break-In running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Arrow keys are held; everything else is a one-shot toggle
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = true,
                    "ArrowRight" => g.input.right = true,
                    "Escape" | "p" | "P" => g.input.pause = true,
                    "i" | "I" => {
                        g.input.autopilot = !g.input.autopilot;
                        log::info!("Autopilot: {}", g.input.autopilot);
                    }
                    "m" | "M" => {
                        let muted = !g.audio.is_muted();
                        g.audio.set_muted(muted);
                        log::info!("Muted: {}", muted);
                    }
                    "-" | "_" => {
                        let vol = g.audio.step_volume(-1);
                        log::info!("Volume: {:.1}", vol);
                    }
                    "=" | "+" => {
                        let vol = g.audio.step_volume(1);
                        log::info!("Volume: {:.1}", vol);
                    }
                    _ => return,
                }
                event.prevent_default();
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = false,
                    "ArrowRight" => g.input.right = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
                log::info!("Game restarted with seed: {}", seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Visibility change (tab switch, minimize)
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.input.pause = true;
                    // Keys released while hidden never report keyup
                    g.input.left = false;
                    g.input.right = false;
                    log::info!("Auto-paused (tab hidden)");
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Longest headless run before giving up (ten minutes of play)
#[cfg(not(target_arch = "wasm32"))]
const MAX_HEADLESS_TICKS: u64 = 60 * 60 * 10;

/// Headless run: the princess plays herself until the game ends
///
/// Usage: `castle-break-in [tuning.json] [seed]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use castle_break_in::Tuning;
    use castle_break_in::consts::SIM_DT;
    use castle_break_in::sim::{GameState, TickInput, tick};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Castle Break-In (native) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::error!("Invalid seed: {}", e);
            std::process::exit(1);
        }
        None => std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0),
    };

    let mut state = GameState::with_tuning(seed, tuning);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    while !state.is_over() && state.time_ticks < MAX_HEADLESS_TICKS {
        tick(&mut state, &input, SIM_DT);
        for event in state.drain_events() {
            log::debug!("tick {}: {:?}", state.time_ticks, event);
        }
    }

    match state.end_message() {
        Some(message) => {
            log::info!(
                "Finished in {:.1}s with {} lives left",
                state.time_ticks as f32 * SIM_DT,
                state.princess.lives
            );
            println!("{}", message);
        }
        None => log::warn!(
            "No result after {} ticks ({} blocks left)",
            state.time_ticks,
            state.blocks_to_destroy
        ),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
