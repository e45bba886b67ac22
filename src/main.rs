//! Volley Pong entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Window};

    use volley_pong::Settings;
    use volley_pong::audio::{AudioManager, SoundEffect};
    use volley_pong::renderer::{DomRenderer, FpsCounter, Renderer};
    use volley_pong::sim::{Command, GameEvent, GamePhase, GameSession, Scheduler};

    /// `Scheduler` backed by requestAnimationFrame. One pending request at
    /// a time; cancelling maps to cancelAnimationFrame, exactly like the
    /// original client's loop.
    struct RafScheduler {
        window: Window,
        raf_id: Rc<Cell<Option<i32>>>,
        /// Set after the game is boxed up; the callback re-enters `frame`
        callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    }

    impl RafScheduler {
        fn new(window: Window) -> Self {
            Self {
                window,
                raf_id: Rc::new(Cell::new(None)),
                callback: Rc::new(RefCell::new(None)),
            }
        }

        /// The pending request just fired; forget its id so the session can
        /// request the next one.
        fn mark_fired(&mut self) {
            self.raf_id.set(None);
        }
    }

    impl Scheduler for RafScheduler {
        fn request_next_tick(&mut self) {
            if self.raf_id.get().is_some() {
                return;
            }
            if let Some(cb) = self.callback.borrow().as_ref() {
                match self
                    .window
                    .request_animation_frame(cb.as_ref().unchecked_ref())
                {
                    Ok(id) => self.raf_id.set(Some(id)),
                    Err(e) => log::warn!("requestAnimationFrame failed: {e:?}"),
                }
            }
        }

        fn cancel(&mut self) {
            if let Some(id) = self.raf_id.take() {
                let _ = self.window.cancel_animation_frame(id);
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        scheduler: RafScheduler,
        renderer: Option<DomRenderer>,
        audio: AudioManager,
        settings: Settings,
        fps: FpsCounter,
    }

    impl Game {
        fn new(seed: u64, window: Window) -> Self {
            let settings = Settings::load();
            // Persist on first run so the stored record exists to edit
            settings.save();
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            let mut session = GameSession::new(seed);
            session.set_particles_enabled(settings.particles);
            Self {
                session,
                scheduler: RafScheduler::new(window),
                renderer: None,
                audio,
                settings,
                fps: FpsCounter::default(),
            }
        }

        /// One display frame: run a tick, fan events out to audio and the
        /// renderer, refresh the HUD.
        fn frame(&mut self, time: f64) {
            self.scheduler.mark_fired();

            let events = self.session.on_tick_request(&mut self.scheduler);
            for event in &events {
                self.audio.play(SoundEffect::for_event(event));
                match *event {
                    GameEvent::ScorePoint { score, .. } => {
                        if let Some(renderer) = &mut self.renderer {
                            renderer.update_score(score);
                        }
                    }
                    GameEvent::GameEnded {
                        winner,
                        final_score,
                    } => {
                        if let Some(renderer) = &mut self.renderer {
                            renderer.show_winner(winner, final_score);
                        }
                    }
                    _ => {}
                }
            }

            if let Some(renderer) = &mut self.renderer {
                renderer.update_positions(&self.session);
            }

            self.fps.record(time);
            self.update_hud();
        }

        /// The control button cycles Start -> Pause -> Resume, switching to
        /// Play Again once the match ends.
        fn on_control_button(&mut self) {
            self.audio.resume();
            match self.session.phase() {
                GamePhase::Idle => self.session.command(Command::Start, &mut self.scheduler),
                GamePhase::Running => self.session.command(Command::Pause, &mut self.scheduler),
                GamePhase::Paused => self.session.command(Command::Resume, &mut self.scheduler),
                GamePhase::Ended(_) => {
                    self.session.command(Command::Reset, &mut self.scheduler);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.clear_winner();
                        renderer.update_score(self.session.score());
                    }
                }
            }
            self.update_hud();
        }

        fn update_hud(&self) {
            let Some(document) = self.scheduler.window.document() else {
                return;
            };

            if let Some(btn) = document.get_element_by_id("startButton") {
                let label = match self.session.phase() {
                    GamePhase::Idle => "START GAME",
                    GamePhase::Running => "PAUSE GAME",
                    GamePhase::Paused => "RESUME GAME",
                    GamePhase::Ended(_) => "PLAY AGAIN",
                };
                btn.set_text_content(Some(label));
            }

            if self.settings.show_fps {
                if let Some(el) = document.get_element_by_id("fps") {
                    el.set_text_content(Some(&self.fps.fps().to_string()));
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Volley Pong starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, window.clone())));
        log::info!("Game initialized with seed: {}", game.borrow().session.seed());

        {
            let mut g = game.borrow_mut();
            g.renderer = DomRenderer::from_document(&document);
            if g.renderer.is_none() {
                log::warn!("Board elements missing - running without rendering");
            }
        }

        // Wire the RAF callback back into the game before anything can
        // request a tick.
        {
            let game_for_frame = game.clone();
            let closure = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
                game_for_frame.borrow_mut().frame(time);
            });
            *game.borrow().scheduler.callback.borrow_mut() = Some(closure);
        }

        setup_key_handlers(&window, game.clone());
        setup_control_button(&document, game.clone());
        setup_auto_pause(&window, &document, game.clone());

        game.borrow().update_hud();
        log::info!("Volley Pong ready");
    }

    fn setup_key_handlers(window: &Window, game: Rc<RefCell<Game>>) {
        // Key-down: movement keys feed the input snapshot; the pause key is
        // edge-triggered inside the simulation, except while paused where
        // no tick runs to see it - resume is a direct command instead.
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let key = event.key();
                let mut g = game.borrow_mut();
                let g = &mut *g;
                match key.as_str() {
                    "Escape" | "p" | "P" if g.session.phase() == GamePhase::Paused => {
                        g.session.command(Command::Resume, &mut g.scheduler);
                        g.update_hud();
                    }
                    "w" | "W" | "s" | "S" | "ArrowUp" | "ArrowDown" | "Escape" | "p" | "P" => {
                        event.prevent_default();
                        g.session.apply_key(&key, true);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key-up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().session.apply_key(&event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_control_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("startButton") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().on_control_button();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("No start button found");
        }
    }

    fn setup_auto_pause(window: &Window, document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    let g = &mut *g;
                    if g.session.phase() == GamePhase::Running {
                        g.session.command(Command::Pause, &mut g.scheduler);
                        g.update_hud();
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
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let g = &mut *g;
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
                if g.session.phase() == GamePhase::Running {
                    g.session.command(Command::Pause, &mut g.scheduler);
                    g.update_hud();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus: restore audio
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(false);
                }
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
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
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use volley_pong::consts::{BALL_SIZE, PADDLE_HEIGHT};
    use volley_pong::sim::{Command, GamePhase, GameSession, Scheduler};

    /// Cooperative single-step scheduler for the headless loop.
    #[derive(Default)]
    struct TickFlag {
        pending: bool,
    }

    impl TickFlag {
        fn take(&mut self) -> bool {
            std::mem::take(&mut self.pending)
        }
    }

    impl Scheduler for TickFlag {
        fn request_next_tick(&mut self) {
            self.pending = true;
        }
        fn cancel(&mut self) {
            self.pending = false;
        }
    }

    env_logger::init();
    log::info!("Volley Pong (native) starting...");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    // Headless smoke match: player 1 chases the ball, player 2 holds still.
    let mut session = GameSession::new(seed);
    let mut sched = TickFlag::default();
    session.command(Command::Start, &mut sched);

    let max_ticks = 60 * 60 * 10; // 10 minutes at 60 Hz
    while sched.take() && session.tick_count() < max_ticks {
        let ball_center = session.ball().pos.y + BALL_SIZE / 2.0;
        let paddle_center = session.paddles()[0].y + PADDLE_HEIGHT / 2.0;
        session.apply_key("w", ball_center < paddle_center);
        session.apply_key("s", ball_center > paddle_center);
        session.on_tick_request(&mut sched);
    }

    let score = session.score();
    match session.phase() {
        GamePhase::Ended(winner) => log::info!(
            "{} wins {} - {} after {} ticks",
            winner.as_str(),
            score.player1,
            score.player2,
            session.tick_count()
        ),
        _ => log::info!(
            "stopped at {} - {} after {} ticks",
            score.player1,
            score.player2,
            session.tick_count()
        ),
    }
}
