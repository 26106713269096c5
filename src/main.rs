//! Flappy Quiz entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement};

    use flappy_quiz::audio::{AudioManager, SoundEffect};
    use flappy_quiz::platform::analytics::GtagAnalytics;
    use flappy_quiz::renderer::CanvasSurface;
    use flappy_quiz::sim::{Intent, QuizGate, World};
    use flappy_quiz::{GameConfig, GameDriver, HighScores};

    /// Game instance holding all state
    struct Game {
        driver: GameDriver<CanvasSurface, GtagAnalytics>,
        audio: AudioManager,
    }

    impl Game {
        fn handle(&mut self, intent: Intent) {
            self.driver.handle(intent);
        }

        /// One display refresh: tick, sounds, draw
        fn frame(&mut self) {
            for event in self.driver.step() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
            }
        }
    }

    fn window_size() -> (f32, f32) {
        let Some(window) = web_sys::window() else {
            return (0.0, 0.0);
        };
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (w as f32, h as f32)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flappy Quiz starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let mut surface =
            CanvasSurface::new(canvas.clone(), document.clone()).expect("no 2d context");
        let (w, h) = window_size();
        surface.resize(w, h);

        let config = GameConfig::load();
        // Write back so the stored entry lists every field for hand editing
        config.save();
        let seed = js_sys::Date::now() as u64;
        let world = World::new(seed, config, QuizGate::default());
        let driver = GameDriver::new(world, surface, GtagAnalytics)
            .with_high_scores(HighScores::load())
            .with_clock(js_sys::Date::now);

        let game = Rc::new(RefCell::new(Game {
            driver,
            audio: AudioManager::new(),
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_flap_handlers(&canvas, game.clone());
        setup_keyboard(game.clone());
        setup_resize(game.clone());
        bind_button(&document, "startButton", Intent::Start, game.clone());
        bind_button(&document, "restartButton", Intent::Restart, game.clone());
        bind_button(&document, "yesButton", Intent::AnswerYes, game.clone());
        bind_button(&document, "noButton", Intent::AnswerNo, game.clone());
        bind_button(&document, "nextQuestionButton", Intent::AcknowledgeWrong, game.clone());

        request_animation_frame(game);

        log::info!("Flappy Quiz running!");
    }

    fn setup_flap_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        for event_name in ["mousedown", "touchstart"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                game.borrow_mut().handle(Intent::Flap);
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                " " | "ArrowUp" => {
                    event.prevent_default();
                    g.handle(Intent::Flap);
                }
                "m" | "M" => {
                    let muted = !g.audio.is_muted();
                    g.audio.set_muted(muted);
                    log::info!("Muted: {}", muted);
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (w, h) = window_size();
            game.borrow_mut().driver.surface_mut().resize(w, h);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Route click and touch on a button to an intent
    fn bind_button(document: &Document, id: &str, intent: Intent, game: Rc<RefCell<Game>>) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Button #{} not found", id);
            return;
        };
        for event_name in ["click", "touchstart"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                game.borrow_mut().handle(intent);
            });
            let _ = btn.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().frame();
        request_animation_frame(game);
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

/// Ticks to simulate headless (two minutes at 60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_TICKS: u32 = 60 * 120;

/// Read a JSON file and parse it, describing any failure
#[cfg(not(target_arch = "wasm32"))]
fn read_json<T>(path: &str, parse: fn(&str) -> Result<T, serde_json::Error>) -> Result<T, String> {
    let json = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    parse(&json).map_err(|e| e.to_string())
}

/// Usage: `flappy-quiz [config.json] [questions.json]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flappy_quiz::GameConfig;
    use flappy_quiz::sim::QuizGate;

    env_logger::init();
    log::info!("Flappy Quiz (native) starting...");
    log::info!("Native mode runs a headless autopilot - use `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);

    let config = match args.next() {
        Some(path) => read_json(&path, GameConfig::from_json).unwrap_or_else(|e| {
            log::warn!("Could not load config from {}: {}; using defaults", path, e);
            GameConfig::default()
        }),
        None => GameConfig::default(),
    };
    match config.to_json() {
        Ok(json) => log::debug!("Effective config:\n{}", json),
        Err(e) => log::warn!("Could not encode config: {}", e),
    }

    let quiz = match args.next() {
        Some(path) => match read_json(&path, QuizGate::from_json) {
            Ok(quiz) => {
                log::info!("Loaded {} questions from {}", quiz.len(), path);
                quiz
            }
            Err(e) => {
                log::warn!("Could not load questions from {}: {}; using built-in bank", path, e);
                QuizGate::default()
            }
        },
        None => QuizGate::default(),
    };

    autopilot::run(config, quiz, HEADLESS_TICKS);
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use flappy_quiz::GameConfig;
    use flappy_quiz::platform::LogAnalytics;
    use flappy_quiz::renderer::HeadlessSurface;
    use flappy_quiz::sim::{GameEvent, GamePhase, Intent, QuizGate, World};
    use flappy_quiz::GameDriver;

    /// Every Nth question is answered wrong on purpose
    const WRONG_EVERY: u32 = 3;

    /// Pick the intent a scripted player would send this tick
    fn choose(world: &World, questions_seen: u32) -> Option<Intent> {
        match world.phase {
            GamePhase::Start => Some(Intent::Start),
            GamePhase::Playing => {
                let bird = &world.bird;
                let target = world
                    .obstacles
                    .iter()
                    .filter(|o| o.right() > bird.pos.x)
                    .min_by(|a, b| a.x.total_cmp(&b.x))
                    .map(|o| (o.gap_top + o.gap_bottom) / 2.0)
                    .unwrap_or(300.0);
                let center = bird.pos.y + bird.size.y / 2.0;
                (center > target + 15.0 && bird.velocity >= 0.0).then_some(Intent::Flap)
            }
            GamePhase::Question => {
                let answer = world.quiz.current().map(|q| q.answer).unwrap_or(true);
                let answer = if questions_seen % WRONG_EVERY == 0 { !answer } else { answer };
                Some(if answer { Intent::AnswerYes } else { Intent::AnswerNo })
            }
            GamePhase::WrongAnswer => Some(Intent::AcknowledgeWrong),
            GamePhase::Countdown | GamePhase::Over | GamePhase::FinalOver => None,
        }
    }

    pub fn run(config: GameConfig, quiz: QuizGate, ticks: u32) {
        let world = World::new(0x5EED, config, quiz);
        let mut driver = GameDriver::new(world, HeadlessSurface::default(), LogAnalytics);
        let mut questions_seen = 0;
        let mut runs = 0;

        for _ in 0..ticks {
            if let Some(intent) = choose(driver.world(), questions_seen) {
                driver.handle(intent);
            }
            for event in driver.step() {
                match event {
                    GameEvent::QuestionShown { index } => {
                        questions_seen += 1;
                        log::debug!("Question #{} shown", index);
                    }
                    GameEvent::FinalScore { score } => {
                        runs += 1;
                        log::info!("Run {} ended with score {}", runs, score);
                    }
                    _ => {}
                }
            }
            if driver.world().phase == GamePhase::FinalOver {
                driver.handle(Intent::Restart);
            }
        }

        log::info!(
            "Headless run finished: {} frames, {} completed runs, {} questions, best {:?}",
            driver.surface().frames,
            runs,
            questions_seen,
            driver.high_scores().top_score()
        );
    }
}
