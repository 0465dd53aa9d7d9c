//! Dungeon Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use dungeon_dash::anim::AnimState;
    use dungeon_dash::renderer::RenderState;
    use dungeon_dash::sim::{
        dungeon_level, tick, GameEvent, GameState, RenderSnapshot, TickInput,
    };

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        anim: AnimState,
        /// Held-key set, updated by keydown/keyup between frames
        input: TickInput,
        win_shown: bool,
    }

    impl Game {
        fn new() -> Self {
            let state = GameState::new(dungeon_level());
            let anim = AnimState::new(state.bats.len());
            Self {
                state,
                render_state: None,
                anim,
                input: TickInput::default(),
                win_shown: false,
            }
        }

        /// One frame: one simulation tick, then draw
        fn frame(&mut self) {
            let input = self.input;
            tick(&mut self.state, &input);

            let snap = RenderSnapshot::capture(&self.state);
            self.anim.advance(&snap, &self.state.events);

            for event in &self.state.events {
                match event {
                    GameEvent::Won => self.set_win_message(true),
                    GameEvent::Respawned(_) => self.set_win_message(false),
                    GameEvent::Landed { .. } => {}
                }
            }

            if let Some(ref mut render_state) = self.render_state {
                render_state.render(&snap, &self.anim);
            }
        }

        /// Toggle the "You Win" DOM affordance; the celebration effect
        /// itself is owned by the page, not the game core
        fn set_win_message(&mut self, visible: bool) {
            if self.win_shown == visible {
                return;
            }
            self.win_shown = visible;
            let display = if visible { "block" } else { "none" };
            if let Some(el) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("message"))
                .and_then(|e| e.dyn_into::<web_sys::HtmlElement>().ok())
            {
                let _ = el.style().set_property("display", display);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Dungeon Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let game = Rc::new(RefCell::new(Game::new()));

        let seed = js_sys::Date::now() as u64;
        let render_state =
            RenderState::new(&canvas, seed).expect("Failed to create 2d renderer");
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(game.clone());
        request_animation_frame(game);

        log::info!("Dungeon Dash running!");
    }

    /// Map a key name onto the held-button set
    fn apply_key(input: &mut dungeon_dash::sim::TickInput, key: &str, down: bool) {
        match key {
            "a" | "A" | "ArrowLeft" => input.left = down,
            "d" | "D" | "ArrowRight" => input.right = down,
            "w" | "W" | "ArrowUp" | " " => input.jump = down,
            _ => {}
        }
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                apply_key(&mut game.borrow_mut().input, &event.key(), true);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                apply_key(&mut game.borrow_mut().input, &event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game.borrow_mut().frame();
            request_animation_frame(game.clone());
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
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
    use dungeon_dash::sim::{dungeon_level, tick, GameState, TickInput};

    env_logger::init();
    log::info!("Dungeon Dash (native) starting...");
    log::info!("Run the web build for the playable game; native mode does a headless demo run.");

    // Headless smoke run: fall onto the spawn platform, then walk right
    // for a while and report where the player ends up.
    let mut state = GameState::new(dungeon_level());
    for _ in 0..60 {
        tick(&mut state, &TickInput::default());
    }
    assert!(!state.player.airborne, "player should be standing after freefall");

    let right = TickInput { right: true, ..TickInput::default() };
    for _ in 0..240 {
        tick(&mut state, &right);
    }
    println!(
        "after 300 ticks: player at ({:.1}, {:.1}), airborne={}, won={}",
        state.player.pos.x,
        state.player.pos.y,
        state.player.airborne,
        state.won()
    );
}
