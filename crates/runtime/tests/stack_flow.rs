//! Stack discipline and menu-driven state flow.

use std::cell::RefCell;
use std::rc::Rc;

use jrpg_core::{Env, GameConfig};
use jrpg_runtime::{
    Button, Callback, EventBus, Game, InputEvent, MemorySaveRepository, Oracles, Session, State,
    StateContext, StateKind, StateSnapshot, StateStack,
};
use jrpg_runtime::render::Surface;
use jrpg_runtime::settings::MemorySettings;

/// Records lifecycle calls for assertions.
struct Probe {
    kind: StateKind,
    calls: Rc<RefCell<Vec<String>>>,
}

impl Probe {
    fn new(kind: StateKind, calls: Rc<RefCell<Vec<String>>>) -> Box<Self> {
        Box::new(Self { kind, calls })
    }

    fn record(&self, call: &str) {
        self.calls.borrow_mut().push(format!("{}:{call}", self.kind));
    }
}

impl State for Probe {
    fn kind(&self) -> StateKind {
        self.kind
    }

    fn handle_input(&mut self, _input: &InputEvent, _ctx: &mut StateContext<'_>) {}

    fn update(&mut self, _dt_ms: u32, _ctx: &mut StateContext<'_>) {}

    fn draw(&self, _surface: &mut dyn Surface) {}

    fn on_pause(&mut self) {
        self.record("pause");
    }

    fn on_resume(&mut self) {
        self.record("resume");
    }

    fn on_return(&mut self, callback: Callback, _ctx: &mut StateContext<'_>) {
        self.record(&format!("return:{callback:?}"));
    }

    // Lifecycle probe; never saved.
    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::Splash
    }
}

fn with_ctx(f: impl FnOnce(&mut StateContext<'_>)) {
    let mut bus = EventBus::new();
    let mut session = Session::new_game(GameConfig::default(), 1);
    let env = Env::empty();
    let mut ctx = StateContext {
        bus: &mut bus,
        session: &mut session,
        env,
    };
    f(&mut ctx);
}

#[test]
fn push_pauses_and_pop_resumes_with_callback() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut stack = StateStack::new(Probe::new(StateKind::Splash, Rc::clone(&calls)));
    stack.push(Probe::new(StateKind::MainMenu, Rc::clone(&calls)));

    with_ctx(|ctx| stack.pop(Callback::None, ctx));

    let calls = calls.borrow();
    assert_eq!(
        *calls,
        vec![
            "Splash:pause".to_string(),
            "Splash:resume".to_string(),
            "Splash:return:None".to_string(),
        ]
    );
    assert_eq!(stack.len(), 1);
}

#[test]
fn returning_none_twice_is_harmless() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut stack = StateStack::new(Probe::new(StateKind::Splash, Rc::clone(&calls)));
    stack.push(Probe::new(StateKind::Map, Rc::clone(&calls)));
    stack.push(Probe::new(StateKind::Battle, Rc::clone(&calls)));

    with_ctx(|ctx| {
        stack.pop(Callback::None, ctx);
        stack.top_mut().on_return(Callback::None, ctx);
    });
    assert_eq!(stack.len(), 2);
}

#[test]
#[should_panic(expected = "cannot pop the root state")]
fn popping_the_root_panics() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut stack = StateStack::new(Probe::new(StateKind::Splash, calls));
    with_ctx(|ctx| stack.pop(Callback::None, ctx));
}

#[test]
fn reset_drops_everything_above_the_root() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut stack = StateStack::new(Probe::new(StateKind::Splash, Rc::clone(&calls)));
    stack.push(Probe::new(StateKind::MainMenu, Rc::clone(&calls)));
    stack.push(Probe::new(StateKind::Map, Rc::clone(&calls)));

    stack.reset_to_root();
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.top().kind(), StateKind::Splash);
    assert!(calls.borrow().last().unwrap().contains("Splash:resume"));
}

fn new_game() -> Game {
    Game::new(
        Oracles::standard(Box::new(MemorySettings::new())),
        Box::new(MemorySaveRepository::new()),
        GameConfig::default(),
        7,
    )
}

#[test]
fn any_key_leaves_the_splash_screen() {
    let mut game = new_game();
    assert_eq!(game.active_state(), StateKind::Splash);

    game.handle_input(InputEvent::Press(Button::Confirm)).unwrap();
    assert_eq!(game.active_state(), StateKind::MainMenu);
    assert_eq!(game.stack_len(), 2);
}

#[test]
fn new_game_lands_on_the_overworld() {
    let mut game = new_game();
    game.handle_input(InputEvent::Press(Button::Confirm)).unwrap();
    // "New game" is the first main menu entry.
    game.handle_input(InputEvent::Press(Button::Confirm)).unwrap();

    assert_eq!(game.active_state(), StateKind::Map);
    assert_eq!(game.stack_len(), 3);
    assert!(game.session().party.all_alive());
}

#[test]
fn exit_entry_quits_the_game() {
    let mut game = new_game();
    game.handle_input(InputEvent::Press(Button::Confirm)).unwrap();
    assert!(game.is_running());

    game.handle_input(InputEvent::Press(Button::Up)).unwrap();
    game.handle_input(InputEvent::Press(Button::Confirm)).unwrap();
    assert!(!game.is_running());
}

#[test]
fn cancel_walks_back_from_the_main_menu() {
    let mut game = new_game();
    game.handle_input(InputEvent::Press(Button::Confirm)).unwrap();
    assert_eq!(game.active_state(), StateKind::MainMenu);

    game.handle_input(InputEvent::Press(Button::Cancel)).unwrap();
    assert_eq!(game.active_state(), StateKind::Splash);
    assert_eq!(game.stack_len(), 1);
}
