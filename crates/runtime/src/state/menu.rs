//! Main menu and load menu.

use jrpg_core::{MapId, Rect, StringsOracle, WorldKind};

use crate::event::EngineEvent;
use crate::input::{Button, InputEvent};
use crate::render::Surface;
use crate::session::Session;
use crate::state::{
    Callback, MapArgs, State, StateContext, StateKind, StateSnapshot, StateTarget,
};
use crate::ui::{Menu, Window};

fn menu_from_resource(
    strings: Option<&dyn StringsOracle>,
    resource: &str,
    fallback: &[(&str, &str)],
) -> Menu {
    let entries = strings
        .and_then(|s| s.strings(resource))
        .unwrap_or_else(|| {
            fallback
                .iter()
                .map(|(id, label)| (id.to_string(), label.to_string()))
                .collect()
        });
    Menu::new(entries)
}

fn overworld_start() -> MapArgs {
    MapArgs {
        map: MapId::new(jrpg_content::maps::OVERWORLD),
        world: WorldKind::Overworld,
        x: jrpg_content::maps::START_X,
        y: jrpg_content::maps::START_Y,
    }
}

/// New game / load game / exit.
pub struct MainMenuState {
    window: Window,
}

impl MainMenuState {
    pub fn new(ctx: &StateContext<'_>) -> Self {
        let menu = menu_from_resource(
            ctx.env.strings().ok(),
            "main_menu",
            &[("new_game", "New game"), ("load_game", "Load game"), ("exit", "Exit")],
        );
        Self {
            window: Window::new(Rect::new(300, 220, 200, 140), "Main menu").with_menu(menu),
        }
    }
}

impl State for MainMenuState {
    fn kind(&self) -> StateKind {
        StateKind::MainMenu
    }

    fn handle_input(&mut self, input: &InputEvent, ctx: &mut StateContext<'_>) {
        if let InputEvent::Quit = input {
            ctx.bus.publish(EngineEvent::Quit);
            return;
        }
        let menu = self.window.menu.as_mut().expect("main menu has a menu");
        menu.navigate(input);
        match input {
            InputEvent::Press(Button::Confirm) => match menu.selected_id() {
                "new_game" => {
                    // Fresh party and a new seed derived from the old one.
                    let seed = ctx.session.game_seed.wrapping_add(1);
                    *ctx.session = Session::new_game(ctx.session.config, seed);
                    ctx.bus
                        .publish(EngineEvent::CallState(StateTarget::Map(overworld_start())));
                }
                "load_game" => {
                    ctx.bus.publish(EngineEvent::CallState(StateTarget::LoadMenu));
                }
                "exit" => ctx.bus.publish(EngineEvent::Quit),
                other => tracing::warn!(id = other, "unknown main menu entry"),
            },
            InputEvent::Press(Button::Cancel) => {
                ctx.bus.publish(EngineEvent::ExitState(Callback::None));
            }
            _ => {}
        }
    }

    fn update(&mut self, _dt_ms: u32, _ctx: &mut StateContext<'_>) {}

    fn draw(&self, surface: &mut dyn Surface) {
        surface.clear("menu");
        self.window.draw(surface);
    }

    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::MainMenu
    }
}

/// Save-slot picker, pushed by the main menu.
pub struct LoadMenuState {
    window: Window,
}

impl LoadMenuState {
    pub fn new(ctx: &StateContext<'_>) -> Self {
        let menu = menu_from_resource(
            ctx.env.strings().ok(),
            "load_menu",
            &[
                ("slot_1", "Slot 1"),
                ("slot_2", "Slot 2"),
                ("slot_3", "Slot 3"),
                ("back", "Back"),
            ],
        );
        Self {
            window: Window::new(Rect::new(300, 220, 200, 160), "Load game").with_menu(menu),
        }
    }
}

impl State for LoadMenuState {
    fn kind(&self) -> StateKind {
        StateKind::LoadMenu
    }

    fn handle_input(&mut self, input: &InputEvent, ctx: &mut StateContext<'_>) {
        if let InputEvent::Quit = input {
            ctx.bus.publish(EngineEvent::Quit);
            return;
        }
        let menu = self.window.menu.as_mut().expect("load menu has a menu");
        menu.navigate(input);
        match input {
            InputEvent::Press(Button::Confirm) => match menu.selected_id() {
                "back" => ctx.bus.publish(EngineEvent::ExitState(Callback::None)),
                id => match id.strip_prefix("slot_").and_then(|n| n.parse::<u8>().ok()) {
                    Some(slot) => ctx.bus.publish(EngineEvent::LoadGame { slot }),
                    None => tracing::warn!(id, "unknown load menu entry"),
                },
            },
            InputEvent::Press(Button::Cancel) => {
                ctx.bus.publish(EngineEvent::ExitState(Callback::None));
            }
            _ => {}
        }
    }

    fn update(&mut self, _dt_ms: u32, _ctx: &mut StateContext<'_>) {}

    fn draw(&self, surface: &mut dyn Surface) {
        surface.clear("menu");
        self.window.draw(surface);
    }

    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::LoadMenu
    }
}
