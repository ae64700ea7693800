//! Game states and the contract they implement.
//!
//! A state is one screen of the game: the splash, a menu, a map, a battle.
//! States are driven by the game loop through a uniform trait and talk back
//! exclusively through the event bus; none of them knows the stack exists.

mod battle;
mod map;
mod menu;
mod splash;

pub use battle::BattleScene;
pub use map::MapState;
pub use menu::{LoadMenuState, MainMenuState};
pub use splash::SplashState;

use jrpg_core::{BattleOutcome, BattleRewards, EncounterId, GameEnv, MapId, NpcKind, WorldKind};

use crate::event::EventBus;
use crate::input::InputEvent;
use crate::render::Surface;
use crate::session::Session;

/// Which state a stack entry is; used for dispatch-free introspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum StateKind {
    Splash,
    MainMenu,
    LoadMenu,
    Map,
    Battle,
}

/// Construction arguments for a map state.
#[derive(Clone, Debug, PartialEq)]
pub struct MapArgs {
    pub map: MapId,
    pub world: WorldKind,
    pub x: i32,
    pub y: i32,
}

/// Construction arguments for a battle.
#[derive(Clone, Debug, PartialEq)]
pub struct BattleArgs {
    pub party: Vec<NpcKind>,
    pub background: String,
    pub encounter: Option<EncounterId>,
}

/// What a state asks the game loop to put on top of it.
#[derive(Clone, Debug, PartialEq)]
pub enum StateTarget {
    MainMenu,
    LoadMenu,
    Map(MapArgs),
    Battle(BattleArgs),
}

/// Result of a finished battle, delivered to the state underneath.
#[derive(Clone, Debug, PartialEq)]
pub struct BattleCallback {
    pub outcome: BattleOutcome,
    pub rewards: BattleRewards,
    pub encounter: Option<EncounterId>,
}

/// Typed payload delivered to the revealed state when the one above exits.
#[derive(Clone, Debug, PartialEq)]
pub enum Callback {
    /// Plain dismissal; nothing to hand back.
    None,
    Battle(BattleCallback),
}

/// Serializable image of one stack entry.
///
/// Saving serializes the whole stack as a snapshot list; loading rebuilds
/// each state from its snapshot, re-resolving everything that does not
/// persist (map definitions, menus, the battle log). The battle variant
/// carries the full machine, so a mid-battle save resumes where it stood.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StateSnapshot {
    Splash,
    MainMenu,
    LoadMenu,
    Map {
        map: MapId,
        world: WorldKind,
        x: i32,
        y: i32,
    },
    Battle(jrpg_core::BattleModel),
}

/// Everything a state may touch during one call: the bus for transition
/// requests, the session for game data, and the read-only environment.
pub struct StateContext<'a> {
    pub bus: &'a mut EventBus,
    pub session: &'a mut Session,
    pub env: GameEnv<'a>,
}

/// One screen of the game, owned by the state stack.
pub trait State {
    fn kind(&self) -> StateKind;

    /// Reacts to one input event. Only the top of the stack receives input.
    fn handle_input(&mut self, input: &InputEvent, ctx: &mut StateContext<'_>);

    /// Advances the state by one frame of `dt_ms` milliseconds.
    fn update(&mut self, dt_ms: u32, ctx: &mut StateContext<'_>);

    /// Describes the frame. Only the top of the stack draws; overlays
    /// within a screen are the state's own windows.
    fn draw(&self, surface: &mut dyn Surface);

    /// Called when another state is pushed on top.
    fn on_pause(&mut self) {}

    /// Called when this state becomes the top again.
    fn on_resume(&mut self) {}

    /// Receives the callback of the state that just exited above this one.
    ///
    /// Runs after `on_resume`. Must be idempotent for `Callback::None`.
    fn on_return(&mut self, callback: Callback, ctx: &mut StateContext<'_>) {
        let _ = (callback, ctx);
    }

    /// Serializable image of this state for the save file.
    fn snapshot(&self) -> StateSnapshot;
}
