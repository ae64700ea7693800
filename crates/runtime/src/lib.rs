//! Engine runtime: the state stack, the frame loop, and their collaborators.
//!
//! `jrpg-runtime` layers screen management on top of the pure rules in
//! `jrpg-core`. The pieces:
//! - [`game`] hosts the loop that owns everything and applies transitions
//! - [`stack`] is the state stack with its push/pop/reset discipline
//! - [`state`] holds the state contract and the four concrete screens
//! - [`event`] carries transition requests from states to the loop
//! - [`repository`] persists save slots, [`settings`] backs the settings
//!   oracle, [`render`] and [`ui`] are the drawing seam and widget kit
pub mod error;
pub mod event;
pub mod game;
pub mod input;
pub mod render;
pub mod repository;
pub mod session;
pub mod settings;
pub mod stack;
pub mod state;
pub mod ui;

pub use error::{EngineError, Result};
pub use event::{EngineEvent, EventBus};
pub use game::{Game, Oracles};
pub use input::{Button, InputEvent};
pub use render::{NullSurface, RecordingSurface, Surface};
pub use repository::{FileSaveRepository, MemorySaveRepository, RepositoryError, SaveGame, SaveRepository};
pub use session::Session;
pub use stack::StateStack;
pub use state::{
    BattleArgs, BattleCallback, BattleScene, Callback, LoadMenuState, MainMenuState, MapArgs,
    MapState, SplashState, State, StateContext, StateKind, StateSnapshot, StateTarget,
};
pub use ui::{Menu, Window};
