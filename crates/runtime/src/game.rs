//! The game loop: owns the stack, the session, and every collaborator.

use jrpg_core::{
    Env, GameConfig, GameEnv, MapOracle, NpcOracle, PcgRng, RngOracle, SettingsOracle,
    StringsOracle,
};

use crate::error::Result;
use crate::event::{EngineEvent, EventBus};
use crate::input::InputEvent;
use crate::render::Surface;
use crate::repository::{SaveGame, SaveRepository};
use crate::session::Session;
use crate::stack::StateStack;
use crate::state::{
    BattleScene, LoadMenuState, MainMenuState, MapArgs, MapState, SplashState, State, StateContext,
    StateKind, StateSnapshot, StateTarget,
};

/// The boxed oracle set the game reads the world through.
pub struct Oracles {
    pub map: Box<dyn MapOracle>,
    pub strings: Box<dyn StringsOracle>,
    pub settings: Box<dyn SettingsOracle>,
    pub npcs: Box<dyn NpcOracle>,
    pub rng: Box<dyn RngOracle>,
}

impl Oracles {
    /// The standard wiring: built-in content plus the caller's settings.
    pub fn standard(settings: Box<dyn SettingsOracle>) -> Self {
        Self {
            map: Box::new(jrpg_content::WorldAtlas::new()),
            strings: Box::new(jrpg_content::EnglishStrings::new()),
            settings,
            npcs: Box::new(jrpg_content::NpcRegistry::new()),
            rng: Box::new(PcgRng),
        }
    }

    fn env(&self) -> GameEnv<'_> {
        Env::with_all(
            self.map.as_ref(),
            self.strings.as_ref(),
            self.settings.as_ref(),
            self.npcs.as_ref(),
            self.rng.as_ref(),
        )
    }
}

/// Top-level engine object. The embedder owns the frame clock and the
/// input backend; each frame it forwards inputs, calls [`Game::update`],
/// and draws onto whatever surface it has.
pub struct Game {
    oracles: Oracles,
    saves: Box<dyn SaveRepository>,
    bus: EventBus,
    session: Session,
    stack: StateStack,
    running: bool,
}

impl Game {
    pub fn new(
        oracles: Oracles,
        saves: Box<dyn SaveRepository>,
        config: GameConfig,
        game_seed: u64,
    ) -> Self {
        Self {
            oracles,
            saves,
            bus: EventBus::new(),
            session: Session::new_game(config, game_seed),
            stack: StateStack::new(Box::new(SplashState::new())),
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    /// Kind of the state currently receiving input.
    pub fn active_state(&self) -> StateKind {
        self.stack.top().kind()
    }

    /// Forwards one input event to the top state and applies whatever
    /// transitions it requested.
    pub fn handle_input(&mut self, input: InputEvent) -> Result<()> {
        let env = self.oracles.env();
        let mut ctx = StateContext {
            bus: &mut self.bus,
            session: &mut self.session,
            env,
        };
        self.stack.top_mut().handle_input(&input, &mut ctx);
        self.process_events()
    }

    /// Advances the top state by one frame and applies transitions.
    pub fn update(&mut self, dt_ms: u32) -> Result<()> {
        let env = self.oracles.env();
        let mut ctx = StateContext {
            bus: &mut self.bus,
            session: &mut self.session,
            env,
        };
        self.stack.top_mut().update(dt_ms, &mut ctx);
        self.process_events()
    }

    /// One frame: inputs, then update. Convenience for embedders and tests.
    pub fn tick(&mut self, dt_ms: u32, inputs: &[InputEvent]) -> Result<()> {
        for input in inputs {
            self.handle_input(*input)?;
        }
        self.update(dt_ms)
    }

    /// Draws the active state.
    pub fn draw(&self, surface: &mut dyn Surface) {
        self.stack.top().draw(surface);
    }

    fn process_events(&mut self) -> Result<()> {
        while let Some(event) = self.bus.pop() {
            match event {
                EngineEvent::CallState(target) => {
                    let state = self.build_state(&target)?;
                    self.stack.push(state);
                }
                EngineEvent::ExitState(callback) => {
                    let env = self.oracles.env();
                    let mut ctx = StateContext {
                        bus: &mut self.bus,
                        session: &mut self.session,
                        env,
                    };
                    self.stack.pop(callback, &mut ctx);
                }
                EngineEvent::ResetStack => self.stack.reset_to_root(),
                EngineEvent::SaveGame { slot } => self.save_game(slot),
                EngineEvent::LoadGame { slot } => self.load_game(slot),
                EngineEvent::Quit => self.running = false,
            }
        }
        Ok(())
    }

    fn build_state(&mut self, target: &StateTarget) -> Result<Box<dyn State>> {
        let env = self.oracles.env();
        let ctx = StateContext {
            bus: &mut self.bus,
            session: &mut self.session,
            env,
        };
        Ok(match target {
            StateTarget::MainMenu => Box::new(MainMenuState::new(&ctx)),
            StateTarget::LoadMenu => Box::new(LoadMenuState::new(&ctx)),
            StateTarget::Map(args) => Box::new(MapState::new(args, &ctx)?),
            StateTarget::Battle(args) => Box::new(BattleScene::new(args, &ctx)?),
        })
    }

    /// Persists the session and a snapshot of the whole stack, battle
    /// included. A failed save is reported and swallowed; it never ends
    /// the game.
    fn save_game(&mut self, slot: u8) {
        let save = SaveGame {
            party: self.session.party.clone(),
            game_seed: self.session.game_seed,
            stack: self.stack.iter().map(|s| s.snapshot()).collect(),
        };
        if let Err(err) = self.saves.save(slot, &save) {
            tracing::error!(%err, slot, "saving failed");
        }
    }

    /// Replaces the session and stack from a slot. Any failure, from a
    /// missing slot to an unknown map in a stale save, leaves the current
    /// game untouched.
    fn load_game(&mut self, slot: u8) {
        let save = match self.saves.load(slot) {
            Ok(save) if !save.stack.is_empty() => save,
            Ok(_) => {
                tracing::warn!(slot, "save has an empty stack; keeping current game");
                return;
            }
            Err(err) => {
                tracing::warn!(%err, slot, "loading failed; keeping current game");
                return;
            }
        };

        // Rebuilt states read the loaded session (party lines, spell
        // menus), so swap it in first and roll back if a rebuild fails.
        let old_party = std::mem::replace(&mut self.session.party, save.party);
        let old_seed = std::mem::replace(&mut self.session.game_seed, save.game_seed);

        let states: Result<Vec<_>> = save
            .stack
            .into_iter()
            .map(|snapshot| self.build_from_snapshot(snapshot))
            .collect();
        match states {
            Ok(states) => self.stack.restore(states),
            Err(err) => {
                tracing::warn!(%err, slot, "save did not rebuild; keeping current game");
                self.session.party = old_party;
                self.session.game_seed = old_seed;
            }
        }
    }

    fn build_from_snapshot(&mut self, snapshot: StateSnapshot) -> Result<Box<dyn State>> {
        let env = self.oracles.env();
        let ctx = StateContext {
            bus: &mut self.bus,
            session: &mut self.session,
            env,
        };
        Ok(match snapshot {
            StateSnapshot::Splash => Box::new(SplashState::new()),
            StateSnapshot::MainMenu => Box::new(MainMenuState::new(&ctx)),
            StateSnapshot::LoadMenu => Box::new(LoadMenuState::new(&ctx)),
            StateSnapshot::Map { map, world, x, y } => {
                Box::new(MapState::new(&MapArgs { map, world, x, y }, &ctx)?)
            }
            StateSnapshot::Battle(model) => Box::new(BattleScene::resume(model, &ctx)),
        })
    }
}
