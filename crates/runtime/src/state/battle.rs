//! Battle presentation: windows, cursors, and pacing around the battle
//! machine. All rules live in the model; this state only translates input
//! into commands and events into text.

use std::collections::VecDeque;

use strum::IntoEnumIterator;

use jrpg_core::{
    BattleAction, BattleCommand, BattleEvent, BattleModel, BattleOutcome, BattlePhase, Combatant,
    PlayerParty, Rect, Side,
};

use crate::error::Result;
use crate::event::EngineEvent;
use crate::input::{Button, InputEvent};
use crate::render::Surface;
use crate::state::{
    BattleArgs, BattleCallback, Callback, State, StateContext, StateKind, StateSnapshot,
};
use crate::ui::{Menu, Window};

/// Status lines kept on screen.
const LOG_LINES: usize = 5;
/// Pause on the final status line before leaving the battle.
const EXIT_DELAY_MS: u32 = 1200;

pub struct BattleScene {
    model: BattleModel,
    /// Active selection menu, rebuilt on every phase change.
    menu: Option<Menu>,
    /// Cursor position to inventory index, for the item window.
    item_indices: Vec<usize>,
    /// Party status lines mirrored for drawing.
    party_lines: Vec<String>,
    log: VecDeque<String>,
    npc_delay_ms: u32,
    exit_delay_ms: Option<u32>,
    done: bool,
}

impl BattleScene {
    pub fn new(args: &BattleArgs, ctx: &StateContext<'_>) -> Result<Self> {
        let model = BattleModel::new(
            &args.party,
            args.background.clone(),
            args.encounter,
            &ctx.session.party,
            &ctx.env,
            ctx.session.game_seed,
        )?;
        let mut scene = Self::from_model(model, ctx);
        scene.push_log("A battle begins!".to_string());
        scene.sync(&ctx.session.party);
        Ok(scene)
    }

    /// Rebuilds a scene around a deserialized machine after a load. The
    /// log, menus, and timers do not persist; they are reconstructed here.
    pub fn resume(model: BattleModel, ctx: &StateContext<'_>) -> Self {
        let mut scene = Self::from_model(model, ctx);
        scene.push_log("The battle resumes!".to_string());
        scene.sync(&ctx.session.party);
        scene
    }

    fn from_model(model: BattleModel, ctx: &StateContext<'_>) -> Self {
        // A machine that is already finished goes straight to the exit.
        let exit_delay_ms = model.outcome().map(|_| 0);
        Self {
            model,
            menu: None,
            item_indices: Vec::new(),
            party_lines: Vec::new(),
            log: VecDeque::new(),
            npc_delay_ms: ctx.session.config.npc_turn_delay_ms,
            exit_delay_ms,
            done: false,
        }
    }

    fn push_log(&mut self, line: String) {
        if self.log.len() == LOG_LINES {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }

    /// Rebuilds the menu and mirrored party lines after any model change.
    fn sync(&mut self, party: &PlayerParty) {
        self.party_lines = party
            .members()
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let marker = if i == self.model.current_member()
                    && !matches!(self.model.phase(), BattlePhase::NpcTurn)
                {
                    "> "
                } else {
                    "  "
                };
                format!(
                    "{marker}{} HP {}/{} MP {}/{}",
                    m.name(),
                    m.hp(),
                    m.max_hp(),
                    m.mp(),
                    m.max_mp()
                )
            })
            .collect();

        self.menu = match self.model.phase() {
            BattlePhase::ChoosingAction => Some(Menu::from_labels(BattleAction::iter())),
            BattlePhase::SelectingSpell => {
                let member = party.member(self.model.current_member());
                Some(Menu::from_labels(member.spells()))
            }
            BattlePhase::SelectingItem => {
                self.item_indices = party.any_usable_indices();
                Some(Menu::from_labels(
                    self.item_indices.iter().map(|&i| &party.inventory[i]),
                ))
            }
            BattlePhase::SelectingTarget => match self.model.pending_target_side(party) {
                Some(Side::Npc) => Some(Menu::from_labels(
                    self.model.npcs().iter().map(|n| n.name().to_string()),
                )),
                Some(Side::Player) => Some(Menu::from_labels(
                    party.members().iter().map(|m| m.name().to_string()),
                )),
                None => None,
            },
            BattlePhase::NpcTurn | BattlePhase::Finished(_) => None,
        };
    }

    fn apply_events(&mut self, events: Vec<BattleEvent>) {
        for event in events {
            match event {
                BattleEvent::Status(line) => self.push_log(line),
                BattleEvent::Finished(_) => self.exit_delay_ms = Some(EXIT_DELAY_MS),
                _ => {}
            }
        }
    }

    fn dispatch(&mut self, command: BattleCommand, ctx: &mut StateContext<'_>) {
        match self.model.command(command, &mut ctx.session.party) {
            Ok(events) => self.apply_events(events),
            Err(err) => tracing::warn!(%err, ?command, "battle command rejected"),
        }
        self.sync(&ctx.session.party);
    }

    /// The command a Confirm press means right now.
    fn confirm_command(&self) -> Option<BattleCommand> {
        let cursor = self.menu.as_ref()?.cursor();
        match self.model.phase() {
            BattlePhase::ChoosingAction => {
                BattleAction::iter().nth(cursor).map(BattleCommand::ChooseAction)
            }
            BattlePhase::SelectingSpell => Some(BattleCommand::ChooseSpell(cursor)),
            BattlePhase::SelectingItem => {
                self.item_indices.get(cursor).map(|&i| BattleCommand::ChooseItem(i))
            }
            BattlePhase::SelectingTarget => Some(BattleCommand::ChooseTarget(cursor)),
            BattlePhase::NpcTurn | BattlePhase::Finished(_) => None,
        }
    }

    /// Publishes the terminal transition exactly once.
    fn leave(&mut self, outcome: BattleOutcome, ctx: &mut StateContext<'_>) {
        if self.done {
            return;
        }
        self.done = true;
        match outcome {
            BattleOutcome::Won | BattleOutcome::Fled => {
                ctx.bus
                    .publish(EngineEvent::ExitState(Callback::Battle(BattleCallback {
                        outcome,
                        rewards: self.model.rewards().clone(),
                        encounter: self.model.encounter(),
                    })));
            }
            BattleOutcome::GameOver => ctx.bus.publish(EngineEvent::ResetStack),
        }
    }
}

impl State for BattleScene {
    fn kind(&self) -> StateKind {
        StateKind::Battle
    }

    fn handle_input(&mut self, input: &InputEvent, ctx: &mut StateContext<'_>) {
        if let InputEvent::Quit = input {
            ctx.bus.publish(EngineEvent::Quit);
            return;
        }
        if self.exit_delay_ms.is_some() {
            // Confirm skips the read delay on the final line.
            if matches!(input, InputEvent::Press(Button::Confirm)) {
                self.exit_delay_ms = Some(0);
            }
            return;
        }

        if let Some(menu) = &mut self.menu {
            menu.navigate(input);
        }
        match input {
            InputEvent::Press(Button::Confirm) => {
                if let Some(command) = self.confirm_command() {
                    self.dispatch(command, ctx);
                }
            }
            InputEvent::Press(Button::Cancel) => self.dispatch(BattleCommand::Cancel, ctx),
            _ => {}
        }
    }

    fn update(&mut self, dt_ms: u32, ctx: &mut StateContext<'_>) {
        if let Some(delay) = self.exit_delay_ms {
            let remaining = delay.saturating_sub(dt_ms);
            self.exit_delay_ms = Some(remaining);
            if remaining == 0
                && let Some(outcome) = self.model.outcome()
            {
                self.leave(outcome, ctx);
            }
            return;
        }

        if self.model.phase() == BattlePhase::NpcTurn {
            self.npc_delay_ms = self.npc_delay_ms.saturating_sub(dt_ms);
            if self.npc_delay_ms == 0 {
                let env = ctx.env;
                match self.model.step_npc(&mut ctx.session.party, &env) {
                    Ok(events) => self.apply_events(events),
                    Err(err) => tracing::error!(%err, "npc step failed"),
                }
                self.npc_delay_ms = ctx.session.config.npc_turn_delay_ms;
                self.sync(&ctx.session.party);
            }
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.clear(self.model.background());

        let npc_lines = self
            .model
            .npcs()
            .iter()
            .map(|n| format!("{} HP {}/{}", n.name(), n.hp(), n.max_hp()))
            .collect();
        Window::new(Rect::new(20, 20, 280, 140), "Enemies")
            .with_lines(npc_lines)
            .draw(surface);

        Window::new(Rect::new(20, 420, 360, 160), "Party")
            .with_lines(self.party_lines.clone())
            .draw(surface);

        let mut log_window = Window::new(Rect::new(400, 420, 380, 160), "")
            .with_lines(self.log.iter().cloned().collect());
        if let Some(menu) = &self.menu {
            log_window = log_window.with_menu(menu.clone());
        }
        log_window.draw(surface);
    }

    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::Battle(self.model.clone())
    }
}
