//! Exploration state: avatar movement, teleports, spawns, and the pause
//! and shop overlays.

use std::collections::HashSet;

use jrpg_core::{BattleOutcome, Item, MapDefinition, Rect, Spell, SpawnKind, StringsOracle};

use crate::error::{EngineError, Result};
use crate::event::EngineEvent;
use crate::input::{Button, InputEvent};
use crate::render::Surface;
use crate::state::{
    BattleArgs, BattleCallback, Callback, MapArgs, State, StateContext, StateKind, StateSnapshot,
    StateTarget,
};
use crate::ui::{Menu, Window};

const AVATAR_SIZE: u32 = 32;
/// Avatar speed in pixels per second.
const MOVE_SPEED: u32 = 200;
/// Encounter triggers stay disarmed this long after returning from battle,
/// so fleeing does not immediately restart the same fight.
const BATTLE_GRACE_MS: u32 = 1000;
/// How far beyond its rectangle an NPC can be talked to.
const TALK_REACH: i32 = 12;

enum Overlay {
    Pause(Menu),
    Shop(ShopWindow),
}

enum ShopStock {
    Items(Vec<Item>),
    Spells(Vec<Spell>),
}

/// Trader or wizard goods window. Lives inside the map state; shops are
/// overlays, not stack entries.
struct ShopWindow {
    title: &'static str,
    greeting: String,
    stock: ShopStock,
    menu: Menu,
    message: Option<String>,
    /// Party gold mirrored for drawing; refreshed on every purchase.
    gold: u32,
}

impl ShopWindow {
    fn trader(strings: Option<&dyn StringsOracle>, gold: u32) -> Self {
        let stock = jrpg_content::items::trader_stock();
        Self {
            title: "Trader",
            greeting: greeting_line(strings, "trader_greeting", "Have a look at my wares!"),
            menu: Menu::from_labels(&stock),
            stock: ShopStock::Items(stock),
            message: None,
            gold,
        }
    }

    fn wizard(strings: Option<&dyn StringsOracle>, gold: u32) -> Self {
        let stock = jrpg_content::spells::wizard_stock();
        Self {
            title: "Wizard",
            greeting: greeting_line(strings, "wizard_greeting", "Knowledge has its price."),
            menu: Menu::from_labels(&stock),
            stock: ShopStock::Spells(stock),
            message: None,
            gold,
        }
    }

    /// Attempts to buy the selected entry from the session's gold.
    fn buy(&mut self, ctx: &mut StateContext<'_>) {
        let index = self.menu.cursor();
        let party = &mut ctx.session.party;
        match &self.stock {
            ShopStock::Items(items) => {
                let item = &items[index];
                if party.gold < item.cost {
                    self.message = Some("Not enough gold".into());
                    return;
                }
                party.gold -= item.cost;
                party.add_items([item.clone()]);
                self.message = Some(format!("Bought {}", item.name));
            }
            ShopStock::Spells(spells) => {
                let spell = &spells[index];
                let known = spell
                    .class
                    .and_then(|class| party.member_of_class(class))
                    .is_some_and(|m| m.spells().iter().any(|s| s.name == spell.name));
                if known {
                    self.message = Some(format!("{} is already known", spell.name));
                    return;
                }
                if party.gold < spell.cost {
                    self.message = Some("Not enough gold".into());
                    return;
                }
                party.gold -= spell.cost;
                party.learn_spell(spell.clone());
                self.message = Some(format!("Learned {}", spell.name));
            }
        }
        self.gold = party.gold;
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let mut lines = vec![self.greeting.clone(), format!("Gold: {} G", self.gold)];
        if let Some(message) = &self.message {
            lines.push(message.clone());
        }
        Window::new(Rect::new(220, 140, 360, 280), self.title)
            .with_lines(lines)
            .with_menu(self.menu.clone())
            .draw(surface);
    }
}

fn greeting_line(
    strings: Option<&dyn StringsOracle>,
    resource: &str,
    fallback: &str,
) -> String {
    strings
        .and_then(|s| s.strings(resource))
        .and_then(|table| table.into_iter().next())
        .map(|(_, line)| line)
        .unwrap_or_else(|| fallback.to_string())
}

/// One map on screen, overworld or local. Same-world teleports relocate
/// this state in place; crossing worlds swaps in the sibling map variant
/// through the stack.
pub struct MapState {
    def: MapDefinition,
    avatar: Rect,
    pressed: HashSet<Button>,
    overlay: Option<Overlay>,
    grace_ms: u32,
}

impl MapState {
    pub fn new(args: &MapArgs, ctx: &StateContext<'_>) -> Result<Self> {
        let def = ctx
            .env
            .map()?
            .map(&args.map)
            .ok_or_else(|| EngineError::UnknownMap(args.map.clone()))?;
        Ok(Self {
            def,
            avatar: Rect::new(args.x, args.y, AVATAR_SIZE, AVATAR_SIZE),
            pressed: HashSet::new(),
            overlay: None,
            grace_ms: 0,
        })
    }

    fn axis_input(&self, negative: Button, positive: Button) -> i32 {
        i32::from(self.pressed.contains(&positive)) - i32::from(self.pressed.contains(&negative))
    }

    /// Moves one axis and resolves collisions against map geometry.
    fn move_axis(&mut self, dx: i32, dy: i32) {
        debug_assert!(dx == 0 || dy == 0);
        if dx == 0 && dy == 0 {
            return;
        }
        self.avatar.x += dx;
        self.avatar.y += dy;

        for collider in &self.def.colliders {
            if self.avatar.intersects(collider) {
                if dx > 0 {
                    self.avatar.x = collider.x - self.avatar.w as i32;
                } else if dx < 0 {
                    self.avatar.x = collider.right();
                }
                if dy > 0 {
                    self.avatar.y = collider.y - self.avatar.h as i32;
                } else if dy < 0 {
                    self.avatar.y = collider.bottom();
                }
            }
        }

        let bounds = self.def.bounds;
        self.avatar.x = self
            .avatar
            .x
            .clamp(bounds.x, bounds.right() - self.avatar.w as i32);
        self.avatar.y = self
            .avatar
            .y
            .clamp(bounds.y, bounds.bottom() - self.avatar.h as i32);
    }

    /// Applies the first teleport whose trigger the avatar touches.
    fn check_teleports(&mut self, ctx: &mut StateContext<'_>) {
        let Some(teleport) = self
            .def
            .teleports
            .iter()
            .find(|t| self.avatar.intersects(&t.trigger))
            .cloned()
        else {
            return;
        };

        match ctx.env.map().ok().and_then(|m| m.map(&teleport.dest_map)) {
            Some(dest) => {
                tracing::info!(from = %self.def.id, to = %dest.id, "teleport");
                if dest.world == self.def.world {
                    self.def = dest;
                    self.avatar.x = teleport.dest_x;
                    self.avatar.y = teleport.dest_y;
                } else {
                    // Crossing worlds replaces this state with the other
                    // map variant instead of relocating it.
                    ctx.bus.publish(EngineEvent::ExitState(Callback::None));
                    ctx.bus
                        .publish(EngineEvent::CallState(StateTarget::Map(MapArgs {
                            map: dest.id,
                            world: dest.world,
                            x: teleport.dest_x,
                            y: teleport.dest_y,
                        })));
                }
            }
            None => tracing::error!(map = %teleport.dest_map, "teleport to unknown map"),
        }
    }

    /// Starts a battle when the avatar walks into a live encounter.
    fn check_encounters(&mut self, ctx: &mut StateContext<'_>) {
        if self.grace_ms > 0 {
            return;
        }
        for spawn in &self.def.spawns {
            let SpawnKind::Encounter {
                party,
                background,
                encounter,
            } = &spawn.kind
            else {
                continue;
            };
            if !self.avatar.intersects(&spawn.rect) {
                continue;
            }
            if encounter.is_some_and(|id| ctx.session.party.is_defeated(id)) {
                continue;
            }
            ctx.bus
                .publish(EngineEvent::CallState(StateTarget::Battle(BattleArgs {
                    party: party.clone(),
                    background: background.clone(),
                    encounter: *encounter,
                })));
            return;
        }
    }

    /// Opens a shop when confirming next to a trader or wizard.
    fn try_talk(&mut self, ctx: &StateContext<'_>) {
        let reach = Rect::new(
            self.avatar.x - TALK_REACH,
            self.avatar.y - TALK_REACH,
            self.avatar.w + 2 * TALK_REACH as u32,
            self.avatar.h + 2 * TALK_REACH as u32,
        );
        let strings = ctx.env.strings().ok();
        for spawn in &self.def.spawns {
            if !reach.intersects(&spawn.rect) {
                continue;
            }
            let gold = ctx.session.party.gold;
            match spawn.kind {
                SpawnKind::Trader => {
                    self.overlay = Some(Overlay::Shop(ShopWindow::trader(strings, gold)));
                    return;
                }
                SpawnKind::Wizard => {
                    self.overlay = Some(Overlay::Shop(ShopWindow::wizard(strings, gold)));
                    return;
                }
                SpawnKind::Encounter { .. } => {}
            }
        }
    }

    fn open_pause_menu(&mut self, ctx: &StateContext<'_>) {
        let entries = ctx
            .env
            .strings()
            .ok()
            .and_then(|s| s.strings("pause_menu"))
            .unwrap_or_else(|| {
                vec![
                    ("resume".into(), "Resume".into()),
                    ("save_game".into(), "Save game".into()),
                    ("main_menu".into(), "Main menu".into()),
                ]
            });
        self.pressed.clear();
        self.overlay = Some(Overlay::Pause(Menu::new(entries)));
    }

    fn handle_pause_input(menu: &mut Menu, input: &InputEvent, ctx: &mut StateContext<'_>) -> bool {
        menu.navigate(input);
        match input {
            InputEvent::Press(Button::Confirm) => match menu.selected_id() {
                "resume" => return true,
                "save_game" => {
                    ctx.bus.publish(EngineEvent::SaveGame { slot: 1 });
                    return true;
                }
                "main_menu" => {
                    ctx.bus.publish(EngineEvent::ResetStack);
                    ctx.bus.publish(EngineEvent::CallState(StateTarget::MainMenu));
                }
                other => tracing::warn!(id = other, "unknown pause menu entry"),
            },
            InputEvent::Press(Button::Cancel | Button::Pause) => return true,
            _ => {}
        }
        false
    }
}

impl State for MapState {
    fn kind(&self) -> StateKind {
        StateKind::Map
    }

    fn handle_input(&mut self, input: &InputEvent, ctx: &mut StateContext<'_>) {
        if let InputEvent::Quit = input {
            ctx.bus.publish(EngineEvent::Quit);
            return;
        }

        match &mut self.overlay {
            Some(Overlay::Pause(menu)) => {
                if Self::handle_pause_input(menu, input, ctx) {
                    self.overlay = None;
                }
            }
            Some(Overlay::Shop(shop)) => {
                shop.menu.navigate(input);
                match input {
                    InputEvent::Press(Button::Confirm) => shop.buy(ctx),
                    InputEvent::Press(Button::Cancel) => self.overlay = None,
                    _ => {}
                }
            }
            None => match input {
                InputEvent::Press(Button::Pause) => self.open_pause_menu(ctx),
                InputEvent::Press(Button::Confirm) => self.try_talk(ctx),
                InputEvent::Press(button) => {
                    self.pressed.insert(*button);
                }
                InputEvent::Release(button) => {
                    self.pressed.remove(button);
                }
                InputEvent::Quit => {}
            },
        }
    }

    fn update(&mut self, dt_ms: u32, ctx: &mut StateContext<'_>) {
        self.grace_ms = self.grace_ms.saturating_sub(dt_ms);
        if self.overlay.is_some() {
            return;
        }

        let step = (dt_ms * MOVE_SPEED / 1000) as i32;
        let dx = self.axis_input(Button::Left, Button::Right) * step;
        let dy = self.axis_input(Button::Up, Button::Down) * step;
        self.move_axis(dx, 0);
        self.move_axis(0, dy);

        self.check_teleports(ctx);
        self.check_encounters(ctx);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.clear(self.def.id.as_str());
        for collider in &self.def.colliders {
            surface.fill_rect(*collider, "collider");
        }
        for spawn in &self.def.spawns {
            let style = match spawn.kind {
                SpawnKind::Trader => "trader",
                SpawnKind::Wizard => "wizard",
                SpawnKind::Encounter { .. } => "encounter",
            };
            surface.fill_rect(spawn.rect, style);
        }
        surface.fill_rect(self.avatar, "avatar");

        match &self.overlay {
            Some(Overlay::Pause(menu)) => {
                Window::new(Rect::new(300, 220, 200, 140), "Paused")
                    .with_menu(menu.clone())
                    .draw(surface);
            }
            Some(Overlay::Shop(shop)) => shop.draw(surface),
            None => {}
        }
    }

    fn on_pause(&mut self) {
        // Keys released while a battle runs would otherwise stick.
        self.pressed.clear();
    }

    fn on_return(&mut self, callback: Callback, ctx: &mut StateContext<'_>) {
        // Any battle return disarms triggers briefly, so a surviving
        // encounter cannot restart on the same frame.
        if let Callback::Battle(BattleCallback {
            outcome,
            rewards,
            encounter,
        }) = callback
        {
            self.grace_ms = BATTLE_GRACE_MS;
            if outcome == BattleOutcome::Won {
                let party = &mut ctx.session.party;
                party.add_gold(rewards.gold);
                party.grant_exp(rewards.exp);
                party.add_items(rewards.loot);
                if let Some(id) = encounter {
                    party.mark_defeated(id);
                }
            }
        }
    }

    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::Map {
            map: self.def.id.clone(),
            world: self.def.world,
            x: self.avatar.x,
            y: self.avatar.y,
        }
    }
}
