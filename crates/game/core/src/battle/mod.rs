//! The turn-based battle state machine.
//!
//! [`BattleModel`] is the authoritative reducer for one battle. The scene
//! layer feeds it [`BattleCommand`]s for the player side and paced
//! [`BattleModel::step_npc`] calls for the NPC side; every call returns the
//! batch of [`BattleEvent`]s it produced, drained synchronously by the
//! caller within the same frame.
//!
//! Invariants:
//! - exactly one combatant is awaiting input at any time;
//! - at most one pending action exists between selection and targeting;
//! - "next to act" is recomputed from the living set on every advance
//!   (see [`next_alive`]), never cached across turns;
//! - rule violations cost nothing: the turn is only consumed by a fully
//!   resolved action.
mod events;
mod rewards;
mod turn;

pub use events::{BattleEvent, BattleOutcome};
pub use rewards::BattleRewards;
pub use turn::{TurnCursor, next_alive};

use crate::combat::{Combatant, HitOutcome};
use crate::env::{GameEnv, OracleError, compute_seed};
use crate::item::{EncounterId, Side};
use crate::npc::{Npc, NpcDecision, NpcKind};
use crate::party::PlayerParty;

/// Errors surfaced by battle construction and command execution.
///
/// These indicate wiring bugs (unknown NPC kind in map data, command sent
/// in the wrong phase) or missing collaborators, never user mistakes; user
/// mistakes come back as `BattleEvent::Status` lines.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("NPC kind {0} is not registered")]
    UnknownNpcKind(NpcKind),

    #[error("battle started with an empty NPC composition")]
    EmptyComposition,

    #[error("battle started with no living party member")]
    NoLivingMembers,

    #[error("command does not match the current battle phase")]
    CommandOutOfPhase,

    #[error("target index {index} has no candidate")]
    InvalidTarget { index: usize },

    #[error("selection index {index} is out of range")]
    InvalidSelection { index: usize },
}

/// Entries of the per-member action menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleAction {
    Attack,
    Magic,
    Item,
    Flee,
}

/// Player-side input to the battle machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BattleCommand {
    /// Pick an entry from the action menu.
    ChooseAction(BattleAction),
    /// Pick a spell by index into the current member's known list.
    ChooseSpell(usize),
    /// Pick a usable item by index into the shared inventory.
    ChooseItem(usize),
    /// Pick a target by index into the side-appropriate list.
    ChooseTarget(usize),
    /// Back out of spell/item/target selection without consuming the turn.
    Cancel,
}

/// Where the machine currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    /// The current member's action menu is open.
    ChoosingAction,
    /// The spell window is open.
    SelectingSpell,
    /// The item window is open.
    SelectingItem,
    /// A pending action awaits its target.
    SelectingTarget,
    /// The NPC cycle is running; the scene paces `step_npc` calls.
    NpcTurn,
    /// Terminal.
    Finished(BattleOutcome),
}

/// The selected-but-untargeted action. At most one exists at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
enum PendingAction {
    Attack,
    Spell(usize),
    Item(usize),
}

/// One battle's working state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleModel {
    /// Living NPC combatants, in list order. Shrinks immediately on KO.
    npcs: Vec<Npc>,
    background: String,
    encounter: Option<EncounterId>,
    phase: BattlePhase,
    /// Member whose turn it is (or was, during the NPC cycle).
    current_member: usize,
    /// Position within the current NPC pass.
    npc_cursor: usize,
    pending: Option<PendingAction>,
    rewards: BattleRewards,
    seed: u64,
    /// Roll counter; one increment per random draw.
    nonce: u64,
}

impl BattleModel {
    /// Starts a battle against the given composition.
    ///
    /// Instantiates the NPC party through the template oracle, numbers
    /// duplicate kinds ("Slime 2"), fixes the whole encounter's rewards up
    /// front, and hands the first turn to the first living member.
    pub fn new(
        composition: &[NpcKind],
        background: impl Into<String>,
        encounter: Option<EncounterId>,
        party: &PlayerParty,
        env: &GameEnv<'_>,
        game_seed: u64,
    ) -> Result<Self, BattleError> {
        if composition.is_empty() {
            return Err(BattleError::EmptyComposition);
        }
        let current_member = party.first_alive().ok_or(BattleError::NoLivingMembers)?;

        let npc_oracle = env.npcs()?;
        let templates = composition
            .iter()
            .map(|&kind| {
                npc_oracle
                    .template(kind)
                    .ok_or(BattleError::UnknownNpcKind(kind))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rewards = BattleRewards::accumulate(&templates, env.rng()?, game_seed);

        let mut seen = std::collections::HashMap::new();
        for template in &templates {
            *seen.entry(template.kind).or_insert(0u32) += 1;
        }
        let mut ordinal = std::collections::HashMap::new();
        let npcs = templates
            .iter()
            .map(|template| {
                let name = if seen[&template.kind] > 1 {
                    let n = ordinal.entry(template.kind).or_insert(0u32);
                    *n += 1;
                    format!("{} {}", template.name, n)
                } else {
                    template.name.clone()
                };
                template.spawn(name)
            })
            .collect();

        Ok(Self {
            npcs,
            background: background.into(),
            encounter,
            phase: BattlePhase::ChoosingAction,
            current_member,
            npc_cursor: 0,
            pending: None,
            rewards,
            seed: game_seed,
            nonce: 0,
        })
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self.phase {
            BattlePhase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn encounter(&self) -> Option<EncounterId> {
        self.encounter
    }

    /// The rewards fixed at entry; paid out by the caller on `Won`.
    pub fn rewards(&self) -> &BattleRewards {
        &self.rewards
    }

    /// Index of the member whose turn it is.
    pub fn current_member(&self) -> usize {
        self.current_member
    }

    pub fn turn_cursor(&self) -> TurnCursor {
        match self.phase {
            BattlePhase::NpcTurn => TurnCursor::Npc {
                index: self.npc_cursor,
            },
            _ => TurnCursor::Player {
                member: self.current_member,
            },
        }
    }

    /// Which side the pending action targets; drives the target window.
    pub fn pending_target_side(&self, party: &PlayerParty) -> Option<Side> {
        match self.pending? {
            PendingAction::Attack => Some(Side::Npc),
            PendingAction::Spell(index) => {
                let spell = party.member(self.current_member).spells().get(index)?;
                Some(spell.side)
            }
            PendingAction::Item(index) => party.inventory.get(index)?.usable_side(),
        }
    }

    /// Executes one player-side command against the machine.
    ///
    /// Returns the events produced. Commands that do not match the current
    /// phase are an error except `Cancel`, which is simply ignored outside
    /// the phases where backing out is allowed.
    pub fn command(
        &mut self,
        command: BattleCommand,
        party: &mut PlayerParty,
    ) -> Result<Vec<BattleEvent>, BattleError> {
        match (command, self.phase) {
            (BattleCommand::Cancel, phase) => Ok(self.cancel(phase)),
            (BattleCommand::ChooseAction(action), BattlePhase::ChoosingAction) => {
                Ok(self.choose_action(action, party))
            }
            (BattleCommand::ChooseSpell(index), BattlePhase::SelectingSpell) => {
                self.choose_spell(index, party)
            }
            (BattleCommand::ChooseItem(index), BattlePhase::SelectingItem) => {
                self.choose_item(index, party)
            }
            (BattleCommand::ChooseTarget(index), BattlePhase::SelectingTarget) => {
                self.choose_target(index, party)
            }
            _ => Err(BattleError::CommandOutOfPhase),
        }
    }

    /// Cancel backs out of selection during the current member's own turn
    /// only; anywhere else it is a no-op.
    fn cancel(&mut self, phase: BattlePhase) -> Vec<BattleEvent> {
        match phase {
            BattlePhase::SelectingSpell
            | BattlePhase::SelectingItem
            | BattlePhase::SelectingTarget => {
                self.pending = None;
                self.phase = BattlePhase::ChoosingAction;
            }
            _ => {}
        }
        Vec::new()
    }

    fn choose_action(&mut self, action: BattleAction, party: &mut PlayerParty) -> Vec<BattleEvent> {
        let member = self.current_member;
        let mut events = vec![BattleEvent::ActionChosen { member, action }];
        match action {
            BattleAction::Attack => {
                self.pending = Some(PendingAction::Attack);
                self.phase = BattlePhase::SelectingTarget;
            }
            BattleAction::Magic => {
                if party.member(member).spells().is_empty() {
                    events.push(BattleEvent::Status(format!(
                        "{} has no spells",
                        party.member(member).name()
                    )));
                } else {
                    self.phase = BattlePhase::SelectingSpell;
                }
            }
            BattleAction::Item => {
                if party.any_usable_indices().is_empty() {
                    events.push(BattleEvent::Status(
                        "No usable items in inventory".to_string(),
                    ));
                } else {
                    self.phase = BattlePhase::SelectingItem;
                }
            }
            BattleAction::Flee => {
                if party.all_alive() {
                    events.push(BattleEvent::Status("The party fled from battle".to_string()));
                    events.push(self.finish(BattleOutcome::Fled));
                } else {
                    events.push(BattleEvent::Status(
                        "Cannot flee while a party member is knocked out".to_string(),
                    ));
                }
            }
        }
        events
    }

    fn choose_spell(
        &mut self,
        index: usize,
        party: &mut PlayerParty,
    ) -> Result<Vec<BattleEvent>, BattleError> {
        let member = party.member(self.current_member);
        let spell = member
            .spells()
            .get(index)
            .ok_or(BattleError::InvalidSelection { index })?;

        if member.mp() < spell.mp_cost {
            // Rejected without consuming the turn; the action menu re-opens.
            self.phase = BattlePhase::ChoosingAction;
            return Ok(vec![BattleEvent::Status("Not enough mana".to_string())]);
        }

        self.pending = Some(PendingAction::Spell(index));
        self.phase = BattlePhase::SelectingTarget;
        Ok(Vec::new())
    }

    fn choose_item(
        &mut self,
        index: usize,
        party: &mut PlayerParty,
    ) -> Result<Vec<BattleEvent>, BattleError> {
        let item = party
            .inventory
            .get(index)
            .ok_or(BattleError::InvalidSelection { index })?;
        if !item.is_usable() {
            return Err(BattleError::InvalidSelection { index });
        }

        self.pending = Some(PendingAction::Item(index));
        self.phase = BattlePhase::SelectingTarget;
        Ok(Vec::new())
    }

    fn choose_target(
        &mut self,
        target: usize,
        party: &mut PlayerParty,
    ) -> Result<Vec<BattleEvent>, BattleError> {
        let pending = self.pending.ok_or(BattleError::CommandOutOfPhase)?;
        match pending {
            PendingAction::Attack => self.resolve_attack(target, party),
            PendingAction::Spell(index) => self.resolve_spell(index, target, party),
            PendingAction::Item(index) => self.resolve_item(index, target, party),
        }
    }

    fn resolve_attack(
        &mut self,
        target: usize,
        party: &mut PlayerParty,
    ) -> Result<Vec<BattleEvent>, BattleError> {
        if target >= self.npcs.len() {
            return Err(BattleError::InvalidTarget { index: target });
        }
        let member = party.member(self.current_member);
        let damage = member.attack();
        let attacker = member.name().to_string();

        let mut events = Vec::new();
        let outcome = self.npcs[target].take_flat_damage(damage);
        events.push(BattleEvent::Status(format!(
            "{} dealt {} damage to {}",
            attacker,
            damage,
            self.npcs[target].name()
        )));
        self.handle_npc_outcome(target, outcome, &mut events);
        if self.outcome().is_none() {
            self.advance_player_turn(party, &mut events);
        }
        Ok(events)
    }

    fn resolve_spell(
        &mut self,
        index: usize,
        target: usize,
        party: &mut PlayerParty,
    ) -> Result<Vec<BattleEvent>, BattleError> {
        let caster = party.member(self.current_member);
        let spell = caster
            .spells()
            .get(index)
            .ok_or(BattleError::InvalidSelection { index })?
            .clone();
        let caster_name = caster.name().to_string();
        let mut events = Vec::new();

        match spell.side {
            Side::Npc => {
                if target >= self.npcs.len() {
                    return Err(BattleError::InvalidTarget { index: target });
                }
                let outcome = spell.apply(&mut self.npcs[target]);
                events.push(BattleEvent::Status(format!(
                    "{} casted {} on {}",
                    caster_name,
                    spell,
                    self.npcs[target].name()
                )));
                party.member_mut(self.current_member).spend_mp(spell.mp_cost);
                if let Some(outcome) = outcome {
                    self.handle_npc_outcome(target, outcome, &mut events);
                }
            }
            Side::Player => {
                if target >= party.members().len() {
                    return Err(BattleError::InvalidTarget { index: target });
                }
                if !spell.check_appliable(party.member(target)) {
                    // Target rejected; re-select without losing the turn.
                    events.push(BattleEvent::Status(format!(
                        "{} would have no effect on {}",
                        spell.name,
                        party.member(target).name()
                    )));
                    return Ok(events);
                }
                spell.apply(party.member_mut(target));
                events.push(BattleEvent::Status(format!(
                    "{} casted {} on {}",
                    caster_name,
                    spell,
                    party.member(target).name()
                )));
                party.member_mut(self.current_member).spend_mp(spell.mp_cost);
            }
        }

        if self.outcome().is_none() {
            self.advance_player_turn(party, &mut events);
        }
        Ok(events)
    }

    fn resolve_item(
        &mut self,
        index: usize,
        target: usize,
        party: &mut PlayerParty,
    ) -> Result<Vec<BattleEvent>, BattleError> {
        let item = party
            .inventory
            .get(index)
            .ok_or(BattleError::InvalidSelection { index })?
            .clone();
        let user = party.member(self.current_member).name().to_string();
        let mut events = Vec::new();

        match item.usable_side() {
            Some(Side::Player) => {
                if target >= party.members().len() {
                    return Err(BattleError::InvalidTarget { index: target });
                }
                if !item.check_appliable(party.member(target)) {
                    events.push(BattleEvent::Status(format!(
                        "{} would have no effect on {}",
                        item.name,
                        party.member(target).name()
                    )));
                    return Ok(events);
                }
                item.apply_effect(party.member_mut(target));
                events.push(BattleEvent::Status(format!(
                    "{} used {} on {}",
                    user,
                    item.name,
                    party.member(target).name()
                )));
            }
            Some(Side::Npc) => {
                if target >= self.npcs.len() {
                    return Err(BattleError::InvalidTarget { index: target });
                }
                if !item.check_appliable(&self.npcs[target]) {
                    events.push(BattleEvent::Status(format!(
                        "{} would have no effect on {}",
                        item.name,
                        self.npcs[target].name()
                    )));
                    return Ok(events);
                }
                item.apply_effect(&mut self.npcs[target]);
                events.push(BattleEvent::Status(format!(
                    "{} used {} on {}",
                    user,
                    item.name,
                    self.npcs[target].name()
                )));
            }
            None => return Err(BattleError::InvalidSelection { index }),
        }

        // Consumed only on successful use.
        party.take_item(index);
        if self.outcome().is_none() {
            self.advance_player_turn(party, &mut events);
        }
        Ok(events)
    }

    /// Runs one NPC's turn: exactly one decision, exactly one action, one
    /// turn-complete signal. Valid only in the NPC phase; the scene paces
    /// calls with a read delay between them.
    pub fn step_npc(
        &mut self,
        party: &mut PlayerParty,
        env: &GameEnv<'_>,
    ) -> Result<Vec<BattleEvent>, BattleError> {
        if self.phase != BattlePhase::NpcTurn {
            return Err(BattleError::CommandOutOfPhase);
        }
        let rng = env.rng()?;

        let npc_index = self.npc_cursor;
        let decision = self.npcs[npc_index]
            .decide(party)
            .ok_or(BattleError::NoLivingMembers)?;

        let mut events = Vec::new();
        match decision {
            NpcDecision::Attack { member } => {
                let npc_name = self.npcs[npc_index].name().to_string();
                let damage = self.npcs[npc_index].attack();
                let roll = rng.roll_permille(compute_seed(self.seed, self.nonce, 1));
                self.nonce += 1;

                let target = party.member_mut(member);
                match target.take_physical_hit(damage, roll) {
                    HitOutcome::Dodged => {
                        events.push(BattleEvent::Dodged { member });
                        events.push(BattleEvent::Status(format!(
                            "{} dodged {}'s damage",
                            party.member(member).name(),
                            npc_name
                        )));
                    }
                    HitOutcome::Hit { damage, .. } => {
                        events.push(BattleEvent::Status(format!(
                            "{} dealt {} damage to {}",
                            npc_name,
                            damage,
                            party.member(member).name()
                        )));
                        self.handle_member_outcome(member, party, &mut events);
                    }
                }
            }
            NpcDecision::CastSpell { spell, member } => {
                let spell = self.npcs[npc_index].spells()[spell].clone();
                let npc_name = self.npcs[npc_index].name().to_string();
                self.npcs[npc_index].spend_mp(spell.mp_cost);

                events.push(BattleEvent::Status(format!(
                    "{} casted {} on {}",
                    npc_name,
                    spell,
                    party.member(member).name()
                )));
                spell.apply(party.member_mut(member));
                self.handle_member_outcome(member, party, &mut events);
            }
        }

        if self.outcome().is_none() {
            self.advance_npc_turn(party, &mut events);
        }
        Ok(events)
    }

    /// Removes a knocked-out NPC immediately and checks for victory.
    fn handle_npc_outcome(
        &mut self,
        target: usize,
        outcome: HitOutcome,
        events: &mut Vec<BattleEvent>,
    ) {
        if outcome.knocked_out() {
            let npc = self.npcs.remove(target);
            events.push(BattleEvent::Status(format!("{} was defeated", npc.name())));
            events.push(BattleEvent::NpcKo {
                name: npc.name().to_string(),
            });
            if self.npcs.is_empty() {
                events.push(BattleEvent::Status("Victory!".to_string()));
                events.push(self.finish(BattleOutcome::Won));
            }
        }
    }

    /// Raises the KO event for a member and checks for a party wipe.
    fn handle_member_outcome(
        &mut self,
        member: usize,
        party: &PlayerParty,
        events: &mut Vec<BattleEvent>,
    ) {
        if party.member(member).is_ko() {
            events.push(BattleEvent::Status(format!(
                "{} was knocked out",
                party.member(member).name()
            )));
            events.push(BattleEvent::MemberKo { member });
            if party.alive_count() == 0 {
                events.push(BattleEvent::Status("The party was defeated".to_string()));
                events.push(self.finish(BattleOutcome::GameOver));
            }
        }
    }

    fn advance_player_turn(&mut self, party: &PlayerParty, events: &mut Vec<BattleEvent>) {
        self.pending = None;
        match next_alive(party, Some(self.current_member)) {
            Some(next) => {
                self.current_member = next;
                self.phase = BattlePhase::ChoosingAction;
            }
            None => {
                // Player pass exhausted; hand over to the NPC cycle.
                self.npc_cursor = 0;
                self.phase = BattlePhase::NpcTurn;
            }
        }
        events.push(BattleEvent::TurnPassed);
    }

    fn advance_npc_turn(&mut self, party: &PlayerParty, events: &mut Vec<BattleEvent>) {
        self.npc_cursor += 1;
        if self.npc_cursor >= self.npcs.len() {
            // NPC pass exhausted; restart the player cycle from the first
            // living member, recomputed from the current set.
            self.npc_cursor = 0;
            match next_alive(party, None) {
                Some(first) => {
                    self.current_member = first;
                    self.phase = BattlePhase::ChoosingAction;
                }
                None => {
                    // A wipe always finishes the battle before we get here.
                    debug_assert!(self.outcome().is_some());
                }
            }
        }
        events.push(BattleEvent::TurnPassed);
    }

    fn finish(&mut self, outcome: BattleOutcome) -> BattleEvent {
        self.phase = BattlePhase::Finished(outcome);
        BattleEvent::Finished(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::env::{Env, NpcOracle, PcgRng, RngOracle};
    use crate::item::{Item, ItemKind, UsableEffect};
    use crate::npc::{NpcPolicy, NpcTemplate};
    use crate::party::{ClassId, PartyMember};
    use crate::spell::{Spell, SpellEffect};
    use crate::stats::CoreAttributes;

    /// Template source for a frail melee slime.
    struct Registry;

    impl NpcOracle for Registry {
        fn template(&self, kind: NpcKind) -> Option<NpcTemplate> {
            match kind {
                NpcKind::Slime => Some(
                    NpcTemplate::builder(NpcKind::Slime, "Slime")
                        .pools(10, 0)
                        .attack(5)
                        .rewards(15, 30)
                        .build(),
                ),
                NpcKind::FireElemental => None,
            }
        }
    }

    /// Template source for a slime that cannot die and one-shots members.
    struct BrutalRegistry;

    impl NpcOracle for BrutalRegistry {
        fn template(&self, kind: NpcKind) -> Option<NpcTemplate> {
            match kind {
                NpcKind::Slime => Some(
                    NpcTemplate::builder(NpcKind::Slime, "Slime")
                        .pools(1_000_000, 0)
                        .attack(10_000)
                        .policy(NpcPolicy::AttackFirstAlive)
                        .build(),
                ),
                NpcKind::FireElemental => None,
            }
        }
    }

    /// Template source for a slime that cannot die yet hurts nobody.
    struct TankRegistry;

    impl NpcOracle for TankRegistry {
        fn template(&self, kind: NpcKind) -> Option<NpcTemplate> {
            match kind {
                NpcKind::Slime => Some(
                    NpcTemplate::builder(NpcKind::Slime, "Slime")
                        .pools(1_000_000, 0)
                        .attack(5)
                        .build(),
                ),
                NpcKind::FireElemental => None,
            }
        }
    }

    /// Rolls the same permille value forever; pins hit/dodge outcomes.
    struct FixedRng(u32);

    impl RngOracle for FixedRng {
        fn next_u32(&self, _seed: u64) -> u32 {
            self.0
        }
    }

    fn heal() -> Spell {
        Spell {
            name: "Heal".into(),
            cost: 50,
            mp_cost: 10,
            info: "Restore 5 HP".into(),
            class: Some(ClassId::Healer),
            side: Side::Player,
            effect: SpellEffect::Heal(5),
        }
    }

    fn health_potion() -> Item {
        Item::new(
            "Health Potion",
            50,
            "Restores 25 HP",
            ItemKind::Usable {
                effect: UsableEffect::RestoreHp(25),
                side: Side::Player,
            },
        )
    }

    fn party_with(inventory: Vec<Item>) -> PlayerParty {
        let config = GameConfig::default();
        let weapon = || Item::new("Knife", 8, "knife", ItemKind::Weapon { damage: 2 });
        let armor = || Item::new("Coat", 10, "coat", ItemKind::Armor { defense: 2 });
        let member = |name: &str, class| {
            PartyMember::new(
                name,
                class,
                CoreAttributes::new(15, 10, 10, 10),
                weapon(),
                armor(),
                &config,
            )
        };
        let mut rilay = member("Rilay", ClassId::Healer);
        rilay.learn_spell(heal());
        PlayerParty::new(
            [
                member("Cid", ClassId::Warrior),
                member("Karos", ClassId::Mage),
                rilay,
                member("Jaden", ClassId::Ranger),
            ],
            inventory,
            0,
        )
    }

    fn party() -> PlayerParty {
        party_with(Vec::new())
    }

    #[test]
    fn lethal_attack_wins_and_fixes_rewards_up_front() {
        let party = &mut party();
        let env = Env::new(None, None, None, Some(&Registry), Some(&PcgRng));
        let mut model =
            BattleModel::new(&[NpcKind::Slime], "cave", None, party, &env, 7).unwrap();
        assert_eq!(model.rewards().gold, 30);
        assert_eq!(model.rewards().exp, 15);

        model
            .command(BattleCommand::ChooseAction(BattleAction::Attack), party)
            .unwrap();
        assert_eq!(model.phase(), BattlePhase::SelectingTarget);

        let events = model
            .command(BattleCommand::ChooseTarget(0), party)
            .unwrap();
        assert!(model.npcs().is_empty());
        assert_eq!(model.outcome(), Some(BattleOutcome::Won));
        assert!(events.contains(&BattleEvent::Finished(BattleOutcome::Won)));
        assert!(events.iter().any(|e| matches!(
            e,
            BattleEvent::NpcKo { name } if name == "Slime"
        )));
    }

    #[test]
    fn insufficient_mana_keeps_the_turn() {
        let party = &mut party();
        // Only the healer is up; her mana is drained below the spell cost.
        party.member_mut(0).take_magic_damage(10_000);
        party.member_mut(1).take_magic_damage(10_000);
        party.member_mut(3).take_magic_damage(10_000);
        let mp = party.member(2).mp();
        party.member_mut(2).spend_mp(mp - 5);

        let env = Env::new(None, None, None, Some(&Registry), Some(&PcgRng));
        let mut model =
            BattleModel::new(&[NpcKind::Slime], "cave", None, party, &env, 7).unwrap();
        assert_eq!(model.current_member(), 2);

        model
            .command(BattleCommand::ChooseAction(BattleAction::Magic), party)
            .unwrap();
        assert_eq!(model.phase(), BattlePhase::SelectingSpell);

        let events = model
            .command(BattleCommand::ChooseSpell(0), party)
            .unwrap();
        assert_eq!(events, vec![BattleEvent::Status("Not enough mana".into())]);
        // The action menu re-opens; no turn consumed, no mana spent.
        assert_eq!(model.phase(), BattlePhase::ChoosingAction);
        assert_eq!(model.current_member(), 2);
        assert_eq!(party.member(2).mp(), 5);
    }

    #[test]
    fn flee_is_blocked_while_a_member_is_down() {
        let party = &mut party();
        party.member_mut(3).take_magic_damage(10_000);

        let env = Env::new(None, None, None, Some(&Registry), Some(&PcgRng));
        let mut model =
            BattleModel::new(&[NpcKind::Slime], "cave", None, party, &env, 7).unwrap();

        let events = model
            .command(BattleCommand::ChooseAction(BattleAction::Flee), party)
            .unwrap();
        assert!(model.outcome().is_none());
        assert_eq!(model.phase(), BattlePhase::ChoosingAction);
        assert_eq!(model.current_member(), 0);
        assert!(!events.contains(&BattleEvent::TurnPassed));
    }

    #[test]
    fn flee_with_full_party_ends_the_battle() {
        let party = &mut party();
        let env = Env::new(None, None, None, Some(&Registry), Some(&PcgRng));
        let mut model =
            BattleModel::new(&[NpcKind::Slime], "cave", None, party, &env, 7).unwrap();

        let events = model
            .command(BattleCommand::ChooseAction(BattleAction::Flee), party)
            .unwrap();
        assert_eq!(model.outcome(), Some(BattleOutcome::Fled));
        assert!(events.contains(&BattleEvent::Finished(BattleOutcome::Fled)));
    }

    #[test]
    fn wiping_the_party_is_game_over() {
        let party = &mut party();
        // Roll 999 never dodges; the slime one-shots a member per pass.
        let rng = FixedRng(999);
        let env = Env::new(None, None, None, Some(&BrutalRegistry), Some(&rng));
        let mut model =
            BattleModel::new(&[NpcKind::Slime], "cave", None, party, &env, 7).unwrap();

        let mut guard = 0;
        while model.outcome().is_none() {
            match model.phase() {
                BattlePhase::ChoosingAction => {
                    model
                        .command(BattleCommand::ChooseAction(BattleAction::Attack), party)
                        .unwrap();
                }
                BattlePhase::SelectingTarget => {
                    model
                        .command(BattleCommand::ChooseTarget(0), party)
                        .unwrap();
                }
                BattlePhase::NpcTurn => {
                    model.step_npc(party, &env).unwrap();
                }
                phase => panic!("unexpected phase {phase:?}"),
            }
            guard += 1;
            assert!(guard < 64, "battle failed to terminate");
        }

        assert_eq!(model.outcome(), Some(BattleOutcome::GameOver));
        assert_eq!(party.alive_count(), 0);
    }

    #[test]
    fn cancel_reopens_the_action_menu() {
        let party = &mut party();
        let env = Env::new(None, None, None, Some(&Registry), Some(&PcgRng));
        let mut model =
            BattleModel::new(&[NpcKind::Slime], "cave", None, party, &env, 7).unwrap();

        model
            .command(BattleCommand::ChooseAction(BattleAction::Attack), party)
            .unwrap();
        assert_eq!(model.phase(), BattlePhase::SelectingTarget);

        model.command(BattleCommand::Cancel, party).unwrap();
        assert_eq!(model.phase(), BattlePhase::ChoosingAction);
        assert_eq!(model.current_member(), 0);
        assert_eq!(model.pending_target_side(party), None);
    }

    #[test]
    fn magic_without_spells_keeps_the_menu_open() {
        let party = &mut party();
        let env = Env::new(None, None, None, Some(&Registry), Some(&PcgRng));
        let mut model =
            BattleModel::new(&[NpcKind::Slime], "cave", None, party, &env, 7).unwrap();

        // Cid knows no spells.
        let events = model
            .command(BattleCommand::ChooseAction(BattleAction::Magic), party)
            .unwrap();
        assert_eq!(model.phase(), BattlePhase::ChoosingAction);
        assert_eq!(model.current_member(), 0);
        assert!(events.iter().any(|e| matches!(
            e,
            BattleEvent::Status(line) if line == "Cid has no spells"
        )));
    }

    #[test]
    fn successful_item_use_consumes_it_and_passes_the_turn() {
        let party = &mut party_with(vec![health_potion()]);
        party.member_mut(0).take_magic_damage(10);

        let env = Env::new(None, None, None, Some(&Registry), Some(&PcgRng));
        let mut model =
            BattleModel::new(&[NpcKind::Slime], "cave", None, party, &env, 7).unwrap();

        model
            .command(BattleCommand::ChooseAction(BattleAction::Item), party)
            .unwrap();
        assert_eq!(model.phase(), BattlePhase::SelectingItem);

        model
            .command(BattleCommand::ChooseItem(0), party)
            .unwrap();
        assert_eq!(model.pending_target_side(party), Some(Side::Player));

        let events = model
            .command(BattleCommand::ChooseTarget(0), party)
            .unwrap();
        assert!(party.inventory.is_empty());
        assert_eq!(party.member(0).hp(), party.member(0).max_hp());
        assert!(events.contains(&BattleEvent::TurnPassed));
        assert_eq!(model.current_member(), 1);
    }

    #[test]
    fn ineligible_heal_target_preserves_the_turn() {
        let party = &mut party();
        party.member_mut(0).take_magic_damage(10_000);
        party.member_mut(1).take_magic_damage(10_000);
        party.member_mut(3).take_magic_damage(10_000);

        let env = Env::new(None, None, None, Some(&Registry), Some(&PcgRng));
        let mut model =
            BattleModel::new(&[NpcKind::Slime], "cave", None, party, &env, 7).unwrap();
        assert_eq!(model.current_member(), 2);

        model
            .command(BattleCommand::ChooseAction(BattleAction::Magic), party)
            .unwrap();
        model
            .command(BattleCommand::ChooseSpell(0), party)
            .unwrap();

        // Healing a full-HP target is rejected; re-select without turn loss.
        let mp_before = party.member(2).mp();
        let events = model
            .command(BattleCommand::ChooseTarget(2), party)
            .unwrap();
        assert_eq!(model.phase(), BattlePhase::SelectingTarget);
        assert_eq!(party.member(2).mp(), mp_before);
        assert!(events.iter().any(|e| matches!(
            e,
            BattleEvent::Status(line) if line == "Heal would have no effect on Rilay"
        )));
    }

    #[test]
    fn duplicate_kinds_are_numbered() {
        let party = &mut party();
        let env = Env::new(None, None, None, Some(&Registry), Some(&PcgRng));
        let model = BattleModel::new(
            &[NpcKind::Slime, NpcKind::Slime],
            "cave",
            None,
            party,
            &env,
            7,
        )
        .unwrap();

        let names: Vec<_> = model.npcs().iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["Slime 1", "Slime 2"]);
    }

    #[test]
    fn commands_outside_their_phase_are_rejected() {
        let party = &mut party();
        let env = Env::new(None, None, None, Some(&Registry), Some(&PcgRng));
        let mut model =
            BattleModel::new(&[NpcKind::Slime], "cave", None, party, &env, 7).unwrap();

        assert_eq!(
            model.command(BattleCommand::ChooseTarget(0), party),
            Err(BattleError::CommandOutOfPhase)
        );
        assert_eq!(
            model.step_npc(party, &env),
            Err(BattleError::CommandOutOfPhase)
        );
    }

    #[test]
    fn npc_cycle_hands_back_to_the_first_living_member() {
        let party = &mut party();
        party.member_mut(0).take_magic_damage(10_000);

        // Roll 999 never dodges; a 5-damage tank cannot KO anyone.
        let rng = FixedRng(999);
        let env = Env::new(None, None, None, Some(&TankRegistry), Some(&rng));
        let mut model =
            BattleModel::new(&[NpcKind::Slime], "cave", None, party, &env, 7).unwrap();
        assert_eq!(model.current_member(), 1);

        // Walk the three surviving members' pass.
        for expected in [1, 2, 3] {
            assert_eq!(model.current_member(), expected);
            model
                .command(BattleCommand::ChooseAction(BattleAction::Attack), party)
                .unwrap();
            model
                .command(BattleCommand::ChooseTarget(0), party)
                .unwrap();
        }
        assert_eq!(model.phase(), BattlePhase::NpcTurn);
        assert_eq!(model.turn_cursor(), TurnCursor::Npc { index: 0 });

        // The single NPC acts once; control returns to the first living
        // member, recomputed from scratch.
        let events = model.step_npc(party, &env).unwrap();
        assert!(events.contains(&BattleEvent::TurnPassed));
        assert_eq!(model.phase(), BattlePhase::ChoosingAction);
        assert_eq!(model.current_member(), 1);
    }
}
