//! NPC combatants: templates, instances, and decision policies.

use crate::combat::{Combatant, HitOutcome};
use crate::item::Item;
use crate::party::PlayerParty;
use crate::spell::Spell;

/// Registered NPC kinds. Map data stores this tag; the content registry
/// turns it into a template at battle entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NpcKind {
    Slime,
    FireElemental,
}

/// One entry of an NPC's loot table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootEntry {
    pub item: Item,
    /// Drop chance in permille.
    pub rate_permille: u32,
}

/// How an NPC picks its one action per turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NpcPolicy {
    /// Always attack the first living player member.
    AttackFirstAlive,
    /// Cast the first known spell on the lowest-HP living member while MP
    /// lasts, otherwise attack them.
    SpellLowestHp,
}

/// The single action an NPC chose for its turn.
///
/// Returned explicitly from [`Npc::decide`]; executing it and signalling
/// end-of-turn is the battle machine's job, so an NPC can neither stall
/// nor act twice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NpcDecision {
    Attack { member: usize },
    CastSpell { spell: usize, member: usize },
}

/// Everything needed to instantiate an NPC, minus battle-local identity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcTemplate {
    pub kind: NpcKind,
    pub name: String,
    pub max_hp: u32,
    pub max_mp: u32,
    /// Physical damage of a basic attack.
    pub attack: u32,
    /// Experience every player member receives for defeating this NPC.
    pub exp_reward: u32,
    pub gold_reward: u32,
    pub loot: Vec<LootEntry>,
    pub spells: Vec<Spell>,
    pub policy: NpcPolicy,
}

impl NpcTemplate {
    pub fn builder(kind: NpcKind, name: impl Into<String>) -> NpcTemplateBuilder {
        NpcTemplateBuilder {
            template: NpcTemplate {
                kind,
                name: name.into(),
                max_hp: 1,
                max_mp: 0,
                attack: 0,
                exp_reward: 0,
                gold_reward: 0,
                loot: Vec::new(),
                spells: Vec::new(),
                policy: NpcPolicy::AttackFirstAlive,
            },
        }
    }

    /// Materializes a battle instance with full pools. `display_name`
    /// disambiguates duplicates within one encounter ("Slime 2").
    pub fn spawn(&self, display_name: String) -> Npc {
        Npc {
            kind: self.kind,
            name: display_name,
            hp: self.max_hp,
            max_hp: self.max_hp,
            mp: self.max_mp,
            max_mp: self.max_mp,
            attack: self.attack,
            spells: self.spells.clone(),
            policy: self.policy,
        }
    }
}

/// Builder for NPC templates, used by the content registry.
pub struct NpcTemplateBuilder {
    template: NpcTemplate,
}

impl NpcTemplateBuilder {
    pub fn pools(mut self, max_hp: u32, max_mp: u32) -> Self {
        self.template.max_hp = max_hp;
        self.template.max_mp = max_mp;
        self
    }

    pub fn attack(mut self, attack: u32) -> Self {
        self.template.attack = attack;
        self
    }

    pub fn rewards(mut self, exp: u32, gold: u32) -> Self {
        self.template.exp_reward = exp;
        self.template.gold_reward = gold;
        self
    }

    pub fn loot(mut self, item: Item, rate_permille: u32) -> Self {
        self.template.loot.push(LootEntry {
            item,
            rate_permille,
        });
        self
    }

    pub fn spell(mut self, spell: Spell) -> Self {
        self.template.spells.push(spell);
        self
    }

    pub fn policy(mut self, policy: NpcPolicy) -> Self {
        self.template.policy = policy;
        self
    }

    pub fn build(self) -> NpcTemplate {
        self.template
    }
}

/// A live NPC combatant inside a battle. Removed from the NPC party the
/// moment it is knocked out.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Npc {
    kind: NpcKind,
    name: String,
    hp: u32,
    max_hp: u32,
    mp: u32,
    max_mp: u32,
    attack: u32,
    spells: Vec<Spell>,
    policy: NpcPolicy,
}

impl Npc {
    pub fn kind(&self) -> NpcKind {
        self.kind
    }

    pub fn attack(&self) -> u32 {
        self.attack
    }

    pub fn spells(&self) -> &[Spell] {
        &self.spells
    }

    /// Chooses exactly one action for this turn with read access to the
    /// player party. `None` only when no player member is alive, in which
    /// case the battle is already over.
    pub fn decide(&self, party: &PlayerParty) -> Option<NpcDecision> {
        match self.policy {
            NpcPolicy::AttackFirstAlive => {
                let member = party.first_alive()?;
                Some(NpcDecision::Attack { member })
            }
            NpcPolicy::SpellLowestHp => {
                let member = party
                    .alive_indices()
                    .into_iter()
                    .min_by_key(|&i| party.member(i).hp())?;
                match self.spells.first() {
                    Some(spell) if self.mp >= spell.mp_cost => {
                        Some(NpcDecision::CastSpell { spell: 0, member })
                    }
                    _ => Some(NpcDecision::Attack { member }),
                }
            }
        }
    }
}

impl Combatant for Npc {
    fn name(&self) -> &str {
        &self.name
    }

    fn hp(&self) -> u32 {
        self.hp
    }

    fn max_hp(&self) -> u32 {
        self.max_hp
    }

    fn mp(&self) -> u32 {
        self.mp
    }

    fn max_mp(&self) -> u32 {
        self.max_mp
    }

    fn heal(&mut self, amount: u32) {
        if !self.is_ko() {
            self.hp = (self.hp + amount).min(self.max_hp);
        }
    }

    fn restore_mp(&mut self, amount: u32) {
        self.mp = (self.mp + amount).min(self.max_mp);
    }

    fn spend_mp(&mut self, amount: u32) {
        debug_assert!(self.mp >= amount, "mana was checked before casting");
        self.mp = self.mp.saturating_sub(amount);
    }

    fn revive(&mut self, hp: u32) {
        if self.is_ko() {
            self.hp = hp.clamp(1, self.max_hp);
        }
    }

    fn take_magic_damage(&mut self, amount: u32) -> HitOutcome {
        self.take_flat_damage(amount)
    }

    /// NPC damage intake: flat subtraction, no evasion, no defense.
    fn take_flat_damage(&mut self, amount: u32) -> HitOutcome {
        if amount >= self.hp {
            self.hp = 0;
            HitOutcome::Hit {
                damage: amount,
                knocked_out: true,
            }
        } else {
            self.hp -= amount;
            HitOutcome::Hit {
                damage: amount,
                knocked_out: false,
            }
        }
    }
}
