//! The player party: four members, shared inventory, shared gold.

use std::collections::HashSet;

use arrayvec::ArrayVec;

use crate::combat::Combatant;
use crate::item::{EncounterId, Item, Side};
use crate::spell::Spell;

use super::{ClassId, PartyMember};

/// A party always holds exactly this many members, in fixed turn order
/// {Warrior, Mage, Healer, Ranger}.
pub const PARTY_SIZE: usize = 4;

/// The player party. Created once per new game and owned by the session;
/// map and battle states borrow it mutably for the duration of a call.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerParty {
    members: ArrayVec<PartyMember, PARTY_SIZE>,
    /// Single shared inventory; there is no per-member bag.
    pub inventory: Vec<Item>,
    pub gold: u32,
    defeated: HashSet<EncounterId>,
}

impl PlayerParty {
    /// Builds a party from its four members in turn order.
    pub fn new(members: [PartyMember; PARTY_SIZE], inventory: Vec<Item>, gold: u32) -> Self {
        Self {
            members: ArrayVec::from(members),
            inventory,
            gold,
            defeated: HashSet::new(),
        }
    }

    pub fn members(&self) -> &[PartyMember] {
        &self.members
    }

    pub fn member(&self, index: usize) -> &PartyMember {
        &self.members[index]
    }

    pub fn member_mut(&mut self, index: usize) -> &mut PartyMember {
        &mut self.members[index]
    }

    /// Indices of living members in fixed turn order.
    pub fn alive_indices(&self) -> Vec<usize> {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.is_ko())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn alive_count(&self) -> usize {
        self.members.iter().filter(|m| !m.is_ko()).count()
    }

    /// True when nobody is knocked out. Fleeing requires this.
    pub fn all_alive(&self) -> bool {
        self.alive_count() == PARTY_SIZE
    }

    pub fn first_alive(&self) -> Option<usize> {
        self.members.iter().position(|m| !m.is_ko())
    }

    pub fn add_gold(&mut self, gold: u32) {
        self.gold += gold;
    }

    pub fn add_items(&mut self, items: impl IntoIterator<Item = Item>) {
        self.inventory.extend(items);
    }

    /// Credits experience to every member. KO'd members share the reward;
    /// being carried through a battle still teaches something.
    pub fn grant_exp(&mut self, exp: u32) {
        for member in &mut self.members {
            member.add_exp(exp);
        }
    }

    /// Routes a spell to the member of its class. NPC-only spells are
    /// ignored.
    pub fn learn_spell(&mut self, spell: Spell) {
        if let Some(class) = spell.class {
            if let Some(member) = self.members.iter_mut().find(|m| m.class() == class) {
                member.learn_spell(spell);
            }
        }
    }

    pub fn member_of_class(&self, class: ClassId) -> Option<&PartyMember> {
        self.members.iter().find(|m| m.class() == class)
    }

    /// Inventory indices of items usable in battle on the given side.
    pub fn usable_item_indices(&self, side: Side) -> Vec<usize> {
        self.inventory
            .iter()
            .enumerate()
            .filter(|(_, item)| item.usable_side() == Some(side))
            .map(|(i, _)| i)
            .collect()
    }

    /// Inventory indices of any usable item, either side.
    pub fn any_usable_indices(&self) -> Vec<usize> {
        self.inventory
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_usable())
            .map(|(i, _)| i)
            .collect()
    }

    /// Removes and returns an inventory item (after successful use).
    pub fn take_item(&mut self, index: usize) -> Item {
        self.inventory.remove(index)
    }

    /// Marks a one-time encounter as permanently defeated.
    pub fn mark_defeated(&mut self, id: EncounterId) {
        self.defeated.insert(id);
    }

    pub fn is_defeated(&self, id: EncounterId) -> bool {
        self.defeated.contains(&id)
    }
}
