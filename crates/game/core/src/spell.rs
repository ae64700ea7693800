//! Spells castable by player members and NPCs.

use crate::combat::{Combatant, HitOutcome};
use crate::item::Side;
use crate::party::ClassId;

/// What a spell does to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpellEffect {
    /// Flat damage through the target's normal intake rule (used against
    /// NPCs, who have neither evasion nor defense).
    Damage(u32),
    /// Raw damage bypassing evasion and defense (breath/elemental attacks).
    MagicDamage(u32),
    /// Restores HP on a living target.
    Heal(u32),
}

/// A castable spell. Immutable; known-spell lists only grow.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spell {
    pub name: String,
    /// Price in gold at the wizard's shop.
    pub cost: u32,
    /// Mana spent per cast.
    pub mp_cost: u32,
    pub info: String,
    /// Which player class may learn this spell; `None` for NPC-only spells.
    pub class: Option<ClassId>,
    /// Which party the spell targets.
    pub side: Side,
    pub effect: SpellEffect,
}

impl Spell {
    /// Whether casting at this target would have an effect.
    ///
    /// NPC-side damage is always appliable: KO'd NPCs are removed from the
    /// party immediately, so every listed NPC is a live target.
    pub fn check_appliable(&self, target: &dyn Combatant) -> bool {
        match self.effect {
            SpellEffect::Damage(_) => true,
            SpellEffect::MagicDamage(_) => !target.is_ko(),
            SpellEffect::Heal(_) => !target.is_ko() && target.hp() < target.max_hp(),
        }
    }

    /// Applies the spell effect. Caller has verified mana and eligibility.
    /// Returns the hit outcome for damaging effects.
    pub fn apply(&self, target: &mut dyn Combatant) -> Option<HitOutcome> {
        match self.effect {
            SpellEffect::Damage(amount) => Some(target.take_flat_damage(amount)),
            SpellEffect::MagicDamage(amount) => Some(target.take_magic_damage(amount)),
            SpellEffect::Heal(amount) => {
                target.heal(amount);
                None
            }
        }
    }
}

/// Spell-menu formatting: `Fireball (10 MP)`.
impl std::fmt::Display for Spell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} MP)", self.name, self.mp_cost)
    }
}
