//! Attribute storage and derived-stat computation.
//!
//! Core attributes are the only stored numbers; combat stats are always
//! recomputed from scratch after a level-up or an equipment change, never
//! patched incrementally. All math is integer; evasion chance is expressed
//! in permille so a fixed-seed roll reproduces exactly.

/// The four stored attributes of a player member.
///
/// - intellect drives maximum mana
/// - strength drives physical damage
/// - dexterity drives evasion chance
/// - durability drives maximum health
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoreAttributes {
    pub intellect: u32,
    pub strength: u32,
    pub dexterity: u32,
    pub durability: u32,
}

impl CoreAttributes {
    pub fn new(intellect: u32, strength: u32, dexterity: u32, durability: u32) -> Self {
        Self {
            intellect,
            strength,
            dexterity,
            durability,
        }
    }

    /// Applies one level's worth of growth in place.
    pub fn grow(&mut self, growth: &ClassGrowth) {
        self.intellect += growth.intellect;
        self.strength += growth.strength;
        self.dexterity += growth.dexterity;
        self.durability += growth.durability;
    }
}

/// Fixed per-class attribute increments applied on every level-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassGrowth {
    pub intellect: u32,
    pub strength: u32,
    pub dexterity: u32,
    pub durability: u32,
}

/// Per-class scaling constants used when deriving combat stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassMultipliers {
    /// HP per durability point.
    pub hp: u32,
    /// MP per intellect point.
    pub mp: u32,
    /// Damage per strength point.
    pub damage: u32,
    /// Experience threshold scaling: next level costs `level * exp`.
    pub exp: u32,
}

/// Combat stats derived from attributes plus equipment.
///
/// Not a source of truth: recompute with [`DerivedStats::compute`] whenever
/// attributes or equipment change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedStats {
    pub max_hp: u32,
    pub max_mp: u32,
    /// Physical damage dealt by a basic attack.
    pub attack: u32,
    /// Flat damage reduction from armor.
    pub defense: u32,
    /// Chance to fully dodge a physical attack, in permille.
    pub evasion_permille: u32,
}

impl DerivedStats {
    /// Recomputes every combat stat from scratch.
    ///
    /// Formulas:
    /// - `max_hp  = durability * hp_multiplier`
    /// - `max_mp  = intellect * mp_multiplier`
    /// - `attack  = strength * damage_multiplier + weapon_bonus`
    /// - `defense = armor_bonus`
    /// - `evasion = base_evasion * dexterity / 10`
    pub fn compute(
        attributes: &CoreAttributes,
        multipliers: &ClassMultipliers,
        weapon_bonus: u32,
        armor_bonus: u32,
        base_evasion_permille: u32,
    ) -> Self {
        Self {
            max_hp: attributes.durability * multipliers.hp,
            max_mp: attributes.intellect * multipliers.mp,
            attack: attributes.strength * multipliers.damage + weapon_bonus,
            defense: armor_bonus,
            evasion_permille: base_evasion_permille * attributes.dexterity / 10,
        }
    }
}
