//! A single player party member.

use crate::combat::{self, Combatant, HitOutcome};
use crate::config::GameConfig;
use crate::item::{Item, ItemKind};
use crate::spell::Spell;
use crate::stats::{CoreAttributes, DerivedStats};

use super::ClassId;

/// Player-controlled combatant with growth, equipment, and known spells.
///
/// Derived stats are recomputed from scratch after every level-up and every
/// equipment change. KO is not stored: it is `hp == 0` by construction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartyMember {
    name: String,
    class: ClassId,
    attributes: CoreAttributes,
    level: u32,
    max_level: u32,
    exp: u32,
    /// Experience required for the next level: `level * exp_multiplier`.
    next_level_exp: u32,
    base_evasion_permille: u32,
    min_physical_damage: u32,
    derived: DerivedStats,
    hp: u32,
    mp: u32,
    weapon: Item,
    armor: Item,
    spells: Vec<Spell>,
}

impl PartyMember {
    /// Creates a fresh level-1 member with full pools.
    ///
    /// # Panics
    ///
    /// Panics if `weapon` or `armor` is not the matching equipment kind;
    /// party construction with mismatched equipment is a content bug.
    pub fn new(
        name: impl Into<String>,
        class: ClassId,
        attributes: CoreAttributes,
        weapon: Item,
        armor: Item,
        config: &GameConfig,
    ) -> Self {
        assert!(
            matches!(weapon.kind, ItemKind::Weapon { .. }),
            "member weapon slot requires a weapon item"
        );
        assert!(
            matches!(armor.kind, ItemKind::Armor { .. }),
            "member armor slot requires an armor item"
        );

        let mut member = Self {
            name: name.into(),
            class,
            attributes,
            level: 1,
            max_level: config.max_level,
            exp: 0,
            next_level_exp: class.multipliers().exp,
            base_evasion_permille: config.base_evasion_permille,
            min_physical_damage: config.min_physical_damage,
            derived: DerivedStats::default(),
            hp: 0,
            mp: 0,
            weapon,
            armor,
            spells: Vec::new(),
        };
        member.recalculate_stats();
        member
    }

    pub fn class(&self) -> ClassId {
        self.class
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn exp(&self) -> u32 {
        self.exp
    }

    pub fn attack(&self) -> u32 {
        self.derived.attack
    }

    pub fn defense(&self) -> u32 {
        self.derived.defense
    }

    pub fn evasion_permille(&self) -> u32 {
        self.derived.evasion_permille
    }

    pub fn attributes(&self) -> &CoreAttributes {
        &self.attributes
    }

    pub fn spells(&self) -> &[Spell] {
        &self.spells
    }

    pub fn weapon(&self) -> &Item {
        &self.weapon
    }

    pub fn armor(&self) -> &Item {
        &self.armor
    }

    pub fn learn_spell(&mut self, spell: Spell) {
        self.spells.push(spell);
    }

    /// Credits experience and levels up once if the threshold is reached.
    ///
    /// One level per award even when the new total crosses several
    /// thresholds. Returns true on level-up.
    pub fn add_exp(&mut self, exp: u32) -> bool {
        self.exp += exp;
        if self.exp >= self.next_level_exp && self.level < self.max_level {
            self.level_up();
            true
        } else {
            false
        }
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.next_level_exp = self.level * self.class.multipliers().exp;
        self.attributes.grow(&self.class.growth());
        self.recalculate_stats();
    }

    /// Equips a weapon, returning the previous one for the shared inventory.
    pub fn equip_weapon(&mut self, weapon: Item) -> Item {
        debug_assert!(matches!(weapon.kind, ItemKind::Weapon { .. }));
        let old = std::mem::replace(&mut self.weapon, weapon);
        self.recalculate_stats();
        old
    }

    /// Equips armor, returning the previous piece for the shared inventory.
    pub fn equip_armor(&mut self, armor: Item) -> Item {
        debug_assert!(matches!(armor.kind, ItemKind::Armor { .. }));
        let old = std::mem::replace(&mut self.armor, armor);
        self.recalculate_stats();
        old
    }

    /// Rebuilds derived stats and refills both pools.
    ///
    /// The full refill on level-up (and on equipment change, which only
    /// happens outside battle) is intentional, not a bug.
    fn recalculate_stats(&mut self) {
        let weapon_bonus = match self.weapon.kind {
            ItemKind::Weapon { damage } => damage,
            _ => 0,
        };
        let armor_bonus = match self.armor.kind {
            ItemKind::Armor { defense } => defense,
            _ => 0,
        };
        self.derived = DerivedStats::compute(
            &self.attributes,
            &self.class.multipliers(),
            weapon_bonus,
            armor_bonus,
            self.base_evasion_permille,
        );
        self.hp = self.derived.max_hp;
        self.mp = self.derived.max_mp;
    }

    /// Physical damage intake: evasion roll first, then defense reduction
    /// floored at the configured minimum. `roll_permille` is the caller's
    /// deterministic roll.
    pub fn take_physical_hit(&mut self, incoming: u32, roll_permille: u32) -> HitOutcome {
        if combat::is_dodge(roll_permille, self.derived.evasion_permille) {
            return HitOutcome::Dodged;
        }
        let damage =
            combat::physical_damage_taken(incoming, self.derived.defense, self.min_physical_damage);
        self.lose_hp(damage)
    }

    fn lose_hp(&mut self, damage: u32) -> HitOutcome {
        if damage >= self.hp {
            self.hp = 0;
            HitOutcome::Hit {
                damage,
                knocked_out: true,
            }
        } else {
            self.hp -= damage;
            HitOutcome::Hit {
                damage,
                knocked_out: false,
            }
        }
    }
}

impl Combatant for PartyMember {
    fn name(&self) -> &str {
        &self.name
    }

    fn hp(&self) -> u32 {
        self.hp
    }

    fn max_hp(&self) -> u32 {
        self.derived.max_hp
    }

    fn mp(&self) -> u32 {
        self.mp
    }

    fn max_mp(&self) -> u32 {
        self.derived.max_mp
    }

    fn heal(&mut self, amount: u32) {
        if !self.is_ko() {
            self.hp = (self.hp + amount).min(self.derived.max_hp);
        }
    }

    fn restore_mp(&mut self, amount: u32) {
        self.mp = (self.mp + amount).min(self.derived.max_mp);
    }

    fn spend_mp(&mut self, amount: u32) {
        debug_assert!(self.mp >= amount, "mana was checked before casting");
        self.mp = self.mp.saturating_sub(amount);
    }

    fn revive(&mut self, hp: u32) {
        if self.is_ko() {
            self.hp = hp.clamp(1, self.derived.max_hp);
        }
    }

    fn take_magic_damage(&mut self, amount: u32) -> HitOutcome {
        // Bypasses evasion and defense, same floor/KO behavior.
        self.lose_hp(amount.max(1))
    }

    fn take_flat_damage(&mut self, amount: u32) -> HitOutcome {
        self.lose_hp(amount.max(1))
    }
}
