//! Inventory items: weapons, armor, and usables.

use crate::combat::Combatant;

/// Which party a spell or usable item may target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Player,
    Npc,
}

/// Stable tag on a one-time NPC battle. Defeated ids go into the party's
/// registry so the encounter never respawns on revisiting the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterId(pub u32);

/// Effect of a usable item when applied to an eligible target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UsableEffect {
    RestoreHp(u32),
    RestoreMp(u32),
    /// Brings a KO'd member back at half maximum HP.
    Revive,
}

/// What an item is, with its combat-relevant payload.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    /// Added to the wielder's physical damage.
    Weapon { damage: u32 },
    /// Flat damage reduction while worn.
    Armor { defense: u32 },
    /// One-shot consumable applied to a target on the given side.
    Usable { effect: UsableEffect, side: Side },
}

/// Immutable inventory item. Only inventory membership changes over time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub name: String,
    /// Trade price in gold.
    pub cost: u32,
    pub info: String,
    pub kind: ItemKind,
}

impl Item {
    pub fn new(name: impl Into<String>, cost: u32, info: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            cost,
            info: info.into(),
            kind,
        }
    }

    pub fn is_usable(&self) -> bool {
        matches!(self.kind, ItemKind::Usable { .. })
    }

    /// Target side of a usable item, `None` for equipment.
    pub fn usable_side(&self) -> Option<Side> {
        match self.kind {
            ItemKind::Usable { side, .. } => Some(side),
            _ => None,
        }
    }

    /// Whether the usable effect would do anything to this target.
    ///
    /// Equipment is never "appliable"; the battle menu only offers usables.
    pub fn check_appliable(&self, target: &dyn Combatant) -> bool {
        match self.kind {
            ItemKind::Usable { effect, .. } => match effect {
                UsableEffect::RestoreHp(_) => !target.is_ko() && target.hp() < target.max_hp(),
                UsableEffect::RestoreMp(_) => !target.is_ko() && target.mp() < target.max_mp(),
                UsableEffect::Revive => target.is_ko(),
            },
            _ => false,
        }
    }

    /// Applies the usable effect. Caller has verified `check_appliable`.
    pub fn apply_effect(&self, target: &mut dyn Combatant) {
        if let ItemKind::Usable { effect, .. } = self.kind {
            match effect {
                UsableEffect::RestoreHp(amount) => target.heal(amount),
                UsableEffect::RestoreMp(amount) => target.restore_mp(amount),
                UsableEffect::Revive => {
                    let hp = (target.max_hp() / 2).max(1);
                    target.revive(hp);
                }
            }
        }
    }
}

/// Shop-menu formatting: `Knife (+2)`, `Coat (+2)`, `Potion (50 G)`.
impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ItemKind::Weapon { damage } => write!(f, "{} (+{})", self.name, damage),
            ItemKind::Armor { defense } => write!(f, "{} (+{})", self.name, defense),
            ItemKind::Usable { .. } => write!(f, "{} ({} G)", self.name, self.cost),
        }
    }
}
