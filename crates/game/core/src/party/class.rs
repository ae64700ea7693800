//! Player character classes and their fixed growth tables.

use crate::stats::{ClassGrowth, ClassMultipliers};

/// The four party roles, in fixed turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClassId {
    Warrior,
    Mage,
    Healer,
    Ranger,
}

impl ClassId {
    /// Derived-stat scaling constants for the class.
    pub fn multipliers(&self) -> ClassMultipliers {
        match self {
            ClassId::Warrior => ClassMultipliers {
                hp: 2,
                mp: 1,
                damage: 1,
                exp: 10,
            },
            ClassId::Mage => ClassMultipliers {
                hp: 1,
                mp: 2,
                damage: 1,
                exp: 12,
            },
            ClassId::Healer => ClassMultipliers {
                hp: 1,
                mp: 2,
                damage: 1,
                exp: 12,
            },
            ClassId::Ranger => ClassMultipliers {
                hp: 2,
                mp: 1,
                damage: 2,
                exp: 10,
            },
        }
    }

    /// Attribute increments applied on every level-up.
    pub fn growth(&self) -> ClassGrowth {
        match self {
            ClassId::Warrior => ClassGrowth {
                intellect: 1,
                strength: 1,
                dexterity: 2,
                durability: 2,
            },
            ClassId::Mage | ClassId::Healer => ClassGrowth {
                intellect: 2,
                strength: 1,
                dexterity: 1,
                durability: 2,
            },
            ClassId::Ranger => ClassGrowth {
                intellect: 1,
                strength: 2,
                dexterity: 2,
                durability: 1,
            },
        }
    }
}
