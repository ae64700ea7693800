//! The spell catalog and the wizard's stock.

use jrpg_core::{ClassId, Side, Spell, SpellEffect};

pub fn heal() -> Spell {
    Spell {
        name: "Heal".into(),
        cost: 50,
        mp_cost: 5,
        info: "Restore 5 HP".into(),
        class: Some(ClassId::Healer),
        side: Side::Player,
        effect: SpellEffect::Heal(5),
    }
}

pub fn fireball() -> Spell {
    Spell {
        name: "Fireball".into(),
        cost: 50,
        mp_cost: 10,
        info: "Deal 15 points of damage".into(),
        class: Some(ClassId::Mage),
        side: Side::Npc,
        effect: SpellEffect::Damage(15),
    }
}

pub fn lightning() -> Spell {
    Spell {
        name: "Lightning".into(),
        cost: 100,
        mp_cost: 20,
        info: "Deal 25 points of damage".into(),
        class: Some(ClassId::Mage),
        side: Side::Npc,
        effect: SpellEffect::Damage(25),
    }
}

/// NPC-only breath attack; bypasses armor entirely.
pub fn fire_breath() -> Spell {
    Spell {
        name: "Fire breath".into(),
        cost: 0,
        mp_cost: 10,
        info: "Deal 15 points of damage".into(),
        class: None,
        side: Side::Player,
        effect: SpellEffect::MagicDamage(15),
    }
}

/// What the wizard teaches for gold, in menu order.
pub fn wizard_stock() -> Vec<Spell> {
    vec![heal(), fireball(), lightning()]
}
