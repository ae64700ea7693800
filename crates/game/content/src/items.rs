//! The item catalog and the trader's stock.

use jrpg_core::{Item, ItemKind, Side, UsableEffect};

pub fn knife() -> Item {
    Item::new(
        "Knife",
        8,
        "A rusty kitchen knife",
        ItemKind::Weapon { damage: 2 },
    )
}

pub fn coat() -> Item {
    Item::new(
        "Coat",
        10,
        "A worn leather coat",
        ItemKind::Armor { defense: 2 },
    )
}

pub fn fire_blade() -> Item {
    Item::new(
        "Fire Blade",
        150,
        "A sword touched by elemental fire",
        ItemKind::Weapon { damage: 10 },
    )
}

pub fn health_potion() -> Item {
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

pub fn mana_potion() -> Item {
    Item::new(
        "Mana Potion",
        40,
        "Restores 15 MP",
        ItemKind::Usable {
            effect: UsableEffect::RestoreMp(15),
            side: Side::Player,
        },
    )
}

pub fn phoenix_down() -> Item {
    Item::new(
        "Phoenix Down",
        300,
        "Revives a knocked out party member",
        ItemKind::Usable {
            effect: UsableEffect::Revive,
            side: Side::Player,
        },
    )
}

/// What the trader offers for sale, in menu order.
pub fn trader_stock() -> Vec<Item> {
    vec![
        knife(),
        coat(),
        fire_blade(),
        health_potion(),
        mana_potion(),
        phoenix_down(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_prices_match_display() {
        assert_eq!(knife().to_string(), "Knife (+2)");
        assert_eq!(health_potion().to_string(), "Health Potion (50 G)");
    }

    #[test]
    fn every_stock_entry_is_purchasable() {
        for item in trader_stock() {
            assert!(item.cost > 0, "{} has no price", item.name);
        }
    }
}
