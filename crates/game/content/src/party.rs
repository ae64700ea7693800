//! The starting party roster.

use jrpg_core::{ClassId, CoreAttributes, GameConfig, PartyMember, PlayerParty};

use crate::{items, spells};

/// Builds the new-game party: four level-1 members with basic equipment,
/// a couple of emergency items, and a little pocket money.
pub fn starting_party(config: &GameConfig) -> PlayerParty {
    let member = |name: &str, class, attributes| {
        PartyMember::new(name, class, attributes, items::knife(), items::coat(), config)
    };

    let cid = member("Cid", ClassId::Warrior, CoreAttributes::new(10, 10, 15, 15));
    let karos = member("Karos", ClassId::Mage, CoreAttributes::new(15, 5, 10, 10));
    let mut rilay = member("Rilay", ClassId::Healer, CoreAttributes::new(15, 5, 10, 5));
    rilay.learn_spell(spells::heal());
    let jaden = member("Jaden", ClassId::Ranger, CoreAttributes::new(10, 15, 10, 10));

    PlayerParty::new(
        [cid, karos, rilay, jaden],
        vec![items::health_potion(), items::phoenix_down()],
        20,
    )
}
