//! Turn-cursor bookkeeping.
//!
//! "Who acts next" is a pure function of the current living set, recomputed
//! on every call. No iterator state survives across turns, so membership
//! changes (a KO, a revive) between advances can never desync the cycle.

use crate::combat::Combatant;
use crate::party::{PARTY_SIZE, PlayerParty};

/// Whose turn it currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnCursor {
    /// A player member is awaiting input.
    Player { member: usize },
    /// The NPC at this list position acts next.
    Npc { index: usize },
}

/// Index of the next living member strictly after `after` in fixed party
/// order, or the first living member when `after` is `None`.
///
/// Returns `None` when the pass is exhausted; the caller then switches to
/// the NPC cycle and restarts from `None` on the next pass.
pub fn next_alive(party: &PlayerParty, after: Option<usize>) -> Option<usize> {
    let start = after.map_or(0, |i| i + 1);
    (start..PARTY_SIZE).find(|&i| !party.member(i).is_ko())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Combatant;
    use crate::config::GameConfig;
    use crate::item::{Item, ItemKind};
    use crate::party::{ClassId, PartyMember};
    use crate::stats::CoreAttributes;

    fn party() -> PlayerParty {
        let config = GameConfig::default();
        let weapon = || Item::new("Knife", 8, "knife", ItemKind::Weapon { damage: 2 });
        let armor = || Item::new("Coat", 10, "coat", ItemKind::Armor { defense: 2 });
        let member = |name: &str, class| {
            PartyMember::new(
                name,
                class,
                CoreAttributes::new(10, 10, 10, 10),
                weapon(),
                armor(),
                &config,
            )
        };
        PlayerParty::new(
            [
                member("Cid", ClassId::Warrior),
                member("Karos", ClassId::Mage),
                member("Rilay", ClassId::Healer),
                member("Jaden", ClassId::Ranger),
            ],
            Vec::new(),
            0,
        )
    }

    #[test]
    fn visits_members_in_fixed_order() {
        let party = party();
        assert_eq!(next_alive(&party, None), Some(0));
        assert_eq!(next_alive(&party, Some(0)), Some(1));
        assert_eq!(next_alive(&party, Some(2)), Some(3));
        assert_eq!(next_alive(&party, Some(3)), None);
    }

    #[test]
    fn skips_members_knocked_out_mid_cycle() {
        let mut party = party();
        // Karos goes down after the pass has already started.
        party.member_mut(1).take_magic_damage(10_000);

        assert_eq!(next_alive(&party, Some(0)), Some(2));
        // A later KO of the current member does not stall the cycle.
        party.member_mut(2).take_magic_damage(10_000);
        assert_eq!(next_alive(&party, Some(2)), Some(3));
    }

    #[test]
    fn revived_member_rejoins_the_cycle() {
        let mut party = party();
        party.member_mut(1).take_magic_damage(10_000);
        assert_eq!(next_alive(&party, Some(0)), Some(2));

        party.member_mut(1).revive(5);
        assert_eq!(next_alive(&party, Some(0)), Some(1));
    }

    #[test]
    fn empty_party_yields_none() {
        let mut party = party();
        for i in 0..PARTY_SIZE {
            party.member_mut(i).take_magic_damage(10_000);
        }
        assert_eq!(next_alive(&party, None), None);
    }
}
