//! NPC template registry.

use jrpg_core::{NpcKind, NpcOracle, NpcPolicy, NpcTemplate};

use crate::{items, spells};

/// Resolves [`NpcKind`] tags from map data into battle-ready templates.
#[derive(Clone, Copy, Debug, Default)]
pub struct NpcRegistry;

impl NpcRegistry {
    pub fn new() -> Self {
        Self
    }
}

impl NpcOracle for NpcRegistry {
    fn template(&self, kind: NpcKind) -> Option<NpcTemplate> {
        let template = match kind {
            NpcKind::Slime => NpcTemplate::builder(NpcKind::Slime, "Slime")
                .pools(100, 0)
                .attack(5)
                .rewards(15, 30)
                .loot(items::mana_potion(), 250)
                .policy(NpcPolicy::AttackFirstAlive)
                .build(),
            NpcKind::FireElemental => NpcTemplate::builder(NpcKind::FireElemental, "Fire elemental")
                .pools(50, 20)
                .attack(5)
                .rewards(10, 30)
                .loot(items::fire_blade(), 100)
                .spell(spells::fire_breath())
                .policy(NpcPolicy::SpellLowestHp)
                .build(),
        };
        Some(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_resolves() {
        let registry = NpcRegistry::new();
        for kind in [NpcKind::Slime, NpcKind::FireElemental] {
            let template = registry.template(kind).unwrap();
            assert_eq!(template.kind, kind);
            assert!(template.max_hp > 0);
        }
    }

    #[test]
    fn elemental_can_afford_two_breaths() {
        let registry = NpcRegistry::new();
        let template = registry.template(NpcKind::FireElemental).unwrap();
        let breath = &template.spells[0];
        assert_eq!(template.max_mp / breath.mp_cost, 2);
    }
}
