//! Victory rewards, fixed once at battle entry.

use crate::env::{RngOracle, compute_seed};
use crate::item::Item;
use crate::npc::NpcTemplate;

/// Accumulated gold, experience, and loot for a whole encounter.
///
/// Summed and rolled once when the battle starts, not per NPC death, so the
/// payout is fixed up front and delivered only on victory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleRewards {
    pub gold: u32,
    pub exp: u32,
    pub loot: Vec<Item>,
}

impl BattleRewards {
    /// Rolls the encounter rewards from the NPC templates.
    ///
    /// Loot rolls consume one RNG context per table entry, keyed off the
    /// battle seed, so a replay from the same seed drops the same items.
    pub fn accumulate(templates: &[NpcTemplate], rng: &dyn RngOracle, battle_seed: u64) -> Self {
        let mut rewards = BattleRewards::default();
        let mut roll_index = 0u64;

        for template in templates {
            rewards.gold += template.gold_reward;
            rewards.exp += template.exp_reward;
            for entry in &template.loot {
                let roll = rng.roll_permille(compute_seed(battle_seed, roll_index, 0));
                roll_index += 1;
                if roll < entry.rate_permille {
                    rewards.loot.push(entry.item.clone());
                }
            }
        }

        rewards
    }
}
