//! Engine-wide balance and sizing constants.

/// Tunable rule constants shared by the party model and the battle machine.
///
/// A single instance is created at startup and handed to whichever layer
/// needs it; the defaults are the shipped game balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Level cap for player members.
    pub max_level: u32,

    /// Base evasion chance in permille, scaled by dexterity / 10.
    pub base_evasion_permille: u32,

    /// Floor for physical damage after defense reduction. Armor can never
    /// absorb a hit completely; evasion is the only full dodge.
    pub min_physical_damage: u32,

    /// Pause between NPC turns so the player can read the status line,
    /// in milliseconds. The battle scene counts this down without blocking
    /// the frame loop.
    pub npc_turn_delay_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_level: 25,
            base_evasion_permille: 50,
            min_physical_damage: 1,
            npc_turn_delay_ms: 900,
        }
    }
}
