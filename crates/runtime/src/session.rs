//! The player session: everything that survives across states.

use jrpg_core::{GameConfig, PlayerParty};

/// Mutable cross-state game data, owned by the game loop and lent to each
/// state call. States read and write the party; the stack machinery never
/// touches it.
#[derive(Clone, Debug)]
pub struct Session {
    pub party: PlayerParty,
    pub config: GameConfig,
    /// Seed fixed at new-game time; every random event derives from it.
    pub game_seed: u64,
}

impl Session {
    pub fn new(party: PlayerParty, config: GameConfig, game_seed: u64) -> Self {
        Self {
            party,
            config,
            game_seed,
        }
    }

    /// Fresh new-game session with the starting party.
    pub fn new_game(config: GameConfig, game_seed: u64) -> Self {
        Self::new(jrpg_content::starting_party(&config), config, game_seed)
    }
}
