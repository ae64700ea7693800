//! Static game content: catalogs, registries, and the world atlas.
//!
//! Everything the engine reads through an oracle at runtime is defined here
//! as plain data constructors over `jrpg-core` types:
//! - item and spell catalogs (including the trader's and wizard's stock)
//! - NPC templates behind [`NpcRegistry`]
//! - map geometry behind [`WorldAtlas`]
//! - menu text behind [`EnglishStrings`]
//! - the starting party
//!
//! Content never appears in saved state; saves reference it by id or kind
//! and resolve through the oracles on load.

pub mod items;
pub mod maps;
pub mod npcs;
pub mod party;
pub mod spells;
pub mod strings;

pub use maps::WorldAtlas;
pub use npcs::NpcRegistry;
pub use party::starting_party;
pub use strings::EnglishStrings;
