//! Deterministic JRPG rules shared across clients.
//!
//! `jrpg-core` defines the canonical game model: party members and NPC
//! combatants, items and spells, action-resolution math, and the turn-based
//! battle state machine. Everything here is pure and deterministic; the
//! read-only world facts a state needs (map geometry, strings, settings,
//! NPC templates, random rolls) arrive through the oracle traits in [`env`].
//! The runtime crate layers the state stack and frame loop on top.
pub mod battle;
pub mod combat;
pub mod config;
pub mod env;
pub mod item;
pub mod npc;
pub mod party;
pub mod spell;
pub mod stats;

pub use battle::{
    BattleAction, BattleCommand, BattleError, BattleEvent, BattleModel, BattleOutcome,
    BattlePhase, BattleRewards, TurnCursor, next_alive,
};
pub use combat::{Combatant, HitOutcome};
pub use config::GameConfig;
pub use env::{
    Env, GameEnv, MapDefinition, MapId, MapOracle, NpcOracle, OracleError, PcgRng, Rect,
    RngOracle, SettingsOracle, SpawnKind, NpcSpawn, StringsOracle, TeleportDef, WorldKind,
    compute_seed,
};
pub use item::{EncounterId, Item, ItemKind, Side, UsableEffect};
pub use npc::{LootEntry, Npc, NpcDecision, NpcKind, NpcPolicy, NpcTemplate};
pub use party::{ClassId, PartyMember, PlayerParty, PARTY_SIZE};
pub use spell::{Spell, SpellEffect};
pub use stats::{CoreAttributes, DerivedStats};
