//! Traits describing read-only boundary collaborators.
//!
//! Oracles expose map geometry, localized strings, persistent settings, NPC
//! templates, and deterministic random rolls. The [`Env`] aggregate bundles
//! them so game states and the battle machine can reach everything they need
//! without hard coupling to concrete implementations.
mod error;
mod map;
mod npc_oracle;
mod rng;
mod settings;
mod strings;

pub use error::OracleError;
pub use map::{MapDefinition, MapId, NpcSpawn, Rect, SpawnKind, TeleportDef, WorldKind};
pub use npc_oracle::NpcOracle;
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use settings::SettingsOracle;
pub use strings::StringsOracle;

/// Aggregates the read-only oracles required by states and the battle model.
///
/// Each slot is optional so tests can build an environment with exactly the
/// collaborators a scenario exercises; accessing a missing oracle surfaces
/// [`OracleError`] instead of panicking.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    map: Option<&'a dyn MapOracle>,
    strings: Option<&'a dyn StringsOracle>,
    settings: Option<&'a dyn SettingsOracle>,
    npcs: Option<&'a dyn NpcOracle>,
    rng: Option<&'a dyn RngOracle>,
}

/// The environment handle threaded through state and battle code.
pub type GameEnv<'a> = Env<'a>;

impl<'a> Env<'a> {
    pub fn new(
        map: Option<&'a dyn MapOracle>,
        strings: Option<&'a dyn StringsOracle>,
        settings: Option<&'a dyn SettingsOracle>,
        npcs: Option<&'a dyn NpcOracle>,
        rng: Option<&'a dyn RngOracle>,
    ) -> Self {
        Self {
            map,
            strings,
            settings,
            npcs,
            rng,
        }
    }

    pub fn with_all(
        map: &'a dyn MapOracle,
        strings: &'a dyn StringsOracle,
        settings: &'a dyn SettingsOracle,
        npcs: &'a dyn NpcOracle,
        rng: &'a dyn RngOracle,
    ) -> Self {
        Self::new(Some(map), Some(strings), Some(settings), Some(npcs), Some(rng))
    }

    pub fn empty() -> Self {
        Self {
            map: None,
            strings: None,
            settings: None,
            npcs: None,
            rng: None,
        }
    }

    /// Returns the map oracle, or an error if not available.
    pub fn map(&self) -> Result<&'a dyn MapOracle, OracleError> {
        self.map.ok_or(OracleError::MapNotAvailable)
    }

    /// Returns the strings oracle, or an error if not available.
    pub fn strings(&self) -> Result<&'a dyn StringsOracle, OracleError> {
        self.strings.ok_or(OracleError::StringsNotAvailable)
    }

    /// Returns the settings oracle, or an error if not available.
    ///
    /// The settings it exposes (screen size, rendering toggles) belong to
    /// the embedding display layer; game states carry the handle but do
    /// not read it themselves.
    pub fn settings(&self) -> Result<&'a dyn SettingsOracle, OracleError> {
        self.settings.ok_or(OracleError::SettingsNotAvailable)
    }

    /// Returns the NPC template oracle, or an error if not available.
    pub fn npcs(&self) -> Result<&'a dyn NpcOracle, OracleError> {
        self.npcs.ok_or(OracleError::NpcsNotAvailable)
    }

    /// Returns the RNG oracle, or an error if not available.
    pub fn rng(&self) -> Result<&'a dyn RngOracle, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }
}

/// Read-only access to map data: colliders, teleports, and NPC spawns.
///
/// Implementations own whatever backing store they like (generated fixtures,
/// files, an editor); the engine only sees [`MapDefinition`] values.
pub trait MapOracle {
    /// Returns the definition for a map, or `None` for an unknown id.
    fn map(&self, id: &MapId) -> Option<MapDefinition>;
}
