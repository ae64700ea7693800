//! Errors surfaced when a required oracle is missing from the environment.

/// A state or the battle model asked for a collaborator the caller did not
/// provide. This is a wiring problem, not a runtime condition, but it is
/// reported as an error so tests can build partial environments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("map oracle not available in environment")]
    MapNotAvailable,

    #[error("strings oracle not available in environment")]
    StringsNotAvailable,

    #[error("settings oracle not available in environment")]
    SettingsNotAvailable,

    #[error("NPC template oracle not available in environment")]
    NpcsNotAvailable,

    #[error("RNG oracle not available in environment")]
    RngNotAvailable,
}
