//! Engine-level errors.

use jrpg_core::{BattleError, MapId, OracleError};

use crate::repository::RepositoryError;

/// Errors surfaced by the frame loop and state transitions.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Battle(#[from] BattleError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("map {0} is not known to the map oracle")]
    UnknownMap(MapId),
}

pub type Result<T> = std::result::Result<T, EngineError>;
