//! Save-game persistence.
//!
//! Saves are bincode blobs in numbered slot files. File writes go through a
//! temp file and an atomic rename so a crash mid-write can never corrupt an
//! existing save.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use jrpg_core::PlayerParty;

use crate::state::StateSnapshot;

/// Errors from the save repository.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("save slot {0} is empty")]
    SlotEmpty(u8),
}

/// Everything needed to resume a game: the party and the whole state
/// stack, bottom to top, as snapshots. A mid-battle save carries the
/// battle machine inside its snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveGame {
    pub party: PlayerParty,
    pub game_seed: u64,
    pub stack: Vec<StateSnapshot>,
}

/// Storage backend for save slots.
pub trait SaveRepository {
    fn save(&self, slot: u8, save: &SaveGame) -> Result<(), RepositoryError>;
    fn load(&self, slot: u8) -> Result<SaveGame, RepositoryError>;
    fn exists(&self, slot: u8) -> bool;
}

/// Slot files (`slot_1.sav`, ...) under a save directory.
#[derive(Clone, Debug)]
pub struct FileSaveRepository {
    dir: PathBuf,
}

impl FileSaveRepository {
    /// Creates the repository, making the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn slot_path(&self, slot: u8) -> PathBuf {
        self.dir.join(format!("slot_{slot}.sav"))
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), RepositoryError> {
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl SaveRepository for FileSaveRepository {
    fn save(&self, slot: u8, save: &SaveGame) -> Result<(), RepositoryError> {
        let bytes = bincode::serialize(save)?;
        let path = self.slot_path(slot);
        self.write_atomic(&path, &bytes)?;
        tracing::info!(slot, path = %path.display(), "game saved");
        Ok(())
    }

    fn load(&self, slot: u8) -> Result<SaveGame, RepositoryError> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Err(RepositoryError::SlotEmpty(slot));
        }
        let bytes = fs::read(&path)?;
        let save = bincode::deserialize(&bytes)?;
        tracing::info!(slot, "game loaded");
        Ok(save)
    }

    fn exists(&self, slot: u8) -> bool {
        self.slot_path(slot).exists()
    }
}

/// In-memory slots for tests and demos. Serializes through the same codec
/// as the file backend so format problems surface in tests too.
#[derive(Debug, Default)]
pub struct MemorySaveRepository {
    slots: Mutex<HashMap<u8, Vec<u8>>>,
}

impl MemorySaveRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveRepository for MemorySaveRepository {
    fn save(&self, slot: u8, save: &SaveGame) -> Result<(), RepositoryError> {
        let bytes = bincode::serialize(save)?;
        self.slots.lock().unwrap().insert(slot, bytes);
        Ok(())
    }

    fn load(&self, slot: u8) -> Result<SaveGame, RepositoryError> {
        let slots = self.slots.lock().unwrap();
        let bytes = slots.get(&slot).ok_or(RepositoryError::SlotEmpty(slot))?;
        Ok(bincode::deserialize(bytes)?)
    }

    fn exists(&self, slot: u8) -> bool {
        self.slots.lock().unwrap().contains_key(&slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jrpg_core::GameConfig;

    fn sample_save() -> SaveGame {
        SaveGame {
            party: jrpg_content::starting_party(&GameConfig::default()),
            game_seed: 42,
            stack: vec![
                StateSnapshot::Splash,
                StateSnapshot::MainMenu,
                StateSnapshot::Map {
                    map: jrpg_core::MapId::new("overworld"),
                    world: jrpg_core::WorldKind::Overworld,
                    x: 400,
                    y: 400,
                },
            ],
        }
    }

    #[test]
    fn file_repository_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path()).unwrap();
        let save = sample_save();

        assert!(!repo.exists(1));
        repo.save(1, &save).unwrap();
        assert!(repo.exists(1));
        assert_eq!(repo.load(1).unwrap(), save);
    }

    #[test]
    fn empty_slot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path()).unwrap();
        assert!(matches!(repo.load(3), Err(RepositoryError::SlotEmpty(3))));
    }

    #[test]
    fn saving_twice_overwrites() {
        let repo = MemorySaveRepository::new();
        let mut save = sample_save();
        repo.save(1, &save).unwrap();

        save.party.gold = 999;
        repo.save(1, &save).unwrap();
        assert_eq!(repo.load(1).unwrap().party.gold, 999);
    }
}
