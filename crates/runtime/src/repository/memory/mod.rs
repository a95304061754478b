//! In-memory save repository for tests and throwaway sessions.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::repository::{RepositoryError, Result, SaveFile, SaveRepository, validate_slot};

/// In-memory implementation of SaveRepository.
#[derive(Default)]
pub struct InMemorySaveRepository {
    saves: RwLock<BTreeMap<String, SaveFile>>,
}

impl InMemorySaveRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveRepository for InMemorySaveRepository {
    fn save(&self, slot: &str, save: &SaveFile) -> Result<()> {
        validate_slot(slot)?;
        let mut saves = self
            .saves
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        saves.insert(slot.to_string(), save.clone());
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<SaveFile>> {
        validate_slot(slot)?;
        let saves = self
            .saves
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(saves.get(slot).cloned())
    }

    fn exists(&self, slot: &str) -> bool {
        self.saves
            .read()
            .map(|saves| saves.contains_key(slot))
            .unwrap_or(false)
    }

    fn delete(&self, slot: &str) -> Result<()> {
        let mut saves = self
            .saves
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        saves.remove(slot);
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>> {
        let saves = self
            .saves
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(saves.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::{CombatRules, TrackerState};

    #[test]
    fn slots_are_independent() {
        let repo = InMemorySaveRepository::new();
        let save = SaveFile::capture(&TrackerState::new(CombatRules::default()));
        repo.save("b", &save).unwrap();
        repo.save("a", &save).unwrap();
        assert_eq!(repo.list_slots().unwrap(), vec!["a", "b"]);
        repo.delete("a").unwrap();
        assert!(!repo.exists("a"));
        assert_eq!(repo.load("b").unwrap(), Some(save));
        assert!(repo.save("no good", &SaveFile::capture(&TrackerState::default())).is_err());
    }
}
