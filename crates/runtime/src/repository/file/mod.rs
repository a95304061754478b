//! File-based save repository.

use std::fs;
use std::path::{Path, PathBuf};

use crate::repository::{Result, SaveFile, SaveRepository, validate_slot};

/// Extension appended to slot names on disk.
pub const SAVE_EXTENSION: &str = "tick.json";

/// Writes a save as pretty JSON, atomically replacing any existing file.
pub fn write_save(path: impl AsRef<Path>, save: &SaveFile) -> Result<()> {
    let path = path.as_ref();
    let json = save.to_json()?;

    let mut temp_path = path.as_os_str().to_owned();
    temp_path.push(".tmp");
    let temp_path = PathBuf::from(temp_path);

    fs::write(&temp_path, json)?;
    fs::rename(&temp_path, path)?;

    tracing::debug!("wrote save to {}", path.display());
    Ok(())
}

/// Reads a save of any supported version.
pub fn read_save(path: impl AsRef<Path>) -> Result<SaveFile> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let save = SaveFile::from_json(&text)?;
    tracing::debug!(
        "read save from {} ({} entities)",
        path.display(),
        save.entity_count()
    );
    Ok(save)
}

/// File-based implementation of SaveRepository.
///
/// Each slot is stored as `<slot>.tick.json` inside the base directory.
pub struct FileSaveRepository {
    base_dir: PathBuf,
}

impl FileSaveRepository {
    /// Create a repository, creating the base directory if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to a slot's save file.
    pub fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        validate_slot(slot)?;
        Ok(self.base_dir.join(format!("{}.{}", slot, SAVE_EXTENSION)))
    }
}

impl SaveRepository for FileSaveRepository {
    fn save(&self, slot: &str, save: &SaveFile) -> Result<()> {
        let path = self.slot_path(slot)?;
        write_save(&path, save)?;
        tracing::info!("saved slot '{}'", slot);
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<SaveFile>> {
        let path = self.slot_path(slot)?;
        if !path.exists() {
            return Ok(None);
        }
        read_save(&path).map(Some)
    }

    fn exists(&self, slot: &str) -> bool {
        self.slot_path(slot).map(|p| p.exists()).unwrap_or(false)
    }

    fn delete(&self, slot: &str) -> Result<()> {
        let path = self.slot_path(slot)?;
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("deleted slot '{}'", slot);
        }
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>> {
        let suffix = format!(".{}", SAVE_EXTENSION);
        let mut slots = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(slot) = filename.strip_suffix(suffix.as_str())
                && validate_slot(slot).is_ok()
            {
                slots.push(slot.to_string());
            }
        }

        slots.sort();
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryError;
    use tempfile::TempDir;
    use tracker_core::{Color, CombatRules, TrackerState};

    fn sample() -> SaveFile {
        let mut state = TrackerState::new(CombatRules::default());
        state.population.add("Ash", Color::WHITE).unwrap();
        SaveFile::capture(&state)
    }

    #[test]
    fn save_load_and_list_slots() {
        let dir = TempDir::new().unwrap();
        let repo = FileSaveRepository::new(dir.path()).unwrap();

        assert!(repo.load("session").unwrap().is_none());
        repo.save("session", &sample()).unwrap();
        repo.save("boss", &sample()).unwrap();

        assert!(repo.exists("session"));
        assert!(dir.path().join("session.tick.json").exists());
        assert!(!dir.path().join("session.tick.json.tmp").exists());
        assert_eq!(repo.list_slots().unwrap(), vec!["boss", "session"]);

        let loaded = repo.load("session").unwrap().unwrap();
        assert_eq!(loaded, sample_with_time(&loaded));

        repo.delete("boss").unwrap();
        repo.delete("boss").unwrap();
        assert_eq!(repo.list_slots().unwrap(), vec!["session"]);
    }

    fn sample_with_time(loaded: &SaveFile) -> SaveFile {
        SaveFile {
            saved_at: loaded.saved_at,
            ..sample()
        }
    }

    #[test]
    fn bad_slot_names_never_touch_disk() {
        let dir = TempDir::new().unwrap();
        let repo = FileSaveRepository::new(dir.path()).unwrap();
        assert!(matches!(
            repo.save("../escape", &sample()),
            Err(RepositoryError::InvalidSlot(_))
        ));
        assert!(!repo.exists("../escape"));
    }

    #[test]
    fn unrelated_files_are_not_slots() {
        let dir = TempDir::new().unwrap();
        let repo = FileSaveRepository::new(dir.path()).unwrap();
        fs::write(dir.path().join("notes.txt"), "hi").unwrap();
        fs::write(dir.path().join("bad name.tick.json"), "{}").unwrap();
        assert!(repo.list_slots().unwrap().is_empty());
    }

    #[test]
    fn write_and_read_arbitrary_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        write_save(&path, &sample()).unwrap();
        let state = read_save(&path).unwrap().into_state().unwrap();
        assert_eq!(state.population.len(), 1);
        assert!(read_save(dir.path().join("missing.json")).is_err());
    }
}
