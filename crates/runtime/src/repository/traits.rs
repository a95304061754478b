//! Repository contract for persisting tracker sessions.

use super::error::{RepositoryError, Result};
use super::types::SaveFile;

/// Repository for session saves, keyed by slot name.
///
/// Slots are short user-facing names (`session`, `boss-fight`) that map to a
/// single save file each. Saving to an existing slot replaces it.
pub trait SaveRepository: Send + Sync {
    /// Save a session under a slot
    fn save(&self, slot: &str, save: &SaveFile) -> Result<()>;

    /// Load the save stored in a slot, `None` if the slot is empty
    fn load(&self, slot: &str) -> Result<Option<SaveFile>>;

    /// Check if a slot holds a save
    fn exists(&self, slot: &str) -> bool;

    /// Delete a slot; deleting an empty slot is not an error
    fn delete(&self, slot: &str) -> Result<()>;

    /// List all occupied slots in name order
    fn list_slots(&self) -> Result<Vec<String>>;
}

/// Checks that a slot name is non-empty and only uses `[A-Za-z0-9_-]`.
pub fn validate_slot(slot: &str) -> Result<()> {
    let valid = !slot.is_empty()
        && slot
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(RepositoryError::InvalidSlot(slot.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_names_are_restricted() {
        assert!(validate_slot("session").is_ok());
        assert!(validate_slot("boss-fight_2").is_ok());
        assert!(validate_slot("").is_err());
        assert!(validate_slot("../etc").is_err());
        assert!(validate_slot("two words").is_err());
    }
}
