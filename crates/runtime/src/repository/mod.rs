//! Save/load layer for tracker sessions.
//!
//! A [`SaveFile`] is the versioned on-disk record of a session. Repositories
//! store save files under named slots; the free functions [`write_save`] and
//! [`read_save`] handle arbitrary paths chosen by the user.

mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use file::{FileSaveRepository, SAVE_EXTENSION, read_save, write_save};
pub use memory::InMemorySaveRepository;
pub use traits::{SaveRepository, validate_slot};
pub use types::{
    CombatRecord, EntityRecord, FORMAT_VERSION, JoinRollRecord, LegacyEntity, LegacySave,
    PopulationRecord, PositionRecord, SaveFile,
};
