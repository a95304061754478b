//! Persisted record types.

mod legacy;
mod save;

pub use legacy::{LegacyEntity, LegacySave};
pub use save::{
    CombatRecord, EntityRecord, FORMAT_VERSION, JoinRollRecord, PopulationRecord, PositionRecord,
    SaveFile,
};
