//! Aggregate tracker state.
//!
//! [`TrackerState`] is the unit the runtime snapshots for undo/redo and
//! converts into save records. It is mutated only through the model APIs.
pub mod types;

pub use types::{Color, EntityId, ParseColorError, Tick};

use crate::combat::Combat;
use crate::config::CombatRules;
use crate::population::Population;

/// Everything a session tracks: who is present and where they stand in combat.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackerState {
    pub population: Population,
    pub combat: Combat,
}

impl TrackerState {
    pub fn new(rules: CombatRules) -> Self {
        Self {
            population: Population::new(),
            combat: Combat::new(rules),
        }
    }

    /// Display name for an entity, falling back to its id when unknown.
    pub fn display_name(&self, id: EntityId) -> String {
        self.population
            .get(id)
            .map(|entity| entity.name().to_string())
            .unwrap_or_else(|| id.to_string())
    }
}
