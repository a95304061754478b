//! Bookkeeping models for tracking Exalted combat ticks.
//!
//! `tracker-core` defines the canonical data (entities, the population, the
//! sparse tick timeline and the two-phase combat model) and exposes pure APIs
//! that never perform I/O. The runtime crate wraps these models in a session
//! that publishes change events; every mutator here returns a change value
//! describing what happened so the caller can decide what to announce.
pub mod combat;
pub mod config;
pub mod dice;
pub mod entity;
pub mod error;
pub mod history;
pub mod population;
pub mod positions;
pub mod state;

pub use combat::{Combat, CombatError, CombatPhase, Placement};
pub use config::CombatRules;
pub use entity::{ActionRecord, Entity, EntityChange, EntityError};
pub use error::{ErrorSeverity, TrackerError};
pub use history::{History, HistoryEntry};
pub use population::{Population, PopulationError, SelectionChange};
pub use positions::{PositionChange, PositionError, TickPositions};
pub use state::{Color, EntityId, ParseColorError, Tick, TrackerState};
