//! Two-phase combat model layered over the tick timeline.
//!
//! During the join phase participants declare their join battle successes.
//! Beginning combat converts those rolls into starting ticks; from then on
//! entities act on the current tick and move forward by the speed of their
//! action.
use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::config::CombatRules;
use crate::error::{ErrorSeverity, TrackerError};
use crate::positions::{PositionChange, PositionError, TickPositions};
use crate::state::{EntityId, Tick};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatPhase {
    /// Participants are rolling join battle; the timeline is empty.
    #[default]
    #[strum(serialize = "join")]
    Join,
    /// Entities act in tick order.
    #[strum(serialize = "combat")]
    Combat,
}

/// Errors raised by combat operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("operation requires the {expected} phase but combat is in the {actual} phase")]
    WrongPhase {
        expected: CombatPhase,
        actual: CombatPhase,
    },

    #[error("nobody has rolled join battle")]
    NoParticipants,

    #[error("entity {entity} is not acting on the current tick")]
    NotActing { entity: EntityId },

    #[error("action speed must be at least 1")]
    InvalidSpeed,

    #[error("a pool of {dice} dice is larger than the limit of {max}")]
    PoolTooLarge { dice: u32, max: u32 },

    #[error(transparent)]
    Position(#[from] PositionError),
}

impl TrackerError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::WrongPhase { .. } | Self::NoParticipants | Self::NotActing { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::InvalidSpeed | Self::PoolTooLarge { .. } => ErrorSeverity::Validation,
            Self::Position(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::WrongPhase { .. } => "COMBAT_WRONG_PHASE",
            Self::NoParticipants => "COMBAT_NO_PARTICIPANTS",
            Self::NotActing { .. } => "COMBAT_NOT_ACTING",
            Self::InvalidSpeed => "COMBAT_INVALID_SPEED",
            Self::PoolTooLarge { .. } => "COMBAT_POOL_TOO_LARGE",
            Self::Position(e) => e.error_code(),
        }
    }
}

/// Starting position assigned to a participant when combat begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub entity: EntityId,
    pub successes: u32,
    pub tick: Tick,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Combat {
    phase: CombatPhase,
    rules: CombatRules,
    positions: TickPositions,
    join_rolls: BTreeMap<EntityId, u32>,
}

impl Combat {
    pub fn new(rules: CombatRules) -> Self {
        Self {
            phase: CombatPhase::Join,
            rules,
            positions: TickPositions::new(),
            join_rolls: BTreeMap::new(),
        }
    }

    /// Rebuilds a combat from persisted parts.
    ///
    /// `placements` must be in timeline order so that arrival order within a
    /// tick survives the round trip.
    pub fn restore(
        phase: CombatPhase,
        rules: CombatRules,
        join_rolls: BTreeMap<EntityId, u32>,
        placements: impl IntoIterator<Item = (Tick, EntityId)>,
    ) -> Result<Self, CombatError> {
        let mut positions = TickPositions::new();
        for (tick, entity) in placements {
            positions.insert(entity, tick)?;
        }
        Ok(Self {
            phase,
            rules,
            positions,
            join_rolls,
        })
    }

    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    pub fn rules(&self) -> CombatRules {
        self.rules
    }

    pub fn positions(&self) -> &TickPositions {
        &self.positions
    }

    pub fn join_rolls(&self) -> &BTreeMap<EntityId, u32> {
        &self.join_rolls
    }

    pub fn join_roll(&self, entity: EntityId) -> Option<u32> {
        self.join_rolls.get(&entity).copied()
    }

    /// Join rolls best first, ties broken by id. This is the order combat
    /// begins in, so it is also the order the join phase is listed in.
    pub fn ranked_rolls(&self) -> Vec<(EntityId, u32)> {
        let mut order: Vec<_> = self
            .join_rolls
            .iter()
            .map(|(entity, successes)| (*entity, *successes))
            .collect();
        order.sort_by_key(|(entity, successes)| (Reverse(*successes), *entity));
        order
    }

    pub fn current_tick(&self) -> Option<Tick> {
        self.positions.current_tick()
    }

    pub fn acting_now(&self) -> &[EntityId] {
        self.positions.acting_now()
    }

    /// True if the entity rolled join battle or stands on the timeline.
    pub fn is_participant(&self, entity: EntityId) -> bool {
        self.join_rolls.contains_key(&entity) || self.positions.contains(entity)
    }

    /// Records (or replaces) a join battle result. Returns the previous roll.
    pub fn record_join_roll(
        &mut self,
        entity: EntityId,
        successes: u32,
    ) -> Result<Option<u32>, CombatError> {
        self.require(CombatPhase::Join)?;
        Ok(self.join_rolls.insert(entity, successes))
    }

    /// Drops a join battle result. Returns the dropped roll.
    pub fn withdraw(&mut self, entity: EntityId) -> Result<Option<u32>, CombatError> {
        self.require(CombatPhase::Join)?;
        Ok(self.join_rolls.remove(&entity))
    }

    /// Converts join rolls into starting ticks and enters the combat phase.
    pub fn begin_combat(&mut self) -> Result<Vec<Placement>, CombatError> {
        self.require(CombatPhase::Join)?;
        let best = *self
            .join_rolls
            .values()
            .max()
            .ok_or(CombatError::NoParticipants)?;

        let order = self.ranked_rolls();

        self.positions.clear();
        let placements: Vec<_> = order
            .into_iter()
            .map(|(entity, successes)| {
                let offset = u64::from(best - successes).min(self.rules.max_join_offset);
                let tick = Tick(offset);
                self.positions.place(entity, tick);
                Placement {
                    entity,
                    successes,
                    tick,
                }
            })
            .collect();

        self.phase = CombatPhase::Combat;
        tracing::debug!(
            "combat: began with {} participants (best roll {})",
            placements.len(),
            best
        );
        Ok(placements)
    }

    /// Leaves the combat phase, clearing the timeline and all rolls.
    pub fn end_combat(&mut self) -> Result<(), CombatError> {
        self.require(CombatPhase::Combat)?;
        self.positions.clear();
        self.join_rolls.clear();
        self.phase = CombatPhase::Join;
        tracing::debug!("combat: ended");
        Ok(())
    }

    /// Moves an entity that is acting now forward by `speed` ticks.
    pub fn act(&mut self, entity: EntityId, speed: u64) -> Result<PositionChange, CombatError> {
        self.require(CombatPhase::Combat)?;
        if speed == 0 {
            return Err(CombatError::InvalidSpeed);
        }
        let current = match self.positions.current_tick() {
            Some(tick) if self.positions.is_acting(entity) => tick,
            _ => return Err(CombatError::NotActing { entity }),
        };
        Ok(self.positions.move_to(entity, current + speed)?)
    }

    /// Adds a latecomer while combat is already running.
    ///
    /// The entity enters `max_join_offset - successes` ticks after the current
    /// tick (tick 0 when nobody is on the timeline).
    pub fn join_in_progress(
        &mut self,
        entity: EntityId,
        successes: u32,
    ) -> Result<PositionChange, CombatError> {
        self.require(CombatPhase::Combat)?;
        let base = self.positions.current_tick().unwrap_or(Tick::ZERO);
        let offset = self
            .rules
            .max_join_offset
            .saturating_sub(u64::from(successes));
        let change = self.positions.insert(entity, base + offset)?;
        self.join_rolls.insert(entity, successes);
        Ok(change)
    }

    /// Places an entity on an arbitrary tick (storyteller override).
    pub fn set_tick(&mut self, entity: EntityId, tick: Tick) -> Result<PositionChange, CombatError> {
        self.require(CombatPhase::Combat)?;
        Ok(self.positions.place(entity, tick))
    }

    /// Removes every trace of an entity from combat. Valid in either phase.
    ///
    /// Returns the timeline change if the entity was placed.
    pub fn forget(&mut self, entity: EntityId) -> Option<PositionChange> {
        self.join_rolls.remove(&entity);
        self.positions.remove(entity)
    }

    fn require(&self, expected: CombatPhase) -> Result<(), CombatError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(CombatError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }
}
