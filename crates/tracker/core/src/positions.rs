//! Sparse tick timeline.
//!
//! Entities map to a non-negative tick; the reverse index keeps, for every
//! occupied tick, the entities standing there in arrival order. Empty ticks
//! are never stored, so the first key of the reverse index is always the
//! current tick.
use std::collections::{BTreeMap, HashMap};

use crate::error::{ErrorSeverity, TrackerError};
use crate::state::{EntityId, Tick};

/// Errors raised by the position model.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("entity {0} is already on the timeline")]
    AlreadyPlaced(EntityId),

    #[error("entity {0} is not on the timeline")]
    NotPlaced(EntityId),
}

impl TrackerError for PositionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyPlaced(_) => "POSITION_ALREADY_PLACED",
            Self::NotPlaced(_) => "POSITION_NOT_PLACED",
        }
    }
}

/// Outcome of a single timeline mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionChange {
    pub entity: EntityId,
    /// Tick before the mutation (`None` if the entity was not placed).
    pub from: Option<Tick>,
    /// Tick after the mutation (`None` if the entity was removed).
    pub to: Option<Tick>,
    pub current_before: Option<Tick>,
    pub current_after: Option<Tick>,
}

impl PositionChange {
    /// True when the mutation moved the current (minimum occupied) tick.
    pub fn current_changed(&self) -> bool {
        self.current_before != self.current_after
    }

    /// True when the entity actually changed tick.
    pub fn moved(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickPositions {
    by_entity: HashMap<EntityId, Tick>,
    by_tick: BTreeMap<Tick, Vec<EntityId>>,
}

impl TickPositions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places an entity that is not yet on the timeline.
    pub fn insert(&mut self, entity: EntityId, tick: Tick) -> Result<PositionChange, PositionError> {
        if self.by_entity.contains_key(&entity) {
            return Err(PositionError::AlreadyPlaced(entity));
        }
        let current_before = self.current_tick();
        self.attach(entity, tick);
        Ok(PositionChange {
            entity,
            from: None,
            to: Some(tick),
            current_before,
            current_after: self.current_tick(),
        })
    }

    /// Moves a placed entity to the back of the line at `tick`.
    ///
    /// Moving to the tick the entity already occupies keeps its place.
    pub fn move_to(&mut self, entity: EntityId, tick: Tick) -> Result<PositionChange, PositionError> {
        let from = *self
            .by_entity
            .get(&entity)
            .ok_or(PositionError::NotPlaced(entity))?;
        let current_before = self.current_tick();
        if from != tick {
            self.detach(entity, from);
            self.attach(entity, tick);
        }
        Ok(PositionChange {
            entity,
            from: Some(from),
            to: Some(tick),
            current_before,
            current_after: self.current_tick(),
        })
    }

    /// Places or moves an entity, whichever applies.
    pub fn place(&mut self, entity: EntityId, tick: Tick) -> PositionChange {
        match self.move_to(entity, tick) {
            Ok(change) => change,
            Err(_) => {
                let current_before = self.current_tick();
                self.attach(entity, tick);
                PositionChange {
                    entity,
                    from: None,
                    to: Some(tick),
                    current_before,
                    current_after: self.current_tick(),
                }
            }
        }
    }

    /// Removes an entity from the timeline. `None` if it was not placed.
    pub fn remove(&mut self, entity: EntityId) -> Option<PositionChange> {
        let current_before = self.current_tick();
        let from = self.by_entity.get(&entity).copied()?;
        self.detach(entity, from);
        Some(PositionChange {
            entity,
            from: Some(from),
            to: None,
            current_before,
            current_after: self.current_tick(),
        })
    }

    pub fn tick_of(&self, entity: EntityId) -> Option<Tick> {
        self.by_entity.get(&entity).copied()
    }

    pub fn entities_at(&self, tick: Tick) -> &[EntityId] {
        self.by_tick.get(&tick).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Minimum occupied tick.
    pub fn current_tick(&self) -> Option<Tick> {
        self.by_tick.keys().next().copied()
    }

    /// Entities standing on the current tick, in arrival order.
    pub fn acting_now(&self) -> &[EntityId] {
        self.by_tick
            .values()
            .next()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_acting(&self, entity: EntityId) -> bool {
        self.acting_now().contains(&entity)
    }

    /// Occupied ticks in ascending order with their entities.
    pub fn iter(&self) -> impl Iterator<Item = (Tick, &[EntityId])> {
        self.by_tick
            .iter()
            .map(|(tick, entities)| (*tick, entities.as_slice()))
    }

    /// Every placed entity, in timeline order.
    pub fn ordered(&self) -> impl Iterator<Item = (Tick, EntityId)> + '_ {
        self.iter()
            .flat_map(|(tick, entities)| entities.iter().map(move |e| (tick, *e)))
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.by_entity.contains_key(&entity)
    }

    pub fn len(&self) -> usize {
        self.by_entity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_entity.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_entity.clear();
        self.by_tick.clear();
    }

    fn attach(&mut self, entity: EntityId, tick: Tick) {
        self.by_entity.insert(entity, tick);
        self.by_tick.entry(tick).or_default().push(entity);
    }

    fn detach(&mut self, entity: EntityId, tick: Tick) {
        self.by_entity.remove(&entity);
        if let Some(bucket) = self.by_tick.get_mut(&tick) {
            bucket.retain(|e| *e != entity);
            if bucket.is_empty() {
                self.by_tick.remove(&tick);
            }
        }
    }
}
