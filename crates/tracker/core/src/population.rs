//! The set of tracked entities and the single current selection.
use std::collections::BTreeMap;

use crate::entity::{Entity, EntityError};
use crate::error::{ErrorSeverity, TrackerError};
use crate::state::{Color, EntityId};

/// Errors raised by population bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PopulationError {
    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),

    #[error("entity {0} already exists")]
    DuplicateEntity(EntityId),

    #[error(transparent)]
    Entity(#[from] EntityError),
}

impl TrackerError for PopulationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownEntity(_) | Self::Entity(_) => ErrorSeverity::Validation,
            Self::DuplicateEntity(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEntity(_) => "POPULATION_UNKNOWN_ENTITY",
            Self::DuplicateEntity(_) => "POPULATION_DUPLICATE_ENTITY",
            Self::Entity(e) => e.error_code(),
        }
    }
}

/// Selection moved from one entity (or none) to another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: Option<EntityId>,
    pub current: Option<EntityId>,
}

/// Entities keyed by id. Ids are allocated monotonically, so id order is
/// also creation order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Population {
    entities: BTreeMap<EntityId, Entity>,
    selected: Option<EntityId>,
    next_id: u32,
}

impl Population {
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            selected: None,
            next_id: 1,
        }
    }

    /// Creates an entity and returns its freshly allocated id.
    pub fn add(&mut self, name: &str, color: Color) -> Result<EntityId, PopulationError> {
        let id = EntityId(self.next_id);
        let entity = Entity::new(id, name, color)?;
        self.next_id = self.next_id.saturating_add(1);
        self.entities.insert(id, entity);
        tracing::debug!("population: added {} as {}", self.entities[&id].name(), id);
        Ok(id)
    }

    /// Inserts an entity that already has an id (restores and loads).
    pub fn insert(&mut self, entity: Entity) -> Result<(), PopulationError> {
        let id = entity.id();
        if self.entities.contains_key(&id) {
            return Err(PopulationError::DuplicateEntity(id));
        }
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        self.entities.insert(id, entity);
        Ok(())
    }

    /// Removes an entity. Clears the selection if it pointed at the entity.
    pub fn remove(&mut self, id: EntityId) -> Result<Entity, PopulationError> {
        let entity = self
            .entities
            .remove(&id)
            .ok_or(PopulationError::UnknownEntity(id))?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        tracing::debug!("population: removed {}", id);
        Ok(entity)
    }

    /// Changes the selection. Returns `None` when nothing changed.
    pub fn select(
        &mut self,
        id: Option<EntityId>,
    ) -> Result<Option<SelectionChange>, PopulationError> {
        if let Some(id) = id
            && !self.entities.contains_key(&id)
        {
            return Err(PopulationError::UnknownEntity(id));
        }
        if self.selected == id {
            return Ok(None);
        }
        let previous = std::mem::replace(&mut self.selected, id);
        Ok(Some(SelectionChange {
            previous,
            current: id,
        }))
    }

    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    pub fn selected_entity(&self) -> Option<&Entity> {
        self.selected.and_then(|id| self.entities.get(&id))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Like [`get_mut`](Self::get_mut) but reports unknown ids as errors.
    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, PopulationError> {
        self.entities
            .get_mut(&id)
            .ok_or(PopulationError::UnknownEntity(id))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Next id the allocator will hand out.
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Raises the allocator so restored sessions never reuse retired ids.
    pub fn reserve_ids_below(&mut self, next_id: u32) {
        self.next_id = self.next_id.max(next_id);
    }

    /// Case-insensitive lookup by name.
    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        let needle = name.trim();
        self.entities
            .values()
            .find(|entity| entity.name().eq_ignore_ascii_case(needle))
    }

    /// Entity ids in order, with the neighbour of `id` that should inherit a
    /// cursor when `id` disappears (next entity, else previous).
    pub fn neighbour_of(&self, id: EntityId) -> Option<EntityId> {
        self.entities
            .range(id..)
            .map(|(k, _)| *k)
            .find(|k| *k != id)
            .or_else(|| self.entities.range(..id).next_back().map(|(k, _)| *k))
    }
}

impl Default for Population {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut population = Population::new();
        let a = population.add("A", Color::WHITE).unwrap();
        let b = population.add("B", Color::WHITE).unwrap();
        population.remove(b).unwrap();
        let c = population.add("C", Color::WHITE).unwrap();

        assert!(a < b && b < c);
        let names: Vec<_> = population.iter().map(|e| e.name()).collect();
        assert_eq!(names, ["A", "C"]);
    }

    #[test]
    fn add_rejects_empty_names() {
        let mut population = Population::new();
        assert_eq!(
            population.add(" ", Color::WHITE),
            Err(PopulationError::Entity(EntityError::EmptyName))
        );
        assert!(population.is_empty());
    }

    #[test]
    fn select_reports_transitions_only() {
        let mut population = Population::new();
        let a = population.add("A", Color::WHITE).unwrap();

        let change = population.select(Some(a)).unwrap();
        assert_eq!(
            change,
            Some(SelectionChange {
                previous: None,
                current: Some(a)
            })
        );
        assert_eq!(population.select(Some(a)).unwrap(), None);
        assert_eq!(
            population.select(Some(EntityId(99))),
            Err(PopulationError::UnknownEntity(EntityId(99)))
        );
        assert_eq!(population.selected(), Some(a));
    }

    #[test]
    fn removing_selected_entity_clears_selection() {
        let mut population = Population::new();
        let a = population.add("A", Color::WHITE).unwrap();
        population.select(Some(a)).unwrap();
        population.remove(a).unwrap();
        assert_eq!(population.selected(), None);
    }

    #[test]
    fn insert_bumps_allocator() {
        let mut population = Population::new();
        let restored = Entity::new(EntityId(7), "Restored", Color::WHITE).unwrap();
        population.insert(restored.clone()).unwrap();
        assert_eq!(
            population.insert(restored),
            Err(PopulationError::DuplicateEntity(EntityId(7)))
        );
        assert_eq!(population.add("Next", Color::WHITE).unwrap(), EntityId(8));
    }

    #[test]
    fn find_by_name_ignores_case() {
        let mut population = Population::new();
        let id = population.add("Dragon-Blooded", Color::WHITE).unwrap();
        assert_eq!(
            population.find_by_name("dragon-blooded").map(|e| e.id()),
            Some(id)
        );
        assert!(population.find_by_name("lunar").is_none());
    }

    #[test]
    fn neighbour_prefers_next_then_previous() {
        let mut population = Population::new();
        let a = population.add("A", Color::WHITE).unwrap();
        let b = population.add("B", Color::WHITE).unwrap();
        let c = population.add("C", Color::WHITE).unwrap();

        assert_eq!(population.neighbour_of(b), Some(c));
        assert_eq!(population.neighbour_of(c), Some(b));
        population.remove(b).unwrap();
        population.remove(c).unwrap();
        assert_eq!(population.neighbour_of(a), None);
    }
}
