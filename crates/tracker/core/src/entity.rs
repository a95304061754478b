//! Combatant record with change reporting.
use crate::error::{ErrorSeverity, TrackerError};
use crate::state::{Color, EntityId, Tick};

/// Errors raised while editing an entity.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EntityError {
    #[error("entity names cannot be empty")]
    EmptyName,
}

impl TrackerError for EntityError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyName => "ENTITY_EMPTY_NAME",
        }
    }
}

/// One action an entity took during combat.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRecord {
    /// Tick the action was declared on.
    pub tick: Tick,
    /// Speed of the action, i.e. how many ticks the entity waits afterwards.
    pub speed: u64,
    pub label: String,
}

impl ActionRecord {
    pub fn new(tick: Tick, speed: u64, label: impl Into<String>) -> Self {
        Self {
            tick,
            speed,
            label: label.into(),
        }
    }
}

/// What changed on an entity after a mutator ran.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityChange {
    Renamed { from: String, to: String },
    Recolored { from: Color, to: Color },
    DescriptionChanged { text: String },
    ActionRecorded(ActionRecord),
    HistoryCleared,
}

/// A combatant: name, display color, free-form notes and action history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    id: EntityId,
    name: String,
    color: Color,
    description: String,
    history: Vec<ActionRecord>,
}

impl Entity {
    pub fn new(id: EntityId, name: &str, color: Color) -> Result<Self, EntityError> {
        Ok(Self {
            id,
            name: normalize_name(name)?,
            color,
            description: String::new(),
            history: Vec::new(),
        })
    }

    /// Attaches a description (builder pattern).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attaches an action history (builder pattern).
    #[must_use]
    pub fn with_history(mut self, history: Vec<ActionRecord>) -> Self {
        self.history = history;
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }

    pub fn last_action(&self) -> Option<&ActionRecord> {
        self.history.last()
    }

    pub fn rename(&mut self, name: &str) -> Result<Option<EntityChange>, EntityError> {
        let name = normalize_name(name)?;
        if name == self.name {
            return Ok(None);
        }
        let from = std::mem::replace(&mut self.name, name);
        Ok(Some(EntityChange::Renamed {
            from,
            to: self.name.clone(),
        }))
    }

    pub fn recolor(&mut self, color: Color) -> Option<EntityChange> {
        if color == self.color {
            return None;
        }
        let from = std::mem::replace(&mut self.color, color);
        Some(EntityChange::Recolored { from, to: color })
    }

    pub fn set_description(&mut self, text: &str) -> Option<EntityChange> {
        if text == self.description {
            return None;
        }
        self.description = text.to_string();
        Some(EntityChange::DescriptionChanged {
            text: self.description.clone(),
        })
    }

    pub fn record_action(&mut self, record: ActionRecord) -> EntityChange {
        self.history.push(record.clone());
        EntityChange::ActionRecorded(record)
    }

    pub fn clear_history(&mut self) -> Option<EntityChange> {
        if self.history.is_empty() {
            return None;
        }
        self.history.clear();
        Some(EntityChange::HistoryCleared)
    }
}

fn normalize_name(name: &str) -> Result<String, EntityError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EntityError::EmptyName);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Entity {
        Entity::new(EntityId(1), "Harmonious Jade", Color::WHITE).unwrap()
    }

    #[test]
    fn names_are_trimmed_and_required() {
        let entity = Entity::new(EntityId(1), "  Panther  ", Color::WHITE).unwrap();
        assert_eq!(entity.name(), "Panther");
        assert_eq!(
            Entity::new(EntityId(2), "   ", Color::WHITE),
            Err(EntityError::EmptyName)
        );
    }

    #[test]
    fn rename_reports_change_once() {
        let mut entity = sample();
        let change = entity.rename("Swan").unwrap();
        assert_eq!(
            change,
            Some(EntityChange::Renamed {
                from: "Harmonious Jade".to_string(),
                to: "Swan".to_string()
            })
        );
        assert_eq!(entity.rename(" Swan ").unwrap(), None);
        assert_eq!(entity.rename(""), Err(EntityError::EmptyName));
        assert_eq!(entity.name(), "Swan");
    }

    #[test]
    fn unchanged_values_produce_no_change() {
        let mut entity = sample();
        assert_eq!(entity.recolor(Color::WHITE), None);
        assert_eq!(entity.set_description(""), None);
        assert_eq!(entity.clear_history(), None);
    }

    #[test]
    fn history_records_actions_in_order() {
        let mut entity = sample();
        entity.record_action(ActionRecord::new(Tick(0), 5, "attack"));
        entity.record_action(ActionRecord::new(Tick(5), 3, "move"));

        let labels: Vec<_> = entity.history().iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["attack", "move"]);
        assert_eq!(entity.last_action().map(|r| r.tick), Some(Tick(5)));
        assert_eq!(entity.clear_history(), Some(EntityChange::HistoryCleared));
        assert!(entity.history().is_empty());
    }
}
