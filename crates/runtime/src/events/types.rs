//! Event payloads published by a tracker session.

use serde::{Deserialize, Serialize};
use tracker_core::{ActionRecord, Color, CombatPhase, EntityId, Tick};

use super::bus::Topic;

/// Identifier assigned to every published event, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub u64);

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Why the whole tracker state was replaced at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestoreReason {
    Undo { label: String },
    Redo { label: String },
    Loaded { slot: String },
    Reset,
}

/// Something that changed in the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackerEvent {
    EntityAdded {
        entity: EntityId,
        name: String,
    },
    EntityRemoved {
        entity: EntityId,
        name: String,
    },
    SelectionChanged {
        previous: Option<EntityId>,
        current: Option<EntityId>,
    },
    EntityRenamed {
        entity: EntityId,
        from: String,
        to: String,
    },
    EntityRecolored {
        entity: EntityId,
        color: Color,
    },
    DescriptionChanged {
        entity: EntityId,
        text: String,
    },
    ActionRecorded {
        entity: EntityId,
        record: ActionRecord,
    },
    HistoryCleared {
        entity: EntityId,
    },
    /// A join battle roll was recorded (`Some`) or withdrawn (`None`).
    JoinRollChanged {
        entity: EntityId,
        successes: Option<u32>,
    },
    PositionChanged {
        entity: EntityId,
        from: Option<Tick>,
        to: Option<Tick>,
    },
    CurrentTickChanged {
        previous: Option<Tick>,
        current: Option<Tick>,
    },
    PhaseChanged {
        phase: CombatPhase,
    },
    SessionRestored {
        reason: RestoreReason,
    },
}

impl TrackerEvent {
    pub fn topic(&self) -> Topic {
        match self {
            Self::EntityAdded { .. } | Self::EntityRemoved { .. } => Topic::Population,
            Self::SelectionChanged { .. } => Topic::Selection,
            Self::EntityRenamed { .. }
            | Self::EntityRecolored { .. }
            | Self::ActionRecorded { .. }
            | Self::HistoryCleared { .. } => Topic::Entity,
            Self::DescriptionChanged { .. } => Topic::Description,
            Self::JoinRollChanged { .. }
            | Self::PositionChanged { .. }
            | Self::CurrentTickChanged { .. } => Topic::Position,
            Self::PhaseChanged { .. } => Topic::Phase,
            Self::SessionRestored { .. } => Topic::Session,
        }
    }

    /// Entity the event is about, if any.
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            Self::EntityAdded { entity, .. }
            | Self::EntityRemoved { entity, .. }
            | Self::EntityRenamed { entity, .. }
            | Self::EntityRecolored { entity, .. }
            | Self::DescriptionChanged { entity, .. }
            | Self::ActionRecorded { entity, .. }
            | Self::HistoryCleared { entity }
            | Self::JoinRollChanged { entity, .. }
            | Self::PositionChanged { entity, .. } => Some(*entity),
            Self::SelectionChanged { current, .. } => *current,
            Self::CurrentTickChanged { .. }
            | Self::PhaseChanged { .. }
            | Self::SessionRestored { .. } => None,
        }
    }
}

/// A published event: payload plus causality metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    /// Event whose handling produced this one; `None` for user-initiated events.
    pub cause: Option<EventId>,
    pub payload: TrackerEvent,
}

impl Event {
    pub fn topic(&self) -> Topic {
        self.payload.topic()
    }

    pub fn is_root(&self) -> bool {
        self.cause.is_none()
    }
}
