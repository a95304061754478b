//! Commands accepted by a [`TrackerSession`](super::TrackerSession).

use tracker_core::{Color, EntityId, Tick};

/// A single state change request.
///
/// Both the user interface and bus listeners speak in commands, so a change
/// requested by a listener goes through exactly the same validation as one
/// typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Adds an entity; `None` picks the next palette color.
    AddEntity { name: String, color: Option<Color> },
    RemoveEntity(EntityId),
    Rename { entity: EntityId, name: String },
    Recolor { entity: EntityId, color: Color },
    SetDescription { entity: EntityId, text: String },
    ClearHistory(EntityId),
    Select(Option<EntityId>),
    RecordJoinRoll { entity: EntityId, successes: u32 },
    /// Rolls `dice` d10s for join battle and records the successes.
    RollJoinBattle { entity: EntityId, dice: u32 },
    Withdraw(EntityId),
    BeginCombat,
    EndCombat,
    Act { entity: EntityId, speed: u64, label: String },
    JoinInProgress { entity: EntityId, successes: u32 },
    SetTick { entity: EntityId, tick: Tick },
    LeaveCombat(EntityId),
}

impl Command {
    /// Short description shown next to undo/redo.
    pub fn label(&self) -> String {
        match self {
            Self::AddEntity { name, .. } => format!("add {}", name.trim()),
            Self::RemoveEntity(id) => format!("remove {id}"),
            Self::Rename { name, .. } => format!("rename to {}", name.trim()),
            Self::Recolor { entity, .. } => format!("recolor {entity}"),
            Self::SetDescription { entity, .. } => format!("describe {entity}"),
            Self::ClearHistory(id) => format!("clear history of {id}"),
            Self::Select(_) => "select".to_string(),
            Self::RecordJoinRoll { entity, successes } => {
                format!("join roll {successes} for {entity}")
            }
            Self::RollJoinBattle { entity, dice } => format!("roll {dice} dice for {entity}"),
            Self::Withdraw(id) => format!("withdraw {id}"),
            Self::BeginCombat => "begin combat".to_string(),
            Self::EndCombat => "end combat".to_string(),
            Self::Act { entity, speed, .. } => format!("{entity} acts (speed {speed})"),
            Self::JoinInProgress { entity, .. } => format!("{entity} joins combat"),
            Self::SetTick { entity, tick } => format!("move {entity} to tick {tick}"),
            Self::LeaveCombat(id) => format!("{id} leaves combat"),
        }
    }

    /// Whether the command is recorded as an undo step.
    ///
    /// Selection is view state and never becomes an undo step.
    pub fn is_undoable(&self) -> bool {
        !matches!(self, Self::Select(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_is_not_undoable() {
        assert!(!Command::Select(None).is_undoable());
        assert!(Command::BeginCombat.is_undoable());
    }

    #[test]
    fn labels_name_the_target() {
        let label = Command::Act {
            entity: EntityId(3),
            speed: 5,
            label: "attack".into(),
        }
        .label();
        assert_eq!(label, "#3 acts (speed 5)");
        assert_eq!(
            Command::AddEntity {
                name: "  Sol ".into(),
                color: None
            }
            .label(),
            "add Sol"
        );
    }
}
