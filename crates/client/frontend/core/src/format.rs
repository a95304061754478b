//! Human-readable descriptions of session events.
use runtime::{RestoreReason, TrackerEvent};
use tracker_core::TrackerState;

/// One-line description of an event, resolving entity names against `state`.
///
/// `state` is the state after the event; removed entities are described by
/// the name carried in the event itself.
pub fn describe_event(event: &TrackerEvent, state: &TrackerState) -> String {
    let name = |id| state.display_name(id);
    match event {
        TrackerEvent::EntityAdded { name, .. } => format!("{name} joins the scene"),
        TrackerEvent::EntityRemoved { name, .. } => format!("{name} was removed"),
        TrackerEvent::SelectionChanged { current, .. } => match current {
            Some(id) => format!("selected {}", name(*id)),
            None => "selection cleared".to_string(),
        },
        TrackerEvent::EntityRenamed { from, to, .. } => format!("{from} is now {to}"),
        TrackerEvent::EntityRecolored { entity, color } => {
            format!("{} recolored to {color}", name(*entity))
        }
        TrackerEvent::DescriptionChanged { entity, .. } => {
            format!("description of {} updated", name(*entity))
        }
        TrackerEvent::ActionRecorded { entity, record } => format!(
            "{} {} at tick {} (speed {})",
            name(*entity),
            if record.label.is_empty() { "acts" } else { record.label.as_str() },
            record.tick,
            record.speed
        ),
        TrackerEvent::HistoryCleared { entity } => {
            format!("action history of {} cleared", name(*entity))
        }
        TrackerEvent::JoinRollChanged { entity, successes } => match successes {
            Some(n) => format!("{} rolls {n} for join battle", name(*entity)),
            None => format!("{} withdraws from join battle", name(*entity)),
        },
        TrackerEvent::PositionChanged { entity, from, to } => match (from, to) {
            (None, Some(to)) => format!("{} enters at tick {to}", name(*entity)),
            (Some(from), Some(to)) => format!("{} moves from tick {from} to {to}", name(*entity)),
            (Some(_), None) => format!("{} leaves the timeline", name(*entity)),
            (None, None) => format!("{} is off the timeline", name(*entity)),
        },
        TrackerEvent::CurrentTickChanged { current, .. } => match current {
            Some(tick) => format!("tick {tick}"),
            None => "timeline is empty".to_string(),
        },
        TrackerEvent::PhaseChanged { phase } => format!("{phase} phase"),
        TrackerEvent::SessionRestored { reason } => match reason {
            RestoreReason::Undo { label } => format!("undid {label}"),
            RestoreReason::Redo { label } => format!("redid {label}"),
            RestoreReason::Loaded { slot } => format!("loaded {slot}"),
            RestoreReason::Reset => "new session".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use tracker_core::{ActionRecord, Color, CombatRules, EntityId, Tick};

    use super::*;

    #[test]
    fn names_come_from_state() {
        let mut state = TrackerState::new(CombatRules::default());
        let sun = state
            .population
            .add("Sun", Color::WHITE)
            .expect("valid name");

        let text = describe_event(
            &TrackerEvent::ActionRecorded {
                entity: sun,
                record: ActionRecord::new(Tick(3), 5, "strike"),
            },
            &state,
        );
        assert_eq!(text, "Sun strike at tick 3 (speed 5)");
    }

    #[test]
    fn unknown_entities_fall_back_to_id() {
        let state = TrackerState::new(CombatRules::default());
        let text = describe_event(
            &TrackerEvent::PositionChanged {
                entity: EntityId(9),
                from: Some(Tick(2)),
                to: None,
            },
            &state,
        );
        assert_eq!(text, "#9 leaves the timeline");
    }
}
