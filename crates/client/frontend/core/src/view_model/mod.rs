//! View-model snapshots derived from a [`TrackerSession`].
mod presentation;

pub use presentation::PresentationMapper;

use runtime::TrackerSession;
use tracker_core::{ActionRecord, Color, CombatPhase, EntityId, Tick, TrackerState};

use crate::message::{MessageEntry, MessageLog};

/// High-level snapshot of the session used by presentation layers.
#[derive(Clone, Debug)]
pub struct ViewModel {
    pub phase: CombatPhase,
    pub current_tick: Option<Tick>,
    pub roster: Vec<RosterRow>,
    pub timeline: Vec<TimelineRow>,
    pub details: Option<EntityDetails>,
    pub undo: Option<String>,
    pub redo: Option<String>,
    pub dirty: bool,
    pub messages: Vec<MessageEntry>,
}

impl ViewModel {
    pub fn from_session(session: &TrackerSession, messages: &MessageLog, message_limit: usize) -> Self {
        let mut view = Self::from_state(session.state());
        view.undo = session.undo_label().map(str::to_string);
        view.redo = session.redo_label().map(str::to_string);
        view.dirty = session.is_dirty();
        view.messages = messages.recent(message_limit).cloned().collect();
        view
    }

    pub fn from_state(state: &TrackerState) -> Self {
        let combat = &state.combat;
        let selected = state.population.selected();
        let acting = combat.acting_now();

        let roster = state
            .population
            .iter()
            .map(|entity| RosterRow {
                id: entity.id(),
                name: entity.name().to_string(),
                color: entity.color(),
                tick: combat.positions().tick_of(entity.id()),
                join_roll: combat.join_roll(entity.id()),
                acting: acting.contains(&entity.id()),
                selected: selected == Some(entity.id()),
            })
            .collect();

        let timeline = match combat.phase() {
            CombatPhase::Combat => combat
                .positions()
                .iter()
                .map(|(tick, ids)| TimelineRow {
                    tick,
                    is_current: combat.current_tick() == Some(tick),
                    entries: ids
                        .iter()
                        .map(|id| TimelineEntry::new(state, *id, selected))
                        .collect(),
                })
                .collect(),
            // Before combat the timeline previews join rolls, best first.
            CombatPhase::Join => combat
                .ranked_rolls()
                .into_iter()
                .map(|(id, successes)| TimelineRow {
                    tick: Tick(u64::from(successes)),
                    is_current: false,
                    entries: vec![TimelineEntry::new(state, id, selected)],
                })
                .collect(),
        };

        let details = state.population.selected_entity().map(|entity| EntityDetails {
            id: entity.id(),
            name: entity.name().to_string(),
            color: entity.color(),
            description: entity.description().to_string(),
            history: entity.history().to_vec(),
            tick: combat.positions().tick_of(entity.id()),
            join_roll: combat.join_roll(entity.id()),
        });

        Self {
            phase: combat.phase(),
            current_tick: combat.current_tick(),
            roster,
            timeline,
            details,
            undo: None,
            redo: None,
            dirty: false,
            messages: Vec::new(),
        }
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.roster.iter().position(|row| row.selected)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterRow {
    pub id: EntityId,
    pub name: String,
    pub color: Color,
    pub tick: Option<Tick>,
    pub join_roll: Option<u32>,
    pub acting: bool,
    pub selected: bool,
}

/// One occupied tick; during the join phase, one join roll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineRow {
    pub tick: Tick,
    pub is_current: bool,
    pub entries: Vec<TimelineEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineEntry {
    pub id: EntityId,
    pub name: String,
    pub color: Color,
    pub selected: bool,
}

impl TimelineEntry {
    fn new(state: &TrackerState, id: EntityId, selected: Option<EntityId>) -> Self {
        Self {
            id,
            name: state.display_name(id),
            color: state
                .population
                .get(id)
                .map(|entity| entity.color())
                .unwrap_or_default(),
            selected: selected == Some(id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityDetails {
    pub id: EntityId,
    pub name: String,
    pub color: Color,
    pub description: String,
    pub history: Vec<ActionRecord>,
    pub tick: Option<Tick>,
    pub join_roll: Option<u32>,
}

#[cfg(test)]
mod tests {
    use runtime::{Command, SessionOptions};

    use super::*;

    fn add(session: &mut TrackerSession, name: &str) -> EntityId {
        session
            .execute(Command::AddEntity {
                name: name.into(),
                color: None,
            })
            .expect("add")
            .created
            .expect("created")
    }

    #[test]
    fn join_phase_previews_rolls_best_first() {
        let mut session = TrackerSession::new(SessionOptions::default());
        let sun = add(&mut session, "Sun");
        let moon = add(&mut session, "Moon");
        session
            .execute(Command::RecordJoinRoll { entity: moon, successes: 4 })
            .unwrap();
        session
            .execute(Command::RecordJoinRoll { entity: sun, successes: 2 })
            .unwrap();

        let view = ViewModel::from_session(&session, &MessageLog::new(4), 4);
        assert_eq!(view.phase, CombatPhase::Join);
        let order: Vec<_> = view.timeline.iter().map(|row| row.entries[0].id).collect();
        assert_eq!(order, vec![moon, sun]);
        assert_eq!(view.undo.as_deref(), Some("join roll 2 for #1"));
        assert!(view.dirty);
    }

    #[test]
    fn combat_marks_acting_and_current_tick() {
        let mut session = TrackerSession::new(SessionOptions::default());
        let sun = add(&mut session, "Sun");
        let moon = add(&mut session, "Moon");
        for (entity, successes) in [(sun, 3), (moon, 1)] {
            session
                .execute(Command::RecordJoinRoll { entity, successes })
                .unwrap();
        }
        session.execute(Command::BeginCombat).unwrap();
        session.execute(Command::Select(Some(moon))).unwrap();

        let view = ViewModel::from_state(session.state());
        assert_eq!(view.current_tick, Some(Tick(0)));
        assert!(view.roster[0].acting);
        assert!(!view.roster[1].acting);
        assert_eq!(view.selected_row(), Some(1));
        assert!(view.timeline[0].is_current);
        assert_eq!(view.timeline[1].tick, Tick(2));
        assert!(view.timeline[1].entries[0].selected);
        assert_eq!(view.details.map(|d| d.tick), Some(Some(Tick(2))));
    }
}
