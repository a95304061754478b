use runtime::{Command, Event, Listener, Topic, TopicSet, Trace, TrackerEvent};
use tracker_core::{CombatPhase, EntityId, TrackerState};

/// Row order of the panel a [`SelectionMirror`] backs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum PanelOrder {
    /// Every entity, by id.
    Roster,
    /// Entities on the timeline, by tick and then arrival. Before combat,
    /// the rolled entities best roll first.
    Timeline,
}

impl PanelOrder {
    pub fn rows(self, state: &TrackerState) -> Vec<EntityId> {
        let combat = &state.combat;
        match self {
            Self::Roster => state.population.ids().collect(),
            Self::Timeline => match combat.phase() {
                CombatPhase::Join => combat
                    .ranked_rolls()
                    .into_iter()
                    .map(|(id, _)| id)
                    .collect(),
                CombatPhase::Combat => combat.positions().ordered().map(|(_, id)| id).collect(),
            },
        }
    }
}

/// List cursor that follows the shared selection.
///
/// The cursor only moves when a `SelectionChanged` arrives. When the entity
/// under the cursor is removed from the population, an active mirror asks
/// for the row that took its place (next row, else previous), unless the
/// removal itself came out of a selection change.
#[derive(Debug)]
pub struct SelectionMirror {
    order: PanelOrder,
    rows: Vec<EntityId>,
    cursor: Option<EntityId>,
    /// Row index the cursor occupied before it lost its entity.
    lost: Option<(EntityId, usize)>,
    active: bool,
    requests: usize,
}

impl SelectionMirror {
    pub fn new(order: PanelOrder, state: &TrackerState) -> Self {
        let mut mirror = Self {
            order,
            rows: Vec::new(),
            cursor: None,
            lost: None,
            active: true,
            requests: 0,
        };
        mirror.resync(state);
        mirror
    }

    pub fn order(&self) -> PanelOrder {
        self.order
    }

    pub fn rows(&self) -> &[EntityId] {
        &self.rows
    }

    pub fn cursor(&self) -> Option<EntityId> {
        self.cursor
    }

    pub fn cursor_index(&self) -> Option<usize> {
        let cursor = self.cursor?;
        self.rows.iter().position(|id| *id == cursor)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Only the active mirror picks a replacement when the selection is removed.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Number of selections this mirror asked for on its own.
    pub fn requests(&self) -> usize {
        self.requests
    }

    /// Selection command for the row `delta` steps away from the cursor.
    ///
    /// With no cursor, stepping forward starts at the first row and stepping
    /// back at the last. Returns `None` when the panel is empty or the cursor
    /// would not move.
    pub fn step(&self, delta: isize) -> Option<Command> {
        let last = self.rows.len().checked_sub(1)?;
        let target = match self.cursor_index() {
            Some(index) => index.saturating_add_signed(delta).min(last),
            None if delta < 0 => last,
            None => 0,
        };
        let id = self.rows[target];
        (self.cursor != Some(id)).then_some(Command::Select(Some(id)))
    }

    pub fn first(&self) -> Option<Command> {
        let id = *self.rows.first()?;
        (self.cursor != Some(id)).then_some(Command::Select(Some(id)))
    }

    pub fn last(&self) -> Option<Command> {
        let id = *self.rows.last()?;
        (self.cursor != Some(id)).then_some(Command::Select(Some(id)))
    }

    fn resync(&mut self, state: &TrackerState) {
        self.rows = self.order.rows(state);
        self.cursor = state.population.selected();
        self.lost = None;
    }

    fn refresh_rows(&mut self, state: &TrackerState) {
        if let Some(cursor) = self.cursor
            && let Some(index) = self.rows.iter().position(|id| *id == cursor)
        {
            self.lost = Some((cursor, index));
        }
        self.rows = self.order.rows(state);
    }

    fn replacement(&self, removed: EntityId) -> Option<EntityId> {
        let (_, index) = self.lost.filter(|(id, _)| *id == removed)?;
        self.rows
            .get(index)
            .or_else(|| self.rows.last())
            .copied()
    }
}

impl Listener for SelectionMirror {
    fn interests(&self) -> TopicSet {
        TopicSet::SELECTION
            | TopicSet::POPULATION
            | TopicSet::POSITION
            | TopicSet::PHASE
            | TopicSet::SESSION
    }

    fn on_event(&mut self, event: &Event, trace: &Trace<'_>, state: &TrackerState) -> Vec<Command> {
        match &event.payload {
            TrackerEvent::SelectionChanged { previous, current } => {
                self.refresh_rows(state);
                self.cursor = *current;
                // Only a selection that vanished with its entity is worth replacing.
                if current.is_some() || previous.is_some_and(|id| state.population.contains(id)) {
                    self.lost = None;
                }
                Vec::new()
            }
            TrackerEvent::EntityRemoved { entity, .. } => {
                self.refresh_rows(state);
                let replacement = self.replacement(*entity);
                self.lost = None;

                let Some(next) = replacement else {
                    return Vec::new();
                };
                if !self.active
                    || trace.caused_by(Topic::Selection)
                    || state.population.selected().is_some()
                {
                    return Vec::new();
                }
                tracing::debug!("{} panel moves selection to {}", self.order, next);
                self.requests += 1;
                vec![Command::Select(Some(next))]
            }
            TrackerEvent::SessionRestored { .. } => {
                self.resync(state);
                Vec::new()
            }
            _ => {
                self.refresh_rows(state);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use runtime::{SessionOptions, TrackerSession};
    use tracker_core::Tick;

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

    fn session_with(names: &[&str]) -> (TrackerSession, Vec<EntityId>) {
        let mut session = TrackerSession::new(SessionOptions::default());
        let ids = names.iter().map(|name| add(&mut session, name)).collect();
        (session, ids)
    }

    fn mirror(session: &mut TrackerSession, order: PanelOrder) -> Rc<RefCell<SelectionMirror>> {
        let mirror = Rc::new(RefCell::new(SelectionMirror::new(order, session.state())));
        session.register_listener(mirror.clone());
        mirror
    }

    #[test]
    fn cursor_follows_selection() {
        let (mut session, ids) = session_with(&["A", "B", "C"]);
        let roster = mirror(&mut session, PanelOrder::Roster);

        let step = roster.borrow().step(1);
        assert_eq!(step, Some(Command::Select(Some(ids[0]))));
        session.execute(Command::Select(Some(ids[1]))).unwrap();

        let roster = roster.borrow();
        assert_eq!(roster.cursor(), Some(ids[1]));
        assert_eq!(roster.step(1), Some(Command::Select(Some(ids[2]))));
        assert_eq!(roster.step(-5), Some(Command::Select(Some(ids[0]))));
        assert_eq!(roster.last(), Some(Command::Select(Some(ids[2]))));
    }

    #[test]
    fn stepping_past_the_end_stays_put() {
        let (mut session, ids) = session_with(&["A", "B"]);
        let roster = mirror(&mut session, PanelOrder::Roster);
        session.execute(Command::Select(Some(ids[1]))).unwrap();

        assert_eq!(roster.borrow().step(1), None);
        assert_eq!(roster.borrow().step(-1), Some(Command::Select(Some(ids[0]))));
    }

    #[test]
    fn removing_cursor_entity_selects_next_row() {
        let (mut session, ids) = session_with(&["A", "B", "C"]);
        let roster = mirror(&mut session, PanelOrder::Roster);
        session.execute(Command::Select(Some(ids[1]))).unwrap();

        let outcome = session.execute(Command::RemoveEntity(ids[1])).unwrap();
        assert_eq!(session.state().population.selected(), Some(ids[2]));
        assert_eq!(roster.borrow().cursor(), Some(ids[2]));
        assert_eq!(roster.borrow().requests(), 1);
        let reselect = outcome.events.last().expect("reselect event");
        assert!(reselect.cause.is_some());

        // Last row removed: the previous row inherits the cursor.
        session.execute(Command::RemoveEntity(ids[2])).unwrap();
        assert_eq!(session.state().population.selected(), Some(ids[0]));
    }

    #[test]
    fn removing_other_entities_keeps_cursor() {
        let (mut session, ids) = session_with(&["A", "B"]);
        let roster = mirror(&mut session, PanelOrder::Roster);
        session.execute(Command::Select(Some(ids[0]))).unwrap();

        session.execute(Command::RemoveEntity(ids[1])).unwrap();
        assert_eq!(roster.borrow().cursor(), Some(ids[0]));
        assert_eq!(roster.borrow().requests(), 0);
        assert_eq!(roster.borrow().rows(), &[ids[0]]);
    }

    #[test]
    fn only_the_active_mirror_reselects() {
        let (mut session, ids) = session_with(&["A", "B", "C"]);
        for (entity, successes) in [(ids[0], 1), (ids[1], 2), (ids[2], 3)] {
            session
                .execute(Command::RecordJoinRoll { entity, successes })
                .unwrap();
        }
        session.execute(Command::BeginCombat).unwrap();

        let roster = mirror(&mut session, PanelOrder::Roster);
        let timeline = mirror(&mut session, PanelOrder::Timeline);
        roster.borrow_mut().set_active(false);
        assert_eq!(timeline.borrow().rows(), &[ids[2], ids[1], ids[0]]);

        session.execute(Command::Select(Some(ids[2]))).unwrap();
        session.execute(Command::RemoveEntity(ids[2])).unwrap();

        // Timeline order puts B next, where the roster would have picked A.
        assert_eq!(session.state().population.selected(), Some(ids[1]));
        assert_eq!(timeline.borrow().requests(), 1);
        assert_eq!(roster.borrow().requests(), 0);
        assert_eq!(roster.borrow().cursor(), Some(ids[1]));
    }

    #[test]
    fn timeline_rows_follow_positions() {
        let (mut session, ids) = session_with(&["A", "B"]);
        let timeline = mirror(&mut session, PanelOrder::Timeline);
        session
            .execute(Command::RecordJoinRoll { entity: ids[0], successes: 2 })
            .unwrap();
        session.execute(Command::BeginCombat).unwrap();
        assert_eq!(timeline.borrow().rows(), &[ids[0]]);

        session
            .execute(Command::SetTick { entity: ids[1], tick: Tick(0) })
            .unwrap();
        assert_eq!(timeline.borrow().rows(), &[ids[0], ids[1]]);

        session.execute(Command::EndCombat).unwrap();
        assert!(timeline.borrow().rows().is_empty());
    }

    #[test]
    fn join_phase_timeline_lists_rolls() {
        let (mut session, ids) = session_with(&["A", "B", "C"]);
        let timeline = mirror(&mut session, PanelOrder::Timeline);
        assert!(timeline.borrow().rows().is_empty());
        assert_eq!(timeline.borrow().step(1), None);

        for (entity, successes) in [(ids[0], 1), (ids[1], 4), (ids[2], 1)] {
            session
                .execute(Command::RecordJoinRoll { entity, successes })
                .unwrap();
        }
        assert_eq!(timeline.borrow().rows(), &[ids[1], ids[0], ids[2]]);

        let step = timeline.borrow().step(1);
        assert_eq!(step, Some(Command::Select(Some(ids[1]))));
        session.execute(step.unwrap()).unwrap();
        assert_eq!(timeline.borrow().cursor_index(), Some(0));

        // Combat keeps the same order, now read from the positions.
        session.execute(Command::BeginCombat).unwrap();
        assert_eq!(timeline.borrow().rows(), &[ids[1], ids[0], ids[2]]);
    }

    #[test]
    fn undo_resyncs_rows() {
        let (mut session, ids) = session_with(&["A", "B"]);
        let roster = mirror(&mut session, PanelOrder::Roster);
        session.execute(Command::RemoveEntity(ids[1])).unwrap();
        assert_eq!(roster.borrow().rows(), &[ids[0]]);

        session.undo().unwrap();
        assert_eq!(roster.borrow().rows(), &[ids[0], ids[1]]);
    }

    #[test]
    fn reset_and_undo_resync_every_mirror() {
        let (mut session, ids) = session_with(&["A", "B"]);
        let roster = mirror(&mut session, PanelOrder::Roster);
        let timeline = mirror(&mut session, PanelOrder::Timeline);
        session
            .execute(Command::RecordJoinRoll { entity: ids[1], successes: 2 })
            .unwrap();
        session.execute(Command::Select(Some(ids[1]))).unwrap();

        session.reset();
        assert!(roster.borrow().rows().is_empty());
        assert!(timeline.borrow().rows().is_empty());
        assert_eq!(roster.borrow().cursor(), None);

        session.undo().unwrap();
        assert_eq!(roster.borrow().rows(), &[ids[0], ids[1]]);
        assert_eq!(timeline.borrow().rows(), &[ids[1]]);
        // The selection was gone when the snapshot came back.
        assert_eq!(timeline.borrow().cursor(), None);
        assert_eq!(session.state().population.selected(), None);
    }

    /// Removes whatever gets selected, the way a "delete on pick" tool would.
    struct Picker;

    impl Listener for Picker {
        fn interests(&self) -> TopicSet {
            TopicSet::SELECTION
        }

        fn on_event(&mut self, event: &Event, _: &Trace<'_>, _: &TrackerState) -> Vec<Command> {
            match event.payload {
                TrackerEvent::SelectionChanged {
                    current: Some(id), ..
                } => vec![Command::RemoveEntity(id)],
                _ => Vec::new(),
            }
        }
    }

    #[test]
    fn removals_caused_by_selection_are_not_echoed() {
        let (mut session, ids) = session_with(&["A", "B", "C"]);
        let roster = mirror(&mut session, PanelOrder::Roster);
        session.register_listener(Rc::new(RefCell::new(Picker)));

        session.execute(Command::Select(Some(ids[0]))).unwrap();

        // Without the trace check the roster would select B, which the picker
        // would remove, and so on down the list.
        assert_eq!(session.state().population.len(), 2);
        assert_eq!(session.state().population.selected(), None);
        assert_eq!(roster.borrow().requests(), 0);
    }
}
