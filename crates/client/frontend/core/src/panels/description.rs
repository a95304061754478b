use runtime::{Command, Event, Listener, Topic, TopicSet, Trace, TrackerEvent};
use tracker_core::{EntityId, TrackerState};

/// Edit buffer for the selected entity's description.
///
/// Edits stay local until committed. Moving the selection away commits a
/// pending draft for the entity being left, unless the selection change was
/// itself caused by a description change; a description written elsewhere
/// for the entity being edited replaces the draft.
#[derive(Debug, Default)]
pub struct DescriptionMirror {
    entity: Option<EntityId>,
    draft: String,
    dirty: bool,
}

impl DescriptionMirror {
    pub fn new(state: &TrackerState) -> Self {
        let mut mirror = Self::default();
        mirror.load(state, state.population.selected());
        mirror
    }

    pub fn entity(&self) -> Option<EntityId> {
        self.entity
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replaces the draft. Ignored when no entity is selected.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        if self.entity.is_some() {
            self.draft = text.into();
            self.dirty = true;
        }
    }

    pub fn push_char(&mut self, c: char) {
        if self.entity.is_some() {
            self.draft.push(c);
            self.dirty = true;
        }
    }

    pub fn pop_char(&mut self) {
        if self.entity.is_some() && self.draft.pop().is_some() {
            self.dirty = true;
        }
    }

    /// Command storing the draft, if there is anything to store.
    pub fn commit(&self) -> Option<Command> {
        let entity = self.entity?;
        self.dirty.then(|| Command::SetDescription {
            entity,
            text: self.draft.clone(),
        })
    }

    /// Throws the draft away in favour of the stored description.
    pub fn revert(&mut self, state: &TrackerState) {
        self.load(state, self.entity);
    }

    fn load(&mut self, state: &TrackerState, entity: Option<EntityId>) {
        let entity = entity.filter(|id| state.population.contains(*id));
        self.entity = entity;
        self.draft = entity
            .and_then(|id| state.population.get(id))
            .map(|e| e.description().to_string())
            .unwrap_or_default();
        self.dirty = false;
    }
}

impl Listener for DescriptionMirror {
    fn interests(&self) -> TopicSet {
        TopicSet::SELECTION | TopicSet::DESCRIPTION | TopicSet::POPULATION | TopicSet::SESSION
    }

    fn on_event(&mut self, event: &Event, trace: &Trace<'_>, state: &TrackerState) -> Vec<Command> {
        match &event.payload {
            TrackerEvent::SelectionChanged { current, .. } => {
                let pending = self
                    .commit()
                    .filter(|_| !trace.caused_by(Topic::Description))
                    .filter(|_| self.entity.is_some_and(|id| state.population.contains(id)));
                if self.dirty && pending.is_none() {
                    tracing::debug!("dropping description draft for {:?}", self.entity);
                }
                self.load(state, *current);
                pending.into_iter().collect()
            }
            TrackerEvent::DescriptionChanged { entity, text } if self.entity == Some(*entity) => {
                self.draft = text.clone();
                self.dirty = false;
                Vec::new()
            }
            TrackerEvent::EntityRemoved { entity, .. } if self.entity == Some(*entity) => {
                self.load(state, None);
                Vec::new()
            }
            TrackerEvent::SessionRestored { .. } => {
                self.load(state, state.population.selected());
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use runtime::{SessionOptions, TrackerSession};

    use super::*;

    fn setup() -> (TrackerSession, EntityId, EntityId, Rc<RefCell<DescriptionMirror>>) {
        let mut session = TrackerSession::new(SessionOptions::default());
        let mut add = |name: &str| {
            session
                .execute(Command::AddEntity {
                    name: name.into(),
                    color: None,
                })
                .expect("add")
                .created
                .expect("created")
        };
        let sun = add("Sun");
        let moon = add("Moon");
        let mirror = Rc::new(RefCell::new(DescriptionMirror::new(session.state())));
        session.register_listener(mirror.clone());
        (session, sun, moon, mirror)
    }

    fn description(session: &TrackerSession, id: EntityId) -> String {
        session
            .state()
            .population
            .get(id)
            .map(|e| e.description().to_string())
            .unwrap_or_default()
    }

    #[test]
    fn selection_loads_the_description() {
        let (mut session, sun, _, mirror) = setup();
        session
            .execute(Command::SetDescription {
                entity: sun,
                text: "Dawn caste".into(),
            })
            .unwrap();
        session.execute(Command::Select(Some(sun))).unwrap();

        let mirror = mirror.borrow();
        assert_eq!(mirror.entity(), Some(sun));
        assert_eq!(mirror.draft(), "Dawn caste");
        assert!(!mirror.is_dirty());
        assert_eq!(mirror.commit(), None);
    }

    #[test]
    fn leaving_an_entity_commits_its_draft() {
        let (mut session, sun, moon, mirror) = setup();
        session.execute(Command::Select(Some(sun))).unwrap();
        mirror.borrow_mut().set_draft("wounded");

        let outcome = session.execute(Command::Select(Some(moon))).unwrap();
        assert_eq!(description(&session, sun), "wounded");
        assert_eq!(mirror.borrow().entity(), Some(moon));
        assert_eq!(mirror.borrow().draft(), "");

        let commit = outcome
            .events
            .iter()
            .find(|e| matches!(e.payload, TrackerEvent::DescriptionChanged { .. }))
            .expect("description committed");
        assert_eq!(commit.cause, Some(outcome.events[0].id));
        // The commit makes the selection change undoable.
        assert_eq!(session.undo_label(), Some("select"));
    }

    #[test]
    fn external_writes_replace_the_draft() {
        let (mut session, sun, _, mirror) = setup();
        session.execute(Command::Select(Some(sun))).unwrap();
        mirror.borrow_mut().push_char('x');
        assert!(mirror.borrow().is_dirty());

        session
            .execute(Command::SetDescription {
                entity: sun,
                text: "from the storyteller".into(),
            })
            .unwrap();
        assert_eq!(mirror.borrow().draft(), "from the storyteller");
        assert!(!mirror.borrow().is_dirty());
    }

    #[test]
    fn removed_entity_drops_the_draft() {
        let (mut session, sun, _, mirror) = setup();
        session.execute(Command::Select(Some(sun))).unwrap();
        mirror.borrow_mut().set_draft("doomed");

        let outcome = session.execute(Command::RemoveEntity(sun)).unwrap();
        assert!(
            outcome
                .events
                .iter()
                .all(|e| !matches!(e.payload, TrackerEvent::DescriptionChanged { .. }))
        );
        assert_eq!(mirror.borrow().entity(), None);
        assert!(!mirror.borrow().is_dirty());
    }

    #[test]
    fn undo_reloads_the_draft() {
        let (mut session, sun, _, mirror) = setup();
        session.execute(Command::Select(Some(sun))).unwrap();
        mirror.borrow_mut().set_draft("first");
        let commit = mirror.borrow().commit().expect("dirty draft");
        session.execute(commit).unwrap();
        assert_eq!(description(&session, sun), "first");

        session.undo().unwrap();
        assert_eq!(mirror.borrow().draft(), "");
        assert_eq!(mirror.borrow().entity(), Some(sun));
    }

    /// Jumps to the described entity whenever any description changes.
    struct Follow;

    impl Listener for Follow {
        fn interests(&self) -> TopicSet {
            TopicSet::DESCRIPTION
        }

        fn on_event(&mut self, event: &Event, _: &Trace<'_>, _: &TrackerState) -> Vec<Command> {
            match event.payload {
                TrackerEvent::DescriptionChanged { entity, .. } => {
                    vec![Command::Select(Some(entity))]
                }
                _ => Vec::new(),
            }
        }
    }

    #[test]
    fn selection_caused_by_description_does_not_commit() {
        let (mut session, sun, moon, mirror) = setup();
        session.register_listener(Rc::new(RefCell::new(Follow)));
        session.execute(Command::Select(Some(sun))).unwrap();
        mirror.borrow_mut().set_draft("unsaved");

        session
            .execute(Command::SetDescription {
                entity: moon,
                text: "Night caste".into(),
            })
            .unwrap();

        assert_eq!(session.state().population.selected(), Some(moon));
        assert_eq!(description(&session, sun), "");
        assert_eq!(mirror.borrow().draft(), "Night caste");
    }
}
