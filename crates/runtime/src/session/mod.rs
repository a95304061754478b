//! Tracker session: the single owner of mutable tracker state.
//!
//! [`TrackerSession`] applies [`Command`]s to the domain models, records undo
//! snapshots, and publishes the resulting events through the [`EventBus`].
//! Listener reactions are applied in the same cascade and inherit the
//! triggering event as their cause.
mod command;

pub use command::Command;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::broadcast;
use tracker_core::{
    CombatPhase, CombatRules, EntityChange, EntityId, History, PopulationError, PositionChange,
    TrackerState, dice,
};

use crate::api::{Result, SessionError};
use crate::events::{
    Event, EventBus, Listener, ListenerId, RestoreReason, Topic, TrackerEvent,
};
use crate::repository::{SaveFile, SaveRepository};

/// Construction options for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub rules: CombatRules,
    pub undo_limit: usize,
    /// Seed for join battle dice; `None` seeds from the OS.
    pub dice_seed: Option<u64>,
    pub event_capacity: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            rules: CombatRules::default(),
            undo_limit: History::<TrackerState>::DEFAULT_LIMIT,
            dice_seed: None,
            event_capacity: 256,
        }
    }
}

/// What a command (and everything it triggered) did.
#[derive(Debug, Clone, Default)]
pub struct CommandOutcome {
    /// Entity created by an `AddEntity` command.
    pub created: Option<EntityId>,
    /// Every event published in the cascade, in delivery order.
    pub events: Vec<Event>,
}

impl CommandOutcome {
    pub fn changed(&self) -> bool {
        !self.events.is_empty()
    }
}

/// Payloads produced by applying one command.
#[derive(Default)]
struct Applied {
    created: Option<EntityId>,
    payloads: Vec<TrackerEvent>,
}

pub struct TrackerSession {
    state: TrackerState,
    history: History<TrackerState>,
    bus: EventBus,
    rng: StdRng,
    dirty: bool,
}

impl TrackerSession {
    pub fn new(options: SessionOptions) -> Self {
        let rng = match options.dice_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            state: TrackerState::new(options.rules),
            history: History::new(options.undo_limit),
            bus: EventBus::with_capacity(options.event_capacity),
            rng,
            dirty: false,
        }
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn rules(&self) -> CombatRules {
        self.state.combat.rules()
    }

    pub fn register_listener<L>(&mut self, listener: Rc<RefCell<L>>) -> ListenerId
    where
        L: Listener + 'static,
    {
        self.bus.register(listener)
    }

    pub fn unregister_listener(&mut self, id: ListenerId) -> bool {
        self.bus.unregister(id)
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    /// Subscribe to every published event
    pub fn subscribe_all(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe_all()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.history.undo_label()
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.history.redo_label()
    }

    /// True when there are changes since the last save or load.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Applies a command and publishes everything it caused.
    pub fn execute(&mut self, command: Command) -> Result<CommandOutcome> {
        let label = command.label();
        let undoable = command.is_undoable();
        let before = self.state.clone();

        let applied = match self.apply(command) {
            Ok(applied) => applied,
            Err(e) => {
                self.state = before;
                tracing::debug!("command '{}' rejected: {}", label, e);
                return Err(e);
            }
        };

        if applied.payloads.is_empty() {
            return Ok(CommandOutcome::default());
        }

        let mut undoable_change = undoable;
        let events = self.publish(applied.payloads, &mut undoable_change);
        if undoable_change {
            self.history.record(label.clone(), before);
        }
        // Selection is saved with the session, so it dirties it too.
        self.dirty = true;
        tracing::debug!("command '{}' published {} events", label, events.len());

        Ok(CommandOutcome {
            created: applied.created,
            events,
        })
    }

    pub fn undo(&mut self) -> Result<CommandOutcome> {
        let entry = self
            .history
            .undo(self.state.clone())
            .ok_or(SessionError::NothingToUndo)?;
        tracing::info!("undo: {}", entry.label);
        self.install(entry.state);
        self.dirty = true;
        Ok(self.announce_restore(RestoreReason::Undo { label: entry.label }))
    }

    pub fn redo(&mut self) -> Result<CommandOutcome> {
        let entry = self
            .history
            .redo(self.state.clone())
            .ok_or(SessionError::NothingToRedo)?;
        tracing::info!("redo: {}", entry.label);
        self.install(entry.state);
        self.dirty = true;
        Ok(self.announce_restore(RestoreReason::Redo { label: entry.label }))
    }

    /// Clears every entity and returns to the join phase. Undoable.
    pub fn reset(&mut self) -> CommandOutcome {
        let fresh = TrackerState::new(self.rules());
        let before = std::mem::replace(&mut self.state, fresh);
        self.history.record("new session", before);
        self.dirty = true;
        tracing::info!("session reset");
        self.announce_restore(RestoreReason::Reset)
    }

    /// Captures the current state as a save record.
    pub fn to_save_file(&self) -> SaveFile {
        SaveFile::capture(&self.state)
    }

    /// Writes the session to `slot` and marks it saved.
    pub fn save(&mut self, repository: &dyn SaveRepository, slot: &str) -> Result<SaveFile> {
        let save = self.to_save_file();
        repository.save(slot, &save)?;
        self.dirty = false;
        Ok(save)
    }

    /// Saves only when something changed since the last save. Returns the
    /// written record, or `None` when there was nothing to write.
    pub fn save_if_dirty(
        &mut self,
        repository: &dyn SaveRepository,
        slot: &str,
    ) -> Result<Option<SaveFile>> {
        if !self.dirty {
            return Ok(None);
        }
        self.save(repository, slot).map(Some)
    }

    /// Replaces the session with a loaded save. Clears undo history.
    pub fn load(&mut self, save: SaveFile, slot: &str) -> Result<CommandOutcome> {
        let state = save.into_state()?;
        self.state = state;
        self.history.clear();
        self.dirty = false;
        tracing::info!(
            "loaded slot '{}' ({} entities, {} phase)",
            slot,
            self.state.population.len(),
            self.state.combat.phase()
        );
        Ok(self.announce_restore(RestoreReason::Loaded {
            slot: slot.to_string(),
        }))
    }

    /// Swaps in a snapshot, keeping the current selection when it still exists.
    fn install(&mut self, mut state: TrackerState) {
        let keep = self
            .state
            .population
            .selected()
            .filter(|id| state.population.contains(*id));
        if let Err(e) = state.population.select(keep) {
            tracing::warn!("could not carry selection across restore: {}", e);
        }
        self.state = state;
    }

    fn announce_restore(&mut self, reason: RestoreReason) -> CommandOutcome {
        let mut ignored = false;
        let events = self.publish(vec![TrackerEvent::SessionRestored { reason }], &mut ignored);
        CommandOutcome {
            created: None,
            events,
        }
    }

    /// Delivers root payloads and every reaction they trigger, breadth first.
    fn publish(&mut self, payloads: Vec<TrackerEvent>, undoable_change: &mut bool) -> Vec<Event> {
        let mut queue: VecDeque<Event> = payloads
            .into_iter()
            .map(|payload| self.bus.stamp(payload, None))
            .collect();
        let mut published = Vec::new();

        while let Some(event) = queue.pop_front() {
            let reactions = self.bus.deliver(&event, &self.state);

            if !reactions.is_empty() && self.bus.depth(event.id) + 1 >= EventBus::MAX_CASCADE_DEPTH
            {
                tracing::warn!(
                    "dropping {} reactions to {}: cascade depth limit reached",
                    reactions.len(),
                    event.id
                );
            } else {
                for command in reactions {
                    let label = command.label();
                    let undoable = command.is_undoable();
                    match self.apply(command) {
                        Ok(applied) => {
                            if undoable && !applied.payloads.is_empty() {
                                *undoable_change = true;
                            }
                            for payload in applied.payloads {
                                queue.push_back(self.bus.stamp(payload, Some(event.id)));
                            }
                        }
                        Err(e) => {
                            tracing::warn!("listener command '{}' failed: {}", label, e);
                        }
                    }
                }
            }

            published.push(event);
        }

        self.bus.finish_cascade();
        published
    }

    /// Applies a command to the models. Validation happens before mutation,
    /// so an error leaves the state untouched.
    fn apply(&mut self, command: Command) -> Result<Applied> {
        let mut applied = Applied::default();
        let payloads = &mut applied.payloads;

        match command {
            Command::AddEntity { name, color } => {
                let color = color.unwrap_or_else(|| {
                    tracker_core::Color::from_palette(self.state.population.len())
                });
                let id = self.state.population.add(&name, color)?;
                payloads.push(TrackerEvent::EntityAdded {
                    entity: id,
                    name: self.state.display_name(id),
                });
                applied.created = Some(id);
            }
            Command::RemoveEntity(id) => {
                let was_selected = self.state.population.selected() == Some(id);
                let entity = self.state.population.remove(id)?;
                if let Some(change) = self.state.combat.forget(id) {
                    position_payloads(change, payloads);
                }
                if was_selected {
                    payloads.push(TrackerEvent::SelectionChanged {
                        previous: Some(id),
                        current: None,
                    });
                }
                payloads.push(TrackerEvent::EntityRemoved {
                    entity: id,
                    name: entity.name().to_string(),
                });
            }
            Command::Rename { entity, name } => {
                let change = self.state.population.entity_mut(entity)?.rename(&name)?;
                payloads.extend(change.map(|c| entity_payload(entity, c)));
            }
            Command::Recolor { entity, color } => {
                let change = self.state.population.entity_mut(entity)?.recolor(color);
                payloads.extend(change.map(|c| entity_payload(entity, c)));
            }
            Command::SetDescription { entity, text } => {
                let change = self
                    .state
                    .population
                    .entity_mut(entity)?
                    .set_description(&text);
                payloads.extend(change.map(|c| entity_payload(entity, c)));
            }
            Command::ClearHistory(entity) => {
                let change = self.state.population.entity_mut(entity)?.clear_history();
                payloads.extend(change.map(|c| entity_payload(entity, c)));
            }
            Command::Select(id) => {
                if let Some(change) = self.state.population.select(id)? {
                    payloads.push(TrackerEvent::SelectionChanged {
                        previous: change.previous,
                        current: change.current,
                    });
                }
            }
            Command::RecordJoinRoll { entity, successes } => {
                self.require_entity(entity)?;
                let previous = self.state.combat.record_join_roll(entity, successes)?;
                if previous != Some(successes) {
                    payloads.push(TrackerEvent::JoinRollChanged {
                        entity,
                        successes: Some(successes),
                    });
                }
            }
            Command::RollJoinBattle { entity, dice } => {
                self.require_entity(entity)?;
                if self.state.combat.phase() != CombatPhase::Join {
                    return Err(tracker_core::CombatError::WrongPhase {
                        expected: CombatPhase::Join,
                        actual: self.state.combat.phase(),
                    }
                    .into());
                }
                if dice > dice::MAX_POOL {
                    return Err(tracker_core::CombatError::PoolTooLarge {
                        dice,
                        max: dice::MAX_POOL,
                    }
                    .into());
                }
                let successes = dice::roll_pool(&mut self.rng, dice);
                tracing::debug!("{} rolled {} successes on {} dice", entity, successes, dice);
                let previous = self.state.combat.record_join_roll(entity, successes)?;
                if previous != Some(successes) {
                    payloads.push(TrackerEvent::JoinRollChanged {
                        entity,
                        successes: Some(successes),
                    });
                }
            }
            Command::Withdraw(entity) => {
                if self.state.combat.withdraw(entity)?.is_some() {
                    payloads.push(TrackerEvent::JoinRollChanged {
                        entity,
                        successes: None,
                    });
                }
            }
            Command::BeginCombat => {
                let previous = self.state.combat.current_tick();
                let placements = self.state.combat.begin_combat()?;
                payloads.push(TrackerEvent::PhaseChanged {
                    phase: CombatPhase::Combat,
                });
                payloads.extend(placements.iter().map(|p| TrackerEvent::PositionChanged {
                    entity: p.entity,
                    from: None,
                    to: Some(p.tick),
                }));
                let current = self.state.combat.current_tick();
                if current != previous {
                    payloads.push(TrackerEvent::CurrentTickChanged { previous, current });
                }
            }
            Command::EndCombat => {
                let previous = self.state.combat.current_tick();
                self.state.combat.end_combat()?;
                payloads.push(TrackerEvent::PhaseChanged {
                    phase: CombatPhase::Join,
                });
                if previous.is_some() {
                    payloads.push(TrackerEvent::CurrentTickChanged {
                        previous,
                        current: None,
                    });
                }
            }
            Command::Act {
                entity,
                speed,
                label,
            } => {
                self.require_entity(entity)?;
                let tick = self.state.combat.current_tick().unwrap_or_default();
                let change = self.state.combat.act(entity, speed)?;
                let record = tracker_core::ActionRecord::new(tick, speed, label);
                let recorded = self.state.population.entity_mut(entity)?.record_action(record);
                payloads.push(entity_payload(entity, recorded));
                position_payloads(change, payloads);
            }
            Command::JoinInProgress { entity, successes } => {
                self.require_entity(entity)?;
                let change = self.state.combat.join_in_progress(entity, successes)?;
                payloads.push(TrackerEvent::JoinRollChanged {
                    entity,
                    successes: Some(successes),
                });
                position_payloads(change, payloads);
            }
            Command::SetTick { entity, tick } => {
                self.require_entity(entity)?;
                let change = self.state.combat.set_tick(entity, tick)?;
                position_payloads(change, payloads);
            }
            Command::LeaveCombat(entity) => {
                let had_roll = self.state.combat.join_roll(entity).is_some();
                match self.state.combat.forget(entity) {
                    Some(change) => position_payloads(change, payloads),
                    None if had_roll => payloads.push(TrackerEvent::JoinRollChanged {
                        entity,
                        successes: None,
                    }),
                    None => {}
                }
            }
        }

        Ok(applied)
    }

    fn require_entity(&self, entity: EntityId) -> Result<()> {
        if self.state.population.contains(entity) {
            Ok(())
        } else {
            Err(PopulationError::UnknownEntity(entity).into())
        }
    }
}

impl Default for TrackerSession {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

fn entity_payload(entity: EntityId, change: EntityChange) -> TrackerEvent {
    match change {
        EntityChange::Renamed { from, to } => TrackerEvent::EntityRenamed { entity, from, to },
        EntityChange::Recolored { to, .. } => TrackerEvent::EntityRecolored { entity, color: to },
        EntityChange::DescriptionChanged { text } => {
            TrackerEvent::DescriptionChanged { entity, text }
        }
        EntityChange::ActionRecorded(record) => TrackerEvent::ActionRecorded { entity, record },
        EntityChange::HistoryCleared => TrackerEvent::HistoryCleared { entity },
    }
}

fn position_payloads(change: PositionChange, payloads: &mut Vec<TrackerEvent>) {
    if change.moved() {
        payloads.push(TrackerEvent::PositionChanged {
            entity: change.entity,
            from: change.from,
            to: change.to,
        });
    }
    if change.current_changed() {
        payloads.push(TrackerEvent::CurrentTickChanged {
            previous: change.current_before,
            current: change.current_after,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Trace, TopicSet};
    use tracker_core::Tick;

    fn session() -> TrackerSession {
        TrackerSession::new(SessionOptions {
            dice_seed: Some(1),
            ..SessionOptions::default()
        })
    }

    fn add(session: &mut TrackerSession, name: &str) -> EntityId {
        session
            .execute(Command::AddEntity {
                name: name.to_string(),
                color: None,
            })
            .unwrap()
            .created
            .unwrap()
    }

    #[test]
    fn add_entity_publishes_root_event() {
        let mut session = session();
        let outcome = session
            .execute(Command::AddEntity {
                name: "Sun".into(),
                color: None,
            })
            .unwrap();

        assert_eq!(outcome.events.len(), 1);
        assert!(outcome.events[0].is_root());
        assert!(matches!(
            outcome.events[0].payload,
            TrackerEvent::EntityAdded { ref name, .. } if name == "Sun"
        ));
        assert!(session.can_undo());
        assert!(session.is_dirty());
    }

    #[test]
    fn failed_commands_leave_state_untouched() {
        let mut session = session();
        let before = session.state().clone();
        assert!(session.execute(Command::BeginCombat).is_err());
        assert!(
            session
                .execute(Command::Rename {
                    entity: EntityId(42),
                    name: "x".into()
                })
                .is_err()
        );
        assert_eq!(session.state(), &before);
        assert!(!session.can_undo());
    }

    #[test]
    fn no_op_commands_publish_nothing() {
        let mut session = session();
        let a = add(&mut session, "A");
        let outcome = session
            .execute(Command::SetDescription {
                entity: a,
                text: String::new(),
            })
            .unwrap();
        assert!(!outcome.changed());
        assert_eq!(session.undo_label(), Some("add A"));
    }

    #[test]
    fn selection_is_not_recorded_for_undo() {
        let mut session = session();
        let a = add(&mut session, "A");
        session.execute(Command::Select(Some(a))).unwrap();
        session.undo().unwrap();
        assert!(session.state().population.is_empty());
        assert!(!session.can_undo());
    }

    #[test]
    fn selection_changes_mark_the_session_dirty() {
        let mut session = session();
        let a = add(&mut session, "A");
        session.mark_saved();

        session.execute(Command::Select(Some(a))).unwrap();
        assert!(session.is_dirty());
        assert_eq!(session.to_save_file().population.selected, Some(a));

        session.mark_saved();
        session.execute(Command::Select(Some(a))).unwrap();
        assert!(!session.is_dirty());
    }

    #[test]
    fn autosave_writes_only_dirty_sessions() {
        let repository = crate::InMemorySaveRepository::new();
        let mut session = session();
        assert!(session.save_if_dirty(&repository, "auto").unwrap().is_none());
        assert!(!repository.exists("auto"));

        add(&mut session, "A");
        let written = session.save_if_dirty(&repository, "auto").unwrap();
        assert_eq!(written.map(|save| save.entity_count()), Some(1));
        assert!(!session.is_dirty());
        assert_eq!(repository.load("auto").unwrap().unwrap().entity_count(), 1);

        // Nothing changed since, so the deleted slot is not rewritten.
        repository.delete("auto").unwrap();
        assert!(session.save_if_dirty(&repository, "auto").unwrap().is_none());
        assert!(!repository.exists("auto"));
    }

    #[test]
    fn failed_saves_stay_dirty() {
        let repository = crate::InMemorySaveRepository::new();
        let mut session = session();
        add(&mut session, "A");

        let err = session.save_if_dirty(&repository, "../escape").unwrap_err();
        assert!(matches!(err, SessionError::Repository(_)));
        assert!(session.is_dirty());
    }

    #[test]
    fn reset_is_undoable() {
        let mut session = session();
        let a = add(&mut session, "A");
        add(&mut session, "B");
        session
            .execute(Command::RecordJoinRoll {
                entity: a,
                successes: 3,
            })
            .unwrap();
        session.mark_saved();

        let outcome = session.reset();
        assert!(matches!(
            outcome.events[0].payload,
            TrackerEvent::SessionRestored {
                reason: RestoreReason::Reset,
                ..
            }
        ));
        assert!(session.state().population.is_empty());
        assert!(session.is_dirty());
        assert_eq!(session.undo_label(), Some("new session"));

        session.undo().unwrap();
        assert_eq!(session.state().population.len(), 2);
        assert_eq!(session.state().combat.join_roll(a), Some(3));
        assert_eq!(session.redo_label(), Some("new session"));

        session.redo().unwrap();
        assert!(session.state().population.is_empty());
    }

    #[test]
    fn timeline_commands_wait_for_combat() {
        let mut session = session();
        let a = add(&mut session, "A");
        let wrong_phase = |err: SessionError| {
            matches!(
                err,
                SessionError::Combat(tracker_core::CombatError::WrongPhase {
                    expected: CombatPhase::Combat,
                    actual: CombatPhase::Join,
                })
            )
        };

        let err = session
            .execute(Command::SetTick {
                entity: a,
                tick: Tick(3),
            })
            .unwrap_err();
        assert!(wrong_phase(err));
        let err = session
            .execute(Command::JoinInProgress {
                entity: a,
                successes: 2,
            })
            .unwrap_err();
        assert!(wrong_phase(err));

        assert!(session.state().combat.positions().is_empty());
        assert_eq!(session.state().combat.join_roll(a), None);
        assert_eq!(session.undo_label(), Some("add A"));
    }

    #[test]
    fn combat_round_trip_through_undo() {
        let mut session = session();
        let a = add(&mut session, "A");
        let b = add(&mut session, "B");
        session
            .execute(Command::RecordJoinRoll {
                entity: a,
                successes: 4,
            })
            .unwrap();
        session
            .execute(Command::RecordJoinRoll {
                entity: b,
                successes: 2,
            })
            .unwrap();
        let outcome = session.execute(Command::BeginCombat).unwrap();
        assert!(outcome.events.iter().any(|e| matches!(
            e.payload,
            TrackerEvent::CurrentTickChanged {
                previous: None,
                current: Some(Tick(0))
            }
        )));

        session
            .execute(Command::Act {
                entity: a,
                speed: 5,
                label: "attack".into(),
            })
            .unwrap();
        assert_eq!(session.state().combat.current_tick(), Some(Tick(2)));
        assert_eq!(
            session.state().population.get(a).unwrap().history().len(),
            1
        );

        session.undo().unwrap();
        assert_eq!(session.state().combat.current_tick(), Some(Tick(0)));
        assert!(session.state().population.get(a).unwrap().history().is_empty());

        session.redo().unwrap();
        assert_eq!(session.state().combat.positions().tick_of(a), Some(Tick(5)));
    }

    #[test]
    fn removing_selected_entity_announces_selection_loss() {
        let mut session = session();
        let a = add(&mut session, "A");
        session.execute(Command::Select(Some(a))).unwrap();
        let outcome = session.execute(Command::RemoveEntity(a)).unwrap();
        let payloads: Vec<_> = outcome.events.iter().map(|e| &e.payload).collect();
        assert!(payloads.contains(&&TrackerEvent::SelectionChanged {
            previous: Some(a),
            current: None
        }));
    }

    #[test]
    fn undo_keeps_selection_when_entity_survives() {
        let mut session = session();
        let a = add(&mut session, "A");
        let b = add(&mut session, "B");
        session.execute(Command::Select(Some(a))).unwrap();
        session
            .execute(Command::Rename {
                entity: b,
                name: "Bee".into(),
            })
            .unwrap();
        session.undo().unwrap();
        assert_eq!(session.state().population.selected(), Some(a));
    }

    #[test]
    fn rolled_join_battle_is_recorded() {
        let mut session = session();
        let a = add(&mut session, "A");
        session
            .execute(Command::RollJoinBattle { entity: a, dice: 8 })
            .unwrap();
        let roll = session.state().combat.join_roll(a).unwrap();
        assert!(roll <= 16);
    }

    #[test]
    fn oversized_dice_pools_are_rejected() {
        let mut session = session();
        let a = add(&mut session, "A");
        let err = session
            .execute(Command::RollJoinBattle {
                entity: a,
                dice: 200_000_000,
            })
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Combat(tracker_core::CombatError::PoolTooLarge {
                dice: 200_000_000,
                ..
            })
        ));
        assert_eq!(err.severity(), tracker_core::ErrorSeverity::Validation);
        assert_eq!(session.state().combat.join_roll(a), None);
        assert_eq!(session.undo_label(), Some("add A"));

        session
            .execute(Command::RollJoinBattle {
                entity: a,
                dice: dice::MAX_POOL,
            })
            .unwrap();
        assert!(session.state().combat.join_roll(a).is_some());
    }

    struct Echo {
        seen: Vec<(TrackerEvent, bool)>,
        target: EntityId,
    }

    impl Listener for Echo {
        fn interests(&self) -> TopicSet {
            TopicSet::POPULATION | TopicSet::DESCRIPTION
        }

        fn on_event(
            &mut self,
            event: &Event,
            trace: &Trace<'_>,
            _state: &TrackerState,
        ) -> Vec<Command> {
            let echoed = trace.caused_by(Topic::Description);
            self.seen.push((event.payload.clone(), echoed));
            if echoed {
                return Vec::new();
            }
            vec![Command::SetDescription {
                entity: self.target,
                text: format!("saw {}", event.id),
            }]
        }
    }

    #[test]
    fn listener_reactions_carry_their_cause() {
        let mut session = session();
        let a = add(&mut session, "A");
        let echo = Rc::new(RefCell::new(Echo {
            seen: Vec::new(),
            target: a,
        }));
        session.register_listener(echo.clone());

        let outcome = session
            .execute(Command::AddEntity {
                name: "B".into(),
                color: None,
            })
            .unwrap();

        assert_eq!(outcome.events.len(), 2);
        let root = &outcome.events[0];
        let reaction = &outcome.events[1];
        assert_eq!(reaction.cause, Some(root.id));
        assert!(matches!(
            reaction.payload,
            TrackerEvent::DescriptionChanged { entity, .. } if entity == a
        ));

        {
            let echo = echo.borrow();
            assert_eq!(echo.seen.len(), 2);
            assert!(!echo.seen[0].1);
            assert!(echo.seen[1].1);
        }

        // The reaction is folded into the user's undo step.
        session.undo().unwrap();
        assert_eq!(session.state().population.get(a).unwrap().description(), "");
    }

    struct PingPong;

    impl Listener for PingPong {
        fn interests(&self) -> TopicSet {
            TopicSet::DESCRIPTION
        }

        fn on_event(
            &mut self,
            event: &Event,
            _trace: &Trace<'_>,
            _state: &TrackerState,
        ) -> Vec<Command> {
            let TrackerEvent::DescriptionChanged { entity, text } = &event.payload else {
                return Vec::new();
            };
            vec![Command::SetDescription {
                entity: *entity,
                text: format!("{text}!"),
            }]
        }
    }

    #[test]
    fn unguarded_feedback_loops_are_cut() {
        let mut session = session();
        let a = add(&mut session, "A");
        session.register_listener(Rc::new(RefCell::new(PingPong)));

        let outcome = session
            .execute(Command::SetDescription {
                entity: a,
                text: "x".into(),
            })
            .unwrap();
        assert_eq!(outcome.events.len(), EventBus::MAX_CASCADE_DEPTH);
    }
}
