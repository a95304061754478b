//! Causality-aware event bus.
//!
//! Synchronous listeners are called in registration order for every event on
//! a topic they are interested in. They never mutate the session directly;
//! instead they return [`Command`]s which the session applies, stamping the
//! resulting events with the event that triggered the listener. Async
//! observers (such as a frontend's message log) can additionally subscribe
//! to a broadcast channel per topic.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracker_core::TrackerState;

use super::trace::{CausalityLog, Trace};
use super::types::{Event, EventId, TrackerEvent};
use crate::session::Command;

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
pub enum Topic {
    /// Entities added to or removed from the population
    Population,
    /// The selected entity changed
    Selection,
    /// Name, color or action history of an entity changed
    Entity,
    /// Free-form description of an entity changed
    Description,
    /// Join rolls, tick positions and the current tick
    Position,
    /// Join phase / combat phase transitions
    Phase,
    /// Whole-state replacement (undo, redo, load, reset)
    Session,
}

impl Topic {
    pub const ALL: [Topic; 7] = [
        Topic::Population,
        Topic::Selection,
        Topic::Entity,
        Topic::Description,
        Topic::Position,
        Topic::Phase,
        Topic::Session,
    ];
}

bitflags! {
    /// Set of topics a listener wants to hear about.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TopicSet: u8 {
        const POPULATION = 1 << 0;
        const SELECTION = 1 << 1;
        const ENTITY = 1 << 2;
        const DESCRIPTION = 1 << 3;
        const POSITION = 1 << 4;
        const PHASE = 1 << 5;
        const SESSION = 1 << 6;
    }
}

impl From<Topic> for TopicSet {
    fn from(topic: Topic) -> Self {
        match topic {
            Topic::Population => TopicSet::POPULATION,
            Topic::Selection => TopicSet::SELECTION,
            Topic::Entity => TopicSet::ENTITY,
            Topic::Description => TopicSet::DESCRIPTION,
            Topic::Position => TopicSet::POSITION,
            Topic::Phase => TopicSet::PHASE,
            Topic::Session => TopicSet::SESSION,
        }
    }
}

impl TopicSet {
    pub fn includes(self, topic: Topic) -> bool {
        self.contains(TopicSet::from(topic))
    }
}

/// Synchronous subscriber that may react to events with follow-up commands.
pub trait Listener {
    /// Topics this listener wants to receive.
    fn interests(&self) -> TopicSet;

    /// Handles one event. `state` reflects the session after the event was applied.
    fn on_event(&mut self, event: &Event, trace: &Trace<'_>, state: &TrackerState)
    -> Vec<Command>;
}

/// Handle returned by [`EventBus::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registration {
    id: ListenerId,
    listener: Rc<RefCell<dyn Listener>>,
}

pub struct EventBus {
    listeners: Vec<Registration>,
    channels: HashMap<Topic, broadcast::Sender<Event>>,
    all: broadcast::Sender<Event>,
    log: CausalityLog,
    next_event: u64,
    next_listener: u64,
}

impl EventBus {
    /// Deepest chain of causes a cascade may reach before reactions are dropped.
    pub const MAX_CASCADE_DEPTH: usize = 16;

    /// Creates a new event bus with default broadcast capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified broadcast capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity.max(1)).0))
            .collect();

        Self {
            listeners: Vec::new(),
            channels,
            all: broadcast::channel(capacity.max(1)).0,
            log: CausalityLog::default(),
            next_event: 1,
            next_listener: 1,
        }
    }

    /// Registers a synchronous listener. The caller keeps its own `Rc` to read
    /// the listener's state between events.
    pub fn register<L>(&mut self, listener: Rc<RefCell<L>>) -> ListenerId
    where
        L: Listener + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(Registration { id, listener });
        id
    }

    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|registration| registration.id != id);
        before != self.listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // Every topic is created up front; keep a detached channel as a fallback.
            None => broadcast::channel(1).1,
        }
    }

    /// Subscribe to every event regardless of topic, in publication order.
    pub fn subscribe_all(&self) -> broadcast::Receiver<Event> {
        self.all.subscribe()
    }

    /// Assigns an id to a payload and records where it came from.
    pub fn stamp(&mut self, payload: TrackerEvent, cause: Option<EventId>) -> Event {
        let id = EventId(self.next_event);
        self.next_event += 1;
        self.log.record(id, payload.topic(), cause);
        Event { id, cause, payload }
    }

    /// Depth of an event within the running cascade.
    pub fn depth(&self, id: EventId) -> usize {
        self.log.depth(id)
    }

    /// Delivers an event to broadcast subscribers and interested listeners.
    ///
    /// Returns the commands the listeners asked for, in listener order.
    pub fn deliver(&mut self, event: &Event, state: &TrackerState) -> Vec<Command> {
        let topic = event.topic();

        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event.clone()).is_err()
        {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }

        // Ignored for the same reason as above.
        let _ = self.all.send(event.clone());

        let trace = self.log.trace(event.id);
        let mut commands = Vec::new();
        for registration in &self.listeners {
            let Ok(mut listener) = registration.listener.try_borrow_mut() else {
                tracing::warn!(
                    "listener {:?} is already handling an event; skipping {}",
                    registration.id,
                    event.id
                );
                continue;
            };
            if !listener.interests().includes(topic) {
                continue;
            }
            commands.extend(listener.on_event(event, &trace, state));
        }
        commands
    }

    /// Forgets the causality records of the cascade that just finished.
    pub fn finish_cascade(&mut self) {
        self.log.clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("next_event", &self.next_event)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::EntityId;

    struct Recorder {
        interests: TopicSet,
        seen: Vec<EventId>,
    }

    impl Listener for Recorder {
        fn interests(&self) -> TopicSet {
            self.interests
        }

        fn on_event(
            &mut self,
            event: &Event,
            _trace: &Trace<'_>,
            _state: &TrackerState,
        ) -> Vec<Command> {
            self.seen.push(event.id);
            vec![Command::Select(None)]
        }
    }

    fn recorder(interests: TopicSet) -> Rc<RefCell<Recorder>> {
        Rc::new(RefCell::new(Recorder {
            interests,
            seen: Vec::new(),
        }))
    }

    fn selection() -> TrackerEvent {
        TrackerEvent::SelectionChanged {
            previous: None,
            current: Some(EntityId(1)),
        }
    }

    #[test]
    fn listeners_only_hear_their_topics() {
        let mut bus = EventBus::new();
        let selection_only = recorder(TopicSet::SELECTION);
        let phases = recorder(TopicSet::PHASE);
        bus.register(selection_only.clone());
        bus.register(phases.clone());

        let event = bus.stamp(selection(), None);
        let commands = bus.deliver(&event, &TrackerState::default());

        assert_eq!(commands, vec![Command::Select(None)]);
        assert_eq!(selection_only.borrow().seen, vec![event.id]);
        assert!(phases.borrow().seen.is_empty());
    }

    #[test]
    fn busy_listeners_are_skipped() {
        let mut bus = EventBus::new();
        let listener = recorder(TopicSet::all());
        bus.register(listener.clone());

        let event = bus.stamp(selection(), None);
        let _held = listener.borrow_mut();
        assert!(bus.deliver(&event, &TrackerState::default()).is_empty());
    }

    #[test]
    fn unregistered_listeners_stop_hearing() {
        let mut bus = EventBus::new();
        let id = bus.register(recorder(TopicSet::all()));
        assert_eq!(bus.listener_count(), 1);
        assert!(bus.unregister(id));
        assert!(!bus.unregister(id));
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn broadcast_subscribers_receive_by_topic() {
        let mut bus = EventBus::new();
        let mut selection_rx = bus.subscribe(Topic::Selection);
        let mut phase_rx = bus.subscribe(Topic::Phase);
        let mut all_rx = bus.subscribe_all();

        let event = bus.stamp(selection(), None);
        bus.deliver(&event, &TrackerState::default());

        assert_eq!(selection_rx.try_recv().unwrap(), event);
        assert!(phase_rx.try_recv().is_err());
        assert_eq!(all_rx.try_recv().unwrap().id, event.id);
    }

    #[test]
    fn cascades_are_forgotten_when_finished() {
        let mut bus = EventBus::new();
        let root = bus.stamp(selection(), None);
        let child = bus.stamp(selection(), Some(root.id));
        assert_eq!(bus.depth(child.id), 1);

        bus.finish_cascade();
        assert_eq!(bus.depth(child.id), 0);
        let next = bus.stamp(selection(), None);
        assert_eq!(bus.depth(next.id), 0);
    }

    #[test]
    fn topic_sets_cover_every_topic() {
        for topic in Topic::ALL {
            assert!(TopicSet::all().includes(topic));
            assert!(TopicSet::from(topic).includes(topic));
        }
        assert!(!TopicSet::SELECTION.includes(Topic::Phase));
    }
}
