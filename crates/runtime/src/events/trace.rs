//! Causality bookkeeping for the event currently being dispatched.

use std::collections::HashMap;

use super::bus::Topic;
use super::types::EventId;

#[derive(Debug, Clone, Copy)]
struct Origin {
    topic: Topic,
    cause: Option<EventId>,
}

/// Records, for every event in the running cascade, its topic and cause.
///
/// The log only lives for one cascade: it is cleared once the root event and
/// everything it triggered have been delivered.
#[derive(Debug, Default)]
pub struct CausalityLog {
    origins: HashMap<EventId, Origin>,
}

impl CausalityLog {
    pub fn record(&mut self, id: EventId, topic: Topic, cause: Option<EventId>) {
        self.origins.insert(id, Origin { topic, cause });
    }

    pub fn clear(&mut self) {
        self.origins.clear();
    }

    /// Number of causes between `id` and its root (a root has depth 0).
    pub fn depth(&self, id: EventId) -> usize {
        self.chain(id).count().saturating_sub(1)
    }

    /// Walks from `id` back to the root of its cascade.
    pub fn chain(&self, id: EventId) -> impl Iterator<Item = (EventId, Topic)> + '_ {
        let mut next = self.origins.get(&id).map(|origin| (id, *origin));
        std::iter::from_fn(move || {
            let (id, origin) = next.take()?;
            next = origin
                .cause
                .and_then(|cause| self.origins.get(&cause).map(|o| (cause, *o)));
            Some((id, origin.topic))
        })
    }

    pub fn trace(&self, id: EventId) -> Trace<'_> {
        Trace { log: self, event: id }
    }
}

/// Causality view handed to listeners for the event they are handling.
#[derive(Debug, Clone, Copy)]
pub struct Trace<'a> {
    log: &'a CausalityLog,
    event: EventId,
}

impl<'a> Trace<'a> {
    pub fn event(&self) -> EventId {
        self.event
    }

    /// True if the current event, or anything that transitively caused it,
    /// was published on `topic`.
    ///
    /// Listeners mirroring shared state use this to avoid echoing a change
    /// back to where it came from.
    pub fn caused_by(&self, topic: Topic) -> bool {
        self.log.chain(self.event).any(|(_, t)| t == topic)
    }

    /// Like [`caused_by`](Self::caused_by) but ignores the current event itself.
    pub fn triggered_by(&self, topic: Topic) -> bool {
        self.log.chain(self.event).skip(1).any(|(_, t)| t == topic)
    }

    pub fn depth(&self) -> usize {
        self.log.depth(self.event)
    }

    pub fn is_root(&self) -> bool {
        self.depth() == 0
    }

    /// First event of the cascade.
    pub fn root(&self) -> EventId {
        self.log
            .chain(self.event)
            .last()
            .map(|(id, _)| id)
            .unwrap_or(self.event)
    }

    pub fn chain(&self) -> impl Iterator<Item = (EventId, Topic)> + 'a {
        self.log.chain(self.event)
    }
}
