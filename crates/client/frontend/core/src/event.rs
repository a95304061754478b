//! Utilities for reacting to session events inside UI layers.
use runtime::{Event, TrackerEvent};
use tracker_core::TrackerState;

use crate::config::MessageConfig;
use crate::format::describe_event;
use crate::message::{MessageEntry, MessageLevel, MessageLog};

#[derive(Clone, Copy, Debug, Default)]
pub struct EventImpact {
    pub requires_redraw: bool,
}

impl EventImpact {
    pub const fn redraw() -> Self {
        Self {
            requires_redraw: true,
        }
    }
}

pub trait EventConsumer {
    fn on_event(&mut self, event: &Event, state: &TrackerState) -> EventImpact;
    fn message_log(&self) -> &MessageLog;
    fn message_log_mut(&mut self) -> &mut MessageLog;
}

/// Turns broadcast events into human-readable message log entries.
#[derive(Clone, Debug)]
pub struct MessageConsumer {
    log: MessageLog,
    config: MessageConfig,
}

impl MessageConsumer {
    pub fn new(config: &MessageConfig) -> Self {
        Self {
            log: MessageLog::new(config.capacity),
            config: config.clone(),
        }
    }
}

impl EventConsumer for MessageConsumer {
    fn on_event(&mut self, event: &Event, state: &TrackerState) -> EventImpact {
        if !self.config.logs(event.topic()) {
            return EventImpact::redraw();
        }

        let level = match &event.payload {
            TrackerEvent::EntityRemoved { .. } => MessageLevel::Warning,
            _ => MessageLevel::Info,
        };
        self.log.push(MessageEntry::new(
            describe_event(&event.payload, state),
            Some(event.id),
            level,
        ));
        EventImpact::redraw()
    }

    fn message_log(&self) -> &MessageLog {
        &self.log
    }

    fn message_log_mut(&mut self) -> &mut MessageLog {
        &mut self.log
    }
}

#[cfg(test)]
mod tests {
    use runtime::EventId;
    use tracker_core::{CombatRules, EntityId};

    use super::*;

    fn event(id: u64, payload: TrackerEvent) -> Event {
        Event {
            id: EventId(id),
            cause: None,
            payload,
        }
    }

    #[test]
    fn selection_is_quiet_by_default() {
        let state = TrackerState::new(CombatRules::default());
        let mut consumer = MessageConsumer::new(&MessageConfig::default());

        let impact = consumer.on_event(
            &event(
                1,
                TrackerEvent::SelectionChanged {
                    previous: None,
                    current: Some(EntityId(1)),
                },
            ),
            &state,
        );
        assert!(impact.requires_redraw);
        assert!(consumer.message_log().is_empty());
    }

    #[test]
    fn removals_are_warnings_tagged_with_event() {
        let state = TrackerState::new(CombatRules::default());
        let mut consumer = MessageConsumer::new(&MessageConfig::default());

        consumer.on_event(
            &event(
                4,
                TrackerEvent::EntityRemoved {
                    entity: EntityId(2),
                    name: "Moon".into(),
                },
            ),
            &state,
        );
        let entry = consumer.message_log().iter().next().cloned();
        let entry = entry.expect("message logged");
        assert_eq!(entry.level, MessageLevel::Warning);
        assert_eq!(entry.event, Some(EventId(4)));
        assert!(entry.text.contains("Moon"));
    }

    #[test]
    fn hidden_topics_skip_the_log() {
        let state = TrackerState::new(CombatRules::default());
        let mut config = MessageConfig::default();
        config.set_logged(runtime::Topic::Description, false);
        let mut consumer = MessageConsumer::new(&config);

        let impact = consumer.on_event(
            &event(
                7,
                TrackerEvent::DescriptionChanged {
                    entity: EntityId(1),
                    text: "wounded".into(),
                },
            ),
            &state,
        );
        assert!(impact.requires_redraw);
        assert!(consumer.message_log().is_empty());
    }
}
