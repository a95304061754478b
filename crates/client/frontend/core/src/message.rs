//! Bounded message log fed by session events and UI notices.
use std::borrow::Cow;
use std::collections::VecDeque;

use runtime::EventId;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug)]
pub struct MessageEntry {
    pub text: String,
    /// Event the message describes, if it came from the bus.
    pub event: Option<EventId>,
    pub level: MessageLevel,
    /// How many times in a row this notice was pushed.
    pub repeats: u32,
}

impl MessageEntry {
    pub fn new(text: impl Into<String>, event: Option<EventId>, level: MessageLevel) -> Self {
        Self {
            text: text.into(),
            event,
            level,
            repeats: 1,
        }
    }

    /// Text as shown in a panel, with a repeat counter when it was collapsed.
    pub fn display(&self) -> Cow<'_, str> {
        if self.repeats > 1 {
            Cow::Owned(format!("{} (x{})", self.text, self.repeats))
        } else {
            Cow::Borrowed(&self.text)
        }
    }

    /// Notices without an event collapse into the previous identical notice.
    fn absorbs(&self, next: &MessageEntry) -> bool {
        self.event.is_none()
            && next.event.is_none()
            && self.level == next.level
            && self.text == next.text
    }
}

#[derive(Clone, Debug)]
pub struct MessageLog {
    entries: VecDeque<MessageEntry>,
    capacity: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: MessageEntry) {
        if let Some(last) = self.entries.back_mut()
            && last.absorbs(&entry)
        {
            last.repeats = last.repeats.saturating_add(1);
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn push_text(&mut self, message: impl Into<String>) {
        self.push(MessageEntry::new(message, None, MessageLevel::Info));
    }

    pub fn push_warning(&mut self, message: impl Into<String>) {
        self.push(MessageEntry::new(message, None, MessageLevel::Warning));
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.push(MessageEntry::new(message, None, MessageLevel::Error));
    }

    /// Newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter().rev().take(limit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter()
    }

    /// Entry logged for `event`, while it is still in the buffer.
    pub fn for_event(&self, event: EventId) -> Option<&MessageEntry> {
        self.entries.iter().rev().find(|entry| entry.event == Some(event))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
