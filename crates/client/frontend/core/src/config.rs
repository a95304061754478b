//! Message log settings shared by every frontend.

use std::env;

use runtime::{Topic, TopicSet};

#[derive(Clone, Debug, Default)]
pub struct FrontendConfig {
    pub messages: MessageConfig,
}

impl FrontendConfig {
    pub const fn new(messages: MessageConfig) -> Self {
        Self { messages }
    }

    /// Environment variables:
    /// - `CLI_MESSAGE_CAPACITY` - Entries kept in the message log (default: 64)
    /// - `SHOW_SELECTION_MESSAGES` - Log selection changes (default: false)
    /// - `SHOW_DESCRIPTION_MESSAGES` - Log description edits (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut messages = MessageConfig::default();

        if let Some(capacity) = lookup("CLI_MESSAGE_CAPACITY").and_then(|v| v.trim().parse().ok())
        {
            messages.capacity = usize::max(capacity, 1);
        }

        for (key, topic) in [
            ("SHOW_SELECTION_MESSAGES", Topic::Selection),
            ("SHOW_DESCRIPTION_MESSAGES", Topic::Description),
        ] {
            if let Some(show) = lookup(key).as_deref().and_then(parse_flag) {
                messages.set_logged(topic, show);
            }
        }

        Self { messages }
    }
}

/// Which events reach the message log, and how many entries it keeps.
#[derive(Clone, Debug)]
pub struct MessageConfig {
    pub capacity: usize,
    /// Selection is visible in the panels, so it stays out of the log by default.
    pub hidden: TopicSet,
}

impl MessageConfig {
    pub fn logs(&self, topic: Topic) -> bool {
        !self.hidden.includes(topic)
    }

    pub fn set_logged(&mut self, topic: Topic, logged: bool) {
        self.hidden.set(TopicSet::from(topic), !logged);
    }
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            hidden: TopicSet::SELECTION,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(vars: &[(&str, &str)]) -> FrontendConfig {
        FrontendConfig::from_lookup(|key| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        })
    }

    #[test]
    fn defaults_hide_selection_only() {
        let messages = config(&[]).messages;
        assert_eq!(messages.capacity, 64);
        assert!(!messages.logs(Topic::Selection));
        assert!(messages.logs(Topic::Description));
        assert!(messages.logs(Topic::Position));
    }

    #[test]
    fn flags_toggle_topics() {
        let messages = config(&[
            ("SHOW_SELECTION_MESSAGES", "yes"),
            ("SHOW_DESCRIPTION_MESSAGES", "off"),
            ("CLI_MESSAGE_CAPACITY", "0"),
        ])
        .messages;
        assert!(messages.logs(Topic::Selection));
        assert!(!messages.logs(Topic::Description));
        assert_eq!(messages.capacity, 1);
    }

    #[test]
    fn unreadable_values_keep_defaults() {
        let messages = config(&[
            ("SHOW_SELECTION_MESSAGES", "maybe"),
            ("CLI_MESSAGE_CAPACITY", "many"),
        ])
        .messages;
        assert!(!messages.logs(Topic::Selection));
        assert_eq!(messages.capacity, 64);
    }
}
