//! Terminal layout and pacing.
use std::env;
use std::time::Duration;

#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub ui: UiConfig,
}

impl CliConfig {
    /// Environment variables:
    /// - `CLI_MESSAGE_PANEL_HEIGHT` - Message panel height in lines, borders included (default: 8)
    /// - `CLI_FRAME_MS` - Keyboard polling interval in milliseconds (default: 16)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut ui = UiConfig::default();
        let number = |key: &str| lookup(key).and_then(|value| value.trim().parse::<u64>().ok());

        if let Some(height) = number("CLI_MESSAGE_PANEL_HEIGHT") {
            // Two border lines plus at least one message.
            ui.message_panel_height = height.clamp(3, 40) as u16;
        }

        if let Some(ms) = number("CLI_FRAME_MS") {
            ui.frame_interval = Duration::from_millis(ms.clamp(5, 250));
        }

        Self { ui }
    }
}

#[derive(Clone, Debug)]
pub struct UiConfig {
    pub message_panel_height: u16,
    /// How long the loop waits between keyboard polls.
    pub frame_interval: Duration,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            message_panel_height: 8,
            frame_interval: Duration::from_millis(16),
        }
    }
}
