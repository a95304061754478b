//! Ratatui theme implementation of PresentationMapper.
//!
//! This module provides concrete styling for the terminal UI, implementing
//! the framework-agnostic PresentationMapper trait from frontend-core.

use client_frontend_core::{message::MessageLevel, view_model::PresentationMapper};
use ratatui::style::{Color, Modifier, Style};
use tracker_core::CombatPhase;

/// Ratatui-specific theme implementing PresentationMapper.
///
/// This provides consistent color schemes and styling rules for the CLI.
pub struct RatatuiTheme;

impl PresentationMapper for RatatuiTheme {
    type Style = Style;

    fn style_entity(&self, color: tracker_core::Color, acting: bool) -> Self::Style {
        let style = Style::default().fg(readable(color));
        if acting {
            self.emphasize_current(style)
        } else {
            style
        }
    }

    fn style_phase(&self, phase: CombatPhase) -> Self::Style {
        match phase {
            CombatPhase::Join => Style::default().fg(Color::Yellow),
            CombatPhase::Combat => Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        }
    }

    fn style_message(&self, level: MessageLevel) -> Self::Style {
        match level {
            MessageLevel::Info => Style::default().fg(Color::White),
            MessageLevel::Warning => Style::default().fg(Color::Yellow),
            MessageLevel::Error => Style::default().fg(Color::LightRed),
        }
    }

    fn emphasize_current(&self, base_style: Self::Style) -> Self::Style {
        base_style.add_modifier(Modifier::BOLD)
    }

    fn highlight_selected(&self, base_style: Self::Style) -> Self::Style {
        base_style.add_modifier(Modifier::REVERSED)
    }
}

impl RatatuiTheme {
    /// Create a new RatatuiTheme instance.
    pub fn new() -> Self {
        Self
    }

    /// Border style for a panel, brighter when it has focus.
    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(Color::Gray)
    }
}

/// Luma below which an entity color is lifted toward white.
const MIN_LUMA: u32 = 64;

/// Terminal color for an entity, lifted so very dark picks stay visible on a
/// dark background.
fn readable(color: tracker_core::Color) -> Color {
    let luma =
        (299 * u32::from(color.r) + 587 * u32::from(color.g) + 114 * u32::from(color.b)) / 1000;
    if luma >= MIN_LUMA {
        return Color::Rgb(color.r, color.g, color.b);
    }
    let lift = |c: u8| c.saturating_add((MIN_LUMA - luma) as u8);
    Color::Rgb(lift(color.r), lift(color.g), lift(color.b))
}

impl Default for RatatuiTheme {
    fn default() -> Self {
        Self::new()
    }
}
