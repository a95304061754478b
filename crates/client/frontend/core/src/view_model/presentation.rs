//! Framework-agnostic presentation mapping traits.
//!
//! Each frontend (TUI, GUI, Web) implements these traits with its own styling
//! system while sharing the same view model logic.

use tracker_core::{Color, CombatPhase};

use crate::message::MessageLevel;

/// Framework-agnostic presentation mapper for tracker rows.
///
/// # Example
///
/// ```ignore
/// impl PresentationMapper for RatatuiTheme {
///     type Style = ratatui::style::Style;
///
///     fn style_entity(&self, color: Color, acting: bool) -> Self::Style {
///         let mut style = Style::default().fg(Rgb(color.r, color.g, color.b));
///         if acting {
///             style = style.add_modifier(Modifier::BOLD);
///         }
///         style
///     }
/// }
/// ```
pub trait PresentationMapper {
    /// Style type for this frontend (e.g., `ratatui::style::Style`).
    type Style: Clone;

    /// Style for an entity name in its own color; acting entities stand out.
    fn style_entity(&self, color: Color, acting: bool) -> Self::Style;

    /// Style for the phase indicator.
    fn style_phase(&self, phase: CombatPhase) -> Self::Style;

    /// Style for message log entries based on level.
    fn style_message(&self, level: MessageLevel) -> Self::Style;

    /// Emphasize the current tick row.
    fn emphasize_current(&self, base_style: Self::Style) -> Self::Style;

    /// Highlight the selected row.
    fn highlight_selected(&self, base_style: Self::Style) -> Self::Style;
}
