//! Message log widget, newest entry at the bottom.

use client_frontend_core::{message::MessageEntry, view_model::PresentationMapper};
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::presentation::theme::RatatuiTheme;

/// `messages` arrive newest first, as collected from the message log.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    messages: &[MessageEntry],
    panel_height: u16,
    theme: &RatatuiTheme,
) {
    let visible = usize::from(panel_height.saturating_sub(2));
    let lines: Vec<Line> = messages
        .iter()
        .take(visible)
        .rev()
        .map(|entry| Line::from(Span::styled(entry.display().into_owned(), theme.style_message(entry.level))))
        .collect();

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Messages "));
    frame.render_widget(paragraph, area);
}
