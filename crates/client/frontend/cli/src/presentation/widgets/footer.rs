//! Footer with the key hints for the current mode.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
};

use crate::state::{AppMode, AppState};

pub fn render(frame: &mut Frame, area: Rect, app_state: &AppState) {
    let hint = match &app_state.mode {
        AppMode::Normal => {
            "a add  x remove  i roll  b begin  space act  t tick  u/U undo/redo  ^S save  ^O slots  ? help  q quit"
        }
        AppMode::EditDescription => "type to edit  Enter commit  Esc stop editing (draft is kept)",
        AppMode::Prompt(_) => "Enter confirm  Esc cancel",
        AppMode::SaveMenu(_) => "j/k move  Enter load  x delete  Esc back",
        AppMode::Help => "Esc close",
    };

    let footer = Paragraph::new(Line::from(hint)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}
