//! Header widget displaying phase, current tick and undo state.

use client_frontend_core::view_model::{PresentationMapper, ViewModel};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::presentation::theme::RatatuiTheme;
use crate::state::{AppMode, AppState};

/// Render the header panel with phase, tick, slot and mode.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    view_model: &ViewModel,
    app_state: &AppState,
    theme: &RatatuiTheme,
) {
    let mode_text = match &app_state.mode {
        AppMode::Normal => "",
        AppMode::EditDescription => " [EDIT DESCRIPTION]",
        AppMode::Prompt(_) => " [INPUT]",
        AppMode::SaveMenu(_) => " [SAVE/LOAD]",
        AppMode::Help => " [HELP]",
    };

    let tick = view_model
        .current_tick
        .map(|tick| tick.to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut spans = vec![
        Span::raw("Phase: "),
        Span::styled(view_model.phase.to_string(), theme.style_phase(view_model.phase)),
        Span::raw(" | Tick: "),
        Span::styled(tick, Style::default().fg(Color::Yellow)),
        Span::raw(" | Combatants: "),
        Span::styled(
            view_model.roster.len().to_string(),
            Style::default().fg(Color::LightGreen),
        ),
        Span::raw(" | Slot: "),
        Span::styled(app_state.slot.clone(), Style::default().fg(Color::Cyan)),
    ];
    if view_model.dirty {
        spans.push(Span::styled(" *", Style::default().fg(Color::LightRed)));
    }
    spans.push(Span::styled(
        mode_text,
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    ));

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Tick Tracker"));

    frame.render_widget(paragraph, area);
}
