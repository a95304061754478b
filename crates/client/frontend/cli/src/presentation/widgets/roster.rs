//! Roster panel: every combatant with its tick and join roll.

use client_frontend_core::view_model::{PresentationMapper, RosterRow, ViewModel};
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::presentation::theme::RatatuiTheme;
use crate::state::Focus;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    view_model: &ViewModel,
    focus: Focus,
    theme: &RatatuiTheme,
) {
    let items: Vec<ListItem> = view_model
        .roster
        .iter()
        .map(|row| ListItem::new(row_line(row, theme)))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border(focus == Focus::Roster))
            .title(" Roster "),
    );

    let mut state = ListState::default().with_selected(view_model.selected_row());
    frame.render_stateful_widget(list, area, &mut state);
}

fn row_line(row: &RosterRow, theme: &RatatuiTheme) -> Line<'static> {
    let mut name_style = theme.style_entity(row.color, row.acting);
    if row.selected {
        name_style = theme.highlight_selected(name_style);
    }

    let marker = if row.acting { "> " } else { "  " };
    let status = match (row.tick, row.join_roll) {
        (Some(tick), _) => format!("  @{tick}"),
        (None, Some(roll)) => format!("  join {roll}"),
        (None, None) => String::new(),
    };

    Line::from(vec![
        Span::raw(marker),
        Span::styled(row.name.clone(), name_style),
        Span::styled(status, theme.dim()),
    ])
}
