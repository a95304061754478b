//! Save/Load menu widget (full-screen).
//!
//! Two-pane layout:
//! - Left: Save slots - Enter to load
//! - Right: Details of the highlighted slot

use client_frontend_core::view_model::{PresentationMapper, ViewModel};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::presentation::theme::RatatuiTheme;
use crate::state::SaveMenuState;

/// Render the save/load menu as a full-screen replacement.
pub fn render_fullscreen(
    frame: &mut Frame,
    area: Rect,
    menu_state: &SaveMenuState,
    view_model: &ViewModel,
    theme: &RatatuiTheme,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Content (2-pane)
            Constraint::Length(6), // Recent messages
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_title(frame, chunks[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    render_slots_pane(frame, content_chunks[0], menu_state);
    render_details_pane(frame, content_chunks[1], menu_state);
    render_status_log(frame, chunks[2], view_model, theme);
    render_footer(frame, chunks[3], menu_state);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        "Save / Load Session",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(title, area);
}

fn render_slots_pane(frame: &mut Frame, area: Rect, menu_state: &SaveMenuState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Slots ");

    if menu_state.slots.is_empty() {
        let empty_msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No saved sessions.", Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(Span::styled(
                "Press Ctrl+S to save",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);

        frame.render_widget(empty_msg, area);
        return;
    }

    let items: Vec<ListItem> = menu_state
        .slots
        .iter()
        .enumerate()
        .map(|(idx, slot)| {
            let is_selected = idx == menu_state.selected_index;
            let prefix = if is_selected { "► " } else { "  " };
            let mut name_style = Style::default().fg(Color::White);
            if is_selected {
                name_style = name_style.add_modifier(Modifier::BOLD);
            }
            if slot.error.is_some() {
                name_style = name_style.fg(Color::LightRed);
            }

            ListItem::new(Line::from(vec![
                Span::styled(prefix, Style::default().fg(Color::Yellow)),
                Span::styled(slot.name.clone(), name_style),
            ]))
        })
        .collect();

    let mut state = ListState::default().with_selected(Some(menu_state.selected_index));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

fn render_details_pane(frame: &mut Frame, area: Rect, menu_state: &SaveMenuState) {
    let lines = match menu_state.selected() {
        None => vec![Line::from("")],
        Some(slot) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::raw("Slot: "),
                    Span::styled(slot.name.clone(), Style::default().fg(Color::Cyan)),
                ]),
                Line::from(format!("Combatants: {}", slot.entities)),
            ];
            if let Some(saved_at) = slot.saved_at {
                lines.push(Line::from(format!(
                    "Saved: {}",
                    saved_at
                        .with_timezone(&chrono::Local)
                        .format("%Y-%m-%d %H:%M:%S")
                )));
            }
            if let Some(error) = &slot.error {
                lines.push(Line::from(Span::styled(
                    format!("Unreadable: {error}"),
                    Style::default().fg(Color::LightRed),
                )));
            }
            if menu_state.confirm_delete {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Press x again to delete this slot",
                    Style::default()
                        .fg(Color::LightRed)
                        .add_modifier(Modifier::BOLD),
                )));
            }
            lines
        }
    };

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Details "),
    );
    frame.render_widget(paragraph, area);
}

fn render_status_log(frame: &mut Frame, area: Rect, view_model: &ViewModel, theme: &RatatuiTheme) {
    let lines: Vec<Line> = view_model
        .messages
        .iter()
        .take(usize::from(area.height.saturating_sub(2)))
        .rev()
        .map(|entry| Line::from(Span::styled(entry.display().into_owned(), theme.style_message(entry.level))))
        .collect();

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame, area: Rect, menu_state: &SaveMenuState) {
    let text = if menu_state.confirm_delete {
        "x confirm delete  any other key cancels"
    } else {
        "↑/↓ select  Enter load  x delete  Esc back"
    };
    let footer = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
