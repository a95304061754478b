//! Details panel for the selected combatant: description draft and history.

use client_frontend_core::view_model::{PresentationMapper, ViewModel};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::presentation::{theme::RatatuiTheme, ui::DraftView};
use crate::state::Focus;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    view_model: &ViewModel,
    draft: &DraftView,
    focus: Focus,
    theme: &RatatuiTheme,
) {
    let border = theme.border(focus == Focus::Description);

    let Some(details) = &view_model.details else {
        let empty = Paragraph::new(Line::from(Span::styled("Nothing selected", theme.dim())))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(" Details "),
            );
        frame.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // Summary
            Constraint::Percentage(50), // Description
            Constraint::Min(0),         // History
        ])
        .split(area);

    let position = match (details.tick, details.join_roll) {
        (Some(tick), _) => format!("tick {tick}"),
        (None, Some(roll)) => format!("join roll {roll}"),
        (None, None) => "not in combat".to_string(),
    };
    let summary = Paragraph::new(Line::from(vec![
        Span::styled(details.name.clone(), theme.style_entity(details.color, true)),
        Span::styled(format!(" {} {}", details.id, details.color), theme.dim()),
        Span::raw(format!(" | {position}")),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(border).title(" Details "));
    frame.render_widget(summary, chunks[0]);

    let mut title = " Description ".to_string();
    if draft.dirty {
        title.push_str("(unsaved) ");
    }
    let mut text_style = Style::default();
    if draft.editing {
        text_style = text_style.fg(Color::White).add_modifier(Modifier::BOLD);
    }
    let mut body = draft.text.to_string();
    if draft.editing {
        body.push('_');
    }
    let description = Paragraph::new(body)
        .style(text_style)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title),
        );
    frame.render_widget(description, chunks[1]);

    let history: Vec<Line> = details
        .history
        .iter()
        .rev()
        .map(|record| {
            Line::from(vec![
                Span::styled(format!("@{:>3} ", record.tick), theme.dim()),
                Span::raw(if record.label.is_empty() {
                    "action".to_string()
                } else {
                    record.label.clone()
                }),
                Span::styled(format!(" (speed {})", record.speed), theme.dim()),
            ])
        })
        .collect();
    let history = Paragraph::new(history).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" History "),
    );
    frame.render_widget(history, chunks[2]);
}
