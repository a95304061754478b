//! Timeline panel: occupied ticks in order, or join rolls before combat.

use client_frontend_core::view_model::{PresentationMapper, TimelineRow, ViewModel};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tracker_core::CombatPhase;

use crate::presentation::theme::RatatuiTheme;
use crate::state::Focus;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    view_model: &ViewModel,
    focus: Focus,
    theme: &RatatuiTheme,
) {
    let title = match view_model.phase {
        CombatPhase::Join => " Join Battle ",
        CombatPhase::Combat => " Timeline ",
    };

    let lines: Vec<Line> = if view_model.timeline.is_empty() {
        vec![Line::from(Span::styled(
            match view_model.phase {
                CombatPhase::Join => "No join rolls yet (i / R)",
                CombatPhase::Combat => "Nobody on the timeline",
            },
            theme.dim(),
        ))]
    } else {
        view_model
            .timeline
            .iter()
            .map(|row| row_line(row, view_model.phase, theme))
            .collect()
    };

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border(focus == Focus::Timeline))
            .title(title),
    );
    frame.render_widget(paragraph, area);
}

fn row_line(row: &TimelineRow, phase: CombatPhase, theme: &RatatuiTheme) -> Line<'static> {
    let label = match phase {
        CombatPhase::Join => format!("{:>3} ", row.tick.0),
        CombatPhase::Combat => format!("{:>3} ", row.tick),
    };
    let mut label_style = theme.dim();
    if row.is_current {
        label_style = theme.emphasize_current(Style::default());
    }

    let mut spans = vec![Span::styled(label, label_style)];
    for (index, entry) in row.entries.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(", "));
        }
        let mut style = theme.style_entity(entry.color, row.is_current);
        if entry.selected {
            style = theme.highlight_selected(style);
        }
        spans.push(Span::styled(entry.name.clone(), style));
    }
    Line::from(spans)
}
