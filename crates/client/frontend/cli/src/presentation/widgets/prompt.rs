//! Single-line input overlay.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::state::PromptState;

pub fn render(frame: &mut Frame, area: Rect, prompt: &PromptState) {
    let mut lines = vec![Line::from(vec![
        Span::raw("> "),
        Span::styled(prompt.input.clone(), Style::default().fg(Color::White)),
        Span::styled("_", Style::default().fg(Color::DarkGray)),
    ])];
    if let Some(error) = &prompt.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::LightRed),
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", prompt.kind.title())),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
