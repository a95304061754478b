//! Key binding overlay.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const BINDINGS: &[(&str, &str)] = &[
    ("Tab", "switch panel"),
    ("j / k, arrows", "move selection"),
    ("g / G", "first / last row"),
    ("Esc", "clear selection"),
    ("a", "add combatant"),
    ("x, Del", "remove selected"),
    ("r / c", "rename / recolor"),
    ("d, Enter on details", "edit description"),
    ("D", "discard description draft"),
    ("H", "clear action history"),
    ("i", "record join battle successes"),
    ("R", "roll join battle dice"),
    ("w", "withdraw join roll"),
    ("b / e", "begin / end combat"),
    ("space, Enter", "act (speed and label)"),
    ("n", "join combat in progress"),
    ("t", "move to tick"),
    ("l", "leave combat"),
    ("u, ^Z / U, ^Y", "undo / redo"),
    ("^S / S", "save / save as"),
    ("^O, o", "save slots"),
    ("^N", "new session"),
    ("q", "quit"),
];

pub fn render(frame: &mut Frame, area: Rect) {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let lines: Vec<Line> = BINDINGS
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{keys:>20}  "), key_style),
                Span::raw(*action),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Keys "),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
