//! Compose-update modal.

use crate::state::{App, ComposeState};
use crate::views::centered_rect;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, compose: &ComposeState) {
    let area = centered_rect(70, 50, f.size());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!("New update [{}]", compose.kind))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_focus));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    f.render_widget(compose.textarea.widget(), chunks[0]);

    let hint = Paragraph::new("Ctrl-s save • Esc cancel")
        .style(Style::default().fg(app.theme.text_dim));
    f.render_widget(hint, chunks[1]);
}
