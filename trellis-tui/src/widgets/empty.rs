//! Empty-state widget for tabs with no records.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct EmptyState<'a> {
    pub message: &'a str,
    pub style: Style,
}

impl<'a> EmptyState<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let widget = Paragraph::new(self.message)
            .alignment(Alignment::Center)
            .style(self.style)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(widget, area);
    }
}
