//! Entity directory pane (the board list the sidebar opens from).

use crate::state::App;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .title(app.panel.board_title)
        .borders(Borders::ALL)
        .border_style(if app.sidebar.is_open() {
            Style::default().fg(app.theme.border)
        } else {
            Style::default().fg(app.theme.border_focus)
        });

    if app.directory.loading {
        let widget = Paragraph::new("Loading…")
            .style(Style::default().fg(app.theme.text_dim))
            .block(block);
        f.render_widget(widget, area);
        return;
    }

    if let Some(error) = &app.directory.error {
        let widget = Paragraph::new(format!("{}\nPress Ctrl-r to retry", error))
            .style(Style::default().fg(app.theme.error))
            .block(block);
        f.render_widget(widget, area);
        return;
    }

    let items: Vec<ListItem> = app
        .directory
        .entities
        .iter()
        .map(|entity| ListItem::new(format!("{} [{}]", entity.name, entity.stage)))
        .collect();

    let mut state = ListState::default();
    if let Some(selected) = app.directory.selected {
        if let Some(index) = app
            .directory
            .entities
            .iter()
            .position(|e| e.entity_id == selected)
        {
            state.select(Some(index));
        }
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(app.theme.primary).bg(app.theme.bg_highlight));
    f.render_stateful_widget(list, area, &mut state);
}
