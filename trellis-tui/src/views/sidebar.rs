//! Entity sidebar: header, tab bar, and the active tab's records.

use crate::state::App;
use crate::theme::update_kind_color;
use crate::widgets::{DetailPanel, EmptyState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};
use trellis_core::SidebarTab;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(entity) = &app.sidebar.entity else {
        let widget = Paragraph::new("No entity selected\nPress Enter on a row to open it")
            .style(Style::default().fg(app.theme.text_dim))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(widget, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    // Header: entity name plus the close affordance.
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            entity.name.clone(),
            Style::default()
                .fg(app.theme.text)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  [Esc] close", Style::default().fg(app.theme.text_dim)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border_focus)),
    );
    f.render_widget(header, chunks[0]);

    let titles: Vec<Line> = SidebarTab::all()
        .iter()
        .map(|tab| Line::from(tab.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.sidebar.active_tab.index())
        .style(Style::default().fg(app.theme.text_dim))
        .highlight_style(
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(tabs, chunks[1]);

    match app.sidebar.active_tab {
        SidebarTab::Updates => render_updates(f, app, chunks[2]),
        SidebarTab::Files => render_files(f, app, chunks[2]),
    }
}

fn render_updates(f: &mut Frame<'_>, app: &App, area: Rect) {
    let tab = &app.sidebar.updates;
    if render_transient(f, app, area, tab.loading, tab.error.as_deref()) {
        return;
    }
    if tab.records.is_empty() {
        EmptyState {
            message: app.panel.empty_message(SidebarTab::Updates),
            style: Style::default().fg(app.theme.text_dim),
        }
        .render(f, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let items: Vec<ListItem> = tab
        .records
        .iter()
        .map(|update| {
            let first_line = update.body.lines().next().unwrap_or("");
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("[{}] ", update.kind),
                    Style::default().fg(update_kind_color(update.kind, &app.theme)),
                ),
                Span::raw(format!("{}: {}", update.author, first_line)),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    if let Some(selected) = tab.selected {
        if let Some(index) = tab
            .records
            .iter()
            .position(|u| u.update_id.as_uuid() == selected)
        {
            state.select(Some(index));
        }
    }

    let list = List::new(items)
        .block(Block::default().title("Updates").borders(Borders::ALL))
        .highlight_style(Style::default().fg(app.theme.primary));
    f.render_stateful_widget(list, chunks[0], &mut state);

    if let Some(update) = app.sidebar.selected_update() {
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0)])
            .split(chunks[1]);

        let detail = DetailPanel {
            title: "Details",
            fields: vec![
                ("Kind", update.kind.to_string()),
                ("Author", update.author.clone()),
                ("Created", update.created_at.to_rfc3339()),
            ],
            style: Style::default().fg(app.theme.secondary),
        };
        detail.render(f, right[0]);

        let content = Paragraph::new(update.body.clone())
            .block(Block::default().title("Body").borders(Borders::ALL))
            .wrap(Wrap { trim: false });
        f.render_widget(content, right[1]);
    }
}

fn render_files(f: &mut Frame<'_>, app: &App, area: Rect) {
    let tab = &app.sidebar.files;
    if render_transient(f, app, area, tab.loading, tab.error.as_deref()) {
        return;
    }
    if tab.records.is_empty() {
        EmptyState {
            message: app.panel.empty_message(SidebarTab::Files),
            style: Style::default().fg(app.theme.text_dim),
        }
        .render(f, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let items: Vec<ListItem> = tab
        .records
        .iter()
        .map(|attachment| {
            ListItem::new(format!(
                "{} ({})",
                attachment.file_name,
                human_size(attachment.size_bytes)
            ))
        })
        .collect();

    let mut state = ListState::default();
    if let Some(selected) = tab.selected {
        if let Some(index) = tab
            .records
            .iter()
            .position(|a| a.attachment_id.as_uuid() == selected)
        {
            state.select(Some(index));
        }
    }

    let list = List::new(items)
        .block(Block::default().title("Files").borders(Borders::ALL))
        .highlight_style(Style::default().fg(app.theme.primary));
    f.render_stateful_widget(list, chunks[0], &mut state);

    if let Some(attachment) = app.sidebar.selected_attachment() {
        let detail = DetailPanel {
            title: "Details",
            fields: vec![
                ("Name", attachment.file_name.clone()),
                ("Type", attachment.content_type.clone()),
                ("Size", human_size(attachment.size_bytes)),
                ("Uploaded by", attachment.uploaded_by.clone()),
                ("Created", attachment.created_at.to_rfc3339()),
            ],
            style: Style::default().fg(app.theme.secondary),
        };
        detail.render(f, chunks[1]);
    }
}

/// Render the loading/error placeholders. Returns true when the tab content
/// was replaced by one of them.
fn render_transient(
    f: &mut Frame<'_>,
    app: &App,
    area: Rect,
    loading: bool,
    error: Option<&str>,
) -> bool {
    if loading {
        let widget = Paragraph::new("Loading…")
            .style(Style::default().fg(app.theme.text_dim))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(widget, area);
        return true;
    }
    if let Some(error) = error {
        let widget = Paragraph::new(format!("{}\nPress Ctrl-r to retry", error))
            .style(Style::default().fg(app.theme.error))
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(widget, area);
        return true;
    }
    false
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_size_picks_sensible_units() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KiB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MiB");
    }
}
