//! Trellis TUI entry point.

use color_eyre::eyre;
use crossterm::{
    event::{self, Event as CrosstermEvent, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;
use trellis_client::types::CreateUpdateRequest;
use trellis_client::{ApiClient, CachedClient, ClientCredentials, QueryCache};
use trellis_core::{SidebarTab, WorkspaceId};
use trellis_tui::config::TuiConfig;
use trellis_tui::error::TuiError;
use trellis_tui::events::{MutationKind, TabRecords, TuiEvent};
use trellis_tui::keys::{map_key, Action};
use trellis_tui::notifications::NotificationLevel;
use trellis_tui::panel::SidebarConfig;
use trellis_tui::persistence::{self, PersistedState};
use trellis_tui::state::{App, ComposeState, Modal};
use trellis_tui::views::render_view;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let config = TuiConfig::load().map_err(TuiError::from)?;
    init_logging(&config.log_path).map_err(TuiError::from)?;

    let credentials = ClientCredentials {
        api_key: config.auth.api_key.clone(),
        bearer_token: config.auth.bearer_token.clone(),
    };
    let api = ApiClient::new(
        &config.api_base_url,
        WorkspaceId::new(config.workspace_id),
        &credentials,
        Duration::from_millis(config.request_timeout_ms),
    )
    .map_err(TuiError::from)?;
    let client = CachedClient::new(api, QueryCache::new());

    let mut panel = SidebarConfig::opportunity();
    let mut initial_tab = panel.initial_tab;
    if let Ok(Some(state)) = persistence::load(&config.persistence_path) {
        panel = SidebarConfig::for_kind(state.board_kind);
        initial_tab = state.active_tab;
    }
    let mut app = App::new(config, client, panel);
    app.sidebar.active_tab = initial_tab;

    let mut terminal = setup_terminal().map_err(TuiError::from)?;
    let _guard = TerminalGuard {};

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);

    spawn_input_reader(event_tx.clone());
    spawn_directory_fetch(&mut app, event_tx.clone());

    let tick_rate = Duration::from_millis(app.config.tick_interval_ms);
    let mut ticker = tokio::time::interval(tick_rate);

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => {
                let _ = event_tx.send(TuiEvent::Tick).await;
            }
            Some(event) = event_rx.recv() => {
                if handle_event(&mut app, event, &event_tx) {
                    break;
                }
            }
        }
    }

    let persisted = PersistedState {
        board_kind: app.panel.kind,
        active_tab: app.sidebar.active_tab,
    };
    let _ = persistence::save(&app.config.persistence_path, &persisted);

    Ok(())
}

fn init_logging(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, std::io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                match evt {
                    CrosstermEvent::Key(key) => {
                        let _ = sender.blocking_send(TuiEvent::Input(key));
                    }
                    CrosstermEvent::Resize(width, height) => {
                        let _ = sender.blocking_send(TuiEvent::Resize { width, height });
                    }
                    _ => {}
                }
            }
        }
    });
}

fn handle_event(app: &mut App, event: TuiEvent, tx: &mpsc::Sender<TuiEvent>) -> bool {
    match event {
        TuiEvent::Input(key) => {
            if app.compose.is_some() {
                handle_compose_key(app, key, tx);
                return false;
            }
            if let Some(action) = map_key(key) {
                return handle_action(app, action, tx);
            }
        }
        TuiEvent::TabLoaded {
            generation,
            tab,
            entity_id,
            result,
        } => {
            let applied = app.sidebar.apply_loaded(generation, tab, entity_id, result);
            if !applied {
                debug!(generation, %entity_id, ?tab, "discarded stale tab fetch");
            }
        }
        TuiEvent::DirectoryLoaded { kind, result } => {
            if let Err(message) = &result {
                app.notify(NotificationLevel::Error, message.clone());
            }
            app.directory.apply_loaded(kind, result);
        }
        TuiEvent::MutationCompleted {
            kind,
            tab,
            entity_id,
            result,
        } => match result {
            Ok(()) => {
                let message = match kind {
                    MutationKind::CreateUpdate => "Update added",
                    MutationKind::DeleteUpdate => "Update deleted",
                    MutationKind::DeleteAttachment => "Attachment deleted",
                };
                app.notify(NotificationLevel::Success, message);
                // The mutated lists were invalidated; re-fetch what is on
                // screen so it reflects server state.
                if app.sidebar.entity_id() == Some(entity_id) && app.sidebar.active_tab == tab {
                    app.sidebar.bump_generation();
                    spawn_tab_fetch(app, tx.clone());
                }
            }
            Err(message) => {
                app.notify(NotificationLevel::Error, message);
            }
        },
        TuiEvent::Resize { .. } | TuiEvent::Tick => {}
    }
    false
}

fn handle_compose_key(app: &mut App, key: crossterm::event::KeyEvent, tx: &mpsc::Sender<TuiEvent>) {
    if key.code == KeyCode::Esc {
        app.compose = None;
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
        submit_compose(app, tx);
        return;
    }
    if let Some(compose) = app.compose.as_mut() {
        compose.textarea.input(key);
    }
}

fn handle_action(app: &mut App, action: Action, tx: &mpsc::Sender<TuiEvent>) -> bool {
    match action {
        Action::Quit => return true,
        Action::NextTab => {
            if app.sidebar.is_open() && app.sidebar.set_tab(app.sidebar.active_tab.next()) {
                spawn_tab_fetch(app, tx.clone());
            }
        }
        Action::PrevTab => {
            if app.sidebar.is_open() && app.sidebar.set_tab(app.sidebar.active_tab.previous()) {
                spawn_tab_fetch(app, tx.clone());
            }
        }
        Action::SwitchTab(index) => {
            if let Some(tab) = SidebarTab::from_index(index) {
                if app.sidebar.is_open() && app.sidebar.set_tab(tab) {
                    spawn_tab_fetch(app, tx.clone());
                }
            }
        }
        Action::MoveDown => app.select_next(),
        Action::MoveUp => app.select_previous(),
        Action::SwitchBoard => {
            app.switch_board();
            spawn_directory_fetch(app, tx.clone());
        }
        Action::NewUpdate => {
            if app.sidebar.is_open() {
                app.compose = Some(ComposeState::new());
            } else {
                app.notify(NotificationLevel::Info, "Open an entity first");
            }
        }
        Action::DeleteItem => delete_selected(app, tx),
        Action::OpenHelp => {
            app.modal = Some(Modal {
                title: "Keybindings".to_string(),
                message: "j/k or arrows move, Enter opens the selected row, Tab cycles \
                          sidebar tabs, n composes an update, d deletes the selected \
                          record, Ctrl-r refreshes, Esc closes, q quits."
                    .to_string(),
            });
        }
        Action::Refresh => {
            if app.sidebar.is_open() {
                refresh_active_tab(app, tx.clone());
            } else {
                spawn_directory_fetch(app, tx.clone());
            }
        }
        Action::Confirm => {
            if app.modal.is_some() {
                app.modal = None;
            } else if !app.sidebar.is_open() {
                open_selected_entity(app, tx);
            }
        }
        Action::Cancel => {
            if app.modal.is_some() {
                app.modal = None;
            } else {
                app.sidebar.close();
            }
        }
    }
    false
}

fn open_selected_entity(app: &mut App, tx: &mpsc::Sender<TuiEvent>) {
    let Some(entity) = app.directory.selected_entity() else {
        return;
    };
    let (id, name) = (entity.entity_id, entity.name.clone());
    // Tabs are sticky across opens; the panel default applies on first use.
    let tab = app.sidebar.active_tab;
    if app.sidebar.open(id, name, tab) {
        spawn_tab_fetch(app, tx.clone());
    }
}

/// Force the active tab to hit the server again: drop its cache entry,
/// invalidate in-flight interest, and fetch.
fn refresh_active_tab(app: &mut App, tx: mpsc::Sender<TuiEvent>) {
    let Some(entity_id) = app.sidebar.entity_id() else {
        return;
    };
    let op = match app.sidebar.active_tab {
        SidebarTab::Updates => trellis_client::Operation::ListUpdates,
        SidebarTab::Files => trellis_client::Operation::ListAttachments,
    };
    let client = app.client.clone();
    app.sidebar.bump_generation();
    let generation = app.sidebar.generation;
    let tab = app.sidebar.active_tab;
    let routes = app.panel.routes.clone();
    app.sidebar.begin_loading(tab);
    tokio::spawn(async move {
        client.force_refetch(op, entity_id).await;
        let result = fetch_tab(&client, &routes, tab, entity_id).await;
        let _ = tx
            .send(TuiEvent::TabLoaded {
                generation,
                tab,
                entity_id,
                result,
            })
            .await;
    });
}

fn spawn_tab_fetch(app: &mut App, tx: mpsc::Sender<TuiEvent>) {
    let Some(entity_id) = app.sidebar.entity_id() else {
        return;
    };
    let generation = app.sidebar.generation;
    let tab = app.sidebar.active_tab;
    let client = app.client.clone();
    let routes = app.panel.routes.clone();
    app.sidebar.begin_loading(tab);
    tokio::spawn(async move {
        let result = fetch_tab(&client, &routes, tab, entity_id).await;
        let _ = tx
            .send(TuiEvent::TabLoaded {
                generation,
                tab,
                entity_id,
                result,
            })
            .await;
    });
}

async fn fetch_tab(
    client: &CachedClient,
    routes: &trellis_client::RouteSet,
    tab: SidebarTab,
    entity_id: uuid::Uuid,
) -> Result<TabRecords, String> {
    match tab {
        SidebarTab::Updates => client
            .list_updates(routes, entity_id)
            .await
            .map(TabRecords::Updates)
            .map_err(|e| e.to_string()),
        SidebarTab::Files => client
            .list_attachments(routes, entity_id)
            .await
            .map(TabRecords::Files)
            .map_err(|e| e.to_string()),
    }
}

fn spawn_directory_fetch(app: &mut App, tx: mpsc::Sender<TuiEvent>) {
    let kind = app.directory.kind;
    let path = app.panel.directory_path;
    let client = app.client.clone();
    app.directory.loading = true;
    app.directory.error = None;
    tokio::spawn(async move {
        let result = client
            .client()
            .list_entities(path)
            .await
            .map(|response| response.entities)
            .map_err(|e| e.to_string());
        let _ = tx.send(TuiEvent::DirectoryLoaded { kind, result }).await;
    });
}

fn submit_compose(app: &mut App, tx: &mpsc::Sender<TuiEvent>) {
    let Some(entity_id) = app.sidebar.entity_id() else {
        app.compose = None;
        return;
    };
    let Some(compose) = app.compose.take() else {
        return;
    };
    let body = compose.body();
    if body.trim().is_empty() {
        app.compose = Some(compose);
        app.notify(NotificationLevel::Warning, "Update body is empty");
        return;
    }
    let request = CreateUpdateRequest {
        kind: compose.kind,
        body,
    };
    let client = app.client.clone();
    let routes = app.panel.routes.clone();
    let invalidation_keys = app.panel.invalidation_keys.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client
            .create_update(&routes, entity_id, &request, &invalidation_keys)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string());
        let _ = tx
            .send(TuiEvent::MutationCompleted {
                kind: MutationKind::CreateUpdate,
                tab: SidebarTab::Updates,
                entity_id,
                result,
            })
            .await;
    });
}

fn delete_selected(app: &mut App, tx: &mpsc::Sender<TuiEvent>) {
    let Some(entity_id) = app.sidebar.entity_id() else {
        return;
    };
    let client = app.client.clone();
    let routes = app.panel.routes.clone();
    let invalidation_keys = app.panel.invalidation_keys.clone();
    let tx = tx.clone();
    match app.sidebar.active_tab {
        SidebarTab::Updates => {
            let Some(update) = app.sidebar.selected_update() else {
                app.notify(NotificationLevel::Info, "No update selected");
                return;
            };
            let update_id = update.update_id.as_uuid();
            tokio::spawn(async move {
                let result = client
                    .delete_update(&routes, update_id, entity_id, &invalidation_keys)
                    .await
                    .map_err(|e| e.to_string());
                let _ = tx
                    .send(TuiEvent::MutationCompleted {
                        kind: MutationKind::DeleteUpdate,
                        tab: SidebarTab::Updates,
                        entity_id,
                        result,
                    })
                    .await;
            });
        }
        SidebarTab::Files => {
            let Some(attachment) = app.sidebar.selected_attachment() else {
                app.notify(NotificationLevel::Info, "No file selected");
                return;
            };
            let attachment_id = attachment.attachment_id.as_uuid();
            tokio::spawn(async move {
                let result = client
                    .delete_attachment(&routes, attachment_id, entity_id, &invalidation_keys)
                    .await
                    .map_err(|e| e.to_string());
                let _ = tx
                    .send(TuiEvent::MutationCompleted {
                        kind: MutationKind::DeleteAttachment,
                        tab: SidebarTab::Files,
                        entity_id,
                        result,
                    })
                    .await;
            });
        }
    }
}
