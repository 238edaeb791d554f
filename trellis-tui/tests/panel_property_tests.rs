use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use proptest::prelude::*;
use ratatui::{backend::TestBackend, Terminal};
use std::time::Duration;
use trellis_client::{ApiClient, CachedClient, ClientCredentials, QueryCache};
use trellis_core::{EntityKind, SidebarTab, WorkspaceId};
use trellis_tui::config::{AuthConfig, ThemeConfig, TuiConfig};
use trellis_tui::events::TabRecords;
use trellis_tui::keys::{map_key, Action};
use trellis_tui::panel::SidebarConfig;
use trellis_tui::state::App;
use trellis_tui::views::render_view;
use uuid::Uuid;

fn base_config() -> TuiConfig {
    TuiConfig {
        api_base_url: "http://localhost:8080".to_string(),
        workspace_id: Uuid::new_v4(),
        auth: AuthConfig {
            api_key: Some("test-key".to_string()),
            bearer_token: None,
        },
        request_timeout_ms: 5_000,
        tick_interval_ms: 2_000,
        persistence_path: "tmp/trellis-tui.json".into(),
        log_path: "tmp/trellis-tui.log".into(),
        theme: ThemeConfig {
            name: "harbor".to_string(),
        },
    }
}

fn test_app(panel: SidebarConfig) -> App {
    let config = base_config();
    let api = ApiClient::new(
        &config.api_base_url,
        WorkspaceId::new(config.workspace_id),
        &ClientCredentials {
            api_key: config.auth.api_key.clone(),
            bearer_token: config.auth.bearer_token.clone(),
        },
        Duration::from_millis(config.request_timeout_ms),
    )
    .unwrap();
    let client = CachedClient::new(api, QueryCache::new());
    App::new(config, client, panel)
}

fn rendered_text(app: &App) -> String {
    let backend = TestBackend::new(120, 40);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|f| render_view(f, app)).unwrap();
    let buffer = terminal.backend().buffer().clone();
    buffer.content.iter().map(|cell| cell.symbol()).collect()
}

#[test]
fn config_requires_auth() {
    let mut config = base_config();
    config.auth = AuthConfig {
        api_key: None,
        bearer_token: None,
    };
    assert!(config.validate().is_err());
}

#[test]
fn config_requires_known_theme() {
    let mut config = base_config();
    config.theme = ThemeConfig {
        name: "solarized".to_string(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn config_requires_nonzero_intervals() {
    let mut config = base_config();
    config.tick_interval_ms = 0;
    assert!(config.validate().is_err());

    let mut config = base_config();
    config.request_timeout_ms = 0;
    assert!(config.validate().is_err());
}

#[test]
fn sidebar_instances_are_shape_identical() {
    let opp = SidebarConfig::opportunity();
    let job = SidebarConfig::job();

    // Same shape: both bind every field with one invalidation prefix and
    // the same initial tab.
    assert_eq!(opp.initial_tab, job.initial_tab);
    assert_eq!(opp.invalidation_keys.len(), job.invalidation_keys.len());

    // Kind-derived values differ.
    assert_ne!(opp.kind, job.kind);
    assert_ne!(opp.test_id_prefix, job.test_id_prefix);
    assert_ne!(opp.invalidation_keys, job.invalidation_keys);
    assert_ne!(opp.directory_path, job.directory_path);
}

#[test]
fn closed_panel_renders_no_entity_content() {
    let mut app = test_app(SidebarConfig::opportunity());
    app.sidebar.close();
    let text = rendered_text(&app);
    assert!(text.contains("No entity selected"));

    // Closing again is idempotent.
    app.sidebar.close();
    assert_eq!(rendered_text(&app), text);
}

#[test]
fn empty_updates_tab_shows_configured_copy() {
    let mut app = test_app(SidebarConfig::opportunity());
    let entity = Uuid::now_v7();
    app.sidebar
        .open(entity, "Acme Deal".to_string(), SidebarTab::Updates);
    let generation = app.sidebar.generation;
    assert!(app.sidebar.apply_loaded(
        generation,
        SidebarTab::Updates,
        entity,
        Ok(TabRecords::Updates(Vec::new())),
    ));

    let text = rendered_text(&app);
    assert!(text.contains("Acme Deal"));
    assert!(text.contains("Write a note, drop an email, or share files to get things moving"));
}

#[test]
fn empty_files_tab_shows_configured_copy() {
    let mut app = test_app(SidebarConfig::opportunity());
    let entity = Uuid::now_v7();
    app.sidebar
        .open(entity, "Acme Deal".to_string(), SidebarTab::Files);
    let generation = app.sidebar.generation;
    assert!(app.sidebar.apply_loaded(
        generation,
        SidebarTab::Files,
        entity,
        Ok(TabRecords::Files(Vec::new())),
    ));

    let text = rendered_text(&app);
    assert!(text.contains("Upload files or paste screenshots to attach them"));
}

#[test]
fn switching_board_closes_the_panel_and_swaps_routes() {
    let mut app = test_app(SidebarConfig::opportunity());
    let entity = Uuid::now_v7();
    app.sidebar
        .open(entity, "Acme Deal".to_string(), SidebarTab::Updates);

    app.switch_board();
    assert_eq!(app.panel.kind, EntityKind::Job);
    assert!(!app.sidebar.is_open());
    assert!(!rendered_text(&app).contains("Acme Deal"));
}

#[test]
fn element_ids_follow_the_prefix_scheme() {
    for config in [SidebarConfig::opportunity(), SidebarConfig::job()] {
        for part in ["header", "tab-updates", "tab-files", "empty-updates", "empty-files"] {
            let id = config.element_id(part);
            assert!(id.starts_with(config.test_id_prefix));
            assert!(id.ends_with(part));
        }
    }
}

fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

proptest! {
    #[test]
    fn keybinding_digits_map_to_valid_tabs(digit in 0u8..=9u8) {
        let ch = char::from(b'0' + digit);
        let action = map_key(press(KeyCode::Char(ch), KeyModifiers::NONE));
        match action {
            Some(Action::SwitchTab(index)) => {
                prop_assert!(SidebarTab::from_index(index).is_some());
            }
            None => {
                // Digits beyond the tab count are unbound.
                prop_assert!(digit == 0 || digit as usize > SidebarTab::all().len());
            }
            other => prop_assert!(false, "unexpected action {:?}", other),
        }
    }

    #[test]
    fn tab_cycling_is_closed_over_all_tabs(steps in 0usize..16) {
        let mut tab = SidebarTab::Updates;
        for _ in 0..steps {
            tab = tab.next();
        }
        prop_assert!(SidebarTab::all().contains(&tab));

        // next and previous compose to identity.
        prop_assert_eq!(tab.next().previous(), tab);
    }

    #[test]
    fn stale_fetch_is_never_rendered(switches in 1usize..5) {
        let mut app = test_app(SidebarConfig::opportunity());
        let entity = Uuid::now_v7();
        app.sidebar.open(entity, "Acme Deal".to_string(), SidebarTab::Updates);
        let stale = app.sidebar.generation;

        for _ in 0..switches {
            app.sidebar.set_tab(app.sidebar.active_tab.next());
        }

        let update = trellis_client::types::UpdateRecord {
            update_id: trellis_core::UpdateId::now_v7(),
            entity_id: entity,
            kind: trellis_core::UpdateKind::Note,
            author: "ghost@acme.test".to_string(),
            body: "stale body".to_string(),
            created_at: chrono::Utc::now(),
        };
        let applied = app.sidebar.apply_loaded(
            stale,
            SidebarTab::Updates,
            entity,
            Ok(TabRecords::Updates(vec![update])),
        );
        prop_assert!(!applied);
        prop_assert!(!rendered_text(&app).contains("stale body"));
    }
}
